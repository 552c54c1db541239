use lexiserve::dictionary::{DictionaryLookup, Entry, HttpDictionaryClient, LookupOutcome};
use lexiserve::history::HistoryStore;
use lexiserve::render::Renderer;
use lexiserve::search::SearchOrchestrator;
use lexiserve::server::{AppService, HttpServer, ServerHandle};
use lexiserve::session::{AddrAgentResolver, ClientKey};
use lexiserve::static_files::StaticFiles;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

mod common;
use common::mock_upstream::{MockUpstream, HELLO_JSON};
use common::test_server::{
    free_addr, get, parse_parts, post_form, send_request, send_request_with_timeout,
    setup_may_runtime,
};

/// Knows "hello" (any case); everything else is not found.
#[derive(Default)]
struct StubLookup {
    calls: AtomicUsize,
}

impl DictionaryLookup for StubLookup {
    fn lookup(&self, word: &str) -> LookupOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if word.eq_ignore_ascii_case("hello") {
            LookupOutcome::Found(vec![Entry {
                word: "hello".into(),
                ..Entry::default()
            }])
        } else {
            LookupOutcome::NotFound
        }
    }
}

/// Running server plus handles to its shared state; stops the server on drop.
struct TestServer {
    handle: Option<ServerHandle>,
    addr: SocketAddr,
    history: Arc<HistoryStore>,
    stub: Arc<StubLookup>,
}

impl TestServer {
    fn start() -> Self {
        let stub = Arc::new(StubLookup::default());
        let lookup: Arc<dyn DictionaryLookup> = Arc::clone(&stub) as Arc<dyn DictionaryLookup>;
        let mut server = Self::start_with(lookup);
        server.stub = stub;
        server
    }

    fn start_with(lookup: Arc<dyn DictionaryLookup>) -> Self {
        setup_may_runtime();
        let history = Arc::new(HistoryStore::new());
        let service = AppService::new(
            SearchOrchestrator::new(Arc::clone(&history), lookup),
            Arc::new(AddrAgentResolver),
            Arc::new(Renderer::new().unwrap()),
            Some(StaticFiles::new("tests/staticdata")),
        );
        let addr = free_addr();
        let handle = HttpServer(service).start(addr).unwrap();
        handle.wait_ready().unwrap();
        Self {
            handle: Some(handle),
            addr,
            history,
            stub: Arc::new(StubLookup::default()),
        }
    }

    fn send(&self, req: &str) -> (u16, String, String) {
        parse_parts(&send_request(&self.addr, req))
    }

    fn lookups(&self) -> usize {
        self.stub.calls.load(Ordering::SeqCst)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.stop();
        }
    }
}

#[test]
fn test_home_renders_search_form() {
    let server = TestServer::start();
    let (status, ct, body) = server.send(&get("/", "agent-home"));
    assert_eq!(status, 200);
    assert!(ct.starts_with("text/html"));
    assert!(body.contains("name=\"word\""));
    assert!(body.contains("No searches yet."));
}

#[test]
fn test_search_found_renders_entries_and_records_history() {
    let server = TestServer::start();
    let (status, _, body) = server.send(&post_form("/search", "agent-found", "word=+Hello+"));
    assert_eq!(status, 200);
    assert!(body.contains("Results for &ldquo;Hello&rdquo;"));
    assert!(body.contains("hello"));
    assert_eq!(server.lookups(), 1);
    assert_eq!(
        server.history.get(&ClientKey::new("agent-found")),
        vec!["Hello"]
    );
}

#[test]
fn test_search_not_found_message_and_history_kept() {
    let server = TestServer::start();
    let (status, _, body) = server.send(&post_form("/search", "agent-nf", "word=zzznotaword"));
    assert_eq!(status, 200);
    assert!(body.contains("Word not found. Please check your spelling and try again."));
    assert_eq!(
        server.history.get(&ClientKey::new("agent-nf")),
        vec!["zzznotaword"]
    );
}

#[test]
fn test_search_empty_word_skips_lookup() {
    let server = TestServer::start();
    let (status, _, body) = server.send(&post_form("/search", "agent-empty", "word=+++"));
    assert_eq!(status, 200);
    assert!(body.contains("Please enter a word"));
    assert_eq!(server.lookups(), 0);
    assert_eq!(server.history.client_count(), 0);
}

#[test]
fn test_search_missing_field_is_empty_query() {
    let server = TestServer::start();
    let (_, _, body) = server.send(&post_form("/search", "agent-missing", "other=1"));
    assert!(body.contains("Please enter a word"));
    assert_eq!(server.lookups(), 0);
}

#[test]
fn test_search_get_is_method_not_allowed() {
    let server = TestServer::start();
    let (status, _, body) = server.send(&get("/search?word=hello", "agent-get"));
    assert_eq!(status, 405);
    assert_eq!(body, "Method not allowed");
    assert_eq!(server.lookups(), 0);
}

#[test]
fn test_history_page_is_scoped_per_client() {
    let server = TestServer::start();
    server.send(&post_form("/search", "alice-browser", "word=cat"));
    server.send(&post_form("/search", "alice-browser", "word=CAT"));
    server.send(&post_form("/search", "bob-browser", "word=dog"));

    let (status, _, alice) = server.send(&get("/history", "alice-browser"));
    assert_eq!(status, 200);
    assert!(alice.contains(">cat</button>"));
    assert!(!alice.contains(">CAT</button>"));
    assert!(!alice.contains(">dog</button>"));

    let (_, _, bob) = server.send(&get("/history", "bob-browser"));
    assert!(bob.contains(">dog</button>"));
    assert!(!bob.contains(">cat</button>"));
}

#[test]
fn test_forwarded_for_changes_identity() {
    let server = TestServer::start();
    let req = "POST /search HTTP/1.1\r\nHost: x\r\nX-Forwarded-For: 198.51.100.4\r\nUser-Agent: ua\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: 9\r\n\r\nword=fern";
    server.send(req);
    assert_eq!(
        server.history.get(&ClientKey::new("198.51.100.4ua")),
        vec!["fern"]
    );
    assert!(server.history.get(&ClientKey::new("ua")).is_empty());
}

#[test]
fn test_home_embeds_history() {
    let server = TestServer::start();
    server.send(&post_form("/search", "agent-embed", "word=quill"));
    let (_, _, body) = server.send(&get("/", "agent-embed"));
    assert!(body.contains(">quill</button>"));
}

#[test]
fn test_static_asset_served() {
    let server = TestServer::start();
    let (status, ct, body) = server.send(&get("/static/site.css", "agent-static"));
    assert_eq!(status, 200);
    assert_eq!(ct, "text/css");
    assert!(body.contains("color: red"));
}

#[test]
fn test_static_traversal_blocked() {
    let server = TestServer::start();
    let (status, _, _) = server.send(&get("/static/../../Cargo.toml", "agent-static"));
    assert_eq!(status, 404);
}

#[test]
fn test_unknown_path_is_404() {
    let server = TestServer::start();
    let (status, _, _) = server.send(&get("/nope", "agent-404"));
    assert_eq!(status, 404);
}

#[test]
fn test_health_endpoint() {
    let server = TestServer::start();
    let (status, ct, body) = server.send(&get("/health", "health-check"));
    assert_eq!(status, 200);
    assert_eq!(ct, "application/json");
    assert_eq!(body, r#"{"status":"ok"}"#);
}

#[test]
fn test_end_to_end_with_http_upstream() {
    let mock = MockUpstream::start(|url| {
        if url.ends_with("/hello") {
            (200, HELLO_JSON.to_string())
        } else {
            (404, "{}".to_string())
        }
    });
    let client = HttpDictionaryClient::new(&mock.base_url, Some(Duration::from_secs(5))).unwrap();
    let server = TestServer::start_with(Arc::new(client));

    let resp = send_request_with_timeout(
        &server.addr,
        &post_form("/search", "e2e", "word=hello"),
        Duration::from_secs(5),
    );
    let (status, _, body) = parse_parts(&resp);
    assert_eq!(status, 200);
    assert!(body.contains("used as a greeting or to begin a phone conversation."));
    assert!(body.contains("hello there, Katie!"));
    assert!(body.contains("Synonyms: hi"));

    let resp = send_request_with_timeout(
        &server.addr,
        &post_form("/search", "e2e", "word=blorp"),
        Duration::from_secs(5),
    );
    let (_, _, body) = parse_parts(&resp);
    assert!(body.contains("Word not found."));
    assert_eq!(mock.requests().len(), 2);
    assert_eq!(
        server.history.get(&ClientKey::new("e2e")),
        vec!["blorp", "hello"]
    );
}

#[test]
fn test_browser_form_post_with_many_headers() {
    let server = TestServer::start();
    let body = "word=hello";
    let req = format!(
        "POST /search HTTP/1.1\r\n\
         Host: localhost:8080\r\n\
         Connection: keep-alive\r\n\
         Content-Length: {}\r\n\
         Cache-Control: max-age=0\r\n\
         sec-ch-ua: \"Chromium\";v=\"129\", \"Not=A?Brand\";v=\"8\"\r\n\
         sec-ch-ua-mobile: ?0\r\n\
         sec-ch-ua-platform: \"Linux\"\r\n\
         Origin: http://localhost:8080\r\n\
         Content-Type: application/x-www-form-urlencoded\r\n\
         Upgrade-Insecure-Requests: 1\r\n\
         User-Agent: Mozilla/5.0 (X11; Linux x86_64) Chrome/129.0\r\n\
         Accept: text/html,application/xhtml+xml\r\n\
         Sec-Fetch-Site: same-origin\r\n\
         Sec-Fetch-Mode: navigate\r\n\
         Sec-Fetch-User: ?1\r\n\
         Sec-Fetch-Dest: document\r\n\
         Referer: http://localhost:8080/\r\n\
         Accept-Encoding: gzip, deflate, br\r\n\
         Accept-Language: en-GB,en;q=0.9\r\n\
         X-Forwarded-For: 203.0.113.9\r\n\
         \r\n{body}",
        body.len()
    );
    assert!(req.split("\r\n\r\n").next().unwrap().lines().count() > 17);

    let (status, _, html) = server.send(&req);
    assert_eq!(status, 200);
    assert!(html.contains("Results for &ldquo;hello&rdquo;"));
    assert_eq!(
        server.history.get(&ClientKey::new(
            "203.0.113.9Mozilla/5.0 (X11; Linux x86_64) Chrome/129.0"
        )),
        vec!["hello"]
    );
}

#[test]
fn test_slow_upstream_does_not_stall_other_routes() {
    let mock = MockUpstream::start(|_| {
        std::thread::sleep(Duration::from_millis(2000));
        (200, HELLO_JSON.to_string())
    });
    let client = HttpDictionaryClient::new(&mock.base_url, Some(Duration::from_secs(10))).unwrap();
    let server = TestServer::start_with(Arc::new(client));

    // One more in-flight lookup than there are scheduler threads.
    let in_flight = may::config().get_workers() + 1;
    let addr = server.addr;
    let _searches: Vec<_> = (0..in_flight)
        .map(|i| {
            std::thread::spawn(move || {
                send_request_with_timeout(
                    &addr,
                    &post_form("/search", &format!("slow-{i}"), "word=hello"),
                    Duration::from_secs(10),
                )
            })
        })
        .collect();
    std::thread::sleep(Duration::from_millis(300));

    let started = std::time::Instant::now();
    let resp = send_request_with_timeout(&addr, &get("/health", "health-check"), Duration::from_secs(5));
    let elapsed = started.elapsed();
    let (status, _, _) = parse_parts(&resp);
    assert_eq!(status, 200);
    assert!(
        elapsed < Duration::from_millis(500),
        "/health took {elapsed:?} while lookups were in flight"
    );

    let (status, _, _) = server.send(&get("/history", "slow-0"));
    assert_eq!(status, 200);
}
