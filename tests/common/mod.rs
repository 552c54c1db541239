#![allow(dead_code)]

pub mod mock_upstream {
    use std::sync::{Arc, Mutex};
    use std::thread::{self, JoinHandle};
    use tiny_http::{Header, Response, Server};

    /// Canned upstream dictionary served by `tiny_http`.
    ///
    /// The responder gets the request URL (path plus query, still percent-encoded)
    /// and returns a status and body. Every URL is recorded for assertions.
    pub struct MockUpstream {
        pub base_url: String,
        requests: Arc<Mutex<Vec<String>>>,
        server: Arc<Server>,
        _worker: JoinHandle<()>,
    }

    impl MockUpstream {
        pub fn start<F>(respond: F) -> Self
        where
            F: Fn(&str) -> (u16, String) + Send + 'static,
        {
            let server = Arc::new(Server::http("127.0.0.1:0").expect("bind mock upstream"));
            let port = server
                .server_addr()
                .to_ip()
                .expect("mock upstream has an IP address")
                .port();
            let requests = Arc::new(Mutex::new(Vec::new()));

            let srv = Arc::clone(&server);
            let seen = Arc::clone(&requests);
            let worker = thread::spawn(move || {
                for req in srv.incoming_requests() {
                    let url = req.url().to_string();
                    seen.lock().unwrap().push(url.clone());
                    let (status, body) = respond(&url);
                    let header =
                        Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                            .unwrap();
                    let resp = Response::from_string(body)
                        .with_status_code(status)
                        .with_header(header);
                    let _ = req.respond(resp);
                }
            });

            Self {
                base_url: format!("http://127.0.0.1:{port}/api/v2/entries/en"),
                requests,
                server,
                _worker: worker,
            }
        }

        /// Always answer with the same status and body.
        pub fn fixed(status: u16, body: &str) -> Self {
            let body = body.to_string();
            Self::start(move |_| (status, body.clone()))
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Drop for MockUpstream {
        fn drop(&mut self) {
            // The worker exits once its pending request (if any) is answered.
            self.server.unblock();
        }
    }

    pub const HELLO_JSON: &str = r#"[{
        "word": "hello",
        "phonetic": "həˈləʊ",
        "phonetics": [{"text": "həˈləʊ", "audio": ""}],
        "meanings": [{
            "partOfSpeech": "exclamation",
            "definitions": [{
                "definition": "used as a greeting or to begin a phone conversation.",
                "example": "hello there, Katie!",
                "synonyms": ["hi"],
                "antonyms": ["bye"]
            }]
        }]
    }]"#;

    pub const NOT_FOUND_JSON: &str =
        r#"{"title":"No Definitions Found","message":"Sorry pal, we couldn't find definitions for the word you were looking for.","resolution":"You can try the search again at later time or head to the web instead."}"#;
}

pub mod test_server {
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpListener, TcpStream};
    use std::sync::Once;
    use std::time::Duration;

    static MAY_INIT: Once = Once::new();

    /// Configure the may runtime once per test binary.
    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_stack_size(0x40000);
        });
    }

    /// Reserve a free local port.
    pub fn free_addr() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        addr
    }

    pub fn send_request(addr: &SocketAddr, req: &str) -> String {
        send_request_with_timeout(addr, req, Duration::from_millis(200))
    }

    pub fn send_request_with_timeout(addr: &SocketAddr, req: &str, timeout: Duration) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(req.as_bytes()).unwrap();
        stream.set_read_timeout(Some(timeout)).unwrap();
        let mut buf = Vec::new();
        loop {
            let mut tmp = [0u8; 4096];
            match stream.read(&mut tmp) {
                Ok(0) => break,
                Ok(n) => {
                    buf.extend_from_slice(&tmp[..n]);
                    if response_complete(&buf) {
                        break;
                    }
                }
                Err(ref e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    break
                }
                Err(e) => panic!("read error: {:?}", e),
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    /// True once the headers and `Content-Length` bytes of body have arrived.
    fn response_complete(buf: &[u8]) -> bool {
        let text = String::from_utf8_lossy(buf);
        let Some(split) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..split]
            .lines()
            .filter_map(|l| l.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.trim().parse::<usize>().ok());
        match content_length {
            Some(len) => buf.len() >= split + 4 + len,
            None => false,
        }
    }

    /// Split a raw response into (status, content-type, body).
    pub fn parse_parts(resp: &str) -> (u16, String, String) {
        let (headers, body) = resp.split_once("\r\n\r\n").unwrap_or((resp, ""));
        let mut status = 0;
        let mut content_type = String::new();
        for line in headers.lines() {
            if line.starts_with("HTTP/1.1") {
                status = line
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("0")
                    .parse()
                    .unwrap();
            } else if let Some((name, val)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-type") {
                    content_type = val.trim().to_string();
                }
            }
        }
        (status, content_type, body.to_string())
    }

    pub fn post_form(path: &str, user_agent: &str, form: &str) -> String {
        format!(
            "POST {path} HTTP/1.1\r\nHost: x\r\nUser-Agent: {user_agent}\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\n\r\n{form}",
            form.len()
        )
    }

    pub fn get(path: &str, user_agent: &str) -> String {
        format!("GET {path} HTTP/1.1\r\nHost: x\r\nUser-Agent: {user_agent}\r\n\r\n")
    }
}
