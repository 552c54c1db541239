use super::request::{parse_request, ParsedRequest};
use super::response::{write_bytes, write_html, write_json, write_text};
use crate::ids::RequestId;
use crate::render::{Page, Renderer};
use crate::search::{PageData, SearchOrchestrator};
use crate::session::{ClientKey, ConnectionAttributes, IdentityResolver};
use crate::static_files::StaticFiles;
use may_minihttp::{HttpService, Request, Response};
use std::io;
use std::sync::Arc;
use tracing::{debug, error, info, info_span};

/// HTTP front-end: routes requests to the search orchestrator and renders pages.
///
/// Cloned once per connection by `may_minihttp`; all state is behind `Arc`s
/// so every clone shares the same history store.
#[derive(Clone)]
pub struct AppService {
    pub orchestrator: SearchOrchestrator,
    pub resolver: Arc<dyn IdentityResolver>,
    pub renderer: Arc<Renderer>,
    pub static_files: Option<StaticFiles>,
}

impl AppService {
    pub fn new(
        orchestrator: SearchOrchestrator,
        resolver: Arc<dyn IdentityResolver>,
        renderer: Arc<Renderer>,
        static_files: Option<StaticFiles>,
    ) -> Self {
        Self {
            orchestrator,
            resolver,
            renderer,
            static_files,
        }
    }

    fn client_key(&self, req: &ParsedRequest) -> ClientKey {
        self.resolver
            .resolve(&ConnectionAttributes::from_headers(&req.headers))
    }

    fn render_page(&self, res: &mut Response, page: Page, data: &PageData) {
        match self.renderer.render(page, data) {
            Ok(html) => write_html(res, 200, html),
            Err(e) => {
                error!(page = ?page, error = %e, "Template render failed");
                write_text(res, 500, "Internal Server Error");
            }
        }
    }

    /// `GET /`: search form with the client's history.
    pub fn home(&self, req: &ParsedRequest, res: &mut Response) {
        let history = self.orchestrator.handle_history_view(&self.client_key(req));
        self.render_page(res, Page::Index, &PageData::with_history(history));
    }

    /// `POST /search`: run the search and render results or the failure message.
    pub fn search(&self, req: &ParsedRequest, res: &mut Response) {
        if req.method != "POST" {
            write_text(res, 405, "Method not allowed");
            return;
        }
        let client = self.client_key(req);
        let raw_word = req.form_value("word").unwrap_or("");
        debug!(client = %client.fingerprint(), "Search request");
        let result = self.orchestrator.handle_search(&client, raw_word);
        self.render_page(res, Page::Results, &PageData::from(result));
    }

    /// `GET /history`: the client's history alone.
    pub fn history(&self, req: &ParsedRequest, res: &mut Response) {
        let history = self.orchestrator.handle_history_view(&self.client_key(req));
        self.render_page(res, Page::History, &PageData::with_history(history));
    }

    /// `GET /static/*`
    pub fn static_asset(&self, rel_path: &str, res: &mut Response) {
        let loaded = self
            .static_files
            .as_ref()
            .and_then(|sf| sf.load(rel_path).ok());
        match loaded {
            Some((bytes, ct)) => write_bytes(res, ct, bytes),
            None => write_text(res, 404, "Not Found"),
        }
    }
}

/// Basic health check endpoint returning `{ "status": "ok" }`.
pub fn health_endpoint(res: &mut Response) {
    write_json(res, 200, &serde_json::json!({ "status": "ok" }));
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let parsed = parse_request(req);
        let request_id = RequestId::from_header_or_new(parsed.header("x-request-id"));
        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %parsed.method,
            path = %parsed.path
        );
        let _enter = span.enter();

        match (parsed.method.as_str(), parsed.path.as_str()) {
            ("GET", "/") | ("GET", "/index.html") => self.home(&parsed, res),
            (_, "/search") => self.search(&parsed, res),
            ("GET", "/history") => self.history(&parsed, res),
            ("GET", "/health") => health_endpoint(res),
            ("GET", p) if p.starts_with("/static/") => {
                self.static_asset(&p["/static/".len()..], res)
            }
            (method, path) => {
                info!(method = %method, path = %path, "No route matched");
                write_text(res, 404, "Not Found");
            }
        }
        Ok(())
    }
}
