use may_minihttp::Request;
use std::collections::HashMap;
use std::io::Read;
use tracing::debug;

/// Parsed HTTP request data used by `AppService`.
#[derive(Debug, Default, PartialEq)]
pub struct ParsedRequest {
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request path without the query string
    pub path: String,
    /// HTTP headers (lowercase keys)
    pub headers: HashMap<String, String>,
    /// Parsed query string parameters
    pub query_params: HashMap<String, String>,
    /// Fields of an `application/x-www-form-urlencoded` body
    pub form: HashMap<String, String>,
}

impl ParsedRequest {
    /// Look up a form value the way HTML forms submit it: body first, then query string.
    pub fn form_value(&self, name: &str) -> Option<&str> {
        self.form
            .get(name)
            .or_else(|| self.query_params.get(name))
            .map(String::as_str)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Parse query string parameters from a URL path
///
/// # Arguments
///
/// * `path` - The full URL path (e.g., `/search?word=cat`)
pub fn parse_query_params(path: &str) -> HashMap<String, String> {
    match path.split_once('?') {
        Some((_, query)) => parse_urlencoded(query.as_bytes()),
        None => HashMap::new(),
    }
}

/// Decode `application/x-www-form-urlencoded` pairs. Later duplicates are
/// ignored so the first value wins, as with HTML form lookups.
pub fn parse_urlencoded(bytes: &[u8]) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for (k, v) in url::form_urlencoded::parse(bytes) {
        out.entry(k.into_owned()).or_insert_with(|| v.into_owned());
    }
    out
}

fn is_form_content_type(content_type: Option<&String>) -> bool {
    match content_type {
        // Browsers always send it; curl -d does too. Treat a missing header as a form.
        None => true,
        Some(ct) => ct
            .split(';')
            .next()
            .map(|mime| mime.trim().eq_ignore_ascii_case("application/x-www-form-urlencoded"))
            .unwrap_or(false),
    }
}

/// Extract method, path, headers, query and form fields from a `may_minihttp::Request`.
pub fn parse_request(req: Request) -> ParsedRequest {
    let method = req.method().to_string();
    let raw_path = req.path().to_string();
    let path = raw_path.split('?').next().unwrap_or("/").to_string();

    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .map(|h| {
            (
                h.name.to_ascii_lowercase(),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();

    let query_params = parse_query_params(&raw_path);

    let mut body = Vec::new();
    let form = match req.body().read_to_end(&mut body) {
        Ok(size) if size > 0 && is_form_content_type(headers.get("content-type")) => {
            parse_urlencoded(&body)
        }
        Ok(_) => HashMap::new(),
        Err(e) => {
            debug!(error = %e, "Request body read failed");
            HashMap::new()
        }
    };

    debug!(
        method = %method,
        path = %path,
        header_count = headers.len(),
        body_bytes = body.len(),
        form_fields = form.len(),
        "HTTP request parsed"
    );

    ParsedRequest {
        method,
        path,
        headers,
        query_params,
        form,
    }
}
