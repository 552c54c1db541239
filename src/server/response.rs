use http::StatusCode;
use may_minihttp::Response;

fn status_reason(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown")
}

/// `may_minihttp` only takes `&'static str` headers, so known content types map to literals.
fn content_type_header(content_type: &'static str) -> &'static str {
    match content_type {
        "text/html; charset=utf-8" => "Content-Type: text/html; charset=utf-8",
        "text/plain" => "Content-Type: text/plain; charset=utf-8",
        "text/css" => "Content-Type: text/css",
        "application/javascript" => "Content-Type: application/javascript",
        "application/json" => "Content-Type: application/json",
        "image/svg+xml" => "Content-Type: image/svg+xml",
        "image/png" => "Content-Type: image/png",
        "image/x-icon" => "Content-Type: image/x-icon",
        "audio/mpeg" => "Content-Type: audio/mpeg",
        _ => "Content-Type: application/octet-stream",
    }
}

pub fn write_html(res: &mut Response, status: u16, body: String) {
    res.status_code(status as usize, status_reason(status));
    res.header(content_type_header("text/html; charset=utf-8"));
    res.body_vec(body.into_bytes());
}

pub fn write_text(res: &mut Response, status: u16, body: &str) {
    res.status_code(status as usize, status_reason(status));
    res.header(content_type_header("text/plain"));
    res.body_vec(body.as_bytes().to_vec());
}

pub fn write_json(res: &mut Response, status: u16, body: &serde_json::Value) {
    res.status_code(status as usize, status_reason(status));
    res.header(content_type_header("application/json"));
    res.body_vec(body.to_string().into_bytes());
}

pub fn write_bytes(res: &mut Response, content_type: &'static str, body: Vec<u8>) {
    res.status_code(200, "OK");
    res.header(content_type_header(content_type));
    res.body_vec(body);
}
