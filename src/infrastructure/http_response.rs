// HTTP response utilities with optional Brotli encoding
use async_compression::tokio::bufread::BrotliEncoder;
use axum::{
    body::Body,
    http::{HeaderMap, Response, StatusCode, header},
};
use tokio::io::AsyncReadExt;

/// Whether the client advertised Brotli support with a non-zero quality.
pub fn accepts_brotli(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.split(',').any(|enc| coding_quality(enc, "br") > 0.0))
        .unwrap_or(false)
}

/// Quality of one `Accept-Encoding` entry for `coding`, or 0 if it names another coding.
fn coding_quality(entry: &str, coding: &str) -> f32 {
    let mut parts = entry.split(';').map(str::trim);
    if !parts
        .next()
        .is_some_and(|name| name.eq_ignore_ascii_case(coding))
    {
        return 0.0;
    }

    // A missing or malformed q counts as 1
    parts
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("q"))
        .and_then(|(_, q)| q.trim().parse::<f32>().ok())
        .unwrap_or(1.0)
}

/// Build a `text/html` response, Brotli-compressed when `compress` is set.
pub async fn html_response(html: String, compress: bool) -> Result<Response<Body>, StatusCode> {
    let raw = html.into_bytes();

    let (body_bytes, content_encoding) = if compress {
        let mut encoder = BrotliEncoder::new(raw.as_slice());
        let mut compressed = Vec::new();
        encoder.read_to_end(&mut compressed).await.map_err(|e| {
            tracing::error!("Brotli compression error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        tracing::debug!("Compressed page {} → {} bytes", raw.len(), compressed.len());
        (compressed, Some("br"))
    } else {
        (raw, None)
    };

    let mut response_builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .header(header::CONTENT_LENGTH, body_bytes.len())
        .header(header::VARY, "accept-encoding");

    if let Some(encoding) = content_encoding {
        response_builder = response_builder.header(header::CONTENT_ENCODING, encoding);
    }

    response_builder.body(Body::from(body_bytes)).map_err(|e| {
        tracing::error!("Response build error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}
