use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use std::path::Path;

pub const NOT_FOUND_BODY: &str = "Not Found";

/// Content type for a file, chosen from its extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("html") => "text/html; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        _ => "application/octet-stream",
    }
}

pub fn not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        NOT_FOUND_BODY,
    )
        .into_response()
}

/// Read a file from disk and serve it. Any read failure is a 404.
pub async fn serve_file(path: &Path) -> Response {
    match tokio::fs::read(path).await {
        Ok(content) => {
            log::debug!("📄 Serving {} ({} bytes)", path.display(), content.len());
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, content_type_for(path))],
                content,
            )
                .into_response()
        }
        Err(e) => {
            log::debug!("📄 Cannot read {}: {}", path.display(), e);
            not_found_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use std::path::PathBuf;

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for(Path::new("index.html")), "text/html; charset=utf-8");
        assert_eq!(content_type_for(Path::new("INDEX.HTML")), "text/html; charset=utf-8");
        assert_eq!(content_type_for(Path::new("app.js")), "application/javascript; charset=utf-8");
        assert_eq!(content_type_for(Path::new("site.css")), "text/css; charset=utf-8");
        assert_eq!(content_type_for(Path::new("logo.png")), "application/octet-stream");
        assert_eq!(content_type_for(Path::new("README")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_serves_existing_file() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("public/index.html");

        let response = serve_file(&path).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("<html"));
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let response = serve_file(Path::new("/definitely/not/here.html")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Not Found");
    }

    #[tokio::test]
    async fn test_directory_is_not_found() {
        let response = serve_file(Path::new(env!("CARGO_MANIFEST_DIR"))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
