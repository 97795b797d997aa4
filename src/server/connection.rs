// Connection handling
// Accepts TCP connections and serves the axum router over hyper HTTP/1.

use axum::body::Body;
use axum::http::{Response, StatusCode};
use axum::Router;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use std::future::Future;
use tokio::net::{TcpListener, TcpStream};
use tower::ServiceExt;

/// Response extension asking the connection loop to drop the connection
/// instead of writing the response.
#[derive(Debug, Clone, Copy)]
pub struct AbortConnection;

/// Response that, served over a socket, closes the connection without an HTTP reply.
/// In-process callers see a bare 413.
pub fn abort_response() -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::PAYLOAD_TOO_LARGE;
    response.extensions_mut().insert(AbortConnection);
    response
}

#[derive(Debug)]
struct ConnectionAborted;

impl std::fmt::Display for ConnectionAborted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "connection aborted by handler")
    }
}

impl std::error::Error for ConnectionAborted {}

/// Accept connections until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer_addr)) => {
                        log::debug!("🔌 Accepted connection from {}", peer_addr);
                        handle_connection(stream, router.clone());
                    }
                    Err(e) => log::error!("❌ Failed to accept connection: {}", e),
                }
            }
            _ = &mut shutdown => {
                log::info!("🛑 No longer accepting connections");
                return Ok(());
            }
        }
    }
}

fn handle_connection(stream: TcpStream, router: Router) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let service = service_fn(move |req: Request<Incoming>| {
            let router = router.clone();
            async move {
                let response = router
                    .oneshot(req)
                    .await
                    .unwrap_or_else(|never| match never {});

                if response.extensions().get::<AbortConnection>().is_some() {
                    Err(ConnectionAborted)
                } else {
                    Ok(response)
                }
            }
        });

        let mut builder = http1::Builder::new();
        builder.keep_alive(true);

        if let Err(err) = builder.serve_connection(io, service).await {
            log::debug!("Connection closed with error: {}", err);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::handlers::body::MAX_BODY_BYTES;
    use crate::server::{create_router, AppState};
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    async fn spawn_server(api_key: Option<&str>) -> std::net::SocketAddr {
        let config = Config {
            port: 0,
            api_key: api_key.map(str::to_string),
            model: "test_model".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            upstream_timeout: Some(Duration::from_secs(1)),
            public_dir: PathBuf::from("public"),
        };
        let state = Arc::new(AppState::from_config(&config).unwrap());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(serve(listener, create_router(state), std::future::pending()));
        addr
    }

    #[tokio::test]
    async fn test_serves_health_over_tcp() {
        let addr = spawn_server(None).await;
        let mut stream = TcpStream::connect(addr).await.unwrap();

        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();

        let mut reply = Vec::new();
        stream.read_to_end(&mut reply).await.unwrap();
        let reply = String::from_utf8_lossy(&reply);

        assert!(reply.starts_with("HTTP/1.1 200"));
        assert!(reply.ends_with(r#"{"ok":true}"#));
    }

    #[tokio::test]
    async fn test_oversized_body_drops_connection_without_response() {
        let addr = spawn_server(Some("test_key")).await;
        let mut stream = TcpStream::connect(addr).await.unwrap();

        let total = MAX_BODY_BYTES + 1024 * 1024;
        let head = format!(
            "POST /api/analyze HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n",
            total
        );
        stream.write_all(head.as_bytes()).await.unwrap();

        let reply = tokio::time::timeout(Duration::from_secs(10), async {
            let chunk = vec![b'a'; 64 * 1024];
            let mut sent = 0;
            while sent < total {
                if stream.write_all(&chunk).await.is_err() {
                    break;
                }
                sent += chunk.len();
            }

            let mut reply = Vec::new();
            let _ = stream.read_to_end(&mut reply).await;
            reply
        })
        .await
        .expect("server should close the connection");

        assert!(!reply.starts_with(b"HTTP/"));
    }
}
