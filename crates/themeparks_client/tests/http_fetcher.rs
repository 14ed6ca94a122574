//! Fetchers against a throwaway local HTTP server.

use common::Error;
use std::io::{Read, Write};
use std::time::{Duration, Instant};
use themeparks_client::{BlockingFetch, BlockingHttpFetcher, Fetch, HttpFetcher};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn http_response(status_line: &str, body: &str) -> String {
    format!(
        "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    )
}

fn end_of_headers(buf: &[u8]) -> bool {
    buf.windows(4).any(|w| w == b"\r\n\r\n")
}

/// Serve a single canned response; the join handle yields the raw request.
async fn serve_once(
    status_line: &'static str,
    body: &'static str,
) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        while !end_of_headers(&request) {
            let n = socket.read(&mut chunk).await.expect("read");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
        }
        socket
            .write_all(http_response(status_line, body).as_bytes())
            .await
            .expect("write");
        let _ = socket.shutdown().await;
        String::from_utf8_lossy(&request).into_owned()
    });

    (format!("http://{}/v1/", addr), handle)
}

/// Answer `count` requests in turn with the same body.
async fn serve_many(count: usize, body: &'static str) -> (String, tokio::task::JoinHandle<usize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let handle = tokio::spawn(async move {
        let mut served = 0;
        for _ in 0..count {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !end_of_headers(&request) {
                let n = socket.read(&mut chunk).await.expect("read");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
            }
            socket
                .write_all(http_response("HTTP/1.1 200 OK", body).as_bytes())
                .await
                .expect("write");
            let _ = socket.shutdown().await;
            served += 1;
        }
        served
    });

    (format!("http://{}", addr), handle)
}

#[tokio::test]
async fn test_fetch_decodes_json_and_sends_accept_header() {
    let (base_url, server) = serve_once(
        "HTTP/1.1 200 OK",
        r#"{"name":"Epcot","liveData":[]}"#,
    )
    .await;
    let fetcher = HttpFetcher::new(&base_url);

    let value = fetcher.fetch("/entity/abc/live").await.expect("fetch");
    assert_eq!(value["name"], "Epcot");
    assert!(fetcher.is_open());

    let request = server.await.expect("server task").to_lowercase();
    assert!(request.starts_with("get /v1/entity/abc/live http/1.1"));
    assert!(request.contains("accept: application/json"));

    Fetch::close(&fetcher);
    assert!(!fetcher.is_open());
}

#[tokio::test]
async fn test_non_success_status_is_an_api_error() {
    let (base_url, server) = serve_once(
        "HTTP/1.1 503 Service Unavailable",
        r#"{"error":"upstream down"}"#,
    )
    .await;
    let fetcher = HttpFetcher::new(&base_url);

    let err = fetcher
        .fetch("/destinations")
        .await
        .expect_err("503 should fail");
    match err {
        Error::ThemeParksApi { status, message } => {
            assert_eq!(status, 503);
            assert!(message.contains("upstream down"));
        }
        other => panic!("unexpected error: {other}"),
    }
    server.await.expect("server task");
}

#[tokio::test]
async fn test_undecodable_body_is_a_json_error() {
    let (base_url, server) = serve_once("HTTP/1.1 200 OK", "<html>oops</html>").await;
    let fetcher = HttpFetcher::new(&base_url);

    let err = fetcher.fetch("/destinations").await.expect_err("not json");
    assert!(matches!(err, Error::Json(_)));
    assert!(err.is_transport());
    server.await.expect("server task");
}

#[tokio::test]
async fn test_connection_refused_is_an_http_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let fetcher = HttpFetcher::new(&format!("http://{}", addr));
    let err = fetcher
        .fetch("/destinations")
        .await
        .expect_err("nothing is listening");
    assert!(matches!(err, Error::Http(_)));
}

#[test]
fn test_blocking_fetch_round_trip() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let server = std::thread::spawn(move || {
        let (mut socket, _) = listener.accept().expect("accept");
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        while !end_of_headers(&request) {
            let n = socket.read(&mut chunk).expect("read");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
        }
        let body = r#"{"children":[{"id":"tot"}]}"#;
        socket
            .write_all(http_response("HTTP/1.1 200 OK", body).as_bytes())
            .expect("write");
        String::from_utf8_lossy(&request).into_owned()
    });

    let fetcher = BlockingHttpFetcher::new(&format!("http://{}", addr));
    let value = fetcher.fetch("/entity/hs/children").expect("fetch");
    assert_eq!(value["children"][0]["id"], "tot");

    let request = server.join().expect("server thread").to_lowercase();
    assert!(request.starts_with("get /entity/hs/children http/1.1"));
    assert!(request.contains("accept: application/json"));

    BlockingFetch::close(&fetcher);
    assert!(!fetcher.is_open());
}

#[tokio::test]
async fn test_request_budget_delays_but_never_fails() {
    let (base_url, server) = serve_many(3, r#"{"destinations":[]}"#).await;
    let fetcher = HttpFetcher::new(&base_url).with_rate_limit(1);

    let started = Instant::now();
    for _ in 0..3 {
        let value = fetcher.fetch("/destinations").await.expect("paced fetch");
        assert!(value["destinations"].is_array());
    }

    // One slot per second: the second and third requests each wait.
    assert!(started.elapsed() >= Duration::from_millis(1500));
    assert_eq!(server.await.expect("server task"), 3);
}
