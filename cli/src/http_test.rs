use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use super::*;

/// A captured request line and JSON body.
struct Captured {
    request_line: String,
    body: String,
}

/// Serve one canned HTTP response on a random port.
async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let captured = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.expect("write");
        socket.shutdown().await.expect("shutdown");
        let _ = tx.send(captured);
    });

    (format!("http://{addr}"), rx)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Captured {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.expect("read");
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some((head, body)) = text.split_once("\r\n\r\n") {
            let length = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if body.len() >= length || n == 0 {
                let request_line = head.lines().next().unwrap_or_default().to_owned();
                return Captured { request_line, body: body.to_owned() };
            }
        }
        if n == 0 {
            return Captured { request_line: String::new(), body: text };
        }
    }
}

fn history_request() -> HistoryRequest {
    HistoryRequest { from: "me".to_owned(), to: "peer-1".to_owned() }
}

// =============================================================
// fetch_history
// =============================================================

#[tokio::test]
async fn fetch_history_posts_participants_and_decodes_messages() {
    let (base, captured) =
        serve_once("200 OK", r#"[{"fromSelf":true,"message":"hi"},{"fromSelf":false,"message":"yo"}]"#).await;
    let api = HttpMessageApi::new(&base).expect("client");

    let messages = api.fetch_history(&history_request()).await.expect("history");

    assert_eq!(
        messages,
        vec![
            ChatMessage { from_self: true, message: "hi".to_owned() },
            ChatMessage { from_self: false, message: "yo".to_owned() },
        ]
    );
    let captured = captured.await.expect("captured");
    assert!(captured.request_line.starts_with("POST /api/messages/getmsg "));
    let body: serde_json::Value = serde_json::from_str(&captured.body).expect("json body");
    assert_eq!(body, serde_json::json!({"from": "me", "to": "peer-1"}));
}

#[tokio::test]
async fn fetch_history_maps_error_status() {
    let (base, _captured) = serve_once("500 Internal Server Error", r#"{"msg":"db down"}"#).await;
    let api = HttpMessageApi::new(&base).expect("client");

    let err = api.fetch_history(&history_request()).await.expect_err("status error");

    assert!(matches!(err, PanelError::Status { status: 500, ref body } if body.contains("db down")));
}

#[tokio::test]
async fn fetch_history_rejects_non_array_body() {
    let (base, _captured) = serve_once("200 OK", r#"{"msg":"not a list"}"#).await;
    let api = HttpMessageApi::new(&base).expect("client");

    let err = api.fetch_history(&history_request()).await.expect_err("decode error");

    assert!(matches!(err, PanelError::Decode(_)));
}

#[tokio::test]
async fn unreachable_server_is_request_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let api = HttpMessageApi::new(&format!("http://{addr}")).expect("client");

    let err = api.fetch_history(&history_request()).await.expect_err("refused");

    assert!(matches!(err, PanelError::Request(_)));
}

// =============================================================
// send_message / contacts
// =============================================================

#[tokio::test]
async fn send_message_posts_full_body_and_ignores_ack() {
    let (base, captured) = serve_once("200 OK", r#"{"msg":"Message added successfully."}"#).await;
    let api = HttpMessageApi::new(&base).expect("client");
    let request = SendRequest { from: "me".to_owned(), to: "peer-1".to_owned(), message: "hello".to_owned() };

    api.send_message(&request).await.expect("sent");

    let captured = captured.await.expect("captured");
    assert!(captured.request_line.starts_with("POST /api/messages/addmsg "));
    let body: serde_json::Value = serde_json::from_str(&captured.body).expect("json body");
    assert_eq!(body, serde_json::json!({"from": "me", "to": "peer-1", "message": "hello"}));
}

#[tokio::test]
async fn contacts_reads_user_list() {
    let (base, captured) = serve_once("200 OK", r#"[{"_id":"p1","username":"bob","avatarImage":"PHN2Zz4="}]"#).await;
    let api = HttpMessageApi::new(&base).expect("client");

    let contacts = api.contacts("me").await.expect("contacts");

    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].username, "bob");
    let captured = captured.await.expect("captured");
    assert!(captured.request_line.starts_with("GET /api/auth/allusers/me "));
}
