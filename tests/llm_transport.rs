//! Integration tests for the language-model resolver over real HTTP
//!
//! A local TCP listener plays the chat completion service so the client,
//! resolver and navigator are exercised end to end without network access.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use voice_navigator::core::config::{LlmConfig, NavigationConfig};
use voice_navigator::core::error::NavError;
use voice_navigator::core::types::{ElementKind, NavigationState};
use voice_navigator::graph::{ElementGraph, FlatNode, NavigableElement};
use voice_navigator::llm::{DecisionAction, IntentResolver, LlmClient, LlmIntentResolver};
use voice_navigator::navigation::Navigator;
use voice_navigator::scene::SceneTree;

/// Canned HTTP reply
struct Reply {
    code: u16,
    body: String,
}

impl Reply {
    fn ok(content: &str) -> Self {
        let body = serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        });
        Self {
            code: 200,
            body: body.to_string(),
        }
    }

    fn error(code: u16, body: &str) -> Self {
        Self {
            code,
            body: body.to_string(),
        }
    }
}

/// Read one request, returning its body
async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + length {
                return String::from_utf8_lossy(&buf[header_end + 4..]).into_owned();
            }
        }
    }
    String::new()
}

/// Serve `replies` in order, one connection each; returns the base URL
async fn serve(replies: Vec<Reply>) -> (String, Arc<Mutex<Vec<String>>>, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/v1/chat/completions", listener.local_addr().unwrap());
    let bodies = Arc::new(Mutex::new(Vec::new()));
    let seen = bodies.clone();

    let handle = tokio::spawn(async move {
        for reply in replies {
            let (mut socket, _) = listener.accept().await.unwrap();
            let body = read_request(&mut socket).await;
            seen.lock().push(body);

            let reason = if reply.code == 200 { "OK" } else { "Error" };
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                reply.code,
                reason,
                reply.body.len(),
                reply.body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        }
    });

    (url, bodies, handle)
}

fn client(url: &str) -> LlmClient {
    let config = LlmConfig {
        api_url: url.to_string(),
        timeout_secs: 5,
        ..LlmConfig::default()
    };
    LlmClient::with_key(&config, "test-key".into()).unwrap()
}

fn nodes() -> Vec<FlatNode> {
    vec![
        FlatNode { id: 0, name: "Inventory".into(), kind: ElementKind::Menu, parent: None },
        FlatNode { id: 1, name: "Laser Gun".into(), kind: ElementKind::Button, parent: Some(0) },
    ]
}

#[tokio::test]
async fn test_resolver_parses_service_reply() {
    let (url, bodies, server) = serve(vec![Reply::ok(
        r#"{"Action":"navigate","SelectedId":1,"Confidence":0.92,"Rationale":"Laser.","PathToSelection":[0,1]}"#,
    )])
    .await;
    let resolver = LlmIntentResolver::new(client(&url), true);

    let decision = resolver.resolve("laser please", &nodes()).await.unwrap();
    assert_eq!(decision.action, DecisionAction::Navigate);
    assert_eq!(decision.target(), Some(1));
    assert_eq!(decision.path(), &[0, 1]);
    server.await.unwrap();

    // The request carried the utterance and the node list
    let request: serde_json::Value = serde_json::from_str(&bodies.lock()[0]).unwrap();
    assert_eq!(request["response_format"]["type"], "json_object");
    let user: serde_json::Value =
        serde_json::from_str(request["messages"][1]["content"].as_str().unwrap()).unwrap();
    assert_eq!(user["PlayerUtterance"], "laser please");
    assert_eq!(user["Nodes"][1]["Name"], "Laser Gun");
    assert_eq!(user["Nodes"][1]["Type"], "button");
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let (url, _, server) = serve(vec![Reply::error(500, "overloaded")]).await;
    let resolver = LlmIntentResolver::new(client(&url), true);

    let result = resolver.resolve("laser", &nodes()).await;
    assert!(matches!(
        result,
        Err(NavError::Status { code: 500, ref body }) if body == "overloaded"
    ));
    server.await.unwrap();
}

#[tokio::test]
async fn test_unparseable_content_is_an_error() {
    let (url, _, server) = serve(vec![Reply::ok("Sure! I would click the laser.")]).await;
    let resolver = LlmIntentResolver::new(client(&url), true);

    assert!(resolver.resolve("laser", &nodes()).await.is_err());
    server.await.unwrap();
}

#[tokio::test]
async fn test_transport_failure_returns_navigator_to_idle() {
    let (url, _, server) = serve(vec![
        Reply::ok(
            r#"{"Action":"navigate","SelectedId":1,"Confidence":0.9,"Rationale":"Laser.","PathToSelection":[0,1]}"#,
        ),
        Reply::error(503, "try later"),
    ])
    .await;

    let clicks = Arc::new(Mutex::new(0usize));
    let counter = clicks.clone();
    let mut tree = SceneTree::new();
    let menu = tree.add_root("Inventory");
    let laser = tree.add_child(menu, "Laser Gun");
    let mut graph = ElementGraph::new(tree.shared());
    graph.register(NavigableElement::new(menu, "Inventory", ElementKind::Menu));
    graph.register(
        NavigableElement::new(laser, "Laser Gun", ElementKind::Button)
            .with_activation(move || *counter.lock() += 1),
    );

    let config = NavigationConfig {
        step_delay_ms: 0,
        diagnostics_path: Default::default(),
        ..NavigationConfig::default()
    };
    let resolver = Arc::new(LlmIntentResolver::new(client(&url), true));
    let navigator = Navigator::new(graph.shared(), resolver, config);

    navigator.submit("laser");
    navigator.wait_idle().await;
    assert_eq!(*clicks.lock(), 1);

    navigator.submit("something");
    assert_eq!(navigator.state(), NavigationState::Requesting);
    navigator.wait_idle().await;
    server.await.unwrap();

    let status = navigator.status();
    assert_eq!(status.state, NavigationState::Idle);
    assert_eq!(status.selected_label, "Laser Gun");
    assert_eq!(status.selected_reason, "Laser.");
    assert_eq!(*clicks.lock(), 1);
}
