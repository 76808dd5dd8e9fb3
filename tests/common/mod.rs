use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use futures::StreamExt;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};
use tower::ServiceExt;
use uuid::Uuid;

use cinesocial_games_back::{
    config::{AppConfig, GameDefinition, GameType},
    dao::room_store::{MemoryRoomStore, RoomStore},
    identity::{USER_ID_HEADER, USERNAME_HEADER},
    routes,
    state::{AppState, SharedState},
};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Secret word of every round played in tests.
pub const WORD: &str = "ELEPHANT";

/// Authenticated caller forwarded by the gateway.
pub struct TestUser {
    pub id: Uuid,
    pub name: &'static str,
}

impl TestUser {
    pub fn new(name: &'static str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
        }
    }
}

/// Catalog with a single two-player draw & guess game.
pub fn test_config() -> AppConfig {
    AppConfig::from_games(vec![GameDefinition {
        slug: "draw_guess".into(),
        name: "Draw & Guess".into(),
        description: "Draw the word, guess the word".into(),
        game_type: GameType::DrawGuess,
        min_players: 2,
        max_players: 8,
        duration_minutes: 15,
        points: 100,
        is_active: true,
        words: vec![WORD.into()],
    }])
}

pub fn memory_state() -> SharedState {
    AppState::with_store(test_config(), Arc::new(MemoryRoomStore::new()) as Arc<dyn RoomStore>)
}

/// Send one request through the router and decode the JSON body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    user: Option<&TestUser>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder
            .header(USER_ID_HEADER, user.id.to_string())
            .header(USERNAME_HEADER, user.name);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Create a room hosted by `host` and return its id.
pub async fn create_room(app: &Router, host: &TestUser) -> Uuid {
    let (status, body) = send(
        app,
        Method::POST,
        "/rooms",
        Some(host),
        Some(serde_json::json!({ "name": "Movie night" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().unwrap().parse().unwrap()
}

/// Join `room_id` as `user` and return the new player's id.
pub async fn join_room(app: &Router, room_id: Uuid, user: &TestUser) -> Uuid {
    let (status, body) =
        send(app, Method::POST, &format!("/rooms/{room_id}/join"), Some(user), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let player = body["players"]
        .as_array()
        .unwrap()
        .iter()
        .find(|player| player["user_id"] == user.id.to_string())
        .unwrap();
    player["id"].as_str().unwrap().parse().unwrap()
}

/// Room with `host` and a ready `guest`, started so that `host` draws round 1.
pub async fn started_room(app: &Router, host: &TestUser, guest: &TestUser) -> Uuid {
    let room_id = create_room(app, host).await;
    let guest_player = join_room(app, room_id, guest).await;
    let (status, _) =
        send(app, Method::POST, &format!("/players/{guest_player}/ready"), Some(guest), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) =
        send(app, Method::POST, &format!("/rooms/{room_id}/start"), Some(host), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    room_id
}

/// Real listener serving the application, for WebSocket tests.
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: SharedState,
    pub app: Router,
    _handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn new() -> Self {
        let state = memory_state();
        let app = routes::app(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let served = app.clone();
        let handle = tokio::spawn(async move {
            axum::serve(listener, served).await.unwrap();
        });

        Self {
            addr,
            state,
            app,
            _handle: handle,
        }
    }

    pub fn ws_url(&self, room_id: Uuid, user: &TestUser) -> String {
        format!(
            "ws://{}/ws/rooms/{room_id}?user_id={}&username={}",
            self.addr, user.id, user.name
        )
    }

    pub async fn connect(&self, room_id: Uuid, user: &TestUser) -> WsStream {
        let (stream, _) = tokio_tungstenite::connect_async(self.ws_url(room_id, user))
            .await
            .unwrap();
        stream
    }
}

/// Read the next JSON event (5s timeout).
pub async fn read_event(stream: &mut WsStream) -> Value {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    return serde_json::from_str(text.as_str()).unwrap();
                }
                Some(Ok(Message::Close(_))) => panic!("WebSocket closed unexpectedly"),
                Some(Err(e)) => panic!("WebSocket error: {e}"),
                None => panic!("WebSocket stream ended"),
                _ => continue,
            }
        }
    })
    .await
    .expect("Timed out waiting for WebSocket event")
}

/// Read events until one of type `kind` arrives.
pub async fn read_until(stream: &mut WsStream, kind: &str) -> Value {
    loop {
        let event = read_event(stream).await;
        if event["type"] == kind {
            return event;
        }
    }
}
