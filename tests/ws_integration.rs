#[allow(dead_code)]
mod common;

use std::time::Duration;

use axum::http::{Method, StatusCode};
use futures::SinkExt;
use serde_json::json;
use tokio_tungstenite::tungstenite::Message;
use uuid::Uuid;

use common::{
    TestServer, TestUser, WORD, WsStream, create_room, join_room, read_event, read_until, send,
    started_room,
};

async fn send_json(stream: &mut WsStream, value: serde_json::Value) {
    stream.send(Message::Text(value.to_string().into())).await.unwrap();
}

/// Wait until the room has `count` live sessions, so broadcasts reach everyone.
async fn wait_for_subscribers(server: &TestServer, room_id: Uuid, count: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while server.state.hub().subscriber_count(room_id) < count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("sessions never subscribed");
}

#[tokio::test]
async fn members_see_each_other_join() {
    let server = TestServer::new().await;
    let host = TestUser::new("alice");
    let guest = TestUser::new("bob");
    let room_id = create_room(&server.app, &host).await;
    join_room(&server.app, room_id, &guest).await;

    let mut host_ws = server.connect(room_id, &host).await;
    let joined = read_event(&mut host_ws).await;
    assert_eq!(joined["type"], "player_joined");
    assert_eq!(joined["player"], "alice");

    let _guest_ws = server.connect(room_id, &guest).await;
    let joined = read_event(&mut host_ws).await;
    assert_eq!(joined["type"], "player_joined");
    assert_eq!(joined["player"], "bob");
}

#[tokio::test]
async fn non_members_are_refused() {
    let server = TestServer::new().await;
    let host = TestUser::new("alice");
    let outsider = TestUser::new("mallory");
    let room_id = create_room(&server.app, &host).await;

    let result = tokio_tungstenite::connect_async(server.ws_url(room_id, &outsider)).await;
    assert!(result.is_err());

    let unknown_room = Uuid::new_v4();
    let result = tokio_tungstenite::connect_async(server.ws_url(unknown_room, &host)).await;
    assert!(result.is_err());
    assert_eq!(server.state.hub().subscriber_count(room_id), 0);
}

#[tokio::test]
async fn chat_is_relayed_and_persisted() {
    let server = TestServer::new().await;
    let host = TestUser::new("alice");
    let guest = TestUser::new("bob");
    let room_id = create_room(&server.app, &host).await;
    join_room(&server.app, room_id, &guest).await;

    let mut host_ws = server.connect(room_id, &host).await;
    let mut guest_ws = server.connect(room_id, &guest).await;
    wait_for_subscribers(&server, room_id, 2).await;

    send_json(&mut guest_ws, json!({ "type": "chat_message", "message": "popcorn?" })).await;
    let chat = read_until(&mut host_ws, "chat_message").await;
    assert_eq!(chat["player"], "bob");
    assert_eq!(chat["message"], "popcorn?");

    let (status, history) =
        send(&server.app, Method::GET, &format!("/rooms/{room_id}/chat"), Some(&host), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history[0]["message"], "popcorn?");
}

#[tokio::test]
async fn ready_status_is_broadcast() {
    let server = TestServer::new().await;
    let host = TestUser::new("alice");
    let guest = TestUser::new("bob");
    let room_id = create_room(&server.app, &host).await;
    join_room(&server.app, room_id, &guest).await;

    let mut host_ws = server.connect(room_id, &host).await;
    let mut guest_ws = server.connect(room_id, &guest).await;
    wait_for_subscribers(&server, room_id, 2).await;

    send_json(&mut guest_ws, json!({ "type": "ready_status", "is_ready": true })).await;
    let ready = read_until(&mut host_ws, "ready_status_changed").await;
    assert_eq!(ready["player"], "bob");
    assert_eq!(ready["is_ready"], true);

    let (status, _) = send(
        &server.app,
        Method::POST,
        &format!("/rooms/{room_id}/start"),
        Some(&host),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let started = read_until(&mut guest_ws, "game_started").await;
    assert!(started["message"].is_string());
}

#[tokio::test]
async fn correct_guess_is_broadcast_without_the_word_leaking() {
    let server = TestServer::new().await;
    let host = TestUser::new("alice");
    let guest = TestUser::new("bob");
    let room_id = started_room(&server.app, &host, &guest).await;

    let mut host_ws = server.connect(room_id, &host).await;
    let mut guest_ws = server.connect(room_id, &guest).await;
    wait_for_subscribers(&server, room_id, 2).await;

    send_json(&mut guest_ws, json!({ "type": "guess", "guess": "giraffe" })).await;
    let wrong = read_until(&mut host_ws, "guess_made").await;
    assert_eq!(wrong["is_correct"], false);
    assert_eq!(wrong["guess"], "giraffe");

    send_json(&mut guest_ws, json!({ "type": "guess", "guess": " Elephant " })).await;
    let right = read_until(&mut host_ws, "guess_made").await;
    assert_eq!(right["is_correct"], true);
    assert_eq!(right["player"], "bob");

    let (_, current) = send(
        &server.app,
        Method::GET,
        &format!("/rooms/{room_id}/rounds/current"),
        Some(&guest),
        None,
    )
    .await;
    assert_eq!(current["round_number"], 2);
    assert_eq!(current["word"], WORD);
}

#[tokio::test]
async fn drawing_from_a_guesser_is_ignored() {
    let server = TestServer::new().await;
    let host = TestUser::new("alice");
    let guest = TestUser::new("bob");
    let room_id = started_room(&server.app, &host, &guest).await;

    let mut host_ws = server.connect(room_id, &host).await;
    let mut guest_ws = server.connect(room_id, &guest).await;
    wait_for_subscribers(&server, room_id, 2).await;

    send_json(
        &mut guest_ws,
        json!({ "type": "drawing_update", "drawing_data": { "by": "bob" } }),
    )
    .await;
    send_json(&mut guest_ws, json!({ "type": "chat_message", "message": "done" })).await;
    let chat = read_until(&mut host_ws, "chat_message").await;
    assert_eq!(chat["message"], "done");

    send_json(
        &mut host_ws,
        json!({ "type": "drawing_update", "drawing_data": { "by": "alice" } }),
    )
    .await;
    let drawing = read_until(&mut guest_ws, "drawing_updated").await;
    assert_eq!(drawing["drawing_data"], json!({ "by": "alice" }));

    let (_, current) = send(
        &server.app,
        Method::GET,
        &format!("/rooms/{room_id}/rounds/current"),
        Some(&guest),
        None,
    )
    .await;
    assert_eq!(current["drawing_data"], json!({ "by": "alice" }));
}

#[tokio::test]
async fn malformed_frames_keep_the_session_open() {
    let server = TestServer::new().await;
    let host = TestUser::new("alice");
    let room_id = create_room(&server.app, &host).await;

    let mut host_ws = server.connect(room_id, &host).await;
    wait_for_subscribers(&server, room_id, 1).await;

    host_ws.send(Message::Text("not json".into())).await.unwrap();
    send_json(&mut host_ws, json!({ "type": "wave" })).await;
    send_json(&mut host_ws, json!({ "type": "chat_message", "message": "still here" })).await;

    let chat = read_until(&mut host_ws, "chat_message").await;
    assert_eq!(chat["message"], "still here");
}

#[tokio::test]
async fn disconnect_announces_departure_and_unsubscribes() {
    let server = TestServer::new().await;
    let host = TestUser::new("alice");
    let guest = TestUser::new("bob");
    let room_id = create_room(&server.app, &host).await;
    join_room(&server.app, room_id, &guest).await;

    let mut host_ws = server.connect(room_id, &host).await;
    let mut guest_ws = server.connect(room_id, &guest).await;
    wait_for_subscribers(&server, room_id, 2).await;

    guest_ws.close(None).await.unwrap();
    let left = read_until(&mut host_ws, "player_left").await;
    assert_eq!(left["player"], "bob");

    tokio::time::timeout(Duration::from_secs(5), async {
        while server.state.hub().subscriber_count(room_id) != 1 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("session was not unsubscribed");
}
