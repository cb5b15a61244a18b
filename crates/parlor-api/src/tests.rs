//! HTTP-level tests against a local mock server.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use httpmock::{
    Method::{GET, POST, PUT},
    MockServer,
};
use parlor_core::{CollectionKind, Cursor, PageQuery, TimeFrame};
use serde_json::{Value, json};

use crate::{ApiClient, Error, FileQuery};

fn test_client(base_url: &str) -> ApiClient {
    ApiClient::with_base_url(base_url, "test-token")
}

fn user_json(id: u64, name: &str) -> Value {
    json!({ "id": id, "name": name })
}

fn feed_post_json(id: u64) -> Value {
    json!({
        "id": id,
        "room_id": 1,
        "message": format!("post {id}"),
        "author": user_json(2, "alice"),
        "likes": 0,
        "created_at": "2024-01-01T00:00:00Z"
    })
}

fn message_json(id: u64) -> Value {
    json!({
        "id": id,
        "room_id": 1,
        "message": format!("msg {id}"),
        "user": user_json(2, "alice"),
        "created_at": "2024-01-01T00:00:00Z"
    })
}

#[tokio::test]
async fn me_sends_bearer_token_and_unwraps_envelope() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/user")
                .header("authorization", "Bearer test-token");
            then.status(200).json_body(json!({ "data": user_json(7, "alice") }));
        })
        .await;

    let client = test_client(&server.base_url());
    let user = client.user().me().await.unwrap();

    assert_eq!(user.id, 7);
    assert_eq!(user.name, "alice");
    mock.assert();
}

#[tokio::test]
async fn backend_rejection_surfaces_structured_error() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/user");
            then.status(403)
                .json_body(json!({ "error": { "code": "access_denied", "message": "not allowed" } }));
        })
        .await;

    let client = test_client(&server.base_url());
    let error = client.user().me().await.unwrap_err();

    match error {
        Error::Api { source, body } => {
            assert_eq!(source.status, 403);
            assert_eq!(source.code.as_deref(), Some("access_denied"));
            assert_eq!(source.message, "not allowed");
            assert!(body.as_deref().is_some_and(|b| b.contains("access_denied")));
        },
        other => panic!("unexpected error variant: {other:?}"),
    }

    mock.assert();
}

#[tokio::test]
async fn feed_list_sends_room_cursor_and_take() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/feed")
                .query_param("room_id", "1")
                .query_param("cursor", "42")
                .query_param("take", "10");
            then.status(200)
                .json_body(json!({ "data": [feed_post_json(43), feed_post_json(44)] }));
        })
        .await;

    let client = test_client(&server.base_url());
    let query = PageQuery { cursor: Some(Cursor::Id(42)), take: 10 };
    let posts = client.feed(1).list(query).await.unwrap();

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].id, 43);
    mock.assert();
}

#[tokio::test]
async fn files_list_uses_skip_take_and_filters() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/files")
                .query_param("room_id", "1")
                .query_param("parent_id", "folder-a")
                .query_param("search_file_name", "report")
                .query_param("skip", "50")
                .query_param("take", "50");
            then.status(200).json_body(json!({ "data": [] }));
        })
        .await;

    let client = test_client(&server.base_url());
    let query = PageQuery { cursor: Some(Cursor::Offset(50)), take: 50 };
    let filter = FileQuery {
        parent_id: Some("folder-a".to_owned()),
        search: Some("report".to_owned()),
    };
    let entries = client.files(1).list(query, &filter).await.unwrap();

    assert!(entries.is_empty());
    mock.assert();
}

#[tokio::test]
async fn newer_than_sets_listener_flag() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/messages")
                .query_param("room_id", "1")
                .query_param("listener", "true")
                .query_param("cursor", "99")
                .query_param("take", "10");
            then.status(200).json_body(json!({ "data": [message_json(100)] }));
        })
        .await;

    let client = test_client(&server.base_url());
    let take = CollectionKind::Messages.page_size();
    let messages = client.messages(1).newer_than(Some(99), take).await.unwrap();

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id, 100);
    mock.assert();
}

#[tokio::test]
async fn send_message_posts_body_with_room_param() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/messages")
                .query_param("room_id", "1")
                .json_body(json!({ "message": "hello" }));
            then.status(200).json_body(json!({ "data": message_json(5) }));
        })
        .await;

    let client = test_client(&server.base_url());
    let message = client.messages(1).send("hello", None).await.unwrap();

    assert_eq!(message.id, 5);
    mock.assert();
}

#[tokio::test]
async fn like_sends_feed_id_as_put() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PUT).path("/feed/like").query_param("feed_id", "9");
            then.status(200).json_body(json!({ "data": true }));
        })
        .await;

    let client = test_client(&server.base_url());
    client.feed(1).like(9).await.unwrap();
    mock.assert();
}

#[tokio::test]
async fn create_batch_wraps_files_in_payload() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/files").json_body_partial(
                json!({
                    "files": [{ "id": "abc", "file_name": "a.png" }]
                })
                .to_string(),
            );
            then.status(200).json_body(json!({ "data": true }));
        })
        .await;

    let client = test_client(&server.base_url());
    let entry = parlor_core::NewFileEntry {
        id: "abc".to_owned(),
        file_name: "a.png".to_owned(),
        file_extension: parlor_core::FileExtension::Png,
        file_type: parlor_core::FileKind::Image,
        file_size: 0.5,
        room_id: 1,
        parent_id: None,
    };
    client.files(1).create_batch(&[entry]).await.unwrap();
    mock.assert();
}

#[tokio::test]
async fn put_object_streams_bytes_and_reports_progress() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PUT).path("/bucket/files/abc.png");
            then.status(200);
        })
        .await;

    let client = test_client(&server.base_url());
    let progress: Arc<Mutex<Vec<f64>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&progress);

    let bytes = bytes::Bytes::from(vec![0_u8; 200 * 1024]);
    let put_url = format!("{}/bucket/files/abc.png", server.base_url());
    client
        .put_object(&put_url, bytes, move |fraction| {
            sink.lock().unwrap().push(fraction);
        })
        .await
        .unwrap();

    let progress = progress.lock().unwrap();
    assert_eq!(progress.first().copied(), Some(0.0));
    assert_eq!(progress.last().copied(), Some(1.0));
    assert!(progress.windows(2).all(|w| w[0] <= w[1]), "progress is monotonic");
    mock.assert();
}

#[tokio::test]
async fn analytics_sends_range_and_time_frame() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/analytics")
                .query_param("room_id", "1")
                .query_param("start_date", "2024-01-01T00:00:00+00:00")
                .query_param("end_date", "2024-06-30T00:00:00+00:00")
                .query_param("time_frame", "month");
            then.status(200).json_body(json!({
                "data": {
                    "basic": { "no_of_members": 12, "no_of_messages": 480 },
                    "messages": [
                        { "date": "2024-01-01", "date_formatted": "Jan 2024", "count": 80 }
                    ]
                }
            }));
        })
        .await;

    let client = test_client(&server.base_url());
    let start = DateTime::parse_from_rfc3339("2024-01-01T00:00:00+00:00")
        .unwrap()
        .with_timezone(&Utc);
    let end = DateTime::parse_from_rfc3339("2024-06-30T00:00:00+00:00")
        .unwrap()
        .with_timezone(&Utc);
    let analytics = client.analytics(1).get(start, end, TimeFrame::Month).await.unwrap();

    assert_eq!(analytics.basic.no_of_members, 12);
    assert_eq!(analytics.basic.no_of_messages, 480);
    assert_eq!(analytics.messages[0].count, 80);
    assert!(analytics.user_growth.is_empty());
    mock.assert();
}

#[tokio::test]
async fn signed_url_requests_file_path() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/get_signed_url")
                .query_param("file_path", "files/abc.png");
            then.status(200).json_body(json!({
                "data": {
                    "put_url": "https://storage.example/put/abc",
                    "get_url": "https://storage.example/get/abc"
                }
            }));
        })
        .await;

    let client = test_client(&server.base_url());
    let signed = client.signed_url("files/abc.png").await.unwrap();

    assert_eq!(signed.put_url, "https://storage.example/put/abc");
    assert_eq!(signed.get_url, "https://storage.example/get/abc");
    mock.assert();
}
