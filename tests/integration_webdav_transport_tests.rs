use webdav_fs::services::webdav::{Body, WebDAVConfig, WebDAVConnection};
use webdav_fs::{WebDavError, XmlTree};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONTENT_TYPE: &str = "text/xml; charset=UTF-8";

fn create_connection(mock_server: &MockServer) -> WebDAVConnection {
    let config = WebDAVConfig::new(format!("{}/dav/", mock_server.uri())).with_timeout(10);
    WebDAVConnection::new(config).expect("Failed to create WebDAV connection")
}

/// Runs blocking client code on a plain OS thread, outside any runtime
async fn off_runtime<T, F>(f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = tokio::sync::oneshot::channel();
    std::thread::spawn(move || {
        let _ = tx.send(f());
    });
    rx.await.expect("blocking worker panicked")
}

#[tokio::test]
async fn test_get_returns_text_and_sends_content_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dav/notes.txt"))
        .and(header("Content-Type", CONTENT_TYPE))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello world"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let connection = create_connection(&mock_server);
    let url = format!("{}/dav/notes.txt", mock_server.uri());
    let text = connection.get(&url).await.unwrap();

    assert_eq!(text, "hello world");
}

#[tokio::test]
async fn test_propfind_sets_depth_and_parses_xml() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PROPFIND"))
        .and(path("/dav/"))
        .and(header("Depth", "1"))
        .and(header("Content-Type", CONTENT_TYPE))
        .respond_with(ResponseTemplate::new(207).set_body_string(
            r#"<?xml version="1.0" encoding="utf-8"?>
<d:multistatus xmlns:d="DAV:"><d:response><d:href>/dav/</d:href></d:response></d:multistatus>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let connection = create_connection(&mock_server);
    let body = connection
        .propfind(&format!("{}/dav/", mock_server.uri()))
        .await
        .unwrap();

    let root = body.as_xml().expect("PROPFIND body should be XML");
    assert_eq!(root.local_name(), "multistatus");
    assert_eq!(root.elements().count(), 1);
}

#[tokio::test]
async fn test_propfind_with_non_xml_body_returns_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PROPFIND"))
        .respond_with(ResponseTemplate::new(200).set_body_string("plain words"))
        .mount(&mock_server)
        .await;

    let connection = create_connection(&mock_server);
    let body = connection
        .propfind(&format!("{}/dav/", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(body, Body::Text("plain words".to_string()));
}

#[tokio::test]
async fn test_put_sends_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/dav/upload.txt"))
        .and(header("Content-Type", CONTENT_TYPE))
        .and(body_string("file contents"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let connection = create_connection(&mock_server);
    let url = format!("{}/dav/upload.txt", mock_server.uri());
    connection.put(&url, "file contents").await.unwrap();
}

#[tokio::test]
async fn test_move_sets_destination_and_overwrite_true() {
    let mock_server = MockServer::start().await;
    let destination = format!("{}/dav/renamed.txt", mock_server.uri());

    Mock::given(method("MOVE"))
        .and(path("/dav/old.txt"))
        .and(header("Content-Type", CONTENT_TYPE))
        .and(header("Destination", destination.as_str()))
        .and(header("Overwrite", "T"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let connection = create_connection(&mock_server);
    let url = format!("{}/dav/old.txt", mock_server.uri());
    connection.move_to(&url, &destination, true).await.unwrap();
}

#[tokio::test]
async fn test_copy_sets_overwrite_false() {
    let mock_server = MockServer::start().await;
    let destination = format!("{}/dav/copy.txt", mock_server.uri());

    Mock::given(method("COPY"))
        .and(path("/dav/original.txt"))
        .and(header("Content-Type", CONTENT_TYPE))
        .and(header("Destination", destination.as_str()))
        .and(header("Overwrite", "F"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let connection = create_connection(&mock_server);
    let url = format!("{}/dav/original.txt", mock_server.uri());
    connection.copy_to(&url, &destination, false).await.unwrap();
}

#[tokio::test]
async fn test_mkcol_accepts_created() {
    let mock_server = MockServer::start().await;

    Mock::given(method("MKCOL"))
        .and(path("/dav/newdir"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let connection = create_connection(&mock_server);
    let url = format!("{}/dav/newdir", mock_server.uri());
    assert_eq!(connection.mkcol(&url).await.unwrap(), "");
}

#[tokio::test]
async fn test_delete_no_content_is_reported_as_error() {
    // 204 is outside the accepted set
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/dav/gone.txt"))
        .and(header("Content-Type", CONTENT_TYPE))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let connection = create_connection(&mock_server);
    let url = format!("{}/dav/gone.txt", mock_server.uri());
    let err = connection.delete(&url).await.unwrap_err();

    match err {
        WebDavError::Status { code, message, .. } => {
            assert_eq!(code, 204);
            assert_eq!(message, "No Content");
        }
        other => panic!("Expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_not_found_keeps_response_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("nothing here"))
        .mount(&mock_server)
        .await;

    let connection = create_connection(&mock_server);
    let url = format!("{}/dav/missing.txt", mock_server.uri());
    let err = connection.get(&url).await.unwrap_err();

    assert_eq!(err.http_status(), Some(404));
    assert!(matches!(err, WebDavError::Status { ref body, .. } if body == "nothing here"));
}

#[tokio::test]
async fn test_unregistered_status_uses_code_as_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(599).set_body_string("odd gateway"))
        .mount(&mock_server)
        .await;

    let connection = create_connection(&mock_server);
    let url = format!("{}/dav/odd.txt", mock_server.uri());
    let err = connection.get(&url).await.unwrap_err();

    match err {
        WebDavError::Status { code, message, body } => {
            assert_eq!(code, 599);
            assert!(message.contains("599"), "message was {:?}", message);
            assert_eq!(body, "odd gateway");
        }
        other => panic!("Expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_blocking_get_ignores_http_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dav/missing.txt"))
        .respond_with(ResponseTemplate::new(404).set_body_string("nothing here"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let connection = create_connection(&mock_server);
    let url = format!("{}/dav/missing.txt", mock_server.uri());
    let text = off_runtime(move || connection.get_blocking(&url)).await.unwrap();

    assert_eq!(text, "nothing here");
}

#[tokio::test]
async fn test_blocking_put_and_move() {
    let mock_server = MockServer::start().await;
    let destination = format!("{}/dav/b.txt", mock_server.uri());

    Mock::given(method("PUT"))
        .and(path("/dav/a.txt"))
        .and(body_string("abc"))
        .and(header("Content-Type", CONTENT_TYPE))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("MOVE"))
        .and(path("/dav/a.txt"))
        .and(header("Overwrite", "F"))
        .and(header("Content-Type", CONTENT_TYPE))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let connection = create_connection(&mock_server);
    let url = format!("{}/dav/a.txt", mock_server.uri());
    off_runtime(move || {
        connection.put_blocking(&url, "abc")?;
        connection.move_to_blocking(&url, &destination, false)
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let connection = WebDAVConnection::new(WebDAVConfig::new("http://127.0.0.1:9/")).unwrap();
    let err = connection.get("http://127.0.0.1:9/file.txt").await.unwrap_err();
    assert!(matches!(err, WebDavError::Transport(_)));
}
