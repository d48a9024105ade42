use std::time::Duration;

use feed_api::{
    ApiSettings, FailureKind, OrderBy, PhotoService, PhotosEndpoint, ReqwestPhotoService,
};
use pretty_assertions::assert_eq;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TWO_PHOTOS: &str = r##"[
  {
    "id": "Dwu85P9SOIk",
    "created_at": "2016-05-03T11:00:28-04:00",
    "width": 2448,
    "height": 3264,
    "color": "#6E633A",
    "likes": 12,
    "description": "A man drinking a coffee.",
    "urls": {
      "raw": "https://images.unsplash.com/face-springmorning.jpg",
      "full": "https://images.unsplash.com/face-springmorning.jpg?q=75",
      "regular": "https://images.unsplash.com/face-springmorning.jpg?w=1080",
      "small": "https://images.unsplash.com/face-springmorning.jpg?w=400",
      "thumb": "https://images.unsplash.com/face-springmorning.jpg?w=200"
    },
    "user": { "username": "cristina", "name": "Cristina" }
  },
  { "id": "tAKXap853rY" }
]"##;

fn service_for(server: &MockServer) -> ReqwestPhotoService {
    let settings = ApiSettings {
        base_url: server.uri(),
        access_key: Some("test-key".to_string()),
        ..ApiSettings::default()
    };
    ReqwestPhotoService::new(settings).expect("client builds")
}

#[tokio::test]
async fn fetches_and_decodes_photos_for_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/photos"))
        .and(query_param("order_by", "popular"))
        .and(header("Authorization", "Client-ID test-key"))
        .and(header("Accept-Version", "v1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(TWO_PHOTOS, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let service = service_for(&server);
    let photos = service
        .fetch_photos(&PhotosEndpoint::photos(OrderBy::Popular))
        .await
        .expect("fetch ok");

    let ids: Vec<_> = photos.iter().map(|photo| photo.id.as_str()).collect();
    assert_eq!(ids, vec!["Dwu85P9SOIk", "tAKXap853rY"]);
    assert_eq!(photos[0].likes, 12);
    assert_eq!(
        photos[0].user.as_ref().map(|user| user.username.as_str()),
        Some("cristina")
    );
    assert_eq!(photos[1].urls.regular, "");
    assert!(photos[1].user.is_none());
}

#[tokio::test]
async fn empty_listing_is_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/photos"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
        .mount(&server)
        .await;

    let photos = service_for(&server)
        .fetch_photos(&PhotosEndpoint::photos(OrderBy::Latest))
        .await
        .expect("fetch ok");
    assert!(photos.is_empty());
}

#[tokio::test]
async fn fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/photos"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = service_for(&server)
        .fetch_photos(&PhotosEndpoint::photos(OrderBy::Latest))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(401));
    assert!(err.message.contains("401"));
}

#[tokio::test]
async fn fails_on_malformed_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/photos"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"errors":["nope"]}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let err = service_for(&server)
        .fetch_photos(&PhotosEndpoint::photos(OrderBy::Oldest))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
    assert!(err.message.starts_with("failed to decode photos"));
}

#[tokio::test]
async fn rejects_non_json_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/photos"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .mount(&server)
        .await;

    let err = service_for(&server)
        .fetch_photos(&PhotosEndpoint::photos(OrderBy::Latest))
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::UnsupportedContentType {
            content_type: "text/html".to_string()
        }
    );
}

#[tokio::test]
async fn times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/photos"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_raw("[]", "application/json"),
        )
        .mount(&server)
        .await;

    let settings = ApiSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ApiSettings::default()
    };
    let service = ReqwestPhotoService::new(settings).expect("client builds");

    let err = service
        .fetch_photos(&PhotosEndpoint::photos(OrderBy::Latest))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/photos"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("[{\"id\":\"a\"}]", "application/json"))
        .mount(&server)
        .await;

    let settings = ApiSettings {
        base_url: server.uri(),
        max_bytes: 4,
        ..ApiSettings::default()
    };
    let service = ReqwestPhotoService::new(settings).expect("client builds");

    let err = service
        .fetch_photos(&PhotosEndpoint::photos(OrderBy::Latest))
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 4,
            actual: Some(12)
        }
    );
}

#[tokio::test]
async fn invalid_base_url_is_reported_without_a_request() {
    let settings = ApiSettings {
        base_url: "not a url".to_string(),
        ..ApiSettings::default()
    };
    let service = ReqwestPhotoService::new(settings).expect("client builds");

    let err = service
        .fetch_photos(&PhotosEndpoint::photos(OrderBy::Latest))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}

/// Serves one chunked response without a Content-Length and returns the base url.
async fn serve_chunked_once(chunks: &'static [&'static str]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request: Vec<u8> = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                return;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let mut response = String::from(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
             Transfer-Encoding: chunked\r\nConnection: close\r\n\r\n",
        );
        for chunk in chunks {
            response.push_str(&format!("{:x}\r\n{}\r\n", chunk.len(), chunk));
        }
        response.push_str("0\r\n\r\n");
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn rejects_streamed_body_over_limit() {
    let base_url = serve_chunked_once(&[r#"[{"id":"a"},"#, r#"{"id":"b"}]"#]).await;
    let settings = ApiSettings {
        base_url,
        max_bytes: 16,
        ..ApiSettings::default()
    };
    let service = ReqwestPhotoService::new(settings).expect("client builds");

    let err = service
        .fetch_photos(&PhotosEndpoint::photos(OrderBy::Latest))
        .await
        .unwrap_err();
    match err.kind {
        FailureKind::TooLarge { max_bytes, actual } => {
            assert_eq!(max_bytes, 16);
            assert!(actual.is_some_and(|len| len > 16));
        }
        other => panic!("expected TooLarge, got {other:?}"),
    }
}

#[tokio::test]
async fn streamed_body_within_limit_decodes() {
    let base_url = serve_chunked_once(&[r#"[{"id":"a"},"#, r#"{"id":"b"}]"#]).await;
    let settings = ApiSettings {
        base_url,
        ..ApiSettings::default()
    };
    let service = ReqwestPhotoService::new(settings).expect("client builds");

    let photos = service
        .fetch_photos(&PhotosEndpoint::photos(OrderBy::Latest))
        .await
        .expect("fetch ok");
    let ids: Vec<_> = photos.iter().map(|photo| photo.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn connection_refused_is_network_failure() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let settings = ApiSettings {
        base_url: format!("http://{addr}"),
        ..ApiSettings::default()
    };
    let service = ReqwestPhotoService::new(settings).expect("client builds");

    let err = service
        .fetch_photos(&PhotosEndpoint::photos(OrderBy::Popular))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Network);
    assert!(!err.message.is_empty());
}
