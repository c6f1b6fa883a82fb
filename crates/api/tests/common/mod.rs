#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use lettre::Message;
use tower::ServiceExt;

use teckel_api::auth::jwt::{generate_access_token, JwtConfig};
use teckel_api::config::{ServerConfig, SiteConfig};
use teckel_api::router::build_app_router;
use teckel_api::state::AppState;
use teckel_cloud::LocalStorage;
use teckel_core::image::ImageStaging;
use teckel_core::inventory::{InventoryGateway, MemoryDogStore};
use teckel_relay::{ContactRelay, MailSender, MailTransport, MailTransportError};

pub const BUCKET: &str = "dogs";
pub const MEDIA_BASE_URL: &str = "http://localhost:3000/media";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 4 * 1024 * 1024,
        list_cache_ttl: std::time::Duration::from_secs(30),
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
        site: SiteConfig {
            business_name: "Royal Teckel Home".to_string(),
            public_email: Some("contact@royal-teckel.example".to_string()),
            public_whatsapp_number: Some("+33 6 12 34 56 78".to_string()),
        },
    }
}

// ---------------------------------------------------------------------------
// Fake mail transport
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingTransport {
    pub fail_verify: AtomicBool,
    pub fail_send: AtomicBool,
    pub sent: Mutex<Vec<Message>>,
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn verify(&self) -> Result<(), MailTransportError> {
        if self.fail_verify.load(Ordering::SeqCst) {
            return Err(MailTransportError::Refused);
        }
        Ok(())
    }

    async fn send(&self, message: Message) -> Result<(), MailTransportError> {
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(MailTransportError::Other("554 rejected".into()));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Test application
// ---------------------------------------------------------------------------

/// The real router over an in-memory store, a temporary media directory and
/// a recording mail transport.
pub struct TestApp {
    pub router: Router,
    pub config: ServerConfig,
    pub mail: Arc<RecordingTransport>,
    pub media: tempfile::TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(true)
    }

    /// Same app, but without a configured sending identity.
    pub fn without_sender() -> Self {
        Self::build(false)
    }

    fn build(with_sender: bool) -> Self {
        let config = test_config();
        let media = tempfile::tempdir().unwrap();
        let mail = Arc::new(RecordingTransport::default());

        let sender = with_sender.then(|| MailSender {
            address: "breeder@royal-teckel.example".parse().unwrap(),
            recipient: "owner@royal-teckel.example".parse().unwrap(),
            transport: mail.clone(),
        });

        let state = AppState {
            inventory: Arc::new(InventoryGateway::new(Arc::new(MemoryDogStore::new()))),
            staging: Arc::new(ImageStaging::new()),
            storage: Arc::new(LocalStorage::new(
                media.path(),
                Some(MEDIA_BASE_URL.to_string()),
            )),
            bucket: BUCKET.into(),
            relay: Arc::new(ContactRelay::new(sender, "Royal Teckel Home")),
            media_root: Some(media.path().to_path_buf()),
            config: Arc::new(config.clone()),
        };

        Self {
            router: build_app_router(state, &config),
            config,
            mail,
            media,
        }
    }

    pub fn token(&self, subject: &str, role: &str) -> String {
        generate_access_token(subject, role, &self.config.jwt).unwrap()
    }

    pub fn admin_token(&self) -> String {
        self.token("breeder", "admin")
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(request(Method::GET, uri, None, Body::empty())).await
    }

    pub async fn get_as(&self, uri: &str, token: &str) -> Response<Body> {
        self.send(request(Method::GET, uri, Some(token), Body::empty()))
            .await
    }

    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> Response<Body> {
        let mut req = request(method, uri, token, Body::from(body.to_string()));
        req.headers_mut()
            .insert("content-type", "application/json".parse().unwrap());
        self.send(req).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        self.send(request(Method::DELETE, uri, token, Body::empty()))
            .await
    }

    /// POST a single-file multipart form.
    pub async fn upload(
        &self,
        uri: &str,
        token: &str,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Response<Body> {
        let (content_type_header, body) = multipart_body("file", file_name, content_type, bytes);
        let mut req = request(Method::POST, uri, Some(token), Body::from(body));
        req.headers_mut()
            .insert("content-type", content_type_header.parse().unwrap());
        self.send(req).await
    }
}

// ---------------------------------------------------------------------------
// Request / response helpers
// ---------------------------------------------------------------------------

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(body).unwrap()
}

const BOUNDARY: &str = "teckel-test-boundary";

pub fn multipart_body(
    field: &str,
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
             filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn assert_status(response: &Response<Body>, status: StatusCode) {
    assert_eq!(response.status(), status, "unexpected status");
}

/// A valid create/update body.
pub fn dog_body(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "breed": "Dachshund",
        "age_months": 3,
        "price": 1200,
        "description_en": "Loves long walks",
        "description_fr": "Adore les longues promenades",
        "gender": "female",
        "size": "small",
    })
}
