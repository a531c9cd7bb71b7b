use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use crate::services::contact::{ContactEmail, ContactError, Mailer};
use crate::state::test_helpers;

// =========================================================================
// MockMailer
// =========================================================================

#[derive(Default)]
struct MockMailer {
    sent: Mutex<Vec<ContactEmail>>,
    fail: bool,
}

#[async_trait::async_trait]
impl Mailer for MockMailer {
    async fn send(&self, email: &ContactEmail) -> Result<(), ContactError> {
        if self.fail {
            return Err(ContactError::Delivery("connection refused".into()));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

fn form() -> Value {
    json!({
        "name": "Ada",
        "email": "ada@example.com",
        "subject": "Hello",
        "message": "Loved the portfolio",
    })
}

async fn post_contact(base: &str, body: &Value) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/contact"))
        .json(body)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

async fn spawn_with(mailer: Option<Arc<MockMailer>>) -> String {
    let config = test_helpers::test_config("http://unused", None);
    let state = match mailer {
        Some(m) => test_helpers::test_app_state_with_mailer(config, m),
        None => test_helpers::test_app_state(config),
    };
    test_helpers::spawn_app(state).await
}

#[tokio::test]
async fn contact_sends_email_and_reports_success() {
    let mailer = Arc::new(MockMailer::default());
    let base = spawn_with(Some(mailer.clone())).await;

    let (status, body) = post_contact(&base, &form()).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Portfolio Contact: Hello");
    assert_eq!(sent[0].reply_to, "ada@example.com");
}

#[tokio::test]
async fn contact_missing_field_is_400() {
    let mailer = Arc::new(MockMailer::default());
    let base = spawn_with(Some(mailer.clone())).await;

    let mut body = form();
    body.as_object_mut().unwrap().remove("subject");
    let (status, resp) = post_contact(&base, &body).await;
    assert_eq!(status, 400);
    assert_eq!(resp["error"], "Missing required fields");
    assert!(mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn contact_bad_email_is_400() {
    let base = spawn_with(Some(Arc::new(MockMailer::default()))).await;

    let mut body = form();
    body["email"] = json!("ada-at-example");
    let (status, resp) = post_contact(&base, &body).await;
    assert_eq!(status, 400);
    assert_eq!(resp["error"], "Invalid email format");
}

#[tokio::test]
async fn contact_without_mailer_is_500() {
    let base = spawn_with(None).await;

    let (status, resp) = post_contact(&base, &form()).await;
    assert_eq!(status, 500);
    assert_eq!(resp["error"], "Email service not configured");
    assert_eq!(resp["kind"], "configuration");
}

#[tokio::test]
async fn contact_delivery_failure_is_500_with_generic_message() {
    let mailer = Arc::new(MockMailer { fail: true, ..MockMailer::default() });
    let base = spawn_with(Some(mailer)).await;

    let (status, resp) = post_contact(&base, &form()).await;
    assert_eq!(status, 500);
    assert_eq!(resp["error"], "Email sending failed");
    assert!(!resp["message"].as_str().unwrap().contains("connection refused"));
}
