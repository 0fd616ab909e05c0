use wiremock::matchers::{any, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{provider_payload, spawn_app, spawn_app_with_api_key, SentTo, TEST_API_KEY};

#[tokio::test]
async fn test_send_emails_returns_a_report_when_every_delivery_succeeds() {
    let app = spawn_app().await;

    Mock::given(path("/emails"))
        .and(method("POST"))
        .and(header("Authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&app.email_server)
        .await;

    let response = app
        .post_send_emails(&serde_json::json!({
            "subject": "Hi",
            "body": "Hello",
            "recipients": ["a@x.com", "b@y.com"],
        }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let report: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        report,
        serde_json::json!({
            "total": 2,
            "successful": 2,
            "failed": 0,
            "results": [
                {"email": "a@x.com", "success": true, "message": "Email sent successfully"},
                {"email": "b@y.com", "success": true, "message": "Email sent successfully"},
            ]
        })
    );
}

#[tokio::test]
async fn test_send_emails_reports_partial_failures_as_data() {
    let app = spawn_app().await;

    Mock::given(SentTo("a@x.com"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;
    Mock::given(SentTo("b@y.com"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "statusCode": 429,
            "name": "rate_limit_exceeded",
            "message": "Too many requests. You can only make 2 requests per second."
        })))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app
        .post_send_emails(&serde_json::json!({
            "subject": "Hi",
            "body": "Hello",
            "recipients": ["a@x.com", "b@y.com"],
        }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let report: serde_json::Value = response.json().await.unwrap();
    assert_eq!(report["total"], 2);
    assert_eq!(report["successful"], 1);
    assert_eq!(report["failed"], 1);
    assert_eq!(report["results"][0]["email"], "a@x.com");
    assert_eq!(report["results"][0]["success"], true);
    assert_eq!(report["results"][1]["email"], "b@y.com");
    assert_eq!(report["results"][1]["success"], false);
    assert!(report["results"][1]["message"]
        .as_str()
        .unwrap()
        .starts_with("Failed:"));
}

#[tokio::test]
async fn test_send_emails_keeps_going_after_a_failure() {
    let app = spawn_app().await;

    Mock::given(SentTo("broken@x.com"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(1)
        .mount(&app.email_server)
        .await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&app.email_server)
        .await;

    let response = app
        .post_send_emails(&serde_json::json!({
            "subject": "Hi",
            "body": "Hello",
            "recipients": ["first@x.com", "broken@x.com", "last@x.com"],
        }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let report: serde_json::Value = response.json().await.unwrap();
    assert_eq!(report["successful"], 2);
    assert_eq!(report["results"][1]["message"], "Failed: Internal Server Error");
    assert_eq!(report["results"][2]["success"], true);
    assert_eq!(
        app.delivered_to().await,
        vec!["first@x.com", "broken@x.com", "last@x.com"]
    );
}

#[tokio::test]
async fn test_send_emails_sends_the_body_as_escaped_html() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    app.post_send_emails(&serde_json::json!({
        "subject": "Weekly <news>",
        "body": "Hello <b>team</b>\nSee you & bye",
        "recipients": ["a@x.com"],
    }))
    .await
    .error_for_status()
    .unwrap();

    let requests = app.email_server.received_requests().await.unwrap();
    let payload = provider_payload(&requests[0]);
    assert_eq!(payload["to"], "a@x.com");
    assert_eq!(payload["subject"], "Weekly <news>");
    assert_eq!(
        payload["html"],
        "Hello &lt;b&gt;team&lt;/b&gt;<br>See you &amp; bye"
    );
    assert!(payload["from"].as_str().unwrap().contains('@'));
}

#[tokio::test]
async fn test_send_emails_returns_400_for_empty_recipients() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let response = app
        .post_send_emails(&serde_json::json!({
            "subject": "Hi",
            "body": "Hello",
            "recipients": [],
        }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "No recipients provided");
}

#[tokio::test]
async fn test_send_emails_returns_500_without_an_api_key() {
    let app = spawn_app_with_api_key(None).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let response = app
        .post_send_emails(&serde_json::json!({
            "subject": "Hi",
            "body": "Hello",
            "recipients": ["a@x.com"],
        }))
        .await;

    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "RESEND_API_KEY not configured");
}

#[tokio::test]
async fn test_send_emails_returns_400_for_invalid_data() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let test_cases = vec![
        (
            serde_json::json!({"subject": "Hi", "body": "Hello", "recipients": ["a@x.com", "nope"]}),
            "invalid recipient address",
        ),
        (
            serde_json::json!({"body": "Hello", "recipients": ["a@x.com"]}),
            "missing subject",
        ),
        (
            serde_json::json!({"subject": "Hi", "recipients": ["a@x.com"]}),
            "missing body",
        ),
        (
            serde_json::json!({"subject": "Hi", "body": "Hello"}),
            "missing recipients",
        ),
        (
            serde_json::json!({"subject": "Hi", "body": "Hello", "recipients": "a@x.com"}),
            "recipients is not a list",
        ),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = app.post_send_emails(&invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "API did not fail with 400 error code: {}",
            error_message
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert!(body["detail"].is_string(), "no detail for: {}", error_message);
    }
}
