/// JSON payload expected by the provider's `POST /emails` endpoint
#[derive(serde::Serialize)]
pub struct SendEmailRequest<'a> {
    // "Display Name <address>"
    pub from: &'a str,
    pub to: &'a str,
    pub subject: &'a str,
    pub html: &'a str,
}

/// Best-effort reading of a provider error response.
///
/// The provider documents a JSON object with a `message` field; anything else
/// (plain text, HTML from a proxy, an empty body) is reported as it came.
pub fn provider_error_detail(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(fields)) => match fields.get("message") {
            Some(serde_json::Value::String(message)) => message.clone(),
            Some(serde_json::Value::Null) | None => body.to_owned(),
            Some(other) => other.to_string(),
        },
        _ => body.to_owned(),
    }
}
