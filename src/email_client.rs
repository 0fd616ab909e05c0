use std::time::Duration;

use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};

use crate::domain::{EmailAddress, HtmlBody};
use crate::email_request::{provider_error_detail, SendEmailRequest};

/// Why a single delivery did not go through.
///
/// The `Display` output is what ends up in the per-recipient report.
#[derive(thiserror::Error, Debug)]
pub enum DeliveryError {
    /// The provider answered, but not with a 200
    #[error("Failed: {0}")]
    Rejected(String),
    /// The call itself failed: connection, timeout, unreadable body...
    #[error("Error: {0}")]
    Transport(#[from] reqwest::Error),
}

pub struct EmailClient {
    http_client: Client,
    base_url: String,
    sender: String,
}

impl EmailClient {
    pub fn new(
        base_url: String,
        sender: EmailAddress,
        sender_name: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url,
            sender: format!("{} <{}>", sender_name, sender),
        })
    }

    /// One attempt, no retry. Only a `200 OK` counts as delivered.
    #[tracing::instrument(
        name = "Send an email through the provider",
        skip(self, recipient, subject, html_body, authorization_token),
        fields(recipient = %recipient)
    )]
    pub async fn send_email(
        &self,
        recipient: &EmailAddress,
        subject: &str,
        html_body: &HtmlBody,
        authorization_token: &Secret<String>,
    ) -> Result<(), DeliveryError> {
        let url = format!("{}/emails", self.base_url);
        let request_body = SendEmailRequest {
            from: &self.sender,
            to: recipient.as_ref(),
            subject,
            html: html_body.as_ref(),
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(authorization_token.expose_secret())
            .json(&request_body)
            .send()
            .await?;

        if response.status() == StatusCode::OK {
            return Ok(());
        }

        let body = response.text().await?;
        Err(DeliveryError::Rejected(provider_error_detail(&body)))
    }
}
