use std::time::Duration;

use secrecy::{ExposeSecret, Secret};

use crate::domain::{HtmlBody, SendReport, SendRequest, SendResult};
use crate::email_client::EmailClient;

/// Reasons for refusing a whole batch. Both are raised before any email goes out.
#[derive(thiserror::Error, Debug)]
pub enum DispatchError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    MisconfiguredService(String),
}

/// Sends a batch one recipient at a time, pacing the calls to the provider.
///
/// The wait happens between initiations regardless of how long each call took,
/// so with the default 500ms interval no more than 2 calls start per second.
pub struct Dispatcher {
    email_client: EmailClient,
    authorization_token: Option<Secret<String>>,
    send_interval: Duration,
}

impl Dispatcher {
    pub fn new(
        email_client: EmailClient,
        authorization_token: Option<Secret<String>>,
        send_interval: Duration,
    ) -> Self {
        Self {
            email_client,
            authorization_token,
            send_interval,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.authorization_token().is_some()
    }

    fn authorization_token(&self) -> Option<&Secret<String>> {
        self.authorization_token
            .as_ref()
            .filter(|token| !token.expose_secret().trim().is_empty())
    }

    #[tracing::instrument(
        name = "Dispatch a bulk email",
        skip(self, request),
        fields(recipients = request.recipients.len())
    )]
    pub async fn dispatch(&self, request: SendRequest) -> Result<SendReport, DispatchError> {
        let authorization_token = self.authorization_token().ok_or_else(|| {
            DispatchError::MisconfiguredService("RESEND_API_KEY not configured".into())
        })?;

        if request.recipients.is_empty() {
            return Err(DispatchError::InvalidRequest("No recipients provided".into()));
        }

        let html_body = HtmlBody::from_plain_text(&request.body);
        let mut results = Vec::with_capacity(request.recipients.len());

        let mut recipients = request.recipients.iter().peekable();
        while let Some(recipient) = recipients.next() {
            let result = match self
                .email_client
                .send_email(recipient, &request.subject, &html_body, authorization_token)
                .await
            {
                Ok(()) => SendResult::delivered(recipient),
                Err(error) => {
                    tracing::warn!(
                        error.cause_chain = ?error,
                        %recipient,
                        "Failed to deliver email, moving on to the next recipient"
                    );
                    SendResult::failed(recipient, error.to_string())
                }
            };
            results.push(result);

            // No wait after the last recipient
            if recipients.peek().is_some() {
                tokio::time::sleep(self.send_interval).await;
            }
        }

        let report = SendReport::from_results(results);
        tracing::info!(
            total = report.total(),
            successful = report.successful(),
            failed = report.failed(),
            "Bulk email dispatched"
        );
        Ok(report)
    }
}
