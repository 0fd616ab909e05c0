use std::fmt::{Debug, Formatter};

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};

use crate::dispatcher::{DispatchError, Dispatcher};
use crate::domain::{EmailAddress, SendRequest};
use crate::routes::{error_chain_fmt, ErrorDetail};

#[derive(serde::Deserialize)]
pub struct BodyData {
    subject: String,
    body: String,
    recipients: Vec<String>,
}

impl TryFrom<BodyData> for SendRequest {
    type Error = String;

    fn try_from(value: BodyData) -> Result<Self, Self::Error> {
        let recipients = value
            .recipients
            .into_iter()
            .map(EmailAddress::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            subject: value.subject,
            body: value.body,
            recipients,
        })
    }
}

#[derive(thiserror::Error)]
pub enum SendEmailsError {
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    DispatchError(#[from] DispatchError),
}

impl Debug for SendEmailsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SendEmailsError {
    fn status_code(&self) -> StatusCode {
        match self {
            SendEmailsError::ValidationError(_) => StatusCode::BAD_REQUEST,
            SendEmailsError::DispatchError(DispatchError::InvalidRequest(_)) => {
                StatusCode::BAD_REQUEST
            }
            SendEmailsError::DispatchError(DispatchError::MisconfiguredService(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorDetail::new(self.to_string()))
    }
}

/// Deliver the same subject and body to every recipient, in order.
///
/// Per-recipient failures do not fail the request: they are part of the report.
#[tracing::instrument(
    name = "Send a bulk email",
    skip(body, dispatcher),
    fields(subject = %body.subject, recipients = body.recipients.len())
)]
pub async fn send_emails(
    body: web::Json<BodyData>,
    dispatcher: web::Data<Dispatcher>,
) -> Result<HttpResponse, SendEmailsError> {
    let request: SendRequest = body
        .into_inner()
        .try_into()
        .map_err(SendEmailsError::ValidationError)?;

    let report = dispatcher.dispatch(request).await?;

    Ok(HttpResponse::Ok().json(report))
}
