mod health_check;
mod send_emails;
mod upload_excel;

pub use health_check::health_check;
pub use send_emails::{send_emails, SendEmailsError};
pub use upload_excel::{upload_excel, UploadError, UploadLimit};

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{HttpRequest, HttpResponse};

/// Body of every error response: `{"detail": "..."}`
#[derive(serde::Serialize)]
pub struct ErrorDetail {
    detail: String,
}

impl ErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Render malformed JSON bodies as a 400 with the same shape as our own errors
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorDetail::new(err.to_string()));
    InternalError::from_response(err, response).into()
}

/// Walk the `source` chain so that a single log line carries every cause
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
