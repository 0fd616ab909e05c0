use std::fmt::{Debug, Formatter};

use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use futures_util::TryStreamExt;

use crate::routes::{error_chain_fmt, ErrorDetail};
use crate::spreadsheet::{extract_emails, SpreadsheetError};
use crate::telemetry::spawn_blocking_with_tracing;

/// Name of the multipart field carrying the spreadsheet
const FILE_FIELD: &str = "file";

/// Upper bound, in bytes, on the size of an uploaded spreadsheet
pub struct UploadLimit(pub usize);

#[derive(thiserror::Error)]
pub enum UploadError {
    #[error("No file uploaded")]
    MissingFile,
    #[error("File exceeds the maximum upload size of {0} bytes")]
    FileTooLarge(usize),
    #[error("Invalid multipart payload: {0}")]
    MalformedPayload(String),
    #[error(transparent)]
    SpreadsheetError(#[from] SpreadsheetError),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for UploadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for UploadError {
    fn status_code(&self) -> StatusCode {
        match self {
            UploadError::MissingFile
            | UploadError::MalformedPayload(_)
            | UploadError::SpreadsheetError(SpreadsheetError::InvalidFileType(_)) => {
                StatusCode::BAD_REQUEST
            }
            UploadError::FileTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::SpreadsheetError(SpreadsheetError::FileReadError(_))
            | UploadError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorDetail::new(self.to_string()))
    }
}

struct UploadedFile {
    filename: String,
    contents: Vec<u8>,
}

/// Extract the candidate email addresses found in the first column of an uploaded spreadsheet
#[tracing::instrument(
    name = "Upload a spreadsheet of recipients",
    skip(payload, upload_limit),
    fields(filename = tracing::field::Empty)
)]
pub async fn upload_excel(
    mut payload: Multipart,
    upload_limit: web::Data<UploadLimit>,
) -> Result<HttpResponse, UploadError> {
    let file = read_file_field(&mut payload, upload_limit.0)
        .await?
        .ok_or(UploadError::MissingFile)?;
    tracing::Span::current().record("filename", &tracing::field::display(&file.filename));

    // Parsing a workbook is CPU bound, keep it off the async workers
    let extracted = spawn_blocking_with_tracing(move || extract_emails(file.contents, &file.filename))
        .await
        .context("Failed to spawn the spreadsheet parsing task")??;

    Ok(HttpResponse::Ok().json(extracted))
}

async fn read_file_field(
    payload: &mut Multipart,
    max_bytes: usize,
) -> Result<Option<UploadedFile>, UploadError> {
    while let Some(mut field) = payload.try_next().await.map_err(malformed_payload)? {
        let content_disposition = field.content_disposition();
        if content_disposition.get_name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = content_disposition
            .get_filename()
            .unwrap_or_default()
            .to_owned();

        let mut contents = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(malformed_payload)? {
            if contents.len() + chunk.len() > max_bytes {
                return Err(UploadError::FileTooLarge(max_bytes));
            }
            contents.extend_from_slice(&chunk);
        }
        return Ok(Some(UploadedFile { filename, contents }));
    }
    Ok(None)
}

fn malformed_payload(e: actix_multipart::MultipartError) -> UploadError {
    UploadError::MalformedPayload(e.to_string())
}
