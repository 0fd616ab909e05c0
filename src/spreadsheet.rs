use std::io::Cursor;

use calamine::{DataType, Range, Reader, Xls, Xlsx};

#[derive(thiserror::Error, Debug)]
pub enum SpreadsheetError {
    #[error("File must be an Excel file (.xlsx or .xls)")]
    InvalidFileType(String),
    #[error("Error reading Excel file: {0}")]
    FileReadError(String),
}

/// Candidate addresses found in the first column of a spreadsheet
#[derive(Debug, PartialEq, Eq, serde::Serialize)]
pub struct ExtractedEmails {
    pub emails: Vec<String>,
    pub count: usize,
}

impl ExtractedEmails {
    fn new(emails: Vec<String>) -> Self {
        Self {
            count: emails.len(),
            emails,
        }
    }
}

enum SpreadsheetFormat {
    Xlsx,
    Xls,
}

impl SpreadsheetFormat {
    fn from_filename(filename: &str) -> Result<Self, SpreadsheetError> {
        if filename.ends_with(".xlsx") {
            Ok(Self::Xlsx)
        } else if filename.ends_with(".xls") {
            Ok(Self::Xls)
        } else {
            Err(SpreadsheetError::InvalidFileType(filename.to_owned()))
        }
    }
}

/// Read the first column of the first sheet and keep every text cell holding an `@`.
///
/// This is CPU bound, callers on the async runtime should run it on a blocking thread.
#[tracing::instrument(
    name = "Extract emails from a spreadsheet",
    skip(contents),
    fields(size = contents.len())
)]
pub fn extract_emails(contents: Vec<u8>, filename: &str) -> Result<ExtractedEmails, SpreadsheetError> {
    let sheet = match SpreadsheetFormat::from_filename(filename)? {
        SpreadsheetFormat::Xlsx => first_sheet::<Xlsx<Cursor<Vec<u8>>>>(contents)?,
        SpreadsheetFormat::Xls => first_sheet::<Xls<Cursor<Vec<u8>>>>(contents)?,
    };

    let emails = emails_from_cells(first_column(&sheet));
    tracing::info!(count = emails.len(), "Extracted emails from spreadsheet");
    Ok(ExtractedEmails::new(emails))
}

/// Presence-of-`@` heuristic, nothing more. Accepted values are trimmed.
pub fn emails_from_cells<'a, I>(cells: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    cells
        .into_iter()
        .flatten()
        .filter(|cell| cell.contains('@'))
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_owned)
        .collect()
}

fn first_sheet<R>(contents: Vec<u8>) -> Result<Range<DataType>, SpreadsheetError>
where
    R: Reader<Cursor<Vec<u8>>>,
    R::Error: std::fmt::Display,
{
    let mut workbook = R::new(Cursor::new(contents)).map_err(read_error)?;
    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SpreadsheetError::FileReadError("the workbook has no worksheet".into()))?
        .map_err(read_error)
}

fn read_error(e: impl std::fmt::Display) -> SpreadsheetError {
    SpreadsheetError::FileReadError(e.to_string())
}

// Column A, row by row. Non text cells come out as `None`.
// `Range` only spans the used area, hence the absolute positions.
fn first_column(sheet: &Range<DataType>) -> impl Iterator<Item = Option<&str>> + '_ {
    let rows = match (sheet.start(), sheet.end()) {
        (Some((first, _)), Some((last, _))) => first..=last,
        _ => 1..=0,
    };
    rows.map(move |row| match sheet.get_value((row, 0)) {
        Some(DataType::String(value)) => Some(value.as_str()),
        _ => None,
    })
}
