//! CSV file ingestion: validate picked/dropped files, read their text and
//! hand it to the backend parser.

use shared_types::{ParseSolarDataArgs, COMMAND_PARSE_SOLAR_DATA, CSV_MIME};
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FileList};

use crate::bridge;
use crate::error::{js_error_text, FileError};

/// Reject anything that is not exactly `text/csv`.
pub fn validate_csv(name: &str, mime: &str) -> Result<(), FileError> {
    if mime == CSV_MIME {
        Ok(())
    } else {
        Err(FileError::InvalidFileType {
            name: name.to_string(),
            mime: mime.to_string(),
        })
    }
}

/// Validate `file` and read its full text content.
pub async fn read_csv(file: &File) -> Result<String, FileError> {
    let name = file.name();
    validate_csv(&name, &file.type_())?;

    let contents = JsFuture::from(file.text())
        .await
        .map_err(|e| FileError::UnknownRead {
            name: name.clone(),
            cause: js_error_text(&e),
        })?;

    contents.as_string().ok_or_else(|| FileError::UnknownRead {
        name,
        cause: format!("text() resolved to a non-string: {contents:?}"),
    })
}

/// Read `file` and forward it to the backend parser. Returns the file name.
pub async fn ingest_file(file: &File) -> Result<String, FileError> {
    let data = read_csv(file).await?;
    let name = file.name();

    log::info!("forwarding {name} ({} bytes) to the parser", data.len());
    bridge::invoke_unit(
        COMMAND_PARSE_SOLAR_DATA,
        &ParseSolarDataArgs {
            name: name.clone(),
            data,
        },
    )
    .await
    .map_err(|source| FileError::Ingest {
        name: name.clone(),
        source,
    })?;

    Ok(name)
}

/// Outcome of ingesting a whole picker or drop selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub accepted: Vec<String>,
    pub failed: Vec<FileError>,
}

impl IngestReport {
    pub fn push(&mut self, result: Result<String, FileError>) {
        match result {
            Ok(name) => self.accepted.push(name),
            Err(e) => {
                log::warn!("{}: {e}", e.tag());
                self.failed.push(e);
            }
        }
    }

    /// Notification line for the accepted files, if any.
    pub fn summary(&self) -> Option<String> {
        match self.accepted.len() {
            0 => None,
            1 => Some("Parsing 1 new file.".to_string()),
            n => Some(format!("Parsing {n} new files.")),
        }
    }
}

/// Ingest every file in `files`, in order. One failure does not stop the rest.
pub async fn ingest_files(files: &FileList) -> IngestReport {
    let mut report = IngestReport::default();
    for index in 0..files.length() {
        let Some(file) = files.item(index) else {
            continue;
        };
        report.push(ingest_file(&file).await);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_csv_mime_is_accepted() {
        assert!(validate_csv("june.csv", "text/csv").is_ok());

        let err = validate_csv("notes.txt", "text/plain").unwrap_err();
        assert_eq!(
            err,
            FileError::InvalidFileType {
                name: "notes.txt".to_string(),
                mime: "text/plain".to_string(),
            }
        );

        assert!(validate_csv("june.csv", "text/csv; charset=utf-8").is_err());
        assert!(validate_csv("june.csv", "").is_err());
    }

    #[test]
    fn summary_counts_accepted_files() {
        let mut report = IngestReport::default();
        assert_eq!(report.summary(), None);

        report.push(Ok("a.csv".to_string()));
        assert_eq!(report.summary().as_deref(), Some("Parsing 1 new file."));

        report.push(Ok("b.csv".to_string()));
        report.push(Err(FileError::InvalidFileType {
            name: "c.txt".to_string(),
            mime: "text/plain".to_string(),
        }));
        assert_eq!(report.summary().as_deref(), Some("Parsing 2 new files."));
        assert_eq!(report.failed.len(), 1);
    }
}
