use actix_multipart::{Field, Multipart};
use futures::TryStreamExt;
use tracing::warn;

use crate::application::UploadedFile;
use crate::domain::error::{AppError, Result};

const FILE_FIELD: &str = "file";

/// Pull the `file` part out of a multipart form.
///
/// `accept` runs on the filename before the body is buffered, so a rejected
/// upload is never read past its headers. Other parts are drained and
/// ignored.
pub async fn read_file_field<F>(mut payload: Multipart, limit: usize, accept: F) -> Result<UploadedFile>
where
    F: Fn(&str) -> Result<()>,
{
    loop {
        let next = payload.try_next().await.map_err(|e| {
            warn!(error = %e, "multipart stream rejected");
            no_file_part()
        })?;

        let Some(mut field) = next else {
            return Err(no_file_part());
        };

        let filename = {
            let disposition = field.content_disposition();
            match (disposition.get_name(), disposition.get_filename()) {
                (Some(FILE_FIELD), Some(filename)) => Some(filename.to_string()),
                _ => None,
            }
        };

        let Some(filename) = filename else {
            drain(&mut field).await?;
            continue;
        };

        accept(&filename)?;
        let bytes = read_limited(&mut field, limit).await?;

        return Ok(UploadedFile { filename, bytes });
    }
}

async fn read_limited(field: &mut Field, limit: usize) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();

    while let Some(chunk) = field.try_next().await.map_err(read_error)? {
        if bytes.len() + chunk.len() > limit {
            return Err(AppError::PayloadTooLarge("File too large".to_string()));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

async fn drain(field: &mut Field) -> Result<()> {
    while field.try_next().await.map_err(read_error)?.is_some() {}
    Ok(())
}

fn read_error(err: actix_multipart::MultipartError) -> AppError {
    AppError::ValidationError(format!("Failed to read upload: {}", err))
}

fn no_file_part() -> AppError {
    AppError::ValidationError("No file part".to_string())
}
