use crate::core::Storage;
use crate::utils::error::{EtlError, Result};
use serde::Serialize;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

/// One file produced by a load stage.
#[derive(Debug, Clone)]
pub struct OutputFile {
    pub name: String,
    pub data: Vec<u8>,
}

impl OutputFile {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Serializes `rows` as CSV with a header taken from the field names.
pub fn to_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

pub fn bundle_zip(files: &[OutputFile]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for file in files {
        zip.start_file(file.name.as_str(), SimpleFileOptions::default())?;
        zip.write_all(&file.data)?;
    }

    // 完成並取回底層 Vec<u8>
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

/// Writes every file through `storage`, then the ZIP bundle when
/// `archive_name` is set. Returns the path reported to the user.
pub async fn write_outputs<S: Storage>(
    storage: &S,
    output_path: &str,
    files: &[OutputFile],
    archive_name: Option<String>,
) -> Result<String> {
    for file in files {
        tracing::debug!("Writing {} ({} bytes)", file.name, file.data.len());
        storage.write_file(&file.name, &file.data).await?;
    }

    match archive_name {
        Some(name) => {
            let zip_data = bundle_zip(files)?;
            tracing::debug!("Writing ZIP file {} ({} bytes)", name, zip_data.len());
            storage.write_file(&name, &zip_data).await?;
            Ok(format!("{}/{}", output_path, name))
        }
        None => Ok(output_path.to_string()),
    }
}
