//! File payloads and chart materialization
//!
//! Covers both directions of file handling: preparing a local data file
//! for upload (read, size check, base64, MIME inference) and writing
//! backend-generated charts and images to disk (base64 decode, filename
//! sanitization, magic-byte format sniffing).

use crate::error::{Result, VizStreamError};
use crate::stream::ChartRecord;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::path::{Path, PathBuf};

/// Upload ceiling enforced client-side; the backend rejects larger files
/// with the same limit.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// A local file prepared for upload
#[derive(Debug, Clone)]
pub struct FilePayload {
    /// Final path component of the source file
    pub file_name: String,
    /// MIME type inferred from the file extension
    pub mime_type: String,
    /// Base64-encoded file contents
    pub data: String,
    /// Size of the raw (decoded) contents in bytes
    pub size_bytes: usize,
}

impl FilePayload {
    /// Read and encode a file for upload
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the local data file
    ///
    /// # Errors
    ///
    /// Returns `VizStreamError::FileLoad` if the file cannot be read or
    /// exceeds [`MAX_UPLOAD_BYTES`].
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            VizStreamError::FileLoad(format!("Cannot read {}: {}", path.display(), e))
        })?;

        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(VizStreamError::FileLoad(format!(
                "File too large: {:.2}MB (max {}MB)",
                bytes.len() as f64 / (1024.0 * 1024.0),
                MAX_UPLOAD_BYTES / (1024 * 1024)
            ))
            .into());
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| {
                VizStreamError::FileLoad(format!("Not a file path: {}", path.display()))
            })?;

        let mime_type = mime_type_for(&file_name).to_string();
        let size_bytes = bytes.len();

        tracing::debug!(
            "Prepared payload: {} ({}, {} bytes)",
            file_name,
            mime_type,
            size_bytes
        );

        Ok(Self {
            file_name,
            mime_type,
            data: BASE64.encode(&bytes),
            size_bytes,
        })
    }
}

/// Infer a MIME type from a filename's extension
///
/// Unknown extensions fall back to `application/octet-stream`.
pub fn mime_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit('.')
        .next()
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => "text/csv",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xls" => "application/vnd.ms-excel",
        "json" => "application/json",
        "yaml" | "yml" => "application/x-yaml",
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "html" => "text/html",
        "md" => "text/markdown",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Reduce a server-supplied filename to a safe final path component
///
/// Strips any directory components and leading dots so a hostile name
/// cannot escape the output directory. Empty names become `chart`.
pub fn sanitize_filename(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim_start_matches('.');
    if base.is_empty() {
        "chart".to_string()
    } else {
        base.to_string()
    }
}

/// Sniff an image extension from magic bytes
///
/// Returns `None` when the data does not start with a recognizable
/// image signature.
pub fn sniff_image_extension(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes)
        .ok()
        .and_then(|format| format.extensions_str().first().copied())
}

/// Write raw bytes under `dir` with a sanitized filename
///
/// When the name carries no extension, one is sniffed from the magic
/// bytes of the data; unsniffable data gets `.bin`. The directory is
/// created if needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file
/// cannot be written.
pub fn write_binary(name: &str, bytes: &[u8], dir: &Path) -> Result<PathBuf> {
    let mut file_name = sanitize_filename(name);
    if Path::new(&file_name).extension().is_none() {
        let ext = sniff_image_extension(bytes).unwrap_or("bin");
        file_name = format!("{}.{}", file_name, ext);
    }

    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, bytes)?;
    tracing::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}

/// Decode a streamed chart record and write it under `dir`
///
/// # Errors
///
/// Returns `VizStreamError::Chart` if the base64 payload does not
/// decode, or an IO error if the write fails.
pub fn write_chart(record: &ChartRecord, dir: &Path) -> Result<PathBuf> {
    let bytes = BASE64.decode(&record.data).map_err(|e| {
        VizStreamError::Chart(format!("Invalid base64 in chart {}: {}", record.filename, e))
    })?;
    write_binary(&record.filename, &bytes, dir)
}
