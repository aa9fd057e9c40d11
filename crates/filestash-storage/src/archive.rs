//! Zip packaging for group downloads.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use bytes::Bytes;
use tracing::debug;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use filestash_core::error::{AppError, ErrorKind};
use filestash_core::result::AppResult;

/// MIME type of the produced archive.
pub const ZIP_CONTENT_TYPE: &str = "application/zip";

/// One file to place in an archive.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    /// Name inside the archive, usually the original upload filename.
    pub name: String,
    /// File contents.
    pub data: Bytes,
}

/// Build a deflate-compressed zip of `entries` in a blocking task.
///
/// Entry names are reduced to their final path component, and repeated
/// names become `name (1).ext`, `name (2).ext`, ... so that every entry is
/// kept.
pub async fn build_zip(entries: Vec<ArchiveEntry>) -> AppResult<Bytes> {
    tokio::task::spawn_blocking(move || write_zip(&entries))
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Zip task failed", e))?
}

fn write_zip(entries: &[ArchiveEntry]) -> AppResult<Bytes> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let mut names = UniqueNames::default();

    for entry in entries {
        let name = names.claim(&entry.name);
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .large_file(entry.data.len() as u64 >= u64::from(u32::MAX));

        writer
            .start_file(name.as_str(), options)
            .map_err(|e| zip_error(&name, e))?;
        writer.write_all(&entry.data)?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to finish zip", e))?;
    let data = cursor.into_inner();
    debug!(entries = entries.len(), bytes = data.len(), "Built zip archive");
    Ok(Bytes::from(data))
}

fn zip_error(name: &str, err: zip::result::ZipError) -> AppError {
    AppError::with_source(
        ErrorKind::Storage,
        format!("Failed to add '{name}' to zip"),
        err,
    )
}

/// Hands out archive entry names, never the same one twice.
#[derive(Debug, Default)]
struct UniqueNames {
    taken: HashSet<String>,
}

impl UniqueNames {
    fn claim(&mut self, raw: &str) -> String {
        let base = sanitize(raw);
        if self.taken.insert(base.clone()) {
            return base;
        }

        let (stem, ext) = split_extension(&base);
        let mut n = 1usize;
        loop {
            let candidate = format!("{stem} ({n}){ext}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

fn sanitize(raw: &str) -> String {
    let last = raw
        .rsplit(['/', '\\'])
        .find(|part| !part.is_empty() && *part != "." && *part != "..")
        .unwrap_or("")
        .trim();
    if last.is_empty() {
        "file".to_string()
    } else {
        last.to_string()
    }
}

/// Split `report.tar.gz` into (`report.tar`, `.gz`); dotfiles keep their
/// leading dot in the stem.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}
