use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailClerkResult;
use crate::modules::message::extract::PdfEntry;
use crate::raise_error;
use std::collections::HashMap;
use std::io::{Cursor, Write};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

pub fn archive_filename(uid: u32) -> String {
    format!("pdf_attachments_{}.zip", uid)
}

/// Packs the extracted entries, in order, into an in-memory zip archive.
/// Callers must not pass an empty sequence; "no attachments" is reported at
/// the request boundary instead of as an empty archive.
pub fn build_pdf_archive(entries: &[PdfEntry]) -> MailClerkResult<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut seen: HashMap<String, usize> = HashMap::new();
    for entry in entries {
        let name = disambiguate(&sanitize(&entry.filename), &mut seen);
        writer.start_file(name, options).map_err(|e| {
            raise_error!(
                format!("Failed to write archive entry: {}", e),
                ErrorCode::InternalError
            )
        })?;
        writer.write_all(&entry.content).map_err(|e| {
            raise_error!(
                format!("Failed to write archive entry: {}", e),
                ErrorCode::InternalError
            )
        })?;
    }

    let cursor = writer.finish().map_err(|e| {
        raise_error!(
            format!("Failed to finish archive: {}", e),
            ErrorCode::InternalError
        )
    })?;
    Ok(cursor.into_inner())
}

/// Declared names come straight from attachment headers; only the final path
/// component is trusted, so a crafted `../x.pdf` cannot escape the archive
/// root when unpacked.
fn sanitize(filename: &str) -> String {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if name.is_empty() {
        "attachment.pdf".to_string()
    } else {
        name.to_string()
    }
}

/// Zip readers disagree on which of two same-named entries wins, so repeated
/// names get a numeric suffix: `invoice.pdf`, `invoice_2.pdf`. Suffixed names
/// are recorded in `seen` too, keeping them from colliding with a declared
/// name that shows up later.
fn disambiguate(filename: &str, seen: &mut HashMap<String, usize>) -> String {
    let count = {
        let count = seen.entry(filename.to_string()).or_insert(0);
        *count += 1;
        *count
    };
    if count == 1 {
        return filename.to_string();
    }
    let mut n = count;
    loop {
        let candidate = match filename.rsplit_once('.') {
            Some((stem, extension)) => format!("{}_{}.{}", stem, n, extension),
            None => format!("{}_{}", filename, n),
        };
        if !seen.contains_key(&candidate) {
            seen.insert(candidate.clone(), 1);
            return candidate;
        }
        n += 1;
    }
}
