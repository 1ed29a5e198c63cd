use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailClerkResult;
use crate::modules::imap::executor::MailSession;
use crate::modules::message::archive::{archive_filename, build_pdf_archive};
use crate::modules::message::extract::extract_pdf_attachments;
use crate::modules::settings::cli::SETTINGS;
use crate::modules::utils::parse_uid;
use crate::{encode_mailbox_name, raise_error};
use tracing::info;

/// A fully materialized zip archive ready to stream to the caller.
pub struct PdfArchive {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Fetches the message, runs the extraction engine and packs the result.
/// `Ok(None)` means the traversal finished without finding a single PDF part.
pub async fn extract_pdf_archive(id: &str) -> MailClerkResult<Option<PdfArchive>> {
    let uid = parse_uid(id)?;
    let raw = fetch_raw_message(uid).await?;

    let entries = extract_pdf_attachments(&raw)?;
    if entries.is_empty() {
        return Ok(None);
    }
    info!(
        "Extracted {} PDF attachment(s) from UID {}",
        entries.len(),
        uid
    );

    let content = build_pdf_archive(&entries)?;
    Ok(Some(PdfArchive {
        filename: archive_filename(uid),
        content,
    }))
}

/// The session is released before any parsing happens; the traversal never
/// holds the server connection open.
async fn fetch_raw_message(uid: u32) -> MailClerkResult<Vec<u8>> {
    let mut session = MailSession::connect().await?;
    let fetched = fetch_body(&mut session, uid).await;
    session.logout().await;
    fetched
}

async fn fetch_body(session: &mut MailSession, uid: u32) -> MailClerkResult<Vec<u8>> {
    session
        .examine_mailbox(&encode_mailbox_name!(&SETTINGS.mailclerk_mailbox))
        .await?;

    let fetch = session.uid_fetch_full_message(uid).await?.ok_or_else(|| {
        raise_error!(
            format!(
                "No message found for UID {} in mailbox {}",
                uid, SETTINGS.mailclerk_mailbox
            ),
            ErrorCode::ResourceNotFound
        )
    })?;

    let body = fetch.body().ok_or_else(|| {
        raise_error!(
            format!("Message UID {} is missing a body", uid),
            ErrorCode::ImapUnexpectedResult
        )
    })?;

    if body.len() as u64 > SETTINGS.mailclerk_max_message_size as u64 {
        return Err(raise_error!(
            format!(
                "Message size {} bytes exceeds maximum allowed size of {} bytes (UID: {})",
                body.len(),
                SETTINGS.mailclerk_max_message_size,
                uid
            ),
            ErrorCode::ExceedsLimitation
        ));
    }

    Ok(body.to_vec())
}
