use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailClerkResult;
use crate::raise_error;
use mail_parser::{Message, MessageParser, MimeHeaders, PartType};

/// Hard ceiling on message/rfc822 nesting. An adversarially deep chain of
/// embedded messages aborts the request instead of exhausting the stack.
const MAX_NESTING_DEPTH: usize = 10;

/// One PDF attachment pulled out of a message: resolved filename plus the
/// decoded payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfEntry {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Walks the MIME tree of a raw message depth-first and collects every
/// `application/pdf` leaf, descending into embedded `message/rfc822` parts.
///
/// Entries come back in visitation order. Parts without a declared filename
/// are named `attachment_<n>.pdf`; the counter starts at 1 and is shared
/// across the whole traversal, nested messages included. Leaves whose payload
/// is empty or failed to decode are skipped without touching the counter.
///
/// An empty result means the message carries no PDF attachments; only an
/// unparseable root message or excessive nesting is an error.
pub fn extract_pdf_attachments(raw: &[u8]) -> MailClerkResult<Vec<PdfEntry>> {
    let message = MessageParser::default().parse(raw).ok_or_else(|| {
        raise_error!(
            "Failed to parse message content".into(),
            ErrorCode::MessageParseFailed
        )
    })?;

    let mut collector = PdfCollector::default();
    collector.visit_message(&message, 0)?;
    Ok(collector.entries)
}

/// Accumulator threaded through the traversal: output sequence plus the
/// synthesized-name counter. Request-scoped, never reset mid-walk.
#[derive(Default)]
struct PdfCollector {
    entries: Vec<PdfEntry>,
    synthesized: usize,
}

impl PdfCollector {
    fn visit_message(&mut self, message: &Message<'_>, depth: usize) -> MailClerkResult<()> {
        if depth > MAX_NESTING_DEPTH {
            return Err(raise_error!(
                format!(
                    "Message nesting exceeds the maximum depth of {}",
                    MAX_NESTING_DEPTH
                ),
                ErrorCode::ExceedsLimitation
            ));
        }
        // Part 0 is the root of this (possibly embedded) message.
        self.visit_part(message, 0, depth)
    }

    fn visit_part(
        &mut self,
        message: &Message<'_>,
        part_id: usize,
        depth: usize,
    ) -> MailClerkResult<()> {
        let part = match message.parts.get(part_id) {
            Some(part) => part,
            None => return Ok(()),
        };

        match &part.body {
            PartType::Multipart(children) => {
                // Containers are never extractable themselves.
                for &child_id in children {
                    self.visit_part(message, child_id as usize, depth)?;
                }
            }
            PartType::Message(nested) => {
                self.visit_message(nested, depth + 1)?;
            }
            _ => {
                if part.is_content_type("application", "pdf") {
                    self.collect_pdf(part.contents(), part.attachment_name());
                } else if part.is_content_type("message", "rfc822") {
                    // The parser leaves an embedded message undecoded when it
                    // could not make sense of it; try once more and skip
                    // silently when the payload still does not parse.
                    if let Some(embedded) = MessageParser::default().parse(part.contents()) {
                        self.visit_message(&embedded, depth + 1)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn collect_pdf(&mut self, content: &[u8], declared_name: Option<&str>) {
        if content.is_empty() {
            // Undecodable or empty payload: not extractable, counter untouched.
            return;
        }
        let filename = match declared_name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                self.synthesized += 1;
                format!("attachment_{}.pdf", self.synthesized)
            }
        };
        self.entries.push(PdfEntry {
            filename,
            content: content.to_vec(),
        });
    }
}
