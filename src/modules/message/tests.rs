use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailClerkError;
use crate::modules::message::archive::{archive_filename, build_pdf_archive};
use crate::modules::message::extract::{extract_pdf_attachments, PdfEntry};
use std::io::{Cursor, Read};

const PDF_ONE: &str = "%PDF-1.4 first fake document";
const PDF_TWO: &str = "%PDF-1.4 second fake document";

fn plain_text_message() -> String {
    concat!(
        "From: sender@example.com\r\n",
        "To: clerk@example.com\r\n",
        "Subject: No attachments here\r\n",
        "MIME-Version: 1.0\r\n",
        "Content-Type: text/plain; charset=utf-8\r\n",
        "\r\n",
        "Just a plain body, nothing to extract.\r\n",
    )
    .to_string()
}

fn message_with_named_pdf() -> String {
    concat!(
        "From: billing@example.com\r\n",
        "To: clerk@example.com\r\n",
        "Subject: Your invoice\r\n",
        "MIME-Version: 1.0\r\n",
        "Content-Type: multipart/mixed; boundary=\"outer\"\r\n",
        "\r\n",
        "--outer\r\n",
        "Content-Type: text/plain; charset=utf-8\r\n",
        "\r\n",
        "Invoice attached.\r\n",
        "--outer\r\n",
        "Content-Type: application/pdf; name=\"invoice.pdf\"\r\n",
        "Content-Disposition: attachment; filename=\"invoice.pdf\"\r\n",
        "\r\n",
        "%PDF-1.4 first fake document\r\n",
        "--outer--\r\n",
    )
    .to_string()
}

fn message_with_two_unnamed_pdfs() -> String {
    concat!(
        "From: billing@example.com\r\n",
        "To: clerk@example.com\r\n",
        "Subject: Two attachments, no names\r\n",
        "MIME-Version: 1.0\r\n",
        "Content-Type: multipart/mixed; boundary=\"outer\"\r\n",
        "\r\n",
        "--outer\r\n",
        "Content-Type: application/pdf\r\n",
        "Content-Disposition: attachment\r\n",
        "\r\n",
        "%PDF-1.4 first fake document\r\n",
        "--outer\r\n",
        "Content-Type: application/pdf\r\n",
        "Content-Disposition: attachment\r\n",
        "\r\n",
        "%PDF-1.4 second fake document\r\n",
        "--outer--\r\n",
    )
    .to_string()
}

fn message_with_nested_pdf() -> String {
    concat!(
        "From: forwarder@example.com\r\n",
        "To: clerk@example.com\r\n",
        "Subject: Fwd: invoice\r\n",
        "MIME-Version: 1.0\r\n",
        "Content-Type: multipart/mixed; boundary=\"fwd\"\r\n",
        "\r\n",
        "--fwd\r\n",
        "Content-Type: text/plain; charset=utf-8\r\n",
        "\r\n",
        "See the forwarded mail below.\r\n",
        "--fwd\r\n",
        "Content-Type: message/rfc822\r\n",
        "\r\n",
        "From: billing@example.com\r\n",
        "To: forwarder@example.com\r\n",
        "Subject: Your invoice\r\n",
        "MIME-Version: 1.0\r\n",
        "Content-Type: multipart/mixed; boundary=\"inner\"\r\n",
        "\r\n",
        "--inner\r\n",
        "Content-Type: application/pdf; name=\"nested.pdf\"\r\n",
        "Content-Disposition: attachment; filename=\"nested.pdf\"\r\n",
        "\r\n",
        "%PDF-1.4 second fake document\r\n",
        "--inner--\r\n",
        "\r\n",
        "--fwd--\r\n",
    )
    .to_string()
}

/// Unnamed PDF, then a forwarded message carrying another unnamed PDF, then a
/// third unnamed PDF after the forward.
fn message_with_pdfs_around_a_forward() -> String {
    concat!(
        "From: forwarder@example.com\r\n",
        "To: clerk@example.com\r\n",
        "Subject: Mixed bag\r\n",
        "MIME-Version: 1.0\r\n",
        "Content-Type: multipart/mixed; boundary=\"mix\"\r\n",
        "\r\n",
        "--mix\r\n",
        "Content-Type: application/pdf\r\n",
        "Content-Disposition: attachment\r\n",
        "\r\n",
        "%PDF-1.4 first fake document\r\n",
        "--mix\r\n",
        "Content-Type: message/rfc822\r\n",
        "\r\n",
        "From: billing@example.com\r\n",
        "To: forwarder@example.com\r\n",
        "Subject: Inner\r\n",
        "MIME-Version: 1.0\r\n",
        "Content-Type: multipart/mixed; boundary=\"innermix\"\r\n",
        "\r\n",
        "--innermix\r\n",
        "Content-Type: application/pdf\r\n",
        "Content-Disposition: attachment\r\n",
        "\r\n",
        "%PDF-1.4 second fake document\r\n",
        "--innermix--\r\n",
        "\r\n",
        "--mix\r\n",
        "Content-Type: application/pdf\r\n",
        "Content-Disposition: attachment\r\n",
        "\r\n",
        "%PDF-1.4 first fake document\r\n",
        "--mix--\r\n",
    )
    .to_string()
}

fn wrap_in_forward(inner: &str, level: usize) -> String {
    format!(
        "From: forwarder@example.com\r\n\
         To: clerk@example.com\r\n\
         Subject: Fwd level {level}\r\n\
         MIME-Version: 1.0\r\n\
         Content-Type: multipart/mixed; boundary=\"wrap{level}\"\r\n\
         \r\n\
         --wrap{level}\r\n\
         Content-Type: message/rfc822\r\n\
         \r\n\
         {inner}\r\n\
         --wrap{level}--\r\n"
    )
}

#[test]
fn named_pdf_keeps_its_declared_filename() {
    let entries = extract_pdf_attachments(message_with_named_pdf().as_bytes()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].filename, "invoice.pdf");
    assert_eq!(entries[0].content, PDF_ONE.as_bytes());
}

#[test]
fn unnamed_pdfs_get_synthesized_names_in_order() {
    let entries = extract_pdf_attachments(message_with_two_unnamed_pdfs().as_bytes()).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].filename, "attachment_1.pdf");
    assert_eq!(entries[0].content, PDF_ONE.as_bytes());
    assert_eq!(entries[1].filename, "attachment_2.pdf");
    assert_eq!(entries[1].content, PDF_TWO.as_bytes());
}

#[test]
fn text_only_message_yields_no_entries() {
    let entries = extract_pdf_attachments(plain_text_message().as_bytes()).unwrap();
    assert!(entries.is_empty());
}

#[test]
fn pdf_inside_forwarded_message_is_found() {
    let entries = extract_pdf_attachments(message_with_nested_pdf().as_bytes()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].filename, "nested.pdf");
    assert_eq!(entries[0].content, PDF_TWO.as_bytes());
}

#[test]
fn synthesized_counter_is_shared_across_nesting() {
    let entries =
        extract_pdf_attachments(message_with_pdfs_around_a_forward().as_bytes()).unwrap();
    let names: Vec<&str> = entries.iter().map(|e| e.filename.as_str()).collect();
    // Depth-first visitation order: the forwarded message's attachment sits
    // between the two outer ones and takes the middle counter value.
    assert_eq!(
        names,
        vec!["attachment_1.pdf", "attachment_2.pdf", "attachment_3.pdf"]
    );
    assert_eq!(entries[1].content, PDF_TWO.as_bytes());
}

#[test]
fn empty_pdf_payload_is_skipped_without_consuming_a_counter_value() {
    let raw = concat!(
        "From: billing@example.com\r\n",
        "To: clerk@example.com\r\n",
        "Subject: One good, one hollow\r\n",
        "MIME-Version: 1.0\r\n",
        "Content-Type: multipart/mixed; boundary=\"outer\"\r\n",
        "\r\n",
        "--outer\r\n",
        "Content-Type: application/pdf\r\n",
        "Content-Disposition: attachment\r\n",
        "\r\n",
        "\r\n",
        "--outer\r\n",
        "Content-Type: application/pdf\r\n",
        "Content-Disposition: attachment\r\n",
        "\r\n",
        "%PDF-1.4 first fake document\r\n",
        "--outer--\r\n",
    );
    let entries = extract_pdf_attachments(raw.as_bytes()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].filename, "attachment_1.pdf");
}

#[test]
fn excessive_forward_nesting_is_rejected() {
    let mut raw = message_with_named_pdf();
    for level in 0..12 {
        raw = wrap_in_forward(&raw, level);
    }
    let err = extract_pdf_attachments(raw.as_bytes()).unwrap_err();
    let MailClerkError::Generic { code, .. } = err;
    assert_eq!(code, ErrorCode::ExceedsLimitation);
}

#[test]
fn unparseable_message_is_an_error() {
    let err = extract_pdf_attachments(b"").unwrap_err();
    let MailClerkError::Generic { code, .. } = err;
    assert_eq!(code, ErrorCode::MessageParseFailed);
}

#[test]
fn archive_round_trips_entries_in_order() {
    let entries = vec![
        PdfEntry {
            filename: "invoice.pdf".into(),
            content: PDF_ONE.as_bytes().to_vec(),
        },
        PdfEntry {
            filename: "attachment_1.pdf".into(),
            content: PDF_TWO.as_bytes().to_vec(),
        },
    ];
    let bytes = build_pdf_archive(&entries).unwrap();

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 2);

    let mut first = Vec::new();
    archive
        .by_index(0)
        .unwrap()
        .read_to_end(&mut first)
        .unwrap();
    assert_eq!(archive.by_index(0).unwrap().name(), "invoice.pdf");
    assert_eq!(first, PDF_ONE.as_bytes());

    let mut second = Vec::new();
    archive
        .by_index(1)
        .unwrap()
        .read_to_end(&mut second)
        .unwrap();
    assert_eq!(archive.by_index(1).unwrap().name(), "attachment_1.pdf");
    assert_eq!(second, PDF_TWO.as_bytes());
}

#[test]
fn duplicate_declared_names_get_numeric_suffixes() {
    let entries = vec![
        PdfEntry {
            filename: "invoice.pdf".into(),
            content: PDF_ONE.as_bytes().to_vec(),
        },
        PdfEntry {
            filename: "invoice.pdf".into(),
            content: PDF_TWO.as_bytes().to_vec(),
        },
        PdfEntry {
            filename: "invoice.pdf".into(),
            content: PDF_ONE.as_bytes().to_vec(),
        },
    ];
    let bytes = build_pdf_archive(&entries).unwrap();

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(names, vec!["invoice.pdf", "invoice_2.pdf", "invoice_3.pdf"]);
}

#[test]
fn suffixed_names_never_collide_with_later_declared_names() {
    let entries = vec![
        PdfEntry {
            filename: "invoice.pdf".into(),
            content: PDF_ONE.as_bytes().to_vec(),
        },
        PdfEntry {
            filename: "invoice.pdf".into(),
            content: PDF_TWO.as_bytes().to_vec(),
        },
        PdfEntry {
            filename: "invoice_2.pdf".into(),
            content: PDF_ONE.as_bytes().to_vec(),
        },
    ];
    let bytes = build_pdf_archive(&entries).unwrap();

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(
        names,
        vec!["invoice.pdf", "invoice_2.pdf", "invoice_2_2.pdf"]
    );
}

#[test]
fn declared_names_are_reduced_to_their_final_path_component() {
    let entries = vec![
        PdfEntry {
            filename: "../../etc/evil.pdf".into(),
            content: PDF_ONE.as_bytes().to_vec(),
        },
        PdfEntry {
            filename: "reports\\2026\\invoice.pdf".into(),
            content: PDF_TWO.as_bytes().to_vec(),
        },
        PdfEntry {
            filename: "trailing/".into(),
            content: PDF_ONE.as_bytes().to_vec(),
        },
    ];
    let bytes = build_pdf_archive(&entries).unwrap();

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(names, vec!["evil.pdf", "invoice.pdf", "attachment.pdf"]);
}

#[test]
fn archive_filename_embeds_the_uid() {
    assert_eq!(archive_filename(42), "pdf_attachments_42.zip");
}
