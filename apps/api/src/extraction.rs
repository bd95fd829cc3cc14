//! Raw text extraction from uploaded resume files.
//!
//! Decoding failure is not an error at this boundary: a file that cannot be
//! decoded yields an empty string and the caller degrades to manual entry.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Docx,
    Txt,
}

impl FileKind {
    /// Best-effort detection from the uploaded file name. Unknown extensions
    /// are treated as plain text.
    pub fn from_file_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.ends_with(".pdf") {
            FileKind::Pdf
        } else if lower.ends_with(".docx") {
            FileKind::Docx
        } else {
            FileKind::Txt
        }
    }
}

pub fn extract_text(data: &[u8], kind: FileKind) -> String {
    match kind {
        FileKind::Pdf => pdf_extract::extract_text_from_mem(data).unwrap_or_else(|e| {
            warn!("pdf decode failed: {e}");
            String::new()
        }),
        FileKind::Docx => extract_docx_text(data).unwrap_or_else(|e| {
            warn!("docx decode failed: {e}");
            String::new()
        }),
        FileKind::Txt => String::from_utf8_lossy(data).into_owned(),
    }
}

// A .docx is a zip archive; the document body lives in word/document.xml and
// visible text in <w:t> runs, one <w:p> per paragraph.
fn extract_docx_text(data: &[u8]) -> anyhow::Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
    let mut doc_xml = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut doc_xml)?;

    let mut reader = quick_xml::Reader::from_str(&doc_xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"p" => current.clear(),
                b"t" => in_text_run = true,
                _ => {}
            },
            Event::Text(e) => {
                if in_text_run {
                    current.push_str(&e.unescape()?);
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => {
                    if !current.trim().is_empty() {
                        paragraphs.push(current.trim().to_string());
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs.join("\n"))
}
