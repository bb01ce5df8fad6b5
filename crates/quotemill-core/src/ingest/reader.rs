use std::path::Path;

use mailparse::{parse_mail, MailParseError, ParsedMail};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Email parse failed: {0}")]
    Mail(#[from] MailParseError),
    #[error("Message has no readable body")]
    EmptyBody,
}

pub type ReadResult<T> = Result<T, ReadError>;

/// Supported input containers, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFormat {
    /// RFC 5322 message, possibly multipart.
    Eml,
    /// Raw HTML body, no envelope.
    Html,
    /// Raw plain-text body, no envelope.
    PlainText,
}

impl MessageFormat {
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "eml" => Some(Self::Eml),
            "html" | "htm" => Some(Self::Html),
            "txt" => Some(Self::PlainText),
            _ => None,
        }
    }
}

/// Read the message body from a file, selecting the parser by extension.
pub fn read_body(path: &Path) -> ReadResult<String> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let format = MessageFormat::from_extension(ext)
        .ok_or_else(|| ReadError::UnsupportedFormat(ext.to_string()))?;

    let data = std::fs::read(path)?;
    extract_body(&data, format)
}

/// Extract the body text from raw message bytes.
///
/// For email containers the HTML part is preferred over the plain-text
/// part, falling back to the top-level body; raw HTML/text inputs pass
/// through verbatim.
pub fn extract_body(data: &[u8], format: MessageFormat) -> ReadResult<String> {
    match format {
        MessageFormat::Eml => {
            let mail = parse_mail(data)?;
            body_of(&mail)
        }
        MessageFormat::Html | MessageFormat::PlainText => {
            Ok(String::from_utf8_lossy(data).into_owned())
        }
    }
}

fn body_of(mail: &ParsedMail<'_>) -> ReadResult<String> {
    if let Some(part) = find_part(mail, "text/html") {
        return Ok(part.get_body()?);
    }
    if let Some(part) = find_part(mail, "text/plain") {
        return Ok(part.get_body()?);
    }

    let body = mail.get_body()?;
    if body.trim().is_empty() {
        return Err(ReadError::EmptyBody);
    }
    Ok(body)
}

fn find_part<'a>(mail: &'a ParsedMail<'a>, mime: &str) -> Option<&'a ParsedMail<'a>> {
    if mail.ctype.mimetype.eq_ignore_ascii_case(mime) {
        return Some(mail);
    }
    mail.subparts.iter().find_map(|part| find_part(part, mime))
}
