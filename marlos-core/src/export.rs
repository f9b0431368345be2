//! Transcript export: plain text, JSON, or a printable HTML page.

use std::fmt::Write as _;
use std::str::FromStr;

use crate::error::{MarlosError, Result};
use crate::types::ChatMessage;

/// Output format for [`render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// `<timestamp> <ROLE>: <text>` per line.
    Txt,
    /// Pretty-printed array of history records.
    Json,
    /// Self-contained page meant for "print to PDF".
    Html,
}

impl ExportFormat {
    /// Suggested download file name.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Txt => "chat_smr.txt",
            Self::Json => "chat_smr.json",
            Self::Html => "chat_smr.html",
        }
    }

    /// MIME type of the rendered output.
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Txt => "text/plain",
            Self::Json => "application/json",
            Self::Html => "text/html",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = MarlosError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(Self::Txt),
            "json" => Ok(Self::Json),
            "html" | "pdf" => Ok(Self::Html),
            other => Err(MarlosError::Config(format!("unknown export format: {other}"))),
        }
    }
}

/// Render `history` in `format`.
///
/// Returns `Ok(None)` when there is nothing to export.
///
/// # Errors
/// Returns [`MarlosError::Serialization`] if JSON encoding fails.
pub fn render(history: &[ChatMessage], format: ExportFormat) -> Result<Option<String>> {
    if history.is_empty() {
        return Ok(None);
    }
    let out = match format {
        ExportFormat::Txt => to_txt(history),
        ExportFormat::Json => to_json(history)?,
        ExportFormat::Html => to_html(history),
    };
    Ok(Some(out))
}

/// One `<timestamp> <ROLE>: <text>` line per message.
#[must_use]
pub fn to_txt(history: &[ChatMessage]) -> String {
    history
        .iter()
        .map(|m| {
            format!(
                "{} {}: {}",
                m.timestamp_iso(),
                m.role.as_str().to_uppercase(),
                m.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pretty-printed JSON array, same shape as the stored records.
///
/// # Errors
/// Returns [`MarlosError::Serialization`] if encoding fails.
pub fn to_json(history: &[ChatMessage]) -> Result<String> {
    serde_json::to_string_pretty(history).map_err(|e| MarlosError::Serialization(e.to_string()))
}

/// Printable HTML transcript.
#[must_use]
pub fn to_html(history: &[ChatMessage]) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Chatbot Cloud SMR: transcript</title>\n\
         <style>\n\
         body { font-family: Arial, sans-serif; padding: 20px; }\n\
         h1 { font-size: 20px; }\n\
         .msg { margin-bottom: 10px; }\n\
         .role { font-weight: bold; }\n\
         .ts { color: #666; font-size: 12px; }\n\
         hr { margin: 14px 0; }\n\
         </style></head><body>\n\
         <h1>Chatbot Cloud SMR: transcript</h1>\n<hr>\n",
    );
    for m in history {
        let _ = write!(
            html,
            "<div class=\"msg\">\n  <span class=\"role\">{}</span>:\n  <span>{}</span>\n  <div class=\"ts\">{}</div>\n</div>\n",
            m.role.as_str().to_uppercase(),
            escape_html(&m.text),
            m.timestamp_iso()
        );
    }
    html.push_str("</body></html>\n");
    html
}

/// Escape `& < > " '` for safe embedding in HTML.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;
    use crate::types::Role;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s)
            .expect("valid timestamp")
            .with_timezone(&Utc)
    }

    fn sample() -> Vec<ChatMessage> {
        vec![
            ChatMessage::at(Role::User, "¿qué es <dns>?", ts("2024-05-01T10:00:00Z")),
            ChatMessage::at(Role::Bot, "Traduce \"nombres\"", ts("2024-05-01T10:00:01.250Z")),
        ]
    }

    #[test]
    fn empty_history_exports_nothing() {
        for format in [ExportFormat::Txt, ExportFormat::Json, ExportFormat::Html] {
            assert!(render(&[], format).expect("renders").is_none());
        }
    }

    #[test]
    fn txt_lines() {
        let txt = to_txt(&sample());
        assert_eq!(
            txt,
            "2024-05-01T10:00:00.000Z USER: ¿qué es <dns>?\n2024-05-01T10:00:01.250Z BOT: Traduce \"nombres\""
        );
    }

    #[test]
    fn json_parses_back() {
        let json = render(&sample(), ExportFormat::Json)
            .expect("renders")
            .expect("non-empty");
        let back: Vec<ChatMessage> = serde_json::from_str(&json).expect("valid json");
        assert_eq!(back, sample());
    }

    #[test]
    fn html_escapes_text() {
        let html = to_html(&sample());
        assert!(html.contains("&lt;dns&gt;"));
        assert!(html.contains("&quot;nombres&quot;"));
        assert!(!html.contains("<dns>"));
        assert_eq!(escape_html("a & 'b'"), "a &amp; &#039;b&#039;");
    }

    #[test]
    fn format_parsing() {
        assert_eq!("TXT".parse::<ExportFormat>().expect("known"), ExportFormat::Txt);
        assert_eq!("pdf".parse::<ExportFormat>().expect("known"), ExportFormat::Html);
        assert!("docx".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Json.file_name(), "chat_smr.json");
    }
}
