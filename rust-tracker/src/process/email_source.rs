//! HTML body extraction from raw RFC 5322 messages, using mailparse.
//!
//! Lets `.eml` files be fed to the tracking pipeline.

use anyhow::{Context, Result};
use mailparse::{parse_mail, MailHeaderMap, ParsedMail};
use tracing::{debug, warn};

/// Headers and HTML body pulled out of a raw message.
#[derive(Debug, Default)]
pub struct ParsedEmail {
    /// Message-Id header value (without angle brackets)
    pub message_id: Option<String>,
    /// Subject header value
    pub subject: Option<String>,
    /// HTML body content
    pub html: Option<String>,
}

/// Parse a raw message (headers + body) and locate its HTML body.
///
/// A message without any HTML part parses fine and yields `html: None`.
pub fn parse_raw_email(raw: &str) -> Result<ParsedEmail> {
    let mail = parse_mail(raw.as_bytes()).context("Failed to parse email")?;

    let message_id = mail
        .headers
        .get_first_value("Message-Id")
        .map(|id| id.trim_matches(|c| c == '<' || c == '>').to_string());

    let parsed = ParsedEmail {
        message_id,
        subject: mail.headers.get_first_value("Subject"),
        html: html_body(&mail),
    };

    debug!(
        message_id = ?parsed.message_id,
        has_html = parsed.html.is_some(),
        html_length = parsed.html.as_ref().map_or(0, |h| h.len()),
        "email_source_parsed"
    );

    Ok(parsed)
}

/// Find the HTML body of a part.
///
/// `multipart/*` parts are searched recursively and multiple HTML parts are
/// joined with a newline. `text/plain` counts when it obviously holds HTML.
fn html_body(part: &ParsedMail) -> Option<String> {
    let mimetype = part.ctype.mimetype.as_str();

    if mimetype == "text/html" {
        return non_empty_body(part);
    }

    if mimetype.starts_with("multipart/") {
        let parts: Vec<String> = part.subparts.iter().filter_map(html_body).collect();
        return if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n"))
        };
    }

    if mimetype == "text/plain" {
        let body = non_empty_body(part)?;
        let lower = body.to_lowercase();
        if lower.contains("<html") || lower.contains("<body") {
            warn!("email_plain_contains_html");
            return Some(body);
        }
    }

    None
}

fn non_empty_body(part: &ParsedMail) -> Option<String> {
    match part.get_body() {
        Ok(body) if !body.trim().is_empty() => Some(body),
        Ok(_) => None,
        Err(e) => {
            warn!(error = %e, "email_body_extraction_failed");
            None
        }
    }
}
