//! Raw-text rewriting of HTML email bodies.
//!
//! Every transform is total: malformed markup, a missing `</body>` or an
//! invalid [`TrackingConfig`] never cause a failure. Config validation is left
//! to the caller (see [`validate_tracking_config`](super::validate_tracking_config)).

use std::sync::LazyLock;

use regex::{Captures, Match, Regex};
use tracing::debug;

use super::types::TrackingConfig;
use super::urls::{
    click_tracking_url, generate_unsubscribe_link, open_tracking_url, TRACK_CLICK_PATH,
};

/// `<a ... href="URL" ...>` with either quote style. Group 1 is a
/// double-quoted value, group 2 a single-quoted one.
///
/// Attributes before `href` are skipped whole, quoted values included, so an
/// `href=` inside another attribute's value never matches.
static ANCHOR_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?i)<a\s+"#,
        r#"(?:[^>"'\s=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>"']+))?\s+)*?"#,
        r#"href\s*=\s*(?:"([^"]*)"|'([^']*)')"#,
    ))
    .expect("Invalid anchor pattern")
});

static BODY_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</body\s*>").expect("Invalid body pattern"));

/// Substring that keeps a link out of click tracking.
const UNSUBSCRIBE_MARKER: &str = "unsubscribe";

fn href_value<'h>(caps: &Captures<'h>) -> Option<Match<'h>> {
    caps.get(1).or_else(|| caps.get(2))
}

/// Already wrapped, or an unsubscribe link that must stay direct.
fn is_skipped(url: &str) -> bool {
    url.contains(TRACK_CLICK_PATH) || url.contains(UNSUBSCRIBE_MARKER)
}

/// Insert `fragment` right before the first closing body tag, or append it.
fn insert_before_body_close(html: &str, fragment: &str) -> String {
    let mut out = String::with_capacity(html.len() + fragment.len());

    match BODY_CLOSE.find(html) {
        Some(close) => {
            out.push_str(&html[..close.start()]);
            out.push_str(fragment);
            out.push_str(&html[close.start()..]);
        }
        None => {
            out.push_str(html);
            out.push_str(fragment);
        }
    }

    out
}

/// All href values in document order, duplicates included.
pub fn extract_links(html: &str) -> Vec<String> {
    let links: Vec<String> = ANCHOR_HREF
        .captures_iter(html)
        .filter_map(|caps| href_value(&caps).map(|m| m.as_str().to_string()))
        .collect();

    debug!(count = links.len(), "links_extracted");
    links
}

/// Number of links [`add_link_tracking`] would rewrite.
pub fn count_trackable_links(html: &str) -> usize {
    extract_links(html)
        .iter()
        .filter(|url| !is_skipped(url))
        .count()
}

/// Route every anchor through the click tracking endpoint.
///
/// Hrefs already containing `/track-click` or `unsubscribe` are left alone,
/// which makes the transform idempotent. Only the href value changes; the
/// quote character and every other attribute are kept verbatim.
pub fn add_link_tracking(html: &str, config: &TrackingConfig) -> String {
    let mut rewritten = 0usize;
    let mut skipped = 0usize;

    let out = ANCHOR_HREF.replace_all(html, |caps: &Captures| {
        match (caps.get(0), href_value(caps)) {
            (Some(tag), Some(href)) if !is_skipped(href.as_str()) => {
                rewritten += 1;
                let tag_text = tag.as_str();
                let value_start = href.start() - tag.start();
                let value_end = href.end() - tag.start();
                format!(
                    "{}{}{}",
                    &tag_text[..value_start],
                    click_tracking_url(config, href.as_str()),
                    &tag_text[value_end..]
                )
            }
            _ => {
                skipped += 1;
                caps[0].to_string()
            }
        }
    });

    debug!(
        campaign_id = %config.campaign_id,
        links_rewritten = rewritten,
        links_skipped = skipped,
        "link_tracking_complete"
    );

    out.into_owned()
}

/// The invisible 1x1 open pixel for this recipient.
pub fn tracking_pixel_tag(config: &TrackingConfig) -> String {
    format!(
        r#"<img src="{}" width="1" height="1" style="display:none;" alt="" />"#,
        open_tracking_url(config)
    )
}

/// Add the open pixel before `</body>`, or at the end when there is none.
pub fn add_tracking_pixel(html: &str, config: &TrackingConfig) -> String {
    let out = insert_before_body_close(html, &tracking_pixel_tag(config));

    debug!(
        campaign_id = %config.campaign_id,
        html_length = out.len(),
        "tracking_pixel_added"
    );

    out
}

/// The unsubscribe footer block. Its link is direct, never tracked.
pub fn unsubscribe_footer(config: &TrackingConfig) -> String {
    format!(
        concat!(
            "\n<div style=\"margin-top: 20px; padding-top: 20px; border-top: 1px solid #eee; ",
            "font-size: 12px; color: #666; text-align: center;\">\n",
            "  <p>You are receiving this email because you subscribed to our list.</p>\n",
            "  <p><a href=\"{}\" style=\"color: #666;\">Unsubscribe</a></p>\n",
            "</div>\n"
        ),
        generate_unsubscribe_link(config)
    )
}

/// Add the unsubscribe footer before `</body>`, or at the end when there is none.
pub fn add_unsubscribe_link(html: &str, config: &TrackingConfig) -> String {
    let out = insert_before_body_close(html, &unsubscribe_footer(config));

    debug!(
        campaign_id = %config.campaign_id,
        html_length = out.len(),
        "unsubscribe_footer_added"
    );

    out
}

/// Link tracking followed by the open pixel, without a footer.
pub fn process_email_for_tracking(html: &str, config: &TrackingConfig) -> String {
    let tracked = add_link_tracking(html, config);
    add_tracking_pixel(&tracked, config)
}

/// Link tracking, then the unsubscribe footer, then the open pixel.
///
/// Links are rewritten before the footer exists so its anchor stays direct.
/// The pixel goes in last and ends up between the footer and `</body>`.
pub fn process_complete_email(html: &str, config: &TrackingConfig) -> String {
    let tracked = add_link_tracking(html, config);
    let with_footer = add_unsubscribe_link(&tracked, config);
    add_tracking_pixel(&with_footer, config)
}
