//! HTML parsing for checking where tracking landed in a rewritten body.

use scraper::{Html, Selector};
use tracing::debug;

use super::types::TrackingReport;
use crate::tracking::urls::{TRACK_CLICK_PATH, TRACK_OPEN_PATH, UNSUBSCRIBE_PATH};
use crate::tracking::TrackingConfig;

/// Extract all image source URLs from HTML, in document order.
pub fn extract_image_sources(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("img[src]").expect("Invalid selector");

    let urls: Vec<String> = document
        .select(&selector)
        .filter_map(|img| img.value().attr("src"))
        .map(|s| s.to_string())
        .collect();

    debug!(count = urls.len(), "Extracted image sources");
    urls
}

/// Classify the links and images of `html` against `config`'s endpoints.
///
/// Prefix matching is done on the config's own base URL, so artifacts from a
/// different receiver count as untracked.
pub fn inspect(html: &str, config: &TrackingConfig) -> TrackingReport {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").expect("Invalid selector");

    let click_prefix = format!("{}{}", config.base_url, TRACK_CLICK_PATH);
    let open_prefix = format!("{}{}", config.base_url, TRACK_OPEN_PATH);
    let unsubscribe_prefix = format!("{}{}", config.base_url, UNSUBSCRIBE_PATH);

    let mut report = TrackingReport::default();

    for a in document.select(&selector) {
        let Some(href) = a.value().attr("href") else {
            continue;
        };

        report.total_links += 1;

        if href.starts_with(&click_prefix) {
            report.tracked_links += 1;
        } else if href.starts_with(&unsubscribe_prefix) {
            report.has_unsubscribe_link = true;
        } else {
            debug!(url_length = href.len(), "Untracked link");
            report.untracked_links += 1;
        }
    }

    report.has_open_pixel = extract_image_sources(html)
        .iter()
        .any(|src| src.starts_with(&open_prefix));

    debug!(
        total_links = report.total_links,
        tracked_links = report.tracked_links,
        untracked_links = report.untracked_links,
        has_open_pixel = report.has_open_pixel,
        has_unsubscribe_link = report.has_unsubscribe_link,
        "Inspected tracking"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::{process_complete_email, process_email_for_tracking};

    fn config() -> TrackingConfig {
        TrackingConfig::new("c1", "r1", "https://x.io")
    }

    #[test]
    fn test_extract_image_sources() {
        let html = r#"
            <html>
                <img src="https://example.com/img1.png">
                <img src="/relative/path.png">
                <img>
            </html>
        "#;

        let images = extract_image_sources(html);
        assert_eq!(images, vec!["https://example.com/img1.png", "/relative/path.png"]);
    }

    #[test]
    fn test_inspect_untouched_html() {
        let html = r#"<body><a href="https://a.com">a</a><a href="https://b.com">b</a></body>"#;
        let report = inspect(html, &config());

        assert_eq!(report.total_links, 2);
        assert_eq!(report.tracked_links, 0);
        assert_eq!(report.untracked_links, 2);
        assert!(!report.has_open_pixel);
        assert!(!report.has_unsubscribe_link);
        assert!(!report.is_fully_tracked());
    }

    #[test]
    fn test_inspect_complete_email() {
        let html = r#"<html><body>
            <a href="https://a.com">a</a>
            <a href='https://b.com/x?y=1'>b</a>
        </body></html>"#;
        let report = inspect(&process_complete_email(html, &config()), &config());

        assert_eq!(report.total_links, 3);
        assert_eq!(report.tracked_links, 2);
        assert_eq!(report.untracked_links, 0);
        assert!(report.has_open_pixel);
        assert!(report.has_unsubscribe_link);
        assert!(report.is_fully_tracked());
    }

    #[test]
    fn test_inspect_tracking_without_footer() {
        let html = r#"<body><a href="https://a.com">a</a></body>"#;
        let report = inspect(&process_email_for_tracking(html, &config()), &config());

        assert_eq!(report.tracked_links, 1);
        assert!(report.has_open_pixel);
        assert!(!report.has_unsubscribe_link);
    }

    #[test]
    fn test_inspect_other_receiver_counts_as_untracked() {
        let other = TrackingConfig::new("c1", "r1", "https://other.io");
        let html = process_complete_email(r#"<body><a href="https://a.com">a</a></body>"#, &other);
        let report = inspect(&html, &config());

        assert_eq!(report.tracked_links, 0);
        assert_eq!(report.untracked_links, 2);
        assert!(!report.has_open_pixel);
    }

    #[test]
    fn test_inspect_serializes_camel_case() {
        let json = serde_json::to_string(&TrackingReport::default()).unwrap();
        assert!(json.contains(r#""hasOpenPixel":false"#));
        assert!(json.contains(r#""totalLinks":0"#));
    }
}
