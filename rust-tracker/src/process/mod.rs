//! Email body processing around the tracking transforms.
//!
//! ## Processing Flow
//!
//! ```text
//! TrackingJob → process_job() → TrackedEmail
//! raw .eml    → parse_raw_email() → ParsedEmail.html
//! JSON lines  → run_batch() → JSON lines
//! ```

pub mod batch;
pub mod email_source;
pub mod job;

use tracing::{debug, warn};

use crate::tracking::{
    count_trackable_links, process_complete_email, process_email_for_tracking, TrackingConfig,
    TrackingConfigError,
};

pub use batch::{run_batch, BatchSummary};
pub use email_source::{parse_raw_email, ParsedEmail};
pub use job::{JobDefaults, TrackedEmail, TrackingJob};

/// Validate a job's config and run the matching pipeline.
///
/// With the footer enabled the full pipeline runs, otherwise links and the
/// open pixel only.
pub fn process_job(
    job: TrackingJob,
    defaults: &JobDefaults,
) -> Result<TrackedEmail, TrackingConfigError> {
    let config = TrackingConfig::new(
        job.campaign_id,
        job.recipient_id,
        job.base_url
            .or_else(|| defaults.base_url.clone())
            .unwrap_or_default(),
    );

    if let Err(e) = config.validate() {
        warn!(
            campaign_id = %config.campaign_id,
            error = %e,
            "job_config_invalid"
        );
        return Err(e);
    }

    let footer = job.unsubscribe_footer.unwrap_or(defaults.unsubscribe_footer);
    let links_tracked = count_trackable_links(&job.html);

    let html = if footer {
        process_complete_email(&job.html, &config)
    } else {
        process_email_for_tracking(&job.html, &config)
    };

    debug!(
        campaign_id = %config.campaign_id,
        footer,
        links_tracked,
        "job_processed"
    );

    Ok(TrackedEmail {
        campaign_id: config.campaign_id,
        recipient_id: config.recipient_id,
        html,
        links_tracked,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(html: &str) -> TrackingJob {
        TrackingJob {
            html: html.to_string(),
            campaign_id: "c1".to_string(),
            recipient_id: "r1".to_string(),
            base_url: None,
            unsubscribe_footer: None,
        }
    }

    fn defaults() -> JobDefaults {
        JobDefaults {
            base_url: Some("https://x.io".to_string()),
            unsubscribe_footer: true,
        }
    }

    #[test]
    fn test_process_job_complete_by_default() {
        let j = job(r#"<body><a href="https://e.com">x</a></body>"#);
        let out = process_job(j, &defaults()).unwrap();

        assert_eq!(out.campaign_id, "c1");
        assert_eq!(out.recipient_id, "r1");
        assert_eq!(out.links_tracked, 1);
        assert!(out.html.contains("https://x.io/track-click?c=c1&r=r1&url=https%3A%2F%2Fe.com"));
        assert!(out.html.contains("https://x.io/unsubscribe?c=c1&r=r1"));
        assert!(out.html.contains("https://x.io/track-open?c=c1&r=r1"));
    }

    #[test]
    fn test_process_job_footer_disabled_per_job() {
        let mut j = job("<body>hi</body>");
        j.unsubscribe_footer = Some(false);

        let out = process_job(j, &defaults()).unwrap();

        assert!(!out.html.contains("/unsubscribe"));
        assert!(out.html.contains("/track-open"));
    }

    #[test]
    fn test_process_job_base_url_override() {
        let mut j = job("<body>hi</body>");
        j.base_url = Some("https://t.example".to_string());

        let out = process_job(j, &defaults()).unwrap();

        assert!(out.html.contains("https://t.example/track-open?c=c1&r=r1"));
        assert!(!out.html.contains("https://x.io"));
    }

    #[test]
    fn test_process_job_rejects_empty_recipient() {
        let mut j = job("<body>hi</body>");
        j.recipient_id.clear();

        let err = process_job(j, &defaults()).unwrap_err();
        assert_eq!(err, TrackingConfigError::Missing("recipientId"));
    }

    #[test]
    fn test_process_job_rejects_missing_base_url() {
        let err = process_job(job("<body>hi</body>"), &JobDefaults::default()).unwrap_err();
        assert_eq!(err, TrackingConfigError::Missing("baseUrl"));
    }

    #[test]
    fn test_tracking_job_deserializes_both_casings() {
        let camel: TrackingJob = serde_json::from_str(
            r#"{"html":"<p/>","campaignId":"c1","recipientId":"r1","unsubscribeFooter":false}"#,
        )
        .unwrap();
        assert_eq!(camel.unsubscribe_footer, Some(false));
        assert!(camel.base_url.is_none());

        let snake: TrackingJob = serde_json::from_str(
            r#"{"html":"<p/>","campaign_id":"c1","recipient_id":"r1","base_url":"https://x.io"}"#,
        )
        .unwrap();
        assert_eq!(snake.base_url.as_deref(), Some("https://x.io"));
    }
}
