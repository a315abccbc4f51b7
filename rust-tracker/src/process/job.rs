//! Batch job types for JSON-lines processing.

use serde::{Deserialize, Serialize};

/// One email body to track, as read from a batch input line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingJob {
    /// HTML body to rewrite
    pub html: String,
    /// Campaign identifier
    #[serde(alias = "campaign_id")]
    pub campaign_id: String,
    /// Recipient identifier
    #[serde(alias = "recipient_id")]
    pub recipient_id: String,
    /// Per-job receiver; falls back to [`JobDefaults::base_url`]
    #[serde(default, alias = "base_url")]
    pub base_url: Option<String>,
    /// Per-job footer switch; falls back to [`JobDefaults::unsubscribe_footer`]
    #[serde(default, alias = "unsubscribe_footer")]
    pub unsubscribe_footer: Option<bool>,
}

/// Rewritten body emitted for each accepted job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEmail {
    pub campaign_id: String,
    pub recipient_id: String,
    pub html: String,
    /// Number of links routed through click tracking
    pub links_tracked: usize,
}

/// Values applied to jobs that leave a field out.
#[derive(Debug, Clone, Default)]
pub struct JobDefaults {
    pub base_url: Option<String>,
    pub unsubscribe_footer: bool,
}
