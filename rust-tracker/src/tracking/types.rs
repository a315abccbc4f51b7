//! Type definitions for tracking injection.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifiers and endpoint prefix used to build every tracking URL.
///
/// Constructed by the caller, borrowed by the transforms, never mutated.
/// JSON field names are camelCase; snake_case is accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingConfig {
    /// Opaque campaign identifier
    #[serde(alias = "campaign_id")]
    pub campaign_id: String,
    /// Opaque recipient identifier
    #[serde(alias = "recipient_id")]
    pub recipient_id: String,
    /// Absolute base URL of the tracking receiver, used verbatim as a prefix
    #[serde(alias = "base_url")]
    pub base_url: String,
}

/// Reasons a [`TrackingConfig`] cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackingConfigError {
    /// A required field is empty. Carries the camelCase field name.
    #[error("tracking config field `{0}` must not be empty")]
    Missing(&'static str),
}

impl TrackingConfig {
    pub fn new(
        campaign_id: impl Into<String>,
        recipient_id: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            campaign_id: campaign_id.into(),
            recipient_id: recipient_id.into(),
            base_url: base_url.into(),
        }
    }

    /// Check that every field is non-empty, reporting the first one that is not.
    ///
    /// Whitespace-only values count as present.
    pub fn validate(&self) -> Result<(), TrackingConfigError> {
        let fields = [
            ("campaignId", &self.campaign_id),
            ("recipientId", &self.recipient_id),
            ("baseUrl", &self.base_url),
        ];

        match fields.iter().find(|(_, value)| value.is_empty()) {
            Some((name, _)) => Err(TrackingConfigError::Missing(*name)),
            None => Ok(()),
        }
    }
}

/// True iff campaign id, recipient id and base URL are all non-empty.
///
/// The transforms never call this themselves; callers validate first.
pub fn validate_tracking_config(config: &TrackingConfig) -> bool {
    config.validate().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TrackingConfig {
        TrackingConfig::new("c1", "r1", "https://x.io")
    }

    #[test]
    fn test_validate_complete_config() {
        assert!(validate_tracking_config(&config()));
        assert_eq!(config().validate(), Ok(()));
    }

    #[test]
    fn test_validate_reports_each_missing_field() {
        let mut c = config();
        c.campaign_id.clear();
        assert_eq!(c.validate(), Err(TrackingConfigError::Missing("campaignId")));
        assert!(!validate_tracking_config(&c));

        let mut c = config();
        c.recipient_id.clear();
        assert_eq!(c.validate(), Err(TrackingConfigError::Missing("recipientId")));
        assert!(!validate_tracking_config(&c));

        let mut c = config();
        c.base_url.clear();
        assert_eq!(c.validate(), Err(TrackingConfigError::Missing("baseUrl")));
        assert!(!validate_tracking_config(&c));
    }

    #[test]
    fn test_validate_reports_first_missing_field() {
        let c = TrackingConfig::new("", "", "");
        assert_eq!(c.validate(), Err(TrackingConfigError::Missing("campaignId")));
    }

    #[test]
    fn test_validate_whitespace_counts_as_present() {
        let c = TrackingConfig::new(" ", "r1", "https://x.io");
        assert!(validate_tracking_config(&c));
    }

    #[test]
    fn test_error_message_names_field() {
        let err = TrackingConfigError::Missing("baseUrl");
        assert_eq!(err.to_string(), "tracking config field `baseUrl` must not be empty");
    }

    #[test]
    fn test_deserialize_camel_case() {
        let c: TrackingConfig = serde_json::from_str(
            r#"{"campaignId":"c1","recipientId":"r1","baseUrl":"https://x.io"}"#,
        )
        .unwrap();
        assert_eq!(c, config());
    }

    #[test]
    fn test_deserialize_snake_case() {
        let c: TrackingConfig = serde_json::from_str(
            r#"{"campaign_id":"c1","recipient_id":"r1","base_url":"https://x.io"}"#,
        )
        .unwrap();
        assert_eq!(c, config());
    }

    #[test]
    fn test_serialize_uses_camel_case() {
        let json = serde_json::to_string(&config()).unwrap();
        assert!(json.contains(r#""campaignId":"c1""#));
        assert!(json.contains(r#""baseUrl":"https://x.io""#));
    }
}
