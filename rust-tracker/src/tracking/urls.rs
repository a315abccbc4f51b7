//! Builders for the tracking receiver's URL contract.
//!
//! | Purpose     | Template                                                   |
//! |-------------|------------------------------------------------------------|
//! | Open        | `{base}/track-open?c={campaign}&r={recipient}`             |
//! | Click       | `{base}/track-click?c={campaign}&r={recipient}&url={enc}`  |
//! | Unsubscribe | `{base}/unsubscribe?c={campaign}&r={recipient}`            |
//!
//! Campaign and recipient ids are inserted as-is. Only the click target is
//! percent-encoded.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::types::TrackingConfig;

/// Path marking an already-wrapped click URL.
pub const TRACK_CLICK_PATH: &str = "/track-click";

/// Path of the open pixel endpoint.
pub const TRACK_OPEN_PATH: &str = "/track-open";

/// Path of the unsubscribe endpoint.
pub const UNSUBSCRIBE_PATH: &str = "/unsubscribe";

/// Everything except the `encodeURIComponent` unreserved set.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a value for use as a single query parameter.
pub fn encode_url_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

fn endpoint(config: &TrackingConfig, path: &str) -> String {
    format!(
        "{}{}?c={}&r={}",
        config.base_url, path, config.campaign_id, config.recipient_id
    )
}

/// URL the open pixel loads.
pub fn open_tracking_url(config: &TrackingConfig) -> String {
    endpoint(config, TRACK_OPEN_PATH)
}

/// URL that records a click on `target` before redirecting to it.
pub fn click_tracking_url(config: &TrackingConfig, target: &str) -> String {
    format!(
        "{}&url={}",
        endpoint(config, TRACK_CLICK_PATH),
        encode_url_component(target)
    )
}

/// Direct (untracked) unsubscribe URL for this recipient.
pub fn generate_unsubscribe_link(config: &TrackingConfig) -> String {
    endpoint(config, UNSUBSCRIBE_PATH)
}
