//! Type definitions for HTML inspection.

use serde::Serialize;

/// Tracking artifacts found in an HTML body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingReport {
    /// Every `<a href>` in the document
    pub total_links: usize,
    /// Links routed through this config's click endpoint
    pub tracked_links: usize,
    /// Links that are neither tracked nor this config's unsubscribe link
    pub untracked_links: usize,
    /// Whether this config's open pixel is present
    pub has_open_pixel: bool,
    /// Whether this config's unsubscribe link is present
    pub has_unsubscribe_link: bool,
}

impl TrackingReport {
    /// True when every link is tracked and both the pixel and footer link exist.
    pub fn is_fully_tracked(&self) -> bool {
        self.untracked_links == 0 && self.has_open_pixel && self.has_unsubscribe_link
    }
}
