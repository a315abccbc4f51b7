//! mailtrack - open, click and unsubscribe tracking for HTML email bodies.
//!
//! This library provides the shared modules for the `mailtrack` binary:
//! - `tracking`: raw-text rewriting of anchors, footer and open pixel
//! - `html`: read-only inspection of where tracking landed
//! - `process`: batch jobs and `.eml` body extraction
//!
//! ## Pipeline
//!
//! ```text
//! HTML → add_link_tracking → add_unsubscribe_link → add_tracking_pixel → HTML
//! ```

pub mod config;
pub mod html;
pub mod process;
pub mod tracking;

// Re-export commonly used types
pub use config::Config;
pub use html::{inspect, TrackingReport};
pub use process::{
    parse_raw_email, process_job, run_batch, BatchSummary, JobDefaults, ParsedEmail, TrackedEmail,
    TrackingJob,
};
pub use tracking::{
    add_link_tracking, add_tracking_pixel, add_unsubscribe_link, extract_links,
    generate_unsubscribe_link, process_complete_email, process_email_for_tracking,
    validate_tracking_config, TrackingConfig, TrackingConfigError,
};
