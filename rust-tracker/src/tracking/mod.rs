//! Tracking injection for HTML email bodies.
//!
//! ## Pipelines
//!
//! ```text
//! process_email_for_tracking: add_link_tracking → add_tracking_pixel
//! process_complete_email:     add_link_tracking → add_unsubscribe_link → add_tracking_pixel
//! ```

pub mod processor;
pub mod types;
pub mod urls;

pub use processor::{
    add_link_tracking, add_tracking_pixel, add_unsubscribe_link, count_trackable_links,
    extract_links, process_complete_email, process_email_for_tracking, tracking_pixel_tag,
    unsubscribe_footer,
};
pub use types::{validate_tracking_config, TrackingConfig, TrackingConfigError};
pub use urls::{
    click_tracking_url, encode_url_component, generate_unsubscribe_link, open_tracking_url,
};
