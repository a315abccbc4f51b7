//! Read-only HTML inspection of tracked email bodies.

pub mod parser;
pub mod types;

pub use parser::{extract_image_sources, inspect};
pub use types::TrackingReport;
