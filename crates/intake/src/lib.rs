//! Item report intake
//!
//! Reports enter the system here. A client submission arrives as a
//! [`RawReport`] with every field optional; [`validate_report`] checks the
//! required fields, sanitizes text and enforces size limits, and hands back a
//! [`store::NewItem`] that the item store can stamp with an id.
//!
//! ## What we do here
//!
//! - **Presence checks** in a fixed order so clients always see the same
//!   first complaint for the same submission.
//! - **Sanitize text**: strip control characters, trim, and cap byte length.
//! - **Bound detections**: cap the number of objects carried in `aiAnalysis`.
//! - **Parse detection output** from the image-analysis workflow via
//!   [`parse_detection_output`].
//!
//! ## Example
//!
//! ```
//! use intake::{validate_report, IntakeConfig, RawReport};
//!
//! let raw = RawReport {
//!     item_name: Some("  Blue umbrella ".into()),
//!     category: Some("Accessories".into()),
//!     location: Some("Bus stop".into()),
//!     date: Some("2024-10-02".into()),
//!     contact_info: Some("555-0100".into()),
//!     ..Default::default()
//! };
//!
//! let item = validate_report(raw, &IntakeConfig::default()).unwrap();
//! assert_eq!(item.item_name, "Blue umbrella");
//! assert_eq!(item.color, "");
//! ```
use std::time::Instant;

use store::NewItem;
use tracing::{info, warn, Level};

mod config;
mod detection;
mod error;
mod report;

pub use crate::config::{ConfigError, IntakeConfig};
pub use crate::detection::parse_detection_output;
pub use crate::error::IntakeError;
pub use crate::report::RawReport;

use crate::report::{sanitize_field, sanitize_optional};

/// Validate and normalize a client report.
pub fn validate_report(raw: RawReport, cfg: &IntakeConfig) -> Result<NewItem, IntakeError> {
    let start = Instant::now();
    let span = tracing::span!(Level::DEBUG, "intake.validate_report");
    let _guard = span.enter();

    match validate_inner(raw, cfg) {
        Ok(item) => {
            info!(
                category = %item.category,
                detected_objects = item.ai_analysis.as_ref().map_or(0, |a| a.detected_objects.len()),
                elapsed_micros = start.elapsed().as_micros(),
                "intake_accepted"
            );
            Ok(item)
        }
        Err(err) => {
            warn!(
                error = %err,
                elapsed_micros = start.elapsed().as_micros(),
                "intake_rejected"
            );
            Err(err)
        }
    }
}

fn validate_inner(raw: RawReport, cfg: &IntakeConfig) -> Result<NewItem, IntakeError> {
    if let Some(field) = raw.first_missing() {
        return Err(IntakeError::MissingField(field.to_string()));
    }

    if let (Some(limit), Some(analysis)) = (cfg.max_detected_objects, raw.ai_analysis.as_ref()) {
        let count = analysis.detected_objects.len();
        if count > limit {
            return Err(IntakeError::TooManyDetections { count, limit });
        }
    }

    let RawReport {
        item_name,
        category,
        color,
        location,
        date,
        description,
        contact_info,
        image_ref,
        ai_analysis,
    } = raw;

    let item_name = sanitize_field("itemName", item_name.unwrap_or_default(), cfg)?;
    if item_name.is_empty() {
        return Err(IntakeError::MissingField("itemName".into()));
    }

    Ok(NewItem {
        item_name,
        category: sanitize_field("category", category.unwrap_or_default(), cfg)?,
        color: sanitize_field("color", color.unwrap_or_default(), cfg)?,
        location: sanitize_field("location", location.unwrap_or_default(), cfg)?,
        date: sanitize_field("date", date.unwrap_or_default(), cfg)?,
        description: sanitize_field("description", description.unwrap_or_default(), cfg)?,
        contact_info: sanitize_field("contactInfo", contact_info.unwrap_or_default(), cfg)?,
        image_ref: sanitize_optional("image", image_ref, cfg)?,
        // An empty analysis carries no information for matching.
        ai_analysis: ai_analysis.filter(|a| !a.is_empty()),
    })
}
