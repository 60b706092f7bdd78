use serde::{Deserialize, Serialize};
use store::AiAnalysis;

use crate::config::IntakeConfig;
use crate::error::IntakeError;

/// A report exactly as submitted by a client. Nothing is trusted yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReport {
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub contact_info: Option<String>,
    #[serde(rename = "image", default)]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub ai_analysis: Option<AiAnalysis>,
}

/// Presence check order for required fields.
pub(crate) const REQUIRED_FIELDS: [&str; 5] =
    ["itemName", "category", "location", "date", "contactInfo"];

impl RawReport {
    pub(crate) fn required(&self, field: &str) -> Option<&String> {
        match field {
            "itemName" => self.item_name.as_ref(),
            "category" => self.category.as_ref(),
            "location" => self.location.as_ref(),
            "date" => self.date.as_ref(),
            "contactInfo" => self.contact_info.as_ref(),
            _ => None,
        }
    }

    /// First required field that is absent, in check order.
    pub(crate) fn first_missing(&self) -> Option<&'static str> {
        REQUIRED_FIELDS
            .into_iter()
            .find(|field| self.required(field).is_none())
    }
}

/// Control whitespace (line breaks, tabs) becomes a single space and other
/// control characters are dropped, when configured. Trims, then enforces the
/// per-field byte limit.
pub(crate) fn sanitize_field(
    field: &'static str,
    value: String,
    cfg: &IntakeConfig,
) -> Result<String, IntakeError> {
    let filtered = if cfg.strip_control_chars {
        value
            .replace("\r\n", "\n")
            .chars()
            .filter_map(|c| match c {
                c if c.is_control() && c.is_whitespace() => Some(' '),
                c if c.is_control() => None,
                c => Some(c),
            })
            .collect::<String>()
    } else {
        value
    };
    enforce_limit(field, filtered.trim(), cfg)
}

fn enforce_limit(field: &'static str, value: &str, cfg: &IntakeConfig) -> Result<String, IntakeError> {
    if let Some(limit) = cfg.max_field_bytes {
        if value.len() > limit {
            return Err(IntakeError::FieldTooLong {
                field,
                len: value.len(),
                limit,
            });
        }
    }
    Ok(value.to_string())
}

/// Optional fields collapse to `None` when nothing is left after sanitizing.
pub(crate) fn sanitize_optional(
    field: &'static str,
    value: Option<String>,
    cfg: &IntakeConfig,
) -> Result<Option<String>, IntakeError> {
    match value {
        Some(raw) => {
            let clean = sanitize_field(field, raw, cfg)?;
            Ok((!clean.is_empty()).then_some(clean))
        }
        None => Ok(None),
    }
}
