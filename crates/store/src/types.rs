use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::StoreError;

/// The two independent record sets. Ids are assigned per collection, so a lost
/// item and a found item may share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Lost,
    Found,
}

impl ItemKind {
    pub const ALL: [ItemKind; 2] = [ItemKind::Lost, ItemKind::Found];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Lost => "lost",
            ItemKind::Found => "found",
        }
    }

    /// Status stamped on every record created in this collection.
    pub fn default_status(&self) -> ItemStatus {
        match self {
            ItemKind::Lost => ItemStatus::Active,
            ItemKind::Found => ItemStatus::Available,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lost" => Ok(ItemKind::Lost),
            "found" => Ok(ItemKind::Found),
            other => Err(StoreError::InvalidItemType(other.to_string())),
        }
    }
}

/// Record status. The store only ever assigns `active` or `available`, but
/// any other value already present in a collection is kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemStatus {
    /// Lost report still open.
    Active,
    /// Found item waiting for its owner.
    Available,
    Other(String),
}

impl ItemStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ItemStatus::Active => "active",
            ItemStatus::Available => "available",
            ItemStatus::Other(status) => status.as_str(),
        }
    }
}

impl From<String> for ItemStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "active" => ItemStatus::Active,
            "available" => ItemStatus::Available,
            _ => ItemStatus::Other(status),
        }
    }
}

impl From<ItemStatus> for String {
    fn from(status: ItemStatus) -> Self {
        match status {
            ItemStatus::Other(status) => status,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One label produced by the external image-analysis service.
///
/// Only `class` is consumed by matching; confidence and the bounding box are
/// kept as delivered and never validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    pub class: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default = "empty_bbox")]
    pub bbox: serde_json::Value,
}

impl DetectedObject {
    /// Label-only detection, as sent by match queries.
    pub fn labelled(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            confidence: 0.0,
            bbox: empty_bbox(),
        }
    }
}

fn empty_bbox() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Detection payload attached to a report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysis {
    #[serde(default)]
    pub detected_objects: Vec<DetectedObject>,
}

impl AiAnalysis {
    pub fn new(detected_objects: Vec<DetectedObject>) -> Self {
        Self { detected_objects }
    }

    pub fn is_empty(&self) -> bool {
        self.detected_objects.is_empty()
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.detected_objects.iter().map(|obj| obj.class.as_str())
    }
}

/// A persisted lost or found report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub id: u64,
    pub item_name: String,
    pub category: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub color: String,
    pub location: String,
    pub date: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub contact_info: String,
    #[serde(rename = "image", default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    pub status: ItemStatus,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub reported_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<AiAnalysis>,
}

impl ItemRecord {
    /// Stamp a validated report with the fields the store owns.
    pub fn from_new(kind: ItemKind, id: u64, reported_at: DateTime<Utc>, item: NewItem) -> Self {
        Self {
            id,
            item_name: item.item_name,
            category: item.category,
            color: item.color,
            location: item.location,
            date: item.date,
            description: item.description,
            contact_info: item.contact_info,
            image_ref: item.image_ref,
            status: kind.default_status(),
            reported_at,
            ai_analysis: item.ai_analysis,
        }
    }

    pub fn detected_classes(&self) -> impl Iterator<Item = &str> {
        self.ai_analysis.iter().flat_map(|analysis| analysis.classes())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts RFC 3339 or a naive ISO-8601 timestamp, which is read as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|err| serde::de::Error::custom(format!("invalid timestamp {raw:?}: {err}")))
}

/// A report that has passed intake but has no id, timestamp or status yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub item_name: String,
    pub category: String,
    #[serde(default)]
    pub color: String,
    pub location: String,
    pub date: String,
    #[serde(default)]
    pub description: String,
    pub contact_info: String,
    #[serde(rename = "image", default)]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub ai_analysis: Option<AiAnalysis>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_parses_known_names_only() {
        assert_eq!("lost".parse::<ItemKind>().unwrap(), ItemKind::Lost);
        assert_eq!("found".parse::<ItemKind>().unwrap(), ItemKind::Found);
        let err = "Lost".parse::<ItemKind>().unwrap_err();
        assert!(matches!(err, StoreError::InvalidItemType(name) if name == "Lost"));
    }

    #[test]
    fn record_uses_camel_case_wire_names() {
        let record = ItemRecord {
            id: 7,
            item_name: "Blue umbrella".into(),
            category: "Accessories".into(),
            color: "Blue".into(),
            location: "Library".into(),
            date: "2024-03-01".into(),
            description: String::new(),
            contact_info: "a@b.c".into(),
            image_ref: Some("uploads/u.jpg".into()),
            status: ItemStatus::Active,
            reported_at: Utc::now(),
            ai_analysis: Some(AiAnalysis::new(vec![DetectedObject::labelled("umbrella")])),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["itemName"], "Blue umbrella");
        assert_eq!(value["contactInfo"], "a@b.c");
        assert_eq!(value["image"], "uploads/u.jpg");
        assert_eq!(value["status"], "active");
        assert!(value.get("reportedAt").is_some());
        assert_eq!(value["aiAnalysis"]["detected_objects"][0]["class"], "umbrella");
    }

    #[test]
    fn naive_timestamps_read_as_utc() {
        let record: ItemRecord = serde_json::from_value(json!({
            "id": 1,
            "itemName": "Scarf",
            "category": "Clothing",
            "location": "Hall",
            "date": "2024-09-30",
            "contactInfo": "x",
            "status": "available",
            "reportedAt": "2024-09-30T10:00:00.123456"
        }))
        .unwrap();
        assert_eq!(record.reported_at.to_rfc3339(), "2024-09-30T10:00:00.123456+00:00");

        let offset: ItemRecord = serde_json::from_value(json!({
            "id": 2,
            "itemName": "Hat",
            "category": "Clothing",
            "location": "Hall",
            "date": "2024-09-30",
            "contactInfo": "x",
            "status": "available",
            "reportedAt": "2024-09-30T12:00:00+02:00"
        }))
        .unwrap();
        assert_eq!(offset.reported_at.to_rfc3339(), "2024-09-30T10:00:00+00:00");
    }

    #[test]
    fn unknown_status_and_null_text_are_kept_readable() {
        let raw = json!({
            "id": 4,
            "itemName": "Umbrella",
            "category": "Accessories",
            "color": null,
            "location": "Gym",
            "date": "2024-09-30",
            "description": null,
            "contactInfo": "x",
            "status": "claimed",
            "reportedAt": "2024-09-30T10:00:00Z"
        });
        let record: ItemRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(record.status, ItemStatus::Other("claimed".into()));
        assert_eq!(record.color, "");
        assert_eq!(record.description, "");

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["status"], "claimed");
        assert_eq!(serde_json::to_value(ItemStatus::Available).unwrap(), "available");
        assert_eq!(ItemStatus::from("active".to_string()), ItemStatus::Active);
    }

    #[test]
    fn empty_analysis_object_decodes() {
        let analysis: AiAnalysis = serde_json::from_value(json!({})).unwrap();
        assert!(analysis.is_empty());
    }
}
