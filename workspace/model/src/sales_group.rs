use serde::{Deserialize, Serialize};

use crate::status::{GroupStatus, StatusError};

/// Sentinel shown in front of the category bar. Selecting it clears every
/// category filter; it is never stored as a tag.
pub const ALL_CATEGORIES: &str = "All";

/// A named, tagged data series tracked for forecasting.
///
/// `time_span` and `last_upload` are display strings only. Tags keep their
/// display order, contain no duplicates and never contain [`ALL_CATEGORIES`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SalesGroupRecord")]
pub struct SalesGroup {
    id: String,
    name: String,
    time_span: String,
    last_upload: String,
    status: GroupStatus,
    tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

/// Unvalidated shape read from catalog files.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SalesGroupRecord {
    id: String,
    name: String,
    #[serde(default)]
    time_span: String,
    #[serde(default)]
    last_upload: String,
    status: GroupStatus,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    description: Option<String>,
}

impl TryFrom<SalesGroupRecord> for SalesGroup {
    type Error = StatusError;

    fn try_from(record: SalesGroupRecord) -> Result<Self, Self::Error> {
        let group = SalesGroup::new(record.id, record.name, record.status, record.tags)?
            .with_time_span(record.time_span)
            .with_last_upload(record.last_upload);
        Ok(match record.description {
            Some(description) => group.with_description(description),
            None => group,
        })
    }
}

impl SalesGroup {
    /// Creates a new group, normalizing its tags.
    ///
    /// Fails with [`StatusError::ReservedTag`] when a tag is the "All" sentinel.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        status: GroupStatus,
        tags: Vec<String>,
    ) -> Result<Self, StatusError> {
        Ok(Self {
            id: id.into(),
            name: name.into(),
            time_span: String::new(),
            last_upload: String::new(),
            status,
            tags: normalize_tags(tags)?,
            description: None,
        })
    }

    pub fn with_time_span(mut self, time_span: impl Into<String>) -> Self {
        self.time_span = time_span.into();
        self
    }

    pub fn with_last_upload(mut self, last_upload: impl Into<String>) -> Self {
        self.last_upload = last_upload.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = if description.is_empty() {
            None
        } else {
            Some(description)
        };
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn time_span(&self) -> &str {
        &self.time_span
    }

    pub fn last_upload(&self) -> &str {
        &self.last_upload
    }

    pub fn status(&self) -> GroupStatus {
        self.status
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether the group carries `tag` (exact match).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Sets the pipeline status. Callers are expected to obtain `status` from
    /// [`GroupStatus::apply`].
    pub fn set_status(&mut self, status: GroupStatus) {
        self.status = status;
    }

    pub fn set_last_upload(&mut self, last_upload: impl Into<String>) {
        self.last_upload = last_upload.into();
    }
}

/// Removes duplicate tags while keeping first-seen order and rejects the
/// "All" sentinel.
pub fn normalize_tags(tags: Vec<String>) -> Result<Vec<String>, StatusError> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if tag == ALL_CATEGORIES {
            return Err(StatusError::ReservedTag(tag));
        }
        if !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    Ok(normalized)
}

/// Parses free-form tag input such as `"Milk, importation"`.
///
/// Entries are trimmed and blank entries dropped before normalization.
pub fn parse_tag_list(input: &str) -> Result<Vec<String>, StatusError> {
    let tags = input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    normalize_tags(tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_new_group_keeps_tag_order_without_duplicates() {
        let group = SalesGroup::new(
            "6",
            "Al Marai Butter 500gm",
            GroupStatus::NeedsData,
            tags(&["Butter", "importation", "Butter"]),
        )
        .unwrap();

        assert_eq!(group.tags(), &tags(&["Butter", "importation"])[..]);
        assert!(group.has_tag("Butter"));
        assert!(!group.has_tag("butter"));
        assert!(group.description().is_none());
    }

    #[test]
    fn test_group_without_tags_has_empty_list() {
        let group = SalesGroup::new("7", "Plain", GroupStatus::Ready, vec![]).unwrap();
        assert!(group.tags().is_empty());
        assert!(!group.has_tag(ALL_CATEGORIES));
    }

    #[test]
    fn test_all_sentinel_is_rejected_as_tag() {
        let err = SalesGroup::new("1", "APM 1L", GroupStatus::Ready, tags(&["Milk", "All"]))
            .unwrap_err();
        assert_eq!(err, StatusError::ReservedTag("All".to_string()));
    }

    #[test]
    fn test_parse_tag_list() {
        assert_eq!(
            parse_tag_list(" Milk, importation ,, Milk ").unwrap(),
            tags(&["Milk", "importation"])
        );
        assert!(parse_tag_list("").unwrap().is_empty());
        assert!(parse_tag_list("Juice, All").is_err());
    }

    #[test]
    fn test_deserialize_validates_tags() {
        let json = r#"{"id":"1","name":"APM 1L","timeSpan":"Jan 2023 - Dec 2024","lastUpload":"2 hours ago","status":"forecasted","tags":["Milk"]}"#;
        let group: SalesGroup = serde_json::from_str(json).unwrap();
        assert_eq!(group.name(), "APM 1L");
        assert_eq!(group.time_span(), "Jan 2023 - Dec 2024");
        assert_eq!(group.status(), GroupStatus::Forecasted);

        let bad = r#"{"id":"2","name":"X","status":"ready","tags":["All"]}"#;
        assert!(serde_json::from_str::<SalesGroup>(bad).is_err());
    }

    #[test]
    fn test_deserialize_yaml_defaults() {
        let yaml = "id: '9'\nname: Cream 200ml\nstatus: needs-data\n";
        let group: SalesGroup = serde_yaml::from_str(yaml).unwrap();
        assert!(group.tags().is_empty());
        assert_eq!(group.last_upload(), "");
        assert_eq!(group.status(), GroupStatus::NeedsData);
    }
}
