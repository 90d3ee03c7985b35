use crate::error::{NotesError, Result};
use crate::generation::SchemaDescriptor;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const SCHEMA_NAME: &str = "session_summary";

pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_ONE_LINE_CHARS: usize = 200;
pub const MAX_RECAP_CHARS: usize = 2000;
pub const MAX_ITEM_SUMMARY_CHARS: usize = 500;
pub const MAX_EXCERPT_CHARS: usize = 1000;
pub const MAX_ITEMS: usize = 5;

/// One therapist insight, client learning or recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightItem {
    pub summary: String,

    /// Longer elaboration of the point
    #[serde(default)]
    pub detail: String,

    /// Supporting quote from the session
    pub excerpt: String,
}

/// Structured summary of a session (or of one chunk of it)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSessionSummary {
    pub title: String,
    pub one_line_summary: String,
    pub full_recap: String,
    pub therapist_insights: Vec<InsightItem>,
    pub client_learnings: Vec<InsightItem>,
    pub recommendations: Vec<InsightItem>,
}

fn violation(message: String) -> NotesError {
    NotesError::SchemaViolation {
        schema: SCHEMA_NAME.to_string(),
        message,
    }
}

fn check_text(field: &str, value: &str, max: usize) -> Result<()> {
    let len = value.chars().count();
    if value.trim().is_empty() {
        return Err(violation(format!("{} is empty", field)));
    }
    if len > max {
        return Err(violation(format!("{} has {} chars (max {})", field, len, max)));
    }
    Ok(())
}

fn check_items(field: &str, items: &[InsightItem]) -> Result<()> {
    if items.is_empty() || items.len() > MAX_ITEMS {
        return Err(violation(format!(
            "{} has {} items (expected 1..={})",
            field,
            items.len(),
            MAX_ITEMS
        )));
    }
    for (i, item) in items.iter().enumerate() {
        check_text(&format!("{}[{}].summary", field, i), &item.summary, MAX_ITEM_SUMMARY_CHARS)?;
        check_text(&format!("{}[{}].excerpt", field, i), &item.excerpt, MAX_EXCERPT_CHARS)?;
    }
    Ok(())
}

impl GeneratedSessionSummary {
    /// Decode a generator reply and enforce the schema bounds.
    pub fn from_generated(value: serde_json::Value) -> Result<Self> {
        let summary: Self =
            serde_json::from_value(value).map_err(|e| violation(format!("decode failed: {}", e)))?;
        summary.validate()?;
        Ok(summary)
    }

    pub fn validate(&self) -> Result<()> {
        check_text("title", &self.title, MAX_TITLE_CHARS)?;
        check_text("one_line_summary", &self.one_line_summary, MAX_ONE_LINE_CHARS)?;
        check_text("full_recap", &self.full_recap, MAX_RECAP_CHARS)?;
        check_items("therapist_insights", &self.therapist_insights)?;
        check_items("client_learnings", &self.client_learnings)?;
        check_items("recommendations", &self.recommendations)?;
        Ok(())
    }

    /// JSON Schema handed to the generator
    pub fn schema() -> SchemaDescriptor {
        let item = json!({
            "type": "object",
            "properties": {
                "summary": { "type": "string", "minLength": 1, "maxLength": MAX_ITEM_SUMMARY_CHARS },
                "detail": { "type": "string" },
                "excerpt": { "type": "string", "minLength": 1, "maxLength": MAX_EXCERPT_CHARS }
            },
            "required": ["summary", "detail", "excerpt"],
            "additionalProperties": false
        });
        let items = json!({
            "type": "array",
            "items": item,
            "minItems": 1,
            "maxItems": MAX_ITEMS
        });

        SchemaDescriptor {
            name: SCHEMA_NAME.to_string(),
            schema: json!({
                "type": "object",
                "properties": {
                    "title": { "type": "string", "minLength": 1, "maxLength": MAX_TITLE_CHARS },
                    "one_line_summary": { "type": "string", "minLength": 1, "maxLength": MAX_ONE_LINE_CHARS },
                    "full_recap": { "type": "string", "minLength": 1, "maxLength": MAX_RECAP_CHARS },
                    "therapist_insights": items.clone(),
                    "client_learnings": items.clone(),
                    "recommendations": items
                },
                "required": [
                    "title",
                    "one_line_summary",
                    "full_recap",
                    "therapist_insights",
                    "client_learnings",
                    "recommendations"
                ],
                "additionalProperties": false
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> serde_json::Value {
        json!({ "summary": "Noticed avoidance", "detail": "", "excerpt": "Client: 'I skip it.'" })
    }

    fn valid() -> serde_json::Value {
        json!({
            "title": "Working through avoidance",
            "one_line_summary": "Explored avoidance around work tasks",
            "full_recap": "We talked about avoidance.",
            "therapist_insights": [item()],
            "client_learnings": [item()],
            "recommendations": [item(), item()]
        })
    }

    #[test]
    fn test_valid_object_decodes() {
        let summary = GeneratedSessionSummary::from_generated(valid()).unwrap();
        assert_eq!(summary.recommendations.len(), 2);
    }

    #[test]
    fn test_detail_is_optional() {
        let mut value = valid();
        value["therapist_insights"] = json!([{ "summary": "s", "excerpt": "e" }]);
        let summary = GeneratedSessionSummary::from_generated(value).unwrap();
        assert_eq!(summary.therapist_insights[0].detail, "");
    }

    #[test]
    fn test_title_too_long_rejected() {
        let mut value = valid();
        value["title"] = json!("t".repeat(MAX_TITLE_CHARS + 1));
        let err = GeneratedSessionSummary::from_generated(value).unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_item_count_bounds() {
        let mut value = valid();
        value["client_learnings"] = json!([]);
        assert!(GeneratedSessionSummary::from_generated(value).is_err());

        let mut value = valid();
        value["recommendations"] = json!(vec![item(); MAX_ITEMS + 1]);
        assert!(GeneratedSessionSummary::from_generated(value).is_err());
    }

    #[test]
    fn test_missing_field_rejected() {
        let mut value = valid();
        value.as_object_mut().unwrap().remove("full_recap");
        let err = GeneratedSessionSummary::from_generated(value).unwrap_err();
        assert!(matches!(err, NotesError::SchemaViolation { .. }));
    }

    #[test]
    fn test_schema_lists_required_fields() {
        let schema = GeneratedSessionSummary::schema();
        assert_eq!(schema.name, SCHEMA_NAME);
        assert_eq!(schema.schema["required"].as_array().unwrap().len(), 6);
        assert_eq!(schema.schema["properties"]["therapist_insights"]["maxItems"], 5);
    }
}
