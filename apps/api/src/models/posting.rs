use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A raw job listing as returned by the retrieval provider, before screening.
///
/// Text fields are decoded leniently: numbers, blanks and the `"NaN"` marker
/// pandas emits for missing cells all become `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostingCandidate {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub company: Option<String>,
    #[serde(default, alias = "url", deserialize_with = "lenient_text")]
    pub job_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub site: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub date_posted: Option<String>,
    /// Everything else the provider sent (salary bands, remote flags, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PostingCandidate {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("<untitled>")
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) if is_text(&text) => Some(text),
        _ => None,
    })
}

fn is_text(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("nan")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_posting_deserializes() {
        let json = r#"{
            "title": "Backend Engineer",
            "company": "Acme",
            "job_url": "https://example.com/jobs/1",
            "description": "Build Rust services",
            "site": "linkedin",
            "min_amount": 90000.0,
            "is_remote": true
        }"#;
        let posting: PostingCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(posting.title.as_deref(), Some("Backend Engineer"));
        assert_eq!(posting.job_url.as_deref(), Some("https://example.com/jobs/1"));
        assert_eq!(posting.extra.get("is_remote"), Some(&Value::Bool(true)));
        assert!(posting.extra.contains_key("min_amount"));
    }

    #[test]
    fn test_non_text_description_decodes_as_none() {
        for raw in [
            r#"{"description": null}"#,
            r#"{"description": 12.5}"#,
            r#"{"description": "NaN"}"#,
            r#"{"description": "   "}"#,
            r#"{}"#,
        ] {
            let posting: PostingCandidate = serde_json::from_str(raw).unwrap();
            assert!(posting.description.is_none(), "expected None for {raw}");
        }
    }

    #[test]
    fn test_url_alias_is_accepted() {
        let posting: PostingCandidate =
            serde_json::from_str(r#"{"url": "https://example.com/x"}"#).unwrap();
        assert_eq!(posting.job_url.as_deref(), Some("https://example.com/x"));
    }

    #[test]
    fn test_display_title_falls_back() {
        assert_eq!(PostingCandidate::default().display_title(), "<untitled>");
    }
}
