//! Lenient parsing of model replies into activity records.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use handson_core::{Activity, Error, Result};

static CODE_FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```[A-Za-z0-9_-]*\s*(.*?)\s*```$").unwrap());

/// Remove a surrounding markdown code fence, if any.
pub fn strip_code_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    match CODE_FENCE_RE.captures(trimmed).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str(),
        None => trimmed,
    }
}

/// Parse a reply that should hold a JSON array.
///
/// An object wrapping exactly one array (`{"activities": [...]}`) is unwrapped.
pub fn parse_json_array(reply: &str) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_str(strip_code_fences(reply))?;
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(map) => {
            let mut arrays = map.into_iter().filter_map(|(_, v)| match v {
                Value::Array(items) => Some(items),
                _ => None,
            });
            match (arrays.next(), arrays.next()) {
                (Some(items), None) => Ok(items),
                _ => Err(Error::Llm("Expected a JSON array in the reply".into())),
            }
        }
        _ => Err(Error::Llm("Expected a JSON array in the reply".into())),
    }
}

/// Read a page reference: an integer, a list of integers, or numeric strings.
/// Missing, null or empty references yield `None`.
pub fn page_list(value: Option<&Value>) -> Option<Vec<u32>> {
    fn one(v: &Value) -> Option<u32> {
        match v {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    let pages: Vec<u32> = match value? {
        Value::Array(items) => items.iter().filter_map(one).collect(),
        other => one(other).into_iter().collect(),
    };
    (!pages.is_empty()).then_some(pages)
}

/// Build an activity from a loosely shaped model object.
///
/// Records without an activity name are dropped. A missing page reference
/// falls back to `fallback_pages`.
pub fn activity_from_value(value: &Value, fallback_pages: &[u32]) -> Option<Activity> {
    let obj = value.as_object()?;
    let activity = text_field(obj, "activity")?;
    if activity.is_empty() {
        return None;
    }

    let materials = match obj.get("materials") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|m| match m {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .filter(|m| !m.is_empty())
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    };

    let page = page_list(obj.get("page")).unwrap_or_else(|| fallback_pages.to_vec());
    if page.is_empty() {
        return None;
    }

    Some(Activity {
        activity,
        concept: text_field(obj, "concept").unwrap_or_default(),
        materials,
        description: text_field(obj, "description").unwrap_or_default(),
        page,
    })
}

/// Parse a reply into activities, backfilling missing pages.
pub fn activities_from_reply(reply: &str, fallback_pages: &[u32]) -> Result<Vec<Activity>> {
    Ok(parse_json_array(reply)?
        .iter()
        .filter_map(|v| activity_from_value(v, fallback_pages))
        .collect())
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fences("```\n[]\n```  "), "[]");
        assert_eq!(strip_code_fences("  [3]  "), "[3]");
    }

    #[test]
    fn test_parse_json_array_shapes() {
        assert_eq!(parse_json_array("[1]").unwrap(), vec![json!(1)]);
        assert_eq!(
            parse_json_array(r#"{"activities": [{"a": 1}]}"#).unwrap(),
            vec![json!({"a": 1})]
        );
        assert!(parse_json_array(r#"{"a": [1], "b": [2]}"#).is_err());
        assert!(parse_json_array("Sorry, I cannot help.").is_err());
    }

    #[test]
    fn test_page_list() {
        assert_eq!(page_list(Some(&json!(5))), Some(vec![5]));
        assert_eq!(page_list(Some(&json!([5, "6"]))), Some(vec![5, 6]));
        assert_eq!(page_list(Some(&json!([]))), None);
        assert_eq!(page_list(Some(&Value::Null)), None);
        assert_eq!(page_list(None), None);
    }

    #[test]
    fn test_activity_backfills_and_normalizes_pages() {
        let reply = r#"[
            {"activity": "Activity 1.1: Drop a ball", "concept": "Gravity",
             "materials": ["Ball"], "description": "Drop it", "page": 2},
            {"activity": "Activity 1.2: Roll a ball", "materials": "Ball", "page": null},
            {"concept": "No name"}
        ]"#;
        let activities = activities_from_reply(reply, &[1, 2, 3]).unwrap();
        assert_eq!(activities.len(), 2);
        assert_eq!(activities[0].page, vec![2]);
        assert_eq!(activities[0].concept, "Gravity");
        assert_eq!(activities[1].page, vec![1, 2, 3]);
        assert_eq!(activities[1].materials, vec!["Ball".to_string()]);
        assert_eq!(activities[1].description, "");
    }
}
