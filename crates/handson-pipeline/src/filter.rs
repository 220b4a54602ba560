//! Set difference of a master list and a match list.

use serde_json::Value;

use handson_core::{Error, MatchRecord, Result};

use crate::reply::page_list;
use crate::store::Record;

/// Check the master list's shape: non-empty, first record keyed by `activity` and `page`.
pub fn validate_master(master: &[Record]) -> Result<()> {
    match master.first() {
        Some(first) if first.contains_key("activity") && first.contains_key("page") => Ok(()),
        _ => Err(Error::Schema(
            "Invalid JSON structure. Expected 'activity' and 'page' keys in the objects.".into(),
        )),
    }
}

/// Read match records, accepting `page` as an integer or a list.
pub fn parse_match_records(items: Vec<Record>) -> Result<Vec<MatchRecord>> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(Value::Object(item)).map_err(|e| {
                Error::Schema(format!("Invalid match record at index {}: {}", i, e))
            })
        })
        .collect()
}

/// Master records not covered by any match, in their original order and shape.
pub fn filter_unmatched(master: &[Record], matches: &[MatchRecord]) -> Vec<Record> {
    master
        .iter()
        .filter(|record| {
            let activity = record.get("activity").and_then(Value::as_str);
            let pages = page_list(record.get("page"));
            match (activity, pages) {
                (Some(activity), Some(pages)) => {
                    !matches.iter().any(|m| m.covers(activity, &pages))
                }
                _ => true,
            }
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use handson_core::PageRef;
    use serde_json::json;

    fn records(v: Value) -> Vec<Record> {
        v.as_array()
            .unwrap()
            .iter()
            .map(|r| r.as_object().cloned().unwrap())
            .collect()
    }

    fn matched(page: PageRef, json1: &str) -> MatchRecord {
        MatchRecord {
            page,
            json1_activity: json1.into(),
            json2_activity: "unit".into(),
        }
    }

    #[test]
    fn test_filter_removes_matched_keys() {
        let master = records(json!([
            {"activity": "A: Do X", "page": [5]},
            {"activity": "B: Do Y", "page": [6]}
        ]));
        let matches = vec![matched(PageRef::Single(5), "A: Do X")];
        let out: Vec<Value> = filter_unmatched(&master, &matches)
            .into_iter()
            .map(Value::Object)
            .collect();
        assert_eq!(Value::Array(out), json!([{"activity": "B: Do Y", "page": [6]}]));
    }

    #[test]
    fn test_page_must_agree() {
        let master = records(json!([
            {"activity": "A", "page": [5, 6]},
            {"activity": "A", "page": [9]}
        ]));
        let out = filter_unmatched(&master, &[matched(PageRef::Single(6), "A")]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["page"], json!([9]));

        let out = filter_unmatched(&master, &[matched(PageRef::Many(vec![5]), "A")]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_name_match_is_exact() {
        let master = records(json!([{"activity": "A: Do X", "page": [5]}]));
        let out = filter_unmatched(&master, &[matched(PageRef::Single(5), "a: do x")]);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_empty_match_list_is_identity() {
        let master = records(json!([
            {"activity": "A", "page": [1], "grade": 7},
            {"activity": "B"}
        ]));
        assert_eq!(filter_unmatched(&master, &[]), master);
    }

    #[test]
    fn test_validate_master() {
        assert!(validate_master(&records(json!([{"activity": "A", "page": 1}]))).is_ok());
        assert!(validate_master(&records(json!([{"activity": "A"}]))).is_err());
        assert!(matches!(validate_master(&[]), Err(Error::Schema(_))));
    }

    #[test]
    fn test_parse_match_records() {
        let items = records(json!([
            {"page": 5, "json1_activity": "A", "json2_activity": "a"},
            {"page": [6], "json1_activity": "B", "json2_activity": "b"}
        ]));
        let parsed = parse_match_records(items).unwrap();
        assert_eq!(parsed[1].page, PageRef::Many(vec![6]));

        let bad = records(json!([{"page": 5}]));
        assert!(matches!(parse_match_records(bad), Err(Error::Schema(_))));
    }
}
