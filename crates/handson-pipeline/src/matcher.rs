//! Cross-referencing a master activity list against a second list.
//!
//! The model proposes match records per master chunk. Each proposal is then
//! checked against [`names_match`]; only proposals that pair a master record
//! in the chunk with a name from the second list are kept, rewritten with the
//! master record's exact activity string and first page.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use handson_core::{MatchRecord, PageRef, PipelineOptions, Result};
use handson_llm::{ChatBackend, CompletionRequest};

use crate::prompts;
use crate::reply::{page_list, parse_json_array};
use crate::store::Record;

/// Lowercase, trim, and collapse whitespace runs to one space.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Text before the first `:`, or the whole name.
fn label(normalized: &str) -> &str {
    match normalized.split_once(':') {
        Some((head, _)) => head.trim_end(),
        None => normalized,
    }
}

/// Whether two activity names refer to the same activity.
///
/// Names match when their normalized forms are equal, or when one side's
/// label is the other side's whole name ("Activity 1.1: Drop a ball" matches
/// "activity 1.1"). Two labeled names with different text after the colon
/// do not match.
pub fn names_match(a: &str, b: &str) -> bool {
    let (a, b) = (normalize_name(a), normalize_name(b));
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a == b || label(&a) == b || a == label(&b)
}

/// Activity names listed by the second file's units.
///
/// A unit's `activity` may be a single string or a list of strings.
pub fn secondary_names(units: &[Record]) -> Vec<String> {
    let mut names = Vec::new();
    for unit in units {
        match unit.get("activity") {
            Some(Value::String(s)) => names.push(s.clone()),
            Some(Value::Array(items)) => names.extend(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string),
            ),
            _ => {}
        }
    }
    names.retain(|n| !n.trim().is_empty());
    names
}

/// Activity name and pages of a master record, when it has both.
fn master_key(record: &Record) -> Option<(&str, Vec<u32>)> {
    let activity = record.get("activity")?.as_str()?;
    let pages = page_list(record.get("page"))?;
    Some((activity, pages))
}

pub struct ActivityMatcher {
    chat: Arc<dyn ChatBackend>,
    batch_size: usize,
    temperature: f64,
    max_tokens: usize,
}

impl ActivityMatcher {
    pub fn new(chat: Arc<dyn ChatBackend>, options: &PipelineOptions) -> Self {
        Self {
            chat,
            batch_size: options.match_batch_size.max(1),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        }
    }

    /// Verified match records for every master chunk, in chunk order.
    pub async fn match_lists(&self, master: &[Record], secondary: &[Record]) -> Vec<MatchRecord> {
        let names = secondary_names(secondary);
        if names.is_empty() {
            info!("Second list has no activity names; nothing to match");
            return Vec::new();
        }

        let total = master.len().div_ceil(self.batch_size);
        let mut matches = Vec::new();

        for (i, chunk) in master.chunks(self.batch_size).enumerate() {
            info!("Sending chunk {}/{}", i + 1, total);

            let proposals = match self.propose(chunk, secondary).await {
                Ok(p) => p,
                Err(e) => {
                    warn!("Skipping chunk {}: {}", i + 1, e);
                    continue;
                }
            };

            let accepted = verify_proposals(&proposals, chunk, &names);
            debug!(
                "Chunk {}: {} of {} proposals accepted",
                i + 1,
                accepted.len(),
                proposals.len()
            );
            matches.extend(accepted);
        }

        matches
    }

    async fn propose(&self, chunk: &[Record], secondary: &[Record]) -> Result<Vec<Value>> {
        let request = CompletionRequest::new(
            prompts::match_system(),
            prompts::match_prompt(chunk, secondary),
            self.temperature,
            self.max_tokens,
        );
        let reply = self.chat.complete(request).await?;
        parse_json_array(&reply)
    }
}

/// Second-list name for a proposed `json2_activity`, exact names first.
fn resolve_name<'a>(names: &'a [String], proposed: &str) -> Option<&'a String> {
    let wanted = normalize_name(proposed);
    names
        .iter()
        .find(|n| normalize_name(n) == wanted)
        .or_else(|| names.iter().find(|n| names_match(proposed, n)))
}

/// Chunk record a proposal refers to.
///
/// Candidates must match both the proposed `json1_activity` and the resolved
/// second-list name. An exact normalized name beats a label match, then a
/// record whose pages include the proposed page wins; remaining ties go to
/// the earliest record.
fn resolve_master<'a>(
    chunk: &'a [Record],
    proposal: &Value,
    json1: &str,
    name: &str,
) -> Option<(&'a str, Vec<u32>)> {
    let wanted = normalize_name(json1);
    let proposed_pages = page_list(proposal.get("page")).unwrap_or_default();

    chunk
        .iter()
        .filter_map(master_key)
        .filter(|(activity, _)| names_match(json1, activity) && names_match(activity, name))
        .min_by_key(|(activity, pages)| {
            (
                normalize_name(activity) != wanted,
                !pages.iter().any(|p| proposed_pages.contains(p)),
            )
        })
}

/// Keep proposals that pair a chunk record with a second-list name.
///
/// Accepted records carry the master's exact activity string and first page,
/// and duplicate triples are collapsed.
pub fn verify_proposals(proposals: &[Value], chunk: &[Record], names: &[String]) -> Vec<MatchRecord> {
    let mut seen = HashSet::new();
    let mut accepted = Vec::new();

    for proposal in proposals {
        let json1 = proposal.get("json1_activity").and_then(Value::as_str);
        let json2 = proposal.get("json2_activity").and_then(Value::as_str);
        let (Some(json1), Some(json2)) = (json1, json2) else {
            debug!("Dropping malformed match proposal: {}", proposal);
            continue;
        };

        let Some(name) = resolve_name(names, json2) else {
            debug!("Rejected match proposal {} -> {}", json1, json2);
            continue;
        };
        let Some((activity, pages)) = resolve_master(chunk, proposal, json1, name) else {
            debug!("Rejected match proposal {} -> {}", json1, json2);
            continue;
        };

        let record = MatchRecord {
            page: PageRef::Single(pages[0]),
            json1_activity: activity.to_string(),
            json2_activity: name.clone(),
        };
        if seen.insert((pages[0], record.json1_activity.clone(), record.json2_activity.clone())) {
            accepted.push(record);
        }
    }

    accepted
}
