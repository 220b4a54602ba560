//! Prompt templates for the LLM-backed stages.

use serde_json::{Map, Value};

/// System prompt for activity extraction.
pub fn extraction_system() -> &'static str {
    "Extract structured details from textbook activities."
}

/// User prompt for one chunk of marked-up pages.
pub fn extraction_prompt(chunk_text: &str, page_numbers: &[u32]) -> String {
    format!(
        r#"You are analyzing a school textbook to extract class activities that can be performed in an ongoing class.

An activity is something a student can perform in the live classroom to understand a concept.

Look for keywords such as:
"Activity", "Let us do", "Let us perform", "Let us explore", "Think like a scientist", "Activity 1.1", "Activity 2.1".

The text includes page markers in the format 'Page X:' where X is the page number. Use these markers to determine the exact page(s) where each activity appears.

For each activity, identify:
1. **Activity Name**
2. **Concept being taught**
3. **Materials required**
4. **Short description of how to perform the activity**
5. **Page number(s)** (a list drawn from these page numbers: {pages:?})

Example output format (return valid JSON only):
[
    {{
        "activity": "Activity 4.1: Let us explore",
        "concept": "Magnetic and Non-Magnetic Materials",
        "materials": ["Magnet", "Various objects"],
        "description": "Step-by-step process to perform the activity",
        "page": [41]
    }}
]

Output only the JSON array, with no explanations.

Extract relevant details from the following text:
"""{text}""""#,
        pages = page_numbers,
        text = chunk_text,
    )
}

/// System prompt for cross-referencing two activity lists.
pub fn match_system() -> &'static str {
    "Extract activities common to both lists."
}

/// User prompt comparing one chunk of the master list against the whole second list.
pub fn match_prompt(master_chunk: &[Map<String, Value>], secondary: &[Map<String, Value>]) -> String {
    format!(
        r#"You are a JSON extraction expert.

You are given two JSON documents.

### JSON1 (activities)
A list of activity objects with fields like "activity", "concept", "materials", "description", and "page".

### JSON2 (units)
A list of units. Each unit holds one or more activity names under the "activity" key.

---

Your task:

For each unit in JSON2, find activity names that match an "activity" field in JSON1. Compare names ignoring letter case and extra spaces. A name also matches when it is exactly the label before the first colon of the other name, so "Activity 1.1" matches "Activity 1.1: Drop a ball". Two names with the same label but different text after the colon do NOT match. For each match, return an object with:

- "page": page number from JSON1
- "json1_activity": full activity string from JSON1
- "json2_activity": matching string from JSON2

Rules:
- The output must be strictly valid JSON.
- Do NOT return explanations, comments, or code. Only return a JSON array.
- If no matches are found, return an empty array: []
- Do NOT wrap the result in markdown or triple backticks.

---

JSON1 chunk:
{master}

---

JSON2 full:
{secondary}

Return the matched results as an array."#,
        master = pretty(master_chunk),
        secondary = pretty(secondary),
    )
}

/// System prompt for composing new activities.
pub fn generator_system() -> &'static str {
    "Combine the given activities to create new activities."
}

/// User prompt for one batch of source activities.
pub fn generator_prompt(batch: &[Map<String, Value>], max_new: usize) -> String {
    format!(
        r#"You are an expert at designing hands-on activities that school students can perform in a live class.

You are given one JSON document: a list of activity objects with fields like "activity", "concept", "materials", "description", and "page".

----
Your task:
Generate new activities from the activities in the JSON chunk. Each new activity should combine two or more of the given activities.
Use the same output format as the input, except that "page" lists every page number of the activities you combined (like "page": [1, 2, 3]).

Each new activity must meet these criteria:

- It is a hands-on activity.
- Strand coverage: include at least one activity from each strand, if possible.
- It can be conducted safely in class.
- Its concepts have some depth.
- Materials are low cost and easily available.
- It covers as many skills as possible.
- Transdisciplinary coverage is a plus.
- The description is self-contained for a reader who has never seen the source JSON.
- Avoid activities built around pen, paper, or drawing posters and banners.

Rules:
- The output must be strictly valid JSON.
- Do NOT return explanations, comments, or code. Only return a JSON array.
- Do NOT wrap the result in markdown or triple backticks.
- Include at most {max_new} activities, choosing the best ones.

You may add extra materials if needed, but each activity must fit within a single class.
Activities should let a teacher assess students through the engage, explore, explain and extend phases.

JSON chunk:
{batch}"#,
        max_new = max_new,
        batch = pretty(batch),
    )
}

fn pretty(records: &[Map<String, Value>]) -> String {
    serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_extraction_prompt_carries_pages_and_text() {
        let prompt = extraction_prompt("Page 2: Activity 1.1: Drop a ball", &[1, 2, 3]);
        assert!(prompt.contains("[1, 2, 3]"));
        assert!(prompt.contains("\"\"\"Page 2: Activity 1.1: Drop a ball\"\"\""));
        assert!(prompt.contains("\"page\": [41]"));
    }

    #[test]
    fn test_match_prompt_embeds_both_lists() {
        let master = vec![record(json!({"activity": "A: Do X", "page": [5]}))];
        let secondary = vec![record(json!({"unit": "1", "activity": "A"}))];
        let prompt = match_prompt(&master, &secondary);
        assert!(prompt.contains("\"A: Do X\""));
        assert!(prompt.contains("\"unit\": \"1\""));
        assert!(prompt.contains("label before the first colon"));
        assert!(!prompt.contains("exactly match"));
    }

    #[test]
    fn test_generator_prompt_limit() {
        let prompt = generator_prompt(&[], 4);
        assert!(prompt.contains("at most 4 activities"));
    }
}
