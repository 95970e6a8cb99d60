//! Keyword expansion for free-text queries.
//!
//! The model is asked for a JSON array but usually wraps it in prose, so the
//! outermost `[...]` is cut out before parsing. Expansion never fails: any
//! problem degrades to searching for the original query.

use tracing::warn;

use crate::clients::llm::TextGenerator;
use crate::services::prompts;

const MAX_KEYWORDS: usize = 8;
const MIN_KEYWORD_CHARS: usize = 2;
const MAX_KEYWORD_CHARS: usize = 12;

/// Extracts keywords from a model reply.
///
/// Returns `None` when the reply has no bracketed array, the array is not
/// valid JSON, or an entry is a non-empty value other than a string. Empty
/// entries (`null`, `false`, `0`, `[]`, `{}`) are skipped.
pub fn parse_keywords(reply: &str) -> Option<Vec<String>> {
    let left = reply.find('[')?;
    let right = reply.rfind(']')?;
    if left >= right {
        return None;
    }

    let entries: Vec<serde_json::Value> = serde_json::from_str(&reply[left..=right]).ok()?;

    let mut keywords: Vec<String> = Vec::new();
    for entry in entries {
        let word = match entry {
            serde_json::Value::String(s) => s.trim().to_string(),
            other if is_empty_value(&other) => continue,
            _ => return None,
        };

        let len = word.chars().count();
        if (MIN_KEYWORD_CHARS..=MAX_KEYWORD_CHARS).contains(&len) && !keywords.contains(&word) {
            keywords.push(word);
        }
    }

    keywords.truncate(MAX_KEYWORDS);
    Some(keywords)
}

fn is_empty_value(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null | serde_json::Value::Bool(false) => true,
        serde_json::Value::Number(n) => n.as_f64() == Some(0.0),
        serde_json::Value::Array(items) => items.is_empty(),
        serde_json::Value::Object(fields) => fields.is_empty(),
        _ => false,
    }
}

fn fallback(query: &str) -> Vec<String> {
    let query = query.trim();
    if query.is_empty() {
        Vec::new()
    } else {
        vec![query.to_string()]
    }
}

/// Asks the model for related keywords, falling back to the trimmed query.
pub async fn expand_query(
    generator: &dyn TextGenerator,
    query: &str,
    system: &str,
    temperature: f32,
) -> Vec<String> {
    let reply = match generator
        .ask(&prompts::expansion_prompt(query), system, temperature)
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Query expansion failed, using raw query: {e}");
            return fallback(query);
        }
    };

    parse_keywords(&reply).unwrap_or_else(|| {
        warn!("Query expansion reply was not a keyword array, using raw query");
        fallback(query)
    })
}
