//! Resilient extraction of JSON from provider text.
//!
//! Provider responses often wrap JSON in markdown fences or prose, or carry
//! small syntax slips. Strategies are tried in order and the first candidate
//! that parses wins:
//! 1. Direct parse
//! 2. Markdown code fence
//! 3. Comment stripping
//! 4. Syntax repair (trailing commas, smart quotes, Python literals, unterminated brackets)
//! 5. Balanced brace/bracket scanning

use serde_json::Value;
use storyboard_error::{JsonError, JsonErrorKind};
use tracing::{debug, warn};

const PREVIEW_CHARS: usize = 80;

type Strategy = fn(&str) -> Option<String>;

const STRATEGIES: [(&str, Strategy); 5] = [
    ("direct", direct),
    ("fenced", fenced_block),
    ("comments", without_comments),
    ("repair", repaired),
    ("balanced", balanced_repaired),
];

/// Extract a JSON value from raw provider text.
///
/// # Errors
///
/// Returns [`JsonErrorKind::Empty`] for blank input and
/// [`JsonErrorKind::Unparseable`] when every strategy fails.
///
/// # Examples
///
/// ```
/// use storyboard_director::extract_json;
///
/// let response = "Here is the scene:\n```json\n{\"title\": \"Intro\",}\n```";
/// let value = extract_json(response).expect("Recoverable JSON");
/// assert_eq!(value["title"], "Intro");
/// ```
pub fn extract_json(raw: &str) -> Result<Value, JsonError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(JsonError::new(JsonErrorKind::Empty));
    }

    for (name, strategy) in STRATEGIES {
        let Some(candidate) = strategy(trimmed) else {
            continue;
        };
        if let Ok(value) = serde_json::from_str::<Value>(&candidate) {
            debug!(strategy = name, "Extracted JSON");
            return Ok(value);
        }
    }

    let preview: String = trimmed.chars().take(PREVIEW_CHARS).collect();
    warn!(response_length = raw.len(), preview = %preview, "No JSON found in provider response");
    Err(JsonError::new(JsonErrorKind::Unparseable {
        strategies: STRATEGIES.len(),
        preview,
    }))
}

/// The single scene object in a parsed response.
///
/// Accepts a bare object, `{ "scene": {...} }`, or an array whose first
/// element is an object.
pub fn single_scene(value: Value) -> Result<Value, JsonError> {
    match value {
        Value::Object(mut map) => match map.remove("scene") {
            Some(inner @ Value::Object(_)) => Ok(inner),
            Some(other) => {
                map.insert("scene".to_string(), other);
                Ok(Value::Object(map))
            }
            None => Ok(Value::Object(map)),
        },
        Value::Array(items) => items
            .into_iter()
            .find(Value::is_object)
            .ok_or_else(|| JsonError::new(JsonErrorKind::Shape("array holds no scene object".to_string()))),
        other => Err(JsonError::new(JsonErrorKind::Shape(format!(
            "expected a scene object, found {}",
            kind_of(&other)
        )))),
    }
}

/// The scene list in a parsed response.
///
/// Accepts a bare array, `{ "scenes": [...] }` or `{ "storyboard": { "scenes": [...] } }`.
pub fn scene_list(value: Value) -> Result<Vec<Value>, JsonError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => {
            if let Some(Value::Array(items)) = map.remove("scenes") {
                return Ok(items);
            }
            if let Some(Value::Object(mut inner)) = map.remove("storyboard")
                && let Some(Value::Array(items)) = inner.remove("scenes")
            {
                return Ok(items);
            }
            Err(JsonError::new(JsonErrorKind::Shape(
                "object has no scenes array".to_string(),
            )))
        }
        other => Err(JsonError::new(JsonErrorKind::Shape(format!(
            "expected a scene list, found {}",
            kind_of(&other)
        )))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn direct(text: &str) -> Option<String> {
    Some(text.to_string())
}

fn without_comments(text: &str) -> Option<String> {
    let base = fenced_block(text).unwrap_or_else(|| text.to_string());
    Some(strip_comments(&base))
}

fn repaired(text: &str) -> Option<String> {
    without_comments(text).map(|t| repair_syntax(&t))
}

fn balanced_repaired(text: &str) -> Option<String> {
    balanced(text).map(|b| repair_syntax(&strip_comments(&b)))
}

/// Contents of the first markdown code fence; an unclosed fence runs to the end.
fn fenced_block(text: &str) -> Option<String> {
    let start = text.find("```")?;
    let after_ticks = start + 3;
    let content_start = text[after_ticks..]
        .find('\n')
        .map(|n| after_ticks + n + 1)
        .unwrap_or(after_ticks);
    let content = match text[content_start..].find("```") {
        Some(end) => &text[content_start..content_start + end],
        None => &text[content_start..],
    };
    Some(content.trim().to_string())
}

/// Remove `//` and `/* */` comments outside string literals.
fn strip_comments(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escape = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }
        match (c, chars.get(i + 1)) {
            ('"', _) => {
                in_string = true;
                out.push(c);
                i += 1;
            }
            ('/', Some('/')) => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            ('/', Some('*')) => {
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                i += 2;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

/// Fix the syntax slips providers commonly make.
fn repair_syntax(text: &str) -> String {
    let chars: Vec<char> = text
        .chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .collect();
    let mut out = String::with_capacity(chars.len());
    let mut closers: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escape = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '{' => {
                closers.push('}');
                out.push(c);
            }
            '[' => {
                closers.push(']');
                out.push(c);
            }
            '}' | ']' => {
                if closers.last() == Some(&c) {
                    closers.pop();
                }
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
                if !matches!(next, Some('}' | ']')) {
                    out.push(c);
                }
            }
            c if c.is_ascii_alphabetic() => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                out.push_str(match word.as_str() {
                    "True" => "true",
                    "False" => "false",
                    "None" => "null",
                    other => other,
                });
                continue;
            }
            other => out.push(other),
        }
        i += 1;
    }

    if in_string {
        out.push('"');
    }
    if !closers.is_empty() {
        let kept = out.trim_end().len();
        out.truncate(kept);
        if out.ends_with(',') {
            out.pop();
        } else if out.ends_with(':') {
            out.push_str(" null");
        }
        while let Some(close) = closers.pop() {
            out.push(close);
        }
    }
    out
}

/// The first balanced `{...}` or `[...]`, whichever opens first.
///
/// An unterminated structure yields everything from its opening delimiter.
fn balanced(text: &str) -> Option<String> {
    let start = text.find(['{', '['])?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape = false;

    for (i, ch) in text[start..].char_indices() {
        if escape {
            escape = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape = true,
            '"' => in_string = !in_string,
            '{' | '[' if !in_string => depth += 1,
            '}' | ']' if !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(text[start..start + i + 1].to_string());
                }
            }
            _ => {}
        }
    }
    Some(text[start..].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_json_parses() {
        let value = extract_json(r#"{"title": "Intro"}"#).expect("Valid JSON");
        assert_eq!(value["title"], "Intro");
    }

    #[test]
    fn fenced_json_without_language_tag() {
        let value = extract_json("```\n[1, 2]\n```").expect("Fenced JSON");
        assert_eq!(value, serde_json::json!([1, 2]));
    }

    #[test]
    fn comments_are_stripped_but_urls_in_strings_survive() {
        let raw = "{\n  // the title\n  \"url\": \"https://example.com\", /* note */\n  \"n\": 1\n}";
        let value = extract_json(raw).expect("Commented JSON");
        assert_eq!(value["url"], "https://example.com");
        assert_eq!(value["n"], 1);
    }

    #[test]
    fn common_slips_are_repaired() {
        let raw = "{\u{201C}done\u{201D}: True, \"skip\": None, \"items\": [1, 2,],}";
        let value = extract_json(raw).expect("Repairable JSON");
        assert_eq!(value["done"], true);
        assert!(value["skip"].is_null());
        assert_eq!(value["items"], serde_json::json!([1, 2]));
    }

    #[test]
    fn truncated_json_is_closed() {
        let value = extract_json(r#"{"title": "Intro", "bullets": ["one", "tw"#).expect("Closable JSON");
        assert_eq!(value["bullets"][1], "tw");
    }

    #[test]
    fn prose_around_json_is_ignored() {
        let raw = "Sure! Here you go: {\"title\": \"Check\"} Let me know if you need more.";
        let value = extract_json(raw).expect("Embedded JSON");
        assert_eq!(value["title"], "Check");
    }

    #[test]
    fn failures_are_typed() {
        let empty = extract_json("   ").expect_err("Blank input");
        assert_eq!(empty.kind, JsonErrorKind::Empty);

        let prose = extract_json("I cannot help with that.").expect_err("No JSON");
        assert!(matches!(
            prose.kind,
            JsonErrorKind::Unparseable { strategies: 5, .. }
        ));
    }

    #[test]
    fn scene_shapes() {
        let wrapped = serde_json::json!({"scene": {"title": "A"}});
        assert_eq!(single_scene(wrapped).expect("Wrapped scene")["title"], "A");

        let list = serde_json::json!({"storyboard": {"scenes": [{"title": "A"}, {"title": "B"}]}});
        assert_eq!(scene_list(list).expect("Nested list").len(), 2);

        assert!(scene_list(serde_json::json!({"title": "A"})).is_err());
    }
}
