//! Defensive JSON recovery from provider output.
//!
//! Models wrap JSON in prose and code fences even when told not to. The
//! recovery order is: direct parse, fenced ```json block, outermost
//! `{...}` slice.

use serde_json::Value;

/// Extract a JSON value from `response`, tolerating surrounding prose and
/// markdown fences. Returns `None` when nothing parseable is found.
pub fn recover_json(response: &str) -> Option<Value> {
  let trimmed = response.trim();

  if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
    return Some(value);
  }

  if let Some(fenced) = fenced_block(trimmed)
    && let Ok(value) = serde_json::from_str::<Value>(fenced)
  {
    return Some(value);
  }

  if let Some(body) = outermost_object(trimmed)
    && let Ok(value) = serde_json::from_str::<Value>(body)
  {
    return Some(value);
  }

  None
}

/// The contents of the first ```json fence, if any.
fn fenced_block(text: &str) -> Option<&str> {
  let start = text.find("```json")? + "```json".len();
  let rest = &text[start..];
  let end = rest.find("```")?;
  Some(rest[..end].trim())
}

/// The slice from the first `{` to the last `}`.
fn outermost_object(text: &str) -> Option<&str> {
  let start = text.find('{')?;
  let end = text.rfind('}')?;
  (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn direct_json_parses() {
    let value = recover_json("{\"drafts\": []}").unwrap();
    assert!(value.get("drafts").is_some());
  }

  #[test]
  fn fenced_json_is_extracted() {
    let response = "Sure! Here is the JSON you asked for:\n\
                    ```json\n{\"alignment_score\": 90}\n```\nHope that helps.";
    let value = recover_json(response).unwrap();
    assert_eq!(value["alignment_score"], 90);
  }

  #[test]
  fn embedded_object_is_sliced_out() {
    let response = "The result is {\"ok\": true} as requested.";
    let value = recover_json(response).unwrap();
    assert_eq!(value["ok"], true);
  }

  #[test]
  fn nested_braces_survive_slicing() {
    let response = "prefix {\"outer\": {\"inner\": 1}} suffix";
    let value = recover_json(response).unwrap();
    assert_eq!(value["outer"]["inner"], 1);
  }

  #[test]
  fn plain_prose_yields_none() {
    assert!(recover_json("I could not produce any output.").is_none());
  }

  #[test]
  fn empty_input_yields_none() {
    assert!(recover_json("").is_none());
  }
}
