//! JSON extraction from free-form generator output
//!
//! The model is asked for bare JSON but often wraps it in prose or markdown
//! fences. The parser looks for the first balanced top-level object and
//! leaves all semantic validation to the normalizer.

use serde_json::Value;

use crate::planner::PlanError;

/// Pull the first JSON object out of `text` and deserialize it.
///
/// Strategy: scan for the first balanced `{...}` region (string- and
/// escape-aware, so braces inside string values don't confuse it). If no
/// balanced object exists, accept the whole trimmed text when it strictly
/// parses to an object. Anything else is a `MalformedResponse`.
pub fn parse_plan_response(text: &str) -> Result<Value, PlanError> {
  if let Some(candidate) = first_balanced_object(text) {
    if let Ok(value) = serde_json::from_str::<Value>(candidate) {
      if value.is_object() {
        return Ok(value);
      }
    }
  }

  let trimmed = text.trim();
  match serde_json::from_str::<Value>(trimmed) {
    Ok(value) if value.is_object() => Ok(value),
    _ => Err(PlanError::MalformedResponse),
  }
}

/// Slice of `text` from the first `{` to its matching `}`, or None
fn first_balanced_object(text: &str) -> Option<&str> {
  let start = text.find('{')?;
  let bytes = text.as_bytes();

  let mut depth = 0usize;
  let mut in_string = false;
  let mut escaped = false;

  for (offset, &byte) in bytes[start..].iter().enumerate() {
    if in_string {
      if escaped {
        escaped = false;
      } else if byte == b'\\' {
        escaped = true;
      } else if byte == b'"' {
        in_string = false;
      }
      continue;
    }

    match byte {
      b'"' => in_string = true,
      b'{' => depth += 1,
      b'}' => {
        depth -= 1;
        if depth == 0 {
          return Some(&text[start..=start + offset]);
        }
      }
      _ => {}
    }
  }

  None
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
