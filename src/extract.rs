//! Locating the JSON array inside an LLM's free-text reply
//!
//! Models are instructed to answer with a bare JSON array, but replies
//! regularly arrive wrapped in markdown fences or with prose around the
//! payload. The extractor isolates the first balanced top-level array
//! without parsing it; validity of the content is the caller's problem.

/// Returns the substring covering the first balanced top-level JSON array,
/// or `None` when the text contains no array.
///
/// The scan tracks string-literal state so `[` and `]` inside quoted
/// values do not affect bracket depth, and a backslash escape keeps `\"`
/// from toggling that state. The returned slice borrows from `raw` and is
/// byte-identical to the array text as the model produced it.
#[must_use]
pub fn extract_json_array(raw: &str) -> Option<&str> {
    let text = strip_code_fences(raw);

    let mut start = None;
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '[' => {
                if start.is_none() {
                    start = Some(i);
                }
                depth += 1;
            }
            ']' if start.is_some() => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start?..=i]);
                }
            }
            _ => {}
        }
    }

    // Ran out of input before the array closed, or never saw one open.
    None
}

/// Strips a surrounding markdown code fence, tolerating a language tag on
/// the opening line (```json). Text without a leading fence passes through.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(after_fence) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(newline) = after_fence.find('\n') else {
        return trimmed;
    };
    let body = &after_fence[newline + 1..];
    match body.rfind("```") {
        Some(end) => &body[..end],
        None => body,
    }
}
