//! Markdown code fences around JSON returned by chat models.

/// Remove a markdown code fence wrapped around a payload.
///
/// The opening fence line (e.g. "```json") is dropped together with
/// everything from the last closing fence onwards. Text without a leading
/// fence is only trimmed.
pub fn strip_code_fences(input: &str) -> &str {
    let mut s = input.trim();
    if s.starts_with("```") {
        if let Some(nl) = s.find('\n') {
            s = &s[nl + 1..];
        }
        if let Some(end) = s.rfind("```") {
            s = &s[..end];
        }
    }
    s.trim()
}
