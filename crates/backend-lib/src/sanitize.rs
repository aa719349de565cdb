// ============================
// crates/backend-lib/src/sanitize.rs
// ============================
//! HTML escaping for free text at the point of ingress.

/// Trim and escape `< > " ' &` into named entities.
///
/// Each character is rewritten exactly once, so the `&` of an entity this
/// call produced is never escaped again. Running it twice over the same text
/// does double-escape; sanitize once, where the text enters.
pub fn sanitize(input: &str) -> String {
    let trimmed = input.trim();
    let mut out = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '&' => out.push_str("&amp;"),
            _ => out.push(c),
        }
    }
    out
}
