//! Response normalization.
//!
//! Providers routinely wrap JSON answers in Markdown code fences even when
//! told not to. [`normalize`] strips that cosmetic wrapping so downstream
//! JSON parsing never fails on it.

/// Strip Markdown code-fence wrapping from provider output.
///
/// Removes a leading triple-backtick marker (with optional `json` language
/// tag) and a trailing triple-backtick marker, then trims surrounding
/// whitespace. Runs to a fixpoint, so `normalize(normalize(x)) == normalize(x)`
/// for all inputs.
pub fn normalize(text: &str) -> String {
    let mut current = text.trim().to_string();
    loop {
        let next = strip_fences(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// One pass of fence stripping. `normalize` iterates this to a fixpoint.
fn strip_fences(text: &str) -> String {
    let mut s = text;
    if let Some(rest) = s.strip_prefix("```") {
        s = rest.strip_prefix("json").unwrap_or(rest);
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest;
    }
    s.trim().to_string()
}
