//! Directive tokenizer.
//!
//! A directive is a single trimmed comment line starting with `+`. The
//! marker is stripped and the rest split on `:` into a token sequence. The
//! final token may carry a comma-separated `key=value;value` payload; no
//! escaping exists, so a literal `:` can only appear inside that payload's
//! own elements if it never needs to survive tokenization.
//!
//! The legacy single-token form `+domain=example.com` splits once on `=` so
//! old-style `+name=value` directives dispatch as module `name` with payload
//! `value`.

/// Splits one comment line into an ordered token sequence.
///
/// Returns `None` for blank lines and lines without the `+` marker; those
/// are ordinary comments, not directives.
pub fn tokenize(line: &str) -> Option<Vec<String>> {
    let line = line.trim();
    let rest = line.strip_prefix('+')?;
    if rest.is_empty() {
        return None;
    }
    let tokens: Vec<String> = rest.split(':').map(str::to_string).collect();

    // Legacy "+name=value" form: one structural token holding a key=value.
    if tokens.len() == 1 {
        if let Some((module, value)) = tokens[0].split_once('=') {
            return Some(vec![module.to_string(), value.to_string()]);
        }
    }
    Some(tokens)
}
