use std::collections::HashSet;

/// Normalize word keys: trim, lowercase, drop blanks, and dedupe keeping the
/// first occurrence.
pub fn normalize_words<S: AsRef<str>>(words: &[S]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(words.len());
    let mut out = Vec::with_capacity(words.len());
    for w in words {
        let key = w.as_ref().trim().to_lowercase();
        if key.is_empty() {
            continue;
        }
        if seen.insert(key.clone()) {
            out.push(key);
        }
    }
    out
}
