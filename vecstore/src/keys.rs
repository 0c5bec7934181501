//! KV key layout (relative to the configured prefix):
//!
//! ```text
//! {prefix}:vec:{word}   -> msgpack Vec<f32>
//! {prefix}:edge:{word}  -> msgpack Vec<SimilarityEdge>
//! {prefix}:cc:{key}     -> msgpack CacheEntry
//! ```

pub fn vector_key(prefix: &str, word: &str) -> String {
    format!("{prefix}:vec:{word}")
}

pub fn vector_prefix(prefix: &str) -> String {
    format!("{prefix}:vec:")
}

pub fn edge_key(prefix: &str, word: &str) -> String {
    format!("{prefix}:edge:{word}")
}

pub fn edge_prefix(prefix: &str) -> String {
    format!("{prefix}:edge:")
}

pub fn cluster_cache_key(prefix: &str, key: &str) -> String {
    format!("{prefix}:cc:{key}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_share_their_scan_prefix() {
        assert!(vector_key("lx", "apple").starts_with(&vector_prefix("lx")));
        assert!(edge_key("lx", "apple").starts_with(&edge_prefix("lx")));
        assert!(!edge_key("lx", "apple").starts_with(&vector_prefix("lx")));
        assert_eq!(cluster_cache_key("lx", "deck-1"), "lx:cc:deck-1");
    }
}
