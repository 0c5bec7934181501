use std::collections::HashMap;

/// Word vectors resolved for one computation, in input order.
///
/// Words for which no vector could be found or generated are kept aside in
/// [`VectorMap::missing`] so callers can surface them instead of dropping
/// them.
#[derive(Debug, Clone, Default)]
pub struct VectorMap {
    words: Vec<String>,
    vectors: Vec<Vec<f32>>,
    index: HashMap<String, usize>,
    missing: Vec<String>,
}

impl VectorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from `(word, vector)` pairs. Later duplicates are ignored.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        let mut map = Self::new();
        for (w, v) in pairs {
            map.insert(w.into(), v);
        }
        map
    }

    pub fn insert(&mut self, word: String, vector: Vec<f32>) {
        if self.index.contains_key(&word) {
            return;
        }
        self.index.insert(word.clone(), self.words.len());
        self.words.push(word);
        self.vectors.push(vector);
    }

    pub fn mark_missing(&mut self, word: String) {
        self.missing.push(word);
    }

    /// Words with a vector, in input order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Words without a vector, in input order.
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn word(&self, i: usize) -> &str {
        &self.words[i]
    }

    pub fn vector(&self, i: usize) -> &[f32] {
        &self.vectors[i]
    }

    pub fn position(&self, word: &str) -> Option<usize> {
        self.index.get(word).copied()
    }

    pub fn get(&self, word: &str) -> Option<&[f32]> {
        self.position(word).map(|i| self.vectors[i].as_slice())
    }

    /// Restrict to `words` (in the given order); words without a vector here
    /// become missing in the result.
    pub fn subset(&self, words: &[String]) -> VectorMap {
        let mut out = VectorMap::new();
        for w in words {
            match self.get(w) {
                Some(v) => out.insert(w.clone(), v.to_vec()),
                None => out.mark_missing(w.clone()),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order_and_ignores_duplicates() {
        let map = VectorMap::from_pairs([
            ("banana", vec![0.0, 1.0]),
            ("apple", vec![1.0, 0.0]),
            ("banana", vec![9.0, 9.0]),
        ]);
        assert_eq!(map.words(), ["banana", "apple"]);
        assert_eq!(map.get("banana"), Some([0.0, 1.0].as_slice()));
        assert_eq!(map.position("apple"), Some(1));
    }

    #[test]
    fn subset_reports_unknown_words_missing() {
        let map = VectorMap::from_pairs([("apple", vec![1.0]), ("pear", vec![1.0])]);
        let sub = map.subset(&["pear".to_string(), "kiwi".to_string()]);
        assert_eq!(sub.words(), ["pear"]);
        assert_eq!(sub.missing(), ["kiwi"]);
    }
}
