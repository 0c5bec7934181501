use std::collections::HashSet;
use std::sync::Arc;

use lexigraph_embed::Embedder;
use lexigraph_vecstore::{SimilarityEdge, VectorStore, dot, normalized};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::resolve::VectorMap;
use crate::words::normalize_words;

/// Tuning for [`EdgeBuilder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    /// Minimum similarity for an edge. Default: 0.65.
    pub threshold: f32,

    /// Every word gets at least this many edges, falling back to its most
    /// similar neighbors below the threshold. Default: 1.
    pub min_connections: usize,

    /// Similarity rows computed between cooperative yields. Default: 64.
    pub chunk_size: usize,

    /// Missing words embedded per vectorizer batch. Default: 32.
    pub embed_chunk_size: usize,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            threshold: 0.65,
            min_connections: 1,
            chunk_size: 64,
            embed_chunk_size: 32,
        }
    }
}

/// Builds similarity edges for word sets, resolving vectors through a
/// [`VectorStore`] and an optional [`Embedder`].
pub struct EdgeBuilder {
    store: Arc<dyn VectorStore>,
    embedder: Option<Arc<dyn Embedder>>,
    cfg: EdgeConfig,
}

impl EdgeBuilder {
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Option<Arc<dyn Embedder>>,
        cfg: EdgeConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            cfg,
        }
    }

    pub fn config(&self) -> &EdgeConfig {
        &self.cfg
    }

    pub fn store(&self) -> &Arc<dyn VectorStore> {
        &self.store
    }

    /// Normalize `words`, resolve their vectors and select edges.
    ///
    /// Candidates per word are all neighbors with similarity at or above
    /// `threshold`, plus the most similar remaining neighbors needed to reach
    /// `min_connections`. Nothing is persisted.
    pub async fn build_edges<S: AsRef<str>>(
        &self,
        words: &[S],
        threshold: f32,
        min_connections: usize,
    ) -> Vec<SimilarityEdge> {
        let keys = normalize_words(words);
        let vectors = self.resolve_vectors(&keys).await;
        self.compute_edges(&vectors, threshold, min_connections).await
    }

    /// Edge selection over already-resolved vectors.
    pub async fn compute_edges(
        &self,
        vectors: &VectorMap,
        threshold: f32,
        min_connections: usize,
    ) -> Vec<SimilarityEdge> {
        compute_edges(vectors, threshold, min_connections, self.cfg.chunk_size).await
    }

    /// Look up a vector for each word key, embedding and persisting the
    /// missing ones.
    ///
    /// Each generated vector is written to the store before the next chunk
    /// starts, so an interrupted run never re-embeds finished words. Words
    /// the store and the embedder both fail on end up in
    /// [`VectorMap::missing`].
    pub async fn resolve_vectors(&self, words: &[String]) -> VectorMap {
        let chunk = self.cfg.chunk_size.max(1);
        let mut slots: Vec<Option<Vec<f32>>> = Vec::with_capacity(words.len());
        let mut pending: Vec<usize> = Vec::new();

        for (i, word) in words.iter().enumerate() {
            match self.store.get_vector(word) {
                Ok(Some(v)) if !v.is_empty() => slots.push(Some(v)),
                Ok(_) => {
                    slots.push(None);
                    pending.push(i);
                }
                Err(e) => {
                    warn!(word = %word, error = %e, "graph: vector read failed");
                    slots.push(None);
                    pending.push(i);
                }
            }
            if (i + 1) % chunk == 0 {
                tokio::task::yield_now().await;
            }
        }

        if let Some(embedder) = self.embedder.as_ref().filter(|_| !pending.is_empty()) {
            debug!(missing = pending.len(), "graph: embedding missing words");
            for batch in pending.chunks(self.cfg.embed_chunk_size.max(1)) {
                let texts: Vec<&str> = batch.iter().map(|&i| words[i].as_str()).collect();
                let embedded = embed_chunk(embedder.as_ref(), &texts).await;
                for (&i, vector) in batch.iter().zip(embedded) {
                    let Some(vector) = vector else { continue };
                    let vector = normalized(&vector);
                    if let Err(e) = self.store.put_vector(&words[i], &vector) {
                        warn!(word = %words[i], error = %e, "graph: vector write failed");
                    }
                    slots[i] = Some(vector);
                }
                tokio::task::yield_now().await;
            }
        }

        let mut map = VectorMap::new();
        for (word, slot) in words.iter().zip(slots) {
            match slot {
                Some(v) => map.insert(word.clone(), v),
                None => map.mark_missing(word.clone()),
            }
        }
        map
    }
}

/// Embed one chunk, falling back to word-by-word calls when the batch call
/// fails so one bad word does not sink its neighbors.
async fn embed_chunk(embedder: &dyn Embedder, texts: &[&str]) -> Vec<Option<Vec<f32>>> {
    match embedder.embed_batch(texts).await {
        Ok(vecs) if vecs.len() == texts.len() => {
            return vecs
                .into_iter()
                .zip(texts)
                .map(|(v, word)| {
                    if v.is_empty() {
                        warn!(word = %word, "graph: embedder returned an empty vector");
                        None
                    } else {
                        Some(v)
                    }
                })
                .collect();
        }
        Ok(vecs) => debug!(
            got = vecs.len(),
            want = texts.len(),
            "graph: batch size mismatch, embedding word by word"
        ),
        Err(e) => debug!(error = %e, "graph: batch embed failed, embedding word by word"),
    }

    let mut out = Vec::with_capacity(texts.len());
    for word in texts {
        match embedder.embed(word).await {
            Ok(v) if !v.is_empty() => out.push(Some(v)),
            Ok(_) => {
                warn!(word = %word, "graph: embedder returned an empty vector");
                out.push(None);
            }
            Err(e) => {
                warn!(word = %word, error = %e, "graph: embed failed");
                out.push(None);
            }
        }
    }
    out
}

/// Select similarity edges among the words of `vectors`.
///
/// Rows are processed in input order; `chunk_size` rows run between
/// cooperative yields. Self-edges and non-positive similarities are never
/// emitted, and each unordered pair appears once, in discovery order.
pub async fn compute_edges(
    vectors: &VectorMap,
    threshold: f32,
    min_connections: usize,
    chunk_size: usize,
) -> Vec<SimilarityEdge> {
    let n = vectors.len();
    let chunk = chunk_size.max(1);
    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    let mut edges = Vec::new();
    let mut row: Vec<(usize, f32)> = Vec::with_capacity(n);

    for i in 0..n {
        row.clear();
        let vi = vectors.vector(i);
        for j in 0..n {
            if j == i {
                continue;
            }
            let sim = dot(vi, vectors.vector(j));
            if sim > 0.0 {
                row.push((j, sim.min(1.0)));
            }
        }

        let mut selected: Vec<(usize, f32)> =
            row.iter().copied().filter(|&(_, s)| s >= threshold).collect();
        if selected.len() < min_connections {
            let mut rest: Vec<(usize, f32)> =
                row.iter().copied().filter(|&(_, s)| s < threshold).collect();
            rest.sort_by(|x, y| y.1.total_cmp(&x.1).then(x.0.cmp(&y.0)));
            let need = min_connections - selected.len();
            selected.extend(rest.into_iter().take(need));
        }

        for (j, sim) in selected {
            if seen.insert((i.min(j), i.max(j))) {
                edges.push(SimilarityEdge::new(vectors.word(i), vectors.word(j), sim));
            }
        }

        if (i + 1) % chunk == 0 {
            tokio::task::yield_now().await;
        }
    }

    let wanted = min_connections.min(n.saturating_sub(1));
    if wanted > 0 {
        let mut degree = vec![0usize; n];
        for &(i, j) in &seen {
            degree[i] += 1;
            degree[j] += 1;
        }
        for (i, &d) in degree.iter().enumerate() {
            if d < wanted {
                warn!(
                    word = vectors.word(i),
                    degree = d,
                    wanted,
                    "graph: too few positive neighbors, vector may be degenerate"
                );
            }
        }
    }

    debug!(words = n, edges = edges.len(), threshold, "graph: edges computed");
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FlakyEmbedder, memory_store, unit};
    use std::collections::HashMap;

    fn degree(edges: &[SimilarityEdge]) -> HashMap<String, usize> {
        let mut d = HashMap::new();
        for e in edges {
            *d.entry(e.a.clone()).or_insert(0) += 1;
            *d.entry(e.b.clone()).or_insert(0) += 1;
        }
        d
    }

    #[tokio::test]
    async fn degenerate_vectors_stay_unconnected() {
        // A zero vector and a vector of another dimension have no positive
        // similarity to anything, so no edge can be forced for them.
        let vectors = VectorMap::from_pairs([
            ("a", unit(&[1.0, 0.0, 0.0])),
            ("b", unit(&[0.9, 0.1, 0.0])),
            ("zero", vec![0.0, 0.0, 0.0]),
            ("short", unit(&[1.0, 0.0])),
        ]);

        let edges = compute_edges(&vectors, 0.65, 1, 64).await;
        let d = degree(&edges);
        assert_eq!(edges.len(), 1);
        assert_eq!(d.get("a"), Some(&1));
        assert_eq!(d.get("b"), Some(&1));
        assert_eq!(d.get("zero"), None);
        assert_eq!(d.get("short"), None);
        assert!(edges.iter().all(|e| e.similarity > 0.0));
    }

    #[tokio::test]
    async fn below_threshold_pair_is_still_connected() {
        let store = memory_store();
        // cos(60deg) = 0.5
        store.put_vector("x", &[1.0, 0.0]).unwrap();
        store.put_vector("y", &[0.5, 0.866_025_4]).unwrap();
        let builder = EdgeBuilder::new(store, None, EdgeConfig::default());

        let edges = builder.build_edges(&["x", "y"], 0.9, 1).await;
        assert_eq!(edges.len(), 1);
        assert_eq!((edges[0].a.as_str(), edges[0].b.as_str()), ("x", "y"));
        assert!((edges[0].similarity - 0.5).abs() < 1e-3);
    }

    #[tokio::test]
    async fn every_word_reaches_min_connections() {
        let vectors = VectorMap::from_pairs(
            (0..12).map(|i| (format!("w{i}"), unit(&[1.0, i as f32 * 0.3, (i % 3) as f32]))),
        );
        for k in [1usize, 2, 4] {
            let edges = compute_edges(&vectors, 0.999, k, 5).await;
            let d = degree(&edges);
            for w in vectors.words() {
                assert!(d.get(w).copied().unwrap_or(0) >= k, "{w} has fewer than {k} edges");
            }
        }
    }

    #[tokio::test]
    async fn edges_are_unique_positive_and_never_self() {
        let vectors = VectorMap::from_pairs([
            ("a", unit(&[1.0, 0.1])),
            ("b", unit(&[1.0, 0.2])),
            ("c", unit(&[-1.0, 0.0])),
            ("d", unit(&[0.9, 0.3])),
        ]);
        let edges = compute_edges(&vectors, 0.0, 3, 2).await;

        let mut keys = HashSet::new();
        for e in &edges {
            assert_ne!(e.a, e.b);
            assert!(e.similarity > 0.0 && e.similarity <= 1.0);
            assert!(keys.insert(e.pair_key()), "duplicate pair {}", e.pair_key());
        }
        // c points away from everything else.
        assert!(edges.iter().all(|e| e.other("c").is_none()));
    }

    #[tokio::test]
    async fn threshold_keeps_all_strong_pairs() {
        let vectors = VectorMap::from_pairs([
            ("a", unit(&[1.0, 0.0, 0.0])),
            ("b", unit(&[0.95, 0.05, 0.0])),
            ("c", unit(&[0.9, 0.1, 0.0])),
            ("z", unit(&[0.0, 0.0, 1.0])),
        ]);
        let edges = compute_edges(&vectors, 0.8, 0, 64).await;
        let pairs: Vec<String> = edges.iter().map(|e| e.pair_key()).collect();
        assert_eq!(pairs, vec!["a|b", "a|c", "b|c"]);
    }

    #[tokio::test]
    async fn missing_vectors_are_embedded_and_persisted() {
        let store = memory_store();
        store.put_vector("apple", &[1.0, 0.0]).unwrap();
        let embedder = Arc::new(FlakyEmbedder::new(&[("banana", vec![0.8, 0.6])], &["xyzzy"]));
        let builder = EdgeBuilder::new(
            store.clone(),
            Some(embedder.clone() as Arc<dyn Embedder>),
            EdgeConfig::default(),
        );

        let map = builder
            .resolve_vectors(&["apple".into(), "banana".into(), "xyzzy".into()])
            .await;

        assert_eq!(map.words(), ["apple", "banana"]);
        assert_eq!(map.missing(), ["xyzzy"]);
        assert!(store.get_vector("banana").unwrap().is_some());
        assert!(store.get_vector("xyzzy").unwrap().is_none());
        // The batch failed on xyzzy, so each word was retried alone.
        assert_eq!(embedder.single_calls(), 2);
    }

    #[tokio::test]
    async fn stored_vectors_skip_the_embedder() {
        let store = memory_store();
        store.put_vector("apple", &[1.0, 0.0]).unwrap();
        let embedder = Arc::new(FlakyEmbedder::new(&[], &[]));
        let builder =
            EdgeBuilder::new(store, Some(embedder.clone() as Arc<dyn Embedder>), EdgeConfig::default());

        builder.build_edges(&["Apple"], 0.65, 1).await;
        assert_eq!(embedder.batch_calls(), 0);
        assert_eq!(embedder.single_calls(), 0);
    }
}
