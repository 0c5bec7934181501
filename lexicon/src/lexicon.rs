use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use lexigraph_chain::{ChainSequencer, JumpConfig};
use lexigraph_cluster::{
    CardProvider, ClusterCache, ClusterConfig, ClusterEngine, Clusterer, HydratedCluster,
};
use lexigraph_embed::Embedder;
use lexigraph_graph::{EdgeBuilder, EdgeConfig, normalize_words};
use lexigraph_vecstore::{Cluster, SimilarityEdge, VectorStore, WordVector};
use tracing::{debug, warn};

use crate::error::LexiconError;
use crate::view::GraphView;

/// Neighbor count returned by [`Lexicon::get_neighbors`] callers that have no
/// preference.
pub const DEFAULT_NEIGHBOR_LIMIT: usize = 20;

/// Configures a [`Lexicon`].
pub struct LexiconConfig {
    /// Vector, adjacency and cluster cache storage. Required.
    pub store: Arc<dyn VectorStore>,

    /// Generates vectors for words the store lacks. Optional; without it
    /// such words are treated as unembedded.
    pub embedder: Option<Arc<dyn Embedder>>,

    /// Lists the live cards of a deck. Required.
    pub cards: Arc<dyn CardProvider>,

    pub edge: EdgeConfig,
    pub cluster: ClusterConfig,
    pub chain: JumpConfig,
}

/// Process-level entry point for the vocabulary core. Safe for concurrent
/// use; clones of the inner components are shared.
pub struct Lexicon {
    store: Arc<dyn VectorStore>,
    cards: Arc<dyn CardProvider>,
    builder: Arc<EdgeBuilder>,
    engine: Arc<ClusterEngine>,
    cache: ClusterCache,
    sequencer: ChainSequencer,
}

impl Lexicon {
    pub fn new(cfg: LexiconConfig) -> Self {
        let builder = Arc::new(EdgeBuilder::new(
            Arc::clone(&cfg.store),
            cfg.embedder,
            cfg.edge,
        ));
        let engine = Arc::new(ClusterEngine::new(Arc::clone(&builder), cfg.cluster));
        let cache = ClusterCache::new(
            Arc::clone(&engine) as Arc<dyn Clusterer>,
            Arc::clone(&cfg.store),
        );
        let sequencer = ChainSequencer::new(Arc::clone(&builder), cfg.chain);

        Self {
            store: cfg.store,
            cards: cfg.cards,
            builder,
            engine,
            cache,
            sequencer,
        }
    }

    pub fn store(&self) -> &Arc<dyn VectorStore> {
        &self.store
    }

    /// Store precomputed vectors, keyed by normalized word. Returns the
    /// number written.
    pub fn import_vectors(&self, vectors: &[WordVector]) -> Result<usize, LexiconError> {
        let mut written = 0;
        for wv in vectors {
            let key = wv.word.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            if wv.vector.is_empty() {
                return Err(LexiconError::EmptyVector(wv.word.clone()));
            }
            self.store.put_vector(&key, &wv.vector)?;
            written += 1;
        }
        debug!(written, "lexicon: imported vectors");
        Ok(written)
    }

    /// Compute similarity edges for `words` and persist each word's
    /// adjacency list, replacing what was stored before.
    ///
    /// Every embedded word gets an adjacency entry, empty when it has no
    /// edges. Words without a vector are skipped. A word outside the set
    /// that was linked to a rewritten word loses that link, so stored
    /// adjacency stays symmetric. Storage failures are logged per word and
    /// never discard the computed edges.
    pub async fn build_edges<S: AsRef<str>>(
        &self,
        words: &[S],
        threshold: f32,
        min_connections: usize,
    ) -> Vec<SimilarityEdge> {
        let keys = normalize_words(words);
        let vectors = self.builder.resolve_vectors(&keys).await;
        let edges = self
            .builder
            .compute_edges(&vectors, threshold, min_connections)
            .await;

        let members: HashSet<&str> = vectors.words().iter().map(String::as_str).collect();
        let mut adjacency: HashMap<&str, Vec<SimilarityEdge>> =
            members.iter().map(|&w| (w, Vec::new())).collect();
        for e in &edges {
            for end in [&e.a, &e.b] {
                if let Some(list) = adjacency.get_mut(end.as_str()) {
                    list.push(e.clone());
                }
            }
        }

        // outside word -> rewritten words it must no longer point at
        let mut stale: HashMap<String, HashSet<String>> = HashMap::new();
        let mut failed = 0usize;
        for word in vectors.words() {
            let previous = match self.store.get_edges(word) {
                Ok(list) => list,
                Err(e) => {
                    warn!(word = %word, error = %e, "lexicon: previous adjacency unreadable");
                    Vec::new()
                }
            };
            let list = adjacency.get(word.as_str()).map(Vec::as_slice).unwrap_or_default();
            if let Err(e) = self.store.put_edges(word, list) {
                warn!(word = %word, error = %e, "lexicon: failed to store adjacency");
                failed += 1;
                continue;
            }
            for old in &previous {
                if let Some(o) = old.other(word).filter(|o| !members.contains(o)) {
                    stale.entry(o.to_string()).or_default().insert(word.clone());
                }
            }
        }
        for (outside, dropped) in &stale {
            self.unlink(outside, dropped);
        }

        debug!(
            words = vectors.len(),
            missing = vectors.missing().len(),
            edges = edges.len(),
            failed,
            unlinked = stale.len(),
            "lexicon: edges stored"
        );
        edges
    }

    /// Remove links to `dropped` from the stored adjacency of `word`.
    fn unlink(&self, word: &str, dropped: &HashSet<String>) {
        let mut list = match self.store.get_edges(word) {
            Ok(list) => list,
            Err(e) => {
                warn!(word, error = %e, "lexicon: skipping unreadable adjacency");
                return;
            }
        };
        let before = list.len();
        list.retain(|e| e.other(word).is_none_or(|o| !dropped.contains(o)));
        if list.len() == before {
            return;
        }
        if let Err(e) = self.store.put_edges(word, &list) {
            warn!(word, error = %e, "lexicon: failed to drop stale links");
        }
    }

    /// Partition `words` into bounded thematic clusters. Not cached.
    pub async fn cluster<S: AsRef<str>>(&self, words: &[S]) -> Vec<Cluster> {
        self.engine.cluster(words).await
    }

    /// Reorder `words` for semantic continuity.
    pub async fn sequence<S: AsRef<str>>(&self, words: &[S]) -> Vec<String> {
        self.sequencer.sequence(words).await
    }

    /// Cached clusters of deck `key`, joined against its live cards.
    pub async fn get_clusters(
        &self,
        key: &str,
        force_refresh: bool,
    ) -> Result<Vec<HydratedCluster>, LexiconError> {
        Ok(self.cache.get(key, self.cards.as_ref(), force_refresh).await?)
    }

    pub fn invalidate_clusters(&self, key: &str) -> Result<(), LexiconError> {
        Ok(self.cache.invalidate(key)?)
    }

    /// Stored edges of `word`, most similar first, at most `limit`.
    pub fn get_neighbors(&self, word: &str, limit: usize) -> Result<Vec<SimilarityEdge>, LexiconError> {
        let key = word.trim().to_lowercase();
        if key.is_empty() {
            return Ok(Vec::new());
        }
        let mut edges = self.store.get_edges(&key)?;
        sort_by_similarity(&mut edges, &key);
        edges.truncate(limit);
        Ok(edges)
    }

    /// Projection over every stored adjacency list, keeping each word's
    /// `max_links_per_node` strongest links.
    ///
    /// A link kept by either endpoint appears once. Unreadable adjacency
    /// lists are logged and skipped.
    pub fn global_graph(&self, max_links_per_node: usize) -> Result<GraphView, LexiconError> {
        let mut words = self.store.edge_words()?;
        words.sort();

        let mut seen = HashSet::new();
        let mut links = Vec::new();
        for word in &words {
            let mut edges = match self.store.get_edges(word) {
                Ok(edges) => edges,
                Err(e) => {
                    warn!(word = %word, error = %e, "lexicon: skipping unreadable adjacency");
                    continue;
                }
            };
            sort_by_similarity(&mut edges, word);
            for e in edges.into_iter().take(max_links_per_node) {
                if seen.insert(e.pair_key()) {
                    links.push(e);
                }
            }
        }

        Ok(GraphView::from_edges(&words, &links))
    }

    /// Projection restricted to `words`: every word is a node, and a stored
    /// edge is a link when both endpoints are in the set.
    ///
    /// Unreadable adjacency lists are logged and skipped; links they share
    /// with readable members still appear.
    pub fn graph_for_subset<S: AsRef<str>>(&self, words: &[S]) -> GraphView {
        let keys = normalize_words(words);
        let members: HashSet<&str> = keys.iter().map(String::as_str).collect();

        let mut seen = HashSet::new();
        let mut links = Vec::new();
        for word in &keys {
            let edges = match self.store.get_edges(word) {
                Ok(edges) => edges,
                Err(e) => {
                    warn!(word = %word, error = %e, "lexicon: skipping unreadable adjacency");
                    continue;
                }
            };
            for e in edges {
                if e.other(word).is_some_and(|o| members.contains(o)) && seen.insert(e.pair_key()) {
                    links.push(e);
                }
            }
        }

        GraphView::from_edges(&keys, &links)
    }
}

/// Most similar first; ties by the opposite endpoint.
fn sort_by_similarity(edges: &mut [SimilarityEdge], word: &str) {
    edges.sort_by(|x, y| {
        y.similarity
            .total_cmp(&x.similarity)
            .then_with(|| x.other(word).cmp(&y.other(word)))
    });
}
