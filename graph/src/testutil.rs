use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use lexigraph_embed::{EmbedError, Embedder};
use lexigraph_kv::MemoryStore;
use lexigraph_vecstore::{KvVectorStore, VectorStore, normalized};

pub fn memory_store() -> Arc<dyn VectorStore> {
    Arc::new(KvVectorStore::new(Arc::new(MemoryStore::new()), "test"))
}

pub fn unit(v: &[f32]) -> Vec<f32> {
    normalized(v)
}

/// Embedder with a fixed vocabulary; words in `failing` always error, and
/// any batch containing one fails as a whole.
pub struct FlakyEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    failing: HashSet<String>,
    batch_calls: AtomicUsize,
    single_calls: AtomicUsize,
}

impl FlakyEmbedder {
    pub fn new(vectors: &[(&str, Vec<f32>)], failing: &[&str]) -> Self {
        Self {
            vectors: vectors
                .iter()
                .map(|(w, v)| (w.to_string(), v.clone()))
                .collect(),
            failing: failing.iter().map(|w| w.to_string()).collect(),
            batch_calls: AtomicUsize::new(0),
            single_calls: AtomicUsize::new(0),
        }
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    pub fn single_calls(&self) -> usize {
        self.single_calls.load(Ordering::SeqCst)
    }

    fn lookup(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        if self.failing.contains(text) {
            return Err(EmbedError::Api(format!("no embedding for {text}")));
        }
        self.vectors
            .get(text)
            .cloned()
            .ok_or_else(|| EmbedError::Api(format!("unknown word {text}")))
    }
}

#[async_trait::async_trait]
impl Embedder for FlakyEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        self.single_calls.fetch_add(1, Ordering::SeqCst);
        self.lookup(text)
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        texts.iter().map(|t| self.lookup(t)).collect()
    }

    fn dimension(&self) -> usize {
        2
    }
}
