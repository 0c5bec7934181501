use std::collections::HashMap;
use std::sync::Arc;

use lexigraph_graph::{EdgeBuilder, VectorMap, normalize_words};
use lexigraph_vecstore::dot;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Weights of the global jump taken when the walk is stuck.
///
/// A candidate scores
/// `sum(k < lookback) sim(candidate, path[-1-k]) * decay^k + centrality_weight * centrality(candidate)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    /// How many of the most recent path words are compared. Default: 5.
    pub lookback: usize,

    /// Per-step decay of older path words. Default: 0.6.
    pub decay: f32,

    /// Weight of the candidate's weighted degree. Default: 0.05.
    pub centrality_weight: f32,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            lookback: 5,
            decay: 0.6,
            centrality_weight: 0.05,
        }
    }
}

/// Orders word sets for a study session.
pub struct ChainSequencer {
    builder: Arc<EdgeBuilder>,
    cfg: JumpConfig,
}

impl ChainSequencer {
    pub fn new(builder: Arc<EdgeBuilder>, cfg: JumpConfig) -> Self {
        Self { builder, cfg }
    }

    pub fn config(&self) -> &JumpConfig {
        &self.cfg
    }

    /// Return `words` reordered for semantic continuity.
    ///
    /// The result is a permutation of the input: words sharing a normalized
    /// key are emitted together, and blank entries go last.
    pub async fn sequence<S: AsRef<str>>(&self, words: &[S]) -> Vec<String> {
        let keys = normalize_words(words);
        let vectors = self.builder.resolve_vectors(&keys).await;
        let order = self.order(&vectors).await;

        let mut originals: HashMap<String, Vec<String>> = HashMap::with_capacity(keys.len());
        let mut blanks = Vec::new();
        for w in words {
            let raw = w.as_ref();
            let key = raw.trim().to_lowercase();
            if key.is_empty() {
                blanks.push(raw.to_string());
            } else {
                originals.entry(key).or_default().push(raw.to_string());
            }
        }

        let mut out = Vec::with_capacity(words.len());
        for key in &order {
            if let Some(group) = originals.remove(key) {
                out.extend(group);
            }
        }
        out.extend(blanks);
        out
    }

    /// Order the keys of `vectors`: the walk over embedded words, then the
    /// missing words in input order.
    pub async fn order(&self, vectors: &VectorMap) -> Vec<String> {
        let n = vectors.len();
        let mut out: Vec<String> = Vec::with_capacity(n + vectors.missing().len());

        if n > 0 {
            let path = self.walk(vectors).await;
            out.extend(path.into_iter().map(|i| vectors.word(i).to_string()));
        }
        out.extend(vectors.missing().iter().cloned());
        out
    }

    async fn walk(&self, vectors: &VectorMap) -> Vec<usize> {
        let n = vectors.len();
        // Threshold 0 keeps every positive pair; no top-up is needed.
        let edges = self.builder.compute_edges(vectors, 0.0, 0).await;

        let mut adj: Vec<Vec<(usize, f32)>> = vec![Vec::new(); n];
        let mut centrality = vec![0.0f32; n];
        for e in &edges {
            let (Some(i), Some(j)) = (vectors.position(&e.a), vectors.position(&e.b)) else {
                continue;
            };
            adj[i].push((j, e.similarity));
            adj[j].push((i, e.similarity));
            centrality[i] += e.similarity;
            centrality[j] += e.similarity;
        }
        for list in &mut adj {
            list.sort_by(|x, y| y.1.total_cmp(&x.1).then(x.0.cmp(&y.0)));
        }

        let mut start = 0;
        for i in 1..n {
            if centrality[i] > centrality[start] {
                start = i;
            }
        }

        let chunk = self.builder.config().chunk_size.max(1);
        let mut visited = vec![false; n];
        let mut cursor = vec![0usize; n];
        let mut path = Vec::with_capacity(n);
        let mut stack = vec![start];
        visited[start] = true;
        path.push(start);

        let mut jumps = 0usize;
        let mut steps = 0usize;
        loop {
            while let Some(&top) = stack.last() {
                let mut next = None;
                while cursor[top] < adj[top].len() {
                    let (j, _) = adj[top][cursor[top]];
                    cursor[top] += 1;
                    if !visited[j] {
                        next = Some(j);
                        break;
                    }
                }
                match next {
                    Some(j) => {
                        visited[j] = true;
                        path.push(j);
                        stack.push(j);
                    }
                    None => {
                        stack.pop();
                    }
                }

                steps += 1;
                if steps % chunk == 0 {
                    tokio::task::yield_now().await;
                }
            }

            if path.len() == n {
                break;
            }

            let unvisited = (0..n).filter(|&i| !visited[i]);
            let sim = |a: usize, b: usize| dot(vectors.vector(a), vectors.vector(b)).max(0.0);
            let Some(target) = jump_target(&self.cfg, unvisited, &path, sim, &centrality) else {
                break;
            };
            visited[target] = true;
            path.push(target);
            stack.push(target);
            jumps += 1;
            tokio::task::yield_now().await;
        }

        debug!(words = n, jumps, "chain: walk done");
        path
    }
}

/// Highest-scoring candidate for a global jump; ties go to the earliest
/// candidate.
fn jump_target<F>(
    cfg: &JumpConfig,
    candidates: impl Iterator<Item = usize>,
    path: &[usize],
    sim: F,
    centrality: &[f32],
) -> Option<usize>
where
    F: Fn(usize, usize) -> f32,
{
    let depth = cfg.lookback.min(path.len());
    let mut best: Option<(usize, f32)> = None;

    for c in candidates {
        let mut score = cfg.centrality_weight * centrality[c];
        let mut weight = 1.0f32;
        for k in 0..depth {
            score += sim(c, path[path.len() - 1 - k]) * weight;
            weight *= cfg.decay;
        }
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((c, score));
        }
    }
    best.map(|(c, _)| c)
}
