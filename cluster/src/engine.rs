use std::collections::HashMap;
use std::sync::Arc;

use lexigraph_graph::{EdgeBuilder, VectorMap, connected_components, normalize_words};
use lexigraph_vecstore::{Cluster, SimilarityEdge};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::kmeans::kmeans;

/// Tuning for [`ClusterEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Similarity threshold of the strong graph. Default: 0.6.
    pub strong_threshold: f32,

    /// Minimum connections per word in the strong graph. Default: 1.
    pub strong_min_connections: usize,

    /// Hard upper bound on cluster size. Default: 30.
    pub max_cluster_size: usize,

    /// Components smaller than this are pooled and rebalanced. Default: 10.
    pub min_component_size: usize,

    /// Target size of rebalanced pool clusters. Default: 20.
    pub pool_target_size: usize,

    /// k-means iteration bound. Default: 10.
    pub kmeans_max_iterations: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            strong_threshold: 0.6,
            strong_min_connections: 1,
            max_cluster_size: 30,
            min_component_size: 10,
            pool_target_size: 20,
            kmeans_max_iterations: 10,
        }
    }
}

/// Anything that can partition a word set into clusters.
///
/// Implementations never fail: words that cannot be placed thematically
/// still come back, in an unembedded cluster.
#[async_trait::async_trait]
pub trait Clusterer: Send + Sync {
    async fn cluster(&self, words: &[String]) -> Vec<Cluster>;
}

/// Partitions word sets into clusters of 1 to `max_cluster_size` words.
pub struct ClusterEngine {
    builder: Arc<EdgeBuilder>,
    cfg: ClusterConfig,
}

impl ClusterEngine {
    pub fn new(builder: Arc<EdgeBuilder>, cfg: ClusterConfig) -> Self {
        Self { builder, cfg }
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.cfg
    }

    /// Cluster `words`. The items of all returned clusters together equal
    /// the normalized input set, each word exactly once. Clusters are sorted
    /// by descending size.
    pub async fn cluster<S: AsRef<str>>(&self, words: &[S]) -> Vec<Cluster> {
        let keys = normalize_words(words);
        if keys.is_empty() {
            return Vec::new();
        }
        let vectors = self.builder.resolve_vectors(&keys).await;
        self.cluster_vectors(&vectors).await
    }

    /// Cluster already-resolved vectors; `vectors.missing()` becomes the
    /// unembedded cluster.
    pub async fn cluster_vectors(&self, vectors: &VectorMap) -> Vec<Cluster> {
        let max = self.max_size();
        let strong = self
            .builder
            .compute_edges(
                vectors,
                self.cfg.strong_threshold,
                self.cfg.strong_min_connections,
            )
            .await;

        let mut groups: Vec<Vec<String>> = Vec::new();
        let mut pool: Vec<String> = Vec::new();
        for component in connected_components(vectors.words(), &strong) {
            if component.len() > max {
                groups.extend(self.bisect(vectors, component).await);
            } else if component.len() < self.cfg.min_component_size {
                pool.extend(component);
            } else {
                groups.push(component);
            }
        }

        let direct = groups.len();
        if !pool.is_empty() {
            groups.extend(self.rebalance_pool(vectors, pool).await);
        }
        debug!(
            words = vectors.len(),
            direct,
            pooled = groups.len() - direct,
            unembedded = vectors.missing().len(),
            "cluster: partition done"
        );

        let mut clusters: Vec<Cluster> = groups
            .into_iter()
            .map(|items| label_by_degree(items, &strong))
            .collect();
        for chunk in vectors.missing().chunks(max) {
            clusters.push(Cluster {
                label: chunk[0].clone(),
                items: chunk.to_vec(),
                unembedded: true,
            });
        }

        clusters.sort_by(|a, b| b.items.len().cmp(&a.items.len()));
        clusters
    }

    fn max_size(&self) -> usize {
        self.cfg.max_cluster_size.max(1)
    }

    /// Split `group` with 2-means until every piece fits. Uses an explicit
    /// stack; pieces come out left to right.
    async fn bisect(&self, vectors: &VectorMap, group: Vec<String>) -> Vec<Vec<String>> {
        let max = self.max_size();
        let mut done = Vec::new();
        let mut stack = vec![group];

        while let Some(group) = stack.pop() {
            if group.len() <= max {
                done.push(group);
                continue;
            }
            let (left, right) = self.split_in_two(vectors, group).await;
            stack.push(right);
            stack.push(left);
        }
        done
    }

    async fn split_in_two(
        &self,
        vectors: &VectorMap,
        mut group: Vec<String>,
    ) -> (Vec<String>, Vec<String>) {
        let refs: Vec<&[f32]> = group.iter().filter_map(|w| vectors.get(w)).collect();
        if refs.len() == group.len() {
            let parts = kmeans(&refs, 2, self.cfg.kmeans_max_iterations).await;
            if let [left, right] = parts.as_slice() {
                let pick = |idx: &[usize]| -> Vec<String> {
                    idx.iter().map(|&i| group[i].clone()).collect()
                };
                return (pick(left), pick(right));
            }
        }
        // Degenerate split (e.g. identical vectors): halve in order so the
        // group still shrinks.
        let right = group.split_off(group.len() / 2);
        (group, right)
    }

    /// Re-partition pooled small components into clusters of roughly
    /// `pool_target_size`.
    async fn rebalance_pool(&self, vectors: &VectorMap, pool: Vec<String>) -> Vec<Vec<String>> {
        let k = pool.len().div_ceil(self.cfg.pool_target_size.max(1)).max(1);
        let refs: Vec<&[f32]> = pool.iter().filter_map(|w| vectors.get(w)).collect();
        let parts = kmeans(&refs, k, self.cfg.kmeans_max_iterations).await;

        let mut out = Vec::with_capacity(parts.len());
        for part in parts {
            let group: Vec<String> = part.iter().map(|&i| pool[i].clone()).collect();
            if group.len() > self.max_size() {
                out.extend(self.bisect(vectors, group).await);
            } else {
                out.push(group);
            }
        }
        out
    }
}

#[async_trait::async_trait]
impl Clusterer for ClusterEngine {
    async fn cluster(&self, words: &[String]) -> Vec<Cluster> {
        ClusterEngine::cluster(self, words).await
    }
}

/// Label a group by its member with the most edges to other members; ties
/// go to the earliest member.
fn label_by_degree(items: Vec<String>, edges: &[SimilarityEdge]) -> Cluster {
    let position: HashMap<&str, usize> = items
        .iter()
        .enumerate()
        .map(|(i, w)| (w.as_str(), i))
        .collect();
    let mut degree = vec![0usize; items.len()];
    for e in edges {
        if let (Some(&i), Some(&j)) = (position.get(e.a.as_str()), position.get(e.b.as_str())) {
            degree[i] += 1;
            degree[j] += 1;
        }
    }

    let mut best = 0;
    for (i, &d) in degree.iter().enumerate() {
        if d > degree[best] {
            best = i;
        }
    }

    Cluster {
        label: items[best].clone(),
        items,
        unembedded: false,
    }
}
