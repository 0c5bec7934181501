use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use lexigraph_cluster::{ClusterConfig, ClusterEngine, kmeans};
use lexigraph_graph::{EdgeBuilder, EdgeConfig, VectorMap};
use lexigraph_kv::MemoryStore;
use lexigraph_vecstore::{KvVectorStore, normalized};

fn random_unit_vec(dim: usize, seed: u64) -> Vec<f32> {
    let mut v = Vec::with_capacity(dim);
    let mut state = seed;
    for _ in 0..dim {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        v.push(((state >> 33) as f32) / (u32::MAX as f32) - 0.5);
    }
    normalized(&v)
}

/// `themes` groups of `per_theme` words scattered around random centers.
fn vocabulary(themes: usize, per_theme: usize, dim: usize) -> VectorMap {
    let mut map = VectorMap::new();
    for t in 0..themes {
        let center = random_unit_vec(dim, 1 + t as u64);
        for i in 0..per_theme {
            let noise = random_unit_vec(dim, 10_000 + (t * per_theme + i) as u64 * 997);
            let v: Vec<f32> = center.iter().zip(&noise).map(|(c, n)| c + 0.4 * n).collect();
            map.insert(format!("t{t}w{i}"), normalized(&v));
        }
    }
    map
}

fn engine() -> ClusterEngine {
    let store = Arc::new(KvVectorStore::new(Arc::new(MemoryStore::new()), "bench"));
    let builder = Arc::new(EdgeBuilder::new(store, None, EdgeConfig::default()));
    ClusterEngine::new(builder, ClusterConfig::default())
}

fn bench_cluster(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let engine = engine();

    for (themes, per_theme) in [(10, 20), (25, 40)] {
        let vocab = vocabulary(themes, per_theme, 256);
        c.bench_function(&format!("cluster_{}_words", themes * per_theme), |b| {
            b.to_async(&rt)
                .iter(|| async { black_box(engine.cluster_vectors(&vocab).await) });
        });
    }
}

fn bench_kmeans(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let vocab = vocabulary(8, 50, 256);
    let refs: Vec<&[f32]> = (0..vocab.len()).map(|i| vocab.vector(i)).collect();

    c.bench_function("kmeans_400x256_k20", |b| {
        b.to_async(&rt)
            .iter(|| async { black_box(kmeans(&refs, 20, 10).await) });
    });
}

criterion_group!(benches, bench_cluster, bench_kmeans);
criterion_main!(benches);
