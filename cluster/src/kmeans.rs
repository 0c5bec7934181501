use lexigraph_vecstore::{cosine_distance, normalize};

/// Partition `vectors` into at most `k` groups with k-means.
///
/// Distance is `1 - dot` over normalized vectors. Centroids are seeded with
/// the first `k` vectors (no random restarts), so the result depends only on
/// the input order. Each point goes to the nearest centroid, ties to the
/// lowest centroid index; a centroid that loses all its points keeps its
/// previous position. Iteration stops when no point moves or after
/// `max_iterations`, yielding to the scheduler between iterations.
///
/// Returns the non-empty groups as input indices in ascending order. Empty
/// input or `k == 0` yields no groups.
pub async fn kmeans(vectors: &[&[f32]], k: usize, max_iterations: usize) -> Vec<Vec<usize>> {
    let n = vectors.len();
    if n == 0 || k == 0 {
        return Vec::new();
    }
    let k = k.min(n);
    let dim = vectors[0].len();

    let mut centroids: Vec<Vec<f32>> = vectors[..k].iter().map(|v| v.to_vec()).collect();
    let mut assignment = vec![usize::MAX; n];

    for _ in 0..max_iterations.max(1) {
        let mut moved = false;
        for (i, v) in vectors.iter().enumerate() {
            let best = nearest(&centroids, v);
            if assignment[i] != best {
                assignment[i] = best;
                moved = true;
            }
        }
        if !moved {
            break;
        }

        let mut sums = vec![vec![0.0f32; dim]; k];
        let mut counts = vec![0usize; k];
        for (v, &c) in vectors.iter().zip(&assignment) {
            for (s, x) in sums[c].iter_mut().zip(v.iter()) {
                *s += *x;
            }
            counts[c] += 1;
        }
        for ((centroid, mut sum), count) in centroids.iter_mut().zip(sums).zip(counts) {
            if count == 0 {
                continue;
            }
            let n = count as f32;
            for x in sum.iter_mut() {
                *x /= n;
            }
            normalize(&mut sum);
            *centroid = sum;
        }

        tokio::task::yield_now().await;
    }

    let mut groups = vec![Vec::new(); k];
    for (i, &c) in assignment.iter().enumerate() {
        groups[c].push(i);
    }
    groups.retain(|g| !g.is_empty());
    groups
}

fn nearest(centroids: &[Vec<f32>], v: &[f32]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (c, centroid) in centroids.iter().enumerate() {
        let d = cosine_distance(centroid, v);
        if d < best_dist {
            best_dist = d;
            best = c;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexigraph_vecstore::normalized;

    fn refs(vs: &[Vec<f32>]) -> Vec<&[f32]> {
        vs.iter().map(|v| v.as_slice()).collect()
    }

    #[tokio::test]
    async fn separates_two_directions() {
        let vs = vec![
            normalized(&[1.0, 0.0]),
            normalized(&[0.0, 1.0]),
            normalized(&[0.95, 0.1]),
            normalized(&[0.1, 0.95]),
            normalized(&[0.9, 0.05]),
        ];
        let groups = kmeans(&refs(&vs), 2, 10).await;
        assert_eq!(groups, vec![vec![0, 2, 4], vec![1, 3]]);
    }

    #[tokio::test]
    async fn empty_input_has_no_groups() {
        assert!(kmeans(&[], 3, 10).await.is_empty());
        let vs = vec![normalized(&[1.0, 0.0])];
        assert!(kmeans(&refs(&vs), 0, 10).await.is_empty());
    }

    #[tokio::test]
    async fn k_is_capped_by_input_size() {
        let vs = vec![normalized(&[1.0, 0.0]), normalized(&[0.0, 1.0])];
        let groups = kmeans(&refs(&vs), 5, 10).await;
        assert_eq!(groups, vec![vec![0], vec![1]]);
    }

    #[tokio::test]
    async fn identical_vectors_collapse_to_one_group() {
        let vs = vec![normalized(&[1.0, 1.0]); 4];
        let groups = kmeans(&refs(&vs), 2, 10).await;
        assert_eq!(groups, vec![vec![0, 1, 2, 3]]);
    }

    #[tokio::test]
    async fn repeated_runs_agree() {
        let vs: Vec<Vec<f32>> = (0..40)
            .map(|i| normalized(&[(i as f32 * 0.7).sin(), (i as f32 * 1.3).cos(), 0.2]))
            .collect();
        let first = kmeans(&refs(&vs), 4, 10).await;
        for _ in 0..3 {
            assert_eq!(kmeans(&refs(&vs), 4, 10).await, first);
        }
        let total: usize = first.iter().map(Vec::len).sum();
        assert_eq!(total, 40);
    }
}
