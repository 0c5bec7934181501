/// Dot product of two vectors.
///
/// For L2-normalized vectors this is their cosine similarity. Accumulates in
/// f64. Returns 0.0 on a dimension mismatch so mismatched vectors never link.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let sum: f64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| x as f64 * y as f64)
        .sum();
    sum.clamp(-1.0, 1.0) as f32
}

/// Cosine distance between two normalized vectors: `1 - dot(a, b)`.
///
/// Ranges over `[0, 2]`; 0 means identical direction.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    1.0 - dot(a, b)
}

/// Scale `v` to unit length in place. Zero vectors are left untouched.
pub fn normalize(v: &mut [f32]) {
    let norm = v.iter().map(|&x| x as f64 * x as f64).sum::<f64>().sqrt();
    if norm > 0.0 {
        let scale = (1.0 / norm) as f32;
        for x in v.iter_mut() {
            *x *= scale;
        }
    }
}

/// Return a unit-length copy of `v`.
pub fn normalized(v: &[f32]) -> Vec<f32> {
    let mut out = v.to_vec();
    normalize(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_unit_vectors() {
        let s = dot(&[1.0, 0.0, 0.0], &[1.0, 0.0, 0.0]);
        assert!((s - 1.0).abs() < 1e-6, "got {s}");
        assert!(cosine_distance(&[0.0, 1.0], &[0.0, 1.0]).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_and_opposite() {
        assert!(dot(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        let d = cosine_distance(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!((d - 2.0).abs() < 1e-6, "got {d}");
    }

    #[test]
    fn dimension_mismatch_is_unrelated() {
        assert_eq!(dot(&[1.0, 0.0], &[1.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn normalize_to_unit_length() {
        let v = normalized(&[3.0, 4.0]);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
        assert!((dot(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_zero_vector_is_noop() {
        let mut v = [0.0f32, 0.0];
        normalize(&mut v);
        assert_eq!(v, [0.0, 0.0]);
    }
}
