//! Random Query Vectors
//!
//! Deterministic query generation for benchmarking without a dataset:
//! unit-normalized gaussian vectors from a seeded stream cipher RNG, so
//! the same seed reproduces the same workload run to run.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;

/// Generate `count` unit-normalized random vectors of length `dim`.
pub fn random_vectors(count: usize, dim: usize, seed: u64) -> Vec<Vec<f32>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    // Mean 0, stddev 1 are always valid parameters.
    let normal = Normal::new(0.0f32, 1.0).expect("unit normal distribution");

    (0..count)
        .map(|_| {
            let v: Vec<f32> = (0..dim).map(|_| rng.sample(normal)).collect();
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm > 0.0 {
                v.iter().map(|x| x / norm).collect()
            } else {
                v
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape() {
        let vectors = random_vectors(10, 25, 42);
        assert_eq!(vectors.len(), 10);
        assert!(vectors.iter().all(|v| v.len() == 25));
    }

    #[test]
    fn test_deterministic_per_seed() {
        assert_eq!(random_vectors(3, 8, 7), random_vectors(3, 8, 7));
        assert_ne!(random_vectors(3, 8, 7), random_vectors(3, 8, 8));
    }

    #[test]
    fn test_unit_norm() {
        for v in random_vectors(5, 16, 1) {
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5);
        }
    }
}
