use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub mod backends;
pub mod index;

pub use backends::*;
pub use index::SimilarityIndex;

/// How closeness between two embeddings is measured. Results are always
/// ordered by ascending distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    #[default]
    Euclidean,
    Cosine,
}

impl DistanceMetric {
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            DistanceMetric::Euclidean => nl_core::euclidean_distance(a, b),
            DistanceMetric::Cosine => 1.0 - nl_core::cosine_similarity(a, b),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceMetric::Euclidean => f.write_str("euclidean"),
            DistanceMetric::Cosine => f.write_str("cosine"),
        }
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{DistanceMetric, SimilarityIndex};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_distance_orders_like_similarity() {
        let metric = DistanceMetric::Cosine;
        let near = metric.distance(&[1.0, 0.1], &[1.0, 0.0]);
        let far = metric.distance(&[0.0, 1.0], &[1.0, 0.0]);
        assert!(near < far);
    }
}
