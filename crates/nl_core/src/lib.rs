pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod options;
pub mod search;
pub mod storage;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use loader::DocumentLoader;
pub use models::{InferenceModel, ResponseSchema};
pub use options::{Genre, TimeUnit, TimeWindow, Tone};
pub use search::{SearchProvider, SearchRequest};
pub use storage::ChunkStorage;
pub use types::{
    ContentChunk, Document, NewsletterReport, NewsletterRequest, ScoredChunk, SearchHit,
};

/// Cosine similarity in `[-1, 1]`; zero when either vector has no magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}
