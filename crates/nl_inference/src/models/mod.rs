use std::sync::Arc;

use clap::ValueEnum;
use nl_core::{Config, InferenceModel, Result};

pub mod dummy;
pub mod openai;

pub use dummy::DummyModel;
pub use openai::OpenAiModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ModelKind {
    /// OpenAI-compatible chat completions and embeddings
    #[default]
    Openai,
    /// Deterministic offline model, no network calls
    Dummy,
}

pub fn create_model(kind: ModelKind, config: &Config) -> Result<Arc<dyn InferenceModel>> {
    let model: Arc<dyn InferenceModel> = match kind {
        ModelKind::Openai => Arc::new(OpenAiModel::new(config)?),
        ModelKind::Dummy => Arc::new(DummyModel::new()),
    };
    tracing::info!("🧠 Inference model initialized (using {})", model.name());
    Ok(model)
}
