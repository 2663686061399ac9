pub mod composer;
pub mod models;
pub mod prompts;
pub mod selector;
pub mod summarizer;

pub use composer::NewsletterComposer;
pub use models::{create_model, DummyModel, ModelKind, OpenAiModel};
pub use selector::{parse_url_list, ArticleSelector};
pub use summarizer::Summarizer;

pub mod prelude {
    pub use super::models::{create_model, ModelKind};
    pub use super::{ArticleSelector, NewsletterComposer, Summarizer};
    pub use nl_core::{Error, InferenceModel, Result};
}
