use std::fmt;
use std::sync::Arc;

use nl_core::{InferenceModel, Result};

use crate::prompts;

pub struct NewsletterComposer {
    model: Arc<dyn InferenceModel>,
}

impl fmt::Debug for NewsletterComposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsletterComposer")
            .field("model", &self.model.name())
            .finish()
    }
}

impl NewsletterComposer {
    pub fn new(model: Arc<dyn InferenceModel>) -> Self {
        Self { model }
    }

    pub async fn compose(&self, digest: &str, topic: &str, tone_description: &str) -> Result<String> {
        let prompt = prompts::compose_newsletter(digest, topic, tone_description);
        self.model.generate(&prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nl_core::Tone;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct RecordingModel {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl InferenceModel for RecordingModel {
        fn name(&self) -> &str {
            "recording"
        }

        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("Hi All!\n...\n-AI Generated.".to_string())
        }

        async fn generate_embeddings(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_every_tone_description_is_injected_verbatim() {
        let model = Arc::new(RecordingModel::default());
        let composer = NewsletterComposer::new(model.clone());

        for tone in Tone::ALL {
            let text = composer
                .compose("the digest", "quantum computing", tone.description())
                .await
                .unwrap();
            assert!(!text.is_empty());
        }

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), Tone::ALL.len());
        for (prompt, tone) in prompts.iter().zip(Tone::ALL) {
            assert!(prompt.contains(&format!("write it in {} - no", tone.description())));
            assert!(prompt.starts_with("the digest\n"));
            assert!(prompt.contains("subscribers about quantum computing."));
        }
    }
}
