use std::sync::Arc;

use nl_scrapers::NewsletterManager;

#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<NewsletterManager>,
}

impl AppState {
    pub fn new(manager: NewsletterManager) -> Self {
        Self {
            manager: Arc::new(manager),
        }
    }
}
