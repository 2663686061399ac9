pub mod chunker;
pub mod loader;
pub mod logging;
pub mod manager;
pub mod search;

pub use chunker::TextChunker;
pub use loader::{extract_readable_text, UrlLoader};
pub use logging::{init_logging, Logger};
pub use manager::NewsletterManager;
pub use search::SerperClient;

pub mod prelude {
    pub use super::{init_logging, NewsletterManager, SerperClient, TextChunker, UrlLoader};
    pub use nl_core::{Error, NewsletterReport, NewsletterRequest, Result};
}
