pub mod config;
pub mod error;
pub mod types;

pub use config::ServiceConfig;
pub use error::{Error, Result};
pub use types::{
    Credential, ExtractedArticle, FeedItem, FeedPage, PaginationState, SyncReport,
};

use async_trait::async_trait;

/// Opaque article-retrieval capability: given a URL, produce the raw markup
/// and its extracted plain text, or fail.
///
/// `Error::Extraction` means the raw download succeeded but no text could be
/// recovered; callers may treat that as a per-URL skip. Every other error
/// means the bytes were never obtained and is fatal to the run.
#[async_trait]
pub trait ArticleExtractor: Send + Sync {
    async fn fetch_article(&self, url: &str) -> Result<ExtractedArticle>;
}
