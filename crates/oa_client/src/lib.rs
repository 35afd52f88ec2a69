pub mod auth;
pub mod extract;
pub mod feed;
pub mod manager;

pub use auth::AuthClient;
pub use extract::HtmlExtractor;
pub use feed::{FeedClient, PageOutcome};
pub use manager::SyncManager;

pub mod prelude {
    pub use super::manager::SyncManager;
    pub use oa_core::{Error, Result, ServiceConfig, SyncReport};
}
