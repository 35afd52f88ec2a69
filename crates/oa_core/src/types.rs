use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bearer credential obtained from the token endpoint.
///
/// Never mutated in place; refreshing produces a replacement value.
#[derive(Debug, Clone)]
pub struct Credential {
    pub token_type: String,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Header value for an authenticated request, e.g. `bearer <token>`.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

/// One submission from a listing page that carries an outbound link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedItem {
    pub id: String,
    pub url: String,
}

/// A parsed listing page: the items carrying URLs and the pagination cursor.
#[derive(Debug, Clone)]
pub struct FeedPage {
    pub items: Vec<FeedItem>,
    pub after: Option<String>,
}

/// A downloaded article in both its raw and extracted forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedArticle {
    pub url: String,
    pub raw_html: String,
    pub text: String,
}

/// Progress through the paginated listing, threaded through the sync loop.
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Items seen so far, across all pages.
    pub count: usize,
    /// Cursor for the next page; `None` means the listing is exhausted.
    pub after: Option<String>,
}

/// Aggregate outcome of one full sync run.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub pages: usize,
    pub items_seen: usize,
    pub persisted: usize,
}
