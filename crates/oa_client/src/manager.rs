use std::collections::HashSet;
use std::path::PathBuf;

use chrono::Utc;
use oa_archive::ArticleStore;
use oa_core::{
    ArticleExtractor, Credential, Error, FeedPage, PaginationState, Result, ServiceConfig,
    SyncReport,
};
use reqwest::Client;
use tracing::info;

use crate::auth::AuthClient;
use crate::extract::HtmlExtractor;
use crate::feed::{FeedClient, PageOutcome};

/// Drives the page-by-page sync: authenticate, walk the listing, persist
/// each page's articles, stop when the cursor runs out.
///
/// Everything is sequential; the only shared resource is the output
/// directory, and files already written survive a fatal abort, so rerunning
/// resumes where the last run stopped.
pub struct SyncManager {
    auth: AuthClient,
    feed: FeedClient,
    store: ArticleStore,
    extractor: Box<dyn ArticleExtractor>,
}

impl SyncManager {
    pub fn new(
        config: ServiceConfig,
        secret: impl Into<String>,
        outdir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let http = Client::builder().build()?;
        let extractor = Box::new(HtmlExtractor::new(http.clone(), config.user_agent.clone()));
        Ok(Self::with_extractor(http, config, secret, outdir, extractor))
    }

    /// Same wiring with the article-retrieval capability swapped out.
    pub fn with_extractor(
        http: Client,
        config: ServiceConfig,
        secret: impl Into<String>,
        outdir: impl Into<PathBuf>,
        extractor: Box<dyn ArticleExtractor>,
    ) -> Self {
        Self {
            auth: AuthClient::new(http.clone(), config.clone(), secret),
            feed: FeedClient::new(http, config),
            store: ArticleStore::new(outdir),
            extractor,
        }
    }

    pub fn store(&self) -> &ArticleStore {
        &self.store
    }

    pub async fn run(&self) -> Result<SyncReport> {
        let mut credential = self.auth.acquire().await?;
        let mut state = PaginationState::default();
        let mut report = SyncReport::default();

        loop {
            if credential.is_expired(Utc::now()) {
                info!("Refreshing expired authentication token");
                credential = self.auth.refresh(&credential).await?;
            }

            let page = self.fetch_page_refreshing(&mut credential, &state).await?;
            report.pages += 1;

            let batch = url_batch(&page);
            info!("Retrieving {} articles", batch.len());
            report.persisted += self
                .store
                .persist_all(self.extractor.as_ref(), &batch)
                .await?;

            state = PaginationState {
                count: state.count + page.items.len(),
                after: page.after,
            };
            if state.after.is_none() {
                break;
            }
        }

        report.items_seen = state.count;
        Ok(report)
    }

    /// Fetches one page, refreshing the credential and retrying that same
    /// page once if the listing endpoint rejects it mid-lifetime. A second
    /// rejection right after a refresh is fatal.
    async fn fetch_page_refreshing(
        &self,
        credential: &mut Credential,
        state: &PaginationState,
    ) -> Result<FeedPage> {
        let outcome = self
            .feed
            .fetch_page(credential, state.after.as_deref(), state.count)
            .await?;
        match outcome {
            PageOutcome::Page(page) => Ok(page),
            PageOutcome::AuthRejected => {
                info!("Listing endpoint rejected the credential; refreshing");
                *credential = self.auth.refresh(credential).await?;
                let retried = self
                    .feed
                    .fetch_page(credential, state.after.as_deref(), state.count)
                    .await?;
                match retried {
                    PageOutcome::Page(page) => Ok(page),
                    PageOutcome::AuthRejected => Err(Error::Auth(
                        "listing endpoint rejected a freshly refreshed credential".to_string(),
                    )),
                }
            }
        }
    }
}

/// URL batch for one page, first-URL-wins across duplicate items.
fn url_batch(page: &FeedPage) -> Vec<String> {
    let mut seen = HashSet::new();
    page.items
        .iter()
        .filter(|item| seen.insert(item.url.as_str()))
        .map(|item| item.url.clone())
        .collect()
}
