use oa_core::{Credential, Error, FeedItem, FeedPage, Result, ServiceConfig};
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use tracing::warn;

/// Outcome of one listing-page request.
///
/// The listing endpoint answers 403 when it no longer accepts a credential,
/// even one that has not visibly expired; that case is surfaced separately
/// so the caller can refresh and retry the same page.
#[derive(Debug)]
pub enum PageOutcome {
    Page(FeedPage),
    AuthRejected,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Thing>,
    after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Thing {
    data: ThingData,
}

#[derive(Debug, Deserialize)]
struct ThingData {
    name: String,
    url: Option<String>,
}

/// Paginated reader for the community listing endpoint.
pub struct FeedClient {
    http: Client,
    config: ServiceConfig,
}

impl FeedClient {
    pub fn new(http: Client, config: ServiceConfig) -> Self {
        Self { http, config }
    }

    /// Fetches one page of the listing.
    ///
    /// `after` is the cursor from the previous page, absent on the first
    /// call; `count_seen` is the running total of items already seen, which
    /// the endpoint takes as pagination context.
    pub async fn fetch_page(
        &self,
        credential: &Credential,
        after: Option<&str>,
        count_seen: usize,
    ) -> Result<PageOutcome> {
        let mut query = vec![
            ("limit", self.config.page_limit.to_string()),
            ("count", count_seen.to_string()),
        ];
        if let Some(after) = after {
            query.push(("after", after.to_string()));
        }

        let response = self
            .http
            .get(&self.config.listing_url)
            .query(&query)
            .header(header::ACCEPT, "application/json")
            .header(header::ACCEPT_CHARSET, "UTF-8")
            .header(header::AUTHORIZATION, credential.authorization())
            .header(header::USER_AGENT, &self.config.user_agent)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            return Ok(PageOutcome::AuthRejected);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        let listing: Listing = response.json().await?;
        Ok(PageOutcome::Page(parse_page(listing)))
    }
}

/// Items are built only from children that carry a `url`; the rest are
/// logged and dropped.
fn parse_page(listing: Listing) -> FeedPage {
    let mut items = Vec::with_capacity(listing.data.children.len());
    for child in listing.data.children {
        match child.data.url {
            Some(url) => items.push(FeedItem {
                id: child.data.name,
                url,
            }),
            None => warn!("Thing named {:?} has no url attribute", child.data.name),
        }
    }
    FeedPage {
        items,
        after: listing.data.after,
    }
}
