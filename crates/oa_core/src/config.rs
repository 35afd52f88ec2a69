/// Endpoints and identity used by the auth and feed clients.
///
/// Passed in explicitly so tests can point the clients at a local server.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Registered application id, sent as the basic-auth username.
    pub client_id: String,
    pub user_agent: String,
    /// OAuth2 token endpoint.
    pub token_url: String,
    /// Community listing endpoint.
    pub listing_url: String,
    /// Items requested per page.
    pub page_limit: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            client_id: "_JNFnqor9ZT4mQ".to_string(),
            user_agent: format!(
                "{}:onion-archiver:{} (by /u/errantlinguist)",
                std::env::consts::OS,
                env!("CARGO_PKG_VERSION"),
            ),
            token_url: "https://www.reddit.com/api/v1/access_token".to_string(),
            listing_url: "https://oauth.reddit.com/r/nottheonion/.json".to_string(),
            page_limit: 100,
        }
    }
}
