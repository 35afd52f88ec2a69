use async_trait::async_trait;
use oa_core::{ArticleExtractor, Error, ExtractedArticle, Result};
use reqwest::{header, Client};
use scraper::{Html, Selector};

/// Downloads a page and strips its readable text with CSS selectors.
pub struct HtmlExtractor {
    http: Client,
    user_agent: String,
}

impl HtmlExtractor {
    pub fn new(http: Client, user_agent: impl Into<String>) -> Self {
        Self {
            http,
            user_agent: user_agent.into(),
        }
    }
}

#[async_trait]
impl ArticleExtractor for HtmlExtractor {
    async fn fetch_article(&self, url: &str) -> Result<ExtractedArticle> {
        let response = self
            .http
            .get(url)
            .header(header::USER_AGENT, &self.user_agent)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: format!("article download failed for {url}"),
            });
        }
        let raw_html = response.text().await?;

        let text = extract_text(&raw_html);
        if text.trim().is_empty() {
            return Err(Error::Extraction {
                url: url.to_string(),
            });
        }

        Ok(ExtractedArticle {
            url: url.to_string(),
            raw_html,
            text,
        })
    }
}

/// Heading and paragraph text, blank-line separated.
fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let selector = Selector::parse("h1, h2, h3, p").unwrap();
    document
        .select(&selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ARTICLE_HTML: &str = r#"
        <html><body>
            <h1>Local Man Surprised</h1>
            <script>var tracking = true;</script>
            <p>First paragraph.</p>
            <p>Second paragraph.</p>
        </body></html>
    "#;

    #[test]
    fn extract_text_keeps_headings_and_paragraphs_only() {
        let text = extract_text(ARTICLE_HTML);
        assert_eq!(
            text,
            "Local Man Surprised\n\nFirst paragraph.\n\nSecond paragraph."
        );
    }

    #[test]
    fn extract_text_of_contentless_markup_is_empty() {
        assert!(extract_text("<html><body><div>nav</div></body></html>").is_empty());
        assert!(extract_text("").is_empty());
    }

    fn extractor() -> HtmlExtractor {
        HtmlExtractor::new(Client::new(), "test-agent")
    }

    #[tokio::test]
    async fn fetch_article_returns_raw_and_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/story"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE_HTML))
            .mount(&server)
            .await;

        let url = format!("{}/story", server.uri());
        let article = extractor().fetch_article(&url).await.unwrap();
        assert_eq!(article.url, url);
        assert!(article.raw_html.contains("<h1>Local Man Surprised</h1>"));
        assert!(article.text.starts_with("Local Man Surprised"));
    }

    #[tokio::test]
    async fn contentless_page_is_an_extraction_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/empty"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let url = format!("{}/empty", server.uri());
        let result = extractor().fetch_article(&url).await;
        assert!(matches!(result, Err(Error::Extraction { .. })));
    }

    #[tokio::test]
    async fn failed_download_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = format!("{}/gone", server.uri());
        let result = extractor().fetch_article(&url).await;
        assert!(matches!(result, Err(Error::Api { status: 404, .. })));
    }
}
