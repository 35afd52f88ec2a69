use std::path::{Path, PathBuf};

use oa_core::{ArticleExtractor, Error, Result};
use tracing::{info, warn};

use crate::codec;

/// Writes fetched articles under a root directory, two artifacts per URL:
/// the raw markup at the codec path and the extracted text beside it with a
/// `.txt` suffix. An existing raw-markup file means the URL is already
/// archived and is never re-downloaded or overwritten.
pub struct ArticleStore {
    root: PathBuf,
}

impl ArticleStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Output path for a URL's raw-markup artifact.
    pub fn article_path(&self, url: &str) -> PathBuf {
        self.root.join(codec::url_path(url))
    }

    /// Fetches and writes every URL not yet on disk, in the given order.
    /// Returns how many were actually persisted this run.
    ///
    /// A URL whose text could not be extracted from an otherwise successful
    /// download is left unpersisted for a later run; any other fetch error
    /// aborts the whole batch. Files already written stay valid either way.
    pub async fn persist_all(
        &self,
        extractor: &dyn ArticleExtractor,
        urls: &[String],
    ) -> Result<usize> {
        let mut persisted = 0;
        for url in urls {
            let path = self.article_path(url);
            if path.exists() {
                info!("File path {} already exists; skipping", path.display());
                continue;
            }

            let article = match extractor.fetch_article(url).await {
                Ok(article) => article,
                Err(Error::Extraction { url }) => {
                    warn!("Could not extract text from {}; leaving it for a later run", url);
                    continue;
                }
                Err(err) => return Err(err),
            };

            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&path, &article.raw_html).await?;
            tokio::fs::write(text_path(&path), &article.text).await?;
            info!("{} > {}", url, path.display());
            persisted += 1;
        }
        Ok(persisted)
    }
}

/// The raw path with `.txt` appended to its file name.
fn text_path(raw: &Path) -> PathBuf {
    let mut os = raw.as_os_str().to_os_string();
    os.push(".txt");
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use oa_core::ExtractedArticle;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingExtractor {
        calls: AtomicUsize,
    }

    impl CountingExtractor {
        fn new() -> Self {
            Self { calls: AtomicUsize::new(0) }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ArticleExtractor for CountingExtractor {
        async fn fetch_article(&self, url: &str) -> Result<ExtractedArticle> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ExtractedArticle {
                url: url.to_string(),
                raw_html: format!("<html><body>{url}</body></html>"),
                text: format!("text of {url}"),
            })
        }
    }

    struct FailingExtractor {
        error: fn(&str) -> Error,
    }

    #[async_trait]
    impl ArticleExtractor for FailingExtractor {
        async fn fetch_article(&self, url: &str) -> Result<ExtractedArticle> {
            Err((self.error)(url))
        }
    }

    fn urls(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|u| u.to_string()).collect()
    }

    #[tokio::test]
    async fn persists_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArticleStore::new(dir.path());
        let extractor = CountingExtractor::new();

        let persisted = store
            .persist_all(&extractor, &urls(&["http://example.com/a"]))
            .await
            .unwrap();
        assert_eq!(persisted, 1);

        let raw = store.article_path("http://example.com/a");
        assert!(raw.exists());
        let text = std::fs::read_to_string(text_path(&raw)).unwrap();
        assert_eq!(text, "text of http://example.com/a");
    }

    #[tokio::test]
    async fn second_run_downloads_nothing_and_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArticleStore::new(dir.path());
        let extractor = CountingExtractor::new();
        let batch = urls(&["http://example.com/a", "http://example.com/b"]);

        assert_eq!(store.persist_all(&extractor, &batch).await.unwrap(), 2);
        assert_eq!(extractor.calls(), 2);

        let raw = store.article_path("http://example.com/a");
        let before = std::fs::read_to_string(&raw).unwrap();

        assert_eq!(store.persist_all(&extractor, &batch).await.unwrap(), 0);
        assert_eq!(extractor.calls(), 2);
        assert_eq!(std::fs::read_to_string(&raw).unwrap(), before);
    }

    #[tokio::test]
    async fn extraction_failure_skips_the_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArticleStore::new(dir.path());
        let extractor = FailingExtractor {
            error: |url| Error::Extraction { url: url.to_string() },
        };

        let persisted = store
            .persist_all(&extractor, &urls(&["http://example.com/a"]))
            .await
            .unwrap();
        assert_eq!(persisted, 0);
        assert!(!store.article_path("http://example.com/a").exists());
    }

    #[tokio::test]
    async fn download_failure_aborts_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArticleStore::new(dir.path());
        let extractor = FailingExtractor {
            error: |_| Error::Api { status: 500, message: "server error".to_string() },
        };

        let result = store
            .persist_all(&extractor, &urls(&["http://example.com/a"]))
            .await;
        assert!(matches!(result, Err(Error::Api { status: 500, .. })));
    }
}
