use std::path::{PathBuf, MAIN_SEPARATOR};

use url::{Position, Url};

/// Maps a URL to a filesystem-safe relative path, deterministically.
///
/// Only the network location and path of the URL contribute; scheme, query
/// and fragment are dropped, so URLs differing only in those collide on the
/// same output path. Dots map to directory separators, which turns domain
/// labels and file extensions into nested directories. Both are deliberate:
/// the resulting layout is the archive's on-disk key and must stay stable.
pub fn url_path(url: &str) -> PathBuf {
    let stripped = authority_and_path(url);
    let mut mapped = String::with_capacity(stripped.len());
    for c in stripped.chars() {
        match c {
            ':' | '*' | '?' | '<' | '>' | '|' => mapped.push('-'),
            '/' | '\\' | '.' => mapped.push(MAIN_SEPARATOR),
            '"' => mapped.push('\''),
            '\0' => mapped.push('0'),
            _ => mapped.push(c),
        }
    }
    if mapped.ends_with(MAIN_SEPARATOR) {
        mapped.pop();
    }
    PathBuf::from(mapped)
}

/// Network location and path of `url`, concatenated.
///
/// Inputs the `url` crate cannot parse fall back to stripping any scheme
/// prefix and the first `?`/`#` suffix by hand, keeping the function total.
fn authority_and_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) if parsed.has_host() => {
            parsed[Position::BeforeUsername..Position::AfterPath].to_string()
        }
        _ => {
            let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
            match rest.find(|c| c == '?' || c == '#') {
                Some(idx) => rest[..idx].to_string(),
                None => rest.to_string(),
            }
        }
    }
}
