//! Remote image resolution.
//!
//! Remote `![alt](https://...)` references are downloaded into the host's
//! media store under a stable name and rewritten to that name. The media
//! store doubles as the cache: a name that already exists is never fetched
//! again. Any failure keeps the remote URL so authoring still succeeds.

use crate::host::{ImageFetcher, MediaStore};
use sha2::{Digest, Sha256};

const MAX_NAME_LEN: usize = 50;
const DEFAULT_EXTENSION: &str = "jpg";
const MAX_EXTENSION_LEN: usize = 5;

/// Turns an image URL into the `src` that ends up in the note.
pub trait ResolveImage {
    fn resolve(&mut self, url: &str) -> String;
}

/// Leaves every URL as written. Used for dry runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeepRemote;

impl ResolveImage for KeepRemote {
    fn resolve(&mut self, url: &str) -> String {
        url.to_string()
    }
}

/// Downloads remote images into a media store.
pub struct ImageResolver<'a> {
    media: &'a mut dyn MediaStore,
    fetcher: &'a dyn ImageFetcher,
}

impl<'a> ImageResolver<'a> {
    pub fn new(media: &'a mut dyn MediaStore, fetcher: &'a dyn ImageFetcher) -> Self {
        Self { media, fetcher }
    }
}

impl ResolveImage for ImageResolver<'_> {
    fn resolve(&mut self, url: &str) -> String {
        if !is_remote(url) {
            return url.to_string();
        }

        let name = media_filename(url);
        match self.media.contains(&name) {
            Ok(true) => {
                tracing::debug!(%url, %name, "image already in media store");
                return name;
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(%url, error = %e, "media store lookup failed; keeping remote image");
                return url.to_string();
            }
        }

        let bytes = match self.fetcher.fetch(url) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(%url, error = %e, "image fetch failed; keeping remote image");
                return url.to_string();
            }
        };

        match self.media.write(&name, &bytes) {
            Ok(()) => {
                tracing::info!(%url, %name, size = bytes.len(), "stored remote image");
                name
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "media write failed; keeping remote image");
                url.to_string()
            }
        }
    }
}

/// Whether `url` points at another host.
pub fn is_remote(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("//")
}

/// The local media name for a remote image.
///
/// The URL's basename is kept when it is short and made of
/// `[A-Za-z0-9._-]`; otherwise the SHA-256 of the URL is used, with the
/// basename's extension if it looks like one and `.jpg` if not.
pub fn media_filename(url: &str) -> String {
    let basename = url_basename(url);
    if is_safe_name(basename) {
        return basename.to_string();
    }

    let digest = format!("{:x}", Sha256::digest(url.as_bytes()));
    let extension = extension_of(basename).unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    format!("{digest}.{extension}")
}

/// Last path segment of `url`, without query or fragment.
fn url_basename(url: &str) -> &str {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let without_scheme = without_scheme.strip_prefix("//").unwrap_or(without_scheme);
    let end = without_scheme
        .find(|c| c == '?' || c == '#')
        .unwrap_or(without_scheme.len());
    let path = match without_scheme[..end].split_once('/') {
        Some((_host, path)) => path,
        None => "",
    };
    path.rsplit('/').next().unwrap_or("")
}

fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

fn extension_of(basename: &str) -> Option<String> {
    let (stem, ext) = basename.rsplit_once('.')?;
    let sound = !stem.is_empty()
        && (1..=MAX_EXTENSION_LEN).contains(&ext.len())
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    sound.then(|| ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, HostError};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryMedia {
        files: HashMap<String, Vec<u8>>,
    }

    impl MediaStore for MemoryMedia {
        fn contains(&self, name: &str) -> Result<bool, HostError> {
            Ok(self.files.contains_key(name))
        }

        fn write(&mut self, name: &str, bytes: &[u8]) -> Result<(), HostError> {
            self.files.insert(name.to_string(), bytes.to_vec());
            Ok(())
        }
    }

    struct CountingFetcher {
        calls: Cell<usize>,
        fail: bool,
    }

    impl CountingFetcher {
        fn new(fail: bool) -> Self {
            Self {
                calls: Cell::new(0),
                fail,
            }
        }
    }

    impl ImageFetcher for CountingFetcher {
        fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                Err(FetchError::Request("unreachable".into()))
            } else {
                Ok(vec![0xff, 0xd8])
            }
        }
    }

    #[test]
    fn keeps_simple_basename() {
        assert_eq!(media_filename("https://example.com/img/cat-1.png?size=2"), "cat-1.png");
    }

    #[test]
    fn hashes_unsafe_basename_and_keeps_extension() {
        let name = media_filename("https://example.com/a%20cat.PNG");
        assert_eq!(name.len(), 64 + ".png".len());
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn hashes_long_basename() {
        let long = format!("https://example.com/{}.gif", "a".repeat(60));
        let name = media_filename(&long);
        assert!(name.ends_with(".gif"));
        assert_eq!(name.len(), 68);
    }

    #[test]
    fn empty_basename_defaults_to_jpg() {
        let name = media_filename("https://example.com/");
        assert!(name.ends_with(".jpg"));
        assert_eq!(name, media_filename("https://example.com/"));
    }

    #[test]
    fn odd_extension_defaults_to_jpg() {
        let name = media_filename("https://example.com/photo.jpeg~backup~");
        assert!(name.ends_with(".jpg"));
    }

    #[test]
    fn basename_ignores_fragment_and_host() {
        assert_eq!(url_basename("https://example.com#x"), "");
        assert_eq!(url_basename("//cdn.example.com/a/b.webp"), "b.webp");
    }

    #[test]
    fn local_urls_pass_through() {
        let mut media = MemoryMedia::default();
        let fetcher = CountingFetcher::new(false);
        let mut resolver = ImageResolver::new(&mut media, &fetcher);
        assert_eq!(resolver.resolve("local.png"), "local.png");
        assert_eq!(fetcher.calls.get(), 0);
    }

    #[test]
    fn fetches_once_then_reuses_media() {
        let mut media = MemoryMedia::default();
        let fetcher = CountingFetcher::new(false);
        {
            let mut resolver = ImageResolver::new(&mut media, &fetcher);
            assert_eq!(resolver.resolve("https://example.com/dog.jpg"), "dog.jpg");
            assert_eq!(resolver.resolve("https://example.com/dog.jpg"), "dog.jpg");
        }
        assert_eq!(fetcher.calls.get(), 1);
        assert!(media.files.contains_key("dog.jpg"));
    }

    #[test]
    fn failed_fetch_keeps_remote_url() {
        let mut media = MemoryMedia::default();
        let fetcher = CountingFetcher::new(true);
        let mut resolver = ImageResolver::new(&mut media, &fetcher);
        let url = "https://invalid.invalid/i.jpg";
        assert_eq!(resolver.resolve(url), url);
        assert!(media.files.is_empty());
    }
}
