//! Media URL normalization.
//!
//! Stored `file_url` values are paths relative to the media root, but values
//! that flowed through earlier pipeline stages or external imports may carry
//! a leading slash, the public media segment, or already be absolute. The
//! resolver normalizes all of those into one canonical form against an
//! explicit [`MediaConfig`] — there is no process-wide environment read
//! inside the engine.

use std::collections::HashMap;

use crate::assembly_engine::models::Exercise;

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Environment-level media configuration, supplied by the embedding
/// application.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Public base under which media files are served. Either an absolute
    /// URL (`https://cdn.example.com/media`) or a bare path (`/media`).
    pub public_base: String,
}

impl MediaConfig {
    pub fn new(public_base: impl Into<String>) -> Self {
        MediaConfig { public_base: public_base.into() }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        MediaConfig::new("/media")
    }
}

/// [`MediaConfig`] bound to one request's optional external base address.
///
/// The external base is only consulted when the configured public base is a
/// bare path; it upgrades the result to an absolute URL.
#[derive(Debug, Clone, Copy)]
pub struct MediaResolver<'a> {
    config: &'a MediaConfig,
    external_base: Option<&'a str>,
}

impl<'a> MediaResolver<'a> {
    pub fn new(config: &'a MediaConfig, external_base: Option<&'a str>) -> Self {
        MediaResolver { config, external_base }
    }

    /// Normalize one stored URL value.
    ///
    /// Already-absolute values pass through untouched. Everything else is
    /// stripped of a leading slash and a redundant media-root segment, then
    /// prefixed with the public base (joined onto the external base when the
    /// public base is a bare path).
    pub fn resolve(&self, raw: &str) -> String {
        if is_absolute(raw) {
            return raw.to_string();
        }

        let mut rel = raw.trim_start_matches('/');
        let base = self.config.public_base.trim_end_matches('/');
        let root_segment = base.rsplit('/').next().unwrap_or("");
        if !root_segment.is_empty() {
            if let Some(rest) = rel
                .strip_prefix(root_segment)
                .and_then(|rest| rest.strip_prefix('/'))
            {
                rel = rest;
            }
        }

        if is_absolute(base) {
            return format!("{base}/{rel}");
        }
        // Empty path segments are skipped so an empty public base never
        // produces doubled slashes.
        let base_path = base.trim_start_matches('/');
        match self.external_base {
            Some(external) => {
                let external = external.trim_end_matches('/');
                if base_path.is_empty() {
                    format!("{external}/{rel}")
                } else {
                    format!("{external}/{base_path}/{rel}")
                }
            }
            None if base_path.is_empty() => format!("/{rel}"),
            None => format!("/{base_path}/{rel}"),
        }
    }

    /// Like [`resolve`](Self::resolve) but passing `None` through.
    pub fn resolve_opt(&self, raw: Option<&str>) -> Option<String> {
        raw.map(|value| self.resolve(value))
    }

    /// usage_role → resolved URL for every media link on `exercise`.
    pub fn role_urls(&self, exercise: &Exercise) -> HashMap<String, String> {
        exercise
            .media_links
            .iter()
            .map(|link| (link.usage_role.clone(), self.resolve(&link.asset.file_url)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver<'a>(config: &'a MediaConfig, external: Option<&'a str>) -> MediaResolver<'a> {
        MediaResolver::new(config, external)
    }

    #[test]
    fn absolute_values_pass_through() {
        let config = MediaConfig::new("/media");
        let r = resolver(&config, Some("https://api.example.com"));
        assert_eq!(
            r.resolve("https://cdn.other.com/a.mp3"),
            "https://cdn.other.com/a.mp3"
        );
    }

    #[test]
    fn bare_relative_path_gets_public_base() {
        let config = MediaConfig::new("/media");
        let r = resolver(&config, None);
        assert_eq!(r.resolve("audio/ni_hao.mp3"), "/media/audio/ni_hao.mp3");
    }

    #[test]
    fn leading_slash_and_media_segment_are_stripped() {
        let config = MediaConfig::new("/media");
        let r = resolver(&config, None);
        // A value written by an earlier stage already carries the segment.
        assert_eq!(r.resolve("/media/img/cat.png"), "/media/img/cat.png");
        assert_eq!(r.resolve("/img/cat.png"), "/media/img/cat.png");
    }

    #[test]
    fn media_prefix_only_strips_whole_segments() {
        let config = MediaConfig::new("/media");
        let r = resolver(&config, None);
        // "media.mp3" is a filename, not the media segment.
        assert_eq!(r.resolve("media.mp3"), "/media/media.mp3");
    }

    #[test]
    fn empty_public_base_joins_without_doubled_slashes() {
        let config = MediaConfig::new("");
        assert_eq!(
            resolver(&config, None).resolve("audio/a.mp3"),
            "/audio/a.mp3"
        );
        assert_eq!(
            resolver(&config, Some("https://api.example.com/")).resolve("/audio/a.mp3"),
            "https://api.example.com/audio/a.mp3"
        );
    }

    #[test]
    fn path_base_joins_external_base() {
        let config = MediaConfig::new("/media");
        let r = resolver(&config, Some("https://api.example.com/"));
        assert_eq!(
            r.resolve("audio/a.mp3"),
            "https://api.example.com/media/audio/a.mp3"
        );
    }

    #[test]
    fn absolute_public_base_ignores_external_base() {
        let config = MediaConfig::new("https://cdn.example.com/media/");
        let r = resolver(&config, Some("https://api.example.com"));
        assert_eq!(
            r.resolve("/media/audio/a.mp3"),
            "https://cdn.example.com/media/audio/a.mp3"
        );
    }
}
