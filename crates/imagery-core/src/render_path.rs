//! Request-path parsing and generation
//!
//! A render request path is a virtual resource: the real storage path with
//! an optional modifier blob spliced in before the extension, e.g.
//! `gallery/photo.size:320x240_grayscale.jpg` maps to the storage object
//! `gallery/photo.jpg` with two modifiers. Parsing strips the blob back out
//! and yields the canonical storage path, which never contains modifier
//! tokens.

use crate::error::AppError;
use crate::modifiers::ModifierSet;

/// A parsed render request path.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPath {
    /// The raw request path as received
    pub request_path: String,
    /// Directory portion, empty for root-level files (no trailing slash)
    pub directory: String,
    /// Filename without modifier blob and extension
    pub base_filename: String,
    /// Extension (final dot segment), if any
    pub extension: Option<String>,
    /// The real object key on the blob store
    pub canonical_path: String,
    pub modifiers: ModifierSet,
}

impl RenderPath {
    /// Parse a request path, enforcing the traversal guard before anything
    /// else: empty paths, paths starting with `.` or `/`, and paths
    /// containing a `..` segment are rejected outright.
    pub fn parse(path: &str) -> Result<Self, AppError> {
        if path.is_empty() || path.starts_with('.') || path.starts_with('/') {
            return Err(AppError::InvalidPath(path.to_string()));
        }
        if path.split('/').any(|segment| segment == "..") {
            return Err(AppError::InvalidPath(path.to_string()));
        }

        let (directory, filename) = match path.rfind('/') {
            Some(idx) => (&path[..idx], &path[idx + 1..]),
            None => ("", path),
        };
        if filename.is_empty() {
            return Err(AppError::InvalidPath(path.to_string()));
        }

        let dir_prefix = if directory.is_empty() {
            String::new()
        } else {
            format!("{}/", directory)
        };

        // The true extension is the final dot segment. If the remaining stem
        // itself contains a dot, its last segment is the modifier blob.
        let Some(ext_idx) = filename.rfind('.') else {
            // No extension, no modifiers
            return Ok(RenderPath {
                request_path: path.to_string(),
                directory: directory.to_string(),
                base_filename: filename.to_string(),
                extension: None,
                canonical_path: path.to_string(),
                modifiers: ModifierSet::default(),
            });
        };
        let extension = &filename[ext_idx + 1..];
        let stem = &filename[..ext_idx];

        let (base_filename, modifiers) = match stem.rfind('.') {
            Some(blob_idx) => (
                &stem[..blob_idx],
                ModifierSet::parse_blob(&stem[blob_idx + 1..]),
            ),
            None => (stem, ModifierSet::default()),
        };

        Ok(RenderPath {
            request_path: path.to_string(),
            directory: directory.to_string(),
            base_filename: base_filename.to_string(),
            extension: Some(extension.to_string()),
            canonical_path: format!("{}{}.{}", dir_prefix, base_filename, extension),
            modifiers,
        })
    }

    /// Whether this request asks for a synthesized placeholder, given the
    /// configured marker filename.
    pub fn is_placeholder(&self, marker: &str) -> bool {
        self.base_filename == marker
    }

    /// Canonical cache identity: the canonical storage path plus the
    /// sorted modifier token string. Distinct URL orderings of the same
    /// modifier set collapse to the same key.
    pub fn cache_key(&self) -> String {
        match self.modifiers.to_token_string() {
            Some(tokens) => format!("{}!{}", self.canonical_path, tokens),
            None => self.canonical_path.clone(),
        }
    }
}

/// Build a render request path for a storage path and modifier set: the
/// canonical token string is spliced in before the extension. The inverse
/// of [`RenderPath::parse`].
pub fn build_request_path(storage_path: &str, modifiers: &ModifierSet) -> String {
    let Some(tokens) = modifiers.to_token_string() else {
        return storage_path.to_string();
    };
    match storage_path.rfind('.') {
        Some(idx) => format!(
            "{}.{}.{}",
            &storage_path[..idx],
            tokens,
            &storage_path[idx + 1..]
        ),
        None => storage_path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifiers::FitMode;

    #[test]
    fn test_plain_path_is_identity() {
        let parsed = RenderPath::parse("gallery/photo.jpg").unwrap();
        assert_eq!(parsed.canonical_path, "gallery/photo.jpg");
        assert_eq!(parsed.directory, "gallery");
        assert_eq!(parsed.base_filename, "photo");
        assert_eq!(parsed.extension.as_deref(), Some("jpg"));
        assert!(parsed.modifiers.is_empty());
    }

    #[test]
    fn test_root_level_path() {
        let parsed = RenderPath::parse("photo.png").unwrap();
        assert_eq!(parsed.canonical_path, "photo.png");
        assert_eq!(parsed.directory, "");
    }

    #[test]
    fn test_modifier_blob_stripped() {
        let parsed = RenderPath::parse("a/b/photo.size:320x240_fit:lim.jpg").unwrap();
        assert_eq!(parsed.canonical_path, "a/b/photo.jpg");
        assert_eq!(parsed.modifiers.size, Some((320, 240)));
        assert_eq!(parsed.modifiers.fit, Some(FitMode::Limit));
    }

    #[test]
    fn test_traversal_rejected() {
        for path in [
            "",
            "/etc/passwd",
            ".hidden.png",
            "../secret.png",
            "a/../../etc/passwd",
            "images/../../etc/passwd.size:10x10.png",
        ] {
            assert!(
                matches!(RenderPath::parse(path), Err(AppError::InvalidPath(_))),
                "expected rejection for {:?}",
                path
            );
        }
    }

    #[test]
    fn test_trailing_slash_rejected() {
        assert!(RenderPath::parse("gallery/").is_err());
    }

    #[test]
    fn test_no_extension() {
        let parsed = RenderPath::parse("gallery/photo").unwrap();
        assert_eq!(parsed.canonical_path, "gallery/photo");
        assert_eq!(parsed.extension, None);
        assert!(parsed.modifiers.is_empty());
    }

    #[test]
    fn test_placeholder_detection() {
        let parsed = RenderPath::parse("previews/_placeholder_.size:50x50.png").unwrap();
        assert!(parsed.is_placeholder("_placeholder_"));
        assert!(!parsed.is_placeholder("_other_"));

        let parsed = RenderPath::parse("previews/real.size:50x50.png").unwrap();
        assert!(!parsed.is_placeholder("_placeholder_"));
    }

    #[test]
    fn test_dotted_base_filename_loses_extra_segment() {
        // Known ambiguity: only the last pre-extension dot segment is
        // treated as the modifier blob, so a legitimately dotted filename
        // has its final segment parsed (and dropped) as modifiers.
        let parsed = RenderPath::parse("backup.2024/img.v2.png").unwrap();
        assert_eq!(parsed.canonical_path, "backup.2024/img.png");
        assert!(parsed.modifiers.is_empty());
    }

    #[test]
    fn test_build_request_path_round_trip() {
        let modifiers = ModifierSet::parse_blob("grayscale_size:100x100_quality:80");
        let request = build_request_path("gallery/photo.jpg", &modifiers);
        assert_eq!(
            request,
            "gallery/photo.grayscale_quality:80_size:100x100.jpg"
        );

        let parsed = RenderPath::parse(&request).unwrap();
        assert_eq!(parsed.canonical_path, "gallery/photo.jpg");
        assert_eq!(parsed.modifiers, modifiers);
    }

    #[test]
    fn test_build_request_path_empty_set() {
        let request = build_request_path("gallery/photo.jpg", &ModifierSet::default());
        assert_eq!(request, "gallery/photo.jpg");
    }

    #[test]
    fn test_cache_key_canonicalizes_order() {
        let a = RenderPath::parse("p/x.size:10x10_grayscale.png").unwrap();
        let b = RenderPath::parse("p/x.grayscale_size:10x10.png").unwrap();
        assert_eq!(a.cache_key(), b.cache_key());

        let plain = RenderPath::parse("p/x.png").unwrap();
        assert_ne!(a.cache_key(), plain.cache_key());
        assert_eq!(plain.cache_key(), "p/x.png");
    }
}
