//! Symbolic path markers such as `$documents/notes`.
//!
//! Only the first matching marker is expanded, in declaration order, and only
//! when the path starts with it.

use std::path::{Path, PathBuf};

/// Built-in tokens paired with the home-relative folder they stand for.
const BUILTIN_MARKERS: &[(&str, &str)] = &[
    ("$users", ""),
    ("$desktop", "Desktop"),
    ("$downloads", "Downloads"),
    ("$documents", "Documents"),
    ("$videos", "Videos"),
    ("$pictures", "Pictures"),
];

#[derive(Debug, Clone)]
pub struct MarkerResolver {
    markers: Vec<(String, PathBuf)>,
}

impl MarkerResolver {
    /// Markers rooted at an explicit home directory.
    pub fn new(home: &Path) -> Self {
        let markers = BUILTIN_MARKERS
            .iter()
            .map(|(token, sub)| {
                let path = if sub.is_empty() {
                    home.to_path_buf()
                } else {
                    home.join(sub)
                };
                (token.to_string(), path)
            })
            .collect();
        Self { markers }
    }

    /// Markers pointing at the current user's folders.
    ///
    /// Uses the platform's well-known folder locations where they exist.
    pub fn from_system() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let mut resolver = Self::new(&home);
        for (token, path) in resolver.markers.iter_mut() {
            let known = match token.as_str() {
                "$desktop" => dirs::desktop_dir(),
                "$downloads" => dirs::download_dir(),
                "$documents" => dirs::document_dir(),
                "$videos" => dirs::video_dir(),
                "$pictures" => dirs::picture_dir(),
                _ => None,
            };
            if let Some(known) = known {
                *path = known;
            }
        }
        resolver
    }

    /// Append a marker after the existing ones.
    pub fn with_marker(mut self, token: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.markers.push((token.into(), path.into()));
        self
    }

    pub fn markers(&self) -> &[(String, PathBuf)] {
        &self.markers
    }

    /// Expand the leading marker of `path`, if any.
    pub fn resolve(&self, path: &str) -> String {
        for (token, real) in &self.markers {
            if let Some(rest) = path.strip_prefix(token.as_str()) {
                return format!("{}{}", real.to_string_lossy(), rest);
            }
        }
        path.to_string()
    }

    pub fn resolve_path(&self, path: &str) -> PathBuf {
        PathBuf::from(self.resolve(path))
    }
}

impl Default for MarkerResolver {
    fn default() -> Self {
        Self::from_system()
    }
}
