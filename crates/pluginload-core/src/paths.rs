use std::{env, path::PathBuf};

/// Process environment captured once at startup.
///
/// Resolver components take this struct instead of reading ambient
/// environment variables themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// User home directory, when the environment provides one.
    pub home: Option<String>,
    /// Directory containing the running extension's own files.
    pub install_dir: String,
}

impl Environment {
    /// Captures `USERPROFILE` (Windows) or `HOME` for the home directory and
    /// anchors the install directory at the given location.
    pub fn from_env(install_dir: impl Into<String>) -> Self {
        let home = env::var("USERPROFILE")
            .ok()
            .filter(|value| !value.is_empty())
            .or_else(|| env::var("HOME").ok().filter(|value| !value.is_empty()));

        Self {
            home,
            install_dir: install_dir.into(),
        }
    }
}

/// Resolves the preference file location from environment and defaults.
pub fn default_prefs_path() -> PathBuf {
    if let Some(override_path) = env::var_os("PLUGINLOAD_PREFS") {
        return PathBuf::from(override_path);
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".pluginload/prefs.json");
    }

    PathBuf::from(".pluginload/prefs.json")
}

/// Canonicalizes raw path strings into a platform-consistent form.
///
/// Works purely on the string: backslashes become forward slashes, `.` and
/// `..` segments are collapsed lexically, and relative inputs are anchored
/// under the base directory captured at construction. The filesystem is
/// never consulted, so normalizing a path says nothing about its existence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathNormalizer {
    base: String,
}

impl PathNormalizer {
    /// Creates a normalizer anchored at the given working context.
    ///
    /// The base should be an absolute directory; it is cleaned once here so
    /// every joined result comes out normalized.
    pub fn new(base: impl AsRef<str>) -> Self {
        Self {
            base: clean(base.as_ref()),
        }
    }

    /// Returns the normalized absolute form of `raw`.
    ///
    /// Idempotent: normalizing an already-normalized path returns it
    /// unchanged. An empty input yields the base itself.
    pub fn normalize(&self, raw: &str) -> String {
        let cleaned = clean(raw);
        if cleaned.is_empty() {
            return self.base.clone();
        }
        if is_anchored(&cleaned) {
            return cleaned;
        }
        clean(&format!("{}/{}", self.base, cleaned))
    }
}

/// True for paths that must not be re-anchored under a base directory.
///
/// Drive-letter prefixes count as anchored on every platform so a
/// preference written on Windows survives being read elsewhere.
fn is_anchored(path: &str) -> bool {
    path.starts_with('/') || has_drive_prefix(path)
}

fn has_drive_prefix(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Unifies separators and collapses dot segments without touching the root.
fn clean(raw: &str) -> String {
    let unified = raw.replace('\\', "/");
    let rooted = unified.starts_with('/');

    let mut kept: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => match kept.last() {
                // A leading run of `..` in a relative path has to survive.
                Some(&"..") => kept.push(".."),
                // `..` cannot climb above a drive root.
                Some(&last) if has_drive_prefix(last) && kept.len() == 1 => {}
                Some(_) => {
                    kept.pop();
                }
                None if rooted => {}
                None => kept.push(".."),
            },
            other => kept.push(other),
        }
    }

    let joined = kept.join("/");
    if rooted {
        format!("/{joined}")
    } else if kept.len() == 1 && has_drive_prefix(kept[0]) {
        // Bare drive prefix reads as a root, not a relative name.
        format!("{joined}/")
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::PathNormalizer;

    #[test]
    fn backslashes_become_forward_slashes() {
        let paths = PathNormalizer::new("/base");
        assert_eq!(paths.normalize("C:\\old\\path"), "C:/old/path");
    }

    #[test]
    fn relative_paths_join_the_base() {
        let paths = PathNormalizer::new("/base/dir");
        assert_eq!(paths.normalize("scripts/tool.rb"), "/base/dir/scripts/tool.rb");
        assert_eq!(paths.normalize("../other"), "/base/other");
    }

    #[test]
    fn dot_segments_collapse() {
        let paths = PathNormalizer::new("/base");
        assert_eq!(paths.normalize("/a/./b/../c"), "/a/c");
        assert_eq!(paths.normalize("/a//b///c/"), "/a/b/c");
    }

    #[test]
    fn dotdot_stops_at_roots() {
        let paths = PathNormalizer::new("/base");
        assert_eq!(paths.normalize("/../etc"), "/etc");
        assert_eq!(paths.normalize("C:/../tools"), "C:/tools");
        assert_eq!(paths.normalize("C:/"), "C:/");
    }

    #[test]
    fn empty_input_yields_the_base() {
        let paths = PathNormalizer::new("/base/dir/");
        assert_eq!(paths.normalize(""), "/base/dir");
    }

    #[test]
    fn normalize_is_idempotent() {
        let paths = PathNormalizer::new("/base");
        for raw in [
            "C:\\old\\path",
            "relative/one",
            "/abs/./x/../y/",
            "",
            "C:/",
            "\\\\share\\folder",
        ] {
            let once = paths.normalize(raw);
            assert_eq!(paths.normalize(&once), once, "input {raw:?}");
        }
    }
}
