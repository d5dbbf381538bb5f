//! Request path translation
//!
//! Turns an untrusted request path into a filesystem path confined to the
//! served root. Unsafe segments are filtered out rather than resolved, so
//! the result never leaves the root no matter what the client sends.

use super::encoding::{bytes_to_os, decode_tolerant};
use std::ffi::OsString;
use std::path::{self, Component, Path, PathBuf};

/// Filesystem path derived from a request, lexically inside the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    path: PathBuf,
    trailing_slash: bool,
}

impl ResolvedPath {
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// Whether the request path ended with `/`
    pub const fn has_trailing_slash(&self) -> bool {
        self.trailing_slash
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.path
    }
}

impl AsRef<Path> for ResolvedPath {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// Strategy for mapping request paths onto the filesystem
pub trait PathResolver: Send + Sync {
    fn resolve(&self, raw_path: &str) -> ResolvedPath;
}

/// Resolver bound to a fixed root directory
#[derive(Debug, Clone)]
pub struct RootResolver {
    root: PathBuf,
}

impl RootResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PathResolver for RootResolver {
    fn resolve(&self, raw_path: &str) -> ResolvedPath {
        resolve(raw_path, &self.root)
    }
}

/// Translate a raw request path (query and fragment allowed) into a path
/// under `root_dir`.
///
/// Segments are decoded one by one. A decoded segment that is `.`, `..` or
/// still contains a separator (`a%2Fb`) is skipped, never resolved.
///
/// # Examples
/// ```
/// use dirserve::handler::resolve::resolve;
/// use std::path::Path;
///
/// let resolved = resolve("/a/../../etc/passwd?x=1", Path::new("/srv"));
/// assert_eq!(resolved.as_path(), Path::new("/srv/a/etc/passwd"));
/// ```
pub fn resolve(raw_path: &str, root_dir: &Path) -> ResolvedPath {
    let path = strip_query(raw_path);
    let trailing_slash = path.trim_end().ends_with('/');

    let mut resolved = root_dir.to_path_buf();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        if let Some(name) = bare_name(decode_tolerant(segment)) {
            resolved.push(name);
        }
    }

    if trailing_slash {
        resolved = with_trailing_slash(resolved);
    }

    ResolvedPath {
        path: resolved,
        trailing_slash,
    }
}

/// Drop the query string, then the fragment
fn strip_query(raw_path: &str) -> &str {
    let path = raw_path.split_once('?').map_or(raw_path, |(p, _)| p);
    path.split_once('#').map_or(path, |(p, _)| p)
}

/// The decoded segment as a single normal path component, or `None` when
/// pushing it could leave the root.
///
/// `/` and `\` are separators and `C:`-style drive prefixes are refused on
/// every platform.
fn bare_name(segment: Vec<u8>) -> Option<OsString> {
    if segment.iter().any(|&b| b == b'/' || b == b'\\') || is_drive_prefix(&segment) {
        return None;
    }
    let name = bytes_to_os(segment);
    let mut components = Path::new(&name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Some(name),
        _ => None,
    }
}

fn is_drive_prefix(segment: &[u8]) -> bool {
    matches!(segment, [letter, b':', ..] if letter.is_ascii_alphabetic())
}

fn with_trailing_slash(path: PathBuf) -> PathBuf {
    let mut raw: OsString = path.into_os_string();
    let ends_with_separator = raw
        .to_string_lossy()
        .chars()
        .last()
        .is_some_and(path::is_separator);
    if !ends_with_separator {
        raw.push("/");
    }
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> PathBuf {
        PathBuf::from("/srv/www")
    }

    fn resolved(raw: &str) -> PathBuf {
        resolve(raw, &root()).into_path_buf()
    }

    #[test]
    fn test_simple_path() {
        assert_eq!(resolved("/docs/readme.txt"), root().join("docs/readme.txt"));
        assert_eq!(resolved("/"), PathBuf::from("/srv/www/"));
        assert_eq!(resolved(""), root());
    }

    #[test]
    fn test_query_and_fragment_stripped() {
        assert_eq!(resolved("/a/b.html?x=1&y=/../"), root().join("a/b.html"));
        assert_eq!(resolved("/a/b.html#top"), root().join("a/b.html"));
        assert_eq!(resolved("/a/b.html#frag?q"), root().join("a/b.html"));
    }

    #[test]
    fn test_parent_segments_dropped_not_resolved() {
        assert_eq!(resolved("/a/../../etc/passwd"), root().join("a/etc/passwd"));
        assert_eq!(resolved("/../../../"), PathBuf::from("/srv/www/"));
        assert_eq!(resolved("/%2E%2E/secret"), root().join("secret"));
    }

    #[test]
    fn test_dot_and_empty_segments_collapse() {
        assert_eq!(resolved("//a/./b//c"), root().join("a/b/c"));
    }

    #[test]
    fn test_encoded_separator_segment_dropped() {
        assert_eq!(resolved("/a%2Fb/c"), root().join("c"));
        assert_eq!(resolved("/x/%2F/y"), root().join("x/y"));
    }

    #[test]
    fn test_trailing_slash_preserved() {
        let with_slash = resolve("/foo/bar/", &root());
        assert!(with_slash.has_trailing_slash());
        assert!(with_slash.as_path().to_string_lossy().ends_with('/'));

        let without = resolve("/foo/bar", &root());
        assert!(!without.has_trailing_slash());
        assert!(!without.as_path().to_string_lossy().ends_with('/'));

        // trailing whitespace does not hide the slash
        assert!(resolve("/foo/ ", &root()).has_trailing_slash());
        assert!(resolve("/foo/\t", &root()).has_trailing_slash());
    }

    #[test]
    fn test_root_with_trailing_slash_not_doubled() {
        let r = resolve("/", Path::new("/srv/www/"));
        assert_eq!(r.as_path().as_os_str(), "/srv/www/");
    }

    #[test]
    fn test_malformed_escape_kept() {
        assert_eq!(resolved("/%zz"), root().join("%zz"));
        assert_eq!(resolved("/100%"), root().join("100%"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_segment_preserved() {
        use std::os::unix::ffi::OsStrExt;
        let path = resolved("/caf%E9");
        let name = path.file_name().unwrap();
        assert_eq!(name.as_bytes(), b"caf\xe9");
    }

    #[test]
    fn test_never_escapes_root() {
        let inputs = [
            "/../../../../etc/shadow",
            "/..%2F..%2Fetc/passwd",
            "/%2e%2e/%2e%2e/",
            "/a/b/../../../../c",
            "..",
            "/./.././",
            "//etc/passwd",
            "/%2Fetc%2Fpasswd",
            "/a\\..\\..\\b",
            "?/../..",
        ];
        for input in inputs {
            let path = resolved(input);
            assert!(path.starts_with(root()), "{input} escaped to {}", path.display());
            for component in path.strip_prefix(root()).unwrap().components() {
                assert!(
                    matches!(component, Component::Normal(_)),
                    "{input} produced {component:?}"
                );
            }
        }
    }

    #[test]
    fn test_foreign_separators_and_drive_prefixes_dropped() {
        assert_eq!(resolved("/C:/Windows/win.ini"), root().join("Windows/win.ini"));
        assert_eq!(resolved("/c%3A/boot.ini"), root().join("boot.ini"));
        assert_eq!(resolved("/%5C%5Cserver/share/x"), root().join("share/x"));
        assert_eq!(resolved("/a%5Cb/c"), root().join("c"));
        assert_eq!(resolved("/D:foo/bar"), root().join("bar"));
        // a colon later in the name is an ordinary file name
        assert_eq!(resolved("/notes:v2.txt"), root().join("notes:v2.txt"));
    }

    #[test]
    fn test_root_resolver_delegates() {
        let resolver = RootResolver::new("/data");
        assert_eq!(resolver.root(), Path::new("/data"));
        assert_eq!(
            resolver.resolve("/x/y?z").as_path(),
            Path::new("/data/x/y")
        );
    }
}
