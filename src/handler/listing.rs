//! Directory listing pages
//!
//! Renders the contents of a directory that has no index file. The page is
//! built directly as bytes so file names that are not valid UTF-8 reach the
//! client exactly as they are stored on disk.

use super::encoding::{decode_tolerant, encode_tolerant, escape_html, os_to_bytes, PAGE_CHARSET};
use hyper::StatusCode;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

/// One entry of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: OsString,
    pub is_directory: bool,
    pub is_symlink: bool,
}

impl DirectoryEntry {
    /// Classify `name` by looking at the real entry under `dir`.
    ///
    /// `is_directory` follows symlinks, `is_symlink` does not.
    pub fn probe(dir: &Path, name: OsString) -> Self {
        let full = dir.join(&name);
        let is_directory = fs::metadata(&full).is_ok_and(|m| m.is_dir());
        let is_symlink = fs::symlink_metadata(&full).is_ok_and(|m| m.file_type().is_symlink());
        Self {
            name,
            is_directory,
            is_symlink,
        }
    }

    /// Percent-encoded href target, `/`-suffixed for directories
    pub fn href(&self) -> String {
        let mut href = encode_tolerant(&os_to_bytes(&self.name)).into_owned();
        if self.is_directory {
            href.push('/');
        }
        href
    }

    /// Visible name: `@` marks a symlink, otherwise `/` marks a directory
    pub fn display_name(&self) -> Vec<u8> {
        let mut display = os_to_bytes(&self.name).into_owned();
        if self.is_symlink {
            display.push(b'@');
        } else if self.is_directory {
            display.push(b'/');
        }
        display
    }
}

/// A rendered listing page
#[derive(Debug, Clone)]
pub struct Listing {
    body: Vec<u8>,
}

impl Listing {
    pub const fn status(&self) -> StatusCode {
        StatusCode::OK
    }

    pub fn content_type(&self) -> String {
        format!("text/html; charset={PAGE_CHARSET}")
    }

    pub fn content_length(&self) -> usize {
        self.body.len()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

/// Strategy for rendering directories without an index file
pub trait DirectoryLister: Send + Sync {
    /// `None` means the directory could not be read and should be
    /// answered as not found.
    fn list(&self, dir: &Path, request_path: &str) -> Option<Listing>;
}

/// Default lister producing a plain HTML page
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLister;

impl DirectoryLister for HtmlLister {
    fn list(&self, dir: &Path, request_path: &str) -> Option<Listing> {
        list_directory(dir, request_path)
    }
}

/// Render `dir_path` as a listing titled after `request_path`.
///
/// Returns `None` when the directory cannot be read, whatever the cause.
pub fn list_directory(dir_path: &Path, request_path: &str) -> Option<Listing> {
    let entries = read_entries(dir_path).ok()?;
    Some(Listing {
        body: render_page(&entries, request_path),
    })
}

/// Read and classify the entries of `dir`, sorted case-insensitively.
pub fn read_entries(dir: &Path) -> io::Result<Vec<DirectoryEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        entries.push(DirectoryEntry::probe(dir, entry?.file_name()));
    }
    entries.sort_by_cached_key(|entry| {
        let raw = os_to_bytes(&entry.name).into_owned();
        (String::from_utf8_lossy(&raw).to_lowercase(), raw)
    });
    Ok(entries)
}

fn render_page(entries: &[DirectoryEntry], request_path: &str) -> Vec<u8> {
    let display_path = escape_html(&decode_tolerant(request_path));
    let mut title = b"Directory listing for ".to_vec();
    title.extend_from_slice(&display_path);

    let mut lines: Vec<Vec<u8>> = vec![
        b"<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \
          \"http://www.w3.org/TR/html4/strict.dtd\">"
            .to_vec(),
        b"<html>\n<head>".to_vec(),
        format!("<meta http-equiv=\"Content-Type\" content=\"text/html; charset={PAGE_CHARSET}\">")
            .into_bytes(),
        wrap(b"<title>", &title, b"</title>\n</head>"),
        wrap(b"<body>\n<h1>", &title, b"</h1>"),
        b"<hr>\n<ul>".to_vec(),
    ];

    for entry in entries {
        let mut item = format!("<li><a href=\"{}\">", entry.href()).into_bytes();
        item.extend_from_slice(&escape_html(&entry.display_name()));
        item.extend_from_slice(b"</a></li>");
        lines.push(item);
    }

    lines.push(b"</ul>\n<hr>\n</body>\n</html>\n".to_vec());
    lines.join(&b'\n')
}

fn wrap(open: &[u8], inner: &[u8], close: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(open.len() + inner.len() + close.len());
    out.extend_from_slice(open);
    out.extend_from_slice(inner);
    out.extend_from_slice(close);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    fn position(haystack: &[u8], needle: &[u8]) -> usize {
        haystack
            .windows(needle.len())
            .position(|w| w == needle)
            .unwrap_or_else(|| panic!("{} not found", String::from_utf8_lossy(needle)))
    }

    #[test]
    fn test_sorted_case_insensitively_with_directory_suffix() {
        let tmp = TempDir::new().unwrap();
        File::create(tmp.path().join("B.txt")).unwrap();
        File::create(tmp.path().join("a.txt")).unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();

        let names: Vec<_> = read_entries(tmp.path())
            .unwrap()
            .into_iter()
            .map(|e| e.name.to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.txt", "B.txt", "sub"]);

        let listing = list_directory(tmp.path(), "/files/").unwrap();
        let body = listing.body();
        assert!(contains(body, b"<li><a href=\"a.txt\">a.txt</a></li>"));
        assert!(contains(body, b"<li><a href=\"B.txt\">B.txt</a></li>"));
        assert!(contains(body, b"<li><a href=\"sub/\">sub/</a></li>"));
        assert!(position(body, b">a.txt<") < position(body, b">B.txt<"));
        assert!(position(body, b">B.txt<") < position(body, b">sub/<"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_to_directory() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("target")).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("target"), tmp.path().join("link")).unwrap();
        File::create(tmp.path().join("plain")).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("plain"), tmp.path().join("filelink")).unwrap();

        let entry = DirectoryEntry::probe(tmp.path(), "link".into());
        assert!(entry.is_directory);
        assert!(entry.is_symlink);
        assert_eq!(entry.href(), "link/");
        assert_eq!(entry.display_name(), b"link@");

        let body = list_directory(tmp.path(), "/").unwrap().into_body();
        assert!(contains(&body, b"<li><a href=\"link/\">link@</a></li>"));
        assert!(contains(&body, b"<li><a href=\"filelink\">filelink@</a></li>"));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_listed() {
        let tmp = TempDir::new().unwrap();
        std::os::unix::fs::symlink(tmp.path().join("missing"), tmp.path().join("broken")).unwrap();

        let body = list_directory(tmp.path(), "/").unwrap().into_body();
        assert!(contains(&body, b"<li><a href=\"broken\">broken@</a></li>"));
    }

    #[test]
    fn test_unreadable_directory_is_not_found() {
        let tmp = TempDir::new().unwrap();
        assert!(list_directory(&tmp.path().join("nope"), "/nope/").is_none());

        let file = tmp.path().join("file.txt");
        File::create(&file).unwrap();
        assert!(list_directory(&file, "/file.txt/").is_none());
    }

    #[test]
    fn test_page_skeleton_and_headers() {
        let tmp = TempDir::new().unwrap();
        let listing = list_directory(tmp.path(), "/docs/").unwrap();
        let body = String::from_utf8(listing.body().to_vec()).unwrap();

        assert!(body.starts_with("<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \"http://www.w3.org/TR/html4/strict.dtd\">\n<html>\n<head>\n"));
        assert!(body.contains("<meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\">"));
        assert!(body.contains("<title>Directory listing for /docs/</title>"));
        assert!(body.contains("<h1>Directory listing for /docs/</h1>"));
        assert!(body.ends_with("<hr>\n<ul>\n</ul>\n<hr>\n</body>\n</html>\n"));

        assert_eq!(listing.status(), StatusCode::OK);
        assert_eq!(listing.content_type(), "text/html; charset=utf-8");
        assert_eq!(listing.content_length(), body.len());
    }

    #[test]
    fn test_request_path_decoded_and_escaped() {
        let tmp = TempDir::new().unwrap();
        let listing = list_directory(tmp.path(), "/a%20b/<x>&\"q\"/").unwrap();
        let body = listing.body();
        assert!(contains(
            body,
            b"<title>Directory listing for /a b/&lt;x&gt;&amp;&quot;q&quot;/</title>"
        ));
    }

    #[test]
    fn test_markup_in_names_escaped() {
        let tmp = TempDir::new().unwrap();
        File::create(tmp.path().join("a&b <c>.txt")).unwrap();

        let body = list_directory(tmp.path(), "/").unwrap().into_body();
        assert!(contains(
            &body,
            b"<li><a href=\"a%26b%20%3Cc%3E.txt\">a&amp;b &lt;c&gt;.txt</a></li>"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_name_preserved() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = TempDir::new().unwrap();
        let raw: &[u8] = b"caf\xe9.txt";
        // some filesystems refuse non UTF-8 names
        if File::create(tmp.path().join(OsStr::from_bytes(raw))).is_err() {
            return;
        }

        let body = list_directory(tmp.path(), "/").unwrap().into_body();
        assert!(contains(&body, b"<li><a href=\"caf%E9.txt\">caf\xe9.txt</a></li>"));
        assert_eq!(decode_tolerant("caf%E9.txt"), raw);
    }
}
