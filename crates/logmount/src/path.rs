// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Translation between repository paths and host filesystem paths.
//!
//! Repository paths are `/`-separated, always absolute, and cannot carry
//! some characters that host file names may contain. Those characters are
//! written as `%XX` on the way out and decoded on the way in, so the two
//! hierarchies map onto each other one to one.
//!
//! A file's bytes appear in the repository as a synthetic child named
//! [`CONTENT_NODE`]; that child shares the filesystem entry of its parent.

use crate::error::{Error, Result};
use percent_encoding::{AsciiSet, percent_decode_str, utf8_percent_encode};
use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

pub const SEPARATOR: char = '/';

/// Name of the synthetic child that carries a file's bytes
pub const CONTENT_NODE: &str = "jcr:content";

/// `/jcr:content`
pub const CONTENT_SUFFIX: &str = "/jcr:content";

/// Characters escaped wherever they appear in a name
const RESERVED: &AsciiSet = &AsciiSet::EMPTY
    .add(b'%')
    .add(b'/')
    .add(b':')
    .add(b'[')
    .add(b']')
    .add(b'*')
    .add(b'|')
    .add(b'\t')
    .add(b'\r')
    .add(b'\n');

/// Names shorter than three characters also escape `.`
const RESERVED_SHORT: &AsciiSet = &RESERVED.add(b'.');

/// First and last characters also escape a space
const RESERVED_EDGE: &AsciiSet = &RESERVED.add(b' ');

const RESERVED_SHORT_EDGE: &AsciiSet = &RESERVED_SHORT.add(b' ');

/// Escape one file name so it is a legal repository node name.
///
/// Non-ASCII characters are legal in node names and pass through.
#[must_use]
pub fn escape_name(name: &str) -> String {
    let len = name.chars().count();
    let short = len < 3;
    let mut out = String::with_capacity(name.len() * 2);
    let mut buf = [0u8; 4];
    for (i, ch) in name.chars().enumerate() {
        if !ch.is_ascii() {
            out.push(ch);
            continue;
        }
        let set = match (short, i == 0 || i + 1 == len) {
            (false, false) => RESERVED,
            (true, false) => RESERVED_SHORT,
            (false, true) => RESERVED_EDGE,
            (true, true) => RESERVED_SHORT_EDGE,
        };
        out.extend(utf8_percent_encode(ch.encode_utf8(&mut buf), set));
    }
    out
}

/// Decode the `%XX` sequences in a repository node name.
///
/// Text that is not a complete two-digit escape is kept as is. Returns
/// `None` when the decoded bytes are not UTF-8.
#[must_use]
pub fn unescape_name(name: &str) -> Option<String> {
    percent_decode_str(name)
        .decode_utf8()
        .ok()
        .map(Cow::into_owned)
}

/// True if the repository path names a file's content child.
#[must_use]
pub fn is_content_path(repo_path: &str) -> bool {
    repo_path.ends_with(CONTENT_SUFFIX)
}

/// Drop a trailing content suffix, if any. `/a.log/jcr:content` -> `/a.log`.
///
/// A bare `/jcr:content` strips to `/`, never to an empty string.
#[must_use]
pub fn strip_content_suffix(repo_path: &str) -> &str {
    match repo_path.strip_suffix(CONTENT_SUFFIX) {
        Some("") => "/",
        Some(parent) => parent,
        None => repo_path,
    }
}

/// Maps paths between the repository view and a host directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTranslator {
    root: PathBuf,
}

impl PathTranslator {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Repository path to host path.
    ///
    /// The content suffix is removed first; `/` (and the empty path) is the
    /// root itself. Segments are unescaped and must name a plain child,
    /// so the result never leaves the root. A segment must also be the
    /// canonical escaping of its name: `a%3ab` and `abc%41` are rejected.
    pub fn to_filesystem_path(&self, repo_path: &str) -> Result<PathBuf> {
        let stripped = strip_content_suffix(repo_path);
        let relative = stripped.strip_prefix(SEPARATOR).unwrap_or(stripped);
        let relative = relative.strip_suffix(SEPARATOR).unwrap_or(relative);
        if relative.is_empty() {
            return Ok(self.root.clone());
        }

        let mut path = self.root.clone();
        for segment in relative.split(SEPARATOR) {
            let name = unescape_name(segment).ok_or_else(|| Error::invalid_path(repo_path))?;
            if name.is_empty()
                || name == "."
                || name == ".."
                || name.contains(SEPARATOR)
                || escape_name(&name) != segment
            {
                return Err(Error::invalid_path(repo_path));
            }
            path.push(name);
        }
        Ok(path)
    }

    /// Host path to repository path, always starting with `/`.
    ///
    /// Returns `None` for paths outside the root and for names that are not
    /// valid UTF-8; neither has a repository identity.
    #[must_use]
    pub fn to_repo_path(&self, fs_path: &Path) -> Option<String> {
        let relative = fs_path.strip_prefix(&self.root).ok()?;
        let mut repo_path = String::new();
        for component in relative.components() {
            match component {
                Component::Normal(name) => {
                    repo_path.push(SEPARATOR);
                    repo_path.push_str(&escape_name(name.to_str()?));
                }
                Component::CurDir => {}
                _ => return None,
            }
        }
        if repo_path.is_empty() {
            repo_path.push(SEPARATOR);
        }
        Some(repo_path)
    }

    /// Repository path of the content child of the file at `fs_path`.
    #[must_use]
    pub fn to_content_path(&self, fs_path: &Path) -> Option<String> {
        let parent = self.to_repo_path(fs_path)?;
        Some(format!("{}{}", parent.trim_end_matches(SEPARATOR), CONTENT_SUFFIX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translator() -> PathTranslator {
        PathTranslator::new(PathBuf::from("/srv/tomcat/logs"))
    }

    #[test]
    fn test_escape_name() {
        assert_eq!(escape_name("catalina.out"), "catalina.out");
        assert_eq!(escape_name("a:b"), "a%3Ab");
        assert_eq!(escape_name("x[1]*|%"), "x%5B1%5D%2A%7C%25");
        assert_eq!(escape_name("."), "%2E");
        assert_eq!(escape_name(".."), "%2E%2E");
        assert_eq!(escape_name("..."), "...");
        assert_eq!(escape_name(" padded "), "%20padded%20");
        assert_eq!(escape_name("in between"), "in between");
        assert_eq!(escape_name("tab\there"), "tab%09here");
    }

    #[test]
    fn test_unescape_name() {
        assert_eq!(unescape_name("a%3Ab").unwrap(), "a:b");
        assert_eq!(unescape_name("x%5B1%5D%2A%7C%25").unwrap(), "x[1]*|%");
        assert_eq!(unescape_name("100%").unwrap(), "100%");
        assert_eq!(unescape_name("%zz").unwrap(), "%zz");
        assert_eq!(unescape_name("%4").unwrap(), "%4");
        assert_eq!(unescape_name("plain").unwrap(), "plain");
        assert!(unescape_name("bad%FF").is_none());
    }

    #[test]
    fn test_unescape_multibyte_name() {
        assert_eq!(unescape_name("caf%C3%A9.log").unwrap(), "café.log");
        assert_eq!(unescape_name("%E6%97%A5%E5%BF%97.txt").unwrap(), "日志.txt");
        assert_eq!(escape_name("café.log"), "café.log");
    }

    #[test]
    fn test_name_round_trip() {
        for name in [
            "catalina.2024-01-01.log",
            "a:b",
            "%41",
            "..",
            " lead",
            "trail ",
            "weird[0]|*",
            "ünïcödé.txt",
            "café:1.log",
            "line\nbreak",
        ] {
            assert_eq!(unescape_name(&escape_name(name)).unwrap(), name, "name {name:?}");
        }
    }

    #[test]
    fn test_content_suffix() {
        assert!(is_content_path("/catalina.out/jcr:content"));
        assert!(!is_content_path("/catalina.out"));
        assert_eq!(strip_content_suffix("/catalina.out/jcr:content"), "/catalina.out");
        assert_eq!(strip_content_suffix("/jcr:content"), "/");
        assert_eq!(strip_content_suffix("/archive"), "/archive");
    }

    #[test]
    fn test_to_filesystem_path() {
        let t = translator();
        assert_eq!(t.to_filesystem_path("/").unwrap(), PathBuf::from("/srv/tomcat/logs"));
        assert_eq!(t.to_filesystem_path("").unwrap(), PathBuf::from("/srv/tomcat/logs"));
        assert_eq!(
            t.to_filesystem_path("/archive/").unwrap(),
            PathBuf::from("/srv/tomcat/logs/archive")
        );
        assert_eq!(
            t.to_filesystem_path("/catalina.out").unwrap(),
            PathBuf::from("/srv/tomcat/logs/catalina.out")
        );
        assert_eq!(
            t.to_filesystem_path("/catalina.out/jcr:content").unwrap(),
            PathBuf::from("/srv/tomcat/logs/catalina.out")
        );
        assert_eq!(
            t.to_filesystem_path("archive/a%3Ab.log").unwrap(),
            PathBuf::from("/srv/tomcat/logs/archive/a:b.log")
        );
    }

    #[test]
    fn test_to_filesystem_path_rejects_escapes() {
        let t = translator();
        for bad in ["/..", "/a/../b", "/%2E%2E", "/a%2Fb", "/a//b", "/./x", "/bad%FF.log"] {
            let err = t.to_filesystem_path(bad).unwrap_err();
            assert!(err.is_not_found(), "{bad} should not resolve");
        }
    }

    #[test]
    fn test_to_filesystem_path_requires_canonical_names() {
        let t = translator();
        for alias in ["/a%3ab", "/abc%41", "/catalina%2Eout", "/archive/%63atalina.out", "/caf%C3%A9.log"] {
            let err = t.to_filesystem_path(alias).unwrap_err();
            assert!(err.is_not_found(), "{alias} should not resolve");
        }
        assert_eq!(
            t.to_filesystem_path("/a%3Ab").unwrap(),
            PathBuf::from("/srv/tomcat/logs/a:b")
        );
        assert_eq!(
            t.to_filesystem_path("/café.log").unwrap(),
            PathBuf::from("/srv/tomcat/logs/café.log")
        );
    }

    #[test]
    fn test_to_repo_path() {
        let t = translator();
        assert_eq!(t.to_repo_path(Path::new("/srv/tomcat/logs")).unwrap(), "/");
        assert_eq!(
            t.to_repo_path(Path::new("/srv/tomcat/logs/archive/a:b.log")).unwrap(),
            "/archive/a%3Ab.log"
        );
        assert!(t.to_repo_path(Path::new("/etc/passwd")).is_none());
    }

    #[test]
    fn test_to_content_path() {
        let t = translator();
        assert_eq!(
            t.to_content_path(Path::new("/srv/tomcat/logs/catalina.out")).unwrap(),
            "/catalina.out/jcr:content"
        );
    }

    #[test]
    fn test_path_round_trip() {
        let t = translator();
        for p in [
            "/srv/tomcat/logs",
            "/srv/tomcat/logs/catalina.out",
            "/srv/tomcat/logs/archive/x[1]:y.log",
            "/srv/tomcat/logs/ sp /..hidden",
            "/srv/tomcat/logs/café/日志.log",
        ] {
            let fs_path = PathBuf::from(p);
            let repo = t.to_repo_path(&fs_path).unwrap();
            assert_eq!(t.to_filesystem_path(&repo).unwrap(), fs_path);
            assert_eq!(t.to_repo_path(&t.to_filesystem_path(&repo).unwrap()).unwrap(), repo);
        }
    }
}
