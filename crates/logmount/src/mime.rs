// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! File name to mime type lookup.

use std::collections::BTreeMap;

/// Used when neither the filesystem nor the lookup knows the type
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Maps a file name to a mime type.
pub trait MimeLookup: Send + Sync {
    fn mime_type(&self, file_name: &str) -> Option<String>;
}

/// Extension table, matched case-insensitively on the last `.` suffix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MimeTypes {
    by_extension: BTreeMap<String, String>,
}

const COMMON: &[(&str, &str)] = &[
    ("txt", "text/plain"),
    ("text", "text/plain"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("csv", "text/csv"),
    ("xml", "application/xml"),
    ("json", "application/json"),
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
    ("gz", "application/gzip"),
    ("gif", "image/gif"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("bmp", "image/bmp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("svg", "image/svg+xml"),
];

const SERVER_LOGS: &[(&str, &str)] = &[
    ("log", "text/plain"),
    ("out", "text/plain"),
    ("err", "text/plain"),
    ("properties", "text/plain"),
];

impl MimeTypes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Types a host filesystem layer typically declares from a file name
    #[must_use]
    pub fn common() -> Self {
        Self::new().with_entries(COMMON.iter().copied())
    }

    /// [`Self::common`] plus the extensions found in server log directories
    #[must_use]
    pub fn server_logs() -> Self {
        Self::common().with_entries(SERVER_LOGS.iter().copied())
    }

    #[must_use]
    pub fn with_entries<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (ext, mime) in entries {
            let _ = self
                .by_extension
                .insert(ext.as_ref().trim_start_matches('.').to_ascii_lowercase(), mime.into());
        }
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_extension.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_extension.is_empty()
    }
}

impl MimeLookup for MimeTypes {
    fn mime_type(&self, file_name: &str) -> Option<String> {
        let (stem, ext) = file_name.rsplit_once('.')?;
        if stem.is_empty() {
            // dotfile such as `.log`: no extension
            return None;
        }
        self.by_extension.get(&ext.to_ascii_lowercase()).cloned()
    }
}
