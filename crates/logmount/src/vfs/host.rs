// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use super::{ContentStream, FileContent, Vfs, base_name};
use crate::entry_type::EntryKind;
use crate::mime::{MimeLookup, MimeTypes};
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::UNIX_EPOCH;

/// The host filesystem, read through `tokio::fs`.
///
/// Symbolic links are reported as [`EntryKind::Other`] and never followed,
/// so no alias can lead a listing outside the mounted directory. Content
/// types are declared from the file name, the way host filesystem layers
/// usually do it.
pub struct HostVfs {
    content_types: Arc<MimeTypes>,
}

impl Default for HostVfs {
    fn default() -> Self {
        Self::new()
    }
}

impl HostVfs {
    #[must_use]
    pub fn new() -> Self {
        Self::with_content_types(MimeTypes::common())
    }

    #[must_use]
    pub fn with_content_types(content_types: MimeTypes) -> Self {
        Self {
            content_types: Arc::new(content_types),
        }
    }
}

#[async_trait]
impl Vfs for HostVfs {
    async fn resolve_root(&self, location: &str) -> io::Result<PathBuf> {
        if location.trim().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "empty root location",
            ));
        }
        let canonical = tokio::fs::canonicalize(location).await?;
        let metadata = tokio::fs::metadata(&canonical).await?;
        if !metadata.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("'{}' is not a directory", canonical.display()),
            ));
        }
        Ok(canonical)
    }

    async fn kind(&self, path: &Path) -> io::Result<Option<EntryKind>> {
        let metadata = match tokio::fs::symlink_metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        let file_type = metadata.file_type();
        let kind = if file_type.is_symlink() {
            EntryKind::Other
        } else if file_type.is_dir() {
            EntryKind::Folder
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };
        Ok(Some(kind))
    }

    async fn children(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut read_dir = tokio::fs::read_dir(path).await?;
        let mut children = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            children.push(entry.path());
        }
        Ok(children)
    }

    async fn refresh(&self, path: &Path) -> io::Result<()> {
        // read_dir always sees the current directory; there is no view to drop
        let path = format!("{}", path.display());
        diagnostics::log_debug!("HostVfs::refresh {path}", path: path);
        Ok(())
    }

    async fn last_modified(&self, path: &Path) -> io::Result<i64> {
        let metadata = tokio::fs::symlink_metadata(path).await?;
        Ok(metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0))
    }

    async fn content_type(&self, path: &Path) -> io::Result<Option<String>> {
        Ok(base_name(path).and_then(|name| self.content_types.mime_type(name)))
    }

    async fn content(&self, path: &Path) -> io::Result<Arc<dyn FileContent>> {
        Ok(Arc::new(HostContent {
            path: path.to_path_buf(),
        }))
    }
}

/// A host file's content, addressed by path.
///
/// No descriptor is held between calls, so `size` and `open` always answer
/// for whatever file currently sits at the path.
struct HostContent {
    path: PathBuf,
}

#[async_trait]
impl FileContent for HostContent {
    fn path(&self) -> &Path {
        &self.path
    }

    async fn size(&self) -> io::Result<u64> {
        Ok(tokio::fs::metadata(&self.path).await?.len())
    }

    async fn open(&self) -> io::Result<ContentStream> {
        let file = tokio::fs::File::open(&self.path).await?;
        Ok(Box::pin(file))
    }

    async fn close(&self) -> io::Result<()> {
        Ok(())
    }
}
