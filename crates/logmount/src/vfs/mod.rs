// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Vfs -- the filesystem seam under the log tree
//!
//! The adapter never touches `std::fs` directly. It asks a [`Vfs`] for entry
//! kinds, folder listings and file content, so the same adapter runs against
//! the host filesystem ([`HostVfs`]) and against an in-memory tree
//! ([`MemoryVfs`]) that can simulate failures the host rarely produces.
//!
//! Entries are resolved on every call. Nothing here caches filesystem state
//! beyond what a single [`FileContent`] holds for its own lifetime.

mod host;
mod memory;

pub use host::HostVfs;
pub use memory::MemoryVfs;

use crate::entry_type::EntryKind;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncSeek};

/// Reader over a file's bytes that can also seek
pub trait AsyncReadSeek: AsyncRead + AsyncSeek + Send + Unpin {}

impl<T: AsyncRead + AsyncSeek + Send + Unpin> AsyncReadSeek for T {}

pub type ContentStream = Pin<Box<dyn AsyncReadSeek>>;

#[async_trait]
pub trait Vfs: Send + Sync {
    /// Resolve a root location string to the directory it names
    async fn resolve_root(&self, location: &str) -> io::Result<PathBuf>;

    /// Kind of the entry at `path`, or `None` if nothing is there
    async fn kind(&self, path: &Path) -> io::Result<Option<EntryKind>>;

    /// Paths of the immediate children of a folder, in no particular order
    async fn children(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Drop any view of `path` the layer holds so the next listing sees
    /// external changes
    async fn refresh(&self, path: &Path) -> io::Result<()>;

    /// Milliseconds since the epoch, 0 when unknown
    async fn last_modified(&self, path: &Path) -> io::Result<i64>;

    /// Content type the layer declares for a file, if it has one
    async fn content_type(&self, path: &Path) -> io::Result<Option<String>>;

    /// Content of the file at `path`. The file is not opened yet.
    async fn content(&self, path: &Path) -> io::Result<Arc<dyn FileContent>>;
}

/// Byte content of one file
#[async_trait]
pub trait FileContent: Send + Sync {
    fn path(&self) -> &Path;

    async fn size(&self) -> io::Result<u64>;

    /// A fresh reader positioned at the first byte
    async fn open(&self) -> io::Result<ContentStream>;

    /// Release whatever this content holds open
    async fn close(&self) -> io::Result<()>;
}

/// Last path component as UTF-8, if it has one
#[must_use]
pub fn base_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}
