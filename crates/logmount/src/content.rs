// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, Result};
use crate::vfs::{ContentStream, FileContent};
use std::io::SeekFrom;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// Binary value of a content node: one file's bytes, read lazily.
///
/// The handle never buffers the file. Every stream it hands out is opened
/// fresh and owned by the caller. The handle itself must be released with
/// [`ContentHandle::dispose`] once the caller is done with it.
///
/// Two handles are equal only when they wrap the very same content object,
/// not merely content of the same path.
pub struct ContentHandle {
    content: Arc<dyn FileContent>,
}

impl ContentHandle {
    #[must_use]
    pub fn new(content: Arc<dyn FileContent>) -> Self {
        Self { content }
    }

    /// Host path of the file behind this handle
    #[must_use]
    pub fn path(&self) -> &Path {
        self.content.path()
    }

    pub async fn size(&self) -> Result<u64> {
        self.content
            .size()
            .await
            .map_err(|e| Error::content(self.path(), e))
    }

    /// A new stream over the full content, positioned at the start
    pub async fn open_stream(&self) -> Result<ContentStream> {
        self.content
            .open()
            .await
            .map_err(|e| Error::content(self.path(), e))
    }

    /// Fill `buf` with bytes starting at `position`.
    ///
    /// Returns the number of bytes read, short only at end of file and 0 at
    /// or past it. A transient stream is opened for the call and dropped
    /// before returning. Positions beyond `usize::MAX` are rejected.
    pub async fn read_at(&self, buf: &mut [u8], position: u64) -> Result<usize> {
        if usize::try_from(position).is_err() {
            return Err(Error::content(
                self.path(),
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("position {position} is out of range"),
                ),
            ));
        }

        let mut stream = self.open_stream().await?;
        let result = read_from(&mut stream, buf, position).await;
        drop(stream);
        result.map_err(|e| Error::content(self.path(), e))
    }

    /// Release the underlying content. Failures are logged, never returned.
    pub async fn dispose(self) {
        if let Err(e) = self.content.close().await {
            let path = format!("{}", self.path().display());
            let error = e.to_string();
            diagnostics::log_warn!("Impossible to close file content {path}: {error}", path: path, error: error);
        }
    }
}

async fn read_from(stream: &mut ContentStream, buf: &mut [u8], position: u64) -> std::io::Result<usize> {
    let _ = stream.seek(SeekFrom::Start(position)).await?;
    let mut filled = 0;
    while filled < buf.len() {
        let n = stream.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

impl PartialEq for ContentHandle {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.content), Arc::as_ptr(&other.content))
    }
}

impl Eq for ContentHandle {}

impl std::hash::Hash for ContentHandle {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.content).cast::<()>().hash(state);
    }
}

impl std::fmt::Debug for ContentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentHandle")
            .field("path", &self.path())
            .finish()
    }
}
