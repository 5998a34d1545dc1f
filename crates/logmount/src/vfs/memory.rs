// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use super::{ContentStream, FileContent, Vfs};
use crate::entry_type::EntryKind;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Clone)]
enum MemoryEntry {
    File {
        bytes: Arc<Vec<u8>>,
        modified: i64,
        content_type: Option<String>,
    },
    Folder,
    Other,
}

#[derive(Default)]
struct State {
    entries: BTreeMap<PathBuf, MemoryEntry>,
    failing: BTreeSet<PathBuf>,
    failing_close: BTreeSet<PathBuf>,
    failing_refresh: BTreeSet<PathBuf>,
    vanishing: BTreeSet<PathBuf>,
    refreshes: HashMap<PathBuf, usize>,
    closes: HashMap<PathBuf, usize>,
}

impl State {
    fn check(&self, path: &Path) -> io::Result<()> {
        if self.failing.contains(path) {
            return Err(io::Error::other(format!(
                "injected failure at '{}'",
                path.display()
            )));
        }
        Ok(())
    }

    fn file(&self, path: &Path) -> io::Result<(Arc<Vec<u8>>, Option<String>)> {
        self.check(path)?;
        match self.entries.get(path) {
            Some(MemoryEntry::File {
                bytes,
                content_type,
                ..
            }) => Ok((bytes.clone(), content_type.clone())),
            Some(_) => Err(io::Error::other(format!("'{}' is not a file", path.display()))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("'{}' does not exist", path.display()),
            )),
        }
    }
}

/// An in-memory tree behind the [`Vfs`] seam.
///
/// Built with the `with_*` methods, mutated afterwards through `write` and
/// `remove` to simulate log rotation. Clones share the same tree. Parent
/// folders are created implicitly.
#[derive(Clone, Default)]
pub struct MemoryVfs {
    state: Arc<Mutex<State>>,
}

impl MemoryVfs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn add_parents(state: &mut State, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            let _ = state
                .entries
                .entry(ancestor.to_path_buf())
                .or_insert(MemoryEntry::Folder);
        }
    }

    #[must_use]
    pub fn with_folder<P: Into<PathBuf>>(self, path: P) -> Self {
        let path = path.into();
        {
            let mut state = self.lock();
            Self::add_parents(&mut state, &path);
            let _ = state.entries.insert(path, MemoryEntry::Folder);
        }
        self
    }

    #[must_use]
    pub fn with_file<P: Into<PathBuf>, B: AsRef<[u8]>>(self, path: P, bytes: B, modified: i64) -> Self {
        self.with_typed_file(path, bytes, modified, None::<String>)
    }

    /// A file whose content type the layer declares
    #[must_use]
    pub fn with_typed_file<P, B, S>(
        self,
        path: P,
        bytes: B,
        modified: i64,
        content_type: Option<S>,
    ) -> Self
    where
        P: Into<PathBuf>,
        B: AsRef<[u8]>,
        S: Into<String>,
    {
        let path = path.into();
        {
            let mut state = self.lock();
            Self::add_parents(&mut state, &path);
            let _ = state.entries.insert(
                path,
                MemoryEntry::File {
                    bytes: Arc::new(bytes.as_ref().to_vec()),
                    modified,
                    content_type: content_type.map(Into::into),
                },
            );
        }
        self
    }

    /// An entry that is neither file nor folder (a link, a device)
    #[must_use]
    pub fn with_other<P: Into<PathBuf>>(self, path: P) -> Self {
        let path = path.into();
        {
            let mut state = self.lock();
            Self::add_parents(&mut state, &path);
            let _ = state.entries.insert(path, MemoryEntry::Other);
        }
        self
    }

    /// Every operation touching `path` fails with an I/O error
    #[must_use]
    pub fn with_failure<P: Into<PathBuf>>(self, path: P) -> Self {
        let _ = self.lock().failing.insert(path.into());
        self
    }

    /// Closing content of `path` fails
    #[must_use]
    pub fn with_close_failure<P: Into<PathBuf>>(self, path: P) -> Self {
        let _ = self.lock().failing_close.insert(path.into());
        self
    }

    /// Refreshing `path` fails; everything else works
    #[must_use]
    pub fn with_refresh_failure<P: Into<PathBuf>>(self, path: P) -> Self {
        let _ = self.lock().failing_refresh.insert(path.into());
        self
    }

    /// The entry at `path` is removed right after its kind is first read,
    /// as a rotation landing between two calls would
    #[must_use]
    pub fn with_vanishing<P: Into<PathBuf>>(self, path: P) -> Self {
        let _ = self.lock().vanishing.insert(path.into());
        self
    }

    /// Replace or create a file's bytes, as a logger appending would
    pub fn write<P: Into<PathBuf>>(&self, path: P, bytes: &[u8], modified: i64) {
        let path = path.into();
        let mut state = self.lock();
        Self::add_parents(&mut state, &path);
        let content_type = match state.entries.get(&path) {
            Some(MemoryEntry::File { content_type, .. }) => content_type.clone(),
            _ => None,
        };
        let _ = state.entries.insert(
            path,
            MemoryEntry::File {
                bytes: Arc::new(bytes.to_vec()),
                modified,
                content_type,
            },
        );
    }

    /// Remove an entry and everything under it
    pub fn remove<P: AsRef<Path>>(&self, path: P) {
        let path = path.as_ref();
        let mut state = self.lock();
        state.entries.retain(|p, _| !p.starts_with(path));
    }

    #[must_use]
    pub fn refresh_count<P: AsRef<Path>>(&self, path: P) -> usize {
        let state = self.lock();
        state.refreshes.get(path.as_ref()).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn close_count<P: AsRef<Path>>(&self, path: P) -> usize {
        let state = self.lock();
        state.closes.get(path.as_ref()).copied().unwrap_or(0)
    }
}

#[async_trait]
impl Vfs for MemoryVfs {
    async fn resolve_root(&self, location: &str) -> io::Result<PathBuf> {
        let path = PathBuf::from(location);
        let state = self.lock();
        state.check(&path)?;
        match state.entries.get(&path) {
            Some(MemoryEntry::Folder) => Ok(path),
            Some(_) => Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("'{location}' is not a directory"),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("'{location}' does not exist"),
            )),
        }
    }

    async fn kind(&self, path: &Path) -> io::Result<Option<EntryKind>> {
        let mut state = self.lock();
        state.check(path)?;
        let kind = state.entries.get(path).map(|entry| match entry {
            MemoryEntry::File { .. } => EntryKind::File,
            MemoryEntry::Folder => EntryKind::Folder,
            MemoryEntry::Other => EntryKind::Other,
        });
        if state.vanishing.remove(path) {
            state.entries.retain(|p, _| !p.starts_with(path));
        }
        Ok(kind)
    }

    async fn children(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let state = self.lock();
        state.check(path)?;
        match state.entries.get(path) {
            Some(MemoryEntry::Folder) => Ok(state
                .entries
                .keys()
                .filter(|p| p.parent() == Some(path))
                .cloned()
                .collect()),
            Some(_) => Err(io::Error::other(format!(
                "'{}' is not a folder",
                path.display()
            ))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("'{}' does not exist", path.display()),
            )),
        }
    }

    async fn refresh(&self, path: &Path) -> io::Result<()> {
        let mut state = self.lock();
        state.check(path)?;
        *state.refreshes.entry(path.to_path_buf()).or_insert(0) += 1;
        if state.failing_refresh.contains(path) {
            return Err(io::Error::other(format!(
                "injected refresh failure at '{}'",
                path.display()
            )));
        }
        Ok(())
    }

    async fn last_modified(&self, path: &Path) -> io::Result<i64> {
        let state = self.lock();
        state.check(path)?;
        match state.entries.get(path) {
            Some(MemoryEntry::File { modified, .. }) => Ok(*modified),
            Some(_) => Ok(0),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("'{}' does not exist", path.display()),
            )),
        }
    }

    async fn content_type(&self, path: &Path) -> io::Result<Option<String>> {
        let (_, content_type) = self.lock().file(path)?;
        Ok(content_type)
    }

    async fn content(&self, path: &Path) -> io::Result<Arc<dyn FileContent>> {
        self.lock().check(path)?;
        Ok(Arc::new(MemoryContent {
            path: path.to_path_buf(),
            state: self.state.clone(),
        }))
    }
}

/// Reads the tree on every call, so removal or rewrite after the content
/// was handed out is visible to the holder.
struct MemoryContent {
    path: PathBuf,
    state: Arc<Mutex<State>>,
}

impl MemoryContent {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl FileContent for MemoryContent {
    fn path(&self) -> &Path {
        &self.path
    }

    async fn size(&self) -> io::Result<u64> {
        let (bytes, _) = self.lock().file(&self.path)?;
        Ok(bytes.len() as u64)
    }

    async fn open(&self) -> io::Result<ContentStream> {
        let (bytes, _) = self.lock().file(&self.path)?;
        Ok(Box::pin(Cursor::new(bytes.as_ref().clone())))
    }

    async fn close(&self) -> io::Result<()> {
        let mut state = self.lock();
        *state.closes.entry(self.path.clone()).or_insert(0) += 1;
        if state.failing_close.contains(&self.path) {
            return Err(io::Error::other(format!(
                "injected close failure at '{}'",
                self.path.display()
            )));
        }
        Ok(())
    }
}
