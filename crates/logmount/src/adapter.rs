// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! The log tree: a host directory exposed as read-only repository nodes.
//!
//! Every call resolves filesystem state fresh through the [`Vfs`]. The adapter
//! holds no cache and no lock, so it can be shared freely between callers.
//!
//! Failure policy:
//! - existence checks never fail; I/O errors are logged and read as "absent"
//! - listings are best effort; I/O errors are logged and the affected part
//!   of the result is left out
//! - direct resolution propagates I/O errors and reports missing or
//!   unsupported entries as not found

use crate::content::ContentHandle;
use crate::data_source::DataSource;
use crate::entry_type::{EntryKind, NodeType, classify};
use crate::error::{Error, Result};
use crate::mime::{DEFAULT_MIME_TYPE, MimeLookup};
use crate::node::{JMIX_IMAGE, JCR_CREATED, JCR_DATA, JCR_LAST_MODIFIED, JCR_MIME_TYPE, Node};
use crate::path::{CONTENT_NODE, PathTranslator, escape_name, is_content_path};
use crate::policy::AccessPolicy;
use crate::vfs::{Vfs, base_name};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat};
use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const IMAGE_CONTENT_TYPE: &str = "^image/(.*)$";

/// Node types this tree can hold
pub const SUPPORTED_NODE_TYPES: [&str; 3] = ["jnt:file", "jnt:folder", CONTENT_NODE];

/// Reports whether `location` names a directory the tree could be rooted at
pub async fn validate_root(vfs: &dyn Vfs, location: &str) -> bool {
    match vfs.resolve_root(location).await {
        Ok(_) => true,
        Err(e) => {
            let location = location.to_string();
            let error = e.to_string();
            diagnostics::log_warn!("Root {location} is not usable: {error}", location: location, error: error);
            false
        }
    }
}

/// Data source over one log directory
pub struct LogTreeAdapter {
    vfs: Arc<dyn Vfs>,
    translator: PathTranslator,
    mime_types: Arc<dyn MimeLookup>,
    policy: AccessPolicy,
    image_pattern: Regex,
}

impl LogTreeAdapter {
    /// Bind the tree to `location`. Any failure here is fatal for the mount.
    pub async fn initialize(
        vfs: Arc<dyn Vfs>,
        location: &str,
        mime_types: Arc<dyn MimeLookup>,
        policy: AccessPolicy,
    ) -> Result<Self> {
        let root = vfs
            .resolve_root(location)
            .await
            .map_err(|e| Error::init(location, e))?;
        let image_pattern = Regex::new(IMAGE_CONTENT_TYPE).map_err(|e| Error::init(location, e))?;

        let root_display = format!("{}", root.display());
        diagnostics::log_info!("Log tree mounted at {root}", root: root_display);

        Ok(Self {
            vfs,
            translator: PathTranslator::new(root),
            mime_types,
            policy,
            image_pattern,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        self.translator.root()
    }

    #[must_use]
    pub fn translator(&self) -> &PathTranslator {
        &self.translator
    }

    /// Host path for a repository path; paths that cannot exist are not found
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        self.translator
            .to_filesystem_path(path)
            .map_err(|_| Error::path_not_found(path))
    }

    /// File or folder node for the entry at `fs_path`
    async fn entry_node(&self, fs_path: &Path, node_type: NodeType) -> Result<Node> {
        let path = self
            .translator
            .to_repo_path(fs_path)
            .ok_or_else(|| Error::path_not_found(format!("{}", fs_path.display())))?;

        let last_modified = self
            .vfs
            .last_modified(fs_path)
            .await
            .map_err(|e| entry_error(&path, fs_path, e))?;
        let content_type = match node_type {
            NodeType::File => self
                .vfs
                .content_type(fs_path)
                .await
                .map_err(|e| entry_error(&path, fs_path, e))?,
            _ => None,
        };

        let mut node = Node::new(path, node_type);
        if last_modified > 0
            && let Some(time) = DateTime::from_timestamp_millis(last_modified)
        {
            let stamp = time.to_rfc3339_opts(SecondsFormat::Millis, true);
            node = node
                .with_property(JCR_CREATED, vec![stamp.clone()])
                .with_property(JCR_LAST_MODIFIED, vec![stamp]);
        }
        if content_type.is_some_and(|t| self.image_pattern.is_match(&t)) {
            node = node.with_mixin(JMIX_IMAGE);
        }
        Ok(node)
    }

    /// Content child of the file at `fs_path`, carrying a fresh handle
    async fn content_node(&self, fs_path: &Path) -> Result<Node> {
        let path = self
            .translator
            .to_content_path(fs_path)
            .ok_or_else(|| Error::path_not_found(format!("{}", fs_path.display())))?;

        let declared = self
            .vfs
            .content_type(fs_path)
            .await
            .map_err(|e| entry_error(&path, fs_path, e))?;
        let mime_type = declared
            .or_else(|| base_name(fs_path).and_then(|name| self.mime_types.mime_type(name)))
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());

        let content = self
            .vfs
            .content(fs_path)
            .await
            .map_err(|e| entry_error(&path, fs_path, e))?;

        Ok(Node::new(path, NodeType::Resource)
            .with_property(JCR_MIME_TYPE, vec![mime_type])
            .with_binary(JCR_DATA, ContentHandle::new(content)))
    }

    /// Kind of the entry behind a listing target. `Ok(None)` means the
    /// listing is empty after a logged I/O failure.
    async fn listing_kind(&self, path: &str, fs_path: &Path) -> Result<Option<EntryKind>> {
        match self.vfs.kind(fs_path).await {
            Ok(Some(kind)) => Ok(Some(kind)),
            Ok(None) => Err(Error::path_not_found(path)),
            Err(e) => {
                log_listing_failure(path, &e);
                Ok(None)
            }
        }
    }

    /// Children of a folder that classify as file or folder
    async fn supported_children(&self, path: &str, fs_path: &Path) -> Vec<(PathBuf, NodeType)> {
        let children = match self.vfs.children(fs_path).await {
            Ok(children) => children,
            Err(e) => {
                log_listing_failure(path, &e);
                return Vec::new();
            }
        };

        let mut supported = Vec::with_capacity(children.len());
        for child in children {
            match self.vfs.kind(&child).await {
                Ok(Some(kind)) => match classify(kind) {
                    Some(node_type) if base_name(&child).is_some() => {
                        supported.push((child, node_type));
                    }
                    _ => {
                        let child = format!("{}", child.display());
                        diagnostics::log_warn!("Skipping unsupported entry {child}", child: child);
                    }
                },
                // rotated away since the folder was read
                Ok(None) => {
                    let child = format!("{}", child.display());
                    diagnostics::log_debug!("Entry {child} vanished during listing", child: child);
                }
                Err(e) => log_listing_failure(&format!("{}", child.display()), &e),
            }
        }
        supported
    }
}

/// An entry gone since its kind was read is not found; other failures are I/O
fn entry_error(path: &str, fs_path: &Path, error: std::io::Error) -> Error {
    if error.kind() == std::io::ErrorKind::NotFound {
        Error::path_not_found(path)
    } else {
        Error::io(fs_path, error)
    }
}

fn log_listing_failure(path: &str, error: &std::io::Error) {
    let path = path.to_string();
    let error = error.to_string();
    diagnostics::log_error!("Cannot get node children of {path}: {error}", path: path, error: error);
}

#[async_trait]
impl DataSource for LogTreeAdapter {
    fn supports_uuid(&self) -> bool {
        false
    }

    fn supports_hierarchical_identifiers(&self) -> bool {
        true
    }

    fn supported_node_types(&self) -> BTreeSet<String> {
        SUPPORTED_NODE_TYPES.iter().map(|t| t.to_string()).collect()
    }

    async fn item_exists(&self, path: &str) -> bool {
        let Ok(fs_path) = self.translator.to_filesystem_path(path) else {
            return false;
        };
        match self.vfs.kind(&fs_path).await {
            Ok(kind) => kind.is_some(),
            Err(e) => {
                let path = path.to_string();
                let error = e.to_string();
                diagnostics::log_warn!("Unable to check file existence for {path}: {error}", path: path, error: error);
                false
            }
        }
    }

    async fn item_by_identifier(&self, identifier: &str) -> Result<Node> {
        if !identifier.starts_with('/') {
            return Err(Error::item_not_found(identifier));
        }
        self.item_by_path(identifier).await.map_err(|e| {
            if e.is_not_found() {
                Error::item_not_found(identifier)
            } else {
                e
            }
        })
    }

    async fn item_by_path(&self, path: &str) -> Result<Node> {
        let fs_path = self.resolve(path)?;
        let kind = self
            .vfs
            .kind(&fs_path)
            .await
            .map_err(|e| Error::io(&fs_path, e))?
            .ok_or_else(|| Error::path_not_found(path))?;

        if is_content_path(path) {
            return match kind {
                EntryKind::File => self.content_node(&fs_path).await,
                _ => Err(Error::path_not_found(path)),
            };
        }

        match classify(kind) {
            Some(node_type) => self.entry_node(&fs_path, node_type).await,
            None => {
                let requested = path.to_string();
                diagnostics::log_debug!("Unsupported entry requested at {path}", path: requested);
                Err(Error::path_not_found(path))
            }
        }
    }

    async fn child_names(&self, path: &str) -> Result<Vec<String>> {
        if is_content_path(path) {
            return Ok(Vec::new());
        }
        let fs_path = self.resolve(path)?;
        match self.listing_kind(path, &fs_path).await? {
            Some(EntryKind::File) => Ok(vec![CONTENT_NODE.to_string()]),
            Some(EntryKind::Folder) => Ok(self
                .supported_children(path, &fs_path)
                .await
                .iter()
                .filter_map(|(child, _)| base_name(child).map(escape_name))
                .collect()),
            Some(EntryKind::Other) => {
                let path = path.to_string();
                diagnostics::log_warn!("Found non file or folder entry at {path}", path: path);
                Ok(Vec::new())
            }
            None => Ok(Vec::new()),
        }
    }

    async fn child_nodes(&self, path: &str) -> Result<Vec<Node>> {
        if is_content_path(path) {
            return Ok(Vec::new());
        }
        let fs_path = self.resolve(path)?;
        match self.listing_kind(path, &fs_path).await? {
            Some(EntryKind::File) => match self.content_node(&fs_path).await {
                Ok(node) => Ok(vec![node]),
                Err(e) => {
                    let path = path.to_string();
                    let error = e.to_string();
                    diagnostics::log_error!("Cannot get node children of {path}: {error}", path: path, error: error);
                    Ok(Vec::new())
                }
            },
            Some(EntryKind::Folder) => {
                if let Err(e) = self.vfs.refresh(&fs_path).await {
                    log_listing_failure(path, &e);
                    return Ok(Vec::new());
                }

                let mut nodes = Vec::new();
                for (child, node_type) in self.supported_children(path, &fs_path).await {
                    let entry = match self.entry_node(&child, node_type).await {
                        Ok(entry) => entry,
                        Err(e) => {
                            log_child_failure(&child, &e);
                            continue;
                        }
                    };
                    if node_type == NodeType::File {
                        match self.content_node(&child).await {
                            Ok(content) => {
                                nodes.push(entry);
                                nodes.push(content);
                            }
                            Err(e) => log_child_failure(&child, &e),
                        }
                    } else {
                        nodes.push(entry);
                    }
                }
                Ok(nodes)
            }
            Some(EntryKind::Other) => {
                let path = path.to_string();
                diagnostics::log_warn!("Found non file or folder entry at {path}", path: path);
                Ok(Vec::new())
            }
            None => Ok(Vec::new()),
        }
    }

    async fn order(&self, _path: &str, _children: &[String]) -> Result<()> {
        Ok(())
    }

    async fn save_item(&self, _node: &Node) -> Result<()> {
        Err(Error::Unsupported("save"))
    }

    async fn remove_item_by_path(&self, _path: &str) -> Result<()> {
        Err(Error::Unsupported("remove"))
    }

    async fn move_item(&self, _old_path: &str, _new_path: &str) -> Result<()> {
        Err(Error::Unsupported("move"))
    }

    fn granted_privileges(&self, user_name: &str, path: &str) -> BTreeSet<String> {
        self.policy.granted_privileges(user_name, path)
    }
}

fn log_child_failure(child: &Path, error: &Error) {
    let child = format!("{}", child.display());
    if error.is_not_found() {
        diagnostics::log_debug!("Entry {child} vanished during listing", child: child);
    } else {
        let error = error.to_string();
        diagnostics::log_error!("Cannot build node for {child}: {error}", child: child, error: error);
    }
}
