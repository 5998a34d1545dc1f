// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use logmount::node::{JCR_DATA, JCR_LAST_MODIFIED};
use logmount::{AccessPolicy, Config, HostVfs, LogTreeAdapter, Node, NodeType};

/// Where the log tree comes from: a config file, a root override, or both
#[derive(Debug, Clone, Default)]
pub struct MountContext {
    config_path: Option<PathBuf>,
    root: Option<PathBuf>,
}

impl MountContext {
    #[must_use]
    pub fn new(config_path: Option<PathBuf>, root: Option<PathBuf>) -> Self {
        Self { config_path, root }
    }

    /// The configuration file if one was given, defaults otherwise
    pub fn config(&self) -> Result<Config> {
        match &self.config_path {
            Some(path) => Config::load(path)
                .with_context(|| format!("Failed to load config {}", path.display())),
            None => Ok(Config::default()),
        }
    }

    /// `--root` when given, else the configured base directory plus logs
    pub fn root_location(&self) -> Result<String> {
        if let Some(root) = &self.root {
            return Ok(format!("{}", root.display()));
        }
        Ok(self.config()?.root_location()?)
    }

    pub async fn open_tree(&self) -> Result<LogTreeAdapter> {
        let config = self.config()?;
        let location = self.root_location()?;
        diagnostics::log_debug!("Mounting log tree at {location}", location: location.clone());

        let tree = LogTreeAdapter::initialize(
            Arc::new(HostVfs::new()),
            &location,
            Arc::new(config.mime_types()),
            AccessPolicy::new(Arc::new(config.user_directory())),
        )
        .await
        .with_context(|| format!("Failed to mount {location}"))?;
        Ok(tree)
    }
}

/// Helper function to format file sizes
#[must_use]
pub fn format_file_size(size: u64) -> String {
    if size >= 1024 * 1024 {
        format!("{:.1}MB", size as f64 / (1024.0 * 1024.0))
    } else if size >= 1024 {
        format!("{:.1}KB", size as f64 / 1024.0)
    } else {
        format!("{size}B")
    }
}

/// One line of `ls` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub path: String,
    pub node_type: NodeType,
    pub size: Option<u64>,
    pub modified: Option<String>,
}

impl EntryInfo {
    /// `size` is the byte length of the node's content, when it has one
    #[must_use]
    pub fn from_node(node: &Node, size: Option<u64>) -> Self {
        Self {
            path: node.path().to_string(),
            node_type: node.node_type(),
            size,
            modified: node.property(JCR_LAST_MODIFIED).map(str::to_string),
        }
    }

    #[must_use]
    pub fn format_line(&self) -> String {
        let type_symbol = match self.node_type {
            NodeType::Folder => "d",
            NodeType::File => "-",
            NodeType::Resource => "c",
        };
        let size = self
            .size
            .map_or_else(|| "-".to_string(), format_file_size);
        let modified = self.modified.as_deref().unwrap_or("unknown");
        format!("{type_symbol} {size:>8} {modified:<24} {}", self.path)
    }
}

/// Byte length behind a content node's data property
pub async fn content_size(node: &Node) -> Option<u64> {
    match node.binary(JCR_DATA) {
        Some(data) => data.size().await.ok(),
        None => None,
    }
}
