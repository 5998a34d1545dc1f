// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use logmount::{DataSource, NodeType};

use crate::common::{EntryInfo, MountContext, content_size};

/// List the children of `path`, one formatted line per file or folder
pub async fn ls_command<F>(ctx: &MountContext, path: &str, mut output: F) -> Result<()>
where
    F: FnMut(String),
{
    let tree = ctx.open_tree().await?;
    let nodes = tree
        .child_nodes(path)
        .await
        .with_context(|| format!("Failed to list {path}"))?;

    let mut entries = Vec::new();
    let mut nodes = nodes.into_iter().peekable();
    while let Some(node) = nodes.next() {
        let size = match node.node_type() {
            NodeType::Folder => None,
            NodeType::Resource => content_size(&node).await,
            // a file is followed by its content
            NodeType::File => match nodes.next_if(|n| n.node_type() == NodeType::Resource) {
                Some(content) => {
                    let size = content_size(&content).await;
                    content.dispose().await;
                    size
                }
                None => None,
            },
        };
        entries.push(EntryInfo::from_node(&node, size));
        node.dispose().await;
    }

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    let count = entries.len();
    diagnostics::log_info!("Listed {count} entries", count: count);
    for entry in entries {
        output(entry.format_line());
    }
    Ok(())
}
