// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use logmount::DataSource;

use crate::common::{MountContext, format_file_size};

/// Describe one node: type, properties, mixins and binary sizes
pub async fn stat_command<F>(ctx: &MountContext, path: &str, mut output: F) -> Result<()>
where
    F: FnMut(String),
{
    let tree = ctx.open_tree().await?;
    let node = tree
        .item_by_path(path)
        .await
        .with_context(|| format!("Failed to stat {path}"))?;

    output(format!("path: {}", node.path()));
    output(format!("type: {}", node.node_type().type_name()));
    for (name, values) in node.properties() {
        output(format!("{name}: {}", values.join(", ")));
    }
    for mixin in node.mixins() {
        output(format!("mixin: {mixin}"));
    }
    for (name, handles) in node.binaries() {
        for handle in handles {
            let size = match handle.size().await {
                Ok(size) => format_file_size(size),
                Err(e) => format!("unreadable ({e})"),
            };
            output(format!("{name}: {size}"));
        }
    }

    node.dispose().await;
    Ok(())
}
