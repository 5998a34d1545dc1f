// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result, anyhow};
use logmount::DataSource;
use logmount::node::JCR_DATA;
use logmount::path::{CONTENT_SUFFIX, is_content_path};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::common::MountContext;

/// Stream a file's bytes into `out`. Returns the number of bytes copied.
///
/// `path` may name the file or its content node.
pub async fn cat_command<W>(ctx: &MountContext, path: &str, out: &mut W) -> Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let content_path = if is_content_path(path) {
        path.to_string()
    } else {
        format!("{}{}", path.trim_end_matches('/'), CONTENT_SUFFIX)
    };

    let tree = ctx.open_tree().await?;
    let node = tree
        .item_by_path(&content_path)
        .await
        .with_context(|| format!("Failed to read {path}"))?;

    let copied = match node.binary(JCR_DATA) {
        Some(data) => match data.open_stream().await {
            Ok(mut stream) => tokio::io::copy(&mut stream, out)
                .await
                .with_context(|| format!("Failed to copy {path}")),
            Err(e) => Err(anyhow!(e)),
        },
        None => Err(anyhow!("{content_path} has no data")),
    };
    node.dispose().await;

    let copied = copied?;
    out.flush().await?;
    diagnostics::log_debug!("Copied {copied} bytes from {path}", copied: copied, path: path);
    Ok(copied)
}
