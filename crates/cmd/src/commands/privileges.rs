// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use logmount::DataSource;

use crate::common::MountContext;

/// Privileges `user` holds on `path`, one per line
pub async fn privileges_command<F>(
    ctx: &MountContext,
    user: &str,
    path: &str,
    mut output: F,
) -> Result<()>
where
    F: FnMut(String),
{
    let tree = ctx.open_tree().await?;
    let granted = tree.granted_privileges(user, path);
    if granted.is_empty() {
        output("(none)".to_string());
    }
    for privilege in granted {
        output(privilege);
    }
    Ok(())
}
