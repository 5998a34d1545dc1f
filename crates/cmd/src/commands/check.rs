// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Result, bail};
use logmount::{HostVfs, validate_root};

use crate::common::MountContext;

/// Verify that the configured root can be mounted
pub async fn check_command<F>(ctx: &MountContext, mut output: F) -> Result<()>
where
    F: FnMut(String),
{
    let location = ctx.root_location()?;
    if !validate_root(&HostVfs::new(), &location).await {
        bail!("{location} is not a readable directory");
    }
    output(format!("{location}: ok"));
    Ok(())
}
