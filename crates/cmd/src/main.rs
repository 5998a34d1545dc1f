// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use cmd::commands::{cat_command, check_command, ls_command, privileges_command, stat_command};
use cmd::common::MountContext;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "logmount")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// YAML mount configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Log directory to mount, bypassing the configured base directory
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the entries of a folder
    Ls {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Write a file's bytes to stdout
    Cat { path: String },
    /// Show the node synthesized for a path
    Stat { path: String },
    /// Check that the log directory can be mounted
    Check,
    /// Show the privileges a user holds on a path
    Privileges {
        user: String,
        #[arg(default_value = "/")]
        path: String,
    },
}

fn print_line(line: String) {
    let mut stdout = std::io::stdout();
    // a closed pipe ends the listing, nothing else to do
    let _ = writeln!(stdout, "{line}");
}

#[tokio::main]
async fn main() -> Result<()> {
    diagnostics::init();

    let cli = Cli::parse();
    let ctx = MountContext::new(cli.config, cli.root);

    match &cli.command {
        Commands::Ls { path } => ls_command(&ctx, path, print_line).await,
        Commands::Cat { path } => {
            let mut stdout = tokio::io::stdout();
            let _ = cat_command(&ctx, path, &mut stdout).await?;
            Ok(())
        }
        Commands::Stat { path } => stat_command(&ctx, path, print_line).await,
        Commands::Check => check_command(&ctx, print_line).await,
        Commands::Privileges { user, path } => privileges_command(&ctx, user, path, print_line).await,
    }
}
