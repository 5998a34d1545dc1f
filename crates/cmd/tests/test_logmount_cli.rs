// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::fs::{File, create_dir_all};
use std::io::Write;
use tempfile::TempDir;

use cmd::commands::{cat_command, check_command, ls_command, privileges_command, stat_command};
use cmd::common::MountContext;

/// A server base with logs/catalina.out, logs/screen.png and logs/archive/
fn create_server_base() -> TempDir {
    let base = TempDir::new().expect("create temp base dir");
    let logs = base.path().join("logs");
    create_dir_all(logs.join("archive")).expect("create archive");

    let mut catalina = File::create(logs.join("catalina.out")).expect("create catalina.out");
    write!(catalina, "Server startup in 1234 ms").expect("write catalina.out");

    let mut png = File::create(logs.join("screen.png")).expect("create png");
    png.write_all(b"\x89PNG\r\n").expect("write png");

    let mut old = File::create(logs.join("archive/catalina.2024-03-01.log")).expect("create old log");
    write!(old, "old").expect("write old log");
    base
}

fn write_config(base: &TempDir) -> std::path::PathBuf {
    let config_path = base.path().join("logmount.yaml");
    std::fs::write(
        &config_path,
        format!(
            "base_directory: {}\nadministrators: [root]\nusers: [editor]\n",
            base.path().display()
        ),
    )
    .expect("write config");
    config_path
}

#[tokio::test]
async fn test_logmount_cli_end_to_end() {
    let base = create_server_base();
    let ctx = MountContext::new(Some(write_config(&base)), None);

    let mut checked = Vec::new();
    check_command(&ctx, |line| checked.push(line)).await.expect("check");
    assert_eq!(checked.len(), 1);
    assert!(checked[0].ends_with(": ok"));

    let mut listed = Vec::new();
    ls_command(&ctx, "/", |line| listed.push(line)).await.expect("ls /");
    assert_eq!(listed.len(), 3);
    assert!(listed[0].starts_with('d') && listed[0].ends_with("/archive"));
    assert!(listed[1].contains("25B") && listed[1].ends_with("/catalina.out"));
    assert!(listed[2].ends_with("/screen.png"));

    let mut nested = Vec::new();
    ls_command(&ctx, "/archive", |line| nested.push(line)).await.expect("ls /archive");
    assert_eq!(nested.len(), 1);
    assert!(nested[0].ends_with("/archive/catalina.2024-03-01.log"));

    let mut out: Vec<u8> = Vec::new();
    let copied = cat_command(&ctx, "/catalina.out", &mut out).await.expect("cat");
    assert_eq!(copied, 25);
    assert_eq!(out, b"Server startup in 1234 ms");

    let mut out: Vec<u8> = Vec::new();
    let _ = cat_command(&ctx, "/archive/catalina.2024-03-01.log/jcr:content", &mut out)
        .await
        .expect("cat content node");
    assert_eq!(out, b"old");

    let mut admin = Vec::new();
    privileges_command(&ctx, "root", "/catalina.out", |line| admin.push(line))
        .await
        .expect("privileges root");
    assert_eq!(admin, vec!["jcr:read_default"]);

    let mut editor = Vec::new();
    privileges_command(&ctx, "editor", "/catalina.out", |line| editor.push(line))
        .await
        .expect("privileges editor");
    assert_eq!(editor, vec!["(none)"]);
}

#[tokio::test]
async fn test_stat_image() {
    let base = create_server_base();
    let ctx = MountContext::new(None, Some(base.path().join("logs")));

    let mut lines = Vec::new();
    stat_command(&ctx, "/screen.png", |line| lines.push(line)).await.expect("stat png");
    assert_eq!(lines[0], "path: /screen.png");
    assert_eq!(lines[1], "type: jnt:file");
    assert!(lines.iter().any(|l| l.starts_with("jcr:lastModified: ")));
    assert!(lines.contains(&"mixin: jmix:image".to_string()));

    let mut lines = Vec::new();
    stat_command(&ctx, "/screen.png/jcr:content", |line| lines.push(line))
        .await
        .expect("stat content");
    assert!(lines.contains(&"type: jnt:resource".to_string()));
    assert!(lines.contains(&"jcr:mimeType: image/png".to_string()));
    assert!(lines.contains(&"jcr:data: 6B".to_string()));
}

#[tokio::test]
async fn test_cli_failures() {
    let base = create_server_base();
    let ctx = MountContext::new(None, Some(base.path().join("logs")));

    let mut out: Vec<u8> = Vec::new();
    assert!(cat_command(&ctx, "/missing.log", &mut out).await.is_err());
    assert!(cat_command(&ctx, "/archive", &mut out).await.is_err());
    assert!(out.is_empty());

    let mut lines = Vec::new();
    assert!(ls_command(&ctx, "/missing", |line| lines.push(line)).await.is_err());
    assert!(stat_command(&ctx, "/missing", |line| lines.push(line)).await.is_err());
    assert!(lines.is_empty());

    let unmountable = MountContext::new(None, Some(base.path().join("nowhere")));
    let mut checked = Vec::new();
    assert!(check_command(&unmountable, |line| checked.push(line)).await.is_err());
    assert!(checked.is_empty());
    assert!(unmountable.open_tree().await.is_err());
}
