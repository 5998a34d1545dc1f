// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::AsyncReadExt;
use tokio_test::{assert_err, assert_ok};

use logmount::node::{JCR_DATA, JCR_LAST_MODIFIED, JCR_MIME_TYPE};
use logmount::policy::READ_PRIVILEGE;
use logmount::{
    AccessPolicy, Config, DataSource, Error, HostVfs, LogTreeAdapter, NodeType, StaticUserDirectory,
};

/// A Tomcat-like base directory with a populated `logs` folder
fn create_server_base() -> TempDir {
    let base = TempDir::new().expect("create temp base dir");
    let logs = base.path().join("logs");
    create_dir_all(logs.join("archive")).expect("create archive");

    let mut catalina = File::create(logs.join("catalina.out")).expect("create catalina.out");
    catalina.write_all(&[b'.'; 1024]).expect("write catalina.out");

    let mut access = File::create(logs.join("localhost_access_log.2024-03-01.txt")).expect("create access log");
    writeln!(access, "127.0.0.1 - - GET / 200").expect("write access log");

    let mut gc = File::create(logs.join("gc:0.log")).expect("create gc log");
    writeln!(gc, "[gc] pause").expect("write gc log");
    base
}

async fn mount(base: &TempDir) -> LogTreeAdapter {
    let config = Config {
        base_directory: Some(base.path().to_path_buf()),
        administrators: vec!["root".to_string()],
        users: vec!["editor".to_string()],
        ..Config::default()
    };
    let location = config.root_location().expect("root location");
    LogTreeAdapter::initialize(
        Arc::new(HostVfs::new()),
        &location,
        Arc::new(config.mime_types()),
        AccessPolicy::new(Arc::new(config.user_directory())),
    )
    .await
    .expect("mount log tree")
}

#[tokio::test]
async fn test_browse_server_logs() {
    let base = create_server_base();
    let tree = mount(&base).await;

    assert!(tree.item_exists("/catalina.out").await);
    assert!(tree.item_exists("/catalina.out/jcr:content").await);
    assert!(!tree.item_exists("/catalina.2023-12-31.log").await);

    let mut names = assert_ok!(tree.child_names("/").await);
    names.sort();
    assert_eq!(
        names,
        vec![
            "archive",
            "catalina.out",
            "gc%3A0.log",
            "localhost_access_log.2024-03-01.txt"
        ]
    );

    let archive = assert_ok!(tree.child_names("/archive").await);
    assert!(archive.is_empty());
}

#[tokio::test]
async fn test_read_catalina_out() {
    let base = create_server_base();
    let tree = mount(&base).await;

    let file = assert_ok!(tree.item_by_path("/catalina.out").await);
    assert_eq!(file.node_type(), NodeType::File);
    assert!(file.property(JCR_LAST_MODIFIED).is_some_and(|t| t.ends_with('Z')));

    let content = assert_ok!(tree.item_by_path("/catalina.out/jcr:content").await);
    assert_eq!(content.node_type(), NodeType::Resource);
    assert_eq!(content.property(JCR_MIME_TYPE), Some("text/plain"));

    let data = content.binary(JCR_DATA).expect("binary data");
    assert_eq!(assert_ok!(data.size().await), 1024);

    let mut buf = [0u8; 16];
    assert_eq!(assert_ok!(data.read_at(&mut buf, 1020).await), 4);
    assert_eq!(assert_ok!(data.read_at(&mut buf, 4096).await), 0);

    let mut all = Vec::new();
    let mut stream = assert_ok!(data.open_stream().await);
    let _ = stream.read_to_end(&mut all).await.expect("read stream");
    assert_eq!(all.len(), 1024);

    content.dispose().await;
}

#[tokio::test]
async fn test_escaped_names_resolve() {
    let base = create_server_base();
    let tree = mount(&base).await;

    let gc = assert_ok!(tree.item_by_path("/gc%3A0.log").await);
    assert_eq!(gc.path(), "/gc%3A0.log");

    let fs_path = assert_ok!(tree.translator().to_filesystem_path("/gc%3A0.log"));
    assert_eq!(fs_path, tree.root().join("gc:0.log"));
    assert_eq!(
        tree.translator().to_repo_path(&fs_path).as_deref(),
        Some("/gc%3A0.log")
    );

    std::fs::write(base.path().join("logs/café:1.log"), b"bonjour\n").expect("write café log");
    let cafe = assert_ok!(tree.item_by_path("/café%3A1.log").await);
    assert_eq!(cafe.path(), "/café%3A1.log");
    assert!(!tree.item_exists("/caf%C3%A9%3A1.log").await);
    assert!(!tree.item_exists("/gc%3a0.log").await);
}

#[tokio::test]
async fn test_child_nodes_follow_rotation() {
    let base = create_server_base();
    let tree = mount(&base).await;
    let logs = base.path().join("logs");

    let before = assert_ok!(tree.child_nodes("/").await);
    assert_eq!(before.len(), 7);
    for node in before {
        node.dispose().await;
    }

    std::fs::rename(logs.join("catalina.out"), logs.join("archive/catalina.2024-03-01.out"))
        .expect("rotate");
    File::create(logs.join("catalina.out")).expect("reopen catalina.out");

    let archived = assert_ok!(tree.child_nodes("/archive").await);
    let paths: Vec<&str> = archived.iter().map(|n| n.path()).collect();
    assert_eq!(
        paths,
        vec![
            "/archive/catalina.2024-03-01.out",
            "/archive/catalina.2024-03-01.out/jcr:content"
        ]
    );
    for node in archived {
        node.dispose().await;
    }

    let fresh = assert_ok!(tree.item_by_path("/catalina.out/jcr:content").await);
    let data = fresh.binary(JCR_DATA).expect("binary data");
    assert_eq!(assert_ok!(data.size().await), 0);
    fresh.dispose().await;
}

#[tokio::test]
async fn test_missing_paths() {
    let base = create_server_base();
    let tree = mount(&base).await;

    for path in ["/nope.log", "/nope.log/jcr:content", "/archive/jcr:content"] {
        let err = assert_err!(tree.item_by_path(path).await);
        assert!(matches!(err, Error::PathNotFound(_)), "{path}: {err}");
    }
    let err = assert_err!(tree.item_by_identifier("catalina.out").await);
    assert!(matches!(err, Error::ItemNotFound(_)));
}

#[tokio::test]
async fn test_read_only() {
    let base = create_server_base();
    let tree = mount(&base).await;
    let node = assert_ok!(tree.item_by_path("/catalina.out").await);

    assert!(assert_err!(tree.save_item(&node).await).is_unsupported());
    assert!(assert_err!(tree.remove_item_by_path("/catalina.out").await).is_unsupported());
    assert!(assert_err!(tree.move_item("/catalina.out", "/archive/x").await).is_unsupported());
    assert!(base.path().join("logs/catalina.out").exists());
}

#[tokio::test]
async fn test_privileges() {
    let base = create_server_base();
    let tree = mount(&base).await;

    let granted = tree.granted_privileges("root", "/catalina.out");
    assert_eq!(granted.into_iter().collect::<Vec<_>>(), vec![READ_PRIVILEGE]);
    assert!(tree.granted_privileges("editor", "/catalina.out").is_empty());
    assert!(tree.granted_privileges("nobody", "/").is_empty());
}

#[tokio::test]
async fn test_mount_failures() {
    let base = TempDir::new().expect("create temp base dir");
    let policy = AccessPolicy::new(Arc::new(StaticUserDirectory::new()));

    let missing = base.path().join("logs");
    let result = LogTreeAdapter::initialize(
        Arc::new(HostVfs::new()),
        missing.to_str().expect("utf-8 temp path"),
        Arc::new(Config::default().mime_types()),
        policy,
    )
    .await;
    assert!(matches!(result, Err(Error::Init { .. })));

    assert!(!logmount::validate_root(&HostVfs::new(), missing.to_str().expect("utf-8 temp path")).await);
    assert!(logmount::validate_root(&HostVfs::new(), base.path().to_str().expect("utf-8 temp path")).await);
}
