// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::Result;
use crate::node::Node;
use async_trait::async_trait;
use std::collections::BTreeSet;

/// The contract between a mounted tree and the repository runtime hosting it
#[async_trait]
pub trait DataSource: Send + Sync {
    // Capabilities
    fn supports_uuid(&self) -> bool;
    fn supports_hierarchical_identifiers(&self) -> bool;
    fn supported_node_types(&self) -> BTreeSet<String>;

    // Lookups
    async fn item_exists(&self, path: &str) -> bool;
    async fn item_by_identifier(&self, identifier: &str) -> Result<Node>;
    async fn item_by_path(&self, path: &str) -> Result<Node>;

    // Listings; order is whatever the backing store returns
    async fn child_names(&self, path: &str) -> Result<Vec<String>>;
    async fn child_nodes(&self, path: &str) -> Result<Vec<Node>>;
    async fn order(&self, path: &str, children: &[String]) -> Result<()>;

    // Mutations
    async fn save_item(&self, node: &Node) -> Result<()>;
    async fn remove_item_by_path(&self, path: &str) -> Result<()>;
    async fn move_item(&self, old_path: &str, new_path: &str) -> Result<()>;

    fn granted_privileges(&self, user_name: &str, path: &str) -> BTreeSet<String>;
}
