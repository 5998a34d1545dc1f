// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::content::ContentHandle;
use crate::entry_type::NodeType;
use std::collections::BTreeMap;

pub const JCR_CREATED: &str = "jcr:created";
pub const JCR_LAST_MODIFIED: &str = "jcr:lastModified";
pub const JCR_MIME_TYPE: &str = "jcr:mimeType";
pub const JCR_DATA: &str = "jcr:data";
pub const JMIX_IMAGE: &str = "jmix:image";

/// A read-only node synthesized from a filesystem entry.
///
/// Nodes are built once and never change. Identifier and path are the same
/// string: the tree has no surrogate keys.
///
/// Equality compares everything a repository consumer can observe by value.
/// Binary properties compare by name and by the file behind each handle,
/// since every resolution hands out fresh handles.
#[derive(Debug)]
pub struct Node {
    id: String,
    path: String,
    node_type: NodeType,
    properties: BTreeMap<String, Vec<String>>,
    mixins: Vec<String>,
    binaries: BTreeMap<String, Vec<ContentHandle>>,
}

impl Node {
    #[must_use]
    pub fn new(path: String, node_type: NodeType) -> Self {
        Self {
            id: path.clone(),
            path,
            node_type,
            properties: BTreeMap::new(),
            mixins: Vec::new(),
            binaries: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_property<K: Into<String>>(mut self, name: K, values: Vec<String>) -> Self {
        let _ = self.properties.insert(name.into(), values);
        self
    }

    #[must_use]
    pub fn with_mixin<S: Into<String>>(mut self, mixin: S) -> Self {
        self.mixins.push(mixin.into());
        self
    }

    #[must_use]
    pub fn with_binary<K: Into<String>>(mut self, name: K, handle: ContentHandle) -> Self {
        self.binaries.entry(name.into()).or_default().push(handle);
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last path segment, `""` for the root
    #[must_use]
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or("")
    }

    #[must_use]
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    #[must_use]
    pub fn properties(&self) -> &BTreeMap<String, Vec<String>> {
        &self.properties
    }

    /// First value of a property
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    #[must_use]
    pub fn mixins(&self) -> &[String] {
        &self.mixins
    }

    #[must_use]
    pub fn binaries(&self) -> &BTreeMap<String, Vec<ContentHandle>> {
        &self.binaries
    }

    #[must_use]
    pub fn binary(&self, name: &str) -> Option<&ContentHandle> {
        self.binaries.get(name).and_then(|values| values.first())
    }

    /// Release every binary handle this node carries
    pub async fn dispose(self) {
        for handle in self.binaries.into_values().flatten() {
            handle.dispose().await;
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        let same_binaries = self.binaries.len() == other.binaries.len()
            && self
                .binaries
                .iter()
                .zip(other.binaries.iter())
                .all(|((ka, va), (kb, vb))| {
                    ka == kb
                        && va.len() == vb.len()
                        && va.iter().zip(vb.iter()).all(|(a, b)| a.path() == b.path())
                });

        self.id == other.id
            && self.path == other.path
            && self.node_type == other.node_type
            && self.properties == other.properties
            && self.mixins == other.mixins
            && same_binaries
    }
}

impl Eq for Node {}
