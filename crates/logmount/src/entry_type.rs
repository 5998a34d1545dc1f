// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

/// Kind of a filesystem entry as reported by the storage layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Folder,
    /// Links, devices, sockets, pipes: anything that is neither
    Other,
}

/// Node kinds the adapter exposes
///
/// `Resource` is the synthetic content child of a file. It never comes out
/// of [`classify`]; only files produce one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    File,
    Folder,
    Resource,
}

/// Sort a filesystem entry into a supported node kind, if any.
#[must_use]
pub fn classify(kind: EntryKind) -> Option<NodeType> {
    match kind {
        EntryKind::File => Some(NodeType::File),
        EntryKind::Folder => Some(NodeType::Folder),
        EntryKind::Other => None,
    }
}

impl NodeType {
    /// Short tag: `file`, `folder` or `resource`
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::File => "file",
            NodeType::Folder => "folder",
            NodeType::Resource => "resource",
        }
    }

    /// Repository node type name
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeType::File => "jnt:file",
            NodeType::Folder => "jnt:folder",
            NodeType::Resource => "jnt:resource",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EntryKind::File => "file",
            EntryKind::Folder => "folder",
            EntryKind::Other => "other",
        };
        write!(f, "{s}")
    }
}
