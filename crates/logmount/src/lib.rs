// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Logmount - a server log directory as a read-only content tree
//!
//! Set LOGMOUNT_LOG to control logging:
//! - LOGMOUNT_LOG=off (default) - silent
//! - LOGMOUNT_LOG=warn - skipped entries and listing failures
//! - LOGMOUNT_LOG=debug - detailed diagnostics

/// The data source over a log directory
pub mod adapter;

/// Contract with the hosting repository
pub mod data_source;

// Mount configuration
pub mod config;

// Lazy binary values
pub mod content;

// Filesystem and node kinds
pub mod entry_type;

// Error types
pub mod error;

pub mod mime;
pub mod node;

// Repository path <-> host path
pub mod path;

// Privileges
pub mod policy;

// Filesystem seam
pub mod vfs;

pub use adapter::{LogTreeAdapter, SUPPORTED_NODE_TYPES, validate_root};
pub use config::Config;
pub use content::ContentHandle;
pub use data_source::DataSource;
pub use entry_type::{EntryKind, NodeType};
pub use error::{Error, Result};
pub use mime::{MimeLookup, MimeTypes};
pub use node::Node;
pub use path::PathTranslator;
pub use policy::{AccessPolicy, StaticUserDirectory, User, UserDirectory};
pub use vfs::{FileContent, HostVfs, MemoryVfs, Vfs};
