// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Privileges on the log tree.
//!
//! Administrators of the system-wide scope may read the whole tree and
//! nobody else gets anything. The path is not consulted.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

/// Scope key of the system-wide site
pub const SYSTEM_SITE_KEY: &str = "systemsite";

/// Read right in the default workspace
pub const READ_PRIVILEGE: &str = "jcr:read_default";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    name: String,
}

impl User {
    #[must_use]
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// User and role lookups, provided by the host
pub trait UserDirectory: Send + Sync {
    fn lookup_user(&self, name: &str) -> Option<User>;

    fn is_admin_member(&self, user: &User, scope: &str) -> bool;
}

/// Decides which privileges a user holds on the tree
#[derive(Clone)]
pub struct AccessPolicy {
    directory: Arc<dyn UserDirectory>,
}

impl AccessPolicy {
    #[must_use]
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    /// `{jcr:read_default}` for system-wide administrators, otherwise empty.
    #[must_use]
    pub fn granted_privileges(&self, user_name: &str, _path: &str) -> BTreeSet<String> {
        let mut privileges = BTreeSet::new();
        let Some(user) = self.directory.lookup_user(user_name) else {
            let user_name = user_name.to_string();
            diagnostics::log_debug!("Privilege query for unknown user {user_name}", user_name: user_name);
            return privileges;
        };
        if self.directory.is_admin_member(&user, SYSTEM_SITE_KEY) {
            let _ = privileges.insert(READ_PRIVILEGE.to_string());
        }
        privileges
    }
}

/// A fixed user list, typically from configuration.
///
/// Administrators listed here administer the system-wide scope only.
#[derive(Debug, Clone, Default)]
pub struct StaticUserDirectory {
    users: HashSet<String>,
    administrators: HashSet<String>,
}

impl StaticUserDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_user<S: Into<String>>(mut self, name: S) -> Self {
        let _ = self.users.insert(name.into());
        self
    }

    #[must_use]
    pub fn with_administrator<S: Into<String>>(mut self, name: S) -> Self {
        let name = name.into();
        let _ = self.users.insert(name.clone());
        let _ = self.administrators.insert(name);
        self
    }
}

impl UserDirectory for StaticUserDirectory {
    fn lookup_user(&self, name: &str) -> Option<User> {
        self.users.contains(name).then(|| User::new(name))
    }

    fn is_admin_member(&self, user: &User, scope: &str) -> bool {
        scope == SYSTEM_SITE_KEY && self.administrators.contains(user.name())
    }
}
