// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, Result};
use crate::mime::MimeTypes;
use crate::policy::StaticUserDirectory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Environment variable naming the server base directory
pub const BASE_DIRECTORY_ENV: &str = "CATALINA_BASE";

pub const DEFAULT_LOGS_DIRECTORY: &str = "logs";

/// Mount configuration, usually read from YAML:
///
/// ```yaml
/// base_directory: /opt/tomcat
/// logs_directory: logs
/// mime_types:
///   out: text/plain
/// administrators: [root]
/// users: [editor]
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Server base directory; `CATALINA_BASE` when absent
    pub base_directory: Option<PathBuf>,
    /// Log directory under the base
    pub logs_directory: String,
    /// Extra extension -> mime type entries for the fallback lookup
    pub mime_types: BTreeMap<String, String>,
    pub administrators: Vec<String>,
    pub users: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_directory: None,
            logs_directory: DEFAULT_LOGS_DIRECTORY.to_string(),
            mime_types: BTreeMap::new(),
            administrators: Vec::new(),
            users: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml_ng::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read '{}': {}", path.display(), e)))?;
        Self::from_yaml(&text)
    }

    /// The root location handed to the adapter: base directory + logs
    /// directory. The base falls back to `CATALINA_BASE`.
    pub fn root_location(&self) -> Result<String> {
        self.root_location_with(std::env::var(BASE_DIRECTORY_ENV).ok())
    }

    /// Like [`Self::root_location`] with the environment value supplied
    pub fn root_location_with(&self, env_base: Option<String>) -> Result<String> {
        let base = self
            .base_directory
            .clone()
            .or_else(|| env_base.filter(|b| !b.is_empty()).map(PathBuf::from))
            .ok_or_else(|| {
                Error::init(
                    self.logs_directory.as_str(),
                    format!("no base directory configured and {BASE_DIRECTORY_ENV} is not set"),
                )
            })?;
        Ok(format!("{}", base.join(&self.logs_directory).display()))
    }

    /// Fallback mime lookup: the server log defaults plus configured entries
    #[must_use]
    pub fn mime_types(&self) -> MimeTypes {
        MimeTypes::server_logs().with_entries(
            self.mime_types
                .iter()
                .map(|(ext, mime)| (ext.as_str(), mime.clone())),
        )
    }

    #[must_use]
    pub fn user_directory(&self) -> StaticUserDirectory {
        let directory = self
            .users
            .iter()
            .fold(StaticUserDirectory::new(), |d, user| d.with_user(user.as_str()));
        self.administrators
            .iter()
            .fold(directory, |d, admin| d.with_administrator(admin.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mime::MimeLookup;
    use crate::policy::{SYSTEM_SITE_KEY, User, UserDirectory};

    #[test]
    fn test_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.logs_directory, "logs");
    }

    #[test]
    fn test_parse() {
        let config = Config::from_yaml(
            "base_directory: /opt/tomcat\n\
             mime_types:\n  trace: text/plain\n\
             administrators: [root]\n\
             users: [editor]\n",
        )
        .unwrap();
        assert_eq!(config.base_directory, Some(PathBuf::from("/opt/tomcat")));
        assert_eq!(
            config.mime_types().mime_type("gc.trace").as_deref(),
            Some("text/plain")
        );

        let directory = config.user_directory();
        let root = directory.lookup_user("root").unwrap();
        assert!(directory.is_admin_member(&root, SYSTEM_SITE_KEY));
        assert!(!directory.is_admin_member(&User::new("editor"), SYSTEM_SITE_KEY));
        assert!(directory.lookup_user("editor").is_some());
    }

    #[test]
    fn test_parse_error() {
        let err = Config::from_yaml("administrators: 3").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_root_location() {
        let config = Config {
            base_directory: Some(PathBuf::from("/opt/tomcat")),
            ..Config::default()
        };
        assert_eq!(config.root_location_with(None).unwrap(), "/opt/tomcat/logs");

        let config = Config::default();
        assert_eq!(
            config
                .root_location_with(Some("/var/lib/tomcat".to_string()))
                .unwrap(),
            "/var/lib/tomcat/logs"
        );
    }

    #[test]
    fn test_root_location_missing_base() {
        let err = Config::default().root_location_with(None).unwrap_err();
        assert!(matches!(err, Error::Init { .. }));
        let err = Config::default()
            .root_location_with(Some(String::new()))
            .unwrap_err();
        assert!(matches!(err, Error::Init { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/logmount.yaml").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
