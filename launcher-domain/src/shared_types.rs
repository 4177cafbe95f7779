use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};

/// Identifies an installed application by its package name.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PackageId(String);

impl PackageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` if the id is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Debug for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PackageId").field(&self.0).finish()
    }
}

impl Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PackageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for PackageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for PackageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Opaque token the host uses to start an app (e.g. an activity component name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LaunchHandle(String);

impl LaunchHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A launchable application as reported by the host platform.
///
/// Two apps are equal when their package ids are equal.
#[derive(Debug, Clone)]
pub struct App {
    pub package_id: PackageId,
    pub label: String,
    pub launch_handle: LaunchHandle,
    pub is_system_app: bool,
}

impl App {
    pub fn new(package_id: impl Into<PackageId>, label: impl Into<String>) -> Self {
        let package_id = package_id.into();
        Self {
            launch_handle: LaunchHandle::new(package_id.as_str()),
            package_id,
            label: label.into(),
            is_system_app: false,
        }
    }

    pub fn with_launch_handle(mut self, handle: LaunchHandle) -> Self {
        self.launch_handle = handle;
        self
    }

    pub fn system(mut self) -> Self {
        self.is_system_app = true;
        self
    }

    /// Lower-cased label used for case-insensitive ordering and matching.
    pub fn sort_key(&self) -> String {
        self.label.to_lowercase()
    }
}

impl PartialEq for App {
    fn eq(&self, other: &Self) -> bool {
        self.package_id == other.package_id
    }
}

impl Eq for App {}

impl Hash for App {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.package_id.hash(state);
    }
}
