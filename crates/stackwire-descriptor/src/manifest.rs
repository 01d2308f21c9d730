//! Resolved resources and the output manifest.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stackwire_common::types::{Platform, RemovalPolicy, ResourceKind, Stage};

use crate::parser::ast::ResourceSpec;

/// Variable name to resolved value.
pub type EnvironmentMap = BTreeMap<String, String>;

/// Output name to resolved value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputManifest(BTreeMap<String, String>);

impl OutputManifest {
    pub(crate) fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let _ = self.0.insert(name.into(), value.into());
    }

    /// Returns the value of an output.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Iterates over output names in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterates over `(name, value)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of outputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the manifest has no outputs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A resource after materialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterializedResource {
    /// Logical name.
    pub name: String,
    /// Resource kind.
    pub kind: ResourceKind,
    /// Stage-scoped runtime identity.
    pub identity: String,
    /// Attributes other resources and outputs may reference.
    pub attributes: BTreeMap<String, String>,
    /// Resolved environment (functions only).
    pub environment: EnvironmentMap,
    /// Resolved route table (routers only).
    pub routes: BTreeMap<String, String>,
    /// Resolved redirect domains (routers only).
    pub redirects: Vec<String>,
    /// Resources this one is granted access to.
    pub links: Vec<String>,
    /// Declared configuration, for the executor.
    pub spec: ResourceSpec,
}

impl MaterializedResource {
    /// Returns an attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// The result of a successful resolution: every resource materialized in
/// order, and the output manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// App name.
    pub app: String,
    /// Stage the descriptor was resolved for.
    pub stage: Stage,
    /// Target platform.
    pub platform: Platform,
    /// Platform region.
    pub region: String,
    /// Removal policy for the executor.
    pub removal: RemovalPolicy,
    /// Resources in materialization order.
    pub resources: Vec<MaterializedResource>,
    /// Output manifest.
    pub outputs: OutputManifest,
}

impl Resolution {
    /// Logical names in materialization order.
    #[must_use]
    pub fn order(&self) -> Vec<&str> {
        self.resources.iter().map(|r| r.name.as_str()).collect()
    }

    /// Looks up a materialized resource by logical name.
    #[must_use]
    pub fn resource(&self, name: &str) -> Option<&MaterializedResource> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// The output manifest.
    #[must_use]
    pub const fn manifest(&self) -> &OutputManifest {
        &self.outputs
    }
}
