//! Provisioning seam.
//!
//! The resolver never provisions anything. An [`Executor`] takes a finished
//! [`Resolution`] and reports a status per resource. [`PlanExecutor`] is the
//! dry-run implementation used by `stackwire plan`.

use std::fmt;

use serde::{Deserialize, Serialize};
use stackwire_common::error::Result;
use stackwire_common::types::{RemovalPolicy, ResourceKind};

use crate::manifest::Resolution;

/// Outcome of provisioning one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "reason")]
pub enum ProvisionState {
    /// Would be provisioned; nothing was changed.
    Planned,
    /// Provisioned by the executor.
    Provisioned,
    /// Provisioning failed.
    Failed(String),
}

impl fmt::Display for ProvisionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Planned => write!(f, "planned"),
            Self::Provisioned => write!(f, "provisioned"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Status reported for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionStatus {
    /// Logical name.
    pub resource: String,
    /// Resource kind.
    pub kind: ResourceKind,
    /// Runtime identity.
    pub identity: String,
    /// Whether the resource survives app removal.
    pub retained_on_removal: bool,
    /// Outcome.
    pub state: ProvisionState,
}

/// Provisions a resolved descriptor against a platform.
pub trait Executor {
    /// Provisions every resource in `resolution`, in materialization order.
    ///
    /// # Errors
    ///
    /// Returns an error if the executor cannot run at all. Per-resource
    /// failures are reported as [`ProvisionState::Failed`].
    fn provision(&self, resolution: &Resolution) -> Result<Vec<ProvisionStatus>>;
}

/// Whether `kind` survives app removal under `policy`.
pub const fn retained_on_removal(policy: RemovalPolicy, kind: ResourceKind) -> bool {
    match policy {
        RemovalPolicy::Remove => false,
        RemovalPolicy::Retain => matches!(kind, ResourceKind::Bucket | ResourceKind::Table),
        RemovalPolicy::RetainAll => true,
    }
}

/// Dry-run executor: reports every resource as planned.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanExecutor;

impl Executor for PlanExecutor {
    fn provision(&self, resolution: &Resolution) -> Result<Vec<ProvisionStatus>> {
        tracing::info!(
            app = %resolution.app,
            stage = %resolution.stage,
            resources = resolution.resources.len(),
            "planning resources"
        );
        Ok(resolution
            .resources
            .iter()
            .map(|r| ProvisionStatus {
                resource: r.name.clone(),
                kind: r.kind,
                identity: r.identity.clone(),
                retained_on_removal: retained_on_removal(resolution.removal, r.kind),
                state: ProvisionState::Planned,
            })
            .collect())
    }
}
