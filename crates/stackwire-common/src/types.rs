//! Domain primitive types used across the stackwire workspace.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StackwireError};

/// A deployment environment such as `dev` or `production`.
///
/// Stages scope every generated runtime identity, so two stages of the same
/// descriptor never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Stage(String);

impl Stage {
    /// Creates a stage from its name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or contains characters other
    /// than lowercase ASCII letters, digits and `-`. Runtime identities are
    /// lower-cased with `_` mapped to `-`, so `Dev` or `qa_1` would share
    /// identities with `dev` or `qa-1`.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(StackwireError::malformed("stage name must not be empty"));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(StackwireError::malformed(format!(
                "invalid stage name: \"{name}\" (use lowercase letters, digits and '-')"
            )));
        }
        Ok(Self(name))
    }

    /// Returns the stage name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Stage {
    type Err = StackwireError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Stage {
    type Error = StackwireError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Stage> for String {
    fn from(stage: Stage) -> Self {
        stage.0
    }
}

/// What happens to provisioned resources when the app is removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemovalPolicy {
    /// Remove every resource.
    Remove,
    /// Keep stateful resources (buckets and tables).
    #[default]
    Retain,
    /// Keep every resource.
    RetainAll,
}

impl FromStr for RemovalPolicy {
    type Err = StackwireError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "remove" => Ok(Self::Remove),
            "retain" => Ok(Self::Retain),
            "retain-all" => Ok(Self::RetainAll),
            other => Err(StackwireError::malformed(format!(
                "unknown removal policy \"{other}\" (expected remove, retain, or retain-all)"
            ))),
        }
    }
}

impl fmt::Display for RemovalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remove => write!(f, "remove"),
            Self::Retain => write!(f, "retain"),
            Self::RetainAll => write!(f, "retain-all"),
        }
    }
}

/// Cloud platform the descriptor targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Amazon Web Services.
    #[default]
    Aws,
    /// Cloudflare.
    Cloudflare,
}

impl FromStr for Platform {
    type Err = StackwireError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "aws" => Ok(Self::Aws),
            "cloudflare" => Ok(Self::Cloudflare),
            other => Err(StackwireError::malformed(format!(
                "unknown platform \"{other}\" (expected aws or cloudflare)"
            ))),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aws => write!(f, "aws"),
            Self::Cloudflare => write!(f, "cloudflare"),
        }
    }
}

/// Kind of a declared resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceKind {
    /// Object storage bucket.
    Bucket,
    /// Key-value table.
    Table,
    /// Serverless compute function.
    Function,
    /// HTTP router with an optional custom domain.
    Router,
}

impl FromStr for ResourceKind {
    type Err = StackwireError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "BUCKET" => Ok(Self::Bucket),
            "TABLE" => Ok(Self::Table),
            "FUNCTION" => Ok(Self::Function),
            "ROUTER" => Ok(Self::Router),
            other => Err(StackwireError::malformed(format!(
                "unknown resource kind: {other}"
            ))),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bucket => write!(f, "BUCKET"),
            Self::Table => write!(f, "TABLE"),
            Self::Function => write!(f, "FUNCTION"),
            Self::Router => write!(f, "ROUTER"),
        }
    }
}
