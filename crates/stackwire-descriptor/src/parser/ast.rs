//! Abstract Syntax Tree for `.stk` deployment descriptors.
//!
//! The tree is a plain serializable value: a [`Descriptor`] holds everything
//! needed to resolve one deployment, and carries no platform state.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use stackwire_common::types::{Platform, RemovalPolicy, ResourceKind, Stage};

/// Root node of a parsed `.stk` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    /// App identity and platform settings.
    pub app: AppDecl,
    /// Variables merged into every function's environment.
    pub environment: BTreeMap<String, Value>,
    /// Resource definitions in declaration order.
    pub resources: Vec<ResourceDefinition>,
    /// Output bindings in declaration order.
    pub outputs: Vec<OutputBinding>,
}

impl Descriptor {
    /// Looks up a resource by logical name.
    #[must_use]
    pub fn resource(&self, name: &str) -> Option<&ResourceDefinition> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Returns every secret name interpolated anywhere in the descriptor.
    #[must_use]
    pub fn secret_names(&self) -> BTreeSet<String> {
        let resource_values = self.resources.iter().flat_map(ResourceDefinition::values);
        self.environment
            .values()
            .chain(resource_values)
            .chain(self.outputs.iter().map(|o| &o.value))
            .flat_map(Value::secret_names)
            .map(str::to_owned)
            .collect()
    }
}

/// The `APP` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDecl {
    /// App name; prefixes every runtime identity.
    pub name: String,
    /// Removal policy handed to the executor.
    pub removal: RemovalPolicy,
    /// Target platform.
    pub home: Platform,
    /// Platform region.
    pub region: String,
    /// Stage used when the caller does not pick one.
    pub stage: Option<Stage>,
}

/// A `RESOURCE` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDefinition {
    /// Logical name, unique within the descriptor.
    pub name: String,
    /// Kind-specific configuration.
    pub spec: ResourceSpec,
}

impl ResourceDefinition {
    /// Returns the resource kind.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        match self.spec {
            ResourceSpec::Bucket(_) => ResourceKind::Bucket,
            ResourceSpec::Table(_) => ResourceKind::Table,
            ResourceSpec::Function(_) => ResourceKind::Function,
            ResourceSpec::Router(_) => ResourceKind::Router,
        }
    }

    /// Returns every value expression held by the resource's fields.
    pub fn values(&self) -> Box<dyn Iterator<Item = &Value> + '_> {
        match &self.spec {
            ResourceSpec::Bucket(_) | ResourceSpec::Table(_) => Box::new(std::iter::empty()),
            ResourceSpec::Function(f) => Box::new(f.env.values()),
            ResourceSpec::Router(r) => Box::new(
                r.routes
                    .values()
                    .chain(r.domain.iter())
                    .chain(r.redirects.iter()),
            ),
        }
    }

    /// Returns the names of every resource this one depends on, through
    /// references or links, in first-seen order without duplicates.
    #[must_use]
    pub fn dependency_names(&self) -> Vec<&str> {
        let links: &[String] = match &self.spec {
            ResourceSpec::Function(f) => &f.link,
            _ => &[],
        };
        let mut names: Vec<&str> = Vec::new();
        let referenced = self
            .values()
            .flat_map(Value::references)
            .map(|r| r.target.as_str());
        for name in referenced.chain(links.iter().map(String::as_str)) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

/// Kind-specific resource configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceSpec {
    /// Object storage bucket.
    Bucket(BucketSpec),
    /// Key-value table.
    Table(TableSpec),
    /// Serverless function.
    Function(FunctionSpec),
    /// HTTP router.
    Router(RouterSpec),
}

/// `BUCKET` fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSpec {
    /// Keep prior object versions.
    pub versioning: bool,
    /// Allow anonymous reads.
    pub public: bool,
}

/// Attribute type of a table field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string.
    String,
    /// Number.
    Number,
    /// Raw bytes.
    Binary,
}

/// `TABLE` fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    /// Declared key fields and their types.
    pub fields: BTreeMap<String, FieldType>,
    /// Partition key of the primary index.
    pub hash_key: String,
    /// Sort key of the primary index.
    pub range_key: Option<String>,
    /// Global secondary indexes, by index name, mapped to their hash key.
    pub indexes: BTreeMap<String, String>,
}

/// Instruction set of a function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Architecture {
    /// 64-bit x86.
    #[default]
    X86_64,
    /// 64-bit ARM.
    Arm64,
}

/// Log line encoding of a function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Plain text.
    #[default]
    Text,
    /// Structured JSON.
    Json,
}

/// `FUNCTION` fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSpec {
    /// Entry point inside the bundle.
    pub handler: String,
    /// Runtime identifier.
    pub runtime: String,
    /// Path of the prebuilt deployable artifact.
    pub bundle: Option<String>,
    /// Memory in megabytes.
    pub memory_mb: u32,
    /// Timeout in seconds.
    pub timeout_secs: u32,
    /// Instruction set.
    pub architecture: Architecture,
    /// Expose a public function URL.
    pub url: bool,
    /// Allow credentialed CORS requests on the function URL.
    pub cors_allow_credentials: bool,
    /// Log retention, e.g. `1 week` or `forever`.
    pub log_retention: Option<String>,
    /// Log encoding.
    pub log_format: LogFormat,
    /// Function-specific environment; overrides the shared environment.
    pub env: BTreeMap<String, Value>,
    /// Resources the function is granted access to.
    pub link: Vec<String>,
}

/// `ROUTER` fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterSpec {
    /// Path pattern to upstream URL.
    pub routes: BTreeMap<String, Value>,
    /// Custom domain.
    pub domain: Option<Value>,
    /// Domains redirected to the custom domain.
    pub redirects: Vec<Value>,
    /// Invalidate the CDN cache on deploy.
    pub invalidation: bool,
}

/// An `OUTPUT` binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputBinding {
    /// Output name.
    pub name: String,
    /// Expression producing the output value.
    pub value: Value,
}

/// A lazy pointer to an attribute another resource gets at materialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    /// Logical name of the referenced resource.
    pub target: String,
    /// Attribute of the referenced resource.
    pub attribute: String,
}

impl Reference {
    /// Creates a reference to `target.attribute`.
    pub fn new(target: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            attribute: attribute.into(),
        }
    }
}

/// One piece of a [`Value`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    /// Verbatim text.
    Literal(String),
    /// `${stage}`
    Stage,
    /// `${app}`
    App,
    /// `${secret.NAME}`
    Secret(String),
    /// `${target.attribute}` or a bare `target.attribute`.
    Reference(Reference),
}

/// A value expression: literal text interleaved with stage, app, secret and
/// reference segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Value {
    /// Segments concatenated in order.
    pub segments: Vec<Segment>,
}

impl Value {
    /// A value holding only static text.
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::Literal(text.into())],
        }
    }

    /// A value holding a single reference.
    pub fn reference(target: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::Reference(Reference::new(target, attribute))],
        }
    }

    /// Iterates over the references in this value.
    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Reference(r) => Some(r),
            _ => None,
        })
    }

    /// Iterates over the secret names in this value.
    pub fn secret_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Secret(name) => Some(name.as_str()),
            _ => None,
        })
    }
}
