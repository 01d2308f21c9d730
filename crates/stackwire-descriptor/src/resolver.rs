//! Descriptor resolution.
//!
//! Turns a loaded [`Descriptor`] into a [`Resolution`] for one stage:
//! builds the reference graph, orders resources, materializes each one,
//! assembles function environments and binds the declared outputs.
//!
//! Resolution is all-or-nothing. Any error aborts the pass and nothing
//! partial is returned.

use std::collections::{BTreeMap, HashMap};

use stackwire_common::error::{ResolutionError, Result};
use stackwire_common::types::Stage;

use crate::graph::DependencyGraph;
use crate::identity;
use crate::manifest::{EnvironmentMap, MaterializedResource, OutputManifest, Resolution};
use crate::parser::ast::{
    AppDecl, Descriptor, OutputBinding, Reference, ResourceDefinition, ResourceSpec, Segment,
    Value,
};
use crate::secrets::Secrets;

/// Holder name used in errors for references made by the shared
/// `ENVIRONMENT` block.
const SHARED_ENVIRONMENT: &str = "ENVIRONMENT";

/// Resolves a descriptor for `stage`.
///
/// Resources are materialized in rank order (see
/// [`DependencyGraph::resolve_order`]). A secret missing from `secrets`
/// resolves to an empty string; the variable that uses it is kept.
///
/// # Errors
///
/// - [`ResolutionError::DanglingReference`] if a resource, the shared
///   environment, or an output references an undeclared resource.
/// - [`ResolutionError::Cycle`] if resources depend on each other in a loop.
/// - [`ResolutionError::UnresolvedReference`] if a resource references an
///   attribute its target does not expose.
/// - [`ResolutionError::UnresolvedOutput`] if an output does.
pub fn resolve(descriptor: &Descriptor, stage: &Stage, secrets: &Secrets) -> Result<Resolution> {
    tracing::info!(
        app = %descriptor.app.name,
        stage = %stage,
        resources = descriptor.resources.len(),
        "resolving descriptor"
    );

    let graph = build_graph(descriptor)?;
    check_output_targets(descriptor)?;
    let order = graph.resolve_order()?;
    tracing::debug!(?order, "materialization order");

    for name in missing_secrets(descriptor, secrets) {
        tracing::warn!(secret = %name, "secret is not set; using an empty value");
    }

    let definitions: HashMap<&str, &ResourceDefinition> = descriptor
        .resources
        .iter()
        .map(|r| (r.name.as_str(), r))
        .collect();
    let context = Context {
        app: &descriptor.app,
        stage,
        secrets,
    };

    let mut materialized: Vec<MaterializedResource> = Vec::with_capacity(order.len());
    for name in &order {
        if let Some(definition) = definitions.get(name.as_str()) {
            let resource = context.materialize(definition, &descriptor.environment, &materialized)?;
            tracing::debug!(
                resource = %resource.name,
                kind = %resource.kind,
                identity = %resource.identity,
                "materialized resource"
            );
            materialized.push(resource);
        }
    }

    let outputs = context.bind_outputs(&descriptor.outputs, &materialized)?;
    tracing::info!(outputs = outputs.len(), "descriptor resolved");

    Ok(Resolution {
        app: descriptor.app.name.clone(),
        stage: stage.clone(),
        platform: descriptor.app.home,
        region: descriptor.app.region.clone(),
        removal: descriptor.app.removal,
        resources: materialized,
        outputs,
    })
}

/// Builds the reference graph. Functions also depend on everything the
/// shared environment references.
fn build_graph(descriptor: &Descriptor) -> Result<DependencyGraph> {
    let mut graph = DependencyGraph::new();
    let nodes: HashMap<&str, _> = descriptor
        .resources
        .iter()
        .map(|r| (r.name.as_str(), graph.add_resource(&r.name)))
        .collect();

    let lookup = |holder: &str, target: &str| {
        nodes
            .get(target)
            .copied()
            .ok_or_else(|| ResolutionError::DanglingReference {
                resource: holder.to_owned(),
                target: target.to_owned(),
            })
    };

    let shared: Vec<&str> = descriptor
        .environment
        .values()
        .flat_map(Value::references)
        .map(|r| r.target.as_str())
        .collect();
    for target in &shared {
        let _ = lookup(SHARED_ENVIRONMENT, target)?;
    }

    for resource in &descriptor.resources {
        let dependent = lookup(&resource.name, &resource.name)?;
        let inherited: &[&str] = match resource.spec {
            ResourceSpec::Function(_) => &shared,
            _ => &[],
        };
        for target in resource.dependency_names().into_iter().chain(inherited.iter().copied()) {
            let dependency = lookup(&resource.name, target)?;
            graph.add_dependency(dependent, dependency);
        }
    }

    Ok(graph)
}

/// Secrets the descriptor names that `secrets` does not provide, each once.
fn missing_secrets(descriptor: &Descriptor, secrets: &Secrets) -> Vec<String> {
    descriptor
        .secret_names()
        .into_iter()
        .filter(|name| secrets.get(name).is_none())
        .collect()
}

fn check_output_targets(descriptor: &Descriptor) -> Result<()> {
    for output in &descriptor.outputs {
        for reference in output.value.references() {
            if descriptor.resource(&reference.target).is_none() {
                return Err(ResolutionError::DanglingReference {
                    resource: format!("output \"{}\"", output.name),
                    target: reference.target.clone(),
                }
                .into());
            }
        }
    }
    Ok(())
}

struct Context<'a> {
    app: &'a AppDecl,
    stage: &'a Stage,
    secrets: &'a Secrets,
}

impl Context<'_> {
    fn materialize(
        &self,
        definition: &ResourceDefinition,
        shared_env: &BTreeMap<String, Value>,
        done: &[MaterializedResource],
    ) -> Result<MaterializedResource> {
        let platform = self.app.home;
        let identity = identity::runtime_identity(
            &self.app.name,
            self.stage,
            &definition.name,
            definition.kind(),
        );
        let mut resource = MaterializedResource {
            name: definition.name.clone(),
            kind: definition.kind(),
            identity: identity.clone(),
            attributes: BTreeMap::new(),
            environment: EnvironmentMap::new(),
            routes: BTreeMap::new(),
            redirects: Vec::new(),
            links: Vec::new(),
            spec: definition.spec.clone(),
        };
        let _ = resource.attributes.insert("name".into(), identity.clone());

        let evaluate = |value: &Value| {
            self.evaluate(value, done)
                .map_err(|r| ResolutionError::UnresolvedReference {
                    resource: definition.name.clone(),
                    target: r.target,
                    attribute: r.attribute,
                })
        };

        match &definition.spec {
            ResourceSpec::Bucket(_) => {
                if let Some(arn) = identity::bucket_arn(platform, &identity) {
                    let _ = resource.attributes.insert("arn".into(), arn);
                }
            }
            ResourceSpec::Table(_) => {}
            ResourceSpec::Function(function) => {
                if function.url {
                    let url = identity::function_url(platform, &self.app.region, &identity);
                    let _ = resource.attributes.insert("url".into(), url);
                }
                let mut merged: BTreeMap<&str, &Value> = shared_env
                    .iter()
                    .map(|(k, v)| (k.as_str(), v))
                    .collect();
                merged.extend(function.env.iter().map(|(k, v)| (k.as_str(), v)));
                for (key, value) in merged {
                    let _ = resource.environment.insert(key.to_owned(), evaluate(value)?);
                }
                resource.links.clone_from(&function.link);
            }
            ResourceSpec::Router(router) => {
                for (path, upstream) in &router.routes {
                    let _ = resource.routes.insert(path.clone(), evaluate(upstream)?);
                }
                resource.redirects = router
                    .redirects
                    .iter()
                    .map(&evaluate)
                    .collect::<std::result::Result<_, _>>()?;
                let url = match &router.domain {
                    Some(domain) => {
                        let domain = evaluate(domain)?;
                        let url = format!("https://{domain}");
                        let _ = resource.attributes.insert("domain".into(), domain);
                        url
                    }
                    None => identity::router_default_url(platform, &identity),
                };
                let _ = resource.attributes.insert("url".into(), url);
            }
        }

        Ok(resource)
    }

    fn bind_outputs(
        &self,
        outputs: &[OutputBinding],
        done: &[MaterializedResource],
    ) -> Result<OutputManifest> {
        let mut manifest = OutputManifest::default();
        for output in outputs {
            let value = self.evaluate(&output.value, done).map_err(|r| {
                ResolutionError::UnresolvedOutput {
                    output: output.name.clone(),
                    target: r.target,
                    attribute: r.attribute,
                }
            })?;
            manifest.insert(&output.name, value);
        }
        Ok(manifest)
    }

    /// Renders a value. Fails with the first reference whose attribute is
    /// not materialized.
    fn evaluate(
        &self,
        value: &Value,
        done: &[MaterializedResource],
    ) -> std::result::Result<String, Reference> {
        let mut rendered = String::new();
        for segment in &value.segments {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Stage => rendered.push_str(self.stage.as_str()),
                Segment::App => rendered.push_str(&self.app.name),
                Segment::Secret(name) => {
                    rendered.push_str(self.secrets.get(name).unwrap_or_default());
                }
                Segment::Reference(reference) => {
                    let attribute = done
                        .iter()
                        .find(|r| r.name == reference.target)
                        .and_then(|r| r.attribute(&reference.attribute))
                        .ok_or_else(|| reference.clone())?;
                    rendered.push_str(attribute);
                }
            }
        }
        Ok(rendered)
    }
}
