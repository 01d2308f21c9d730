//! Static analysis and validation of the parsed AST.
//!
//! Checks for duplicate names, reserved names, and out-of-range field values
//! before the descriptor is resolved. References are not checked here: a
//! dangling reference is a resolution error, reported by the resolver.

use std::collections::HashSet;

use stackwire_common::constants;
use stackwire_common::error::{Result, StackwireError};

use super::ast::{Descriptor, FunctionSpec, ResourceSpec, RouterSpec, TableSpec};
use super::template::RESERVED_NAMES;
use crate::identity;

/// Validates a parsed descriptor for semantic correctness.
///
/// # Checks performed
///
/// 1. No duplicate resource names, and no two names that map to the same
///    runtime name.
/// 2. No resource uses a reserved interpolation name.
/// 3. No duplicate output names.
/// 4. Kind-specific values are in range and internally consistent.
///
/// # Errors
///
/// Returns a malformed-descriptor error if any check fails.
pub fn validate(descriptor: &Descriptor) -> Result<()> {
    tracing::info!("validating descriptor");
    check_resource_names(descriptor)?;
    check_output_names(descriptor)?;
    for resource in &descriptor.resources {
        match &resource.spec {
            ResourceSpec::Bucket(_) => {}
            ResourceSpec::Table(table) => check_table(&resource.name, table)?,
            ResourceSpec::Function(function) => check_function(&resource.name, function)?,
            ResourceSpec::Router(router) => check_router(&resource.name, router)?,
        }
    }
    Ok(())
}

fn invalid(message: String) -> StackwireError {
    StackwireError::malformed(message)
}

fn check_resource_names(descriptor: &Descriptor) -> Result<()> {
    let mut seen = HashSet::new();
    let mut runtime_names: Vec<(String, &str)> = Vec::new();

    for resource in &descriptor.resources {
        let name = resource.name.as_str();
        if !seen.insert(name) {
            return Err(invalid(format!("duplicate resource name: \"{name}\"")));
        }
        if RESERVED_NAMES.contains(&name) {
            return Err(invalid(format!("resource name \"{name}\" is reserved")));
        }
        let sanitized = identity::sanitize(name);
        if let Some((_, other)) = runtime_names.iter().find(|(s, _)| *s == sanitized) {
            return Err(invalid(format!(
                "resources \"{other}\" and \"{name}\" map to the same runtime name"
            )));
        }
        runtime_names.push((sanitized, name));
    }
    Ok(())
}

fn check_output_names(descriptor: &Descriptor) -> Result<()> {
    let mut seen = HashSet::new();
    for output in &descriptor.outputs {
        if !seen.insert(output.name.as_str()) {
            return Err(invalid(format!("duplicate output name: \"{}\"", output.name)));
        }
    }
    Ok(())
}

fn check_table(name: &str, table: &TableSpec) -> Result<()> {
    let declared = |key: &str, role: &str| {
        if table.fields.contains_key(key) {
            Ok(())
        } else {
            Err(invalid(format!(
                "TABLE \"{name}\": {role} \"{key}\" is not a declared field"
            )))
        }
    };

    declared(&table.hash_key, "hash_key")?;
    if let Some(range_key) = &table.range_key {
        declared(range_key, "range_key")?;
    }
    for (index, key) in &table.indexes {
        declared(key, &format!("index {index} key"))?;
    }
    Ok(())
}

fn check_function(name: &str, function: &FunctionSpec) -> Result<()> {
    if !(constants::MIN_MEMORY_MB..=constants::MAX_MEMORY_MB).contains(&function.memory_mb) {
        return Err(invalid(format!(
            "FUNCTION \"{name}\": memory {} MB is outside {}..={} MB",
            function.memory_mb,
            constants::MIN_MEMORY_MB,
            constants::MAX_MEMORY_MB
        )));
    }
    if function.timeout_secs == 0 || function.timeout_secs > constants::MAX_TIMEOUT_SECS {
        return Err(invalid(format!(
            "FUNCTION \"{name}\": timeout {}s is outside 1..={}s",
            function.timeout_secs,
            constants::MAX_TIMEOUT_SECS
        )));
    }
    if function.handler.is_empty() {
        return Err(invalid(format!("FUNCTION \"{name}\": handler is empty")));
    }
    Ok(())
}

fn check_router(name: &str, router: &RouterSpec) -> Result<()> {
    if router.routes.is_empty() {
        return Err(invalid(format!("ROUTER \"{name}\" declares no routes")));
    }
    if let Some(bad) = router.routes.keys().find(|path| !path.starts_with('/')) {
        return Err(invalid(format!(
            "ROUTER \"{name}\": route \"{bad}\" must start with '/'"
        )));
    }
    Ok(())
}
