//! Stage-scoped runtime identities and platform-generated attributes.
//!
//! Identities are pure functions of the app name, the stage and the logical
//! resource name, so resolving the same descriptor twice yields the same
//! names.

use sha2::{Digest, Sha256};
use stackwire_common::constants::{BUCKET_SUFFIX_LEN, MAX_BUCKET_NAME_LEN};
use stackwire_common::types::{Platform, ResourceKind, Stage};

/// Lower-cases `name` and replaces every character outside `[a-z0-9-]`
/// with `-`.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Returns the runtime identity of a resource: `{app}-{stage}-{name}`.
///
/// Bucket names live in a global namespace, so buckets additionally get a
/// short hash suffix and are kept within the platform's length limit.
pub fn runtime_identity(app: &str, stage: &Stage, name: &str, kind: ResourceKind) -> String {
    let base = sanitize(&format!("{app}-{stage}-{name}"));
    if kind != ResourceKind::Bucket {
        return base;
    }

    let suffix = hash_suffix(&format!("{app}/{stage}/{name}"));
    let max_base = MAX_BUCKET_NAME_LEN - BUCKET_SUFFIX_LEN - 1;
    let truncated = base[..base.len().min(max_base)].trim_end_matches('-');
    format!("{truncated}-{suffix}")
}

fn hash_suffix(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    digest
        .iter()
        .take(BUCKET_SUFFIX_LEN / 2)
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// ARN of a bucket, on platforms that have one.
pub fn bucket_arn(platform: Platform, identity: &str) -> Option<String> {
    match platform {
        Platform::Aws => Some(format!("arn:aws:s3:::{identity}")),
        Platform::Cloudflare => None,
    }
}

/// Public URL of a function.
pub fn function_url(platform: Platform, region: &str, identity: &str) -> String {
    match platform {
        Platform::Aws => format!("https://{identity}.lambda-url.{region}.on.aws/"),
        Platform::Cloudflare => format!("https://{identity}.workers.dev/"),
    }
}

/// URL of a router that has no custom domain.
pub fn router_default_url(platform: Platform, identity: &str) -> String {
    match platform {
        Platform::Aws => format!("https://{identity}.cloudfront.net"),
        Platform::Cloudflare => format!("https://{identity}.workers.dev"),
    }
}
