//! System-wide constants and defaults.

/// Descriptor file looked up when none is given.
pub const DEFAULT_DESCRIPTOR_FILE: &str = "stackwire.stk";

/// Stage used when neither the CLI, the environment, nor the descriptor
/// names one.
pub const DEFAULT_STAGE: &str = "dev";

/// Environment variable consulted for the stage.
pub const STAGE_ENV_VAR: &str = "STACKWIRE_STAGE";

/// Default function runtime.
pub const DEFAULT_RUNTIME: &str = "provided.al2023";

/// Default function memory in megabytes.
pub const DEFAULT_MEMORY_MB: u32 = 1024;

/// Minimum function memory in megabytes.
pub const MIN_MEMORY_MB: u32 = 128;

/// Maximum function memory in megabytes.
pub const MAX_MEMORY_MB: u32 = 10_240;

/// Default function timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u32 = 20;

/// Maximum function timeout in seconds.
pub const MAX_TIMEOUT_SECS: u32 = 900;

/// Maximum length of a bucket name.
pub const MAX_BUCKET_NAME_LEN: usize = 63;

/// Number of hex digits in the bucket name suffix.
pub const BUCKET_SUFFIX_LEN: usize = 8;

/// Default AWS region when the descriptor names none.
pub const DEFAULT_REGION: &str = "us-east-1";
