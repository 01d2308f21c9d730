//! `.stk` descriptor parser.
//!
//! Transforms raw `.stk` text into a validated [`Descriptor`] through
//! lexing, parsing, and static analysis phases.

pub mod ast;
pub mod lexer;
pub mod template;
pub mod units;
pub mod validator;

use std::collections::BTreeMap;
use std::path::Path;

use stackwire_common::constants;
use stackwire_common::error::{Result, StackwireError};
use stackwire_common::types::{ResourceKind, Stage};

use self::ast::{
    AppDecl, Architecture, BucketSpec, Descriptor, FieldType, FunctionSpec, LogFormat,
    OutputBinding, ResourceDefinition, ResourceSpec, RouterSpec, TableSpec, Value,
};
use self::lexer::Token;

/// Cursor into a token stream for recursive-descent parsing.
struct TokenCursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    const fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect_identifier(&mut self) -> Result<String> {
        match self.advance() {
            Some(Token::Identifier(s)) => Ok(s.clone()),
            other => Err(parse_err(format!("expected identifier, got {other:?}"))),
        }
    }

    fn expect_token(&mut self, expected: &Token) -> Result<()> {
        match self.advance() {
            Some(tok) if tok == expected => Ok(()),
            other => Err(parse_err(format!("expected {expected:?}, got {other:?}"))),
        }
    }

    fn expect_string(&mut self) -> Result<String> {
        match self.advance() {
            Some(Token::StringLiteral(s)) => Ok(s.clone()),
            other => Err(parse_err(format!("expected string literal, got {other:?}"))),
        }
    }

    const fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }
}

fn parse_err(message: String) -> StackwireError {
    StackwireError::malformed(message)
}

fn unknown_property(context: &str, key: &str) -> StackwireError {
    parse_err(format!("unknown {context} property: {key}"))
}

fn missing_field(kind: ResourceKind, name: &str, field: &str) -> StackwireError {
    parse_err(format!("{kind} \"{name}\" is missing required field \"{field}\""))
}

fn skip_optional_comma(cursor: &mut TokenCursor<'_>) {
    if cursor.peek() == Some(&Token::Comma) {
        let _ = cursor.advance();
    }
}

/// Parses a descriptor from its source text.
///
/// # Errors
///
/// Returns a malformed-descriptor error if the input contains syntax errors
/// or fails validation.
pub fn load_descriptor(input: &str) -> Result<Descriptor> {
    tracing::info!("parsing descriptor");
    let tokens = lexer::tokenize(input)?;
    let mut cursor = TokenCursor::new(&tokens);
    let descriptor = parse_file(&mut cursor)?;
    validator::validate(&descriptor)?;
    tracing::info!(
        app = %descriptor.app.name,
        resources = descriptor.resources.len(),
        outputs = descriptor.outputs.len(),
        "descriptor loaded"
    );
    Ok(descriptor)
}

/// Reads and parses a descriptor file.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read, or a malformed-descriptor
/// error if its contents do not parse or validate.
pub fn load_descriptor_file(path: &Path) -> Result<Descriptor> {
    tracing::info!(path = %path.display(), "loading descriptor file");
    let content = std::fs::read_to_string(path).map_err(|e| StackwireError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    load_descriptor(&content)
}

fn parse_file(cursor: &mut TokenCursor<'_>) -> Result<Descriptor> {
    let mut app = None;
    let mut environment = None;
    let mut resources = Vec::new();
    let mut outputs = Vec::new();

    while let Some(tok) = cursor.peek() {
        match tok {
            Token::App => {
                if app.replace(parse_app(cursor)?).is_some() {
                    return Err(parse_err("duplicate APP block".into()));
                }
            }
            Token::Environment => {
                let _ = cursor.advance();
                let env = parse_env_map(cursor, "ENVIRONMENT block")?;
                if environment.replace(env).is_some() {
                    return Err(parse_err("duplicate ENVIRONMENT block".into()));
                }
            }
            Token::Resource => resources.push(parse_resource(cursor)?),
            Token::Output => outputs.push(parse_output(cursor)?),
            other => {
                return Err(parse_err(format!(
                    "expected APP, ENVIRONMENT, RESOURCE, or OUTPUT at top level, got {other:?}"
                )));
            }
        }
    }

    let app = app.ok_or_else(|| parse_err("descriptor has no APP block".into()))?;
    Ok(Descriptor {
        app,
        environment: environment.unwrap_or_default(),
        resources,
        outputs,
    })
}

/// Parses `{ key = ... }` and hands each property to `on_property`.
/// Rejects a property set twice in the same block.
fn parse_block<'a>(
    cursor: &mut TokenCursor<'a>,
    context: &str,
    mut on_property: impl FnMut(&mut TokenCursor<'a>, &str) -> Result<()>,
) -> Result<()> {
    cursor.expect_token(&Token::BraceOpen)?;
    let mut seen: Vec<String> = Vec::new();

    while cursor.peek() != Some(&Token::BraceClose) {
        if cursor.at_end() {
            return Err(parse_err(format!("unexpected end of input inside {context}")));
        }
        let key = cursor.expect_identifier()?;
        if seen.contains(&key) {
            return Err(parse_err(format!("property \"{key}\" set twice in {context}")));
        }
        cursor.expect_token(&Token::Equals)?;
        on_property(cursor, &key)?;
        seen.push(key);
        skip_optional_comma(cursor);
    }

    cursor.expect_token(&Token::BraceClose)
}

fn parse_app(cursor: &mut TokenCursor<'_>) -> Result<AppDecl> {
    cursor.expect_token(&Token::App)?;
    let name = cursor.expect_identifier()?;
    let mut app = AppDecl {
        name,
        removal: Default::default(),
        home: Default::default(),
        region: constants::DEFAULT_REGION.into(),
        stage: None,
    };

    parse_block(cursor, "APP block", |cursor, key| {
        match key {
            "removal" => app.removal = cursor.expect_string()?.parse()?,
            "home" => app.home = cursor.expect_string()?.parse()?,
            "region" => app.region = cursor.expect_string()?,
            "stage" => app.stage = Some(Stage::new(cursor.expect_string()?)?),
            _ => return Err(unknown_property("APP", key)),
        }
        Ok(())
    })?;

    Ok(app)
}

fn parse_resource(cursor: &mut TokenCursor<'_>) -> Result<ResourceDefinition> {
    cursor.expect_token(&Token::Resource)?;
    let name = cursor.expect_identifier()?;
    let kind: ResourceKind = cursor.expect_identifier()?.parse()?;

    let spec = match kind {
        ResourceKind::Bucket => ResourceSpec::Bucket(parse_bucket(cursor)?),
        ResourceKind::Table => ResourceSpec::Table(parse_table(cursor, &name)?),
        ResourceKind::Function => ResourceSpec::Function(parse_function(cursor, &name)?),
        ResourceKind::Router => ResourceSpec::Router(parse_router(cursor, &name)?),
    };

    Ok(ResourceDefinition { name, spec })
}

fn parse_bucket(cursor: &mut TokenCursor<'_>) -> Result<BucketSpec> {
    let mut spec = BucketSpec::default();
    parse_block(cursor, "BUCKET block", |cursor, key| {
        match key {
            "versioning" => spec.versioning = parse_bool(cursor)?,
            "public" => spec.public = parse_bool(cursor)?,
            _ => return Err(unknown_property("BUCKET", key)),
        }
        Ok(())
    })?;
    Ok(spec)
}

fn parse_table(cursor: &mut TokenCursor<'_>, name: &str) -> Result<TableSpec> {
    let mut fields = None;
    let mut hash_key = None;
    let mut range_key = None;
    let mut indexes = BTreeMap::new();

    parse_block(cursor, "TABLE block", |cursor, key| {
        match key {
            "fields" => {
                fields = Some(parse_map(
                    cursor,
                    "fields",
                    TokenCursor::expect_identifier,
                    parse_field_type,
                )?);
            }
            "hash_key" => hash_key = Some(cursor.expect_string()?),
            "range_key" => range_key = Some(cursor.expect_string()?),
            "indexes" => {
                indexes = parse_map(
                    cursor,
                    "indexes",
                    TokenCursor::expect_identifier,
                    TokenCursor::expect_string,
                )?;
            }
            _ => return Err(unknown_property("TABLE", key)),
        }
        Ok(())
    })?;

    Ok(TableSpec {
        fields: fields.ok_or_else(|| missing_field(ResourceKind::Table, name, "fields"))?,
        hash_key: hash_key.ok_or_else(|| missing_field(ResourceKind::Table, name, "hash_key"))?,
        range_key,
        indexes,
    })
}

fn parse_function(cursor: &mut TokenCursor<'_>, name: &str) -> Result<FunctionSpec> {
    let mut handler = None;
    let mut spec = FunctionSpec {
        handler: String::new(),
        runtime: constants::DEFAULT_RUNTIME.into(),
        bundle: None,
        memory_mb: constants::DEFAULT_MEMORY_MB,
        timeout_secs: constants::DEFAULT_TIMEOUT_SECS,
        architecture: Architecture::default(),
        url: false,
        cors_allow_credentials: false,
        log_retention: None,
        log_format: LogFormat::default(),
        env: BTreeMap::new(),
        link: Vec::new(),
    };

    parse_block(cursor, "FUNCTION block", |cursor, key| {
        match key {
            "handler" => handler = Some(cursor.expect_string()?),
            "runtime" => spec.runtime = cursor.expect_string()?,
            "bundle" => spec.bundle = Some(cursor.expect_string()?),
            "memory" => spec.memory_mb = parse_memory(cursor)?,
            "timeout" => spec.timeout_secs = parse_timeout(cursor)?,
            "architecture" => spec.architecture = parse_architecture(cursor)?,
            "url" => spec.url = parse_bool(cursor)?,
            "cors_allow_credentials" => spec.cors_allow_credentials = parse_bool(cursor)?,
            "log_retention" => spec.log_retention = Some(parse_retention(cursor)?),
            "log_format" => spec.log_format = parse_log_format(cursor)?,
            "env" => spec.env = parse_env_map(cursor, "env")?,
            "link" => spec.link = parse_list(cursor, TokenCursor::expect_identifier)?,
            _ => return Err(unknown_property("FUNCTION", key)),
        }
        Ok(())
    })?;

    spec.handler = handler.ok_or_else(|| missing_field(ResourceKind::Function, name, "handler"))?;
    Ok(spec)
}

fn parse_router(cursor: &mut TokenCursor<'_>, name: &str) -> Result<RouterSpec> {
    let mut routes = None;
    let mut spec = RouterSpec {
        routes: BTreeMap::new(),
        domain: None,
        redirects: Vec::new(),
        invalidation: false,
    };

    parse_block(cursor, "ROUTER block", |cursor, key| {
        match key {
            "routes" => {
                routes = Some(parse_map(
                    cursor,
                    "routes",
                    TokenCursor::expect_string,
                    parse_value,
                )?);
            }
            "domain" => spec.domain = Some(parse_value(cursor)?),
            "redirects" => spec.redirects = parse_list(cursor, parse_value)?,
            "invalidation" => spec.invalidation = parse_bool(cursor)?,
            _ => return Err(unknown_property("ROUTER", key)),
        }
        Ok(())
    })?;

    spec.routes = routes.ok_or_else(|| missing_field(ResourceKind::Router, name, "routes"))?;
    Ok(spec)
}

fn parse_output(cursor: &mut TokenCursor<'_>) -> Result<OutputBinding> {
    cursor.expect_token(&Token::Output)?;
    let name = cursor.expect_identifier()?;
    cursor.expect_token(&Token::Equals)?;
    let value = parse_value(cursor)?;
    Ok(OutputBinding { name, value })
}

/// A string template or a bare `target.attribute` reference.
fn parse_value(cursor: &mut TokenCursor<'_>) -> Result<Value> {
    match cursor.advance() {
        Some(Token::StringLiteral(s)) => template::parse_template(s),
        Some(Token::Identifier(target)) => {
            cursor.expect_token(&Token::Dot)?;
            let attribute = cursor.expect_identifier()?;
            Ok(Value::reference(target.clone(), attribute))
        }
        other => Err(parse_err(format!(
            "expected string or reference, got {other:?}"
        ))),
    }
}

fn parse_bool(cursor: &mut TokenCursor<'_>) -> Result<bool> {
    match cursor.advance() {
        Some(Token::True) => Ok(true),
        Some(Token::False) => Ok(false),
        other => Err(parse_err(format!("expected true or false, got {other:?}"))),
    }
}

fn parse_memory(cursor: &mut TokenCursor<'_>) -> Result<u32> {
    match cursor.advance() {
        Some(Token::StringLiteral(s)) => units::parse_memory_mb(s),
        Some(Token::Integer(n)) => {
            u32::try_from(*n).map_err(|_| parse_err(format!("memory value out of range: {n}")))
        }
        other => Err(parse_err(format!("expected memory size, got {other:?}"))),
    }
}

fn parse_timeout(cursor: &mut TokenCursor<'_>) -> Result<u32> {
    match cursor.advance() {
        Some(Token::StringLiteral(s)) => units::parse_duration_secs(s),
        Some(Token::Integer(n)) => {
            u32::try_from(*n).map_err(|_| parse_err(format!("timeout value out of range: {n}")))
        }
        other => Err(parse_err(format!("expected duration, got {other:?}"))),
    }
}

fn parse_retention(cursor: &mut TokenCursor<'_>) -> Result<String> {
    let retention = cursor.expect_string()?;
    if retention != "forever" {
        let _ = units::parse_duration_secs(&retention)?;
    }
    Ok(retention)
}

fn parse_architecture(cursor: &mut TokenCursor<'_>) -> Result<Architecture> {
    match cursor.expect_string()?.as_str() {
        "x86_64" => Ok(Architecture::X86_64),
        "arm64" => Ok(Architecture::Arm64),
        other => Err(parse_err(format!(
            "unknown architecture \"{other}\" (expected x86_64 or arm64)"
        ))),
    }
}

fn parse_log_format(cursor: &mut TokenCursor<'_>) -> Result<LogFormat> {
    match cursor.expect_string()?.as_str() {
        "text" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        other => Err(parse_err(format!(
            "unknown log format \"{other}\" (expected text or json)"
        ))),
    }
}

fn parse_field_type(cursor: &mut TokenCursor<'_>) -> Result<FieldType> {
    match cursor.expect_string()?.as_str() {
        "string" => Ok(FieldType::String),
        "number" => Ok(FieldType::Number),
        "binary" => Ok(FieldType::Binary),
        other => Err(parse_err(format!(
            "unknown field type \"{other}\" (expected string, number, or binary)"
        ))),
    }
}

fn parse_env_map(cursor: &mut TokenCursor<'_>, context: &str) -> Result<BTreeMap<String, Value>> {
    parse_map(cursor, context, TokenCursor::expect_identifier, parse_value)
}

fn parse_map<'a, V>(
    cursor: &mut TokenCursor<'a>,
    context: &str,
    mut parse_key: impl FnMut(&mut TokenCursor<'a>) -> Result<String>,
    mut parse_entry: impl FnMut(&mut TokenCursor<'a>) -> Result<V>,
) -> Result<BTreeMap<String, V>> {
    cursor.expect_token(&Token::BraceOpen)?;
    let mut map = BTreeMap::new();

    while cursor.peek() != Some(&Token::BraceClose) {
        if cursor.at_end() {
            return Err(parse_err(format!("unexpected end of input inside {context}")));
        }
        let key = parse_key(cursor)?;
        cursor.expect_token(&Token::Equals)?;
        let entry = parse_entry(cursor)?;
        if map.insert(key.clone(), entry).is_some() {
            return Err(parse_err(format!("duplicate key \"{key}\" in {context}")));
        }
        skip_optional_comma(cursor);
    }

    cursor.expect_token(&Token::BraceClose)?;
    Ok(map)
}

fn parse_list<'a, T>(
    cursor: &mut TokenCursor<'a>,
    mut parse_item: impl FnMut(&mut TokenCursor<'a>) -> Result<T>,
) -> Result<Vec<T>> {
    cursor.expect_token(&Token::BracketOpen)?;
    let mut items = Vec::new();

    while cursor.peek() != Some(&Token::BracketClose) {
        if cursor.at_end() {
            return Err(parse_err("unexpected end of input inside list".into()));
        }
        items.push(parse_item(cursor)?);
        skip_optional_comma(cursor);
    }

    cursor.expect_token(&Token::BracketClose)?;
    Ok(items)
}

#[cfg(test)]
mod tests {
    use stackwire_common::error::ConfigError;
    use stackwire_common::types::{Platform, RemovalPolicy};

    use super::ast::{Reference, Segment};
    use super::*;

    const APP: &str = "APP demo {}\n";

    fn parse(body: &str) -> Result<Descriptor> {
        load_descriptor(&format!("{APP}{body}"))
    }

    fn assert_malformed(result: Result<Descriptor>, needle: &str) {
        match result {
            Err(StackwireError::Config(ConfigError::Malformed { message })) => {
                assert!(message.contains(needle), "expected {needle:?} in {message:?}");
            }
            other => panic!("expected malformed error, got {other:?}"),
        }
    }

    #[test]
    fn parse_minimal_descriptor() {
        let descriptor = load_descriptor("APP demo {}").expect("should parse");
        assert_eq!(descriptor.app.name, "demo");
        assert_eq!(descriptor.app.removal, RemovalPolicy::Retain);
        assert_eq!(descriptor.app.home, Platform::Aws);
        assert_eq!(descriptor.app.region, "us-east-1");
        assert!(descriptor.app.stage.is_none());
        assert!(descriptor.resources.is_empty());
        assert!(descriptor.outputs.is_empty());
    }

    #[test]
    fn missing_app_block_fails() {
        assert_malformed(load_descriptor("RESOURCE a BUCKET {}"), "no APP block");
    }

    #[test]
    fn parse_app_settings() {
        let descriptor = load_descriptor(
            r#"APP pixel-collector-api {
    removal = "remove"
    home = "aws"
    region = "eu-west-1"
    stage = "production"
}"#,
        )
        .expect("should parse");
        assert_eq!(descriptor.app.name, "pixel-collector-api");
        assert_eq!(descriptor.app.removal, RemovalPolicy::Remove);
        assert_eq!(descriptor.app.region, "eu-west-1");
        assert_eq!(
            descriptor.app.stage.as_ref().map(Stage::as_str),
            Some("production")
        );
    }

    #[test]
    fn unknown_removal_policy_fails() {
        assert_malformed(
            load_descriptor(r#"APP demo { removal = "destroy" }"#),
            "unknown removal policy",
        );
    }

    #[test]
    fn unknown_kind_fails() {
        assert_malformed(parse("RESOURCE jobs QUEUE {}"), "unknown resource kind: QUEUE");
    }

    #[test]
    fn parse_bucket_flags() {
        let descriptor =
            parse("RESOURCE assets BUCKET { versioning = true }").expect("should parse");
        assert_eq!(
            descriptor.resources[0].spec,
            ResourceSpec::Bucket(BucketSpec {
                versioning: true,
                public: false,
            })
        );
    }

    #[test]
    fn parse_table() {
        let descriptor = parse(
            r#"RESOURCE auth_table TABLE {
    fields = { id = "string", username = "string" }
    hash_key = "id"
    indexes = { username_idx = "username" }
}"#,
        )
        .expect("should parse");
        let ResourceSpec::Table(table) = &descriptor.resources[0].spec else {
            panic!("expected table");
        };
        assert_eq!(table.fields.len(), 2);
        assert_eq!(table.fields.get("id"), Some(&FieldType::String));
        assert_eq!(table.hash_key, "id");
        assert!(table.range_key.is_none());
        assert_eq!(
            table.indexes.get("username_idx").map(String::as_str),
            Some("username")
        );
    }

    #[test]
    fn table_without_hash_key_fails() {
        assert_malformed(
            parse(r#"RESOURCE t TABLE { fields = { id = "string" } }"#),
            "missing required field \"hash_key\"",
        );
    }

    #[test]
    fn parse_function_with_all_properties() {
        let descriptor = parse(
            r#"RESOURCE assets BUCKET {}
RESOURCE api FUNCTION {
    runtime = "provided.al2023"
    handler = "bootstrap"
    bundle = "target/lambda/api"
    memory = "500 MB"
    timeout = "10 minutes"
    architecture = "arm64"
    url = true
    cors_allow_credentials = true
    log_retention = "1 week"
    log_format = "json"
    env = {
        BUCKET_NAME = assets.name
        LOG_LEVEL = "${secret.LOG_LEVEL}"
    }
    link = [assets]
}"#,
        )
        .expect("should parse");
        let ResourceSpec::Function(f) = &descriptor.resources[1].spec else {
            panic!("expected function");
        };
        assert_eq!(f.handler, "bootstrap");
        assert_eq!(f.bundle.as_deref(), Some("target/lambda/api"));
        assert_eq!(f.memory_mb, 500);
        assert_eq!(f.timeout_secs, 600);
        assert_eq!(f.architecture, Architecture::Arm64);
        assert!(f.url);
        assert!(f.cors_allow_credentials);
        assert_eq!(f.log_retention.as_deref(), Some("1 week"));
        assert_eq!(f.log_format, LogFormat::Json);
        assert_eq!(f.env.get("BUCKET_NAME"), Some(&Value::reference("assets", "name")));
        assert_eq!(
            f.env.get("LOG_LEVEL").map(|v| v.segments.clone()),
            Some(vec![Segment::Secret("LOG_LEVEL".into())])
        );
        assert_eq!(f.link, vec!["assets"]);
    }

    #[test]
    fn function_defaults() {
        let descriptor =
            parse(r#"RESOURCE worker FUNCTION { handler = "main" }"#).expect("should parse");
        let ResourceSpec::Function(f) = &descriptor.resources[0].spec else {
            panic!("expected function");
        };
        assert_eq!(f.runtime, "provided.al2023");
        assert_eq!(f.memory_mb, 1024);
        assert_eq!(f.timeout_secs, 20);
        assert!(!f.url);
        assert!(f.env.is_empty());
    }

    #[test]
    fn function_without_handler_fails() {
        assert_malformed(
            parse(r#"RESOURCE api FUNCTION { memory = 512 }"#),
            "missing required field \"handler\"",
        );
    }

    #[test]
    fn parse_router() {
        let descriptor = parse(
            r#"RESOURCE api FUNCTION { handler = "bootstrap" url = true }
RESOURCE router ROUTER {
    invalidation = false
    routes = { "/*" = api.url }
    domain = "api.${stage}.example.com"
    redirects = ["www.api.${stage}.example.com"]
}"#,
        )
        .expect("should parse");
        let ResourceSpec::Router(r) = &descriptor.resources[1].spec else {
            panic!("expected router");
        };
        assert_eq!(r.routes.get("/*"), Some(&Value::reference("api", "url")));
        assert_eq!(r.redirects.len(), 1);
        let domain = r.domain.as_ref().expect("domain");
        assert!(domain.segments.contains(&Segment::Stage));
        assert_eq!(descriptor.resources[1].dependency_names(), vec!["api"]);
    }

    #[test]
    fn router_without_routes_fails() {
        assert_malformed(
            parse(r#"RESOURCE r ROUTER { domain = "x.com" }"#),
            "missing required field \"routes\"",
        );
    }

    #[test]
    fn parse_environment_and_outputs() {
        let descriptor = parse(
            r#"ENVIRONMENT {
    STAGE = "${stage}"
    LOG_LEVEL = "${secret.LOG_LEVEL}"
}
RESOURCE assets BUCKET {}
OUTPUT bucket = assets.name
OUTPUT site = "https://${assets.name}.s3.amazonaws.com""#,
        )
        .expect("should parse");
        assert_eq!(descriptor.environment.len(), 2);
        assert_eq!(descriptor.outputs.len(), 2);
        assert_eq!(descriptor.outputs[0].name, "bucket");
        assert_eq!(
            descriptor.outputs[1].value.references().collect::<Vec<_>>(),
            vec![&Reference::new("assets", "name")]
        );
        assert_eq!(
            descriptor.secret_names().into_iter().collect::<Vec<_>>(),
            vec!["LOG_LEVEL"]
        );
    }

    #[test]
    fn unknown_property_fails() {
        assert_malformed(
            parse("RESOURCE assets BUCKET { bogus = true }"),
            "unknown BUCKET property: bogus",
        );
    }

    #[test]
    fn property_set_twice_fails() {
        assert_malformed(
            parse(r#"RESOURCE api FUNCTION { handler = "a" handler = "b" }"#),
            "set twice",
        );
    }

    #[test]
    fn duplicate_env_key_fails() {
        assert_malformed(
            parse(r#"ENVIRONMENT { A = "1", A = "2" }"#),
            "duplicate key \"A\"",
        );
    }

    #[test]
    fn missing_brace_fails() {
        assert_malformed(
            parse("RESOURCE assets BUCKET { versioning = true"),
            "unexpected end of input",
        );
    }

    #[test]
    fn invalid_memory_fails() {
        assert_malformed(
            parse(r#"RESOURCE api FUNCTION { handler = "x" memory = "lots" }"#),
            "invalid memory size",
        );
    }

    #[test]
    fn comments_and_commas_are_ignored() {
        let descriptor = parse(
            r#"// storage
RESOURCE assets BUCKET {
    versioning = true, // keep history
    public = false,
}"#,
        )
        .expect("should parse");
        assert_eq!(descriptor.resources.len(), 1);
    }

    #[test]
    fn load_descriptor_file_reads_from_disk() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(b"APP demo {}\nRESOURCE assets BUCKET {}\n")
            .expect("write");
        let descriptor = load_descriptor_file(file.path()).expect("should load");
        assert_eq!(descriptor.resources[0].name, "assets");
    }

    #[test]
    fn load_descriptor_file_missing_is_io_error() {
        let err = load_descriptor_file(Path::new("/nonexistent/stackwire.stk")).unwrap_err();
        assert!(matches!(err, StackwireError::Io { .. }));
    }
}
