use crate::binder::{Binder, RepeatedParamPolicy};
use crate::config::RuntimeConfig;
use crate::registry::Registry;
use crate::request::RawRequest;
use crate::spec::{
    load_catalog, parse_catalog_str, BindingSpec, BodyShape, Catalog, CatalogFormat, FieldSpec,
};
use crate::validator::{print_issues, validate_catalog};
use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Exit code when binding or dispatch answers with a client error
pub const EXIT_BIND_FAILED: i32 = 2;

/// Command-line interface for reqbind
#[derive(Parser, Debug)]
#[command(name = "reqbind")]
#[command(about = "Bind request parameters and bodies against declared specs", long_about = None)]
pub struct Cli {
    /// Value a scalar field binds when its parameter repeats (overrides REQBIND_REPEATED_PARAM)
    #[arg(long, value_enum, global = true)]
    pub repeated: Option<RepeatedArg>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RepeatedArg {
    /// First submitted value wins
    First,
    /// Last submitted value wins
    Last,
}

impl From<RepeatedArg> for RepeatedParamPolicy {
    fn from(arg: RepeatedArg) -> Self {
        match arg {
            RepeatedArg::First => RepeatedParamPolicy::First,
            RepeatedArg::Last => RepeatedParamPolicy::Last,
        }
    }
}

/// Request data given on the command line
#[derive(Args, Debug, Clone, Default)]
pub struct RequestArgs {
    /// Query string, e.g. `username=kim&age=20`
    #[arg(short, long)]
    pub query: Option<String>,

    /// Request body as a literal string
    #[arg(short, long, conflicts_with = "body_file")]
    pub body: Option<String>,

    /// Read the request body from a file
    #[arg(long)]
    pub body_file: Option<PathBuf>,

    /// Content-Type header value, e.g. `application/json`
    #[arg(long)]
    pub content_type: Option<String>,
}

impl RequestArgs {
    pub fn to_raw_request(&self) -> anyhow::Result<RawRequest> {
        let body = match (&self.body, &self.body_file) {
            (Some(b), _) => Some(b.clone().into_bytes()),
            (None, Some(path)) => Some(
                std::fs::read(path)
                    .with_context(|| format!("failed to read body file {}", path.display()))?,
            ),
            (None, None) => None,
        };
        Ok(RawRequest::from_parts(
            self.query.as_deref(),
            self.content_type.as_deref(),
            body,
        ))
    }
}

/// Available reqbind commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bind a request against an endpoint declared in a catalog and print the result
    Bind {
        /// Catalog file (YAML, JSON or TOML); defaults to REQBIND_CATALOG
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Endpoint name in the catalog
        #[arg(short, long)]
        endpoint: String,

        #[command(flatten)]
        request: RequestArgs,
    },
    /// Run one of the built-in handlers and print its response
    Dispatch {
        /// Handler name, e.g. `request_param_default`
        #[arg(short, long)]
        endpoint: String,

        #[command(flatten)]
        request: RequestArgs,
    },
    /// List the endpoints of a catalog with their fields
    Inspect {
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },
    /// Check a catalog for mistakes
    Validate {
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },
}

fn resolve_catalog(arg: Option<&Path>, config: &RuntimeConfig) -> anyhow::Result<PathBuf> {
    arg.map(Path::to_path_buf)
        .or_else(|| config.catalog.clone())
        .ok_or_else(|| anyhow!("no catalog given; pass --catalog or set REQBIND_CATALOG"))
}

/// Execute a parsed command, writing its output to `out`.
///
/// Returns the process exit code.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, the endpoint is unknown,
/// or the request body file cannot be read.
pub fn run_command(cli: &Cli, config: &RuntimeConfig, out: &mut dyn Write) -> anyhow::Result<i32> {
    let mut binder_config = config.binder_config();
    if let Some(repeated) = cli.repeated {
        binder_config.repeated = repeated.into();
    }
    let binder = Binder::with_config(binder_config);

    match &cli.command {
        Commands::Bind {
            catalog,
            endpoint,
            request,
        } => {
            let catalog = load_catalog(&resolve_catalog(catalog.as_deref(), config)?)?;
            let meta = catalog
                .get(endpoint)
                .ok_or_else(|| anyhow!("endpoint '{}' is not in the catalog", endpoint))?;
            let raw = request.to_raw_request()?;
            match binder.bind(&raw, &meta.binding) {
                Ok(bound) => {
                    writeln!(out, "{}", serde_json::to_string_pretty(&bound)?)?;
                    Ok(0)
                }
                Err(e) => {
                    writeln!(out, "{}", serde_json::to_string_pretty(&e.to_problem())?)?;
                    Ok(EXIT_BIND_FAILED)
                }
            }
        }
        Commands::Dispatch { endpoint, request } => {
            let registry = Registry::with_builtin(binder);
            let raw = request.to_raw_request()?;
            let response = registry.dispatch(endpoint, &raw);
            let printed = json!({
                "status": response.status.as_u16(),
                "content_type": response.content_type(),
                "body": response.body,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&printed)?)?;
            Ok(if response.status.is_success() {
                0
            } else {
                EXIT_BIND_FAILED
            })
        }
        Commands::Inspect { catalog } => {
            let catalog = load_catalog(&resolve_catalog(catalog.as_deref(), config)?)?;
            write_inspection(&catalog, out)?;
            Ok(0)
        }
        Commands::Validate { catalog } => {
            let path = resolve_catalog(catalog.as_deref(), config)?;
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read catalog {}", path.display()))?;
            let doc = parse_catalog_str(&content, CatalogFormat::from_path(&path))
                .with_context(|| format!("failed to parse catalog {}", path.display()))?;
            let issues = validate_catalog(&doc);
            if issues.is_empty() {
                writeln!(out, "✅ Catalog OK: {} endpoint(s)", doc.endpoints.len())?;
                Ok(0)
            } else {
                print_issues(&issues);
                Ok(1)
            }
        }
    }
}

fn describe_field(field: &FieldSpec) -> String {
    match (&field.default, field.required) {
        (Some(d), _) => format!("{}: {} (default \"{}\")", field.name, field.kind, d),
        (None, true) => format!("{}: {} (required)", field.name, field.kind),
        (None, false) => format!("{}: {} (optional)", field.name, field.kind),
    }
}

fn write_inspection(catalog: &Catalog, out: &mut dyn Write) -> anyhow::Result<()> {
    for ep in &catalog.endpoints {
        writeln!(out, "{} {} -> {}", ep.method, ep.path, ep.name)?;
        match &ep.binding {
            BindingSpec::Params(fields) => {
                for field in fields {
                    writeln!(out, "    {}", describe_field(field))?;
                }
            }
            BindingSpec::Body(BodyShape::Text) => writeln!(out, "    body: text")?,
            BindingSpec::Body(BodyShape::Json(shape)) => {
                writeln!(out, "    body: json")?;
                for field in &shape.fields {
                    let req = if field.required { "required" } else { "optional" };
                    writeln!(out, "        {}: {} ({})", field.name, field.kind, req)?;
                }
            }
        }
    }
    Ok(())
}

/// Parse the process arguments and run the command against stdout.
pub fn run_cli() -> anyhow::Result<i32> {
    let cli = Cli::parse();
    let config = RuntimeConfig::from_env();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_command(&cli, &config, &mut out)
}
