//! # CLI Module
//!
//! Command-line front end for binding requests without an HTTP server.
//!
//! ## Commands
//!
//! ### `bind`
//!
//! Bind a request against an endpoint declared in a catalog:
//!
//! ```bash
//! reqbind bind --catalog catalog/endpoints.yaml \
//!     --endpoint request_param_default --query 'username=&age=20'
//! ```
//!
//! Prints the bound values as JSON (exit 0) or the problem body (exit 2).
//!
//! ### `dispatch`
//!
//! Run a built-in handler:
//!
//! ```bash
//! reqbind dispatch --endpoint request_body_json_v5 \
//!     --content-type application/json --body '{"username":"kim","age":20}'
//! ```
//!
//! ### `inspect`
//!
//! List a catalog's endpoints and their fields.
//!
//! ### `validate`
//!
//! Check a catalog; prints issues to stderr and exits 1 if there are any.
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use reqbind::cli::{run_command, Cli};
//! use reqbind::config::RuntimeConfig;
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! let code = run_command(&cli, &RuntimeConfig::from_env(), &mut std::io::stdout())?;
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run_cli, run_command, Cli, Commands, RepeatedArg, RequestArgs, EXIT_BIND_FAILED};
