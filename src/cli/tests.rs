//! Unit tests for CLI commands

use crate::cli::{run_command, Cli, Commands, RepeatedArg};
use crate::config::RuntimeConfig;
use clap::Parser;
use std::io::Write;

#[test]
fn test_bind_command_parses() {
    let cli = Cli::try_parse_from([
        "reqbind",
        "bind",
        "--catalog",
        "c.yaml",
        "--endpoint",
        "request_param_v2",
        "--query",
        "username=kim&age=20",
    ])
    .unwrap();

    match cli.command {
        Commands::Bind {
            catalog,
            endpoint,
            request,
        } => {
            assert_eq!(catalog.unwrap().to_string_lossy(), "c.yaml");
            assert_eq!(endpoint, "request_param_v2");
            assert_eq!(request.query.as_deref(), Some("username=kim&age=20"));
        }
        _ => panic!("Expected Bind command"),
    }
}

#[test]
fn test_body_and_body_file_conflict() {
    let result = Cli::try_parse_from([
        "reqbind",
        "dispatch",
        "--endpoint",
        "x",
        "--body",
        "{}",
        "--body-file",
        "b.json",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_global_repeated_flag() {
    let cli = Cli::try_parse_from(["reqbind", "validate", "--repeated", "last"]).unwrap();
    assert_eq!(cli.repeated, Some(RepeatedArg::Last));
}

#[test]
fn test_dispatch_default_handler_output() {
    let cli = Cli::try_parse_from([
        "reqbind",
        "dispatch",
        "--endpoint",
        "request_body_json_v5",
        "--content-type",
        "application/json",
        "--body",
        r#"{"username":"kim","age":20}"#,
    ])
    .unwrap();
    let mut out = Vec::new();
    let code = run_command(&cli, &RuntimeConfig::default(), &mut out).unwrap();
    assert_eq!(code, 0);
    let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(printed["status"], 200);
    assert_eq!(printed["body"]["username"], "kim");
    assert_eq!(printed["body"]["age"], 20);
}

#[test]
fn test_bind_uses_catalog_from_config() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    write!(
        file,
        "endpoints:\n  - name: ages\n    params:\n      - {{ name: age, kind: integer }}\n"
    )
    .unwrap();
    let config = RuntimeConfig {
        catalog: Some(file.path().to_path_buf()),
        ..RuntimeConfig::default()
    };

    let cli = Cli::try_parse_from(["reqbind", "bind", "--endpoint", "ages", "--query", "age=abc"]).unwrap();
    let mut out = Vec::new();
    let code = run_command(&cli, &config, &mut out).unwrap();
    assert_eq!(code, crate::cli::EXIT_BIND_FAILED);
    let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(printed["kind"], "type_conversion_error");
}

#[test]
fn test_missing_catalog_is_an_error() {
    let cli = Cli::try_parse_from(["reqbind", "inspect"]).unwrap();
    let mut out = Vec::new();
    assert!(run_command(&cli, &RuntimeConfig::default(), &mut out).is_err());
}
