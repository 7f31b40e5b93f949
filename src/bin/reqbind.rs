use reqbind::logging::{init_logging_with_config, LogConfig};

fn main() {
    if let Err(e) = init_logging_with_config(&LogConfig::from_env()) {
        eprintln!("{e:#}");
    }

    match reqbind::cli::run_cli() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}
