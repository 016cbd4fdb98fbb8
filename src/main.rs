use clap::Parser;
use tessera_engine::cli::{self, CliParser, messages::error_message};
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(true).init();

    let parser = CliParser::parse();

    match cli::run(parser) {
        Ok(result) => print!("{}", result),
        Err(error) => {
            eprintln!("{}", error_message(error.to_string()));
            std::process::exit(1);
        }
    }
}
