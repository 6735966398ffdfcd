use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pathtree_cli::Args;

fn main() {
    // Initialize logging (respects RUST_LOG env var)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    match pathtree_cli::run(&args) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
