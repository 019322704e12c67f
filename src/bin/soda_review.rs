//! Soda Review server entry point
//!
//! # Examples
//!
//! ```bash
//! # Run the API on the configured address
//! soda-review serve
//!
//! # Run on a different port with JSON logs
//! soda-review serve --port 9000 --log-format json
//!
//! # Show the effective configuration
//! soda-review show-config --format json
//! ```

use clap::Parser;
use soda_review::cli::{run, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
