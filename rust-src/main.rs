//! Fraudboard CLI
//!
//! Terminal dashboard for the spending and fraud analytics backend.

mod cli;
mod commands;
mod config;
mod data;
mod logging;
mod models;
mod view;
mod visualization;


#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
