//! Interactive mode for the server.
//!
//! Prompts the user for bind address, port, and data directory before
//! starting the server.

use std::path::PathBuf;

use dialoguer::{Confirm, Input};

use crate::ServerConfig;

/// Runs the server in interactive mode, prompting for configuration.
///
/// Asks the user for a bind address, port, and data directory, then
/// delegates to [`super::run_server_with`]. The static directory still
/// comes from `PRICE_MAP_STATIC_DIR`.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run() -> std::io::Result<()> {
    println!("Price Map Server");
    println!();

    let defaults = ServerConfig::from_env();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(defaults.bind_addr.clone())
        .interact_text()
        .unwrap_or_else(|_| defaults.bind_addr.clone());

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(defaults.port)
        .interact_text()
        .unwrap_or(defaults.port);

    let data_dir: String = Input::new()
        .with_prompt("Data directory")
        .default(defaults.data_dir.display().to_string())
        .interact_text()
        .unwrap_or_else(|_| defaults.data_dir.display().to_string());

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server_with(ServerConfig {
        bind_addr,
        port,
        data_dir: PathBuf::from(data_dir),
        static_dir: defaults.static_dir,
    })
    .await
}
