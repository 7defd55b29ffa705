#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the real-estate price map.
//!
//! Serves the county and town map views as JSON, plus the `GeoJSON`
//! layers and the static frontend.

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    price_map_server::run_server().await
}
