#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the real-estate price map.
//!
//! Loads the boundary layers and stats tables once at startup (any
//! failure aborts before binding), then serves computed county and town
//! views as JSON alongside the static frontend and the raw `GeoJSON`.

mod handlers;
pub mod interactive;

use std::path::{Path, PathBuf};

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, Scope, middleware, web};
use geojson::FeatureCollection;
use price_map_stats_models::StatsTable;
use price_map_view::ViewConfig;
use thiserror::Error;

/// Town boundary layer file name.
pub const TOWN_GEOJSON: &str = "taiwan_town_simplified.geojson";

/// County boundary layer file name.
pub const COUNTY_GEOJSON: &str = "taiwan_county_simplified.geojson";

/// Town stats file name.
pub const TOWN_STATS: &str = "stats_by_town_quarter.json";

/// County stats file name.
pub const COUNTY_STATS: &str = "stats_by_county_quarter.json";

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A stats table could not be loaded.
    #[error(transparent)]
    Stats(#[from] price_map_stats::StatsError),

    /// A boundary layer could not be loaded.
    #[error(transparent)]
    Spatial(#[from] price_map_spatial::SpatialError),
}

/// Server settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
    /// Directory holding the `GeoJSON` and stats files.
    pub data_dir: PathBuf,
    /// Directory holding the built frontend.
    pub static_dir: PathBuf,
}

impl ServerConfig {
    /// Reads `BIND_ADDR`, `PORT`, `PRICE_MAP_DATA_DIR`, and
    /// `PRICE_MAP_STATIC_DIR`, falling back to local defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            data_dir: std::env::var("PRICE_MAP_DATA_DIR")
                .map_or_else(|_| PathBuf::from("data"), PathBuf::from),
            static_dir: std::env::var("PRICE_MAP_STATIC_DIR")
                .map_or_else(|_| PathBuf::from("app/dist"), PathBuf::from),
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// Town boundaries.
    pub towns: FeatureCollection,
    /// County boundaries.
    pub counties: FeatureCollection,
    /// Per-town stats.
    pub town_stats: StatsTable,
    /// Per-county stats.
    pub county_stats: StatsTable,
    /// Sample floors and map padding.
    pub view_config: ViewConfig,
}

/// Loads all four data files from `data_dir`.
///
/// # Errors
///
/// Returns [`ServerError`] if any file is missing or malformed; nothing is
/// served in that case.
pub async fn load_state(data_dir: &Path) -> Result<AppState, ServerError> {
    let path = |name: &str| data_dir.join(name);

    log::info!("Loading boundaries from {}...", data_dir.display());
    let towns = price_map_spatial::read_feature_collection(&path(TOWN_GEOJSON))?;
    let counties = price_map_spatial::read_feature_collection(&path(COUNTY_GEOJSON))?;
    log::info!(
        "Loaded {} town and {} county features",
        towns.features.len(),
        counties.features.len()
    );

    log::info!("Loading stats tables...");
    let town_stats =
        price_map_stats::load::load_table(&path(TOWN_STATS).display().to_string()).await?;
    let county_stats =
        price_map_stats::load::load_table(&path(COUNTY_STATS).display().to_string()).await?;

    Ok(AppState {
        towns,
        counties,
        town_stats,
        county_stats,
        view_config: ViewConfig::default(),
    })
}

/// The `/api` routes.
#[must_use]
pub fn api_scope() -> Scope {
    web::scope("/api")
        .route("/health", web::get().to(handlers::health))
        .route("/quarters", web::get().to(handlers::quarters))
        .route("/counties", web::get().to(handlers::counties))
        .route("/towns", web::get().to(handlers::towns))
}

/// Starts the price map API server with settings from the environment.
///
/// This is a regular async function; the caller is responsible for
/// providing the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns any error from [`run_server_with`].
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    run_server_with(ServerConfig::from_env()).await
}

/// Loads the data files from `config.data_dir` and starts the Actix-Web
/// HTTP server.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the data cannot be loaded or the
/// HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server_with(config: ServerConfig) -> std::io::Result<()> {
    pretty_env_logger::try_init_custom_env("RUST_LOG").ok();

    let state = load_state(&config.data_dir).await.map_err(|e| {
        log::error!("Failed to load data: {e}");
        std::io::Error::other(e)
    })?;
    let state = web::Data::new(state);

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    let data_dir = config.data_dir.clone();
    let static_dir = config.static_dir.clone();

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(api_scope())
            // Serve the raw boundary layers and stats
            .service(Files::new("/data", &data_dir))
            // Serve frontend static files (production)
            .service(Files::new("/", &static_dir).index_file("index.html"))
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOWNS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "COUNTYNAME": "臺北市", "TOWNNAME": "大安區" },
                "geometry": { "type": "Polygon", "coordinates": [[[121.0,25.0],[122.0,25.0],[122.0,26.0],[121.0,26.0],[121.0,25.0]]] }
            }
        ]
    }"#;

    const COUNTIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "COUNTYNAME": "臺北市" },
                "geometry": { "type": "Polygon", "coordinates": [[[121.0,25.0],[122.0,25.0],[122.0,26.0],[121.0,26.0],[121.0,25.0]]] }
            }
        ]
    }"#;

    const TOWN_TABLE: &str = r#"{"quarters":["2025Q4"],"data":{"2025Q4":{"臺北市大安區":{"count":40,"median_total_price":15000000,"median_unit_price_ping":600000}}}}"#;

    const COUNTY_TABLE: &str = r#"{"quarters":["2025Q4"],"data":{"2025Q4":{"臺北市":{"count":40,"median_total_price":15000000,"median_unit_price_ping":600000}}}}"#;

    fn data_dir(name: &str, files: &[(&str, &str)]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "price_map_server_{name}_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        for (file, contents) in files {
            std::fs::write(dir.join(file), contents).unwrap();
        }
        dir
    }

    #[actix_web::test]
    async fn loads_all_four_files() {
        let dir = data_dir(
            "complete",
            &[
                (TOWN_GEOJSON, TOWNS),
                (COUNTY_GEOJSON, COUNTIES),
                (TOWN_STATS, TOWN_TABLE),
                (COUNTY_STATS, COUNTY_TABLE),
            ],
        );

        let state = load_state(&dir).await.unwrap();
        assert_eq!(state.towns.features.len(), 1);
        assert_eq!(state.counties.features.len(), 1);
        assert_eq!(state.town_stats.quarters, vec!["2025Q4".to_string()]);
        assert_eq!(state.county_stats.quarters, vec!["2025Q4".to_string()]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[actix_web::test]
    async fn missing_stats_file_aborts_startup() {
        let dir = data_dir(
            "missing_stats",
            &[
                (TOWN_GEOJSON, TOWNS),
                (COUNTY_GEOJSON, COUNTIES),
                (TOWN_STATS, TOWN_TABLE),
            ],
        );

        let err = load_state(&dir).await.err().unwrap();
        assert!(
            matches!(err, ServerError::Stats(price_map_stats::StatsError::Io { .. })),
            "{err:?}"
        );

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[actix_web::test]
    async fn missing_boundary_layer_aborts_startup() {
        let dir = data_dir(
            "missing_layer",
            &[
                (TOWN_GEOJSON, TOWNS),
                (TOWN_STATS, TOWN_TABLE),
                (COUNTY_STATS, COUNTY_TABLE),
            ],
        );

        let err = load_state(&dir).await.err().unwrap();
        assert!(matches!(err, ServerError::Spatial(_)), "{err:?}");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[actix_web::test]
    async fn explicit_config_fails_before_binding() {
        let dir = data_dir("explicit_config", &[]);
        let config = ServerConfig {
            bind_addr: "127.0.0.1".to_string(),
            port: 0,
            data_dir: dir.clone(),
            static_dir: dir.join("dist"),
        };

        let err = run_server_with(config).await.unwrap_err();
        assert!(err.to_string().contains(TOWN_GEOJSON), "{err}");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[actix_web::test]
    async fn malformed_files_abort_startup() {
        let dir = data_dir(
            "malformed_geojson",
            &[
                (TOWN_GEOJSON, "{\"type\": \"Point\""),
                (COUNTY_GEOJSON, COUNTIES),
                (TOWN_STATS, TOWN_TABLE),
                (COUNTY_STATS, COUNTY_TABLE),
            ],
        );
        let err = load_state(&dir).await.err().unwrap();
        assert!(matches!(err, ServerError::Spatial(_)), "{err:?}");
        std::fs::remove_dir_all(&dir).unwrap();

        let dir = data_dir(
            "malformed_stats",
            &[
                (TOWN_GEOJSON, TOWNS),
                (COUNTY_GEOJSON, COUNTIES),
                (TOWN_STATS, "[1, 2"),
                (COUNTY_STATS, COUNTY_TABLE),
            ],
        );
        let err = load_state(&dir).await.err().unwrap();
        assert!(
            matches!(err, ServerError::Stats(price_map_stats::StatsError::Json(_))),
            "{err:?}"
        );
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
