//! HTTP handler functions for the price map API.

use actix_web::{HttpResponse, web};
use price_map_server_models::{
    ApiError, ApiHealth, ApiMetric, ApiQuarters, CountyQueryParams, TownQueryParams,
};
use price_map_stats_models::MetricKind;
use price_map_view::{
    SelectionState, TownViewOrchestrator, ViewError, ViewRequest, county_view,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/quarters`
///
/// Lists the periods of the town table and the selectable metrics.
pub async fn quarters(state: web::Data<AppState>) -> HttpResponse {
    let metrics = MetricKind::ALL
        .iter()
        .map(|&metric| ApiMetric {
            value: metric,
            label: price_map_format::metric_label(metric).to_string(),
        })
        .collect();

    HttpResponse::Ok().json(ApiQuarters {
        quarters: state.town_stats.quarters.clone(),
        latest: state.town_stats.latest_quarter().map(ToString::to_string),
        metrics,
    })
}

/// `GET /api/counties`
///
/// Styles the county overview map for the given selection.
pub async fn counties(
    state: web::Data<AppState>,
    params: web::Query<CountyQueryParams>,
) -> HttpResponse {
    let selection =
        SelectionState::from_parts(params.selected.as_deref(), params.hovered.as_deref());
    HttpResponse::Ok().json(county_view(
        &state.counties,
        &selection,
        state.view_config.county_bounds_padding,
    ))
}

/// `GET /api/towns`
///
/// Computes the town view of one county. A missing county sends the
/// client back to the overview.
pub async fn towns(
    state: web::Data<AppState>,
    params: web::Query<TownQueryParams>,
) -> HttpResponse {
    let params = params.into_inner();
    let orchestrator = TownViewOrchestrator::new(
        &state.towns,
        &state.town_stats,
        &state.county_stats,
        state.view_config,
    );

    let request = ViewRequest {
        period: params.quarter,
        metric: params.metric.unwrap_or_default(),
        region: params.county,
    };

    let resolved = match orchestrator.resolve(&request) {
        Ok(resolved) => resolved,
        Err(e @ ViewError::MissingRegion) => {
            log::warn!("Town view requested without a county");
            return HttpResponse::BadRequest().json(ApiError::with_redirect(e.to_string(), "/"));
        }
        Err(e @ (ViewError::UnknownPeriod(_) | ViewError::NoPeriods)) => {
            return HttpResponse::NotFound().json(ApiError::new(e.to_string()));
        }
    };

    let selection =
        SelectionState::from_parts(params.pinned.as_deref(), params.hovered.as_deref());
    HttpResponse::Ok().json(orchestrator.compute(&resolved, &selection))
}
