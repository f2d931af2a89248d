use axum::{extract::State, Json};
use axum_extra::extract::Query;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::db::DbPool;
use crate::dto::{DailyOccupancyDto, DateRangeQueryDto, RevenueSummaryDto};
use crate::errors::ApiError;
use crate::repo;

/// Longest report range accepted, in days
const MAX_REPORT_DAYS: i64 = 366;

fn validate_range(query: &DateRangeQueryDto) -> Result<(), ApiError> {
    if query.from > query.to {
        return Err(ApiError::Validation("from must not be after to".to_string()));
    }
    let days = (query.to - query.from).num_days() + 1;
    if days > MAX_REPORT_DAYS {
        return Err(ApiError::Validation(format!(
            "Report range is limited to {} days, got {}",
            MAX_REPORT_DAYS, days
        )));
    }
    Ok(())
}

/// Handler for the per-night occupancy report
///
/// This function handles GET requests to
/// `/reports/occupancy?from=...&to=...` (both dates inclusive).
///
/// ### Returns
///
/// One entry per night with booked and available room counts as JSON
#[instrument(skip(pool), fields(from = %query.from, to = %query.to))]
pub async fn occupancy_report_handler(
    State(pool): State<Arc<DbPool>>,
    Query(query): Query<DateRangeQueryDto>,
) -> Result<Json<Vec<DailyOccupancyDto>>, ApiError> {
    debug!("Occupancy report requested");

    validate_range(&query)?;

    let report = repo::occupancy_report(&pool, query.from, query.to)
        .map_err(ApiError::Database)?;

    Ok(Json(report))
}

/// Handler for the revenue/expense summary
///
/// This function handles GET requests to
/// `/reports/revenue?from=...&to=...` (both dates inclusive).
#[instrument(skip(pool), fields(from = %query.from, to = %query.to))]
pub async fn revenue_report_handler(
    State(pool): State<Arc<DbPool>>,
    Query(query): Query<DateRangeQueryDto>,
) -> Result<Json<RevenueSummaryDto>, ApiError> {
    debug!("Revenue report requested");

    validate_range(&query)?;

    let summary = repo::revenue_report(&pool, query.from, query.to)
        .map_err(ApiError::Database)?;

    Ok(Json(summary))
}
