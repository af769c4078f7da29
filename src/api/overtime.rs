use actix_web::{HttpResponse, ResponseError, web};
use tracing::{debug, error, instrument};

use crate::error::OvertimeError;
use crate::model::overtime::{
    FailureResponse, OvertimeEntry, SubmitResponse, TotalsQuery, TotalsResponse,
};
use crate::overtime;
use crate::store::RowStore;

fn log_store_failure(e: &OvertimeError) {
    if e.status_code().is_server_error() {
        error!(error = %e, kind = e.kind(), "Overtime request failed");
    }
}

/// Submit one overtime entry
#[utoipa::path(
    post,
    path = "/submit",
    request_body(
        content = OvertimeEntry,
        description = "Overtime entry; clock fields accept integers or numeric strings",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Entry stored", body = SubmitResponse),
        (status = 400, description = "Missing fields, bad clock values or end not after start", body = FailureResponse, example = json!({
            "success": false,
            "error": "InvalidRange",
            "message": "End time must be after start time"
        })),
        (status = 500, description = "Record store unreachable", body = FailureResponse)
    ),
    tag = "Overtime"
)]
#[instrument(
    name = "submit_entry",
    skip(store, entry),
    fields(agent = entry.agent.as_deref().unwrap_or(""))
)]
pub async fn submit_entry(
    store: web::Data<dyn RowStore>,
    entry: web::Json<OvertimeEntry>,
) -> actix_web::Result<HttpResponse> {
    let submitted = overtime::submit_entry(store.get_ref(), &entry)
        .await
        .inspect_err(log_store_failure)?;

    Ok(HttpResponse::Ok().json(SubmitResponse {
        success: true,
        message: submitted.message,
    }))
}

/// Totals for one agent across every stored row
#[utoipa::path(
    post,
    path = "/get_totals",
    request_body = TotalsQuery,
    responses(
        (status = 200, description = "Aggregated totals and matching rows", body = TotalsResponse),
        (status = 400, description = "No agent given", body = FailureResponse),
        (status = 500, description = "Record store unreachable or a stored duration is malformed", body = FailureResponse)
    ),
    tag = "Overtime"
)]
#[instrument(
    name = "get_totals",
    skip(store, query),
    fields(agent = query.agent.as_deref().unwrap_or(""))
)]
pub async fn get_totals(
    store: web::Data<dyn RowStore>,
    query: web::Json<TotalsQuery>,
) -> actix_web::Result<HttpResponse> {
    if let Some(period) = query.period.as_deref() {
        debug!(period, "Period filter ignored");
    }

    let agent = query.agent.as_deref().unwrap_or_default();
    let totals = overtime::get_totals(store.get_ref(), agent)
        .await
        .inspect_err(log_store_failure)?;

    Ok(HttpResponse::Ok().json(TotalsResponse::from(totals)))
}
