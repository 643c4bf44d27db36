use crate::calc;
use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{resolve_viewer, with_db};
use crate::ipc::types::{AppState, Request};
use crate::kv::SqliteKv;
use crate::store::RecordStore;
use rusqlite::Connection;
use serde_json::json;

fn dashboard_stats(
    conn: &Connection,
    params: &serde_json::Value,
    default_window: usize,
) -> Result<serde_json::Value, HandlerErr> {
    let viewer = resolve_viewer(conn, params)?;
    let window = match params.get("window") {
        None | Some(serde_json::Value::Null) => default_window,
        Some(v) => v
            .as_u64()
            .filter(|w| *w > 0)
            .ok_or_else(|| HandlerErr::bad_params("window must be a positive integer"))?
            as usize,
    };

    let records = RecordStore::new(SqliteKv::new(conn)).records_for_viewer(&viewer);
    let stats = calc::compute_stats(&records);
    let chart = calc::group_by_date_window(&records, window);
    Ok(json!({
        "stats": stats,
        "chart": chart,
        "window": window,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let window = state.config.chart_window;
    match req.method.as_str() {
        "dashboard.stats" => Some(with_db(state, req, |conn, params| {
            dashboard_stats(conn, params, window)
        })),
        _ => None,
    }
}
