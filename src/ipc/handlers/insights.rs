use crate::insight;
use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{get_optional_str, resolve_viewer, with_db};
use crate::ipc::types::{AppState, Request};
use crate::kv::SqliteKv;
use crate::store::RecordStore;
use serde_json::json;

fn handle_insights_analyze(state: &mut AppState, req: &Request) -> serde_json::Value {
    let summarizer = state.summarizer.as_deref();
    with_db(state, req, |conn, params| {
        let viewer = resolve_viewer(conn, params)?;
        let query = get_optional_str(params, "query")
            .unwrap_or_else(|| insight::DEFAULT_QUERY.to_string());
        let records = RecordStore::new(SqliteKv::new(conn)).records_for_viewer(&viewer);
        let text = insight::analyze_attendance(summarizer, &records, &query);
        Ok::<_, HandlerErr>(json!({
            "insight": text,
            "recordCount": records.len(),
        }))
    })
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "insights.analyze" => Some(handle_insights_analyze(state, req)),
        _ => None,
    }
}
