use crate::calc;
use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{get_optional_date, get_optional_str, get_required_date, get_required_str, with_db};
use crate::ipc::types::{AppState, Request};
use crate::kv::SqliteKv;
use crate::model::{AttendanceStatus, NewAttendance};
use crate::session::{IdentityProvider, MockIdentityProvider};
use crate::store::{roster_matches, RecordStore};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;

const FALLBACK_MARKER: &str = "admin";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveEntry {
    student_id: Option<String>,
    student_name: Option<String>,
    date: Option<String>,
    status: Option<String>,
    marked_by: Option<String>,
}

fn attendance_day_open(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let date = get_required_date(params, "date")?;
    let store = RecordStore::new(SqliteKv::new(conn));
    let mut rows = store.day_sheet(&date);
    let marked = rows.iter().filter(|r| r.marked).count();
    if let Some(q) = get_optional_str(params, "query") {
        rows.retain(|r| roster_matches(&r.student_name, Some(&r.student_id), &q));
    }
    Ok(json!({
        "date": date,
        "rows": rows,
        "markedCount": marked,
    }))
}

fn parse_save_batch(
    conn: &Connection,
    params: &serde_json::Value,
    roster_names: &HashMap<String, String>,
) -> Result<Vec<NewAttendance>, HandlerErr> {
    let Some(raw_entries) = params.get("records").and_then(|v| v.as_array()) else {
        return Err(HandlerErr::bad_params("missing records"));
    };
    // Batch-level defaults for entries that leave these out.
    let default_date = get_optional_date(params, "date")?;
    let default_marker = get_optional_str(params, "markedBy").or_else(|| {
        MockIdentityProvider::new(SqliteKv::new(conn))
            .current()
            .map(|u| u.id)
    });

    let mut batch = Vec::with_capacity(raw_entries.len());
    for (idx, raw) in raw_entries.iter().enumerate() {
        let bad = |message: &str| {
            HandlerErr::bad_params(format!("records[{}]: {}", idx, message))
                .with_details(json!({ "index": idx }))
        };
        let entry: SaveEntry =
            serde_json::from_value(raw.clone()).map_err(|e| bad(&e.to_string()))?;

        let student_id = entry
            .student_id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| bad("missing studentId"))?;
        let date = match entry.date.map(|d| d.trim().to_string()) {
            Some(d) if crate::model::is_iso_date(&d) => d,
            Some(_) => return Err(bad("date must be YYYY-MM-DD")),
            None => default_date.clone().ok_or_else(|| bad("missing date"))?,
        };
        let status = entry
            .status
            .as_deref()
            .and_then(AttendanceStatus::parse)
            .ok_or_else(|| bad("status must be PRESENT or ABSENT"))?;
        let student_name = entry
            .student_name
            .filter(|s| !s.trim().is_empty())
            .or_else(|| roster_names.get(&student_id).cloned())
            .unwrap_or_default();
        let marked_by = entry
            .marked_by
            .filter(|s| !s.trim().is_empty())
            .or_else(|| default_marker.clone())
            .unwrap_or_else(|| FALLBACK_MARKER.to_string());

        batch.push(NewAttendance {
            student_id,
            student_name,
            date,
            status,
            marked_by,
        });
    }
    Ok(batch)
}

fn attendance_save(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let store = RecordStore::new(SqliteKv::new(conn));
    let roster_names: HashMap<String, String> = store
        .list_students()
        .into_iter()
        .filter_map(|s| s.student_id.map(|id| (id, s.name)))
        .collect();
    let batch = parse_save_batch(conn, params, &roster_names)?;

    let saved = store.save_attendance(&batch).map_err(|e| {
        tracing::error!(error = %e, "attendance save failed");
        HandlerErr::new("db_update_failed", format!("{e:#}"))
            .with_details(json!({ "key": crate::store::RECORDS_KEY }))
    })?;
    Ok(json!({ "saved": saved }))
}

fn attendance_history(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_required_str(params, "studentId")?;
    let store = RecordStore::new(SqliteKv::new(conn));
    let records = store.student_history(&student_id);
    let stats = calc::compute_stats(&records);
    Ok(json!({
        "studentId": student_id,
        "records": records,
        "stats": stats,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "attendance.dayOpen" => Some(with_db(state, req, attendance_day_open)),
        "attendance.save" => Some(with_db(state, req, attendance_save)),
        "attendance.history" => Some(with_db(state, req, attendance_history)),
        _ => None,
    }
}
