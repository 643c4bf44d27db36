use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{get_optional_date, get_optional_str, resolve_viewer, with_db};
use crate::ipc::types::{AppState, Request};
use crate::kv::SqliteKv;
use crate::store::RecordStore;
use rusqlite::Connection;
use serde_json::json;

fn records_list(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let store = RecordStore::new(SqliteKv::new(conn));
    let date = get_optional_date(params, "date")?;
    let student_id = get_optional_str(params, "studentId");

    let has_viewer = params.get("viewer").is_some_and(|v| !v.is_null());
    let mut records = if has_viewer {
        // Filters narrow what the viewer may see; they never widen it.
        let mut scoped = store.records_for_viewer(&resolve_viewer(conn, params)?);
        if let Some(d) = &date {
            scoped.retain(|r| &r.date == d);
        }
        scoped
    } else {
        match &date {
            Some(d) => store.list_records_by_date(d),
            None => match &student_id {
                Some(s) => store.list_records_by_student(s),
                None => store.list_all_records(),
            },
        }
    };
    if let Some(s) = &student_id {
        records.retain(|r| &r.student_id == s);
    }

    Ok(json!({
        "count": records.len(),
        "records": records,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "records.list" => Some(with_db(state, req, records_list)),
        _ => None,
    }
}
