use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{get_optional_str, with_db};
use crate::ipc::types::{AppState, Request};
use crate::kv::SqliteKv;
use crate::store::RecordStore;
use rusqlite::Connection;
use serde_json::json;

fn students_list(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let store = RecordStore::new(SqliteKv::new(conn));
    let students = match get_optional_str(params, "query") {
        Some(q) => store.search_students(&q),
        None => store.list_students(),
    };
    Ok(json!({ "students": students }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(with_db(state, req, students_list)),
        _ => None,
    }
}
