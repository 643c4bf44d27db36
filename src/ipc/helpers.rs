use rusqlite::Connection;

use crate::ipc::error::{err, ok, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::kv::SqliteKv;
use crate::model::{self, UserRole, Viewer};
use crate::session::{IdentityProvider, MockIdentityProvider};

pub fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

pub fn get_optional_str(params: &serde_json::Value, key: &str) -> Option<String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn get_required_date(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    let raw = get_required_str(params, key)?;
    if !model::is_iso_date(&raw) {
        return Err(HandlerErr::bad_params(format!("{} must be YYYY-MM-DD", key)));
    }
    Ok(raw)
}

pub fn get_optional_date(
    params: &serde_json::Value,
    key: &str,
) -> Result<Option<String>, HandlerErr> {
    match params.get(key) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(_) => get_required_date(params, key).map(Some),
    }
}

/// Explicit `viewer` param first, then the active session.
pub fn resolve_viewer(conn: &Connection, params: &serde_json::Value) -> Result<Viewer, HandlerErr> {
    if let Some(v) = params.get("viewer").filter(|v| !v.is_null()) {
        let role_raw = get_required_str(v, "role")?;
        let role = UserRole::parse(&role_raw)
            .ok_or_else(|| HandlerErr::bad_params("viewer.role must be STUDENT or TEACHER"))?;
        return Ok(Viewer {
            role,
            student_id: get_optional_str(v, "studentId"),
        });
    }
    MockIdentityProvider::new(SqliteKv::new(conn))
        .current()
        .map(|user| Viewer::from(&user))
        .ok_or_else(|| HandlerErr::bad_params("missing viewer and no active session"))
}

pub fn with_db<F>(state: &AppState, req: &Request, f: F) -> serde_json::Value
where
    F: FnOnce(&Connection, &serde_json::Value) -> Result<serde_json::Value, HandlerErr>,
{
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    match f(conn, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => {
            tracing::debug!(method = %req.method, code = error.code, message = %error.message, "request failed");
            error.response(&req.id)
        }
    }
}
