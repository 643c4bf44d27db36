use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{get_required_str, with_db};
use crate::ipc::types::{AppState, Request};
use crate::kv::SqliteKv;
use crate::model::UserRole;
use crate::session::{IdentityProvider, MockIdentityProvider, SessionError};
use rusqlite::Connection;
use serde_json::json;

fn session_err(e: SessionError) -> HandlerErr {
    match e {
        SessionError::InvalidEmail(_) | SessionError::EmptyName => {
            HandlerErr::bad_params(e.to_string())
        }
        SessionError::Storage(_) => HandlerErr::new("session_failed", format!("{e:#}")),
    }
}

fn get_role(params: &serde_json::Value) -> Result<UserRole, HandlerErr> {
    let raw = get_required_str(params, "role")?;
    UserRole::parse(&raw).ok_or_else(|| HandlerErr::bad_params("role must be STUDENT or TEACHER"))
}

fn session_login(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let email = get_required_str(params, "email")?;
    let role = get_role(params)?;
    let user = MockIdentityProvider::new(SqliteKv::new(conn))
        .login(&email, role)
        .map_err(session_err)?;
    Ok(json!({ "user": user }))
}

fn session_register(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let name = get_required_str(params, "name")?;
    let email = get_required_str(params, "email")?;
    let role = get_role(params)?;
    let user = MockIdentityProvider::new(SqliteKv::new(conn))
        .register(&name, &email, role)
        .map_err(session_err)?;
    Ok(json!({ "user": user }))
}

fn session_logout(
    conn: &Connection,
    _params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    MockIdentityProvider::new(SqliteKv::new(conn))
        .logout()
        .map_err(session_err)?;
    Ok(json!({ "ok": true }))
}

fn session_current(
    conn: &Connection,
    _params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let user = MockIdentityProvider::new(SqliteKv::new(conn)).current();
    Ok(json!({
        "authenticated": user.is_some(),
        "user": user,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "session.login" => Some(with_db(state, req, session_login)),
        "session.register" => Some(with_db(state, req, session_register)),
        "session.logout" => Some(with_db(state, req, session_logout)),
        "session.current" => Some(with_db(state, req, session_current)),
        _ => None,
    }
}
