use crate::backup;
use crate::ipc::error::{err, ok};
use crate::ipc::handlers::core::select_workspace;
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use std::path::PathBuf;

fn workspace_param(state: &AppState, req: &Request) -> Option<PathBuf> {
    req.params
        .get("workspacePath")
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| state.workspace.clone())
}

fn handle_backup_export_workspace_bundle(state: &mut AppState, req: &Request) -> serde_json::Value {
    let out_path = match req.params.get("outPath").and_then(|v| v.as_str()) {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => return err(&req.id, "bad_params", "missing outPath", None),
    };
    let Some(workspace_path) = workspace_param(state, req) else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    if let Some(conn) = state.db.as_ref() {
        let _ = conn.execute_batch("PRAGMA wal_checkpoint(FULL)");
    }

    match backup::export_workspace_bundle(&workspace_path, &PathBuf::from(&out_path)) {
        Ok(export) => {
            let mut result = serde_json::to_value(&export).unwrap_or_else(|_| json!({}));
            result["path"] = json!(out_path);
            ok(&req.id, result)
        }
        Err(e) => {
            tracing::error!(error = %e, "workspace export failed");
            err(
                &req.id,
                "backup_failed",
                format!("{e:#}"),
                Some(json!({ "path": out_path })),
            )
        }
    }
}

fn handle_backup_import_workspace_bundle(state: &mut AppState, req: &Request) -> serde_json::Value {
    let in_path = match req.params.get("inPath").and_then(|v| v.as_str()) {
        Some(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => return err(&req.id, "bad_params", "missing inPath", None),
    };
    let Some(workspace_path) = workspace_param(state, req) else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    if !in_path.is_file() {
        return err(
            &req.id,
            "not_found",
            "bundle file not found",
            Some(json!({ "path": in_path.to_string_lossy() })),
        );
    }

    // Drop open handle before replacing file.
    state.db = None;

    let import = match backup::import_workspace_bundle(&in_path, &workspace_path) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!(error = %e, "workspace import failed");
            if let Some(prev) = state.workspace.clone() {
                let _ = select_workspace(state, &prev);
            }
            return err(
                &req.id,
                "backup_failed",
                format!("{e:#}"),
                Some(json!({ "path": in_path.to_string_lossy() })),
            );
        }
    };

    match select_workspace(state, &workspace_path) {
        Ok(()) => {
            let mut result = serde_json::to_value(&import).unwrap_or_else(|_| json!({}));
            result["workspacePath"] = json!(workspace_path.to_string_lossy());
            ok(&req.id, result)
        }
        Err(e) => err(&req.id, "db_open_failed", format!("{e:#}"), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "backup.exportWorkspaceBundle" => Some(handle_backup_export_workspace_bundle(state, req)),
        "backup.importWorkspaceBundle" => Some(handle_backup_import_workspace_bundle(state, req)),
        _ => None,
    }
}
