use anyhow::anyhow;
use attendanced::db;
use attendanced::kv::{KvStore, MemoryKv, SqliteKv};
use attendanced::model::{AttendanceStatus, NewAttendance};
use attendanced::store::{RecordStore, RECORDS_KEY, STUDENTS_KEY};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn entry(student_id: &str, date: &str, status: AttendanceStatus) -> NewAttendance {
    NewAttendance {
        student_id: student_id.to_string(),
        student_name: student_id.to_string(),
        date: date.to_string(),
        status,
        marked_by: "teacher-1".to_string(),
    }
}

/// Storage that is unreachable: every call errors.
struct BrokenKv;

impl KvStore for BrokenKv {
    fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
        Err(anyhow!("storage offline"))
    }

    fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
        Err(anyhow!("storage offline"))
    }

    fn remove(&self, _key: &str) -> anyhow::Result<()> {
        Err(anyhow!("storage offline"))
    }
}

#[test]
fn malformed_records_read_as_empty() {
    let kv = MemoryKv::new();
    kv.set(RECORDS_KEY, "{not json").expect("set");
    let store = RecordStore::new(&kv);
    assert!(store.list_all_records().is_empty());
    assert!(store.list_records_by_date("2024-05-01").is_empty());
    assert!(store.list_records_by_student("STU-1001").is_empty());

    // Wrong shape is treated the same as unparseable.
    kv.set(RECORDS_KEY, r#"[{"id":1}]"#).expect("set");
    assert!(store.list_all_records().is_empty());

    store
        .save_attendance(&[entry("STU-1001", "2024-05-01", AttendanceStatus::Absent)])
        .expect("save over corrupt payload");
    assert_eq!(store.list_all_records().len(), 1);
}

#[test]
fn malformed_roster_is_reseeded() {
    let kv = MemoryKv::new();
    kv.set(STUDENTS_KEY, "null").expect("set");
    let students = RecordStore::new(&kv).list_students();
    assert_eq!(students.len(), 5);
    let raw = kv.get(STUDENTS_KEY).expect("get").expect("seeded");
    assert!(raw.contains("STU-1001"));
}

#[test]
fn unavailable_storage_reads_empty_and_reports_write_failure() {
    let store = RecordStore::new(BrokenKv);
    assert!(store.list_all_records().is_empty());
    assert!(store.list_records_by_date("2024-05-01").is_empty());
    // The seed roster is still served even though it cannot be stored.
    assert_eq!(store.list_students().len(), 5);

    let result = store.save_attendance(&[entry("STU-1001", "2024-05-01", AttendanceStatus::Present)]);
    let e = result.expect_err("write should fail");
    assert!(format!("{e:#}").contains("storage offline"));
}

#[test]
fn sqlite_workspace_persists_across_reopen() {
    let workspace = temp_dir("attendance-store-reopen");
    {
        let conn = db::open_db(&workspace).expect("open db");
        let store = RecordStore::new(SqliteKv::new(&conn));
        store.list_students();
        store
            .save_attendance(&[
                entry("STU-1001", "2024-05-01", AttendanceStatus::Present),
                entry("STU-1002", "2024-05-01", AttendanceStatus::Absent),
            ])
            .expect("save");
    }
    {
        let conn = db::open_db(&workspace).expect("reopen db");
        let store = RecordStore::new(SqliteKv::new(&conn));
        assert_eq!(store.list_students().len(), 5);
        assert_eq!(store.list_records_by_date("2024-05-01").len(), 2);
        store
            .save_attendance(&[entry("STU-1002", "2024-05-01", AttendanceStatus::Present)])
            .expect("resave");
        let day = store.list_records_by_date("2024-05-01");
        assert_eq!(day.len(), 2);
        assert!(day.iter().all(|r| r.status == AttendanceStatus::Present));
    }
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn sqlite_kv_set_get_remove() {
    let conn = db::open_in_memory().expect("open");
    let kv = SqliteKv::new(&conn);
    assert_eq!(kv.get("k").expect("get"), None);
    kv.set("k", "one").expect("set");
    kv.set("k", "two").expect("overwrite");
    assert_eq!(kv.get("k").expect("get").as_deref(), Some("two"));
    kv.remove("k").expect("remove");
    assert_eq!(kv.get("k").expect("get"), None);
}

fn kv_columns(conn: &rusqlite::Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("PRAGMA table_info(kv_entries)")
        .expect("prepare");
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .expect("query");
    rows.map(|r| r.expect("column name")).collect()
}

#[test]
fn file_and_memory_databases_share_one_schema() {
    let workspace = temp_dir("attendance-store-schema");
    let on_disk = db::open_db(&workspace).expect("open db");
    let in_memory = db::open_in_memory().expect("open in memory");

    let expected = vec!["key".to_string(), "value".to_string(), "updated_at".to_string()];
    assert_eq!(kv_columns(&on_disk), expected);
    assert_eq!(kv_columns(&in_memory), expected);

    // Reapplying the schema to an open connection is a no-op.
    db::ensure_schema(&in_memory).expect("reapply schema");
    assert_eq!(kv_columns(&in_memory), expected);

    drop(on_disk);
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn legacy_table_without_updated_at_is_migrated() {
    let conn = rusqlite::Connection::open_in_memory().expect("open");
    conn.execute(
        "CREATE TABLE kv_entries(key TEXT PRIMARY KEY, value TEXT NOT NULL)",
        [],
    )
    .expect("legacy table");
    conn.execute(
        "INSERT INTO kv_entries(key, value) VALUES('edutrack_attendance', '[]')",
        [],
    )
    .expect("legacy row");

    db::ensure_schema(&conn).expect("migrate");
    assert!(kv_columns(&conn).contains(&"updated_at".to_string()));
    let kv = SqliteKv::new(&conn);
    assert_eq!(kv.get(RECORDS_KEY).expect("get").as_deref(), Some("[]"));
}
