//! Attendance record store.
//!
//! Owns the roster and the record set. Both are JSON arrays kept under fixed
//! keys of an injected [`KvStore`]. Reads never fail: a missing key, a storage
//! error, or a payload that no longer parses all read as an empty list.

use crate::kv::KvStore;
use crate::model::{AttendanceRecord, AttendanceStatus, NewAttendance, User, UserRole, Viewer};
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

pub const RECORDS_KEY: &str = "edutrack_attendance";
pub const STUDENTS_KEY: &str = "edutrack_students";

const SEED_STUDENTS: [(&str, &str, &str, &str); 5] = [
    ("1", "Alice Johnson", "alice@edu.com", "STU-1001"),
    ("2", "Bob Smith", "bob@edu.com", "STU-1002"),
    ("3", "Charlie Brown", "charlie@edu.com", "STU-1003"),
    ("4", "Diana Prince", "diana@edu.com", "STU-1004"),
    ("5", "Edward Norton", "edward@edu.com", "STU-1005"),
];

pub fn seed_students() -> Vec<User> {
    SEED_STUDENTS
        .iter()
        .map(|(id, name, email, student_id)| User {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role: UserRole::Student,
            student_id: Some(student_id.to_string()),
        })
        .collect()
}

/// Case-insensitive substring match on name or student id; a blank query
/// matches everyone.
pub fn roster_matches(name: &str, student_id: Option<&str>, query: &str) -> bool {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return true;
    }
    name.to_lowercase().contains(&q)
        || student_id.is_some_and(|id| id.to_lowercase().contains(&q))
}

/// A roster row for the marking sheet of one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySheetRow {
    pub student_id: String,
    pub student_name: String,
    pub status: AttendanceStatus,
    /// False when no record exists yet and `status` is the default.
    pub marked: bool,
}

pub struct RecordStore<K> {
    kv: K,
}

impl<K: KvStore> RecordStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    pub fn list_students(&self) -> Vec<User> {
        match self.read_list::<User>(STUDENTS_KEY) {
            Some(students) => students,
            None => {
                let seeded = seed_students();
                if let Err(e) = self.write_list(STUDENTS_KEY, &seeded) {
                    tracing::warn!(error = %e, "failed to persist seed roster");
                } else {
                    tracing::info!(count = seeded.len(), "seeded student roster");
                }
                seeded
            }
        }
    }

    pub fn search_students(&self, query: &str) -> Vec<User> {
        self.list_students()
            .into_iter()
            .filter(|s| roster_matches(&s.name, s.student_id.as_deref(), query))
            .collect()
    }

    pub fn list_all_records(&self) -> Vec<AttendanceRecord> {
        self.read_list(RECORDS_KEY).unwrap_or_default()
    }

    pub fn list_records_by_date(&self, date: &str) -> Vec<AttendanceRecord> {
        self.list_all_records()
            .into_iter()
            .filter(|r| r.date == date)
            .collect()
    }

    pub fn list_records_by_student(&self, student_id: &str) -> Vec<AttendanceRecord> {
        self.list_all_records()
            .into_iter()
            .filter(|r| r.student_id == student_id)
            .collect()
    }

    /// Upserts every entry keyed by (student id, date) and returns the number
    /// of records written.
    pub fn save_attendance(&self, batch: &[NewAttendance]) -> anyhow::Result<usize> {
        let mut fresh: Vec<AttendanceRecord> = Vec::with_capacity(batch.len());
        for entry in batch {
            // A repeated pair inside one batch keeps the later entry.
            fresh.retain(|r| !r.same_slot(&entry.student_id, &entry.date));
            fresh.push(entry.clone().into_record(Uuid::new_v4().to_string()));
        }

        let mut all: Vec<AttendanceRecord> = self
            .list_all_records()
            .into_iter()
            .filter(|existing| {
                !fresh
                    .iter()
                    .any(|n| existing.same_slot(&n.student_id, &n.date))
            })
            .collect();
        let written = fresh.len();
        all.extend(fresh);

        self.write_list(RECORDS_KEY, &all)
            .context("failed to persist attendance records")?;
        tracing::debug!(written, total = all.len(), "saved attendance batch");
        Ok(written)
    }

    pub fn records_for_viewer(&self, viewer: &Viewer) -> Vec<AttendanceRecord> {
        match viewer.role {
            UserRole::Teacher => self.list_all_records(),
            UserRole::Student => match viewer.student_id.as_deref() {
                Some(student_id) => self.list_records_by_student(student_id),
                None => Vec::new(),
            },
        }
    }

    /// A student's records, most recent date first.
    pub fn student_history(&self, student_id: &str) -> Vec<AttendanceRecord> {
        let mut records = self.list_records_by_student(student_id);
        records.sort_by(|a, b| b.date.cmp(&a.date));
        records
    }

    /// Roster rows for `date`, defaulting unmarked students to present.
    pub fn day_sheet(&self, date: &str) -> Vec<DaySheetRow> {
        let existing = self.list_records_by_date(date);
        self.list_students()
            .into_iter()
            .filter_map(|s| {
                let student_id = s.student_id?;
                let found = existing.iter().find(|r| r.student_id == student_id);
                Some(DaySheetRow {
                    status: found.map(|r| r.status).unwrap_or(AttendanceStatus::Present),
                    marked: found.is_some(),
                    student_id,
                    student_name: s.name,
                })
            })
            .collect()
    }

    fn read_list<T: DeserializeOwned>(&self, key: &str) -> Option<Vec<T>> {
        let raw = match self.kv.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "storage read failed; treating as empty");
                return None;
            }
        };
        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => Some(items),
            Err(e) => {
                tracing::warn!(key, error = %e, "stored payload is malformed; treating as empty");
                None
            }
        }
    }

    fn write_list<T: Serialize>(&self, key: &str, items: &[T]) -> anyhow::Result<()> {
        let payload = serde_json::to_string(items)
            .with_context(|| format!("failed to serialize {}", key))?;
        self.kv.set(key, &payload)
    }
}
