use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Student,
    Teacher,
}

impl UserRole {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "STUDENT" => Some(Self::Student),
            "TEACHER" => Some(Self::Teacher),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PRESENT" => Some(Self::Present),
            "ABSENT" => Some(Self::Absent),
            _ => None,
        }
    }

    pub fn is_present(self) -> bool {
        matches!(self, Self::Present)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    /// Attendance key; set for students only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub date: String,
    pub status: AttendanceStatus,
    pub marked_by: String,
}

impl AttendanceRecord {
    pub fn same_slot(&self, student_id: &str, date: &str) -> bool {
        self.student_id == student_id && self.date == date
    }
}

/// One entry of a save batch; the store assigns the record id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAttendance {
    pub student_id: String,
    pub student_name: String,
    pub date: String,
    pub status: AttendanceStatus,
    pub marked_by: String,
}

impl NewAttendance {
    pub fn into_record(self, id: String) -> AttendanceRecord {
        AttendanceRecord {
            id,
            student_id: self.student_id,
            student_name: self.student_name,
            date: self.date,
            status: self.status,
            marked_by: self.marked_by,
        }
    }
}

/// Who is asking; drives role-gated reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub role: UserRole,
    pub student_id: Option<String>,
}

impl Viewer {
    pub fn teacher() -> Self {
        Self {
            role: UserRole::Teacher,
            student_id: None,
        }
    }

    pub fn student(student_id: impl Into<String>) -> Self {
        Self {
            role: UserRole::Student,
            student_id: Some(student_id.into()),
        }
    }
}

impl From<&User> for Viewer {
    fn from(user: &User) -> Self {
        Self {
            role: user.role,
            student_id: user.student_id.clone(),
        }
    }
}

/// Accepts only canonical `YYYY-MM-DD` calendar dates.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let t = raw.trim();
    if t.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(t, DATE_FORMAT).ok()
}

pub fn is_iso_date(raw: &str) -> bool {
    parse_iso_date(raw).is_some()
}
