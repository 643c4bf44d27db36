//! Natural-language summaries of attendance data.
//!
//! The summarizer itself is whatever the host installs. Without one the
//! caller gets a fixed notice, and any summarizer failure is folded into a
//! fixed apology so the dashboard never breaks on it.

use crate::model::AttendanceRecord;

pub const UNAVAILABLE_MESSAGE: &str = "AI insights are unavailable without an API key.";
pub const FAILURE_MESSAGE: &str = "Sorry, I couldn't analyze the attendance data right now.";
pub const DEFAULT_QUERY: &str = "Provide a brief analysis of this attendance data.";

pub trait Summarizer {
    fn summarize(&self, prompt: &str) -> anyhow::Result<String>;
}

pub fn build_prompt(records: &[AttendanceRecord], query: &str) -> String {
    let data = serde_json::to_string(records).unwrap_or_else(|_| "[]".to_string());
    format!(
        "You are an AI Education Assistant. Below is the attendance data for a class in JSON format:\n\
         {data}\n\n\
         The user asks: \"{query}\"\n\n\
         Analyze the data and provide a helpful, concise answer. Identify trends like high \
         absenteeism, students who are always present, or specific dates with low attendance."
    )
}

pub fn analyze_attendance(
    summarizer: Option<&dyn Summarizer>,
    records: &[AttendanceRecord],
    query: &str,
) -> String {
    let Some(summarizer) = summarizer else {
        return UNAVAILABLE_MESSAGE.to_string();
    };
    let query = if query.trim().is_empty() {
        DEFAULT_QUERY
    } else {
        query
    };
    match summarizer.summarize(&build_prompt(records, query)) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, "attendance analysis failed");
            FAILURE_MESSAGE.to_string()
        }
    }
}
