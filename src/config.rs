use crate::calc::DEFAULT_CHART_WINDOW;
use std::path::PathBuf;

pub const ENV_WORKSPACE: &str = "ATTENDANCED_WORKSPACE";
pub const ENV_LOG: &str = "ATTENDANCED_LOG";
pub const ENV_CHART_WINDOW: &str = "ATTENDANCED_CHART_WINDOW";

/// Startup settings, read once from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Opened before the first request when set.
    pub workspace: Option<PathBuf>,
    pub log_filter: String,
    pub chart_window: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace: None,
            log_filter: "info".to_string(),
            chart_window: DEFAULT_CHART_WINDOW,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let chart_window = non_empty(ENV_CHART_WINDOW)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|w| *w > 0)
            .unwrap_or(defaults.chart_window);

        Self {
            workspace: non_empty(ENV_WORKSPACE).map(PathBuf::from),
            log_filter: non_empty(ENV_LOG).unwrap_or(defaults.log_filter),
            chart_window,
        }
    }
}
