//! Calendar store configuration.

use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::window::DateWindow;

/// The window every jurisdiction is computed over: `[start, (end or today) + lookahead_days]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub start: NaiveDate,
    /// Fixed end date. `None` means "today" in UTC at the time the window is resolved.
    pub end: Option<NaiveDate>,
    /// Extra days past the end, for callers that look ahead to the next trading day.
    pub lookahead_days: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default(),
            end: None,
            lookahead_days: 0,
        }
    }
}

impl StoreConfig {
    /// Long history plus a year of lookahead.
    pub fn extended() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap_or_default(),
            end: None,
            lookahead_days: 365,
        }
    }

    pub fn with_start(mut self, start: NaiveDate) -> Self {
        self.start = start;
        self
    }

    pub fn with_end(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_lookahead(mut self, days: u32) -> Self {
        self.lookahead_days = days;
        self
    }

    /// Resolve the window relative to `today`.
    ///
    /// # Errors
    /// Returns `HolidayError::InvalidRange` if the start lies after the resolved end.
    pub fn window(&self, today: NaiveDate) -> Result<DateWindow> {
        let base = self.end.unwrap_or(today);
        let end = base
            .checked_add_days(Days::new(u64::from(self.lookahead_days)))
            .unwrap_or(NaiveDate::MAX);
        DateWindow::new(self.start, end)
    }

    /// Resolve the window against the current UTC date.
    pub fn current_window(&self) -> Result<DateWindow> {
        self.window(Utc::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HolidayError;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn default_window_ends_today() {
        let window = StoreConfig::default().window(d(2026, 10, 16)).unwrap();
        assert_eq!(window.start(), d(2000, 1, 1));
        assert_eq!(window.end(), d(2026, 10, 16));
    }

    #[test]
    fn extended_window_looks_ahead_a_year() {
        let window = StoreConfig::extended().window(d(2026, 10, 16)).unwrap();
        assert_eq!(window.start(), d(1990, 1, 1));
        assert_eq!(window.end(), d(2027, 10, 16));
    }

    #[test]
    fn fixed_end_ignores_today() {
        let config = StoreConfig::default().with_end(d(2010, 12, 31)).with_lookahead(1);
        assert_eq!(config.window(d(2026, 1, 1)).unwrap().end(), d(2011, 1, 1));
    }

    #[test]
    fn start_after_end_is_invalid() {
        let config = StoreConfig::default().with_start(d(2030, 1, 1));
        assert!(matches!(
            config.window(d(2026, 1, 1)),
            Err(HolidayError::InvalidRange { .. })
        ));
    }

    #[test]
    fn deserializes_partial_config() {
        let config: StoreConfig = serde_json::from_str(r#"{"lookahead_days": 30}"#).unwrap();
        assert_eq!(config.start, d(2000, 1, 1));
        assert_eq!(config.lookahead_days, 30);
        assert_eq!(config.end, None);
    }
}
