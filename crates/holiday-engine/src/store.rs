//! Per-jurisdiction holiday cache.
//!
//! A [`CalendarStore`] owns the registered rule sets and the holiday set
//! computed for each of them over one configured window. Sets are computed on
//! first access and never mutated afterwards; a caller that needs a different
//! window asks for [`recompute`](CalendarStore::recompute) explicitly.
//!
//! Sets are computed outside any lock. A computed set is stored only if the
//! rule set it came from is still the registered one, and a first-access
//! computation never replaces a set that is already cached, so a concurrent
//! [`register`](CalendarStore::register) or `recompute` is never undone.
//!
//! Locks are always taken cache first, then rule sets.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use chrono::{Days, NaiveDate, Utc};

use crate::config::StoreConfig;
use crate::error::{HolidayError, Result};
use crate::holiday_set::HolidaySet;
use crate::jurisdictions;
use crate::ruleset::RuleSet;
use crate::window::{is_weekend, DateWindow};

static GLOBAL_STORE: OnceLock<CalendarStore> = OnceLock::new();

#[derive(Debug)]
pub struct CalendarStore {
    window: DateWindow,
    rule_sets: RwLock<HashMap<String, Arc<RuleSet>>>,
    cache: RwLock<HashMap<String, Arc<HolidaySet>>>,
}

impl CalendarStore {
    /// A store over the window described by `config`, with the built-in
    /// jurisdictions registered.
    ///
    /// # Errors
    /// Returns `HolidayError::InvalidRange` if the configured window is empty.
    pub fn new(config: &StoreConfig) -> Result<Self> {
        Ok(Self::with_window(config.current_window()?))
    }

    /// A store over `window`, with the built-in jurisdictions registered.
    pub fn with_window(window: DateWindow) -> Self {
        let store = Self::empty(window);
        for rule_set in jurisdictions::builtin() {
            store.register(rule_set);
        }
        store
    }

    /// A store over `window` with no jurisdictions.
    pub fn empty(window: DateWindow) -> Self {
        Self {
            window,
            rule_sets: RwLock::new(HashMap::new()),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide store, created on first use with the default config
    /// (`[2000-01-01, today]`).
    pub fn global() -> &'static CalendarStore {
        GLOBAL_STORE.get_or_init(|| {
            let config = StoreConfig::default();
            let today = Utc::now().date_naive().max(config.start);
            let window = config
                .window(today)
                .unwrap_or_else(|_| DateWindow::day(config.start));
            CalendarStore::with_window(window)
        })
    }

    pub fn window(&self) -> DateWindow {
        self.window
    }

    /// Add or replace a jurisdiction. Any set cached for it is dropped.
    pub fn register(&self, rule_set: RuleSet) {
        let code = normalize(rule_set.jurisdiction());
        tracing::debug!(
            jurisdiction = %code,
            rules = rule_set.rules().len(),
            "registering rule set"
        );
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        self.rule_sets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(code.clone(), Arc::new(rule_set));
        cache.remove(&code);
    }

    /// Registered jurisdiction codes, sorted.
    pub fn jurisdictions(&self) -> Vec<String> {
        let mut codes: Vec<String> = self
            .rule_sets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        codes.sort();
        codes
    }

    /// # Errors
    /// Returns `HolidayError::UnknownJurisdiction` if nothing is registered under `code`.
    pub fn rule_set(&self, code: &str) -> Result<Arc<RuleSet>> {
        let code = normalize(code);
        self.rule_sets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&code)
            .cloned()
            .ok_or(HolidayError::UnknownJurisdiction(code))
    }

    /// The holiday set for `code`, computed over the store window on first access.
    ///
    /// # Errors
    /// Returns `HolidayError::UnknownJurisdiction` for an unregistered code, or
    /// any rule evaluation error.
    pub fn holiday_set(&self, code: &str) -> Result<Arc<HolidaySet>> {
        let key = normalize(code);
        if let Some(set) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(set));
        }
        self.compute_and_store(&key, self.window, false)
    }

    /// Replace the cached set for `code` with one computed over `window`.
    pub fn recompute(&self, code: &str, window: DateWindow) -> Result<Arc<HolidaySet>> {
        let key = normalize(code);
        tracing::debug!(jurisdiction = %key, %window, "recomputing holiday set");
        self.compute_and_store(&key, window, true)
    }

    /// Whether `date` is in the cached holiday set. Weekends are not holidays
    /// unless a rule names them; see [`is_trading_day`](Self::is_trading_day).
    pub fn is_holiday(&self, code: &str, date: NaiveDate) -> Result<bool> {
        Ok(self.holiday_set(code)?.contains(date))
    }

    /// Holidays in `start..=end`, clipped to the computed window.
    ///
    /// # Errors
    /// Returns `HolidayError::InvalidRange` if `start > end`.
    pub fn holidays_in(
        &self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>> {
        let set = self.holiday_set(code)?;
        Ok(set.range(start, end)?.to_vec())
    }

    /// A weekday that is not a holiday.
    pub fn is_trading_day(&self, code: &str, date: NaiveDate) -> Result<bool> {
        Ok(!is_weekend(date) && !self.is_holiday(code, date)?)
    }

    /// The first trading day strictly after `date`.
    ///
    /// # Errors
    /// Returns `HolidayError::OutOfWindow` if the search runs past the computed window.
    pub fn next_trading_day(&self, code: &str, date: NaiveDate) -> Result<NaiveDate> {
        let set = self.holiday_set(code)?;
        let window = set.window();
        let mut candidate = date;
        loop {
            candidate = step(candidate, true, window)?;
            if !window.contains(candidate) {
                return Err(HolidayError::OutOfWindow { date: candidate, window });
            }
            if !is_weekend(candidate) && !set.contains(candidate) {
                return Ok(candidate);
            }
        }
    }

    /// The last trading day strictly before `date`.
    ///
    /// # Errors
    /// Returns `HolidayError::OutOfWindow` if the search runs before the computed window.
    pub fn previous_trading_day(&self, code: &str, date: NaiveDate) -> Result<NaiveDate> {
        let set = self.holiday_set(code)?;
        let window = set.window();
        let mut candidate = date;
        loop {
            candidate = step(candidate, false, window)?;
            if !window.contains(candidate) {
                return Err(HolidayError::OutOfWindow { date: candidate, window });
            }
            if !is_weekend(candidate) && !set.contains(candidate) {
                return Ok(candidate);
            }
        }
    }

    /// Every trading day in `start..=end`. This is the list of business dates
    /// that need a price row when back-filling a daily series.
    ///
    /// # Errors
    /// Returns `HolidayError::InvalidRange` if `start > end` and
    /// `HolidayError::OutOfWindow` if the range leaves the computed window.
    pub fn trading_days_in(
        &self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>> {
        let range = DateWindow::new(start, end)?;
        let set = self.holiday_set(code)?;
        let window = set.window();
        for bound in [range.start(), range.end()] {
            if !window.contains(bound) {
                return Err(HolidayError::OutOfWindow { date: bound, window });
            }
        }
        Ok(range
            .start()
            .iter_days()
            .take_while(|date| *date <= range.end())
            .filter(|date| !is_weekend(*date) && !set.contains(*date))
            .collect())
    }

    /// Generate `key` over `window` and cache the result. With `replace` unset
    /// an already cached set wins. If the rules are re-registered while the
    /// set is being generated, generation starts over with the new rules.
    fn compute_and_store(
        &self,
        key: &str,
        window: DateWindow,
        replace: bool,
    ) -> Result<Arc<HolidaySet>> {
        loop {
            let rule_set = self.rule_set(key)?;
            let set = Arc::new(rule_set.generate(&window)?);

            let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
            let current = self
                .rule_sets
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(key)
                .is_some_and(|registered| Arc::ptr_eq(registered, &rule_set));
            if !current {
                tracing::debug!(jurisdiction = %key, "rules replaced during generation, retrying");
                continue;
            }

            if !replace {
                if let Some(existing) = cache.get(key) {
                    return Ok(Arc::clone(existing));
                }
            }
            tracing::debug!(
                jurisdiction = %key,
                %window,
                holidays = set.len(),
                "holiday set cached"
            );
            cache.insert(key.to_string(), Arc::clone(&set));
            return Ok(set);
        }
    }
}

fn normalize(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

fn step(date: NaiveDate, forward: bool, window: DateWindow) -> Result<NaiveDate> {
    let next = if forward {
        date.checked_add_days(Days::new(1))
    } else {
        date.checked_sub_days(Days::new(1))
    };
    next.ok_or(HolidayError::OutOfWindow { date, window })
}
