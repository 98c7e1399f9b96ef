//! Rule sets -- every holiday rule and exceptional closure for one jurisdiction.
//!
//! Rules are evaluated independently and merged; none reads another's output
//! except through an explicit observance shift. The merge is a sort and dedup,
//! so two rules (or a rule and a ledger entry) naming the same date yield it once.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{HolidayError, Result};
use crate::exceptions::{ExceptionEntry, ExceptionLedger};
use crate::holiday_set::HolidaySet;
use crate::rule::{HolidayRule, RecurrenceRule};
use crate::window::DateWindow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    jurisdiction: String,
    rules: Vec<HolidayRule>,
    #[serde(default, skip_serializing_if = "ExceptionLedger::is_empty")]
    exceptions: ExceptionLedger,
}

impl RuleSet {
    pub fn builder(jurisdiction: impl Into<String>) -> RuleSetBuilder {
        RuleSetBuilder {
            jurisdiction: jurisdiction.into().to_ascii_uppercase(),
            rules: Vec::new(),
            exceptions: ExceptionLedger::new(),
        }
    }

    /// A builder seeded with this set's rules and ledger.
    pub fn into_builder(self) -> RuleSetBuilder {
        RuleSetBuilder {
            jurisdiction: self.jurisdiction,
            rules: self.rules,
            exceptions: self.exceptions,
        }
    }

    /// Parse a single rule set from JSON.
    ///
    /// # Errors
    /// Returns `HolidayError::InvalidRule` if the JSON is malformed or any rule
    /// or ledger entry fails validation.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut set: RuleSet = serde_json::from_str(json)
            .map_err(|e| HolidayError::InvalidRule(format!("rule set JSON: {}", e)))?;
        set.jurisdiction = set.jurisdiction.to_ascii_uppercase();
        set.validate()?;
        Ok(set)
    }

    /// Parse either one rule set object or an array of them.
    pub fn from_json_many(json: &str) -> Result<Vec<Self>> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            Many(Vec<RuleSet>),
            One(Box<RuleSet>),
        }

        let parsed: OneOrMany = serde_json::from_str(json)
            .map_err(|e| HolidayError::InvalidRule(format!("rule set JSON: {}", e)))?;
        let sets = match parsed {
            OneOrMany::Many(sets) => sets,
            OneOrMany::One(set) => vec![*set],
        };
        sets.into_iter()
            .map(|mut set| {
                set.jurisdiction = set.jurisdiction.to_ascii_uppercase();
                set.validate()?;
                Ok(set)
            })
            .collect()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| HolidayError::Expansion(e.to_string()))
    }

    pub fn jurisdiction(&self) -> &str {
        &self.jurisdiction
    }

    pub fn rules(&self) -> &[HolidayRule] {
        &self.rules
    }

    pub fn exceptions(&self) -> &ExceptionLedger {
        &self.exceptions
    }

    /// Distinct holiday names in declaration order.
    pub fn rule_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for rule in &self.rules {
            if !names.contains(&rule.name.as_str()) {
                names.push(&rule.name);
            }
        }
        names
    }

    /// Check every rule and ledger entry.
    pub fn validate(&self) -> Result<()> {
        if self.jurisdiction.trim().is_empty() {
            return Err(HolidayError::InvalidRule(
                "rule set needs a jurisdiction code".to_string(),
            ));
        }
        for rule in &self.rules {
            rule.rule.validate().map_err(|e| match e {
                HolidayError::InvalidRule(msg) => {
                    HolidayError::InvalidRule(format!("{}: {}", rule.name, msg))
                }
                other => other,
            })?;
        }
        for entry in self.exceptions.entries() {
            if entry.first > entry.last {
                return Err(HolidayError::InvalidRange {
                    start: entry.first,
                    end: entry.last,
                });
            }
        }
        Ok(())
    }

    /// Every holiday inside `window`: all rule outputs plus ledger closures,
    /// sorted and deduplicated.
    pub fn generate(&self, window: &DateWindow) -> Result<HolidaySet> {
        let mut candidates: Vec<NaiveDate> = Vec::new();
        for rule in &self.rules {
            candidates.extend(rule.generate(window)?);
        }
        candidates.extend(self.exceptions.dates_within(window));

        let set = HolidaySet::from_dates(*window, candidates);
        tracing::debug!(
            jurisdiction = %self.jurisdiction,
            %window,
            rules = self.rules.len(),
            holidays = set.len(),
            "rule set generated"
        );
        Ok(set)
    }
}

/// Incremental construction of a [`RuleSet`].
#[derive(Debug, Clone)]
pub struct RuleSetBuilder {
    jurisdiction: String,
    rules: Vec<HolidayRule>,
    exceptions: ExceptionLedger,
}

impl RuleSetBuilder {
    pub fn rule(mut self, rule: HolidayRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Add `rule` and its weekend observance under the same name and
    /// effective date.
    pub fn observed(
        mut self,
        rule: HolidayRule,
        on_saturday: Option<i32>,
        on_sunday: Option<i32>,
    ) -> Self {
        let shift = HolidayRule {
            name: rule.name.clone(),
            rule: RecurrenceRule::observed(rule.rule.clone(), on_saturday, on_sunday),
            effective_from: rule.effective_from,
        };
        self.rules.push(rule);
        self.rules.push(shift);
        self
    }

    pub fn exception(mut self, entry: ExceptionEntry) -> Self {
        self.exceptions.push(entry);
        self
    }

    pub fn build(self) -> RuleSet {
        RuleSet {
            jurisdiction: self.jurisdiction,
            rules: self.rules,
            exceptions: self.exceptions,
        }
    }
}
