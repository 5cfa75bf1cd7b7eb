//! Persisted weekly budget.
//!
//! Settings live in a small JSON object file. Only the
//! [`WEEKLY_BUDGET_KEY`](crate::config::WEEKLY_BUDGET_KEY) entry belongs to
//! this crate; other keys are left untouched on write.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::config;
use crate::errors::{FinanceError, FinanceResult};

#[derive(Debug, Clone)]
pub struct BudgetStore {
    path: PathBuf,
}

impl Default for BudgetStore {
    fn default() -> Self {
        Self::new(config::default_settings_path())
    }
}

impl BudgetStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_settings(&self) -> FinanceResult<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Write to a temp file first so an interrupted write keeps the old settings.
    fn write_settings(&self, settings: &Map<String, Value>) -> FinanceResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let result = (|| -> FinanceResult<()> {
            fs::write(&tmp, serde_json::to_string_pretty(settings)?)?;
            fs::rename(&tmp, &self.path)?;
            Ok(())
        })();
        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }

    /// Stored budget, or `None` when the user never set one.
    pub fn load(&self) -> FinanceResult<Option<Decimal>> {
        let settings = self.read_settings()?;
        match settings.get(config::WEEKLY_BUDGET_KEY) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => parse_budget(s).map(Some),
            Some(Value::Number(n)) => parse_budget(&n.to_string()).map(Some),
            Some(other) => Err(FinanceError::InvalidBudget(other.to_string())),
        }
    }

    pub fn save(&self, budget: Decimal) -> FinanceResult<()> {
        if budget < Decimal::ZERO {
            return Err(FinanceError::InvalidBudget(budget.to_string()));
        }
        let mut settings = self.read_settings()?;
        settings.insert(
            config::WEEKLY_BUDGET_KEY.to_string(),
            Value::String(budget.to_string()),
        );
        self.write_settings(&settings)?;
        tracing::debug!(%budget, path = %self.path.display(), "weekly budget saved");
        Ok(())
    }

    /// Forget the budget, returning to the "no budget set" state.
    pub fn clear(&self) -> FinanceResult<()> {
        let mut settings = self.read_settings()?;
        if settings.remove(config::WEEKLY_BUDGET_KEY).is_some() {
            self.write_settings(&settings)?;
        }
        Ok(())
    }
}

fn parse_budget(s: &str) -> FinanceResult<Decimal> {
    let budget =
        Decimal::from_str(s.trim()).map_err(|_| FinanceError::InvalidBudget(s.to_string()))?;
    if budget < Decimal::ZERO {
        return Err(FinanceError::InvalidBudget(s.to_string()));
    }
    Ok(budget)
}
