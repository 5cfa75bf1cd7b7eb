use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Environment variable that overrides [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "CAMPUS_BALANCE_API_URL";

pub const BALANCE_PATH: &str = "/api/balance";
pub const TRANSACTIONS_PATH: &str = "/api/transactions";
pub const HEALTH_PATH: &str = "/api/health";

/// Transaction scraping upstream is slow; requests routinely take tens of seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Settings key holding the user's weekly budget.
pub const WEEKLY_BUDGET_KEY: &str = "weeklyBudget";

const SETTINGS_FILE: &str = "settings.json";

/// Base URL from the environment, falling back to the local default.
pub fn base_url() -> String {
    std::env::var(BASE_URL_ENV)
        .ok()
        .map(|url| url.trim().trim_end_matches('/').to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

pub fn default_settings_path() -> PathBuf {
    if let Some(config) = dirs::config_dir() {
        config.join("campus-balance-rs").join(SETTINGS_FILE)
    } else {
        PathBuf::from(".campus-balance-rs").join(SETTINGS_FILE)
    }
}
