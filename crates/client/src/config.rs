use gridview_core::error::CoreError;
use gridview_core::snapshot::ViewKind;
use gridview_core::types::UserId;

/// Settings client configuration loaded from environment variables.
///
/// All fields except the user id have defaults suitable for local
/// development.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the settings API (default: `http://localhost:8080/api`).
    pub api_url: String,
    /// Endpoint path for column-layout snapshots.
    pub column_settings_path: String,
    /// Endpoint path for filter snapshots.
    pub filter_settings_path: String,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Session user that owns newly created snapshots.
    pub user_id: Option<UserId>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080/api".into(),
            column_settings_path: "table-settings".into(),
            filter_settings_path: "table-filter-settings".into(),
            request_timeout_secs: 30,
            user_id: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                      |
    /// |------------------------|------------------------------|
    /// | `SETTINGS_API_URL`     | `http://localhost:8080/api`  |
    /// | `COLUMN_SETTINGS_PATH` | `table-settings`             |
    /// | `FILTER_SETTINGS_PATH` | `table-filter-settings`      |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                         |
    /// | `GRIDVIEW_USER_ID`     | unset                        |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let request_timeout_secs = match get("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.parse().map_err(|_| {
                CoreError::Validation(format!(
                    "REQUEST_TIMEOUT_SECS must be a valid u64, got '{raw}'"
                ))
            })?,
            None => defaults.request_timeout_secs,
        };

        let user_id = match get("GRIDVIEW_USER_ID") {
            Some(raw) => Some(raw.parse().map_err(|_| {
                CoreError::Validation(format!("GRIDVIEW_USER_ID must be an integer, got '{raw}'"))
            })?),
            None => None,
        };

        Ok(Self {
            api_url: get("SETTINGS_API_URL").unwrap_or(defaults.api_url),
            column_settings_path: get("COLUMN_SETTINGS_PATH")
                .unwrap_or(defaults.column_settings_path),
            filter_settings_path: get("FILTER_SETTINGS_PATH")
                .unwrap_or(defaults.filter_settings_path),
            request_timeout_secs,
            user_id,
        })
    }

    /// Endpoint path for `kind`.
    pub fn path_for(&self, kind: ViewKind) -> &str {
        match kind {
            ViewKind::Columns => &self.column_settings_path,
            ViewKind::Filters => &self.filter_settings_path,
        }
    }

    /// The session user, or a validation error if none is configured.
    pub fn require_user(&self) -> Result<UserId, CoreError> {
        self.user_id.ok_or_else(|| {
            CoreError::Validation("GRIDVIEW_USER_ID must be set".to_string())
        })
    }
}
