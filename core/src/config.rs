//! Client configuration: platform address, tenant credentials and timeout.
//!
//! # Design
//! `H3YunConfig` is a plain value. It is validated once, when a `Dispatcher`
//! is built from it, so a client constructed from bad settings fails before
//! any request goes out. After that the dispatcher owns its copy and nothing
//! mutates it.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ApiError, Result};

pub const DEFAULT_BASE_URL: &str = "https://www.h3yun.com";
pub const DEFAULT_TIMEOUT_SECONDS: i64 = 60;
/// Settings section bound by `from_json_section` when callers have no
/// naming convention of their own.
pub const DEFAULT_SECTION: &str = "H3Yun";

pub const ENV_BASE_URL: &str = "H3YUN_BASE_URL";
pub const ENV_ENGINE_CODE: &str = "H3YUN_ENGINE_CODE";
pub const ENV_ENGINE_SECRET: &str = "H3YUN_ENGINE_SECRET";
pub const ENV_TIMEOUT_SECONDS: &str = "H3YUN_TIMEOUT_SECONDS";

#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct H3YunConfig {
    pub base_url: String,
    pub engine_code: String,
    pub engine_secret: String,
    pub timeout_seconds: i64,
}

impl Default for H3YunConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            engine_code: String::new(),
            engine_secret: String::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl fmt::Debug for H3YunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("H3YunConfig")
            .field("base_url", &self.base_url)
            .field("engine_code", &self.engine_code)
            .field("engine_secret", &"<redacted>")
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl H3YunConfig {
    pub fn new(engine_code: impl Into<String>, engine_secret: impl Into<String>) -> Self {
        Self {
            engine_code: engine_code.into(),
            engine_secret: engine_secret.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_seconds(mut self, timeout_seconds: i64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Read settings from `H3YUN_*` environment variables over the defaults.
    ///
    /// The result is not validated; that happens when a client is built.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        if let Some(engine_code) = lookup(ENV_ENGINE_CODE) {
            config.engine_code = engine_code;
        }
        if let Some(engine_secret) = lookup(ENV_ENGINE_SECRET) {
            config.engine_secret = engine_secret;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECONDS) {
            config.timeout_seconds = raw.trim().parse().map_err(|_| {
                ApiError::invalid_config("TimeoutSeconds", format!("is not an integer: {raw:?}"))
            })?;
        }
        Ok(config)
    }

    /// Bind one section of a JSON settings document, e.g.
    /// `{"H3Yun": {"EngineCode": "...", "EngineSecret": "..."}}`.
    ///
    /// A missing section yields the defaults, like an unset options block.
    pub fn from_json_section(settings: &str, section: &str) -> Result<Self> {
        let root: serde_json::Value =
            serde_json::from_str(settings).map_err(|e| ApiError::malformed_json(&e))?;
        match root.get(section) {
            None | Some(serde_json::Value::Null) => Ok(Self::default()),
            Some(value) => {
                serde_json::from_value(value.clone()).map_err(|e| ApiError::malformed_json(&e))
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(ApiError::invalid_config("BaseUrl", "must not be empty"));
        }
        if let Err(err) = url::Url::parse(self.base_url.trim()) {
            return Err(ApiError::invalid_config("BaseUrl", format!("is not a valid URL: {err}")));
        }
        if self.engine_code.trim().is_empty() {
            return Err(ApiError::invalid_config("EngineCode", "must not be empty"));
        }
        if self.engine_secret.trim().is_empty() {
            return Err(ApiError::invalid_config("EngineSecret", "must not be empty"));
        }
        if self.timeout_seconds <= 0 {
            return Err(ApiError::invalid_config("TimeoutSeconds", "must be greater than 0"));
        }
        Ok(())
    }

    /// The configured timeout. Only meaningful after `validate` has passed.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.max(0) as u64)
    }

    /// Base URL without a trailing slash, ready for path concatenation.
    pub(crate) fn trimmed_base_url(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }
}
