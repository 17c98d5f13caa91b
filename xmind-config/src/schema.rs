//! Strongly typed settings schema and validation.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{ConfigError, ConfigResult, FieldIssue};

/// Environment variable names read by [`Settings::from_map`].
pub mod vars {
    /// Application name.
    pub const APP_NAME: &str = "APP_NAME";
    /// Debug flag.
    pub const DEBUG: &str = "DEBUG";
    /// Deployment stage label.
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    /// MongoDB connection string.
    pub const MONGODB_URL: &str = "MONGODB_URL";
    /// Redis host.
    pub const REDIS_HOST: &str = "REDIS_HOST";
    /// Redis port.
    pub const REDIS_PORT: &str = "REDIS_PORT";
    /// API bind host.
    pub const API_HOST: &str = "API_HOST";
    /// API bind port.
    pub const API_PORT: &str = "API_PORT";

    /// Every required variable, in field declaration order.
    pub const ALL: [&str; 8] = [
        APP_NAME,
        DEBUG,
        ENVIRONMENT,
        MONGODB_URL,
        REDIS_HOST,
        REDIS_PORT,
        API_HOST,
        API_PORT,
    ];
}

const EXPECTED_BOOL: &str = "a boolean (true/false, 1/0, yes/no, on/off)";
const EXPECTED_PORT: &str = "a port number (0-65535)";

/// Validated application settings.
///
/// Instances only exist fully populated; use [`Settings::from_map`] or
/// [`crate::SettingsLoader`] to build one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Settings {
    app_name: String,
    debug: bool,
    environment: String,
    mongodb_url: String,
    redis_host: String,
    redis_port: u16,
    api_host: String,
    api_port: u16,
}

impl Settings {
    /// Validates a raw variable map into settings.
    ///
    /// Every missing or malformed variable is reported, not just the first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if any required variable is absent
    /// or cannot be coerced to its declared type.
    pub fn from_map(raw: &HashMap<String, String>) -> ConfigResult<Self> {
        let mut fields = FieldReader::new(raw);

        let app_name = fields.string(vars::APP_NAME);
        let debug = fields.boolean(vars::DEBUG);
        let environment = fields.string(vars::ENVIRONMENT);
        let mongodb_url = fields.string(vars::MONGODB_URL);
        let redis_host = fields.string(vars::REDIS_HOST);
        let redis_port = fields.port(vars::REDIS_PORT);
        let api_host = fields.string(vars::API_HOST);
        let api_port = fields.port(vars::API_PORT);

        let (
            Some(app_name),
            Some(debug),
            Some(environment),
            Some(mongodb_url),
            Some(redis_host),
            Some(redis_port),
            Some(api_host),
            Some(api_port),
        ) = (
            app_name,
            debug,
            environment,
            mongodb_url,
            redis_host,
            redis_port,
            api_host,
            api_port,
        )
        else {
            return Err(ConfigError::Validation {
                issues: fields.into_issues(),
            });
        };

        Ok(Self {
            app_name,
            debug,
            environment,
            mongodb_url,
            redis_host,
            redis_port,
            api_host,
            api_port,
        })
    }

    /// Returns the application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Returns whether debug mode is enabled.
    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }

    /// Returns the deployment stage label (e.g. `dev`, `prod`).
    #[must_use]
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Returns the MongoDB connection string.
    #[must_use]
    pub fn mongodb_url(&self) -> &str {
        &self.mongodb_url
    }

    /// Returns the Redis host.
    #[must_use]
    pub fn redis_host(&self) -> &str {
        &self.redis_host
    }

    /// Returns the Redis port.
    #[must_use]
    pub const fn redis_port(&self) -> u16 {
        self.redis_port
    }

    /// Returns the API bind host.
    #[must_use]
    pub fn api_host(&self) -> &str {
        &self.api_host
    }

    /// Returns the API bind port.
    #[must_use]
    pub const fn api_port(&self) -> u16 {
        self.api_port
    }

    /// Returns the API bind address as `host:port`.
    #[must_use]
    pub fn api_bind_addr(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    /// Returns the Redis address as `host:port`.
    #[must_use]
    pub fn redis_addr(&self) -> String {
        format!("{}:{}", self.redis_host, self.redis_port)
    }
}

/// Reads typed fields out of the raw map, collecting issues as it goes.
struct FieldReader<'a> {
    raw: &'a HashMap<String, String>,
    issues: Vec<FieldIssue>,
}

impl<'a> FieldReader<'a> {
    fn new(raw: &'a HashMap<String, String>) -> Self {
        Self {
            raw,
            issues: Vec::new(),
        }
    }

    fn lookup(&mut self, var: &'static str) -> Option<&'a str> {
        let raw = self.raw;
        let value = raw.get(var).map(String::as_str);
        if value.is_none() {
            self.issues.push(FieldIssue::Missing { var });
        }
        value
    }

    fn string(&mut self, var: &'static str) -> Option<String> {
        self.lookup(var).map(str::to_owned)
    }

    fn boolean(&mut self, var: &'static str) -> Option<bool> {
        let value = self.lookup(var)?;
        self.coerce(var, value, EXPECTED_BOOL, parse_bool)
    }

    fn port(&mut self, var: &'static str) -> Option<u16> {
        let value = self.lookup(var)?;
        self.coerce(var, value, EXPECTED_PORT, |v| v.trim().parse::<u16>().ok())
    }

    fn coerce<T>(
        &mut self,
        var: &'static str,
        value: &str,
        expected: &'static str,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Option<T> {
        let parsed = parse(value);
        if parsed.is_none() {
            self.issues.push(FieldIssue::Invalid {
                var,
                value: value.to_owned(),
                expected,
            });
        }
        parsed
    }

    fn into_issues(self) -> Vec<FieldIssue> {
        self.issues
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}
