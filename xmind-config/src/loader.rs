//! Raw variable sources: the env file and the process environment.
//!
//! Values are collected into a plain map and handed to
//! [`Settings::from_map`]; nothing here mutates the process environment.

use std::collections::HashMap;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult, FieldIssue};
use crate::schema::{self, Settings};

/// Env file consulted when no other path is configured, relative to the
/// current working directory.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Reads `KEY=VALUE` pairs from a dotenv file.
///
/// A missing file is not an error and yields an empty map. Only the braced
/// `${NAME}` form is substituted; a bare `$` is kept literally, and
/// single-quoted values are never substituted.
///
/// # Errors
///
/// Returns [`ConfigError::EnvFile`] if the file exists but cannot be read or
/// contains a malformed line.
pub fn load_env_file(path: &Path) -> ConfigResult<HashMap<String, String>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "env file not found, skipping");
            return Ok(HashMap::new());
        }
        Err(err) => return Err(ConfigError::env_file(path, err.to_string())),
    };

    let escaped = escape_bare_dollars(&contents);
    let mut values = HashMap::new();
    for entry in dotenvy::from_read_iter(escaped.as_bytes()) {
        let (key, value) = entry.map_err(|err| ConfigError::env_file(path, err.to_string()))?;
        values.insert(key, value);
    }

    debug!(path = %path.display(), count = values.len(), "read env file");
    Ok(values)
}

/// Escapes every `$` that does not open a `${NAME}` reference, outside
/// single quotes, so the dotenv parser keeps it literally.
fn escape_bare_dollars(contents: &str) -> String {
    let mut out = String::with_capacity(contents.len());
    let mut chars = contents.chars().peekable();
    let mut single = false;
    let mut double = false;
    let mut line_start = true;
    let mut after_blank = false;

    while let Some(c) = chars.next() {
        out.push(c);
        if single {
            single = c != '\'';
        } else if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else if c == '$' {
            if chars.peek() != Some(&'{') {
                out.pop();
                out.push_str("\\$");
            }
        } else if double {
            double = c != '"';
        } else if c == '#' && (line_start || after_blank) {
            for rest in chars.by_ref() {
                out.push(rest);
                if rest == '\n' {
                    break;
                }
            }
            line_start = true;
            after_blank = false;
            continue;
        } else if c == '\'' {
            single = true;
        } else if c == '"' {
            double = true;
        }

        if !single && !double {
            line_start = c == '\n' || (line_start && (c == ' ' || c == '\t'));
            after_blank = c == ' ' || c == '\t';
        }
    }
    out
}

/// Snapshot of the process environment.
///
/// Names that are not valid UTF-8 are skipped. A non-UTF-8 value for a
/// settings variable is kept lossily, with a warning, so it still takes
/// precedence over the env file.
#[must_use]
pub fn process_vars() -> HashMap<String, String> {
    utf8_vars(env::vars_os())
}

fn utf8_vars(vars: impl IntoIterator<Item = (OsString, OsString)>) -> HashMap<String, String> {
    vars.into_iter()
        .filter_map(|(key, value)| {
            let key = key.into_string().ok()?;
            match value.into_string() {
                Ok(value) => Some((key, value)),
                Err(value) if schema::vars::ALL.contains(&key.as_str()) => {
                    warn!(var = %key, "environment value is not valid UTF-8");
                    let value = value.to_string_lossy().into_owned();
                    Some((key, value))
                }
                Err(_) => None,
            }
        })
        .collect()
}

/// Overlays `live` on top of `file`; live values win on key collision.
#[must_use]
pub fn merge_sources(
    file: HashMap<String, String>,
    live: HashMap<String, String>,
) -> HashMap<String, String> {
    let mut merged = file;
    merged.extend(live);
    merged
}

#[derive(Clone, Debug)]
enum VarSource {
    Process,
    Fixed(HashMap<String, String>),
}

/// Builder describing where settings are read from.
///
/// The default reads `.env` from the working directory and overlays the
/// live process environment.
#[derive(Clone, Debug)]
pub struct SettingsLoader {
    env_file: Option<PathBuf>,
    source: VarSource,
}

impl SettingsLoader {
    /// Creates a loader with the default sources.
    #[must_use]
    pub fn new() -> Self {
        Self {
            env_file: Some(PathBuf::from(DEFAULT_ENV_FILE)),
            source: VarSource::Process,
        }
    }

    /// Reads defaults from the given env file instead of `.env`.
    #[must_use]
    pub fn env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    /// Disables env file lookup entirely.
    #[must_use]
    pub fn without_env_file(mut self) -> Self {
        self.env_file = None;
        self
    }

    /// Uses the supplied variables in place of the process environment.
    #[must_use]
    pub fn with_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.source = VarSource::Fixed(
            vars.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        );
        self
    }

    /// Returns the configured env file path, if any.
    #[must_use]
    pub fn env_file_path(&self) -> Option<&Path> {
        self.env_file.as_deref()
    }

    /// Collects the merged raw variables without validating them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvFile`] if the env file is unreadable.
    pub fn raw_vars(&self) -> ConfigResult<HashMap<String, String>> {
        let file = match &self.env_file {
            Some(path) => load_env_file(path)?,
            None => HashMap::new(),
        };
        let live = match &self.source {
            VarSource::Process => process_vars(),
            VarSource::Fixed(vars) => vars.clone(),
        };
        Ok(merge_sources(file, live))
    }

    /// Reads, merges, and validates the settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvFile`] for an unreadable env file and
    /// [`ConfigError::Validation`] for missing or malformed variables.
    pub fn load(&self) -> ConfigResult<Settings> {
        let raw = self.raw_vars()?;
        match Settings::from_map(&raw) {
            Ok(settings) => {
                info!(
                    app = settings.app_name(),
                    environment = settings.environment(),
                    debug = settings.debug(),
                    "settings loaded"
                );
                Ok(settings)
            }
            Err(err) => {
                let vars: Vec<_> = err.issues().iter().map(FieldIssue::var).collect();
                warn!(?vars, "settings validation failed");
                Err(err)
            }
        }
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn missing_env_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let values = load_env_file(&dir.path().join(".env")).expect("missing is fine");
        assert!(values.is_empty());
    }

    #[test]
    fn parses_dotenv_syntax() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(".env");
        fs::write(
            &path,
            "# local overrides\nAPP_NAME=xmind-api\nexport ENVIRONMENT=dev\n\nMONGODB_URL=\"mongodb://localhost:27017\"\n",
        )
        .expect("write env file");

        let values = load_env_file(&path).expect("parse");
        assert_eq!(values.len(), 3);
        assert_eq!(values["APP_NAME"], "xmind-api");
        assert_eq!(values["ENVIRONMENT"], "dev");
        assert_eq!(values["MONGODB_URL"], "mongodb://localhost:27017");
    }

    #[test]
    fn malformed_env_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(".env");
        fs::write(&path, "APP_NAME=xmind-api\nthis is not a pair\n").expect("write env file");

        let err = load_env_file(&path).expect_err("bad line");
        assert!(matches!(err, ConfigError::EnvFile { .. }));
    }

    #[test]
    fn live_values_win_on_collision() {
        let merged = merge_sources(
            map(&[("API_PORT", "8000"), ("API_HOST", "127.0.0.1")]),
            map(&[("API_PORT", "9000")]),
        );
        assert_eq!(merged["API_PORT"], "9000");
        assert_eq!(merged["API_HOST"], "127.0.0.1");
    }

    #[test]
    fn loader_without_env_file_uses_fixed_vars() {
        let loader = SettingsLoader::new()
            .without_env_file()
            .with_vars([("APP_NAME", "xmind-api")]);
        assert!(loader.env_file_path().is_none());

        let raw = loader.raw_vars().expect("no file to read");
        assert_eq!(raw, map(&[("APP_NAME", "xmind-api")]));
    }

    #[test]
    fn default_loader_points_at_dotenv() {
        let loader = SettingsLoader::default();
        assert_eq!(loader.env_file_path(), Some(Path::new(".env")));
    }

    #[test]
    fn bare_dollar_is_literal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(".env");
        fs::write(
            &path,
            "MONGODB_URL=mongodb://admin:pa$sword@db:27017\n\
             QUOTED=\"pa$sword\"\n\
             SINGLE='pa$sword ${XMIND_UNSET}'\n\
             TRAILING=cost$\n\
             ESCAPED=pa\\$sword\n",
        )
        .expect("write env file");

        let values = load_env_file(&path).expect("parse");
        assert_eq!(values["MONGODB_URL"], "mongodb://admin:pa$sword@db:27017");
        assert_eq!(values["QUOTED"], "pa$sword");
        assert_eq!(values["SINGLE"], "pa$sword ${XMIND_UNSET}");
        assert_eq!(values["TRAILING"], "cost$");
        assert_eq!(values["ESCAPED"], "pa$sword");
    }

    #[test]
    fn braced_reference_is_substituted() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(".env");
        fs::write(
            &path,
            "# base host, isn't exported\nXMIND_LOADER_BASE=db.internal\n\
             MONGODB_URL=\"mongodb://${XMIND_LOADER_BASE}:27017\"\n\
             REDIS_HOST=${XMIND_LOADER_BASE} # $comment\n",
        )
        .expect("write env file");

        let values = load_env_file(&path).expect("parse");
        assert_eq!(values["MONGODB_URL"], "mongodb://db.internal:27017");
        assert_eq!(values["REDIS_HOST"], "db.internal");
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_settings_value_still_overrides() {
        use std::os::unix::ffi::OsStringExt;

        let vars = utf8_vars([
            (OsString::from("APP_NAME"), OsString::from_vec(b"xmind\xff".to_vec())),
            (OsString::from("UNRELATED"), OsString::from_vec(b"\xfe".to_vec())),
        ]);

        assert_eq!(vars["APP_NAME"], "xmind\u{fffd}");
        assert!(!vars.contains_key("UNRELATED"));

        let merged = merge_sources(map(&[("APP_NAME", "from-file")]), vars);
        assert_eq!(merged["APP_NAME"], "xmind\u{fffd}");
    }
}
