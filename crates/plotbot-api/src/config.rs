use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

/// Errors raised while reading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct DataConfig {
    /// CSV file; relative paths resolve against the deployment directory
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// Exit at startup instead of serving without data
    #[serde(default)]
    pub fail_fast: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { path: default_data_path(), fail_fast: false }
    }
}

impl DataConfig {
    /// Absolute location of the data file.
    pub fn resolve_path(&self, base_dir: &Path) -> PathBuf {
        if self.path.is_absolute() { self.path.clone() } else { base_dir.join(&self.path) }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Json => f.write_str("json"),
            LogFormat::Pretty => f.write_str("pretty"),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    /// Default filter directives; `RUST_LOG` takes precedence
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: LogFormat::default(), filter: default_log_filter() }
    }
}

/// Something noticed while assembling the configuration, logged once the
/// subscriber is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigNotice {
    /// The configuration file does not exist; defaults are in use
    MissingFile { path: PathBuf },
    /// An environment override could not be parsed and was ignored
    IgnoredOverride { key: &'static str, value: String, reason: String },
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PlotbotConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Pending diagnostics, drained by [`PlotbotConfig::log_notices`]
    #[serde(skip)]
    pub notices: Vec<ConfigNotice>,
}

impl PlotbotConfig {
    /// Load from `PLOTBOT_CONFIG_PATH`, or `plotbot.toml` in the working
    /// directory.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("PLOTBOT_CONFIG_PATH").unwrap_or_else(|_| "plotbot.toml".to_string());
        Self::from_file(config_path)
    }

    /// A missing file yields the defaults; an unreadable or invalid one is an
    /// error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self {
                notices: vec![ConfigNotice::MissingFile { path: path.to_path_buf() }],
                ..Self::default()
            }),
            Err(source) => Err(ConfigError::Io { path: path.to_path_buf(), source }),
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply `PLOTBOT_*` environment variable overrides.
    pub fn apply_profile(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Values that fail to parse are ignored
    /// and recorded as notices.
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(host) = lookup("PLOTBOT_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PLOTBOT_PORT") {
            match port.parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(err) => self.ignore("PLOTBOT_PORT", port, err.to_string()),
            }
        }
        if let Some(path) = lookup("PLOTBOT_DATA_PATH") {
            self.data.path = PathBuf::from(path);
        }
        if let Some(fail_fast) = lookup("PLOTBOT_FAIL_FAST") {
            match fail_fast.parse::<bool>() {
                Ok(fail_fast) => self.data.fail_fast = fail_fast,
                Err(err) => self.ignore("PLOTBOT_FAIL_FAST", fail_fast, err.to_string()),
            }
        }
        if let Some(format) = lookup("PLOTBOT_LOG_FORMAT") {
            match format.parse::<LogFormat>() {
                Ok(format) => self.logging.format = format,
                Err(err) => self.ignore("PLOTBOT_LOG_FORMAT", format, err),
            }
        }
        self
    }

    fn ignore(&mut self, key: &'static str, value: String, reason: String) {
        self.notices.push(ConfigNotice::IgnoredOverride { key, value, reason });
    }

    /// Log pending notices and the effective settings. Call after the
    /// subscriber is installed.
    pub fn log_notices(&mut self) {
        for notice in self.notices.drain(..) {
            match notice {
                ConfigNotice::MissingFile { path } => warn!(
                    "Configuration file '{}' not found. Using default configuration.",
                    path.display()
                ),
                ConfigNotice::IgnoredOverride { key, value, reason } => {
                    warn!(key, value = %value, reason = %reason, "Ignoring invalid override")
                }
            }
        }

        info!(
            host = %self.server.host,
            port = self.server.port,
            data_path = %self.data.path.display(),
            fail_fast = self.data.fail_fast,
            log_format = %self.logging.format,
            "Applied configuration"
        );
    }
}

/// Directory containing the running executable, where the data file is
/// deployed alongside the binary.
pub fn deployment_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_data_path() -> PathBuf {
    PathBuf::from("Data.csv")
}
fn default_log_filter() -> String {
    "plotbot=debug,plotbot_api=debug,plotbot_core=debug,tower_http=info,info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    /// Log sink shared between a test subscriber and the assertions.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn capture_notices(config: &mut PlotbotConfig) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || config.log_notices());
        logs.contents()
    }

    #[test]
    fn test_defaults() {
        let config = PlotbotConfig::default();
        assert_eq!(config.server.bind_address(), "127.0.0.1:8000");
        assert_eq!(config.data.path, PathBuf::from("Data.csv"));
        assert!(!config.data.fail_fast);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = PlotbotConfig::from_toml(
            r#"
[server]
port = 9000

[data]
fail_fast = true
"#,
        )
        .unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert!(config.data.fail_fast);
        assert_eq!(config.data.path, PathBuf::from("Data.csv"));
    }

    #[test]
    fn test_full_toml() {
        let config = PlotbotConfig::from_toml(
            r#"
[server]
host = "0.0.0.0"
port = 8080

[data]
path = "/srv/plotbot/questions.csv"

[logging]
format = "pretty"
filter = "warn"
"#,
        )
        .unwrap();
        assert_eq!(config.server.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn test_sample_config_matches_defaults() {
        let sample = include_str!("../../../plotbot.toml");
        let config = PlotbotConfig::from_toml(sample).unwrap();
        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(config.data.path, DataConfig::default().path);
        assert_eq!(config.logging.filter, default_log_filter());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let err = PlotbotConfig::from_toml("[server]\nport = \"eighty\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = PlotbotConfig::from_file("/nonexistent/plotbot.toml").unwrap();
        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(config.data, DataConfig::default());
        assert_eq!(
            config.notices,
            [ConfigNotice::MissingFile { path: PathBuf::from("/nonexistent/plotbot.toml") }]
        );
    }

    #[test]
    fn test_notices_are_logged_once_subscriber_is_installed() {
        let env: HashMap<&str, &str> = HashMap::from([("PLOTBOT_PORT", "not-a-port")]);
        let mut config = PlotbotConfig::from_file("/nonexistent/plotbot.toml")
            .unwrap()
            .apply_overrides(|key| env.get(key).map(|value| value.to_string()));

        let logs = capture_notices(&mut config);

        let missing = "Configuration file '/nonexistent/plotbot.toml' not found";
        assert!(logs.contains(missing), "{logs}");
        assert!(logs.contains("Ignoring invalid override"), "{logs}");
        assert!(logs.contains("PLOTBOT_PORT"), "{logs}");
        assert!(logs.contains("Applied configuration"), "{logs}");
        assert!(config.notices.is_empty());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("PLOTBOT_HOST", "0.0.0.0"),
            ("PLOTBOT_PORT", "9100"),
            ("PLOTBOT_DATA_PATH", "questions.csv"),
            ("PLOTBOT_FAIL_FAST", "true"),
            ("PLOTBOT_LOG_FORMAT", "Pretty"),
        ]);
        let config = PlotbotConfig::default()
            .apply_overrides(|key| env.get(key).map(|value| value.to_string()));

        assert_eq!(config.server.bind_address(), "0.0.0.0:9100");
        assert_eq!(config.data.path, PathBuf::from("questions.csv"));
        assert!(config.data.fail_fast);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let env: HashMap<&str, &str> =
            HashMap::from([("PLOTBOT_PORT", "not-a-port"), ("PLOTBOT_FAIL_FAST", "sometimes")]);
        let config = PlotbotConfig::default()
            .apply_overrides(|key| env.get(key).map(|value| value.to_string()));

        assert_eq!(config.server.port, 8000);
        assert!(!config.data.fail_fast);

        let ignored: Vec<&str> = config
            .notices
            .iter()
            .filter_map(|notice| match notice {
                ConfigNotice::IgnoredOverride { key, .. } => Some(*key),
                ConfigNotice::MissingFile { .. } => None,
            })
            .collect();
        assert_eq!(ignored, ["PLOTBOT_PORT", "PLOTBOT_FAIL_FAST"]);
    }

    #[test]
    #[serial]
    fn test_apply_profile_reads_environment() {
        // SAFETY: serialized with the other environment tests.
        unsafe {
            std::env::set_var("PLOTBOT_PORT", "9200");
        }

        let config = PlotbotConfig::default().apply_profile();
        assert_eq!(config.server.port, 9200);

        // SAFETY: see above.
        unsafe {
            std::env::remove_var("PLOTBOT_PORT");
        }
    }

    #[test]
    fn test_resolve_data_path() {
        let relative = DataConfig::default();
        assert_eq!(
            relative.resolve_path(Path::new("/opt/plotbot")),
            PathBuf::from("/opt/plotbot/Data.csv")
        );

        let absolute = DataConfig { path: PathBuf::from("/data/qa.csv"), fail_fast: false };
        assert_eq!(absolute.resolve_path(Path::new("/opt/plotbot")), PathBuf::from("/data/qa.csv"));
    }
}
