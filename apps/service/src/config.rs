use std::{env, fmt, fs, io, path};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config file: {0}")]
    ReadFailed(#[source] io::Error),
    #[error("failed to write config file: {0}")]
    WriteFailed(#[source] io::Error),
    #[error("failed to parse config file: {0}")]
    ParseFailed(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    SerializeFailed(#[from] toml::ser::Error),
    #[error("no config directory available (set XDG_CONFIG_HOME or HOME)")]
    ConfigPathUnavailable,
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URLs probed on every cycle.
    pub endpoints: Vec<String>,

    pub poll_interval_seconds: u64,
    pub probe_timeout_seconds: u64,

    /// When set, a still-failing endpoint is re-alerted only after this many
    /// seconds. Absent means a fresh alert on every failing cycle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resend_interval_seconds: Option<u64>,

    /// The allow-listed outbound IP this process must run behind.
    pub expected_public_ip: String,
    pub ip_echo_url: String,

    pub log_directory: path::PathBuf,

    /// Substring-matched expected-status overrides; endpoints matching none
    /// of them are expected to answer 200.
    pub status_overrides: Vec<StatusOverride>,

    pub smtp: Smtp,
}

/// Maps any URL containing `contains` to an expected status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusOverride {
    pub contains: String,
    pub status: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Smtp {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub sender: String,
    pub recipient: String,
}

impl Default for Smtp {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".into(),
            port: 465,
            username: String::new(),
            password: String::new(),
            sender: String::new(),
            recipient: String::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoints: Vec::new(),
            poll_interval_seconds: 120,
            probe_timeout_seconds: 15,
            resend_interval_seconds: None,
            expected_public_ip: String::new(),
            ip_echo_url: "https://api.ipify.org/?format=json".into(),
            log_directory: path::PathBuf::from("."),
            status_overrides: vec![
                // POST-only callback endpoints answer GET probes with an error
                // status; that status is the healthy one for them.
                StatusOverride { contains: "support.".into(), status: 405 },
                StatusOverride { contains: "crm.".into(), status: 404 },
            ],
            smtp: Smtp::default(),
        }
    }
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/watchpost/config.toml or
/// $HOME/.config/...)
fn default_config_path() -> Result<path::PathBuf, Error> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(Error::ConfigPathUnavailable);
    };

    Ok(path.join("watchpost/config.toml"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);
        let write_2 = write_indented(2);

        writeln!(f, "Current Internal Configuration State:")?;

        write_title_1(f, "Monitoring")?;
        for endpoint in &self.endpoints {
            write_2(f, "Endpoint", endpoint)?;
        }
        for rule in &self.status_overrides {
            write_2(f, "Override", &format!("*{}* expects HTTP {}", rule.contains, rule.status))?;
        }
        write_2(f, "Poll Interval", &format!("{}s", self.poll_interval_seconds))?;
        write_2(f, "Probe Timeout", &format!("{}s", self.probe_timeout_seconds))?;
        match self.resend_interval_seconds {
            Some(seconds) => write_2(f, "Re-alert After", &format!("{seconds}s"))?,
            None => write_2(f, "Re-alert", &"every failing cycle")?,
        }

        write_title_1(f, "IP Guard")?;
        write_2(f, "Expected Public IP", &self.expected_public_ip)?;
        write_2(f, "Echo Service", &self.ip_echo_url)?;

        write_title_1(f, "SMTP")?;
        write_2(f, "Host", &format!("{}:{}", self.smtp.host, self.smtp.port))?;
        write_2(f, "Username", &self.smtp.username)?;
        write_2(f, "Password", &"<elided>")?;
        write_2(f, "Sender", &self.smtp.sender)?;
        write_2(f, "Recipient", &self.smtp.recipient)?;

        write_title_1(f, "Logging")?;
        write_1(f, "Directory", &self.log_directory.display())?;

        Ok(())
    }
}

impl Config {
    /// Generate Config structure from file
    ///
    /// Creates a default config in ~/.config/watchpost/config.toml
    ///  or the specified path, with the name config.toml if one does not exist
    pub fn from_config(optional_path: Option<impl AsRef<path::Path>>) -> Result<Self, Error> {
        let config_path: path::PathBuf = if let Some(path) = optional_path {
            normalize_toml_path(path.as_ref())
        } else {
            default_config_path()?
        };

        if config_path.exists() {
            let raw_string = fs::read_to_string(&config_path).map_err(Error::ReadFailed)?;
            Ok(toml::from_str(raw_string.as_str())?)
        } else {
            let config = Self::default();
            config.write_config(&config_path)?;
            Ok(config)
        }
    }

    /// Serialize and write a config to a file
    pub fn write_config(&self, path: &path::Path) -> Result<(), Error> {
        let config_str: String = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(Error::WriteFailed)?;
        }

        fs::write(path, config_str).map_err(Error::WriteFailed)
    }

    /// Reject configurations the monitor cannot run with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.endpoints.is_empty() {
            return Err(Error::Invalid("no endpoints configured".into()));
        }

        for endpoint in &self.endpoints {
            let url = Url::parse(endpoint)
                .map_err(|e| Error::Invalid(format!("endpoint {endpoint}: {e}")))?;
            match url.scheme() {
                "http" | "https" => {}
                other => {
                    return Err(Error::Invalid(format!(
                        "endpoint {endpoint}: unsupported scheme {other}"
                    )));
                }
            }
        }

        for rule in &self.status_overrides {
            if rule.contains.is_empty() {
                return Err(Error::Invalid("status override with empty substring".into()));
            }
            if !(100..=599).contains(&rule.status) {
                return Err(Error::Invalid(format!(
                    "status override *{}*: {} is not an HTTP status code",
                    rule.contains, rule.status
                )));
            }
        }

        if self.poll_interval_seconds == 0 {
            return Err(Error::Invalid("poll_interval_seconds must be non-zero".into()));
        }
        if self.probe_timeout_seconds == 0 {
            return Err(Error::Invalid("probe_timeout_seconds must be non-zero".into()));
        }

        if self.expected_public_ip.is_empty() {
            return Err(Error::Invalid("expected_public_ip is not set".into()));
        }

        if self.smtp.sender.is_empty() || self.smtp.recipient.is_empty() {
            return Err(Error::Invalid("smtp sender and recipient must be set".into()));
        }

        Ok(())
    }
}
