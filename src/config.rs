use clap::Parser;
use crate::cli::Cli;
use crate::error::{FreshError, FreshResult};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tracing::Level;

const TRACE_LEVELS: [&'static str; 5] = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];
const LOCAL_SETTINGS_YAML_FILE: &str = ".env.local.yaml";

// All settings may be configured via environment variables. Example:
// PORT="9000" would set port to 9000.
// Precedence, lowest first: defaults, local yaml file, environment, command line.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Settings {
    #[serde(default = "default_trace_level")]
    pub trace_level: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_refresh_interval_sec")]
    pub refresh_interval_sec: u64,
    #[serde(default = "default_source_base_url")]
    pub source_base_url: String,
    #[serde(default = "default_source_timeout_sec")]
    pub source_timeout_sec: u64,
}

impl Settings {
    pub fn new() -> FreshResult<Self> {
        Settings::extract(Settings::figment(Cli::parse()))
    }

    pub fn figment(cli: Cli) -> Figment {
        let mut figment = Figment::new();
        if Path::new(LOCAL_SETTINGS_YAML_FILE).exists() {
            println!(
                "\n######################################\n\
                   ##   Found '.env.local.yaml' file,  ##\n\
                   ##   loading local configuration.   ##\n\
                   ######################################\n\
                "
            );
            figment = figment.merge(Yaml::file(LOCAL_SETTINGS_YAML_FILE));
        }
        // An exported but empty variable (e.g. `PORT=`) counts as unset.
        let env = Env::raw().filter(|key| {
            std::env::var_os(key.as_str()).is_some_and(|value| !value.is_empty())
        });
        figment.merge(env).merge(Serialized::defaults(cli))
    }

    pub fn extract(figment: Figment) -> FreshResult<Self> {
        let settings: Settings = figment.extract()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> FreshResult<()> {
        if self.refresh_interval_sec == 0 {
            return Err(FreshError::Config(
                "refresh_interval_sec must be greater than zero".to_string(),
            ));
        }
        if self.source_timeout_sec == 0 {
            return Err(FreshError::Config(
                "source_timeout_sec must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn get_trace_level(&self) -> Level {
        get_trace_level(&self.trace_level)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_sec)
    }

    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_sec)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            trace_level: default_trace_level(),
            port: default_port(),
            refresh_interval_sec: default_refresh_interval_sec(),
            source_base_url: default_source_base_url(),
            source_timeout_sec: default_source_timeout_sec(),
        }
    }
}

fn get_trace_level(level_str: &str) -> Level {
    match level_str {
        level if level == TRACE_LEVELS[0] => Level::TRACE,
        level if level == TRACE_LEVELS[1] => Level::DEBUG,
        level if level == TRACE_LEVELS[2] => Level::INFO,
        level if level == TRACE_LEVELS[3] => Level::WARN,
        level if level == TRACE_LEVELS[4] => Level::ERROR,
        // Default trace level
        _ => Level::INFO,
    }
}

fn default_trace_level() -> String {
    "INFO".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_refresh_interval_sec() -> u64 {
    120
}

fn default_source_base_url() -> String {
    "https://www.rottentomatoes.com".to_string()
}

fn default_source_timeout_sec() -> u64 {
    5
}
