//! Runtime configuration.
//!
//! Values come from three places, highest priority first: command-line
//! flags, `BCASTWATCH_*` environment variables, built-in defaults.

use std::time::Duration;

use crate::capture::CaptureFilter;
use crate::error::{CaptureError, ConfigError};

pub const DEFAULT_WINDOW_SECS: u64 = 5;
pub const DEFAULT_FILTER: &str = "broadcast";

pub const ENV_INTERFACE: &str = "BCASTWATCH_INTERFACE";
pub const ENV_WINDOW_SECS: &str = "BCASTWATCH_WINDOW_SECS";
pub const ENV_FILTER: &str = "BCASTWATCH_FILTER";

/// Values given on the command line. `None` falls back to the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigArgs {
    pub interface: Option<String>,
    pub window_secs: Option<u64>,
    pub filter: Option<String>,
    pub verbose: bool,
}

impl ConfigArgs {
    /// Default tracing filter when `RUST_LOG` is not set.
    pub fn tracing_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Interface selector (index, name or description).
    ///
    /// `None` means ask or pick a default.
    pub interface: Option<String>,
    /// Length of each counting window.
    pub window: Duration,
    /// Filter expression for the capture handle, parsed by [`Config::capture_filter`].
    pub filter: String,
    pub verbose: bool,
}

impl Config {
    /// Build the configuration from flags and a variable lookup such as
    /// `std::env::var`, then validate it.
    pub fn resolve<F>(args: ConfigArgs, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |var: &str| env(var).filter(|v: &String| !v.trim().is_empty());

        let interface = args.interface.or_else(|| non_blank(ENV_INTERFACE));
        let filter = args
            .filter
            .or_else(|| non_blank(ENV_FILTER))
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());

        let window_secs = match args.window_secs {
            Some(secs) => secs,
            None => match env(ENV_WINDOW_SECS) {
                Some(val) => val.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                    var: ENV_WINDOW_SECS,
                    value: val,
                })?,
                None => DEFAULT_WINDOW_SECS,
            },
        };

        if window_secs == 0 {
            return Err(ConfigError::InvalidWindow(window_secs));
        }

        Ok(Config {
            interface,
            window: Duration::from_secs(window_secs),
            filter,
            verbose: args.verbose,
        })
    }

    /// Parse the filter expression. Fails before any channel is opened.
    pub fn capture_filter(&self) -> Result<CaptureFilter, CaptureError> {
        self.filter.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    fn flags(interface: Option<&str>, window_secs: Option<u64>) -> ConfigArgs {
        ConfigArgs {
            interface: interface.map(str::to_string),
            window_secs,
            ..ConfigArgs::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::resolve(ConfigArgs::default(), env(&[])).unwrap();

        assert_eq!(config.interface, None);
        assert_eq!(config.window, Duration::from_secs(DEFAULT_WINDOW_SECS));
        assert_eq!(config.capture_filter().unwrap(), CaptureFilter::Broadcast);
        assert!(!config.verbose);
        assert_eq!(ConfigArgs::default().tracing_filter(), "info");
    }

    #[test]
    fn test_env_fills_missing_flags() {
        let args = ConfigArgs {
            verbose: true,
            ..ConfigArgs::default()
        };
        assert_eq!(args.tracing_filter(), "debug");
        let config = Config::resolve(
            args,
            env(&[
                (ENV_INTERFACE, "eth1"),
                (ENV_WINDOW_SECS, " 30 "),
                (ENV_FILTER, "all"),
            ]),
        )
        .unwrap();

        assert_eq!(config.interface.as_deref(), Some("eth1"));
        assert_eq!(config.window, Duration::from_secs(30));
        assert_eq!(config.capture_filter().unwrap(), CaptureFilter::All);
        assert!(config.verbose);
    }

    #[test]
    fn test_flags_win_over_env() {
        let args = ConfigArgs {
            filter: Some("broadcast".to_string()),
            ..flags(Some("eth0"), Some(2))
        };
        let config = Config::resolve(
            args,
            env(&[
                (ENV_INTERFACE, "eth1"),
                (ENV_WINDOW_SECS, "30"),
                (ENV_FILTER, "all"),
            ]),
        )
        .unwrap();

        assert_eq!(config.interface.as_deref(), Some("eth0"));
        assert_eq!(config.window, Duration::from_secs(2));
        assert_eq!(config.capture_filter().unwrap(), CaptureFilter::Broadcast);
    }

    #[test]
    fn test_zero_window_rejected() {
        assert_eq!(
            Config::resolve(flags(None, Some(0)), env(&[])),
            Err(ConfigError::InvalidWindow(0))
        );
        assert_eq!(
            Config::resolve(ConfigArgs::default(), env(&[(ENV_WINDOW_SECS, "0")])),
            Err(ConfigError::InvalidWindow(0))
        );
    }

    #[test]
    fn test_bad_env_window_rejected() {
        let result = Config::resolve(ConfigArgs::default(), env(&[(ENV_WINDOW_SECS, "five")]));
        assert_eq!(
            result,
            Err(ConfigError::InvalidEnv {
                var: ENV_WINDOW_SECS,
                value: "five".to_string(),
            })
        );
    }

    #[test]
    fn test_blank_env_values_ignored() {
        let config = Config::resolve(
            ConfigArgs::default(),
            env(&[(ENV_INTERFACE, "  "), (ENV_FILTER, "")]),
        )
        .unwrap();

        assert_eq!(config.interface, None);
        assert_eq!(config.filter, DEFAULT_FILTER);
    }

    #[test]
    fn test_unknown_filter_fails_to_parse() {
        let lookup = env(&[(ENV_FILTER, "udp port 67")]);
        let config = Config::resolve(ConfigArgs::default(), lookup).unwrap();
        let err = config.capture_filter().unwrap_err();
        assert!(matches!(err, CaptureError::InvalidFilter(expr) if expr == "udp port 67"));

        let args = ConfigArgs {
            filter: Some("multicast".to_string()),
            ..ConfigArgs::default()
        };
        let config = Config::resolve(args, env(&[])).unwrap();
        assert!(config.capture_filter().is_err());
    }
}
