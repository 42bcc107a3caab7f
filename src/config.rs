use std::env;
use log::warn;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_GENERATOR_URL: &str = "http://127.0.0.1:5000/generate-timetable";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Runtime settings, read from the command line and `TIMETABLE_*` environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    pub port: u16,
    pub bind_addr: String,
    pub generator_url: String,
    pub request_timeout_secs: u64,
    pub static_dir: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            port: DEFAULT_PORT,
            bind_addr: "0.0.0.0".to_string(),
            generator_url: DEFAULT_GENERATOR_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            static_dir: "static".to_string(),
        }
    }
}

impl ViewerConfig {
    pub fn from_env(port_arg: Option<&str>) -> Self {
        Self::from_lookup(port_arg, |key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source; bad values fall back to defaults
    pub fn from_lookup<F>(port_arg: Option<&str>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ViewerConfig::default();

        if let Some(port) = port_arg {
            match port.parse::<u16>() {
                Ok(port) => config.port = port,
                Err(_) => warn!("Invalid port '{}', using {}", port, DEFAULT_PORT),
            }
        }
        if let Some(addr) = lookup("TIMETABLE_BIND").filter(|v| !v.trim().is_empty()) {
            config.bind_addr = addr.trim().to_string();
        }
        if let Some(url) = lookup("TIMETABLE_GENERATOR_URL").filter(|v| !v.trim().is_empty()) {
            config.generator_url = url.trim().to_string();
        }
        if let Some(secs) = lookup("TIMETABLE_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout_secs = secs,
                _ => warn!(
                    "Invalid TIMETABLE_TIMEOUT_SECS '{}', using {}",
                    secs, DEFAULT_TIMEOUT_SECS
                ),
            }
        }
        if let Some(dir) = lookup("TIMETABLE_STATIC_DIR").filter(|v| !v.trim().is_empty()) {
            config.static_dir = dir.trim().to_string();
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_without_overrides() {
        assert_eq!(ViewerConfig::from_lookup(None, |_| None), ViewerConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TIMETABLE_GENERATOR_URL", "http://gen:9000/generate"),
            ("TIMETABLE_TIMEOUT_SECS", "45"),
            ("TIMETABLE_BIND", "127.0.0.1"),
        ]
        .into_iter()
        .collect();
        let config =
            ViewerConfig::from_lookup(Some("3000"), |k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.port, 3000);
        assert_eq!(config.generator_url, "http://gen:9000/generate");
        assert_eq!(config.request_timeout_secs, 45);
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.static_dir, "static");
    }

    #[test]
    fn bad_values_fall_back() {
        let config = ViewerConfig::from_lookup(Some("http"), |k| {
            (k == "TIMETABLE_TIMEOUT_SECS").then(|| "0".to_string())
        });
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
    }
}
