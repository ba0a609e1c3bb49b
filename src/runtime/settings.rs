use crate::config;
use crate::error::ConfigError;

/// Load settings, falling back to defaults when the config cannot be read or
/// does not validate. The failure is handed back so it can be logged once
/// logging is up.
pub fn load_settings() -> (config::Settings, Option<ConfigError>) {
    match config::Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(e) => (config::Settings::default(), Some(e)),
        },
        // Config is optional; failures should not prevent the app from starting.
        Err(e) => (config::Settings::default(), Some(e)),
    }
}
