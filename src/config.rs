use std::env;

/// Environment variable toggling the post-generation self-check.
pub const ENV_SELF_CHECK: &str = "DVBSI_SELF_CHECK";

/// Environment variable toggling trace-level section dumps on dispatch.
pub const ENV_TRACE_SECTIONS: &str = "DVBSI_TRACE_SECTIONS";

/// Runtime switches shared by the demultiplexer and the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Re-validate every generated section and log if it does not check out.
    pub self_check: bool,
    /// Dump every dispatched section at `trace` level.
    pub trace_sections: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            self_check: true,
            trace_sections: false,
        }
    }
}

impl Config {
    /// Builds a configuration from the defaults, overridden by
    /// `DVBSI_SELF_CHECK` and `DVBSI_TRACE_SECTIONS` when they are set.
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Some(value) = env_flag(ENV_SELF_CHECK) {
            config.self_check = value;
        }
        if let Some(value) = env_flag(ENV_TRACE_SECTIONS) {
            config.trace_sections = value;
        }

        config
    }

    /// Sets whether generated sections are self-checked.
    pub fn with_self_check(mut self, enabled: bool) -> Self {
        self.self_check = enabled;
        self
    }

    /// Sets whether dispatched sections are dumped at trace level.
    pub fn with_trace_sections(mut self, enabled: bool) -> Self {
        self.trace_sections = enabled;
        self
    }
}

fn env_flag(name: &str) -> Option<bool> {
    let value = env::var(name).ok()?;
    parse_flag(&value)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            log::warn!("ignoring unrecognised boolean value {:?}", value);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.self_check);
        assert!(!config.trace_sections);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_from_env() {
        env::set_var(ENV_SELF_CHECK, "no");
        env::set_var(ENV_TRACE_SECTIONS, "bogus");
        let config = Config::from_env();
        env::remove_var(ENV_SELF_CHECK);
        env::remove_var(ENV_TRACE_SECTIONS);

        assert!(!config.self_check);
        // Unparseable values keep the default
        assert!(!config.trace_sections);
    }

    #[test]
    fn test_builder_setters() {
        let config = Config::default()
            .with_self_check(false)
            .with_trace_sections(true);
        assert_eq!(
            config,
            Config {
                self_check: false,
                trace_sections: true
            }
        );
    }
}
