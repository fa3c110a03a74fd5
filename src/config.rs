use std::path::PathBuf;

/// Session configuration, passed to [`crate::session::GameSession::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Directory saved move records are written to.
    pub save_dir: PathBuf,
    /// Also highlight every square the opponent can reach.
    pub debug_highlights: bool,
}

impl SessionConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from `CHESS_SAVE_DIR` and
    /// `CHESS_DEBUG_HIGHLIGHTS` as answered by `lookup`; missing keys keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        SessionConfig {
            save_dir: lookup("CHESS_SAVE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.save_dir),
            debug_highlights: lookup("CHESS_DEBUG_HIGHLIGHTS")
                .map(|v| matches!(v.trim(), "1" | "true" | "yes" | "on"))
                .unwrap_or(defaults.debug_highlights),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            save_dir: PathBuf::from("saved_games"),
            debug_highlights: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.save_dir, PathBuf::from("saved_games"));
        assert!(!config.debug_highlights);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = SessionConfig::from_lookup(|_| None);
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn lookup_values_override_defaults() {
        let config = SessionConfig::from_lookup(|key| match key {
            "CHESS_SAVE_DIR" => Some("/tmp/games".to_string()),
            "CHESS_DEBUG_HIGHLIGHTS" => Some(" on ".to_string()),
            _ => None,
        });
        assert_eq!(config.save_dir, PathBuf::from("/tmp/games"));
        assert!(config.debug_highlights);

        let config = SessionConfig::from_lookup(|key| {
            (key == "CHESS_DEBUG_HIGHLIGHTS").then(|| "0".to_string())
        });
        assert!(!config.debug_highlights);
    }
}
