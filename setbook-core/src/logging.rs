//! Stdout logger shared by the core and the CLI.

use env_logger::{Builder, Env, Target};
use log::LevelFilter;
use std::io::Write;

/// Level names as `log` spells them, plus `warning` for `warn`.
pub fn parse_level(level: &str) -> Option<LevelFilter> {
    let level = level.trim();
    if level.eq_ignore_ascii_case("warning") {
        return Some(LevelFilter::Warn);
    }
    level.parse().ok()
}

/// Installs the logger at `level`; `RUST_LOG` directives refine it per module.
///
/// A second call only moves the global maximum, since the logger itself can be
/// installed once per process.
pub fn init_logger(level: LevelFilter) {
    let installed = Builder::new()
        .filter_level(level)
        .parse_env(Env::default())
        .format(|buf, record| {
            writeln!(
                buf,
                "{:<5} {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(Target::Stdout)
        .try_init();

    if installed.is_err() {
        log::set_max_level(level);
    }
}

/// Returns false and leaves logging untouched when `level` is not a level name.
pub fn set_log_level(level: &str) -> bool {
    match parse_level(level) {
        Some(filter) => {
            init_logger(filter);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_level_names() {
        assert_eq!(parse_level("WARNING"), Some(LevelFilter::Warn));
        assert_eq!(parse_level(" trace "), Some(LevelFilter::Trace));
        assert_eq!(parse_level("Off"), Some(LevelFilter::Off));
        assert_eq!(parse_level("verbose"), None);
    }

    #[test]
    fn rejects_unknown_level() {
        assert!(!set_log_level("loud"));
    }

    #[test]
    fn repeated_init_moves_max_level() {
        init_logger(LevelFilter::Info);
        init_logger(LevelFilter::Error);
        assert_eq!(log::max_level(), LevelFilter::Error);
    }
}
