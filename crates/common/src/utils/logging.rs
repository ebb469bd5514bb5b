use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Output flavour for the tracing subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    /// Anything other than `json` (case-insensitive) is compact.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("json") { LogFormat::Json } else { LogFormat::Compact }
    }
}

/// Map a configured level name onto a filter directive.
/// Unknown names fall back to `info`.
pub fn level_directive(level: &str) -> &'static str {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => "info",
    }
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let lvl = level_directive(level);
        EnvFilter::new(format!("{lvl},tower_http={lvl},sqlx=warn"))
    })
}

/// Initialize tracing with the given level and format, writing to stdout.
/// - `RUST_LOG`, when set, overrides `level`
/// - Safe to call more than once; later calls are no-ops
pub fn init_logging(level: &str, format: LogFormat) {
    let env_filter = build_filter(level);
    let builder = fmt().with_env_filter(env_filter).with_target(false).with_writer(io::stdout);
    let _ = match format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

/// Compact output at `info` unless `RUST_LOG` says otherwise.
pub fn init_logging_default() {
    init_logging("info", LogFormat::Compact);
}

/// JSON structured output at `info` unless `RUST_LOG` says otherwise.
pub fn init_logging_json() {
    init_logging("info", LogFormat::Json);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_level_falls_back_to_info() {
        assert_eq!(level_directive("verbose"), "info");
        assert_eq!(level_directive(""), "info");
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("warning"), "warn");
    }

    #[test]
    fn format_parse_is_lenient() {
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Compact);
    }

    #[test]
    fn init_twice_does_not_panic() {
        init_logging_default();
        init_logging_json();
    }
}
