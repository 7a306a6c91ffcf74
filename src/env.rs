//! Environment variable names read once per process to establish the
//! defaults of every [`Config`](crate::config::Config) field that is left
//! unset.
//!
//! These are purely helpers; the pipeline itself never touches the
//! environment after construction.

/// Minimum level, e.g. `debug`, `info`, `debug-2`.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Output format, `json` or `text`.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// `true` or `1` to pretty-print attributes in text output.
pub const LOG_MULTILINE_ENV: &str = "LOG_MULTILINE";

/// Optional deployment environment label; `prod` forces JSON output.
pub const LOG_ENVIRONMENT_ENV: &str = "LOG_ENVIRONMENT";

/// Read an environment variable, `None` when unset or not valid UTF-8.
pub fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Flag value; `1` and `true` (any case) are true, any other value is
/// false.
pub fn parse_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
