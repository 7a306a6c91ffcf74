use crate::env::{env_var, parse_flag, LOG_ENVIRONMENT_ENV, LOG_FORMAT_ENV, LOG_LEVEL_ENV, LOG_MULTILINE_ENV};
use crate::level::Severity;
use crate::sink::{self, LogSink};
use std::sync::{Arc, OnceLock};

/// Output encoding of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// One JSON document per record.
    #[default]
    Json,
    /// Colorized human-readable line.
    Text,
}

impl Format {
    /// `json` (any case) selects [`Format::Json`], everything else
    /// [`Format::Text`].
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("json") {
            Format::Json
        } else {
            Format::Text
        }
    }
}

/// Process-wide fallbacks for unset [`Config`] fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Defaults {
    pub level: Severity,
    pub format: Format,
    pub multiline: bool,
    pub environment: Option<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            level: Severity::DEBUG,
            format: Format::Json,
            multiline: false,
            environment: None,
        }
    }
}

impl Defaults {
    /// Read defaults from the environment.
    ///
    /// Reads:
    /// - `LOG_LEVEL`: minimum level, default `debug`
    /// - `LOG_FORMAT`: `json` or `text`, default `json`
    /// - `LOG_MULTILINE`: `true`/`1` for indented attributes, default off
    /// - `LOG_ENVIRONMENT`: environment label, default unset
    pub fn from_env() -> Self {
        Self::from_lookup(env_var)
    }

    /// Same rules as [`Defaults::from_env`], reading values through
    /// `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let level = lookup(LOG_LEVEL_ENV).unwrap_or_else(|| "debug".to_string());
        let format = lookup(LOG_FORMAT_ENV).unwrap_or_else(|| "json".to_string());

        Self {
            level: Severity::parse(&level),
            format: Format::parse(&format),
            multiline: lookup(LOG_MULTILINE_ENV).is_some_and(|v| parse_flag(&v)),
            environment: lookup(LOG_ENVIRONMENT_ENV).filter(|v| !v.is_empty()),
        }
    }

    /// Defaults read from the environment the first time this is called.
    pub fn global() -> &'static Defaults {
        static DEFAULTS: OnceLock<Defaults> = OnceLock::new();
        DEFAULTS.get_or_init(Defaults::from_env)
    }
}

/// Per-logger configuration. Unset fields fall back to [`Defaults`].
#[derive(Clone, Default)]
pub struct Config {
    pub level: Option<Severity>,
    pub format: Option<Format>,
    pub multiline: Option<bool>,
    pub environment: Option<String>,
    pub output: Option<Arc<dyn LogSink>>,
}

impl Config {
    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_multiline(mut self, multiline: bool) -> Self {
        self.multiline = Some(multiline);
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn with_output(mut self, output: Arc<dyn LogSink>) -> Self {
        self.output = Some(output);
        self
    }

    /// Fill unset fields from `defaults`.
    ///
    /// An environment labelled `prod` always gets JSON output.
    pub fn resolve(self, defaults: &Defaults) -> ResolvedConfig {
        let environment = self.environment.or_else(|| defaults.environment.clone());
        let is_prod = environment
            .as_deref()
            .is_some_and(|env| env.eq_ignore_ascii_case("prod"));

        ResolvedConfig {
            level: self.level.unwrap_or(defaults.level),
            format: if is_prod {
                Format::Json
            } else {
                self.format.unwrap_or(defaults.format)
            },
            multiline: self.multiline.unwrap_or(defaults.multiline),
            environment,
            output: self.output.unwrap_or_else(sink::stdout),
        }
    }
}

/// Fully resolved configuration, fixed for the lifetime of a logger.
#[derive(Clone)]
pub struct ResolvedConfig {
    pub level: Severity,
    pub format: Format,
    pub multiline: bool,
    pub environment: Option<String>,
    pub output: Arc<dyn LogSink>,
}
