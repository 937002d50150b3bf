use std::{fmt::Display, path::Path, str::FromStr};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::logger::LogLevel;

/// Declares a config struct whose fields all have defaults. Fields missing
/// from a config file fall back to their default. Generates `with_*`,
/// `set_*` and `get_*` accessors plus file loading.
macro_rules! config {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $($field:ident: $ty:ty = $default:expr),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(default, deny_unknown_fields)]
        pub struct $name {
            $($field: $ty,)*
        }

        impl Default for $name {
            fn default() -> Self {
                $name {
                    $($field: $default,)*
                }
            }
        }

        impl $name {
            $(
                paste::paste! {
                    pub fn [<with_ $field>](mut self, $field: $ty) -> Self {
                        self.$field = $field;
                        self
                    }

                    pub fn [<set_ $field>](&mut self, $field: $ty) {
                        self.$field = $field;
                    }

                    pub fn [<get_ $field>](&self) -> &$ty {
                        &self.$field
                    }
                }
            )*

            pub fn from_toml(content: &str) -> anyhow::Result<Self> {
                toml::from_str(content)
                    .with_context(|| format!("invalid {}", stringify!($name)))
            }

            pub fn from_file<P: AsRef<Path>>(file_path: P) -> anyhow::Result<Self> {
                let file_path = file_path.as_ref();
                let content = std::fs::read_to_string(file_path)
                    .with_context(|| format!("failed to read config {}", file_path.display()))?;

                Self::from_toml(&content)
            }

            pub fn from_optional_file<P: AsRef<Path>>(file_path: Option<P>) -> anyhow::Result<Self> {
                match file_path {
                    Some(p) => Self::from_file(p),
                    None => Ok(Self::default()),
                }
            }
        }
    };
}

/// What the command line tool prints after minimizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The minimized automaton in its json structural form.
    Json,
    /// The minimized automaton as a graphviz digraph.
    Dot,
    /// The pairs of equivalent states of the input automaton.
    Pairs,
    /// The distinguishability table of the input automaton.
    Table,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "dot" | "graphviz" => Ok(OutputFormat::Dot),
            "pairs" => Ok(OutputFormat::Pairs),
            "table" => Ok(OutputFormat::Table),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Dot => write!(f, "dot"),
            OutputFormat::Pairs => write!(f, "pairs"),
            OutputFormat::Table => write!(f, "table"),
        }
    }
}

config! {
    pub struct LoggerConfig {
        enabled: bool = true,
        log_file: bool = false,
        log_level: LogLevel = LogLevel::Info,
    }
}

config! {
    pub struct MinimizeConfig {
        prune_unreachable: bool = false,
        verify_word_length: usize = 0,
        output: OutputFormat = OutputFormat::Json,
    }
}

config! {
    /// Configuration of a run of the command line tool.
    pub struct RunConfig {
        minimize: MinimizeConfig = MinimizeConfig::default(),
        logger: LoggerConfig = LoggerConfig::default(),
    }
}
