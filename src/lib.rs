//! conf-parser - A hierarchical configuration-file parser
//!
//! Parses a config file format with quoted values, `#` comments, line
//! continuation, `$ENV:NAME` expansion, glob-expanded `!include`/
//! `!include_try`, and nested sections addressable by a `A/B/C` path.

pub mod coerce;
pub mod env;
pub mod error;
pub mod frame;
pub mod handler;
pub mod include;
pub mod parser;
pub mod path;
pub mod scanner;
pub mod settings;

pub use error::{ConfigError, ConfigResult, ErrorKind};
pub use handler::{ConfigHandler, Event, RecordingHandler};
pub use parser::parse_file;
pub use settings::{apply_setting, SettingDef, SettingKind};
