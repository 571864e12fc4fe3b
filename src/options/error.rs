use std::{borrow::Cow, path::PathBuf};

use thiserror::Error;

/// Something wrong with the arguments or the config file.
///
/// These are shown to the user as-is, so they should say what to fix. Wrap
/// offending names and values in single quotes, e.g. `'interval'`.
#[derive(Debug, PartialEq, Error)]
pub enum OptionError {
    #[error("Configuration file error: {0}")]
    Config(Cow<'static, str>),

    #[error("Argument error: {0}")]
    Argument(Cow<'static, str>),

    #[error("the config file '{}' could not be read: {reason}", path.display())]
    UnreadableConfig { path: PathBuf, reason: String },
}

impl OptionError {
    pub(crate) fn config<R: Into<Cow<'static, str>>>(reason: R) -> Self {
        OptionError::Config(reason.into())
    }

    /// `name` was set in the config file, but to something unusable.
    pub(crate) fn invalid_config_value(name: &str) -> Self {
        OptionError::Config(
            format!("'{name}' was set with an invalid value, please update it in your config file.")
                .into(),
        )
    }

    pub(crate) fn arg<R: Into<Cow<'static, str>>>(reason: R) -> Self {
        OptionError::Argument(reason.into())
    }

    /// `--name` was passed something unusable.
    pub(crate) fn invalid_arg_value(name: &str) -> Self {
        OptionError::Argument(
            format!("'--{name}' was set with an invalid value, please update your arguments.")
                .into(),
        )
    }

    pub(crate) fn unreadable_config(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        OptionError::UnreadableConfig {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}

pub type OptionResult<T> = Result<T, OptionError>;

impl From<toml_edit::de::Error> for OptionError {
    fn from(err: toml_edit::de::Error) -> Self {
        OptionError::Config(err.to_string().into())
    }
}
