use serde::Deserialize;

/// The parsed config file.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub(crate) cpu: CpuConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub(crate) enum StringOrNum {
    String(String),
    Num(u64),
}

impl From<String> for StringOrNum {
    fn from(value: String) -> Self {
        StringOrNum::String(value)
    }
}

impl From<u64> for StringOrNum {
    fn from(value: u64) -> Self {
        StringOrNum::Num(value)
    }
}

/// CPU load settings.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CpuConfig {
    /// Time between the two samples of a reading; milliseconds or a human
    /// duration string.
    pub(crate) interval: Option<StringOrNum>,

    /// How many readings the binary prints.
    pub(crate) samples: Option<u64>,
}
