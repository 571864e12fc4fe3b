//! Processor identity through `/proc/cpuinfo`.

use std::{fs, path::PathBuf};

use indexmap::IndexMap;

use super::IdentitySource;
use crate::collection::error::{CollectionError, CollectionResult};

/// Reads the first processor block of `/proc/cpuinfo`.
///
/// x86 kernels report `vendor_id`, `model name`, `cpu family`, `model` and
/// `stepping`; ARM kernels report `CPU implementer`, `CPU architecture`,
/// `CPU part` and `CPU revision` instead, which are used as fallbacks.
#[derive(Debug, Clone)]
pub struct CpuInfoSource {
    path: PathBuf,
}

impl Default for CpuInfoSource {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/proc/cpuinfo"),
        }
    }
}

impl CpuInfoSource {
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    fn first_block(&self) -> CollectionResult<IndexMap<String, String>> {
        let contents = fs::read_to_string(&self.path).map_err(|err| {
            CollectionError::identity(format!("failed to read {}: {err}", self.path.display()))
        })?;

        Ok(parse_first_block(&contents))
    }

    fn field(&self, keys: &[&str]) -> CollectionResult<String> {
        let block = self.first_block()?;

        keys.iter()
            .find_map(|key| block.get(*key))
            .cloned()
            .ok_or_else(|| {
                CollectionError::identity(format!(
                    "{} has none of the fields {keys:?}",
                    self.path.display()
                ))
            })
    }
}

fn parse_first_block(contents: &str) -> IndexMap<String, String> {
    contents
        .lines()
        .take_while(|line| !line.trim().is_empty())
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}

impl IdentitySource for CpuInfoSource {
    fn query_vendor_id(&self) -> CollectionResult<String> {
        self.field(&["vendor_id", "CPU implementer"])
    }

    fn query_brand_string(&self) -> CollectionResult<String> {
        self.field(&["model name", "Processor", "cpu model"])
    }

    fn query_family(&self) -> CollectionResult<String> {
        self.field(&["cpu family", "CPU architecture"])
    }

    fn query_model(&self) -> CollectionResult<String> {
        self.field(&["model", "CPU part"])
    }

    fn query_stepping(&self) -> CollectionResult<String> {
        self.field(&["stepping", "CPU revision"])
    }

    /// x86 reports long mode as the `lm` flag. Anything without a `flags`
    /// line is judged by the width of this build.
    fn query_64bit_capable(&self) -> CollectionResult<bool> {
        let block = self.first_block()?;

        Ok(match block.get("flags") {
            Some(flags) => flags.split_ascii_whitespace().any(|flag| flag == "lm"),
            None => cfg!(target_pointer_width = "64"),
        })
    }
}
