//! Environment variables as seen by the application.
//!
//! The kernel loads them once, on first request, through an [`EnvSource`] and
//! keeps the resulting [`EnvironmentMap`] for the rest of its lifetime.
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

use crate::kernel::error::{Error, Result};

/// Loader for environment definitions
pub trait EnvSource: Send + Sync + Debug {
    fn load(&self) -> Result<BTreeMap<String, String>>;
}

/// Reads a dotenv file and overlays the process environment on top of it.
///
/// Variables already present in the process win over the file, which is how
/// dotenv loaders behave when they decline to override existing variables.
/// A missing file is not an error.
#[derive(Debug, Clone)]
pub struct DotenvSource {
    path: PathBuf,
}

impl DotenvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn environment_error(&self, message: impl Into<String>) -> Error {
        Error::Environment {
            path: self.path.clone(),
            message: message.into(),
        }
    }
}

impl EnvSource for DotenvSource {
    fn load(&self) -> Result<BTreeMap<String, String>> {
        let mut vars = BTreeMap::new();

        match dotenvy::from_path_iter(&self.path) {
            Ok(items) => {
                for item in items {
                    let (name, value) = item.map_err(|e| self.environment_error(e.to_string()))?;
                    vars.insert(name, value);
                }
                log::debug!("Read {} variable(s) from {}", vars.len(), self.path.display());
            }
            Err(e) if e.not_found() => {
                log::debug!("No environment file at {}", self.path.display());
            }
            Err(e) => return Err(self.environment_error(e.to_string())),
        }

        vars.extend(std::env::vars());
        Ok(vars)
    }
}

/// Fixed set of variables, for embedding and tests
#[derive(Debug, Clone, Default)]
pub struct StaticEnvSource {
    vars: BTreeMap<String, String>,
}

impl StaticEnvSource {
    pub fn new<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl EnvSource for StaticEnvSource {
    fn load(&self) -> Result<BTreeMap<String, String>> {
        Ok(self.vars.clone())
    }
}

/// Memoized name → value view of the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentMap {
    vars: BTreeMap<String, String>,
}

impl EnvironmentMap {
    pub fn new(vars: BTreeMap<String, String>) -> Self {
        Self { vars }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
