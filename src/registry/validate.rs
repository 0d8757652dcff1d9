//! Registry validation
//!
//! Checks run in a fixed order: required top-level keys, then machine-name uniqueness,
//! then every module on its own. The first two are structural and stop the run when they
//! fail; per-module problems are all collected.

use crate::module::{Module, ModuleSpec};
use serde_yaml::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

const REQUIRED_KEYS: &[&str] = &["repo", "created_at", "updated_at", "modules"];

/// A single problem found in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingKeys(Vec<String>),
    InvalidModules(String),
    DuplicateMachineNames(Vec<String>),
    BlankMachineName,
    WhitespaceInMachineName(String),
    NoValidPaths(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingKeys(keys) => {
                write!(f, "{} missing from configuration file.", keys.join(", "))
            }
            ValidationError::InvalidModules(msg) => write!(f, "Invalid module definition: {}", msg),
            ValidationError::DuplicateMachineNames(names) => {
                write!(f, "Duplicate machine name(s) found: {}", names.join(", "))
            }
            ValidationError::BlankMachineName => write!(f, "Module has a blank machine_name."),
            ValidationError::WhitespaceInMachineName(name) => {
                write!(f, "Machine name {} contains white space.", name)
            }
            ValidationError::NoValidPaths(name) => {
                write!(f, "No valid paths were found in {}.", name)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a raw registry document against the repository at `repo_path`.
pub fn validate(config: &Value, repo_path: &Path) -> Result<(), Vec<ValidationError>> {
    let missing: Vec<String> = REQUIRED_KEYS
        .iter()
        .filter(|key| config.get(**key).is_none())
        .map(|key| key.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(vec![ValidationError::MissingKeys(missing)]);
    }

    let specs: Vec<ModuleSpec> = match &config["modules"] {
        Value::Null => Vec::new(),
        modules => serde_yaml::from_value(modules.clone())
            .map_err(|e| vec![ValidationError::InvalidModules(e.to_string())])?,
    };

    let duplicates = duplicate_machine_names(&specs);
    if !duplicates.is_empty() {
        return Err(vec![ValidationError::DuplicateMachineNames(duplicates)]);
    }

    let errors: Vec<ValidationError> = specs
        .iter()
        .flat_map(|spec| Module::from_spec(spec, repo_path, None).validate())
        .collect();

    if errors.is_empty() {
        info!(modules = specs.len(), "All modules validated successfully");
        Ok(())
    } else {
        debug!(errors = errors.len(), "Validation found problems");
        Err(errors)
    }
}

/// Machine names used more than once anywhere in the tree, in first-seen order.
/// Blank names are left to the per-module check.
fn duplicate_machine_names(specs: &[ModuleSpec]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order = Vec::new();
    for spec in specs.iter().flat_map(ModuleSpec::walk) {
        let name = spec.machine_name.as_str();
        if name.trim().is_empty() {
            continue;
        }
        let count = counts.entry(name).or_insert(0);
        if *count == 0 {
            order.push(name);
        }
        *count += 1;
    }
    order
        .into_iter()
        .filter(|name| counts[name] > 1)
        .map(str::to_string)
        .collect()
}
