//! Run configuration, loadable from TOML.
//!
//! A config file only needs the keys it wants to change; everything else
//! falls back to the built-in defaults:
//!
//! ```toml
//! years = { start = 2009, end = 2022 }
//! selected = ["nacimientos", "defunciones"]
//!
//! [[record_types]]
//! name = "defunciones"
//! numeric_fields = [{ name = "edadif", kind = "decimal" }]
//! diagnostic_fields = ["edadif"]
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::ids::{RecordTypeName, YearRange};
use crate::record_type::{RecordType, default_record_types};

/// File name templates; `{tipo}`, `{start}` and `{end}` are substituted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputNames {
    pub consolidated: String,
    pub report: String,
}

impl Default for OutputNames {
    fn default() -> Self {
        Self {
            consolidated: "{tipo}_clean_{start}_{end}.csv".to_string(),
            report: "control_calidad_{start}_{end}.csv".to_string(),
        }
    }
}

impl OutputNames {
    pub fn consolidated_file(&self, record_type: &RecordTypeName, years: &YearRange) -> String {
        render_template(&self.consolidated, Some(record_type), years)
    }

    pub fn report_file(&self, years: &YearRange) -> String {
        render_template(&self.report, None, years)
    }
}

fn render_template(template: &str, record_type: Option<&RecordTypeName>, years: &YearRange) -> String {
    let mut out = template
        .replace("{start}", &years.start().to_string())
        .replace("{end}", &years.end().to_string());
    if let Some(name) = record_type {
        out = out.replace("{tipo}", name.as_str());
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub years: YearRange,
    pub record_types: Vec<RecordType>,
    /// Record types processed when none are requested explicitly.
    pub selected: Vec<RecordTypeName>,
    pub outputs: OutputNames,
}

impl Default for RunConfig {
    fn default() -> Self {
        let selected = ["nacimientos", "defunciones"]
            .into_iter()
            .filter_map(|name| RecordTypeName::new(name).ok())
            .collect();
        Self {
            years: YearRange::default(),
            record_types: default_record_types(),
            selected,
            outputs: OutputNames::default(),
        }
    }
}

impl RunConfig {
    /// Loads a TOML file. Record types defined there replace catalogue
    /// entries of the same name and are appended otherwise.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|error| match error {
            ModelError::ConfigParse { source, .. } => ModelError::ConfigParse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(text).map_err(|source| ModelError::ConfigParse {
            path: Default::default(),
            source,
        })?;
        let mut config = Self::default();
        if let Some(years) = file.years {
            config.years = years;
        }
        if let Some(selected) = file.selected {
            config.selected = selected;
        }
        if let Some(outputs) = file.outputs {
            config.outputs = outputs;
        }
        for record_type in file.record_types {
            match config
                .record_types
                .iter_mut()
                .find(|existing| existing.name == record_type.name)
            {
                Some(existing) => *existing = record_type,
                None => config.record_types.push(record_type),
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Normalizes configured field names and checks cross references.
    pub fn validate(&mut self) -> Result<()> {
        let mut names = BTreeSet::new();
        for record_type in &mut self.record_types {
            if !names.insert(record_type.name.clone()) {
                return Err(ModelError::DuplicateRecordType(record_type.name.to_string()));
            }
            record_type.normalize_names();
            if record_type.keys.year.is_empty() || record_type.keys.primary.is_empty() {
                return Err(ModelError::InvalidConfig {
                    message: format!("{}: key fields must not be blank", record_type.name),
                });
            }
        }
        for name in &self.selected {
            if !names.contains(name) {
                return Err(ModelError::UnknownRecordType(name.to_string()));
            }
        }
        if !self.outputs.consolidated.contains("{tipo}") {
            return Err(ModelError::InvalidConfig {
                message: "consolidated file template must contain {tipo}".to_string(),
            });
        }
        Ok(())
    }

    pub fn record_type(&self, name: &str) -> Option<&RecordType> {
        self.record_types
            .iter()
            .find(|record_type| record_type.name.as_str() == name)
    }

    /// Resolves the record types to process, in request order.
    ///
    /// An empty request falls back to [`RunConfig::selected`].
    pub fn resolve_selection(&self, requested: &[String]) -> Result<Vec<RecordType>> {
        let names: Vec<String> = if requested.is_empty() {
            self.selected.iter().map(ToString::to_string).collect()
        } else {
            requested.iter().map(|name| name.trim().to_lowercase()).collect()
        };
        let mut seen = BTreeSet::new();
        let mut resolved = Vec::new();
        for name in names {
            if !seen.insert(name.clone()) {
                continue;
            }
            let record_type = self
                .record_type(&name)
                .ok_or_else(|| ModelError::UnknownRecordType(name.clone()))?;
            resolved.push(record_type.clone());
        }
        Ok(resolved)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    years: Option<YearRange>,
    selected: Option<Vec<RecordTypeName>>,
    outputs: Option<OutputNames>,
    #[serde(default)]
    record_types: Vec<RecordType>,
}
