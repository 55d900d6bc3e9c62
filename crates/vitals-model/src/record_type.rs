//! Record type definitions and the built-in catalogue of yearly datasets.

use serde::{Deserialize, Serialize};

use crate::ids::RecordTypeName;
use crate::schema::normalize_column_name;

/// Default synthetic year column, forced from the file name.
pub const DEFAULT_YEAR_COLUMN: &str = "año";

/// Default primary registry code (department of registration).
pub const DEFAULT_PRIMARY_CODE: &str = "depreg";

/// Default secondary registry code (municipality of registration).
pub const DEFAULT_SECONDARY_CODE: &str = "mupreg";

/// How a numeric key field is parsed and rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericKind {
    /// Parsed as a number and truncated towards zero.
    Integer,
    /// Parsed as a floating value.
    Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericField {
    pub name: String,
    pub kind: NumericKind,
}

impl NumericField {
    pub fn integer(name: &str) -> Self {
        Self {
            name: normalize_column_name(name),
            kind: NumericKind::Integer,
        }
    }

    pub fn decimal(name: &str) -> Self {
        Self {
            name: normalize_column_name(name),
            kind: NumericKind::Decimal,
        }
    }
}

/// Column names of the mandatory key pair and the operational dedup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyFields {
    pub year: String,
    pub primary: String,
    pub secondary: String,
}

impl Default for KeyFields {
    fn default() -> Self {
        Self {
            year: DEFAULT_YEAR_COLUMN.to_string(),
            primary: DEFAULT_PRIMARY_CODE.to_string(),
            secondary: DEFAULT_SECONDARY_CODE.to_string(),
        }
    }
}

/// A kind of yearly dataset and the fields that get special treatment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordType {
    pub name: RecordTypeName,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keys: KeyFields,
    #[serde(default)]
    pub numeric_fields: Vec<NumericField>,
    /// Extra fields listed in the quality report next to the key pair.
    #[serde(default)]
    pub diagnostic_fields: Vec<String>,
}

impl RecordType {
    pub fn new(name: RecordTypeName) -> Self {
        let keys = KeyFields::default();
        let numeric_fields = vec![
            NumericField::integer(&keys.year),
            NumericField::integer(&keys.primary),
        ];
        Self {
            name,
            description: None,
            keys,
            numeric_fields,
            diagnostic_fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    #[must_use]
    pub fn with_numeric_field(mut self, field: NumericField) -> Self {
        self.numeric_fields.push(field);
        self
    }

    #[must_use]
    pub fn with_diagnostic_field(mut self, name: &str) -> Self {
        self.diagnostic_fields.push(normalize_column_name(name));
        self
    }

    /// Lowercase and trim every configured field name so lookups match
    /// normalized headers. The key pair is always coerced as integers, so it
    /// is added to the numeric fields when a configuration leaves it out.
    pub fn normalize_names(&mut self) {
        self.keys.year = normalize_column_name(&self.keys.year);
        self.keys.primary = normalize_column_name(&self.keys.primary);
        self.keys.secondary = normalize_column_name(&self.keys.secondary);
        for field in &mut self.numeric_fields {
            field.name = normalize_column_name(&field.name);
        }
        for field in &mut self.diagnostic_fields {
            *field = normalize_column_name(field);
        }
        for (position, key) in [self.keys.year.clone(), self.keys.primary.clone()]
            .into_iter()
            .enumerate()
        {
            if !self.numeric_fields.iter().any(|field| field.name == key) {
                let at = position.min(self.numeric_fields.len());
                self.numeric_fields.insert(at, NumericField::integer(&key));
            }
        }
    }

    /// Fields reported in the `nulls` and `parse_errors` sections, in order.
    pub fn inspection_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = vec![self.keys.year.as_str(), self.keys.primary.as_str()];
        for field in &self.diagnostic_fields {
            if !fields.contains(&field.as_str()) {
                fields.push(field.as_str());
            }
        }
        fields
    }

    pub fn display_description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

fn catalogue_entry(name: &str, description: &str) -> RecordType {
    let name = RecordTypeName::new(name).unwrap_or_else(|_| unreachable!("static slug"));
    RecordType::new(name).with_description(description)
}

/// The yearly vital-statistics datasets published per year.
pub fn default_record_types() -> Vec<RecordType> {
    vec![
        catalogue_entry("nacimientos", "Nacimientos"),
        catalogue_entry("defunciones", "Defunciones")
            .with_numeric_field(NumericField::decimal("edadif"))
            .with_diagnostic_field("edadif"),
        catalogue_entry("defunciones_fetales", "Defunciones fetales"),
        catalogue_entry("divorcios", "Divorcios"),
        catalogue_entry("matrimonios", "Matrimonios"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_types_coerce_the_key_pair_as_integers() {
        for record_type in default_record_types() {
            let year = record_type
                .numeric_fields
                .iter()
                .find(|field| field.name == record_type.keys.year)
                .expect("year field");
            assert_eq!(year.kind, NumericKind::Integer);
            let primary = record_type
                .numeric_fields
                .iter()
                .find(|field| field.name == record_type.keys.primary)
                .expect("primary field");
            assert_eq!(primary.kind, NumericKind::Integer);
        }
    }

    #[test]
    fn inspection_fields_put_key_pair_first() {
        let types = default_record_types();
        let defunciones = types
            .iter()
            .find(|t| t.name.as_str() == "defunciones")
            .unwrap();
        assert_eq!(defunciones.inspection_fields(), vec!["año", "depreg", "edadif"]);
        let nacimientos = types
            .iter()
            .find(|t| t.name.as_str() == "nacimientos")
            .unwrap();
        assert_eq!(nacimientos.inspection_fields(), vec!["año", "depreg"]);
    }

    #[test]
    fn normalize_names_lowercases_config_fields() {
        let mut record_type = RecordType::new(RecordTypeName::new("x").unwrap());
        record_type.keys.primary = " DEPREG ".to_string();
        record_type.diagnostic_fields.push("EdadIf".to_string());
        record_type.normalize_names();
        assert_eq!(record_type.keys.primary, "depreg");
        assert_eq!(record_type.diagnostic_fields, vec!["edadif".to_string()]);
    }

    #[test]
    fn normalize_names_adds_missing_key_coercion() {
        let mut record_type = RecordType::new(RecordTypeName::new("x").unwrap());
        record_type.numeric_fields = vec![NumericField::decimal("peso")];
        record_type.normalize_names();
        let names: Vec<&str> = record_type
            .numeric_fields
            .iter()
            .map(|field| field.name.as_str())
            .collect();
        assert_eq!(names, vec!["año", "depreg", "peso"]);
    }
}
