//! Category taxonomy seed loading from config.toml
//!
//! The development backend serves the taxonomy from a TOML file instead of
//! a configuration sheet. The file lists each transaction type with its
//! categories in the order they should appear in prompts and listings.

use crate::core::record::TransactionType;
use crate::core::taxonomy::CategoryTaxonomy;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Structure of the taxonomy seed file.
#[derive(Debug, Deserialize)]
pub struct TaxonomyFile {
    /// One group per transaction type
    pub types: Vec<TypeGroup>,
}

/// One type's category list.
#[derive(Debug, Deserialize, Clone)]
pub struct TypeGroup {
    /// Transaction type display name (e.g. `"Variable Expenses"`)
    pub name: String,
    /// Category names in presentation order
    pub categories: Vec<String>,
}

impl TaxonomyFile {
    /// Validates the file contents into a [`CategoryTaxonomy`].
    pub fn into_taxonomy(self) -> Result<CategoryTaxonomy> {
        let mut taxonomy = CategoryTaxonomy::new();
        for group in self.types {
            let kind = TransactionType::parse(&group.name).ok_or_else(|| Error::Config {
                message: format!("Unknown transaction type '{}' in taxonomy config", group.name),
            })?;
            for category in &group.categories {
                taxonomy.insert(kind, category)?;
            }
        }
        Ok(taxonomy)
    }
}

/// Loads the taxonomy seed from a TOML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CategoryTaxonomy> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read taxonomy config: {e}"),
    })?;

    let file: TaxonomyFile = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse taxonomy config: {e}"),
    })?;

    file.into_taxonomy()
}
