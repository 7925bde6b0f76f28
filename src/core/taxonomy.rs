//! Category taxonomy lookup.
//!
//! The taxonomy is a read-only, ordered mapping of transaction type to the
//! category names registered under it, sourced from the configuration sheet
//! (or the TOML seed for the development backend). Both the quick-entry
//! parser and the wizard validate against it; insertion order is preserved
//! because it is the order categories appear in chat prompts.

use crate::core::record::TransactionType;
use crate::errors::{Error, Result};

/// Ordered mapping: type → ordered category names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTaxonomy {
    groups: Vec<(TransactionType, Vec<String>)>,
}

impl CategoryTaxonomy {
    /// An empty taxonomy.
    #[must_use]
    pub const fn new() -> Self {
        Self { groups: Vec::new() }
    }

    /// Builds a taxonomy from `(type, categories)` groups, preserving
    /// order. Duplicate category names under the same type are rejected.
    pub fn from_groups(
        groups: impl IntoIterator<Item = (TransactionType, Vec<String>)>,
    ) -> Result<Self> {
        let mut taxonomy = Self::new();
        for (kind, categories) in groups {
            for category in categories {
                taxonomy.insert(kind, &category)?;
            }
        }
        Ok(taxonomy)
    }

    /// Registers one category under a type, preserving insertion order.
    pub fn insert(&mut self, kind: TransactionType, category: &str) -> Result<()> {
        let category = category.trim();
        if category.is_empty() {
            return Err(Error::Config {
                message: format!("Empty category name under type '{kind}'"),
            });
        }
        if self.lookup_in(kind, category).is_some() {
            return Err(Error::Config {
                message: format!("Duplicate category '{category}' under type '{kind}'"),
            });
        }
        if let Some((_, categories)) = self.groups.iter_mut().find(|(k, _)| *k == kind) {
            categories.push(category.to_string());
        } else {
            self.groups.push((kind, vec![category.to_string()]));
        }
        Ok(())
    }

    /// The groups in insertion order, for listings and prompts.
    #[must_use]
    pub fn groups(&self) -> &[(TransactionType, Vec<String>)] {
        &self.groups
    }

    /// Categories registered under one type, in insertion order.
    #[must_use]
    pub fn categories_for(&self, kind: TransactionType) -> &[String] {
        self.groups
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(&[], |(_, categories)| categories.as_slice())
    }

    /// Case-insensitive lookup across all types. Returns the owning type
    /// and the canonical category name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<(TransactionType, &str)> {
        let name = name.trim();
        self.groups.iter().find_map(|(kind, categories)| {
            categories
                .iter()
                .find(|category| category.eq_ignore_ascii_case(name))
                .map(|category| (*kind, category.as_str()))
        })
    }

    /// Case-insensitive lookup restricted to one type. Returns the
    /// canonical category name.
    #[must_use]
    pub fn lookup_in(&self, kind: TransactionType, name: &str) -> Option<&str> {
        let name = name.trim();
        self.categories_for(kind)
            .iter()
            .find(|category| category.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }

    /// Total number of registered categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, categories)| categories.len()).sum()
    }

    /// Whether no categories are registered at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
