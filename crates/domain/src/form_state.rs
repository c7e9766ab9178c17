use std::collections::{BTreeMap, BTreeSet};

use crate::FieldDefinition;

/// Current input values keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    /// Creates an empty value map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the mount-time values for a field set.
    #[must_use]
    pub fn initial(fields: &[FieldDefinition]) -> Self {
        Self(
            fields
                .iter()
                .map(|field| (field.name().to_owned(), field.default_value().to_owned()))
                .collect(),
        )
    }

    /// Returns the value of a field, or an empty string when unset.
    #[must_use]
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or_default()
    }

    /// Overwrites a field value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder form of [`FormValues::set`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }
}

/// Fields the user has blurred or attempted to submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TouchedSet(BTreeSet<String>);

impl TouchedSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set with every field touched.
    #[must_use]
    pub fn all(fields: &[FieldDefinition]) -> Self {
        Self(fields.iter().map(|field| field.name().to_owned()).collect())
    }

    /// Marks one field as touched.
    pub fn mark(&mut self, name: impl Into<String>) {
        self.0.insert(name.into());
    }

    /// Returns whether the field was touched.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Forgets every touched field.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Returns whether no field was touched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
