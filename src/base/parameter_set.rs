use super::{Error, ParamMap, ParamValue};
use std::fmt;

/// Defines a named collection of scalar parameters with a fixed set of fields
///
/// Implementors enumerate their settable fields in [ParameterSet::FIELDS] and their derived
/// (computed, read-only) fields in [ParameterSet::DERIVED]. The operations working on the
/// mapping form (update, load, export) are written once here.
pub trait ParameterSet: Sized {
    /// Name of the parameter set used in error messages
    const NAME: &'static str;

    /// Names of the settable fields
    const FIELDS: &'static [&'static str];

    /// Names of the derived fields (computed from the settable ones)
    const DERIVED: &'static [&'static str];

    /// Returns the value of a settable or derived field
    fn get(&self, key: &str) -> Option<ParamValue>;

    /// Validates and assigns a settable field
    ///
    /// **Note:** Only called with keys in [ParameterSet::FIELDS]. Must not modify the
    /// instance if the value is rejected.
    fn set_field(&mut self, key: &str, value: &ParamValue) -> Result<(), Error>;

    /// Sets a single field given its name
    fn set(&mut self, key: &str, value: &ParamValue) -> Result<(), Error> {
        if Self::DERIVED.contains(&key) {
            return Err(Error::DerivedParameter {
                owner: Self::NAME,
                key: key.to_string(),
            });
        }
        if !Self::FIELDS.contains(&key) {
            return Err(Error::UnknownParameter {
                owner: Self::NAME,
                key: key.to_string(),
            });
        }
        self.set_field(key, value)
    }

    /// Overwrites fields given as (name, value) pairs
    ///
    /// The pairs are applied in the given order. If one fails, the previous ones remain applied;
    /// use [ParameterSet::update_atomic] to avoid partial updates.
    fn update<I, K, V>(&mut self, fields: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<ParamValue>,
    {
        for (key, value) in fields {
            self.set(key.as_ref(), &value.into())?;
        }
        Ok(self)
    }

    /// Overwrites fields only if all of them are accepted
    fn update_atomic<I, K, V>(&mut self, fields: I) -> Result<&mut Self, Error>
    where
        Self: Clone,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<ParamValue>,
    {
        let mut trial = self.clone();
        trial.update(fields)?;
        *self = trial;
        Ok(self)
    }

    /// Loads the fields from a serialized mapping (same as update)
    fn load(&mut self, fields: &ParamMap) -> Result<&mut Self, Error> {
        self.update(fields)
    }

    /// Returns the settable and derived fields as a mapping
    fn to_mapping(&self) -> ParamMap {
        Self::FIELDS
            .iter()
            .chain(Self::DERIVED.iter())
            .filter_map(|key| self.get(key).map(|value| (key.to_string(), value)))
            .collect()
    }
}

/// Returns the value if it is finite and satisfies the condition
pub(crate) fn check_real(
    owner: &'static str,
    key: &'static str,
    value: f64,
    condition: fn(f64) -> bool,
    rule: &'static str,
) -> Result<f64, Error> {
    if !value.is_finite() || !condition(value) {
        return Err(Error::InvalidParameter {
            owner,
            key,
            value: format!("{:?}", value),
            rule,
        });
    }
    Ok(value)
}

/// Writes the mapping form as a "key = value" listing
pub(crate) fn write_mapping(f: &mut fmt::Formatter<'_>, title: &str, mapping: &ParamMap) -> fmt::Result {
    writeln!(f, "{}", title)?;
    writeln!(f, "{}", "=".repeat(title.chars().count()))?;
    for (key, value) in mapping {
        writeln!(f, "{} = {}", key, value)?;
    }
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
