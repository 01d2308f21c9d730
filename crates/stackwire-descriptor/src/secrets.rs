//! Process-level secret values.
//!
//! Secrets are passed to the resolver explicitly; the resolver itself never
//! reads the process environment.

use std::collections::BTreeMap;
use std::fmt;

/// Named secret values available to `${secret.NAME}` interpolations.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secrets {
    values: BTreeMap<String, String>,
}

impl Secrets {
    /// Creates an empty secret set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the named variables from the process environment. Variables
    /// that are unset or not valid unicode are left out.
    pub fn from_process<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut secrets = Self::new();
        for name in names {
            let name = name.as_ref();
            match std::env::var(name) {
                Ok(value) => secrets.insert(name, value),
                Err(_) => tracing::debug!(secret = name, "secret not present in environment"),
            }
        }
        secrets
    }

    /// Sets a secret, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let _ = self.values.insert(name.into(), value.into());
    }

    /// Returns the value of a secret.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Number of secrets held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no secrets are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Secrets {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut secrets = Self::new();
        for (name, value) in iter {
            secrets.insert(name, value);
        }
        secrets
    }
}

// Values never reach logs.
impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}
