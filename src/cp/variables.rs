//! CP variable types.

use super::domain::Domain;
use super::error::ModelError;
use std::fmt;

/// Identifier of a variable within one [`CpModel`](super::CpModel).
///
/// Ids are dense indices handed out in declaration order, so they double as
/// the default branching order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Position of the variable in declaration order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// An integer decision variable declaration.
///
/// Holds the name and the initial domain. The live domain during search is
/// owned by the [`DomainStore`](super::DomainStore).
#[derive(Debug, Clone)]
pub struct IntVar {
    /// Variable name (for diagnostics and solution lookup).
    pub name: String,
    /// Initial domain.
    pub domain: Domain,
}

impl IntVar {
    /// Creates a variable over `[min, max]`.
    ///
    /// Fails with [`ModelError::DomainTooWide`] before allocating anything
    /// when the range holds more than [`Domain::MAX_WIDTH`] values.
    pub fn new(name: impl Into<String>, min: i64, max: i64) -> Result<Self, ModelError> {
        let name = name.into();
        match Domain::try_interval(min, max) {
            Some(domain) => Ok(Self { name, domain }),
            None => Err(too_wide(name, min, max)),
        }
    }

    /// Creates a variable over an explicit value set.
    pub fn with_values(name: impl Into<String>, values: &[i64]) -> Result<Self, ModelError> {
        let name = name.into();
        match Domain::try_from_values(values) {
            Some(domain) => Ok(Self { name, domain }),
            None => {
                let min = values.iter().copied().min().unwrap_or(0);
                let max = values.iter().copied().max().unwrap_or(0);
                Err(too_wide(name, min, max))
            }
        }
    }

    /// Creates a variable fixed to a single value.
    pub fn fixed(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            domain: Domain::from_values(&[value]),
        }
    }

    /// Whether this variable is fixed to a single value.
    pub fn is_fixed(&self) -> bool {
        self.domain.is_fixed()
    }

    /// Number of values in the initial domain.
    pub fn domain_size(&self) -> usize {
        self.domain.size()
    }
}

fn too_wide(name: String, min: i64, max: i64) -> ModelError {
    ModelError::DomainTooWide {
        name,
        width: Domain::span(min, max),
        limit: Domain::MAX_WIDTH,
    }
}
