//! Response components of potential-field surveys.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// A measurable potential-field quantity at a receiver.
///
/// Spellings follow survey convention: gravity components are lower case
/// (`"gx"`), magnetic components carry a `B` prefix (`"Bz"`, `"Bxz"`), and the
/// total-field anomaly is `"TFA"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// Gravity component along north.
    Gx,
    /// Gravity component along east.
    Gy,
    /// Gravity component along down.
    Gz,
    /// Total-field magnetic anomaly (projection onto the ambient field).
    Tfa,
    /// Magnetic field component along north.
    Bx,
    /// Magnetic field component along east.
    By,
    /// Magnetic field component along down.
    Bz,
    /// Magnetic gradient tensor entry ∂Bx/∂y.
    Bxy,
    /// Magnetic gradient tensor entry ∂Bx/∂z.
    Bxz,
    /// Magnetic gradient tensor entry ∂By/∂y.
    Byy,
    /// Magnetic gradient tensor entry ∂By/∂z.
    Byz,
    /// Magnetic gradient tensor entry ∂Bz/∂z.
    Bzz,
}

impl Component {
    /// All components in canonical order.
    pub const ALL: [Component; 12] = [
        Component::Gx,
        Component::Gy,
        Component::Gz,
        Component::Tfa,
        Component::Bx,
        Component::By,
        Component::Bz,
        Component::Bxy,
        Component::Bxz,
        Component::Byy,
        Component::Byz,
        Component::Bzz,
    ];

    /// The survey spelling of this component.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Component::Gx => "gx",
            Component::Gy => "gy",
            Component::Gz => "gz",
            Component::Tfa => "TFA",
            Component::Bx => "Bx",
            Component::By => "By",
            Component::Bz => "Bz",
            Component::Bxy => "Bxy",
            Component::Bxz => "Bxz",
            Component::Byy => "Byy",
            Component::Byz => "Byz",
            Component::Bzz => "Bzz",
        }
    }

    /// True for gravity components (gx, gy, gz).
    #[must_use]
    pub fn is_gravity(self) -> bool {
        matches!(self, Component::Gx | Component::Gy | Component::Gz)
    }

    /// True for magnetic components, including the gradient tensor entries.
    #[must_use]
    pub fn is_magnetic(self) -> bool {
        !self.is_gravity()
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error returned when parsing an unrecognized component spelling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown response component \"{0}\"")]
pub struct UnknownComponentError(pub String);

impl FromStr for Component {
    type Err = UnknownComponentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Component::ALL
            .into_iter()
            .find(|component| component.as_str() == s)
            .ok_or_else(|| UnknownComponentError(s.to_string()))
    }
}

/// An error returned when a requested component list is unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ComponentListError {
    /// At least one component must be requested.
    #[error("component list must not be empty")]
    Empty,

    /// Each component may be requested at most once; duplicates would produce
    /// redundant Jacobian blocks.
    #[error("component {0} requested more than once")]
    Duplicate(Component),
}

/// Checks that a component list is non-empty and duplicate-free.
///
/// # Errors
///
/// Returns [`ComponentListError`] on an empty list or a repeated component.
pub fn validate_components(components: &[Component]) -> Result<(), ComponentListError> {
    if components.is_empty() {
        return Err(ComponentListError::Empty);
    }
    for (i, component) in components.iter().enumerate() {
        if components[..i].contains(component) {
            return Err(ComponentListError::Duplicate(*component));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spellings_round_trip() {
        for component in Component::ALL {
            let parsed: Component = component.as_str().parse().expect("spelling should parse");
            assert_eq!(parsed, component);
        }
    }

    #[test]
    fn unknown_spelling_is_rejected() {
        let error = "Bq".parse::<Component>().unwrap_err();
        assert_eq!(error, UnknownComponentError("Bq".to_string()));
    }

    #[test]
    fn gravity_and_magnetic_partition() {
        assert!(Component::Gz.is_gravity());
        assert!(!Component::Gz.is_magnetic());
        assert!(Component::Tfa.is_magnetic());
        assert!(Component::Bxz.is_magnetic());
    }

    #[test]
    fn empty_list_is_rejected() {
        assert_eq!(validate_components(&[]), Err(ComponentListError::Empty));
    }

    #[test]
    fn duplicate_is_rejected() {
        let components = [Component::Tfa, Component::Bz, Component::Tfa];
        assert_eq!(
            validate_components(&components),
            Err(ComponentListError::Duplicate(Component::Tfa))
        );
    }

    #[test]
    fn distinct_list_is_accepted() {
        let components = [Component::Tfa, Component::Bz];
        assert!(validate_components(&components).is_ok());
    }
}
