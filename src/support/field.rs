//! Geomagnetic reference field specification and resolution.
//!
//! The ambient field that magnetizes the subsurface can be specified three
//! ways: by geographic location (resolved through a [`ReferenceFieldModel`]),
//! as a plain field vector, or as a full IGRF-style descriptor. Resolution
//! normalizes whichever form is given into one canonical [`FieldVector`] that
//! kernel solvers consume; it happens exactly once per model and never falls
//! back silently when a lookup is unavailable.

use thiserror::Error;
use uom::si::{
    angle::degree,
    f64::{Angle, MagneticFluxDensity},
    magnetic_flux_density::nanotesla,
};

/// A full IGRF-style field descriptor.
///
/// Carries declination `D`, inclination `I`, horizontal intensity `H`, the
/// north/east/down components `X`/`Y`/`Z`, and total intensity `F`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IgrfDescriptor {
    pub declination: Angle,
    pub inclination: Angle,
    pub horizontal: MagneticFluxDensity,
    pub x: MagneticFluxDensity,
    pub y: MagneticFluxDensity,
    pub z: MagneticFluxDensity,
    pub total: MagneticFluxDensity,
}

/// An ambient field specification accepted by forward operators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldReference {
    /// Geographic location, resolved through a [`ReferenceFieldModel`].
    LatLon { latitude: Angle, longitude: Angle },
    /// Field vector given directly as north/east/down components.
    Vector {
        x: MagneticFluxDensity,
        y: MagneticFluxDensity,
        z: MagneticFluxDensity,
    },
    /// Full descriptor `[D, I, H, X, Y, Z, F]`.
    Full(IgrfDescriptor),
}

impl FieldReference {
    /// Builds a reference from a raw value slice.
    ///
    /// Two values are read as latitude/longitude in degrees, three as a field
    /// vector in nanotesla, and seven as a full descriptor
    /// `[D, I, H, X, Y, Z, F]` (degrees and nanotesla).
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidLength`] for any other slice length.
    pub fn from_slice(values: &[f64]) -> Result<Self, FieldError> {
        match *values {
            [lat, lon] => Ok(FieldReference::LatLon {
                latitude: Angle::new::<degree>(lat),
                longitude: Angle::new::<degree>(lon),
            }),
            [x, y, z] => Ok(FieldReference::Vector {
                x: MagneticFluxDensity::new::<nanotesla>(x),
                y: MagneticFluxDensity::new::<nanotesla>(y),
                z: MagneticFluxDensity::new::<nanotesla>(z),
            }),
            [d, i, h, x, y, z, f] => Ok(FieldReference::Full(IgrfDescriptor {
                declination: Angle::new::<degree>(d),
                inclination: Angle::new::<degree>(i),
                horizontal: MagneticFluxDensity::new::<nanotesla>(h),
                x: MagneticFluxDensity::new::<nanotesla>(x),
                y: MagneticFluxDensity::new::<nanotesla>(y),
                z: MagneticFluxDensity::new::<nanotesla>(z),
                total: MagneticFluxDensity::new::<nanotesla>(f),
            })),
            _ => Err(FieldError::InvalidLength { len: values.len() }),
        }
    }
}

/// A reference-field model resolving a geographic location to a descriptor.
///
/// Implementations wrap an external geomagnetic model (IGRF, WMM) or an
/// analytic approximation such as [`AxialDipoleField`].
pub trait ReferenceFieldModel {
    /// The full field descriptor at the given location.
    fn descriptor_at(&self, latitude: Angle, longitude: Angle) -> IgrfDescriptor;
}

/// The canonical field parameterization passed to kernel solvers.
///
/// Values are raw nanotesla; the full form additionally carries declination
/// and inclination in degrees, ordered `[D, I, H, X, Y, Z, F]`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldVector {
    /// North/east/down field components.
    Xyz([f64; 3]),
    /// Full descriptor `[D, I, H, X, Y, Z, F]`.
    Full([f64; 7]),
}

impl FieldVector {
    /// The raw parameter values in canonical order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        match self {
            FieldVector::Xyz(values) => values,
            FieldVector::Full(values) => values,
        }
    }

    /// The north/east/down field components in nanotesla.
    #[must_use]
    pub fn xyz(&self) -> [f64; 3] {
        match self {
            FieldVector::Xyz(values) => *values,
            FieldVector::Full(values) => [values[3], values[4], values[5]],
        }
    }

    /// The total field intensity in nanotesla.
    #[must_use]
    pub fn intensity(&self) -> f64 {
        match self {
            FieldVector::Xyz([x, y, z]) => (x * x + y * y + z * z).sqrt(),
            FieldVector::Full(values) => values[6],
        }
    }

    /// The unit vector along the ambient field, or zero for a null field.
    #[must_use]
    pub fn direction(&self) -> [f64; 3] {
        let [x, y, z] = self.xyz();
        let norm = (x * x + y * y + z * z).sqrt();
        if norm == 0.0 {
            return [0.0, 0.0, 0.0];
        }
        [x / norm, y / norm, z / norm]
    }
}

/// Errors that can occur while resolving a field reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    /// A raw descriptor must have 2 (lat/lon), 3 (X/Y/Z) or 7
    /// (D/I/H/X/Y/Z/F) values.
    #[error("field descriptor must have 2, 3, or 7 values, got {len}")]
    InvalidLength { len: usize },

    /// A lat/lon reference needs a reference-field model to resolve.
    #[error(
        "no reference-field model available to resolve a lat/lon field reference; \
         supply a ReferenceFieldModel (e.g. AxialDipoleField or an IGRF binding)"
    )]
    MissingReferenceModel,
}

/// Resolves a field reference into the canonical kernel parameterization.
///
/// Vector and full references pass through unchanged. A lat/lon reference is
/// resolved through `model`.
///
/// # Errors
///
/// Returns [`FieldError::MissingReferenceModel`] when a lat/lon reference is
/// given without a model. Missing lookups never default silently.
pub fn resolve(
    reference: &FieldReference,
    model: Option<&dyn ReferenceFieldModel>,
) -> Result<FieldVector, FieldError> {
    match reference {
        FieldReference::LatLon {
            latitude,
            longitude,
        } => {
            let model = model.ok_or(FieldError::MissingReferenceModel)?;
            let descriptor = model.descriptor_at(*latitude, *longitude);
            Ok(descriptor_values(&descriptor))
        }
        FieldReference::Vector { x, y, z } => Ok(FieldVector::Xyz([
            x.get::<nanotesla>(),
            y.get::<nanotesla>(),
            z.get::<nanotesla>(),
        ])),
        FieldReference::Full(descriptor) => Ok(descriptor_values(descriptor)),
    }
}

fn descriptor_values(descriptor: &IgrfDescriptor) -> FieldVector {
    FieldVector::Full([
        descriptor.declination.get::<degree>(),
        descriptor.inclination.get::<degree>(),
        descriptor.horizontal.get::<nanotesla>(),
        descriptor.x.get::<nanotesla>(),
        descriptor.y.get::<nanotesla>(),
        descriptor.z.get::<nanotesla>(),
        descriptor.total.get::<nanotesla>(),
    ])
}

/// A geocentric axial dipole approximation of the reference field.
///
/// The dipole axis coincides with the rotation axis, so declination is zero
/// everywhere and the field depends on latitude `λ` only:
/// total intensity `F = B0·sqrt(1 + 3·sin²λ)` and inclination
/// `tan I = 2·tan λ`, with `B0` the equatorial intensity.
///
/// Useful as a self-contained stand-in where no external IGRF binding is
/// wired up, and as a deterministic lookup in tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxialDipoleField {
    equatorial: MagneticFluxDensity,
}

impl AxialDipoleField {
    /// A dipole field with the given equatorial intensity `B0`.
    #[must_use]
    pub fn new(equatorial: MagneticFluxDensity) -> Self {
        Self { equatorial }
    }
}

impl ReferenceFieldModel for AxialDipoleField {
    fn descriptor_at(&self, latitude: Angle, _longitude: Angle) -> IgrfDescriptor {
        let b0 = self.equatorial.get::<nanotesla>();
        let lat = latitude.get::<degree>().to_radians();
        let total = b0 * (1.0 + 3.0 * lat.sin().powi(2)).sqrt();
        let inclination = (2.0 * lat.tan()).atan();
        let horizontal = total * inclination.cos();
        let vertical = total * inclination.sin();
        IgrfDescriptor {
            declination: Angle::new::<degree>(0.0),
            inclination: Angle::new::<degree>(inclination.to_degrees()),
            horizontal: MagneticFluxDensity::new::<nanotesla>(horizontal),
            x: MagneticFluxDensity::new::<nanotesla>(horizontal),
            y: MagneticFluxDensity::new::<nanotesla>(0.0),
            z: MagneticFluxDensity::new::<nanotesla>(vertical),
            total: MagneticFluxDensity::new::<nanotesla>(total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn vector_reference_passes_through_unchanged() {
        let reference = FieldReference::from_slice(&[20_000.0, 0.0, 40_000.0]).unwrap();
        let resolved = resolve(&reference, None).expect("vector needs no lookup");
        assert_eq!(resolved, FieldVector::Xyz([20_000.0, 0.0, 40_000.0]));
    }

    #[test]
    fn full_reference_passes_through_unchanged() {
        let raw = [2.0, 65.0, 19_000.0, 18_990.0, 600.0, 42_000.0, 46_100.0];
        let reference = FieldReference::from_slice(&raw).unwrap();
        let resolved = resolve(&reference, None).expect("full descriptor needs no lookup");
        assert_eq!(resolved, FieldVector::Full(raw));
    }

    #[test]
    fn four_values_are_rejected() {
        let error = FieldReference::from_slice(&[1.0, 2.0, 3.0, 4.0]).unwrap_err();
        assert_eq!(error, FieldError::InvalidLength { len: 4 });
    }

    #[test]
    fn lat_lon_without_model_fails() {
        let reference = FieldReference::from_slice(&[50.0, 13.0]).unwrap();
        let error = resolve(&reference, None).unwrap_err();
        assert_eq!(error, FieldError::MissingReferenceModel);
    }

    #[test]
    fn lat_lon_resolves_through_model() {
        let dipole = AxialDipoleField::new(MagneticFluxDensity::new::<nanotesla>(30_000.0));
        let reference = FieldReference::from_slice(&[90.0, 0.0]).unwrap();
        let resolved = resolve(&reference, Some(&dipole)).unwrap();

        // At the pole the field is vertical with twice the equatorial strength.
        assert_relative_eq!(resolved.intensity(), 60_000.0, max_relative = 1e-9);
        let [x, y, z] = resolved.xyz();
        assert_relative_eq!(z, 60_000.0, max_relative = 1e-9);
        assert_relative_eq!(x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn axial_dipole_is_horizontal_at_the_equator() {
        let dipole = AxialDipoleField::new(MagneticFluxDensity::new::<nanotesla>(30_000.0));
        let descriptor =
            dipole.descriptor_at(Angle::new::<degree>(0.0), Angle::new::<degree>(120.0));
        assert_relative_eq!(descriptor.inclination.get::<degree>(), 0.0);
        assert_relative_eq!(descriptor.total.get::<nanotesla>(), 30_000.0, max_relative = 1e-12);
        assert_relative_eq!(descriptor.z.get::<nanotesla>(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn direction_is_unit_length() {
        let field = FieldVector::Xyz([20_000.0, 0.0, 40_000.0]);
        let [x, y, z] = field.direction();
        assert_relative_eq!(x * x + y * y + z * z, 1.0, max_relative = 1e-12);
    }

    #[test]
    fn null_field_has_zero_direction() {
        let field = FieldVector::Xyz([0.0, 0.0, 0.0]);
        assert_eq!(field.direction(), [0.0, 0.0, 0.0]);
    }
}
