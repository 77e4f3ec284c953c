use num_complex::Complex64;
use std::f64::consts::FRAC_PI_2;

use crate::domain::{TmmError, TmmResult};

/// Propagation direction inside one layer, measured from the stack normal.
///
/// Kept as complex cosine/sine because refraction into an absorbing layer (or
/// past the critical angle) gives a complex angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerAngle {
    pub cos: Complex64,
    pub sin: Complex64,
}

impl LayerAngle {
    pub const NORMAL: Self = Self {
        cos: Complex64::new(1.0, 0.0),
        sin: Complex64::new(0.0, 0.0),
    };

    pub fn from_real(theta: f64) -> Self {
        Self {
            cos: Complex64::new(theta.cos(), 0.0),
            sin: Complex64::new(theta.sin(), 0.0),
        }
    }

    /// Angle in a layer of index `n_layer` for light arriving from a medium of
    /// index `n_incident` at angle `incident` (Snell's law). The root is taken
    /// on the branch where `n_layer * cos` has a non-negative imaginary part,
    /// so fields decay into the layer.
    pub fn refracted(n_incident: Complex64, incident: LayerAngle, n_layer: Complex64) -> Self {
        if incident.sin == Complex64::new(0.0, 0.0) {
            return Self::NORMAL;
        }

        let sin = n_incident * incident.sin / n_layer;
        let mut cos = (Complex64::new(1.0, 0.0) - sin * sin).sqrt();
        let longitudinal = n_layer * cos;
        if longitudinal.im < 0.0 || (longitudinal.im == 0.0 && longitudinal.re < 0.0) {
            cos = -cos;
        }

        Self { cos, sin }
    }

    pub fn is_normal(&self) -> bool {
        self.sin == Complex64::new(0.0, 0.0)
    }
}

impl Default for LayerAngle {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Validates an ambient incidence angle in radians.
pub fn incidence_angle(theta: f64) -> TmmResult<LayerAngle> {
    if !theta.is_finite() || theta.abs() >= FRAC_PI_2 {
        return Err(TmmError::domain(
            "DOMAIN.INCIDENCE_ANGLE",
            format!("incidence angle must be finite with |theta| < pi/2 rad, got {theta}"),
        ));
    }

    Ok(LayerAngle::from_real(theta))
}

#[cfg(test)]
mod tests {
    use super::{LayerAngle, incidence_angle};
    use num_complex::Complex64;

    #[test]
    fn normal_incidence_stays_normal_in_every_layer() {
        let angle = LayerAngle::refracted(
            Complex64::new(1.0, 0.0),
            LayerAngle::NORMAL,
            Complex64::new(0.2, 3.5),
        );
        assert!(angle.is_normal());
        assert_eq!(angle.cos, Complex64::new(1.0, 0.0));
    }

    #[test]
    fn refraction_obeys_snell_law_for_real_indices() {
        let incident = LayerAngle::from_real(0.5);
        let n0 = Complex64::new(1.0, 0.0);
        let n1 = Complex64::new(1.5, 0.0);
        let refracted = LayerAngle::refracted(n0, incident, n1);

        let expected_theta = (0.5_f64.sin() / 1.5).asin();
        assert!((refracted.sin.re - expected_theta.sin()).abs() < 1.0e-14);
        assert!((refracted.cos.re - expected_theta.cos()).abs() < 1.0e-14);
        assert!(refracted.cos.im.abs() < 1.0e-14);
    }

    #[test]
    fn total_internal_reflection_gives_decaying_branch() {
        let incident = LayerAngle::from_real(1.2);
        let refracted = LayerAngle::refracted(
            Complex64::new(1.5, 0.0),
            incident,
            Complex64::new(1.0, 0.0),
        );

        assert!(refracted.cos.re.abs() < 1.0e-12);
        assert!(refracted.cos.im > 0.0);
    }

    #[test]
    fn absorbing_layer_branch_has_positive_imaginary_wavevector() {
        let n1 = Complex64::new(0.2, 3.0);
        let refracted = LayerAngle::refracted(
            Complex64::new(1.0, 0.0),
            LayerAngle::from_real(0.7),
            n1,
        );
        assert!((n1 * refracted.cos).im > 0.0);
    }

    #[test]
    fn grazing_and_non_finite_angles_are_rejected() {
        assert!(incidence_angle(0.0).is_ok());
        assert!(incidence_angle(-1.0).is_ok());
        for theta in [std::f64::consts::FRAC_PI_2, -2.0, f64::NAN] {
            let error = incidence_angle(theta).expect_err("invalid angle");
            assert_eq!(error.placeholder(), "DOMAIN.INCIDENCE_ANGLE");
        }
    }
}
