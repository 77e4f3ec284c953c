use crate::common::constants::{PI2, PhysicalConstants};
use crate::domain::{TmmError, TmmResult};

/// Photon quantities derived from a vacuum wavelength.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpticalState {
    wavelength: f64,
    angular_frequency: f64,
    frequency: f64,
    wavenumber: f64,
    energy_joules: f64,
    energy_ev: f64,
}

impl OpticalState {
    /// `wavelength` is in metres and must be finite and positive.
    pub fn new(wavelength: f64, constants: &PhysicalConstants) -> TmmResult<Self> {
        if !wavelength.is_finite() || wavelength <= 0.0 {
            return Err(TmmError::domain(
                "DOMAIN.WAVELENGTH",
                format!("wavelength must be finite and > 0 m, got {wavelength}"),
            ));
        }

        let c = constants.speed_of_light;
        let energy_joules = constants.planck_speed_product() / wavelength;
        Ok(Self {
            wavelength,
            angular_frequency: PI2 * c / wavelength,
            frequency: c / wavelength,
            wavenumber: PI2 / wavelength,
            energy_joules,
            energy_ev: energy_joules / constants.elementary_charge,
        })
    }

    pub fn wavelength(&self) -> f64 {
        self.wavelength
    }

    /// Angular frequency (rad/s).
    pub fn angular_frequency(&self) -> f64 {
        self.angular_frequency
    }

    /// Frequency (Hz).
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Vacuum wavenumber (rad/m).
    pub fn wavenumber(&self) -> f64 {
        self.wavenumber
    }

    pub fn energy_joules(&self) -> f64 {
        self.energy_joules
    }

    pub fn energy_ev(&self) -> f64 {
        self.energy_ev
    }
}

#[cfg(test)]
mod tests {
    use super::OpticalState;
    use crate::common::constants::PhysicalConstants;
    use crate::domain::TmmErrorCategory;

    #[test]
    fn derived_quantities_are_consistent() {
        let constants = PhysicalConstants::SI;
        let light = OpticalState::new(1.0e-6, &constants).expect("valid wavelength");

        assert_eq!(light.wavelength(), 1.0e-6);
        assert!((light.frequency() - 2.997_924_58e14).abs() < 1.0);
        assert!(
            (light.angular_frequency() - 2.0 * std::f64::consts::PI * light.frequency()).abs()
                < 1.0e-3
        );
        assert!((light.wavenumber() - 6.283_185_307e6).abs() < 1.0e-2);
        assert!(
            (light.angular_frequency() / constants.speed_of_light - light.wavenumber()).abs()
                < 1.0e-6
        );
        assert!((light.energy_ev() - 1.239_841_984).abs() < 1.0e-8);
        assert!(
            (light.energy_joules() / constants.elementary_charge - light.energy_ev()).abs()
                < 1.0e-15
        );
    }

    #[test]
    fn rejects_non_positive_and_non_finite_wavelengths() {
        let constants = PhysicalConstants::SI;
        for wavelength in [0.0, -5.0e-7, f64::NAN, f64::INFINITY] {
            let error = OpticalState::new(wavelength, &constants).expect_err("invalid wavelength");
            assert_eq!(error.category(), TmmErrorCategory::DomainError);
            assert_eq!(error.placeholder(), "DOMAIN.WAVELENGTH");
        }
    }
}
