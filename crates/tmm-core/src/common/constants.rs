//! Physical constants shared by the optical kernels.
//!
//! Values are the exact SI definitions (CODATA 2018). Kernels receive the
//! table by reference instead of reading module-level globals.

pub const PI2: f64 = std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalConstants {
    /// Speed of light in vacuum (m/s).
    pub speed_of_light: f64,
    /// Planck constant (J s).
    pub planck: f64,
    /// Elementary charge (C).
    pub elementary_charge: f64,
}

impl PhysicalConstants {
    pub const SI: Self = Self {
        speed_of_light: 299_792_458.0,
        planck: 6.626_070_15e-34,
        elementary_charge: 1.602_176_634e-19,
    };

    /// h*c in J m, the numerator of the photon energy.
    pub fn planck_speed_product(&self) -> f64 {
        self.planck * self.speed_of_light
    }
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self::SI
    }
}
