use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::common::constants::PhysicalConstants;
use crate::domain::{Polarization, TmmError};
use crate::modules::angle::LayerAngle;
use crate::numerics::Matrix2;

/// One tabulated optical-constant record.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct IndexSample {
    /// Vacuum wavelength (m).
    pub wavelength: f64,
    /// Real refractive index n.
    pub index: f64,
    /// Extinction coefficient k.
    pub extinction: f64,
}

impl IndexSample {
    pub const fn new(wavelength: f64, index: f64, extinction: f64) -> Self {
        Self {
            wavelength,
            index,
            extinction,
        }
    }

    pub fn complex_index(&self) -> Complex64 {
        Complex64::new(self.index, self.extinction)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayerError {
    #[error(
        "layer '{material}' has mismatched data columns: wavelength={wavelength}, index={index}, extinction={extinction}"
    )]
    LengthMismatch {
        material: String,
        wavelength: usize,
        index: usize,
        extinction: usize,
    },
    #[error("layer '{material}' has {sample_count} samples, index {index} is out of range")]
    SampleOutOfRange {
        material: String,
        index: usize,
        sample_count: usize,
    },
    #[error("layer '{material}' has neither tabulated samples nor a constant index")]
    MissingIndexData { material: String },
    #[error("layer '{material}' has a non-finite value in sample {index}")]
    NonFiniteSample { material: String, index: usize },
}

impl From<LayerError> for TmmError {
    fn from(error: LayerError) -> Self {
        let placeholder = match &error {
            LayerError::LengthMismatch { .. } => "CONFIG.LAYER_LENGTH",
            LayerError::SampleOutOfRange { .. } => "CONFIG.SAMPLE_RANGE",
            LayerError::MissingIndexData { .. } => "CONFIG.LAYER_DATA",
            LayerError::NonFiniteSample { .. } => {
                return TmmError::domain("DOMAIN.LAYER_SAMPLE", error.to_string());
            }
        };
        TmmError::configuration(placeholder, error.to_string())
    }
}

/// Both polarization forms of a layer's dynamical matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicalMatrices {
    pub s: Matrix2,
    pub p: Matrix2,
}

impl DynamicalMatrices {
    pub fn select(&self, polarization: Polarization) -> Matrix2 {
        match polarization {
            Polarization::S => self.s,
            Polarization::P => self.p,
        }
    }
}

/// A homogeneous slab of material.
///
/// Optical constants are either tabulated per wavelength sample or a single
/// constant complex index (typical for air or a transparent substrate).
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    material: String,
    thickness: f64,
    wavelength: Vec<f64>,
    index: Vec<f64>,
    extinction: Vec<f64>,
    complex_index: Option<Complex64>,
}

impl Layer {
    pub fn new(material: impl Into<String>, thickness: f64) -> Self {
        Self {
            material: material.into(),
            thickness,
            wavelength: Vec::new(),
            index: Vec::new(),
            extinction: Vec::new(),
            complex_index: None,
        }
    }

    /// Layer with the same index at every wavelength.
    pub fn with_constant_index(
        material: impl Into<String>,
        thickness: f64,
        index: f64,
        extinction: f64,
    ) -> Self {
        let mut layer = Self::new(material, thickness);
        layer.complex_index = Some(Complex64::new(index, extinction));
        layer
    }

    pub fn with_samples(
        material: impl Into<String>,
        thickness: f64,
        samples: &[IndexSample],
    ) -> Result<Self, LayerError> {
        let mut layer = Self::new(material, thickness);
        layer.load_samples(samples)?;
        Ok(layer)
    }

    /// Replaces the tabulated columns. All three must have the same length.
    pub fn load_tabulated_data(
        &mut self,
        wavelength: Vec<f64>,
        index: Vec<f64>,
        extinction: Vec<f64>,
    ) -> Result<(), LayerError> {
        if wavelength.len() != index.len() || wavelength.len() != extinction.len() {
            return Err(LayerError::LengthMismatch {
                material: self.material.clone(),
                wavelength: wavelength.len(),
                index: index.len(),
                extinction: extinction.len(),
            });
        }

        let non_finite = (0..wavelength.len()).find(|&sample| {
            !(wavelength[sample].is_finite()
                && index[sample].is_finite()
                && extinction[sample].is_finite())
        });
        if let Some(index) = non_finite {
            return Err(LayerError::NonFiniteSample {
                material: self.material.clone(),
                index,
            });
        }

        self.wavelength = wavelength;
        self.index = index;
        self.extinction = extinction;
        Ok(())
    }

    pub fn load_samples(&mut self, samples: &[IndexSample]) -> Result<(), LayerError> {
        self.load_tabulated_data(
            samples.iter().map(|sample| sample.wavelength).collect(),
            samples.iter().map(|sample| sample.index).collect(),
            samples.iter().map(|sample| sample.extinction).collect(),
        )
    }

    pub fn set_constant_index(&mut self, index: f64, extinction: f64) {
        self.complex_index = Some(Complex64::new(index, extinction));
    }

    pub fn set_thickness(&mut self, thickness: f64) {
        self.thickness = thickness;
    }

    pub fn material(&self) -> &str {
        &self.material
    }

    /// Thickness in metres; zero for semi-infinite media.
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelength
    }

    pub fn sample_count(&self) -> usize {
        self.wavelength.len()
    }

    pub fn is_tabulated(&self) -> bool {
        !self.wavelength.is_empty()
    }

    pub fn constant_index(&self) -> Option<Complex64> {
        self.complex_index
    }

    pub fn has_index_data(&self) -> bool {
        self.is_tabulated() || self.complex_index.is_some()
    }

    /// Complex index `n + jk` at wavelength sample `sample`. Tabulated data
    /// takes precedence over a constant index.
    pub fn complex_index_at(&self, sample: usize) -> Result<Complex64, LayerError> {
        if self.is_tabulated() {
            return match (self.index.get(sample), self.extinction.get(sample)) {
                (Some(&n), Some(&k)) => Ok(Complex64::new(n, k)),
                _ => Err(LayerError::SampleOutOfRange {
                    material: self.material.clone(),
                    index: sample,
                    sample_count: self.sample_count(),
                }),
            };
        }

        self.complex_index
            .ok_or_else(|| LayerError::MissingIndexData {
                material: self.material.clone(),
            })
    }

    /// Longitudinal and transverse wavenumbers `(k_x, k_z)` in a medium of
    /// index `n` at angular frequency `omega`.
    pub fn wavenumber(
        n: Complex64,
        omega: f64,
        angle: LayerAngle,
        constants: &PhysicalConstants,
    ) -> (Complex64, Complex64) {
        let k = n * (omega / constants.speed_of_light);
        (k * angle.cos, k * angle.sin)
    }

    /// Phase accumulated crossing this layer: `diag(exp(-j k d), exp(+j k d))`.
    pub fn propagation_matrix(&self, wavenumber: Complex64) -> Matrix2 {
        if self.thickness == 0.0 {
            return Matrix2::IDENTITY;
        }

        let phase = wavenumber * self.thickness;
        let j = Complex64::i();
        Matrix2::diagonal((-j * phase).exp(), (j * phase).exp())
    }

    pub fn dynamical_matrix(n: Complex64, angle: LayerAngle) -> DynamicalMatrices {
        let m = n * angle.cos;
        let one = Complex64::new(1.0, 0.0);
        DynamicalMatrices {
            s: Matrix2::new(one, one, m, -m),
            p: Matrix2::new(angle.cos, angle.cos, n, -n),
        }
    }
}
