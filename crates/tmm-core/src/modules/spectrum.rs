//! Wavelength sweep over a validated stack.

use num_complex::Complex64;
use rayon::prelude::*;
use serde::Serialize;

use crate::common::config::{ConservationCheck, ConservationPolicy, SweepConfig};
use crate::common::constants::PhysicalConstants;
use crate::domain::{ExecutionMode, Polarization, TmmError, TmmResult};
use crate::modules::angle::LayerAngle;
use crate::modules::assembler::{AssemblyInput, assemble_transfer_chain};
use crate::modules::coefficients::{reflectance, transmittance};
use crate::modules::composer::compose;
use crate::modules::light::OpticalState;
use crate::modules::stack::Stack;
use crate::modules::traits::SpectrumSink;
use crate::numerics::Matrix2;

/// A sample whose powers fall outside `R + T <= 1`, `R >= 0`, `T >= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConservationViolation {
    pub sample: usize,
    pub wavelength: f64,
    pub reflectance: f64,
    pub transmittance: f64,
}

/// R(λ), T(λ) and the complex amplitudes behind them, ordered by sample index.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Spectrum {
    pub polarization: Polarization,
    pub incidence_angle: f64,
    pub wavelengths: Vec<f64>,
    pub reflectance: Vec<f64>,
    pub transmittance: Vec<f64>,
    pub reflection_amplitudes: Vec<Complex64>,
    pub transmission_amplitudes: Vec<Complex64>,
    pub violations: Vec<ConservationViolation>,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }

    /// `1 - R - T` per sample.
    pub fn absorptance(&self) -> Vec<f64> {
        self.reflectance
            .iter()
            .zip(&self.transmittance)
            .map(|(r, t)| 1.0 - r - t)
            .collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.wavelengths
            .iter()
            .zip(&self.reflectance)
            .zip(&self.transmittance)
            .map(|((&wavelength, &r), &t)| (wavelength, r, t))
    }

    pub fn emit<S: SpectrumSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        sink.consume(&self.wavelengths, &self.reflectance, &self.transmittance)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SampleResult {
    reflectance: f64,
    transmittance: f64,
    reflection_amplitude: Complex64,
    transmission_amplitude: Complex64,
}

/// Everything a sweep needs once the stack and configuration are validated.
#[derive(Debug, Clone, Copy)]
struct SweepPlan<'a> {
    stack: &'a Stack,
    grid: &'a [f64],
    incidence: LayerAngle,
    config: &'a SweepConfig,
    constants: &'a PhysicalConstants,
}

impl SweepPlan<'_> {
    fn transfer_matrix(&self, sample: usize) -> TmmResult<Matrix2> {
        let light = OpticalState::new(self.grid[sample], self.constants)?;
        let chain = assemble_transfer_chain(AssemblyInput {
            stack: self.stack,
            sample,
            light: &light,
            polarization: self.config.polarization,
            incidence: self.incidence,
            constants: self.constants,
        })?;
        compose(&chain)
    }

    fn evaluate(&self, sample: usize) -> TmmResult<SampleResult> {
        let transfer = self.transfer_matrix(sample)?;
        let (r_power, r) = reflectance(&transfer)?;
        let (t_power, t) = transmittance(&transfer)?;
        Ok(SampleResult {
            reflectance: r_power,
            transmittance: t_power,
            reflection_amplitude: r,
            transmission_amplitude: t,
        })
    }

    fn evaluate_at(&self, sample: usize) -> TmmResult<SampleResult> {
        self.evaluate(sample)
            .map_err(|error| error.at_sample(sample, self.grid[sample]))
    }

    fn run(&self) -> TmmResult<Spectrum> {
        tracing::debug!(
            samples = self.grid.len(),
            layers = self.stack.layers().len(),
            polarization = %self.config.polarization,
            mode = ?self.config.execution_mode,
            "starting spectrum sweep"
        );

        let samples = match self.config.execution_mode {
            ExecutionMode::Serial => (0..self.grid.len())
                .map(|sample| self.evaluate_at(sample))
                .collect::<TmmResult<Vec<_>>>()?,
            ExecutionMode::Parallel => (0..self.grid.len())
                .into_par_iter()
                .map(|sample| self.evaluate_at(sample))
                .collect::<TmmResult<Vec<_>>>()?,
        };

        let violations = check_conservation(self.grid, &samples, self.config.conservation)?;
        let spectrum = Spectrum {
            polarization: self.config.polarization,
            incidence_angle: self.config.incidence_angle,
            wavelengths: self.grid.to_vec(),
            reflectance: samples.iter().map(|s| s.reflectance).collect(),
            transmittance: samples.iter().map(|s| s.transmittance).collect(),
            reflection_amplitudes: samples.iter().map(|s| s.reflection_amplitude).collect(),
            transmission_amplitudes: samples.iter().map(|s| s.transmission_amplitude).collect(),
            violations,
        };

        tracing::debug!(
            samples = spectrum.len(),
            violations = spectrum.violations.len(),
            "finished spectrum sweep"
        );
        Ok(spectrum)
    }
}

fn check_conservation(
    grid: &[f64],
    samples: &[SampleResult],
    check: ConservationCheck,
) -> TmmResult<Vec<ConservationViolation>> {
    if check.policy == ConservationPolicy::Off {
        return Ok(Vec::new());
    }

    let tol = check.abs_tol;
    let mut violations = Vec::new();
    for (sample, result) in samples.iter().enumerate() {
        let (r, t) = (result.reflectance, result.transmittance);
        if r + t <= 1.0 + tol && r >= -tol && t >= -tol {
            continue;
        }

        let wavelength = grid[sample];
        if check.policy == ConservationPolicy::Error {
            return Err(TmmError::numerical(
                "NUMERIC.CONSERVATION",
                format!("R = {r}, T = {t} violates energy conservation (tolerance {tol})"),
            )
            .at_sample(sample, wavelength));
        }

        tracing::warn!(
            sample,
            wavelength,
            reflectance = r,
            transmittance = t,
            "energy conservation violated"
        );
        violations.push(ConservationViolation {
            sample,
            wavelength,
            reflectance: r,
            transmittance: t,
        });
    }
    Ok(violations)
}

/// Sweeps `stack` at normal incidence with default settings.
pub fn compute_spectrum(stack: &Stack, polarization: Polarization) -> TmmResult<Spectrum> {
    sweep(stack, &SweepConfig::new(polarization), &PhysicalConstants::SI)
}

/// Validates `stack` against `config` and sweeps every wavelength sample.
pub fn sweep(
    stack: &Stack,
    config: &SweepConfig,
    constants: &PhysicalConstants,
) -> TmmResult<Spectrum> {
    let prepared = PreparedSweep::new(stack, config)?;
    prepared.plan(stack, config, constants).run()
}

#[derive(Debug, Clone, PartialEq)]
struct PreparedSweep {
    grid: Vec<f64>,
    incidence: LayerAngle,
}

impl PreparedSweep {
    fn new(stack: &Stack, config: &SweepConfig) -> TmmResult<Self> {
        let incidence = config.validate()?;
        let grid = stack.validate(config.allow_zero_thickness)?;
        tracing::debug!(
            samples = grid.len(),
            interior_layers = stack.interior().len(),
            "validated stack"
        );
        Ok(Self { grid, incidence })
    }

    fn plan<'a>(
        &'a self,
        stack: &'a Stack,
        config: &'a SweepConfig,
        constants: &'a PhysicalConstants,
    ) -> SweepPlan<'a> {
        SweepPlan {
            stack,
            grid: &self.grid,
            incidence: self.incidence,
            config,
            constants,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverPhase {
    Uninitialized,
    Ready,
    Computed,
}

/// Owns a stack and its sweep settings and tracks whether the last result is
/// still valid.
#[derive(Debug, Clone)]
pub struct SpectrumDriver {
    stack: Stack,
    config: SweepConfig,
    constants: PhysicalConstants,
    prepared: Option<PreparedSweep>,
    spectrum: Option<Spectrum>,
}

impl SpectrumDriver {
    pub fn new(stack: Stack, config: SweepConfig) -> Self {
        Self::with_constants(stack, config, PhysicalConstants::SI)
    }

    pub fn with_constants(stack: Stack, config: SweepConfig, constants: PhysicalConstants) -> Self {
        Self {
            stack,
            config,
            constants,
            prepared: None,
            spectrum: None,
        }
    }

    pub fn phase(&self) -> DriverPhase {
        match (&self.prepared, &self.spectrum) {
            (None, _) => DriverPhase::Uninitialized,
            (Some(_), None) => DriverPhase::Ready,
            (Some(_), Some(_)) => DriverPhase::Computed,
        }
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Mutable stack access. Invalidates the prepared grid and any result.
    pub fn stack_mut(&mut self) -> &mut Stack {
        self.reset();
        &mut self.stack
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SweepConfig) {
        self.config = config;
        self.reset();
    }

    /// Validates the stack and configuration and fixes the wavelength grid.
    pub fn prepare(&mut self) -> TmmResult<()> {
        self.reset();
        self.prepared = Some(PreparedSweep::new(&self.stack, &self.config)?);
        Ok(())
    }

    /// Runs the sweep, preparing first if needed. A failed sweep leaves the
    /// driver ready with no result.
    pub fn compute(&mut self) -> TmmResult<&Spectrum> {
        if self.prepared.is_none() {
            self.prepare()?;
        }
        self.spectrum = None;

        let spectrum = match &self.prepared {
            Some(prepared) => prepared
                .plan(&self.stack, &self.config, &self.constants)
                .run()?,
            None => return Err(not_prepared()),
        };
        let spectrum: &Spectrum = self.spectrum.insert(spectrum);
        Ok(spectrum)
    }

    pub fn spectrum(&self) -> Option<&Spectrum> {
        self.spectrum.as_ref()
    }

    pub fn grid(&self) -> Option<&[f64]> {
        self.prepared.as_ref().map(|prepared| prepared.grid.as_slice())
    }

    /// Composed transfer matrix at one sample of the prepared grid.
    pub fn transfer_matrix_at(&self, sample: usize) -> TmmResult<Matrix2> {
        let prepared = self.prepared.as_ref().ok_or_else(not_prepared)?;
        let Some(&wavelength) = prepared.grid.get(sample) else {
            return Err(TmmError::configuration(
                "CONFIG.SAMPLE_RANGE",
                format!(
                    "sample {sample} is outside the {}-sample wavelength grid",
                    prepared.grid.len()
                ),
            ));
        };

        prepared
            .plan(&self.stack, &self.config, &self.constants)
            .transfer_matrix(sample)
            .map_err(|error| error.at_sample(sample, wavelength))
    }

    fn reset(&mut self) {
        self.prepared = None;
        self.spectrum = None;
    }
}

fn not_prepared() -> TmmError {
    TmmError::configuration(
        "CONFIG.DRIVER_STATE",
        "the driver must be prepared before sampling transfer matrices",
    )
}
