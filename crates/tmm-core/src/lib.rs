//! Transfer Matrix Method engine for planar optical multilayers.
//!
//! A [`modules::stack::Stack`] of layers with tabulated complex refractive
//! indices is swept over its wavelength grid; each sample is turned into an
//! ordered list of dynamical and propagation matrices, composed into one 2x2
//! transfer matrix and reduced to reflectance and transmittance.

pub mod common;
pub mod domain;
pub mod modules;
pub mod numerics;

pub use common::config::{ConservationPolicy, SweepConfig, load_sweep_config};
pub use common::constants::PhysicalConstants;
pub use domain::{ExecutionMode, Polarization, TmmError, TmmErrorCategory, TmmResult};
pub use modules::layer::{IndexSample, Layer};
pub use modules::spectrum::{DriverPhase, Spectrum, SpectrumDriver, compute_spectrum, sweep};
pub use modules::stack::{LayerSpec, Stack};
pub use modules::traits::{LayerSource, SpectrumSink};
pub use numerics::matrix::Matrix2;
