pub mod angle;
pub mod assembler;
pub mod coefficients;
pub mod composer;
pub mod layer;
pub mod light;
pub mod serialization;
pub mod spectrum;
pub mod stack;
pub mod traits;

pub use spectrum::{DriverPhase, Spectrum, SpectrumDriver, compute_spectrum, sweep};
pub use traits::{LayerSource, SpectrumSink};
