use crate::domain::TmmResult;
use crate::modules::stack::LayerSpec;

/// Anything that can hand over one validated layer description, such as a
/// tabulated-data loader or a literal device description.
pub trait LayerSource {
    fn layer_spec(&self) -> TmmResult<LayerSpec>;
}

/// Consumer of computed `(wavelength, R, T)` columns, e.g. a plotting or
/// reporting collaborator.
pub trait SpectrumSink {
    type Error;

    fn consume(
        &mut self,
        wavelengths: &[f64],
        reflectance: &[f64],
        transmittance: &[f64],
    ) -> Result<(), Self::Error>;
}
