use serde::{Deserialize, Serialize};

use crate::domain::{TmmError, TmmResult};
use crate::modules::layer::{IndexSample, Layer};
use crate::modules::traits::LayerSource;
use crate::numerics::{NumericTolerance, first_grid_mismatch};

/// Relative agreement required between the wavelength columns of tabulated layers.
const GRID_TOLERANCE: NumericTolerance = NumericTolerance {
    abs_tol: 0.0,
    rel_tol: 1.0e-9,
    relative_floor: 1.0e-30,
};

/// Optical constants of one layer as handed over by a loader.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LayerData {
    Tabulated { samples: Vec<IndexSample> },
    Constant { index: f64, extinction: f64 },
}

/// Validated `(material, thickness, samples)` tuple for one layer.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LayerSpec {
    pub material: String,
    /// Thickness in metres.
    pub thickness: f64,
    pub data: LayerData,
}

impl LayerSpec {
    pub fn tabulated(
        material: impl Into<String>,
        thickness: f64,
        samples: Vec<IndexSample>,
    ) -> Self {
        Self {
            material: material.into(),
            thickness,
            data: LayerData::Tabulated { samples },
        }
    }

    pub fn constant(material: impl Into<String>, thickness: f64, index: f64, extinction: f64) -> Self {
        Self {
            material: material.into(),
            thickness,
            data: LayerData::Constant { index, extinction },
        }
    }

    pub fn into_layer(self) -> TmmResult<Layer> {
        match self.data {
            LayerData::Tabulated { samples } => {
                Ok(Layer::with_samples(self.material, self.thickness, &samples)?)
            }
            LayerData::Constant { index, extinction } => Ok(Layer::with_constant_index(
                self.material,
                self.thickness,
                index,
                extinction,
            )),
        }
    }
}

impl LayerSource for LayerSpec {
    fn layer_spec(&self) -> TmmResult<LayerSpec> {
        Ok(self.clone())
    }
}

/// Ordered layers from the ambient (incidence side) to the substrate.
///
/// The first and last layers are semi-infinite and must have zero thickness.
#[derive(Debug, Clone, PartialEq)]
pub struct Stack {
    layers: Vec<Layer>,
}

impl Stack {
    pub fn new(layers: Vec<Layer>) -> TmmResult<Self> {
        if layers.len() < 2 {
            return Err(TmmError::configuration(
                "CONFIG.STACK_SHAPE",
                format!(
                    "a stack needs an ambient and a substrate layer, got {} layer(s)",
                    layers.len()
                ),
            ));
        }

        let last = layers.len() - 1;
        for position in [0, last] {
            let layer = &layers[position];
            if layer.thickness() != 0.0 {
                return Err(TmmError::configuration(
                    "CONFIG.SEMI_INFINITE",
                    format!(
                        "semi-infinite layer '{}' must have zero thickness, got {} m",
                        layer.material(),
                        layer.thickness()
                    ),
                ));
            }
        }

        if let Some(layer) = layers.iter().find(|layer| !layer.has_index_data()) {
            return Err(TmmError::configuration(
                "CONFIG.LAYER_DATA",
                format!("layer '{}' has no optical constants", layer.material()),
            ));
        }

        Ok(Self { layers })
    }

    /// Ambient, interior layers and substrate in one call.
    pub fn from_parts(ambient: Layer, interior: Vec<Layer>, substrate: Layer) -> TmmResult<Self> {
        let mut layers = Vec::with_capacity(interior.len() + 2);
        layers.push(ambient);
        layers.extend(interior);
        layers.push(substrate);
        Self::new(layers)
    }

    pub fn from_specs(specs: Vec<LayerSpec>) -> TmmResult<Self> {
        let layers = specs
            .into_iter()
            .map(LayerSpec::into_layer)
            .collect::<TmmResult<Vec<_>>>()?;
        Self::new(layers)
    }

    pub fn from_sources(sources: &[&dyn LayerSource]) -> TmmResult<Self> {
        let specs = sources
            .iter()
            .map(|source| source.layer_spec())
            .collect::<TmmResult<Vec<_>>>()?;
        Self::from_specs(specs)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn ambient(&self) -> &Layer {
        &self.layers[0]
    }

    pub fn substrate(&self) -> &Layer {
        &self.layers[self.layers.len() - 1]
    }

    pub fn interior(&self) -> &[Layer] {
        &self.layers[1..self.layers.len() - 1]
    }

    /// Mutable access to interior layers. Semi-infinite layers stay fixed so
    /// the shape invariants cannot be broken after construction.
    pub fn interior_mut(&mut self) -> &mut [Layer] {
        let last = self.layers.len() - 1;
        &mut self.layers[1..last]
    }

    /// Same layers with light entering from the substrate side.
    pub fn reversed(&self) -> Self {
        let mut layers = self.layers.clone();
        layers.reverse();
        Self { layers }
    }

    /// Checks thicknesses and sample grids and returns the shared wavelength grid.
    pub fn validate(&self, allow_zero_thickness: bool) -> TmmResult<Vec<f64>> {
        for layer in self.interior() {
            let thickness = layer.thickness();
            let valid = thickness.is_finite()
                && (thickness > 0.0 || (allow_zero_thickness && thickness == 0.0));
            if !valid {
                return Err(TmmError::domain(
                    "DOMAIN.THICKNESS",
                    format!(
                        "interior layer '{}' must have finite thickness > 0 m, got {}",
                        layer.material(),
                        thickness
                    ),
                ));
            }
            if thickness == 0.0 {
                tracing::warn!(
                    material = layer.material(),
                    "interior layer has zero thickness and only contributes its interfaces"
                );
            }
        }

        self.wavelength_grid()
    }

    /// The wavelength grid shared by every tabulated layer.
    pub fn wavelength_grid(&self) -> TmmResult<Vec<f64>> {
        let mut tabulated = self.layers.iter().filter(|layer| layer.is_tabulated());
        let reference = tabulated.next().ok_or_else(|| {
            TmmError::configuration(
                "CONFIG.WAVELENGTH_GRID",
                "no layer in the stack supplies tabulated wavelength samples",
            )
        })?;

        for layer in tabulated {
            if layer.sample_count() != reference.sample_count() {
                return Err(TmmError::configuration(
                    "CONFIG.SAMPLE_COUNT",
                    format!(
                        "layer '{}' has {} samples but layer '{}' has {}",
                        layer.material(),
                        layer.sample_count(),
                        reference.material(),
                        reference.sample_count()
                    ),
                ));
            }

            if let Some(sample) =
                first_grid_mismatch(reference.wavelengths(), layer.wavelengths(), GRID_TOLERANCE)
            {
                return Err(TmmError::configuration(
                    "CONFIG.WAVELENGTH_GRID",
                    format!(
                        "layer '{}' wavelength {} m differs from layer '{}' wavelength {} m at sample {}",
                        layer.material(),
                        layer.wavelengths()[sample],
                        reference.material(),
                        reference.wavelengths()[sample],
                        sample
                    ),
                ));
            }
        }

        let grid = reference.wavelengths().to_vec();
        if let Some((sample, wavelength)) = grid
            .iter()
            .copied()
            .enumerate()
            .find(|(_, wavelength)| *wavelength <= 0.0)
        {
            return Err(TmmError::domain(
                "DOMAIN.WAVELENGTH",
                format!("wavelength sample {sample} must be > 0 m, got {wavelength}"),
            ));
        }

        Ok(grid)
    }
}
