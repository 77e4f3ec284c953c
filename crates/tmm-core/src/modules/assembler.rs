//! Builds the ordered matrix chain for one wavelength sample.
//!
//! The chain is `[D0^-1] + [D_j, P_j, D_j^-1] for each interior layer + [D_s]`.

use num_complex::Complex64;

use crate::common::constants::PhysicalConstants;
use crate::domain::{Polarization, TmmError, TmmResult};
use crate::modules::angle::LayerAngle;
use crate::modules::layer::Layer;
use crate::modules::light::OpticalState;
use crate::modules::stack::Stack;
use crate::numerics::{Matrix2, MatrixError};

impl From<MatrixError> for TmmError {
    fn from(error: MatrixError) -> Self {
        let placeholder = match error {
            MatrixError::Singular { .. } => "NUMERIC.SINGULAR_MATRIX",
            MatrixError::NonFinite { .. } => "NUMERIC.NON_FINITE_MATRIX",
        };
        TmmError::numerical(placeholder, error.to_string())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AssemblyInput<'a> {
    pub stack: &'a Stack,
    pub sample: usize,
    pub light: &'a OpticalState,
    pub polarization: Polarization,
    /// Propagation angle in the ambient medium.
    pub incidence: LayerAngle,
    pub constants: &'a PhysicalConstants,
}

/// Interface and phase matrices contributed by one interior layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerMatrices {
    pub dynamical: Matrix2,
    pub propagation: Matrix2,
    pub dynamical_inverse: Matrix2,
}

pub fn assemble_transfer_chain(input: AssemblyInput<'_>) -> TmmResult<Vec<Matrix2>> {
    let stack = input.stack;
    let interior = stack.interior();
    let mut chain = Vec::with_capacity(3 * interior.len() + 2);

    let ambient = stack.ambient();
    let n_ambient = ambient.complex_index_at(input.sample)?;
    let ambient_dynamical =
        Layer::dynamical_matrix(n_ambient, input.incidence).select(input.polarization);
    chain.push(invert_for(ambient, ambient_dynamical)?);

    for layer in interior {
        let matrices = layer_matrices(input, layer, n_ambient)?;
        chain.extend([
            matrices.dynamical,
            matrices.propagation,
            matrices.dynamical_inverse,
        ]);
    }

    let substrate = stack.substrate();
    let n_substrate = substrate.complex_index_at(input.sample)?;
    let substrate_angle = LayerAngle::refracted(n_ambient, input.incidence, n_substrate);
    chain.push(Layer::dynamical_matrix(n_substrate, substrate_angle).select(input.polarization));

    Ok(chain)
}

pub fn layer_matrices(
    input: AssemblyInput<'_>,
    layer: &Layer,
    n_ambient: Complex64,
) -> TmmResult<LayerMatrices> {
    let n = layer.complex_index_at(input.sample)?;
    let angle = LayerAngle::refracted(n_ambient, input.incidence, n);
    let (k_x, _) = Layer::wavenumber(n, input.light.angular_frequency(), angle, input.constants);
    let dynamical = Layer::dynamical_matrix(n, angle).select(input.polarization);

    Ok(LayerMatrices {
        dynamical,
        propagation: layer.propagation_matrix(k_x),
        dynamical_inverse: invert_for(layer, dynamical)?,
    })
}

fn invert_for(layer: &Layer, dynamical: Matrix2) -> TmmResult<Matrix2> {
    dynamical.inverse().map_err(|source| {
        let error = TmmError::from(source);
        TmmError::numerical(
            error.placeholder(),
            format!(
                "dynamical matrix of layer '{}' cannot be inverted: {}",
                layer.material(),
                error.message()
            ),
        )
    })
}
