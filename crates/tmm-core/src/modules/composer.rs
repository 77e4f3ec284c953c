use crate::domain::{TmmError, TmmResult};
use crate::numerics::Matrix2;

/// Left-to-right product of the chain, ambient first.
pub fn compose(chain: &[Matrix2]) -> TmmResult<Matrix2> {
    let (first, rest) = match chain {
        [first, rest @ ..] if !rest.is_empty() => (first, rest),
        _ => {
            return Err(TmmError::configuration(
                "CONFIG.MATRIX_CHAIN",
                format!(
                    "a transfer chain needs at least 2 matrices, got {}",
                    chain.len()
                ),
            ));
        }
    };

    let mut product = *first;
    for matrix in rest {
        product = &product * matrix;
    }
    Ok(product)
}
