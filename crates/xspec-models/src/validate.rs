//! Input validation for model evaluation.
//!
//! Every check here runs before any native call: a model routine is never
//! entered with inputs that violate the shape contracts below. Rust slices
//! are one-dimensional and contiguous by construction, which is why there is
//! no dimensionality check to make.
//!
//! What is deliberately *not* checked: parameter values against the declared
//! soft/hard limits. The native routines do not all defend against
//! out-of-range values (table models in particular can bring the process
//! down), and this layer mirrors the library contract rather than inventing
//! a stricter one.

use crate::error::{Error, XspecResult};

/// The minimum number of bin edges a grid must supply (two bins).
pub(crate) const MIN_GRID_EDGES: usize = 3;

/// Check the parameter sequence against the model's declared count.
pub(crate) fn check_par_count(expected: usize, got: usize) -> XspecResult<()> {
    if expected == got {
        return Ok(());
    }
    Err(Error::ParameterCount { expected, got })
}

/// Check the energy grid defines at least two bins.
pub(crate) fn check_grid(edges: usize) -> XspecResult<()> {
    if edges >= MIN_GRID_EDGES {
        return Ok(());
    }
    Err(Error::GridTooShort { got: edges })
}

/// Check a caller-supplied output (or convolution input) buffer matches the
/// grid: its length must be exactly one less than the number of edges.
pub(crate) fn check_output_len(edges: usize, model: usize) -> XspecResult<()> {
    if edges == model + 1 {
        return Ok(());
    }
    Err(Error::GridMismatch {
        energies: edges,
        model,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_par_count_match() {
        assert!(check_par_count(3, 3).is_ok());
        assert!(check_par_count(0, 0).is_ok());
    }

    #[test]
    fn test_par_count_mismatch() {
        let err = check_par_count(3, 2).unwrap_err();
        assert!(matches!(
            err,
            Error::ParameterCount {
                expected: 3,
                got: 2
            }
        ));
    }

    #[test]
    fn test_grid_minimum() {
        assert!(check_grid(3).is_ok());
        assert!(check_grid(1000).is_ok());
        assert!(matches!(
            check_grid(2).unwrap_err(),
            Error::GridTooShort { got: 2 }
        ));
        assert!(check_grid(0).is_err());
    }

    #[test]
    fn test_output_len() {
        assert!(check_output_len(5, 4).is_ok());
        assert!(check_output_len(3, 2).is_ok());

        // Both too short and too long are rejected.
        assert!(check_output_len(5, 3).is_err());
        assert!(check_output_len(5, 5).is_err());
    }
}
