//! Tabulated-model evaluation.
//!
//! Table models take their shape from an external FITS file rather than a
//! compiled routine: the file is loaded and interpolated at call time by the
//! native library's single-precision table interface. Because the parameter
//! definitions live inside the file, this layer cannot validate the
//! parameter count up front the way it does for compiled models.
//!
//! The native interpolator is known to abort the whole process for some
//! malformed inputs, notably parameter values outside the table's hard
//! limits. That behavior belongs to the library, not this crate; callers
//! evaluating untrusted parameter values should clamp them to the table's
//! declared ranges first.

use crate::error::XspecResult;
use crate::model::Xspec;
use crate::validate;
use crate::{init, sys};

/// How the interpolated table combines with a model expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableType {
    /// An additive table (`atable`).
    Add,
    /// A multiplicative table (`mtable`).
    Mul,
    /// A multiplicative table applied as an exponential (`etable`).
    Exp,
}

impl TableType {
    /// The tag the native interface expects.
    fn as_str(self) -> &'static str {
        match self {
            TableType::Add => "add",
            TableType::Mul => "mul",
            TableType::Exp => "exp",
        }
    }
}

impl Xspec {
    /// Evaluate a table-model file over an energy grid, allocating the
    /// result. A grid of N+1 edges produces N flux values.
    pub fn table_model(
        &self,
        path: &str,
        table_type: TableType,
        pars: &[f64],
        energies: &[f64],
        spectrum: i32,
    ) -> XspecResult<Vec<f64>> {
        validate::check_grid(energies.len())?;
        let mut flux = vec![0.0; energies.len() - 1];
        self.tabint(path, table_type, pars, energies, spectrum, &mut flux)?;
        Ok(flux)
    }

    /// Evaluate a table-model file into a caller-supplied buffer, which must
    /// hold exactly one element fewer than `energies`. The same buffer is
    /// returned with its contents overwritten.
    pub fn table_model_into<'a>(
        &self,
        path: &str,
        table_type: TableType,
        pars: &[f64],
        energies: &[f64],
        out: &'a mut [f64],
        spectrum: i32,
    ) -> XspecResult<&'a mut [f64]> {
        validate::check_grid(energies.len())?;
        validate::check_output_len(energies.len(), out.len())?;
        self.tabint(path, table_type, pars, energies, spectrum, out)?;
        Ok(out)
    }

    /// Narrow to the single-precision table interface, call it, and widen
    /// the result back into `flux`.
    fn tabint(
        &self,
        path: &str,
        table_type: TableType,
        pars: &[f64],
        energies: &[f64],
        spectrum: i32,
        flux: &mut [f64],
    ) -> XspecResult<()> {
        let _guard = sys::lock();
        init::ensure_initialized()?;

        let pars32: Vec<f32> = pars.iter().map(|&p| p as f32).collect();
        let energies32: Vec<f32> = energies.iter().map(|&e| e as f32).collect();
        let mut flux32 = vec![0.0f32; flux.len()];
        let mut errors = vec![0.0f32; flux.len()];

        sys::tabint(
            path,
            table_type.as_str(),
            &pars32,
            &energies32,
            spectrum,
            &mut flux32,
            &mut errors,
        )?;

        for (wide, narrow) in flux.iter_mut().zip(&flux32) {
            *wide = f64::from(*narrow);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_table_type_tags() {
        assert_eq!(TableType::Add.as_str(), "add");
        assert_eq!(TableType::Mul.as_str(), "mul");
        assert_eq!(TableType::Exp.as_str(), "exp");
    }

    #[test]
    fn test_table_model_grid_is_validated_first() {
        let env = Xspec::unchecked_for_tests();
        let err = env
            .table_model("mod.fits", TableType::Add, &[1.0], &[0.1, 0.2], 1)
            .unwrap_err();
        assert!(matches!(err, Error::GridTooShort { got: 2 }));
    }

    #[test]
    fn test_table_model_into_length_is_validated() {
        let env = Xspec::unchecked_for_tests();
        let mut out = [0.0; 2];
        let err = env
            .table_model_into(
                "mod.fits",
                TableType::Mul,
                &[1.0],
                &[0.1, 0.2, 0.3, 0.4],
                &mut out,
                1,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            Error::GridMismatch {
                energies: 4,
                model: 2
            }
        ));
    }
}
