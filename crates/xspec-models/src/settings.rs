//! Library-wide settings accessors.
//!
//! These wrap the native library's global state: the abundance and
//! cross-section tables, the chatter level, the cosmology parameters, and
//! the three keyword databases (per-spectrum XFLT values, the model-string
//! database, and the generic keyword database). Every accessor triggers the
//! one-time startup and serializes on the library lock, because the state it
//! touches is shared by every model evaluation in the process.
//!
//! Setter/getter pairs round-trip: the value read back is the value last
//! set, from any handle in the process.

use crate::error::XspecResult;
use crate::model::Xspec;
use crate::{init, sys};

/// The cosmology triple used by models that depend on a cosmological
/// distance (H0 in km/s/Mpc, the deceleration parameter q0, and lambda0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cosmology {
    pub h0: f64,
    pub q0: f64,
    pub lambda0: f64,
}

impl Xspec {
    fn with_library<T>(&self, f: impl FnOnce() -> XspecResult<T>) -> XspecResult<T> {
        let _guard = sys::lock();
        init::ensure_initialized()?;
        f()
    }

    /// The version of the XSPEC model library.
    pub fn version(&self) -> XspecResult<String> {
        self.with_library(sys::version)
    }

    /// The chatter (verbosity) level used by the native routines.
    pub fn chatter(&self) -> XspecResult<i32> {
        self.with_library(|| Ok(sys::chatter()))
    }

    /// Set the chatter level. Higher values make the native routines print
    /// more to the process streams during evaluation.
    pub fn set_chatter(&self, level: i32) -> XspecResult<()> {
        self.with_library(|| {
            sys::set_chatter(level);
            Ok(())
        })
    }

    /// The name of the abundance table in use.
    pub fn abundance(&self) -> XspecResult<String> {
        self.with_library(sys::abundance)
    }

    /// Select the abundance table by name (for example `"angr"` or
    /// `"lodd"`).
    pub fn set_abundance(&self, table: &str) -> XspecResult<()> {
        self.with_library(|| sys::set_abundance(table))
    }

    /// The name of the photoelectric cross-section table in use.
    pub fn cross_section(&self) -> XspecResult<String> {
        self.with_library(sys::cross_section)
    }

    /// Select the cross-section table by name (for example `"vern"`).
    pub fn set_cross_section(&self, table: &str) -> XspecResult<()> {
        self.with_library(|| sys::set_cross_section(table))
    }

    /// The number of elements the abundance tables cover.
    pub fn number_elements(&self) -> XspecResult<usize> {
        self.with_library(|| Ok(sys::number_elements()))
    }

    /// The element name for an atomic number (1-based, so 1 is "H").
    pub fn element_name(&self, z: usize) -> XspecResult<String> {
        self.with_library(|| sys::element_name(z))
    }

    /// The abundance of an element, by atomic number, from the current
    /// abundance table.
    pub fn element_abundance(&self, z: usize) -> XspecResult<f64> {
        self.with_library(|| Ok(sys::element_abundance_by_z(z)))
    }

    /// The abundance of an element, by name, from the current abundance
    /// table. Agrees with [`Xspec::element_abundance`] for the matching
    /// atomic number.
    pub fn element_abundance_by_name(&self, name: &str) -> XspecResult<f64> {
        self.with_library(|| sys::element_abundance_by_name(name))
    }

    /// The current cosmology settings.
    pub fn cosmology(&self) -> XspecResult<Cosmology> {
        self.with_library(|| {
            let (h0, q0, lambda0) = sys::cosmology();
            Ok(Cosmology { h0, q0, lambda0 })
        })
    }

    /// Set the cosmology triple.
    ///
    /// Native startup does not establish a default, so callers relying on
    /// cosmology-sensitive models should set this explicitly.
    pub fn set_cosmology(&self, cosmology: Cosmology) -> XspecResult<()> {
        self.with_library(|| {
            sys::set_cosmology(cosmology.h0, cosmology.q0, cosmology.lambda0);
            Ok(())
        })
    }

    /// Store a per-spectrum XFLT keyword value.
    pub fn set_xflt(&self, spectrum: i32, key: &str, value: f64) -> XspecResult<()> {
        self.with_library(|| sys::set_xflt(spectrum, key, value))
    }

    /// Read back a per-spectrum XFLT keyword value. Unknown keys fail with
    /// [`Error::UnknownKey`](crate::Error::UnknownKey) rather than a
    /// sentinel.
    pub fn xflt(&self, spectrum: i32, key: &str) -> XspecResult<f64> {
        self.with_library(|| sys::xflt(spectrum, key))
    }

    /// Whether a per-spectrum XFLT keyword is set.
    pub fn has_xflt(&self, spectrum: i32, key: &str) -> XspecResult<bool> {
        self.with_library(|| sys::has_xflt(spectrum, key))
    }

    /// The number of XFLT keywords stored for a spectrum.
    pub fn xflt_count(&self, spectrum: i32) -> XspecResult<usize> {
        self.with_library(|| Ok(sys::xflt_count(spectrum)))
    }

    /// Remove every stored XFLT keyword, for all spectra.
    pub fn clear_xflt(&self) -> XspecResult<()> {
        self.with_library(|| {
            sys::clear_xflt();
            Ok(())
        })
    }

    /// Read a value from the model-string database. Unknown keys fail with
    /// [`Error::UnknownKey`](crate::Error::UnknownKey).
    pub fn model_string(&self, key: &str) -> XspecResult<String> {
        self.with_library(|| sys::model_string(key))
    }

    /// Store a value in the model-string database.
    pub fn set_model_string(&self, key: &str, value: &str) -> XspecResult<()> {
        self.with_library(|| sys::set_model_string(key, value))
    }

    /// Clear the model-string database.
    pub fn clear_model_strings(&self) -> XspecResult<()> {
        self.with_library(|| {
            sys::clear_model_strings();
            Ok(())
        })
    }

    /// Read a value from the generic keyword database. Unknown keys fail
    /// with [`Error::UnknownKey`](crate::Error::UnknownKey).
    pub fn db_value(&self, key: &str) -> XspecResult<f64> {
        self.with_library(|| sys::db_value(key))
    }

    /// Store a value in the generic keyword database.
    pub fn set_db_value(&self, key: &str, value: f64) -> XspecResult<()> {
        self.with_library(|| sys::set_db_value(key, value))
    }

    /// Clear the generic keyword database.
    pub fn clear_db(&self) -> XspecResult<()> {
        self.with_library(|| {
            sys::clear_db();
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosmology_equality() {
        let a = Cosmology {
            h0: 70.0,
            q0: 0.0,
            lambda0: 0.73,
        };
        let b = a;
        assert_eq!(a, b);
    }

    #[cfg(not(feature = "native"))]
    #[test]
    fn test_accessors_require_native_feature() {
        use crate::error::Error;

        let env = Xspec::unchecked_for_tests();
        assert!(matches!(env.version(), Err(Error::NativeDisabled)));
        assert!(matches!(env.abundance(), Err(Error::NativeDisabled)));
        assert!(matches!(
            env.xflt(1, "missing"),
            Err(Error::NativeDisabled)
        ));
    }
}
