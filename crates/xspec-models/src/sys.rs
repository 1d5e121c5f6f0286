//! FFI bindings for the XSPEC utility shim.
//!
//! The XSPEC settings interface (`FunctionUtility`) and the startup routine
//! (`FNINIT`) are C++ with C++ linkage, so they cannot be declared here
//! directly. A small shim (`shim/xsshim.cxx`, built by `build.rs` via the
//! `cc` crate when the `native` feature is enabled) re-exports the pieces we
//! need as `extern "C"` functions with an `xs_` prefix and a `_c` suffix.
//!
//! Model routines themselves already have C-compatible linkage and are
//! declared by the generated registration module, not here.
//!
//! # Safety
//!
//! All FFI functions are wrapped in safe Rust APIs that handle:
//! - NUL-checked string conversion in both directions
//! - buffer sizing for string-returning accessors
//! - error conversion to [`Error`]
//!
//! The native library keeps process-wide mutable state, so every safe
//! wrapper expects the caller to hold the [`lock`] guard; the public API
//! types enforce this.

use std::ffi::CString;
#[cfg(feature = "native")]
use std::os::raw::{c_char, c_double, c_float, c_int};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{Error, XspecResult};

// =============================================================================
// Calling-convention signatures
// =============================================================================

// These mirror the native function-pointer typedefs: every model routine in
// the library matches exactly one of them, fixed at registration time.

/// FORTRAN single-precision convention: positional arguments only.
pub(crate) type Xsf77Call = unsafe extern "C" fn(
    energy: *const f32,
    n_flux: i32,
    params: *const f32,
    spectrum_number: i32,
    flux: *mut f32,
    flux_error: *mut f32,
);

/// FORTRAN double-precision convention: positional arguments only.
pub(crate) type XsF77Call = unsafe extern "C" fn(
    energy: *const f64,
    n_flux: i32,
    params: *const f64,
    spectrum_number: i32,
    flux: *mut f64,
    flux_error: *mut f64,
);

/// C convention: double precision plus an opaque per-call init string.
pub(crate) type XsccCall = unsafe extern "C" fn(
    energy: *const f64,
    n_flux: i32,
    params: *const f64,
    spectrum_number: i32,
    flux: *mut f64,
    flux_error: *mut f64,
    init_str: *const std::os::raw::c_char,
);

// =============================================================================
// Process-wide library lock
// =============================================================================

static LIB_LOCK: Mutex<()> = Mutex::new(());

/// Serialize access to the native library.
///
/// Every model evaluation implicitly reads the library's global settings
/// (abundance table, cross sections, cosmology, keyword databases), and the
/// library has no internal locking, so all entry points in this crate hold
/// this mutex for the duration of the native call.
pub(crate) fn lock() -> MutexGuard<'static, ()> {
    LIB_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// FFI declarations (shim)
// =============================================================================

#[cfg(feature = "native")]
extern "C" {
    // Startup
    fn xs_fninit_c(errbuf: *mut c_char, errlen: c_int) -> c_int;

    // Library version
    fn xs_version_c(buf: *mut c_char, buflen: c_int) -> c_int;

    // Chatter level
    fn xs_chatter_get_c() -> c_int;
    fn xs_chatter_set_c(level: c_int);

    // Abundance / cross-section tables
    fn xs_abund_get_c(buf: *mut c_char, buflen: c_int) -> c_int;
    fn xs_abund_set_c(table: *const c_char) -> c_int;
    fn xs_xsect_get_c(buf: *mut c_char, buflen: c_int) -> c_int;
    fn xs_xsect_set_c(table: *const c_char) -> c_int;

    // Elements
    fn xs_number_elements_c() -> c_int;
    fn xs_element_name_c(z: c_int, buf: *mut c_char, buflen: c_int) -> c_int;
    fn xs_element_abundance_name_c(name: *const c_char) -> c_float;
    fn xs_element_abundance_z_c(z: c_int) -> c_float;

    // Cosmology
    fn xs_cosmo_h0_c() -> c_float;
    fn xs_cosmo_q0_c() -> c_float;
    fn xs_cosmo_lambda0_c() -> c_float;
    fn xs_cosmo_set_c(h0: c_float, q0: c_float, lambda0: c_float);

    // Per-spectrum XFLT keywords
    fn xs_xflt_set_c(spectrum: c_int, key: *const c_char, value: c_double);
    fn xs_xflt_get_c(spectrum: c_int, key: *const c_char, value: *mut c_double) -> c_int;
    fn xs_xflt_in_c(spectrum: c_int, key: *const c_char) -> c_int;
    fn xs_xflt_count_c(spectrum: c_int) -> c_int;
    fn xs_xflt_clear_c();

    // Model-string database
    fn xs_mstr_get_c(key: *const c_char, buf: *mut c_char, buflen: c_int) -> c_int;
    fn xs_mstr_set_c(key: *const c_char, value: *const c_char);
    fn xs_mstr_clear_c();

    // Generic keyword database
    fn xs_db_get_c(key: *const c_char, value: *mut c_double) -> c_int;
    fn xs_db_set_c(key: *const c_char, value: c_double);
    fn xs_db_clear_c();

    // Tabulated-model interpolation
    fn xs_tabint_c(
        ear: *const c_float,
        ne: c_int,
        param: *const c_float,
        npar: c_int,
        filenm: *const c_char,
        spectrum: c_int,
        tabtyp: *const c_char,
        photar: *mut c_float,
        photer: *mut c_float,
    ) -> c_int;
}

// =============================================================================
// Safe wrappers
// =============================================================================

pub(crate) fn to_cstring(what: &str, value: &str) -> XspecResult<CString> {
    CString::new(value)
        .map_err(|_| Error::InvalidPath(format!("{what} contains an interior NUL byte")))
}

/// Fetch a string through a `(buf, buflen) -> needed` shim accessor.
///
/// The shim returns the length it needs (excluding the terminator); if the
/// first buffer was too small we resize and retry once.
#[cfg(feature = "native")]
fn get_string(f: unsafe extern "C" fn(*mut c_char, c_int) -> c_int) -> XspecResult<String> {
    let mut buf = vec![0u8; 128];
    let mut len = unsafe { f(buf.as_mut_ptr() as *mut c_char, buf.len() as c_int) };
    if len < 0 {
        return Err(Error::Native("string accessor failed".to_string()));
    }
    if len as usize >= buf.len() {
        buf.resize(len as usize + 1, 0);
        len = unsafe { f(buf.as_mut_ptr() as *mut c_char, buf.len() as c_int) };
        if len < 0 {
            return Err(Error::Native("string accessor failed".to_string()));
        }
    }
    let len = (len as usize).min(buf.len());
    Ok(String::from_utf8_lossy(&buf[..len]).into_owned())
}

/// Run the native startup routine, returning any captured failure text.
#[cfg(feature = "native")]
pub(crate) fn fninit() -> XspecResult<()> {
    let mut errbuf = vec![0u8; 1024];
    let rc = unsafe { xs_fninit_c(errbuf.as_mut_ptr() as *mut c_char, errbuf.len() as c_int) };
    if rc == 0 {
        return Ok(());
    }
    let end = errbuf.iter().position(|&b| b == 0).unwrap_or(errbuf.len());
    Err(Error::Native(
        String::from_utf8_lossy(&errbuf[..end]).into_owned(),
    ))
}

/// The version of the XSPEC model library.
#[cfg(feature = "native")]
pub(crate) fn version() -> XspecResult<String> {
    get_string(xs_version_c)
}

#[cfg(feature = "native")]
pub(crate) fn chatter() -> i32 {
    unsafe { xs_chatter_get_c() as i32 }
}

#[cfg(feature = "native")]
pub(crate) fn set_chatter(level: i32) {
    unsafe { xs_chatter_set_c(level as c_int) }
}

#[cfg(feature = "native")]
pub(crate) fn abundance() -> XspecResult<String> {
    get_string(xs_abund_get_c)
}

#[cfg(feature = "native")]
pub(crate) fn set_abundance(table: &str) -> XspecResult<()> {
    let c_table = to_cstring("abundance table", table)?;
    let rc = unsafe { xs_abund_set_c(c_table.as_ptr()) };
    if rc != 0 {
        return Err(Error::Native(format!(
            "unable to set the abundance table to '{table}'"
        )));
    }
    Ok(())
}

#[cfg(feature = "native")]
pub(crate) fn cross_section() -> XspecResult<String> {
    get_string(xs_xsect_get_c)
}

#[cfg(feature = "native")]
pub(crate) fn set_cross_section(table: &str) -> XspecResult<()> {
    let c_table = to_cstring("cross-section table", table)?;
    let rc = unsafe { xs_xsect_set_c(c_table.as_ptr()) };
    if rc != 0 {
        return Err(Error::Native(format!(
            "unable to set the cross-section table to '{table}'"
        )));
    }
    Ok(())
}

#[cfg(feature = "native")]
pub(crate) fn number_elements() -> usize {
    unsafe { xs_number_elements_c() as usize }
}

#[cfg(feature = "native")]
pub(crate) fn element_name(z: usize) -> XspecResult<String> {
    let mut buf = vec![0u8; 8];
    let len =
        unsafe { xs_element_name_c(z as c_int, buf.as_mut_ptr() as *mut c_char, buf.len() as c_int) };
    if len < 0 {
        return Err(Error::Native(format!("no element with atomic number {z}")));
    }
    let len = (len as usize).min(buf.len());
    Ok(String::from_utf8_lossy(&buf[..len]).into_owned())
}

#[cfg(feature = "native")]
pub(crate) fn element_abundance_by_name(name: &str) -> XspecResult<f64> {
    let c_name = to_cstring("element name", name)?;
    Ok(unsafe { xs_element_abundance_name_c(c_name.as_ptr()) } as f64)
}

#[cfg(feature = "native")]
pub(crate) fn element_abundance_by_z(z: usize) -> f64 {
    unsafe { xs_element_abundance_z_c(z as c_int) as f64 }
}

#[cfg(feature = "native")]
pub(crate) fn cosmology() -> (f64, f64, f64) {
    unsafe {
        (
            xs_cosmo_h0_c() as f64,
            xs_cosmo_q0_c() as f64,
            xs_cosmo_lambda0_c() as f64,
        )
    }
}

#[cfg(feature = "native")]
pub(crate) fn set_cosmology(h0: f64, q0: f64, lambda0: f64) {
    unsafe { xs_cosmo_set_c(h0 as c_float, q0 as c_float, lambda0 as c_float) }
}

#[cfg(feature = "native")]
pub(crate) fn set_xflt(spectrum: i32, key: &str, value: f64) -> XspecResult<()> {
    let c_key = to_cstring("XFLT key", key)?;
    unsafe { xs_xflt_set_c(spectrum as c_int, c_key.as_ptr(), value) };
    Ok(())
}

#[cfg(feature = "native")]
pub(crate) fn xflt(spectrum: i32, key: &str) -> XspecResult<f64> {
    let c_key = to_cstring("XFLT key", key)?;
    let mut value: c_double = 0.0;
    let found = unsafe { xs_xflt_get_c(spectrum as c_int, c_key.as_ptr(), &mut value) };
    if found == 0 {
        return Err(Error::unknown_key("XFLT", key));
    }
    Ok(value)
}

#[cfg(feature = "native")]
pub(crate) fn has_xflt(spectrum: i32, key: &str) -> XspecResult<bool> {
    let c_key = to_cstring("XFLT key", key)?;
    Ok(unsafe { xs_xflt_in_c(spectrum as c_int, c_key.as_ptr()) } != 0)
}

#[cfg(feature = "native")]
pub(crate) fn xflt_count(spectrum: i32) -> usize {
    unsafe { xs_xflt_count_c(spectrum as c_int) as usize }
}

#[cfg(feature = "native")]
pub(crate) fn clear_xflt() {
    unsafe { xs_xflt_clear_c() }
}

#[cfg(feature = "native")]
pub(crate) fn model_string(key: &str) -> XspecResult<String> {
    let c_key = to_cstring("model-string key", key)?;
    let mut buf = vec![0u8; 128];
    let mut len =
        unsafe { xs_mstr_get_c(c_key.as_ptr(), buf.as_mut_ptr() as *mut c_char, buf.len() as c_int) };
    if len < 0 {
        return Err(Error::unknown_key("model string", key));
    }
    if len as usize >= buf.len() {
        buf.resize(len as usize + 1, 0);
        len = unsafe {
            xs_mstr_get_c(c_key.as_ptr(), buf.as_mut_ptr() as *mut c_char, buf.len() as c_int)
        };
        if len < 0 {
            return Err(Error::unknown_key("model string", key));
        }
    }
    let len = (len as usize).min(buf.len());
    Ok(String::from_utf8_lossy(&buf[..len]).into_owned())
}

#[cfg(feature = "native")]
pub(crate) fn set_model_string(key: &str, value: &str) -> XspecResult<()> {
    let c_key = to_cstring("model-string key", key)?;
    let c_value = to_cstring("model-string value", value)?;
    unsafe { xs_mstr_set_c(c_key.as_ptr(), c_value.as_ptr()) };
    Ok(())
}

#[cfg(feature = "native")]
pub(crate) fn clear_model_strings() {
    unsafe { xs_mstr_clear_c() }
}

#[cfg(feature = "native")]
pub(crate) fn db_value(key: &str) -> XspecResult<f64> {
    let c_key = to_cstring("keyword", key)?;
    let mut value: c_double = 0.0;
    let found = unsafe { xs_db_get_c(c_key.as_ptr(), &mut value) };
    if found == 0 {
        return Err(Error::unknown_key("keyword", key));
    }
    Ok(value)
}

#[cfg(feature = "native")]
pub(crate) fn set_db_value(key: &str, value: f64) -> XspecResult<()> {
    let c_key = to_cstring("keyword", key)?;
    unsafe { xs_db_set_c(c_key.as_ptr(), value) };
    Ok(())
}

#[cfg(feature = "native")]
pub(crate) fn clear_db() {
    unsafe { xs_db_clear_c() }
}

/// Evaluate a tabulated model file over a single-precision grid.
#[cfg(feature = "native")]
pub(crate) fn tabint(
    path: &str,
    table_type: &str,
    pars: &[f32],
    energies: &[f32],
    spectrum: i32,
    flux: &mut [f32],
    flux_error: &mut [f32],
) -> XspecResult<()> {
    debug_assert_eq!(flux.len(), energies.len() - 1);
    debug_assert_eq!(flux.len(), flux_error.len());

    let c_path = to_cstring("table-model path", path)?;
    let c_type = to_cstring("table type", table_type)?;

    log::debug!(
        target: "xspec_models",
        "tabint: file={path} type={table_type} npar={} bins={}",
        pars.len(),
        flux.len()
    );

    let rc = unsafe {
        xs_tabint_c(
            energies.as_ptr(),
            flux.len() as c_int,
            pars.as_ptr(),
            pars.len() as c_int,
            c_path.as_ptr(),
            spectrum as c_int,
            c_type.as_ptr(),
            flux.as_mut_ptr(),
            flux_error.as_mut_ptr(),
        )
    };
    if rc != 0 {
        return Err(Error::Native(format!(
            "table-model evaluation failed for '{path}'"
        )));
    }
    Ok(())
}

// =============================================================================
// Stub implementations when the native feature is disabled
// =============================================================================

#[cfg(not(feature = "native"))]
mod stubs {
    use super::XspecResult;
    use crate::error::Error;

    pub(crate) fn version() -> XspecResult<String> {
        Err(Error::NativeDisabled)
    }

    pub(crate) fn chatter() -> i32 {
        0
    }

    pub(crate) fn set_chatter(_level: i32) {}

    pub(crate) fn abundance() -> XspecResult<String> {
        Err(Error::NativeDisabled)
    }

    pub(crate) fn set_abundance(_table: &str) -> XspecResult<()> {
        Err(Error::NativeDisabled)
    }

    pub(crate) fn cross_section() -> XspecResult<String> {
        Err(Error::NativeDisabled)
    }

    pub(crate) fn set_cross_section(_table: &str) -> XspecResult<()> {
        Err(Error::NativeDisabled)
    }

    pub(crate) fn number_elements() -> usize {
        0
    }

    pub(crate) fn element_name(_z: usize) -> XspecResult<String> {
        Err(Error::NativeDisabled)
    }

    pub(crate) fn element_abundance_by_name(_name: &str) -> XspecResult<f64> {
        Err(Error::NativeDisabled)
    }

    pub(crate) fn element_abundance_by_z(_z: usize) -> f64 {
        0.0
    }

    pub(crate) fn cosmology() -> (f64, f64, f64) {
        (0.0, 0.0, 0.0)
    }

    pub(crate) fn set_cosmology(_h0: f64, _q0: f64, _lambda0: f64) {}

    pub(crate) fn set_xflt(_spectrum: i32, _key: &str, _value: f64) -> XspecResult<()> {
        Err(Error::NativeDisabled)
    }

    pub(crate) fn xflt(_spectrum: i32, _key: &str) -> XspecResult<f64> {
        Err(Error::NativeDisabled)
    }

    pub(crate) fn has_xflt(_spectrum: i32, _key: &str) -> XspecResult<bool> {
        Err(Error::NativeDisabled)
    }

    pub(crate) fn xflt_count(_spectrum: i32) -> usize {
        0
    }

    pub(crate) fn clear_xflt() {}

    pub(crate) fn model_string(_key: &str) -> XspecResult<String> {
        Err(Error::NativeDisabled)
    }

    pub(crate) fn set_model_string(_key: &str, _value: &str) -> XspecResult<()> {
        Err(Error::NativeDisabled)
    }

    pub(crate) fn clear_model_strings() {}

    pub(crate) fn db_value(_key: &str) -> XspecResult<f64> {
        Err(Error::NativeDisabled)
    }

    pub(crate) fn set_db_value(_key: &str, _value: f64) -> XspecResult<()> {
        Err(Error::NativeDisabled)
    }

    pub(crate) fn clear_db() {}

    pub(crate) fn tabint(
        _path: &str,
        _table_type: &str,
        _pars: &[f32],
        _energies: &[f32],
        _spectrum: i32,
        _flux: &mut [f32],
        _flux_error: &mut [f32],
    ) -> XspecResult<()> {
        Err(Error::NativeDisabled)
    }
}

#[cfg(not(feature = "native"))]
pub(crate) use stubs::*;
