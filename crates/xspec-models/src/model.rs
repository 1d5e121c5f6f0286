//! Model evaluation: the [`Xspec`] handle and per-model entry points.
//!
//! [`Xspec::new`] performs the one-time native startup and hands back the
//! context object every other operation goes through. Model evaluation is
//! reached via [`Xspec::model`], which resolves a catalog record into a
//! [`Model`] carrying the convention-tagged native function pointer.
//!
//! # Output policy
//!
//! Additive and multiplicative models offer two entry points:
//! [`Model::evaluate`] allocates a fresh flux buffer, and
//! [`Model::evaluate_into`] writes into a caller-supplied one. Convolution
//! models offer only [`Model::convolve`], which overwrites the supplied model
//! flux in place; they transform an existing spectrum rather than producing
//! one from parameters alone, so there is no allocate-fresh mode.
//!
//! # Thread safety
//!
//! The native library carries process-wide mutable state, so every call here
//! serializes on one internal mutex. Evaluations from multiple threads are
//! safe but never concurrent.

use ndarray::{Array1, ArrayView1};

use crate::error::{Error, XspecResult};
use crate::registry::{self, XspecModel};
use crate::validate;
use crate::{init, sys};

/// Handle to the initialized XSPEC model library.
///
/// Creating one runs the native startup (exactly once per process); the
/// settings accessors and model evaluation all hang off it. The underlying
/// library state remains process-global: two handles observe the same
/// abundance table, chatter level, and keyword databases.
#[derive(Debug)]
pub struct Xspec {
    _priv: (),
}

impl Xspec {
    /// Initialize the native library and return a handle to it.
    ///
    /// Fails with [`Error::HeadasNotSet`] when the `HEADAS` environment
    /// variable is missing, or [`Error::InitFailed`] when native startup
    /// reports a problem. The startup banner is captured and logged at debug
    /// level instead of being printed.
    pub fn new() -> XspecResult<Self> {
        let _guard = sys::lock();
        init::ensure_initialized()?;
        Ok(Xspec { _priv: () })
    }

    /// Look up a model by name (case-insensitive) for evaluation.
    pub fn model(&self, name: &str) -> XspecResult<Model<'_>> {
        let desc = registry::info(name)?;
        Ok(Model { _env: self, desc })
    }

    #[cfg(test)]
    pub(crate) fn unchecked_for_tests() -> Self {
        Xspec { _priv: () }
    }
}

/// Per-call options shared by every model entry point.
///
/// The defaults match the native interface: spectrum number 1 and an empty
/// initialization string.
#[derive(Debug, Clone)]
pub struct EvalOptions {
    /// Context tag selecting per-spectrum state (XFLT keywords) inside the
    /// native library. Passed through, never interpreted here.
    pub spectrum: i32,
    /// Free-text initialization string handed opaquely to C and C++ style
    /// routines. Ignored by FORTRAN-convention models, whose interface has
    /// no such argument.
    pub init_string: String,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            spectrum: 1,
            init_string: String::new(),
        }
    }
}

impl EvalOptions {
    /// Set the spectrum number.
    pub fn with_spectrum(mut self, spectrum: i32) -> Self {
        self.spectrum = spectrum;
        self
    }

    /// Set the per-call initialization string.
    pub fn with_init_string(mut self, init: impl Into<String>) -> Self {
        self.init_string = init.into();
        self
    }
}

/// A catalog model bound to an initialized library handle.
pub struct Model<'a> {
    _env: &'a Xspec,
    desc: &'static XspecModel,
}

impl Model<'_> {
    /// The catalog record backing this model.
    pub fn descriptor(&self) -> &'static XspecModel {
        self.desc
    }

    /// The model name.
    pub fn name(&self) -> &'static str {
        self.desc.name
    }

    /// The default parameter vector from the catalog.
    pub fn default_parameters(&self) -> Vec<f64> {
        self.desc.default_parameters()
    }

    /// Evaluate the model over an energy grid, allocating the result.
    ///
    /// A grid of N+1 bin edges produces N flux values. Only additive and
    /// multiplicative models support this entry point; convolution models
    /// must go through [`Model::convolve`].
    pub fn evaluate(
        &self,
        pars: &[f64],
        energies: &[f64],
        opts: &EvalOptions,
    ) -> XspecResult<Vec<f64>> {
        self.check_not_convolution()?;
        validate::check_par_count(self.desc.num_pars(), pars.len())?;
        validate::check_grid(energies.len())?;

        let mut flux = vec![0.0; energies.len() - 1];
        self.dispatch(pars, energies, &mut flux, opts)?;
        Ok(flux)
    }

    /// Evaluate the model into a caller-supplied buffer.
    ///
    /// `out` must hold exactly one element fewer than `energies`; its
    /// contents are overwritten and the same buffer is returned.
    pub fn evaluate_into<'b>(
        &self,
        pars: &[f64],
        energies: &[f64],
        out: &'b mut [f64],
        opts: &EvalOptions,
    ) -> XspecResult<&'b mut [f64]> {
        self.check_not_convolution()?;
        validate::check_par_count(self.desc.num_pars(), pars.len())?;
        validate::check_grid(energies.len())?;
        validate::check_output_len(energies.len(), out.len())?;

        self.dispatch(pars, energies, out, opts)?;
        Ok(out)
    }

    /// Convolve an existing model flux in place.
    ///
    /// `model_flux` is both input and output: it must hold one element fewer
    /// than `energies`, is overwritten with the convolved result, and the
    /// same buffer is returned. Only convolution models support this.
    pub fn convolve<'b>(
        &self,
        pars: &[f64],
        energies: &[f64],
        model_flux: &'b mut [f64],
        opts: &EvalOptions,
    ) -> XspecResult<&'b mut [f64]> {
        if !self.desc.is_convolution() {
            return Err(Error::NotConvolution(self.desc.name.to_string()));
        }
        validate::check_par_count(self.desc.num_pars(), pars.len())?;
        validate::check_grid(energies.len())?;
        validate::check_output_len(energies.len(), model_flux.len())?;

        self.dispatch(pars, energies, model_flux, opts)?;
        Ok(model_flux)
    }

    /// Evaluate via the array-object convention into a caller-supplied
    /// array, avoiding the flat-buffer staging copy for C++ style models.
    ///
    /// Semantics are identical to [`Model::evaluate_into`]; models of other
    /// conventions fall back to the flat path. Non-contiguous views are
    /// copied first rather than rejected.
    pub fn evaluate_array_into<'b>(
        &self,
        pars: ArrayView1<'_, f64>,
        energies: ArrayView1<'_, f64>,
        out: &'b mut Array1<f64>,
        opts: &EvalOptions,
    ) -> XspecResult<&'b mut Array1<f64>> {
        self.check_not_convolution()?;
        validate::check_par_count(self.desc.num_pars(), pars.len())?;
        validate::check_grid(energies.len())?;
        validate::check_output_len(energies.len(), out.len())?;

        // Contiguous views pass straight through; anything else is copied
        // into a standard-layout buffer first.
        let pars_store;
        let pars_slice = match pars.as_slice() {
            Some(slice) => slice,
            None => {
                pars_store = pars.to_vec();
                &pars_store
            }
        };
        let energies_store;
        let energies_slice = match energies.as_slice() {
            Some(slice) => slice,
            None => {
                energies_store = energies.to_vec();
                &energies_store
            }
        };

        let _guard = sys::lock();
        init::ensure_initialized()?;
        let symbols = crate::models::resolve(self.desc.name)?;

        match symbols.array {
            Some(bridge) => {
                let init_str = sys::to_cstring("init string", &opts.init_string)?;
                let out_slice = out
                    .as_slice_mut()
                    .expect("freshly indexed Array1 is contiguous");
                let mut errors = vec![0.0f64; out_slice.len()];
                log::debug!(
                    target: "xspec_models",
                    "calling {} (array-object, {} bins)",
                    self.desc.name,
                    out_slice.len()
                );
                unsafe {
                    bridge(
                        energies_slice.as_ptr(),
                        out_slice.len() as i32,
                        pars_slice.as_ptr(),
                        opts.spectrum,
                        out_slice.as_mut_ptr(),
                        errors.as_mut_ptr(),
                        init_str.as_ptr(),
                    );
                }
            }
            None => {
                let out_slice = out
                    .as_slice_mut()
                    .expect("freshly indexed Array1 is contiguous");
                invoke(&symbols.call, pars_slice, energies_slice, out_slice, opts)?;
            }
        }
        Ok(out)
    }

    fn check_not_convolution(&self) -> XspecResult<()> {
        if self.desc.is_convolution() {
            return Err(Error::IsConvolution(self.desc.name.to_string()));
        }
        Ok(())
    }

    /// Resolve the native symbol and run it. Validation must already have
    /// happened; `flux` doubles as the input buffer for convolution models.
    fn dispatch(
        &self,
        pars: &[f64],
        energies: &[f64],
        flux: &mut [f64],
        opts: &EvalOptions,
    ) -> XspecResult<()> {
        let _guard = sys::lock();
        init::ensure_initialized()?;
        let symbols = crate::models::resolve(self.desc.name)?;
        log::debug!(
            target: "xspec_models",
            "calling {} ({} pars, {} bins, spectrum {})",
            self.desc.name,
            pars.len(),
            flux.len(),
            opts.spectrum
        );
        invoke(&symbols.call, pars, energies, flux, opts)
    }
}

// =============================================================================
// Invocation wrappers
// =============================================================================

/// A model routine's entry point, tagged by calling convention.
///
/// Selected once at registration time from the catalog record; dispatch at
/// call time is a single match, no trait objects involved.
#[cfg_attr(not(feature = "native"), allow(dead_code))]
pub(crate) enum CallConv {
    F77Single(sys::Xsf77Call),
    F77Double(sys::XsF77Call),
    C(sys::XsccCall),
}

/// The native symbols registered for one model.
#[cfg_attr(not(feature = "native"), allow(dead_code))]
pub(crate) struct ModelSymbols {
    /// The flat-buffer entry point used by `evaluate`/`convolve`.
    pub(crate) call: CallConv,
    /// The direct array-object bridge, present for C++ style models.
    pub(crate) array: Option<sys::XsccCall>,
}

/// Invoke a model routine over validated buffers.
///
/// Each arm supplies a zeroed error buffer of the same length as the flux
/// buffer; the native routine may fill it in but the caller never sees it.
/// The FORTRAN single-precision arm stages through 32-bit scratch buffers
/// (narrow in, widen out); the seed values in `flux` are carried through the
/// staging so convolution input survives the round trip.
fn invoke(
    call: &CallConv,
    pars: &[f64],
    energies: &[f64],
    flux: &mut [f64],
    opts: &EvalOptions,
) -> XspecResult<()> {
    let nbins = flux.len() as i32;
    match call {
        CallConv::F77Single(f) => {
            let pars32: Vec<f32> = pars.iter().map(|&p| p as f32).collect();
            let energies32: Vec<f32> = energies.iter().map(|&e| e as f32).collect();
            let mut flux32: Vec<f32> = flux.iter().map(|&v| v as f32).collect();
            let mut errors = vec![0.0f32; flux.len()];
            unsafe {
                f(
                    energies32.as_ptr(),
                    nbins,
                    pars32.as_ptr(),
                    opts.spectrum,
                    flux32.as_mut_ptr(),
                    errors.as_mut_ptr(),
                );
            }
            for (wide, narrow) in flux.iter_mut().zip(&flux32) {
                *wide = f64::from(*narrow);
            }
        }
        CallConv::F77Double(f) => {
            let mut errors = vec![0.0f64; flux.len()];
            unsafe {
                f(
                    energies.as_ptr(),
                    nbins,
                    pars.as_ptr(),
                    opts.spectrum,
                    flux.as_mut_ptr(),
                    errors.as_mut_ptr(),
                );
            }
        }
        CallConv::C(f) => {
            let init_str = sys::to_cstring("init string", &opts.init_string)?;
            let mut errors = vec![0.0f64; flux.len()];
            unsafe {
                f(
                    energies.as_ptr(),
                    nbins,
                    pars.as_ptr(),
                    opts.spectrum,
                    flux.as_mut_ptr(),
                    errors.as_mut_ptr(),
                    init_str.as_ptr(),
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> Xspec {
        Xspec::unchecked_for_tests()
    }

    const GRID: [f64; 5] = [0.1, 0.2, 0.3, 0.4, 0.5];

    #[test]
    fn test_wrong_parameter_count_fails_before_native_call() {
        // powerlaw declares one parameter. With two supplied the call must
        // fail validation, not reach the native layer (which, in a build
        // without the native feature, would report NativeDisabled instead).
        let env = env();
        let model = env.model("powerlaw").unwrap();
        let err = model
            .evaluate(&[1.0, 2.0], &GRID, &EvalOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ParameterCount {
                expected: 1,
                got: 2
            }
        ));
    }

    #[test]
    fn test_short_grid_fails_before_native_call() {
        let env = env();
        let model = env.model("powerlaw").unwrap();
        let err = model
            .evaluate(&[1.0], &[0.1, 0.2], &EvalOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::GridTooShort { got: 2 }));
    }

    #[test]
    fn test_evaluate_rejects_convolution_models() {
        let env = env();
        let model = env.model("cflux").unwrap();
        let err = model
            .evaluate(&[0.5, 10.0, -12.0], &GRID, &EvalOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::IsConvolution(_)));
    }

    #[test]
    fn test_convolve_rejects_additive_models() {
        let env = env();
        let model = env.model("powerlaw").unwrap();
        let mut flux = [1.0; 4];
        let err = model
            .convolve(&[1.0], &GRID, &mut flux, &EvalOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::NotConvolution(_)));
    }

    #[test]
    fn test_inplace_output_length_is_checked() {
        let env = env();
        let model = env.model("powerlaw").unwrap();
        let mut out = [0.0; 3]; // needs 4 for a 5-edge grid
        let err = model
            .evaluate_into(&[1.0], &GRID, &mut out, &EvalOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::GridMismatch {
                energies: 5,
                model: 3
            }
        ));
    }

    #[test]
    fn test_convolve_model_buffer_length_is_checked() {
        let env = env();
        let model = env.model("cflux").unwrap();
        let mut flux = [1.0; 5]; // needs 4
        let err = model
            .convolve(&[0.5, 10.0, -12.0], &GRID, &mut flux, &EvalOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::GridMismatch { .. }));
    }

    #[test]
    fn test_array_path_validates_like_flat_path() {
        let env = env();
        let model = env.model("powerlaw").unwrap();
        let pars = ndarray::arr1(&[1.0, 2.0]);
        let energies = ndarray::arr1(&GRID);
        let mut out = Array1::zeros(4);
        let err = model
            .evaluate_array_into(
                pars.view(),
                energies.view(),
                &mut out,
                &EvalOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(err, Error::ParameterCount { .. }));
    }

    #[cfg(not(feature = "native"))]
    #[test]
    fn test_valid_input_reaches_native_gate() {
        // With validation satisfied, the only remaining failure in a build
        // without the native feature is the disabled-native gate. Reaching
        // it proves validation ran first and passed.
        let env = env();
        let model = env.model("powerlaw").unwrap();
        let err = model
            .evaluate(&[1.0], &GRID, &EvalOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::NativeDisabled));
    }

    #[test]
    fn test_eval_options_defaults() {
        let opts = EvalOptions::default();
        assert_eq!(opts.spectrum, 1);
        assert!(opts.init_string.is_empty());

        let opts = EvalOptions::default()
            .with_spectrum(3)
            .with_init_string("INFO");
        assert_eq!(opts.spectrum, 3);
        assert_eq!(opts.init_string, "INFO");
    }
}
