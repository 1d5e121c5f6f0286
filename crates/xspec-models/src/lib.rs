//! Call models from the XSPEC model library from Rust.
//!
//! This crate is a binding layer: the spectral models themselves live in the
//! XSPEC model library shipped with HEASoft, and this crate marshals numeric
//! buffers and scalar settings across the FFI boundary. There is no
//! reimplementation of any model here.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use xspec_models::{EvalOptions, Xspec};
//!
//! // Requires HEADAS to point at a HEASoft installation and the crate to
//! // be built with the `native` feature.
//! let xspec = Xspec::new()?;
//! println!("XSPEC version {}", xspec.version()?);
//!
//! let energies: Vec<f64> = (0..100).map(|i| 0.1 + 0.1 * f64::from(i)).collect();
//! let model = xspec.model("powerlaw")?;
//! let flux = model.evaluate(&[1.7], &energies, &EvalOptions::default())?;
//! assert_eq!(flux.len(), energies.len() - 1);
//! # Ok::<(), xspec_models::Error>(())
//! ```
//!
//! ## Module organization
//!
//! - [`model`] - the [`Xspec`] handle and per-model evaluation
//! - [`registry`] - the model catalog (descriptors, lookup, listing)
//! - [`table`] - tabulated-model files evaluated at call time
//! - [`error`] - the error type and result alias
//!
//! Settings accessors (chatter, abundance and cross-section tables,
//! cosmology, the keyword databases) are methods on [`Xspec`].
//!
//! ## The `native` feature
//!
//! Building with `--features native` compiles the C++ shim against the
//! HEASoft tree named by `HEADAS` and links the model library. Without it
//! the full API is present but every native entry point fails with
//! [`Error::NativeDisabled`]; validation, the catalog, and the registry all
//! still work, which is what the unit-test suite runs against.
//!
//! ## Threading
//!
//! The native library keeps process-wide mutable state with no internal
//! locking, so this crate serializes every native call (including startup
//! and the settings accessors) on one internal mutex. Calls from multiple
//! threads are safe but never run concurrently.

pub mod error;
pub use error::{Error, XspecResult};

pub mod model;
pub use model::{EvalOptions, Model, Xspec};

pub mod registry;
pub use registry::{
    info, list_models, LanguageStyle, ModelType, ParamType, XspecModel, XspecParameter,
};

pub mod table;
pub use table::TableType;

mod settings;
pub use settings::Cosmology;

mod init;
mod models;
mod sys;
mod validate;
