//! Error types for the public API.
//!
//! Everything the crate can report funnels into [`Error`]; public methods
//! return [`XspecResult`]. The variants fall into a few families:
//!
//! ```text
//! Error
//! ├── HeadasNotSet / InitFailed     -- library startup (fatal, not retryable)
//! ├── ParameterCount / GridTooShort
//! │   └── GridMismatch              -- input validation (retryable after fixing input)
//! ├── NotConvolution / IsConvolution -- wrong entry point for the model category
//! ├── UnknownModel / UnknownKey     -- lookups against the catalog or databases
//! ├── InvalidPath                   -- strings that cannot cross the FFI boundary
//! ├── Native                        -- a failure reported by the native library
//! ├── NativeDisabled                -- crate built without the `native` feature
//! └── Io                            -- plumbing around stream redirection
//! ```
//!
//! Validation errors are raised before any native call is made, so a caller
//! that corrects its input can simply retry. Startup errors are latched for
//! the lifetime of the process.

use thiserror::Error;

/// The error type for all fallible operations in this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// The HEADAS environment variable is required by the native library.
    #[error("The HEADAS environment variable is not set")]
    HeadasNotSet,

    /// Native startup ran but reported a failure. The payload carries any
    /// diagnostic text captured from the startup banner.
    #[error("Unable to initialize the XSPEC model library: {0}")]
    InitFailed(String),

    /// The parameter sequence does not match the model's declared count.
    #[error("Expected {expected} parameters but sent {got}")]
    ParameterCount { expected: usize, got: usize },

    /// The energy grid does not define at least two bins.
    #[error("Expected at least 3 bin edges but sent {got}")]
    GridTooShort { got: usize },

    /// An output (or convolution input) buffer does not match the grid.
    #[error(
        "Energy grid size must be 1 more than model: \
         energies has {energies} elements and model has {model} elements"
    )]
    GridMismatch { energies: usize, model: usize },

    /// `convolve` was called on an additive or multiplicative model.
    #[error("'{0}' is not a convolution model")]
    NotConvolution(String),

    /// `evaluate` was called on a convolution model, which has no
    /// allocate-fresh mode: it transforms an existing model flux in place.
    #[error("'{0}' is a convolution model and must be called via convolve")]
    IsConvolution(String),

    /// The model name is not in the catalog this crate was built with.
    #[error("Unrecognized XSPEC model '{0}'")]
    UnknownModel(String),

    /// A lookup against one of the keyword databases found nothing.
    #[error("Unknown key '{key}' in the {database} database")]
    UnknownKey { database: &'static str, key: String },

    /// A path or string argument contains an interior NUL and cannot be
    /// passed to the native library.
    #[error("Invalid string for the native library: {0}")]
    InvalidPath(String),

    /// The native library reported an error.
    #[error("XSPEC library error: {0}")]
    Native(String),

    /// The crate was built without the `native` feature.
    #[error("xspec-models was built without the `native` feature; rebuild with --features native")]
    NativeDisabled,

    /// I/O failure in the stream-redirection plumbing around startup.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias used throughout the crate.
pub type XspecResult<T> = Result<T, Error>;

impl Error {
    /// Create an unknown-key error for one of the keyword databases.
    pub(crate) fn unknown_key(database: &'static str, key: impl Into<String>) -> Self {
        Error::UnknownKey {
            database,
            key: key.into(),
        }
    }

    /// True for errors the caller can fix by correcting its input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::ParameterCount { .. }
                | Error::GridTooShort { .. }
                | Error::GridMismatch { .. }
                | Error::NotConvolution(_)
                | Error::IsConvolution(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_count_display() {
        let err = Error::ParameterCount {
            expected: 3,
            got: 2,
        };
        assert_eq!(err.to_string(), "Expected 3 parameters but sent 2");
    }

    #[test]
    fn test_grid_mismatch_display() {
        let err = Error::GridMismatch {
            energies: 5,
            model: 3,
        };
        assert_eq!(
            err.to_string(),
            "Energy grid size must be 1 more than model: \
             energies has 5 elements and model has 3 elements"
        );
    }

    #[test]
    fn test_unknown_key_display() {
        let err = Error::unknown_key("XFLT", "mykey");
        assert_eq!(err.to_string(), "Unknown key 'mykey' in the XFLT database");
    }

    #[test]
    fn test_validation_classification() {
        assert!(Error::ParameterCount {
            expected: 1,
            got: 0
        }
        .is_validation());
        assert!(Error::GridTooShort { got: 2 }.is_validation());
        assert!(!Error::HeadasNotSet.is_validation());
        assert!(!Error::NativeDisabled.is_validation());
        assert!(!Error::unknown_key("model string", "k").is_validation());
    }
}
