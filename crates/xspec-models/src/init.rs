//! One-time startup of the XSPEC model library.
//!
//! The native startup routine (`FNINIT`) must run before any model or
//! settings call, requires the `HEADAS` environment variable to point at the
//! HEASoft installation, and unconditionally prints a banner to standard
//! output. This module runs it lazily, exactly once per process on success,
//! with the banner captured away from the caller's terminal.
//!
//! State machine: Uninitialized → Initialized, irreversible for the process
//! lifetime. A failed attempt leaves the state Uninitialized, so a caller
//! that remediates the cause (for example by setting `HEADAS`) may retry.

use std::sync::Mutex;

use crate::error::{Error, XspecResult};

/// One-shot latch. `true` only after a successful native startup; guarded by
/// a mutex so a concurrent first use runs startup exactly once.
static INITIALIZED: Mutex<bool> = Mutex::new(false);

/// Run native startup if it has not already succeeded.
///
/// Safe to call from any entry point; all callers in this crate invoke it
/// before touching the native library.
pub(crate) fn ensure_initialized() -> XspecResult<()> {
    let mut done = INITIALIZED
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    if *done {
        return Ok(());
    }
    run_startup()?;
    *done = true;
    Ok(())
}

#[cfg(not(feature = "native"))]
fn run_startup() -> XspecResult<()> {
    Err(Error::NativeDisabled)
}

#[cfg(feature = "native")]
fn run_startup() -> XspecResult<()> {
    if std::env::var_os("HEADAS").is_none() {
        return Err(Error::HeadasNotSet);
    }

    let (result, banner) = capture::with_stdout_captured(crate::sys::fninit)?;

    match result {
        Ok(()) => {
            if !banner.is_empty() {
                log::debug!(target: "xspec_models", "startup banner:\n{}", banner.trim_end());
            }
            Ok(())
        }
        Err(err) => {
            let mut text = err.to_string();
            let banner = banner.trim();
            if !banner.is_empty() {
                text.push('\n');
                text.push_str(banner);
            }
            Err(Error::InitFailed(text))
        }
    }
}

#[cfg(feature = "native")]
mod capture {
    //! Scoped redirection of the process stdout descriptor.
    //!
    //! The restore lives in a `Drop` impl so the original descriptor comes
    //! back on every exit path, including an early return or unwind from the
    //! native call.

    #[cfg(unix)]
    use std::io::{Read, Seek, SeekFrom};

    use crate::error::XspecResult;

    /// Run `f` with stdout redirected into an anonymous temp file and return
    /// the result together with whatever was written.
    ///
    /// If the redirection cannot be set up the call still runs, with the
    /// banner going to the real stdout.
    pub(super) fn with_stdout_captured<T>(
        f: impl FnOnce() -> XspecResult<T>,
    ) -> XspecResult<(XspecResult<T>, String)> {
        #[cfg(unix)]
        {
            let mut sink = tempfile::tempfile()?;
            let guard = match RedirectGuard::install(&sink) {
                Some(guard) => guard,
                None => {
                    log::warn!(
                        target: "xspec_models",
                        "could not redirect stdout; the startup banner will be visible"
                    );
                    return Ok((f(), String::new()));
                }
            };

            let result = f();
            drop(guard);

            let mut banner = String::new();
            if sink.seek(SeekFrom::Start(0)).is_ok() {
                // Banner text is diagnostics only, so a read failure is not
                // worth surfacing.
                let _ = sink.read_to_string(&mut banner);
            }
            Ok((result, banner))
        }

        #[cfg(not(unix))]
        {
            Ok((f(), String::new()))
        }
    }

    #[cfg(unix)]
    struct RedirectGuard {
        saved: libc::c_int,
    }

    #[cfg(unix)]
    impl RedirectGuard {
        /// Point fd 1 at `sink`, remembering the original descriptor.
        fn install(sink: &std::fs::File) -> Option<Self> {
            use std::os::unix::io::AsRawFd;

            unsafe {
                // Flush buffered C stdio before swapping the descriptor so
                // earlier output is not captured with the banner.
                libc::fflush(std::ptr::null_mut());

                let saved = libc::dup(libc::STDOUT_FILENO);
                if saved < 0 {
                    return None;
                }
                if libc::dup2(sink.as_raw_fd(), libc::STDOUT_FILENO) < 0 {
                    libc::close(saved);
                    return None;
                }
                Some(Self { saved })
            }
        }
    }

    #[cfg(unix)]
    impl Drop for RedirectGuard {
        fn drop(&mut self) {
            unsafe {
                libc::fflush(std::ptr::null_mut());
                libc::dup2(self.saved, libc::STDOUT_FILENO);
                libc::close(self.saved);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "native"))]
    #[test]
    fn test_startup_reports_native_disabled() {
        let err = ensure_initialized().unwrap_err();
        assert!(matches!(err, Error::NativeDisabled));
    }

    #[cfg(not(feature = "native"))]
    #[test]
    fn test_failed_startup_is_retryable() {
        // A failed attempt must not latch the initialized flag.
        assert!(ensure_initialized().is_err());
        assert!(ensure_initialized().is_err());
        assert!(!*INITIALIZED.lock().unwrap());
    }
}
