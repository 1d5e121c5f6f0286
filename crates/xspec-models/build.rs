//! Build script for xspec-models.
//!
//! With the `native` feature enabled this compiles the C++ shim against the
//! HEASoft installation named by the HEADAS environment variable and links
//! the XSPEC model libraries. Without the feature there is nothing to do:
//! the crate falls back to its stub implementations.

use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=shim/xsshim.cxx");
    println!("cargo:rerun-if-changed=shim/models_gen.cxx");
    println!("cargo:rerun-if-env-changed=HEADAS");

    if env::var_os("CARGO_FEATURE_NATIVE").is_none() {
        return;
    }

    let headas = match env::var("HEADAS") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            panic!(
                "building with the `native` feature requires the HEADAS \
                 environment variable to point at a HEASoft installation"
            );
        }
    };

    let include_dir = headas.join("include");
    let lib_dir = headas.join("lib");

    cc::Build::new()
        .cpp(true)
        .std("c++11")
        .file("shim/xsshim.cxx")
        .file("shim/models_gen.cxx")
        .include(&include_dir)
        .compile("xsshim");

    println!("cargo:rustc-link-search=native={}", lib_dir.display());
    for lib in ["XSFunctions", "XSUtil", "XS"] {
        println!("cargo:rustc-link-lib=dylib={lib}");
    }

    // The support library carries the HEASoft version in its name
    // (libhdsp_6.30.so and the like), so find it by prefix.
    if let Some(hdsp) = find_versioned_lib(&lib_dir, "hdsp") {
        println!("cargo:rustc-link-lib=dylib={hdsp}");
    }
}

/// Scan the library directory for `lib<prefix>*` and return the link name.
fn find_versioned_lib(lib_dir: &std::path::Path, prefix: &str) -> Option<String> {
    let entries = std::fs::read_dir(lib_dir).ok()?;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let Some(rest) = name.strip_prefix("lib") else {
            continue;
        };
        if !rest.starts_with(prefix) {
            continue;
        }
        for ext in [".so", ".dylib", ".a"] {
            if let Some(stem) = rest.strip_suffix(ext) {
                return Some(stem.to_string());
            }
        }
    }
    None
}
