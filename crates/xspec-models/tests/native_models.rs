//! Integration tests against an installed HEASoft tree.
//!
//! These run only when the crate is built with the `native` feature and the
//! HEADAS environment variable points at a HEASoft installation; otherwise
//! each test skips itself. Run them single-threaded if chatter output
//! interleaving matters: the library itself is serialized internally.

#![cfg(feature = "native")]

use xspec_models::{Cosmology, Error, EvalOptions, TableType, Xspec};

/// 5 edges, 4 bins; the smallest grid the concrete scenarios use.
const GRID: [f64; 5] = [0.1, 0.2, 0.3, 0.4, 0.5];

/// Build a handle, or skip the test when the environment is not set up.
fn xspec() -> Option<Xspec> {
    if std::env::var_os("HEADAS").is_none() {
        eprintln!("skipping: HEADAS is not set");
        return None;
    }
    Some(Xspec::new().expect("native startup"))
}

fn grid(n_bins: usize) -> Vec<f64> {
    (0..=n_bins).map(|i| 0.1 + 0.01 * i as f64).collect()
}

#[test]
fn test_version_looks_sane() {
    let Some(x) = xspec() else { return };
    let version = x.version().unwrap();
    assert!(!version.is_empty());
    assert_eq!(version.split('.').count(), 3, "{version}");
}

#[test]
fn test_initializer_runs_once() {
    let Some(x) = xspec() else { return };
    // A setting made through one handle must survive further handle
    // creation: a second startup would reset the library state.
    x.set_chatter(17).unwrap();
    let again = Xspec::new().unwrap();
    assert_eq!(again.chatter().unwrap(), 17);
    x.set_chatter(10).unwrap();
}

#[test]
fn test_evaluate_returns_one_value_per_bin() {
    let Some(x) = xspec() else { return };
    let model = x.model("powerlaw").unwrap();
    let energies = grid(99);
    let flux = model
        .evaluate(&[1.7], &energies, &EvalOptions::default())
        .unwrap();
    assert_eq!(flux.len(), energies.len() - 1);
}

#[test]
fn test_concrete_additive_scenario() {
    // A 3-parameter additive model over [0.1, 0.2, 0.3, 0.4, 0.5] with
    // default parameters: 4 non-negative values.
    let Some(x) = xspec() else { return };
    x.set_abundance("lodd").unwrap();
    x.set_cross_section("vern").unwrap();

    let model = x.model("apec").unwrap();
    let pars = model.default_parameters();
    assert_eq!(pars.len(), 3);

    let flux = model.evaluate(&pars, &GRID, &EvalOptions::default()).unwrap();
    assert_eq!(flux.len(), 4);
    assert!(flux.iter().all(|&v| v >= 0.0));
    assert!(flux.iter().any(|&v| v > 0.0));
}

#[test]
fn test_inplace_evaluate_writes_the_supplied_buffer() {
    let Some(x) = xspec() else { return };
    let model = x.model("wabs").unwrap();
    let mut out = vec![-1.0; 4];
    let sentinel = out.as_ptr();
    let returned = model
        .evaluate_into(&[0.1], &GRID, &mut out, &EvalOptions::default())
        .unwrap();
    assert_eq!(returned.as_ptr(), sentinel);
    assert!(out.iter().all(|&v| v >= 0.0), "contents overwritten: {out:?}");
}

#[test]
fn test_inplace_and_fresh_agree() {
    let Some(x) = xspec() else { return };
    let model = x.model("phabs").unwrap();
    let energies = grid(50);
    let opts = EvalOptions::default();

    let fresh = model.evaluate(&[0.5], &energies, &opts).unwrap();
    let mut inplace = vec![0.0; 50];
    model
        .evaluate_into(&[0.5], &energies, &mut inplace, &opts)
        .unwrap();
    for (a, b) in fresh.iter().zip(&inplace) {
        approx::assert_relative_eq!(*a, *b);
    }
}

#[test]
fn test_array_object_path_matches_flat_path() {
    let Some(x) = xspec() else { return };
    let model = x.model("powerlaw").unwrap();
    let energies = grid(50);
    let opts = EvalOptions::default();

    let flat = model.evaluate(&[1.7], &energies, &opts).unwrap();

    let pars = ndarray::arr1(&[1.7]);
    let grid_arr = ndarray::Array1::from(energies);
    let mut out = ndarray::Array1::zeros(50);
    model
        .evaluate_array_into(pars.view(), grid_arr.view(), &mut out, &opts)
        .unwrap();

    for (a, b) in flat.iter().zip(out.iter()) {
        approx::assert_relative_eq!(*a, *b);
    }
}

#[test]
fn test_convolve_overwrites_in_place() {
    let Some(x) = xspec() else { return };
    let energies = grid(100);
    let opts = EvalOptions::default();

    let powerlaw = x.model("powerlaw").unwrap();
    let mut flux = powerlaw.evaluate(&[1.0], &energies, &opts).unwrap();
    let before = flux.clone();
    let sentinel = flux.as_ptr();

    let zashift = x.model("zashift").unwrap();
    let returned = zashift
        .convolve(&[0.1], &energies, &mut flux, &opts)
        .unwrap();
    assert_eq!(returned.as_ptr(), sentinel);
    assert!(flux.iter().zip(&before).any(|(a, b)| a != b));
}

#[test]
fn test_settings_round_trip() {
    let Some(x) = xspec() else { return };

    x.set_chatter(5).unwrap();
    assert_eq!(x.chatter().unwrap(), 5);
    x.set_chatter(10).unwrap();

    x.set_abundance("angr").unwrap();
    assert_eq!(x.abundance().unwrap(), "angr");
    x.set_abundance("lodd").unwrap();
    assert_eq!(x.abundance().unwrap(), "lodd");

    x.set_cross_section("bcmc").unwrap();
    assert_eq!(x.cross_section().unwrap(), "bcmc");
    x.set_cross_section("vern").unwrap();

    let cosmo = Cosmology {
        h0: 70.0,
        q0: 0.0,
        lambda0: 0.73,
    };
    x.set_cosmology(cosmo).unwrap();
    let read = x.cosmology().unwrap();
    approx::assert_relative_eq!(read.h0, cosmo.h0);
    approx::assert_relative_eq!(read.q0, cosmo.q0);
    approx::assert_relative_eq!(read.lambda0, cosmo.lambda0, max_relative = 1e-6);
}

#[test]
fn test_element_lookup_by_name_and_number_agree() {
    let Some(x) = xspec() else { return };
    x.set_abundance("lodd").unwrap();

    assert_eq!(x.number_elements().unwrap(), 30);
    assert_eq!(x.element_name(1).unwrap(), "H");
    assert_eq!(x.element_name(2).unwrap(), "He");

    for z in [1, 2, 17, 26, 30] {
        let name = x.element_name(z).unwrap();
        let by_z = x.element_abundance(z).unwrap();
        let by_name = x.element_abundance_by_name(&name).unwrap();
        approx::assert_relative_eq!(by_z, by_name);
    }
}

#[test]
fn test_xflt_keywords() {
    let Some(x) = xspec() else { return };
    x.clear_xflt().unwrap();

    assert!(!x.has_xflt(1, "inclination").unwrap());
    x.set_xflt(1, "inclination", 45.0).unwrap();
    assert!(x.has_xflt(1, "inclination").unwrap());
    approx::assert_relative_eq!(x.xflt(1, "inclination").unwrap(), 45.0);
    assert_eq!(x.xflt_count(1).unwrap(), 1);

    // Spectrum numbers keep separate tables.
    assert!(!x.has_xflt(2, "inclination").unwrap());

    x.clear_xflt().unwrap();
    assert_eq!(x.xflt_count(1).unwrap(), 0);
}

#[test]
fn test_unknown_keys_are_errors_not_sentinels() {
    let Some(x) = xspec() else { return };
    x.clear_db().unwrap();
    x.clear_xflt().unwrap();

    assert!(matches!(
        x.db_value("unset-keyword").unwrap_err(),
        Error::UnknownKey { .. }
    ));
    assert!(matches!(
        x.xflt(1, "unset-keyword").unwrap_err(),
        Error::UnknownKey { .. }
    ));
    assert!(matches!(
        x.model_string("unset-keyword").unwrap_err(),
        Error::UnknownKey { .. }
    ));
}

#[test]
fn test_keyword_databases_round_trip() {
    let Some(x) = xspec() else { return };

    x.set_db_value("fudge", 1.25).unwrap();
    approx::assert_relative_eq!(x.db_value("fudge").unwrap(), 1.25);
    x.clear_db().unwrap();
    assert!(x.db_value("fudge").is_err());

    x.set_model_string("APECROOT", "3.0.9").unwrap();
    assert_eq!(x.model_string("APECROOT").unwrap(), "3.0.9");
    x.clear_model_strings().unwrap();
    assert!(x.model_string("APECROOT").is_err());
}

#[test]
fn test_table_model_from_file() {
    // Needs a table file on disk; point XSPEC_TABLE_MODEL at one (for
    // example the RCS atable shipped with xspec's test data) to enable.
    let Some(x) = xspec() else { return };
    let Ok(path) = std::env::var("XSPEC_TABLE_MODEL") else {
        eprintln!("skipping: XSPEC_TABLE_MODEL is not set");
        return;
    };

    let energies = grid(10);
    let flux = x
        .table_model(&path, TableType::Add, &[1.0], &energies, 1)
        .unwrap();
    assert_eq!(flux.len(), 10);
}
