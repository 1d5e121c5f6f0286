//! Per-model registration records and native symbols.
//!
//! Generated by `cargo xtask generate-models` from the model catalog
//! shipped with the native library (heasoft-6.30.1 subset). Do not edit by
//! hand; regenerate after changing `xtask/catalog/models.json`.
//!
//! Each catalog entry contributes a descriptor record in [`MODELS`] plus a
//! native-symbol binding in [`resolve`], keyed by the entry's calling
//! convention. C++ style models additionally get an array-object bridge
//! exported by the generated shim.

use crate::error::{Error, XspecResult};
#[cfg(feature = "native")]
use crate::model::CallConv;
use crate::model::ModelSymbols;
use crate::registry::{LanguageStyle, ModelType, ParamType, XspecModel, XspecParameter};

const fn par(
    name: &'static str,
    default: f64,
    units: Option<&'static str>,
    frozen: bool,
    softmin: f64,
    softmax: f64,
    hardmin: f64,
    hardmax: f64,
    delta: f64,
) -> XspecParameter {
    XspecParameter {
        paramtype: ParamType::Default,
        name,
        default,
        units,
        frozen,
        softmin: Some(softmin),
        softmax: Some(softmax),
        hardmin: Some(hardmin),
        hardmax: Some(hardmax),
        delta: Some(delta),
    }
}

const fn switch(name: &'static str, default: f64) -> XspecParameter {
    XspecParameter {
        paramtype: ParamType::Switch,
        name,
        default,
        units: None,
        frozen: true,
        softmin: None,
        softmax: None,
        hardmin: None,
        hardmax: None,
        delta: None,
    }
}

// ---------------------------------------------------------------------------
// Parameter tables
// ---------------------------------------------------------------------------

static AGAUSS_PARS: [XspecParameter; 2] = [
    par("LineE", 10.0, Some("A"), false, 0.0, 1.0e6, 0.0, 1.0e6, 0.05),
    par("Sigma", 1.0, Some("A"), false, 0.0, 1.0e6, 0.0, 1.0e6, 0.05),
];

static APEC_PARS: [XspecParameter; 3] = [
    par("kT", 1.0, Some("keV"), false, 0.008, 64.0, 0.008, 64.0, 0.01),
    par("Abundanc", 1.0, None, true, 0.0, 5.0, 0.0, 5.0, 0.001),
    par("Redshift", 0.0, None, true, -0.999, 10.0, -0.999, 10.0, 0.01),
];

static BBODY_PARS: [XspecParameter; 1] = [par(
    "kT",
    3.0,
    Some("keV"),
    false,
    1.0e-2,
    100.0,
    1.0e-4,
    200.0,
    0.01,
)];

static BREMSS_PARS: [XspecParameter; 1] = [par(
    "kT",
    7.0,
    Some("keV"),
    false,
    1.0e-2,
    100.0,
    1.0e-4,
    200.0,
    0.01,
)];

static BWCYCL_PARS: [XspecParameter; 9] = [
    par("Radius", 10.0, Some("km"), true, 5.0, 20.0, 5.0, 20.0, 1.0),
    par("Mass", 1.4, Some("Solar"), true, 1.0, 3.0, 1.0, 3.0, 0.1),
    par("csi", 1.5, None, false, 0.01, 20.0, 0.01, 20.0, 0.01),
    par("delta", 1.8, None, false, 0.01, 20.0, 0.01, 20.0, 0.01),
    par("B", 4.0, Some("1e12G"), false, 0.01, 100.0, 0.01, 100.0, 0.01),
    par("Mdot", 1.0, Some("1e17g/s"), false, 1.0e-6, 1.0e6, 1.0e-6, 1.0e6, 0.01),
    par("Te", 5.0, Some("keV"), false, 0.1, 100.0, 0.1, 100.0, 0.1),
    par("r0", 44.0, Some("m"), false, 10.0, 1000.0, 10.0, 1000.0, 1.0),
    par("D", 5.0, Some("kpc"), true, 1.0, 20.0, 1.0, 20.0, 1.0),
];

static CFLUX_PARS: [XspecParameter; 3] = [
    par("Emin", 0.5, Some("keV"), true, 0.0, 1.0e6, 0.0, 1.0e6, 0.1),
    par("Emax", 10.0, Some("keV"), true, 0.0, 1.0e6, 0.0, 1.0e6, 0.1),
    par("lg10Flux", -12.0, Some("cgs"), false, -100.0, 100.0, -100.0, 100.0, 0.01),
];

static COMPMAG_PARS: [XspecParameter; 7] = [
    par("kTbb", 1.0, Some("keV"), false, 0.2, 10.0, 0.2, 10.0, 0.05),
    par("kTe", 5.0, Some("keV"), false, 0.2, 2000.0, 0.2, 2000.0, 0.25),
    par("tau", 0.5, None, false, 0.0, 10.0, 0.0, 10.0, 0.01),
    par("eta", 0.5, None, false, 0.01, 1.0, 0.01, 1.0, 0.01),
    par("beta0", 0.57, None, false, 1.0e-4, 1.0, 1.0e-4, 1.0, 0.001),
    par("r0", 0.25, None, false, 1.0e-4, 100.0, 1.0e-4, 100.0, 0.01),
    switch("betaflag", 1.0),
];

static CONSTANT_PARS: [XspecParameter; 1] =
    [par("factor", 1.0, None, false, 0.0, 1.0e10, 0.0, 1.0e10, 0.01)];

static CUTOFFPL_PARS: [XspecParameter; 2] = [
    par("PhoIndex", 1.0, None, false, -2.0, 9.0, -3.0, 10.0, 0.01),
    par("HighECut", 15.0, Some("keV"), false, 1.0, 500.0, 0.01, 500.0, 0.01),
];

static EDGE_PARS: [XspecParameter; 2] = [
    par("edgeE", 7.0, Some("keV"), false, 0.0, 100.0, 0.0, 100.0, 0.01),
    par("MaxTau", 1.0, None, false, 0.0, 5.0, 0.0, 10.0, 0.01),
];

static GAUSSIAN_PARS: [XspecParameter; 2] = [
    par("LineE", 6.5, Some("keV"), false, 0.0, 1.0e6, 0.0, 1.0e6, 0.05),
    par("Sigma", 0.1, Some("keV"), false, 0.0, 10.0, 0.0, 20.0, 0.05),
];

static GSMOOTH_PARS: [XspecParameter; 2] = [
    par("Sig_6keV", 1.0, Some("keV"), false, 0.0, 10.0, 0.0, 20.0, 0.05),
    par("Index", 0.0, None, true, -1.0, 1.0, -1.0, 1.0, 0.01),
];

static PHABS_PARS: [XspecParameter; 1] = [par(
    "nH",
    1.0,
    Some("10^22"),
    false,
    0.0,
    1.0e5,
    0.0,
    1.0e6,
    0.001,
)];

static POWERLAW_PARS: [XspecParameter; 1] =
    [par("PhoIndex", 1.0, None, false, -2.0, 9.0, -3.0, 10.0, 0.01)];

static TBABS_PARS: [XspecParameter; 1] = [par(
    "nH",
    1.0,
    Some("10^22"),
    false,
    0.0,
    1.0e5,
    0.0,
    1.0e6,
    0.001,
)];

static WABS_PARS: [XspecParameter; 1] = [par(
    "nH",
    1.0,
    Some("10^22"),
    false,
    0.0,
    1.0e5,
    0.0,
    1.0e6,
    0.001,
)];

static ZASHIFT_PARS: [XspecParameter; 1] =
    [par("Redshift", 0.0, None, true, -0.999, 10.0, -0.999, 10.0, 0.01)];

static ZPOWERLW_PARS: [XspecParameter; 2] = [
    par("PhoIndex", 1.0, None, false, -2.0, 9.0, -3.0, 10.0, 0.01),
    par("Redshift", 0.0, None, true, -0.999, 10.0, -0.999, 10.0, 0.01),
];

// ---------------------------------------------------------------------------
// Descriptor table
// ---------------------------------------------------------------------------

const fn model(
    modeltype: ModelType,
    name: &'static str,
    funcname: &'static str,
    language: LanguageStyle,
    elo: f64,
    ehi: f64,
    parameters: &'static [XspecParameter],
) -> XspecModel {
    XspecModel {
        modeltype,
        name,
        funcname,
        language,
        elo,
        ehi,
        parameters,
        use_errors: false,
        can_cache: true,
    }
}

pub(crate) static MODELS: &[XspecModel] = &[
    model(
        ModelType::Add,
        "agauss",
        "agauss",
        LanguageStyle::CppStyle8,
        0.0,
        1.0e20,
        &AGAUSS_PARS,
    ),
    model(
        ModelType::Add,
        "apec",
        "apec",
        LanguageStyle::CppStyle8,
        0.0,
        1.0e20,
        &APEC_PARS,
    ),
    model(
        ModelType::Add,
        "bbody",
        "xsblbd",
        LanguageStyle::F77Style4,
        0.0,
        1.0e20,
        &BBODY_PARS,
    ),
    model(
        ModelType::Add,
        "bremss",
        "xsbrms",
        LanguageStyle::F77Style4,
        0.0,
        1.0e20,
        &BREMSS_PARS,
    ),
    model(
        ModelType::Add,
        "bwcycl",
        "bwcycl",
        LanguageStyle::F77Style8,
        0.0,
        1.0e20,
        &BWCYCL_PARS,
    ),
    model(
        ModelType::Con,
        "cflux",
        "cflux",
        LanguageStyle::CppStyle8,
        0.0,
        1.0e20,
        &CFLUX_PARS,
    ),
    model(
        ModelType::Add,
        "compmag",
        "compmag",
        LanguageStyle::CStyle8,
        0.0,
        1.0e20,
        &COMPMAG_PARS,
    ),
    model(
        ModelType::Mul,
        "constant",
        "xscnst",
        LanguageStyle::F77Style4,
        0.0,
        1.0e20,
        &CONSTANT_PARS,
    ),
    model(
        ModelType::Add,
        "cutoffpl",
        "cutoffPowerLaw",
        LanguageStyle::CppStyle8,
        0.0,
        1.0e20,
        &CUTOFFPL_PARS,
    ),
    model(
        ModelType::Mul,
        "edge",
        "xsedge",
        LanguageStyle::F77Style4,
        0.0,
        1.0e20,
        &EDGE_PARS,
    ),
    model(
        ModelType::Add,
        "gaussian",
        "gaussianLine",
        LanguageStyle::CppStyle8,
        0.0,
        1.0e20,
        &GAUSSIAN_PARS,
    ),
    model(
        ModelType::Con,
        "gsmooth",
        "gsmooth",
        LanguageStyle::CppStyle8,
        0.0,
        1.0e20,
        &GSMOOTH_PARS,
    ),
    model(
        ModelType::Mul,
        "phabs",
        "xsphab",
        LanguageStyle::F77Style4,
        0.0,
        1.0e20,
        &PHABS_PARS,
    ),
    model(
        ModelType::Add,
        "powerlaw",
        "powerLaw",
        LanguageStyle::CppStyle8,
        0.0,
        1.0e20,
        &POWERLAW_PARS,
    ),
    model(
        ModelType::Mul,
        "tbabs",
        "tbabs",
        LanguageStyle::CppStyle8,
        0.0,
        1.0e20,
        &TBABS_PARS,
    ),
    model(
        ModelType::Mul,
        "wabs",
        "xswabs",
        LanguageStyle::F77Style4,
        0.0,
        1.0e20,
        &WABS_PARS,
    ),
    model(
        ModelType::Con,
        "zashift",
        "zashift",
        LanguageStyle::CppStyle8,
        0.0,
        1.0e20,
        &ZASHIFT_PARS,
    ),
    model(
        ModelType::Add,
        "zpowerlw",
        "zpowerLaw",
        LanguageStyle::CppStyle8,
        0.0,
        1.0e20,
        &ZPOWERLW_PARS,
    ),
];

// ---------------------------------------------------------------------------
// Native symbols
// ---------------------------------------------------------------------------

#[cfg(feature = "native")]
#[allow(non_snake_case)]
mod symbols {
    use std::os::raw::c_char;

    extern "C" {
        // FORTRAN single precision
        pub(super) fn xsblbd_(
            energy: *const f32,
            n_flux: i32,
            params: *const f32,
            spectrum_number: i32,
            flux: *mut f32,
            flux_error: *mut f32,
        );
        pub(super) fn xsbrms_(
            energy: *const f32,
            n_flux: i32,
            params: *const f32,
            spectrum_number: i32,
            flux: *mut f32,
            flux_error: *mut f32,
        );
        pub(super) fn xscnst_(
            energy: *const f32,
            n_flux: i32,
            params: *const f32,
            spectrum_number: i32,
            flux: *mut f32,
            flux_error: *mut f32,
        );
        pub(super) fn xsedge_(
            energy: *const f32,
            n_flux: i32,
            params: *const f32,
            spectrum_number: i32,
            flux: *mut f32,
            flux_error: *mut f32,
        );
        pub(super) fn xsphab_(
            energy: *const f32,
            n_flux: i32,
            params: *const f32,
            spectrum_number: i32,
            flux: *mut f32,
            flux_error: *mut f32,
        );
        pub(super) fn xswabs_(
            energy: *const f32,
            n_flux: i32,
            params: *const f32,
            spectrum_number: i32,
            flux: *mut f32,
            flux_error: *mut f32,
        );

        // FORTRAN double precision
        pub(super) fn bwcycl_(
            energy: *const f64,
            n_flux: i32,
            params: *const f64,
            spectrum_number: i32,
            flux: *mut f64,
            flux_error: *mut f64,
        );

        // C convention
        pub(super) fn compmag(
            energy: *const f64,
            n_flux: i32,
            params: *const f64,
            spectrum_number: i32,
            flux: *mut f64,
            flux_error: *mut f64,
            init_str: *const c_char,
        );

        // C bridges for the C++ style models
        pub(super) fn C_agauss(
            energy: *const f64,
            n_flux: i32,
            params: *const f64,
            spectrum_number: i32,
            flux: *mut f64,
            flux_error: *mut f64,
            init_str: *const c_char,
        );
        pub(super) fn C_apec(
            energy: *const f64,
            n_flux: i32,
            params: *const f64,
            spectrum_number: i32,
            flux: *mut f64,
            flux_error: *mut f64,
            init_str: *const c_char,
        );
        pub(super) fn C_cflux(
            energy: *const f64,
            n_flux: i32,
            params: *const f64,
            spectrum_number: i32,
            flux: *mut f64,
            flux_error: *mut f64,
            init_str: *const c_char,
        );
        pub(super) fn C_cutoffPowerLaw(
            energy: *const f64,
            n_flux: i32,
            params: *const f64,
            spectrum_number: i32,
            flux: *mut f64,
            flux_error: *mut f64,
            init_str: *const c_char,
        );
        pub(super) fn C_gaussianLine(
            energy: *const f64,
            n_flux: i32,
            params: *const f64,
            spectrum_number: i32,
            flux: *mut f64,
            flux_error: *mut f64,
            init_str: *const c_char,
        );
        pub(super) fn C_gsmooth(
            energy: *const f64,
            n_flux: i32,
            params: *const f64,
            spectrum_number: i32,
            flux: *mut f64,
            flux_error: *mut f64,
            init_str: *const c_char,
        );
        pub(super) fn C_powerLaw(
            energy: *const f64,
            n_flux: i32,
            params: *const f64,
            spectrum_number: i32,
            flux: *mut f64,
            flux_error: *mut f64,
            init_str: *const c_char,
        );
        pub(super) fn C_tbabs(
            energy: *const f64,
            n_flux: i32,
            params: *const f64,
            spectrum_number: i32,
            flux: *mut f64,
            flux_error: *mut f64,
            init_str: *const c_char,
        );
        pub(super) fn C_zashift(
            energy: *const f64,
            n_flux: i32,
            params: *const f64,
            spectrum_number: i32,
            flux: *mut f64,
            flux_error: *mut f64,
            init_str: *const c_char,
        );
        pub(super) fn C_zpowerLaw(
            energy: *const f64,
            n_flux: i32,
            params: *const f64,
            spectrum_number: i32,
            flux: *mut f64,
            flux_error: *mut f64,
            init_str: *const c_char,
        );

        // Array-object bridges exported by the generated shim
        pub(super) fn xs_cxx_agauss_c(
            energy: *const f64,
            n_flux: i32,
            params: *const f64,
            spectrum_number: i32,
            flux: *mut f64,
            flux_error: *mut f64,
            init_str: *const c_char,
        );
        pub(super) fn xs_cxx_apec_c(
            energy: *const f64,
            n_flux: i32,
            params: *const f64,
            spectrum_number: i32,
            flux: *mut f64,
            flux_error: *mut f64,
            init_str: *const c_char,
        );
        pub(super) fn xs_cxx_cutoffPowerLaw_c(
            energy: *const f64,
            n_flux: i32,
            params: *const f64,
            spectrum_number: i32,
            flux: *mut f64,
            flux_error: *mut f64,
            init_str: *const c_char,
        );
        pub(super) fn xs_cxx_gaussianLine_c(
            energy: *const f64,
            n_flux: i32,
            params: *const f64,
            spectrum_number: i32,
            flux: *mut f64,
            flux_error: *mut f64,
            init_str: *const c_char,
        );
        pub(super) fn xs_cxx_powerLaw_c(
            energy: *const f64,
            n_flux: i32,
            params: *const f64,
            spectrum_number: i32,
            flux: *mut f64,
            flux_error: *mut f64,
            init_str: *const c_char,
        );
        pub(super) fn xs_cxx_tbabs_c(
            energy: *const f64,
            n_flux: i32,
            params: *const f64,
            spectrum_number: i32,
            flux: *mut f64,
            flux_error: *mut f64,
            init_str: *const c_char,
        );
        pub(super) fn xs_cxx_zpowerLaw_c(
            energy: *const f64,
            n_flux: i32,
            params: *const f64,
            spectrum_number: i32,
            flux: *mut f64,
            flux_error: *mut f64,
            init_str: *const c_char,
        );
    }
}

/// Resolve a catalog model name to its registered native entry points.
#[cfg(feature = "native")]
pub(crate) fn resolve(name: &str) -> XspecResult<ModelSymbols> {
    use symbols::*;

    let entry = match name {
        "agauss" => ModelSymbols {
            call: CallConv::C(C_agauss),
            array: Some(xs_cxx_agauss_c),
        },
        "apec" => ModelSymbols {
            call: CallConv::C(C_apec),
            array: Some(xs_cxx_apec_c),
        },
        "bbody" => ModelSymbols {
            call: CallConv::F77Single(xsblbd_),
            array: None,
        },
        "bremss" => ModelSymbols {
            call: CallConv::F77Single(xsbrms_),
            array: None,
        },
        "bwcycl" => ModelSymbols {
            call: CallConv::F77Double(bwcycl_),
            array: None,
        },
        "cflux" => ModelSymbols {
            call: CallConv::C(C_cflux),
            array: None,
        },
        "compmag" => ModelSymbols {
            call: CallConv::C(compmag),
            array: None,
        },
        "constant" => ModelSymbols {
            call: CallConv::F77Single(xscnst_),
            array: None,
        },
        "cutoffpl" => ModelSymbols {
            call: CallConv::C(C_cutoffPowerLaw),
            array: Some(xs_cxx_cutoffPowerLaw_c),
        },
        "edge" => ModelSymbols {
            call: CallConv::F77Single(xsedge_),
            array: None,
        },
        "gaussian" => ModelSymbols {
            call: CallConv::C(C_gaussianLine),
            array: Some(xs_cxx_gaussianLine_c),
        },
        "gsmooth" => ModelSymbols {
            call: CallConv::C(C_gsmooth),
            array: None,
        },
        "phabs" => ModelSymbols {
            call: CallConv::F77Single(xsphab_),
            array: None,
        },
        "powerlaw" => ModelSymbols {
            call: CallConv::C(C_powerLaw),
            array: Some(xs_cxx_powerLaw_c),
        },
        "tbabs" => ModelSymbols {
            call: CallConv::C(C_tbabs),
            array: Some(xs_cxx_tbabs_c),
        },
        "wabs" => ModelSymbols {
            call: CallConv::F77Single(xswabs_),
            array: None,
        },
        "zashift" => ModelSymbols {
            call: CallConv::C(C_zashift),
            array: None,
        },
        "zpowerlw" => ModelSymbols {
            call: CallConv::C(C_zpowerLaw),
            array: Some(xs_cxx_zpowerLaw_c),
        },
        _ => return Err(Error::UnknownModel(name.to_string())),
    };
    Ok(entry)
}

/// Stub resolver for builds without the native feature.
#[cfg(not(feature = "native"))]
pub(crate) fn resolve(name: &str) -> XspecResult<ModelSymbols> {
    let _ = name;
    Err(Error::NativeDisabled)
}
