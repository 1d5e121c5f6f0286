//! Rendering of the per-model registration code.
//!
//! The input is a JSON catalog description: the output of the external
//! model.dat parser, filtered to the models this crate binds. Parsing the
//! raw model.dat format is explicitly out of scope here; this task only
//! consumes the structured form.
//!
//! Two artifacts are rendered: the Rust registration module (descriptor
//! table, native symbol declarations, resolver) and the C++ shim bridges
//! for the array-object convention.

use std::fmt::Write as _;

use anyhow::{bail, ensure, Result};
use serde::Deserialize;

/// One model record from the catalog JSON.
#[derive(Debug, Deserialize)]
pub struct CatalogModel {
    pub name: String,
    pub funcname: String,
    pub modeltype: String,
    pub language: String,
    pub elo: f64,
    pub ehi: f64,
    pub parameters: Vec<CatalogParameter>,
}

/// One parameter record from the catalog JSON.
#[derive(Debug, Deserialize)]
pub struct CatalogParameter {
    pub name: String,
    #[serde(default = "default_paramtype")]
    pub paramtype: String,
    pub default: f64,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub frozen: bool,
    #[serde(default)]
    pub softmin: Option<f64>,
    #[serde(default)]
    pub softmax: Option<f64>,
    #[serde(default)]
    pub hardmin: Option<f64>,
    #[serde(default)]
    pub hardmax: Option<f64>,
    #[serde(default)]
    pub delta: Option<f64>,
}

fn default_paramtype() -> String {
    "Default".to_string()
}

impl CatalogModel {
    fn modeltype_variant(&self) -> Result<&'static str> {
        Ok(match self.modeltype.as_str() {
            "Add" => "Add",
            "Mul" => "Mul",
            "Con" => "Con",
            other => bail!("unsupported model type '{other}' for {}", self.name),
        })
    }

    fn language_variant(&self) -> Result<&'static str> {
        Ok(match self.language.as_str() {
            "CppStyle8" => "CppStyle8",
            "CStyle8" => "CStyle8",
            "F77Style4" => "F77Style4",
            "F77Style8" => "F77Style8",
            other => bail!("unsupported language style '{other}' for {}", self.name),
        })
    }

    fn pars_static(&self) -> String {
        format!("{}_PARS", self.name.to_uppercase())
    }
}

/// Format a float as a Rust f64 literal.
fn lit(v: f64) -> String {
    let text = format!("{v:?}");
    if text.contains('.') || text.contains('e') || text.contains("inf") {
        text
    } else {
        format!("{text}.0")
    }
}

fn lit_opt(v: Option<f64>) -> Result<f64> {
    v.ok_or_else(|| anyhow::anyhow!("a Default-type parameter is missing one of its limits"))
}

const RUST_HEADER: &str = "\
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
#[cfg(feature = \"native\")]
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
";

const F32_SIG: &str = "(
            energy: *const f32,
            n_flux: i32,
            params: *const f32,
            spectrum_number: i32,
            flux: *mut f32,
            flux_error: *mut f32,
        );";

const F64_SIG: &str = "(
            energy: *const f64,
            n_flux: i32,
            params: *const f64,
            spectrum_number: i32,
            flux: *mut f64,
            flux_error: *mut f64,
        );";

const C_SIG: &str = "(
            energy: *const f64,
            n_flux: i32,
            params: *const f64,
            spectrum_number: i32,
            flux: *mut f64,
            flux_error: *mut f64,
            init_str: *const c_char,
        );";

/// Render the Rust registration module.
pub fn render_rust(models: &[CatalogModel]) -> Result<String> {
    let mut out = String::from(RUST_HEADER);

    // Parameter tables.
    out.push_str(
        "\n// ---------------------------------------------------------------------------\n\
         // Parameter tables\n\
         // ---------------------------------------------------------------------------\n\n",
    );
    for m in models {
        writeln!(
            out,
            "static {}: [XspecParameter; {}] = [",
            m.pars_static(),
            m.parameters.len()
        )?;
        for p in &m.parameters {
            match p.paramtype.as_str() {
                "Switch" => {
                    writeln!(out, "    switch({:?}, {}),", p.name, lit(p.default))?;
                }
                "Default" => {
                    let units = match &p.units {
                        Some(u) => format!("Some({u:?})"),
                        None => "None".to_string(),
                    };
                    writeln!(
                        out,
                        "    par({:?}, {}, {}, {}, {}, {}, {}, {}, {}),",
                        p.name,
                        lit(p.default),
                        units,
                        p.frozen,
                        lit(lit_opt(p.softmin)?),
                        lit(lit_opt(p.softmax)?),
                        lit(lit_opt(p.hardmin)?),
                        lit(lit_opt(p.hardmax)?),
                        lit(lit_opt(p.delta)?),
                    )?;
                }
                other => bail!("unsupported parameter type '{other}' for {}", m.name),
            }
        }
        out.push_str("];\n\n");
    }

    // Descriptor table.
    out.push_str(
        "// ---------------------------------------------------------------------------\n\
         // Descriptor table\n\
         // ---------------------------------------------------------------------------\n\n",
    );
    out.push_str(
        "const fn model(\n    modeltype: ModelType,\n    name: &'static str,\n    funcname: &'static str,\n    language: LanguageStyle,\n    elo: f64,\n    ehi: f64,\n    parameters: &'static [XspecParameter],\n) -> XspecModel {\n    XspecModel {\n        modeltype,\n        name,\n        funcname,\n        language,\n        elo,\n        ehi,\n        parameters,\n        use_errors: false,\n        can_cache: true,\n    }\n}\n\n",
    );
    out.push_str("pub(crate) static MODELS: &[XspecModel] = &[\n");
    for m in models {
        writeln!(
            out,
            "    model(\n        ModelType::{},\n        {:?},\n        {:?},\n        LanguageStyle::{},\n        {},\n        {},\n        &{},\n    ),",
            m.modeltype_variant()?,
            m.name,
            m.funcname,
            m.language_variant()?,
            lit(m.elo),
            lit(m.ehi),
            m.pars_static(),
        )?;
    }
    out.push_str("];\n\n");

    // Native symbol declarations, grouped by convention.
    out.push_str(
        "// ---------------------------------------------------------------------------\n\
         // Native symbols\n\
         // ---------------------------------------------------------------------------\n\n",
    );
    out.push_str(
        "#[cfg(feature = \"native\")]\n#[allow(non_snake_case)]\nmod symbols {\n    use std::os::raw::c_char;\n\n    extern \"C\" {\n",
    );

    out.push_str("        // FORTRAN single precision\n");
    for m in models.iter().filter(|m| m.language == "F77Style4") {
        writeln!(out, "        pub(super) fn {}_{F32_SIG}", m.funcname)?;
    }
    out.push_str("\n        // FORTRAN double precision\n");
    for m in models.iter().filter(|m| m.language == "F77Style8") {
        writeln!(out, "        pub(super) fn {}_{F64_SIG}", m.funcname)?;
    }
    out.push_str("\n        // C convention\n");
    for m in models.iter().filter(|m| m.language == "CStyle8") {
        writeln!(out, "        pub(super) fn {}{C_SIG}", m.funcname)?;
    }
    out.push_str("\n        // C bridges for the C++ style models\n");
    for m in models.iter().filter(|m| m.language == "CppStyle8") {
        writeln!(out, "        pub(super) fn C_{}{C_SIG}", m.funcname)?;
    }
    out.push_str("\n        // Array-object bridges exported by the generated shim\n");
    for m in models
        .iter()
        .filter(|m| m.language == "CppStyle8" && m.modeltype != "Con")
    {
        writeln!(out, "        pub(super) fn xs_cxx_{}_c{C_SIG}", m.funcname)?;
    }
    out.push_str("    }\n}\n\n");

    // Resolver.
    out.push_str(
        "/// Resolve a catalog model name to its registered native entry points.\n\
         #[cfg(feature = \"native\")]\n\
         pub(crate) fn resolve(name: &str) -> XspecResult<ModelSymbols> {\n    use symbols::*;\n\n    let entry = match name {\n",
    );
    for m in models {
        let (call, array) = match m.language.as_str() {
            "F77Style4" => (format!("CallConv::F77Single({}_)", m.funcname), None),
            "F77Style8" => (format!("CallConv::F77Double({}_)", m.funcname), None),
            "CStyle8" => (format!("CallConv::C({})", m.funcname), None),
            "CppStyle8" => {
                let array = if m.modeltype == "Con" {
                    None
                } else {
                    Some(format!("xs_cxx_{}_c", m.funcname))
                };
                (format!("CallConv::C(C_{})", m.funcname), array)
            }
            other => bail!("unsupported language style '{other}'"),
        };
        let array = match array {
            Some(bridge) => format!("Some({bridge})"),
            None => "None".to_string(),
        };
        writeln!(
            out,
            "        {:?} => ModelSymbols {{\n            call: {call},\n            array: {array},\n        }},",
            m.name
        )?;
    }
    out.push_str(
        "        _ => return Err(Error::UnknownModel(name.to_string())),\n    };\n    Ok(entry)\n}\n\n",
    );

    out.push_str(
        "/// Stub resolver for builds without the native feature.\n\
         #[cfg(not(feature = \"native\"))]\n\
         pub(crate) fn resolve(name: &str) -> XspecResult<ModelSymbols> {\n    let _ = name;\n    Err(Error::NativeDisabled)\n}\n",
    );

    Ok(out)
}

/// Render the C++ shim bridges for the array-object models.
pub fn render_shim(models: &[CatalogModel]) -> Result<String> {
    let cxx: Vec<&CatalogModel> = models
        .iter()
        .filter(|m| m.language == "CppStyle8" && m.modeltype != "Con")
        .collect();
    ensure!(!cxx.is_empty(), "no C++ style models in the catalog");

    let mut out = String::from(
        "// Generated by `cargo xtask generate-models` from the XSPEC model catalog\n\
         // (heasoft-6.30.1 subset). Do not edit by hand.\n\
         //\n\
         // One bridge per C++ style model: the array-object routines exchange data\n\
         // through RealArray (a std::valarray), which has no stable C ABI, so each\n\
         // bridge rebuilds the valarrays around the caller's flat buffers and copies\n\
         // the flux back out. The flat-buffer C_* wrappers for these models come\n\
         // from the library itself; only the array-object path needs generated code.\n\n\
         #include <algorithm>\n#include <string>\n#include <valarray>\n\n#include <xsTypes.h>\n\n\
         // XSCCall-signature routines for the catalog subset. These carry C++\n\
         // linkage and are defined inside the model library.\n",
    );

    for m in &cxx {
        writeln!(
            out,
            "void {}(const RealArray& energyArray, const RealArray& params,\n    int spectrumNumber, RealArray& fluxArray, RealArray& fluxErrArray,\n    const string& initString);",
            m.funcname
        )?;
    }

    out.push_str(
        "\nnamespace {\n\n\
         typedef void (*XSCCall)(const RealArray&, const RealArray&, int, RealArray&,\n\
                                 RealArray&, const string&);\n\n\
         void bridge(XSCCall model, int numPars, const double* energy, int nFlux,\n\
                     const double* params, int spectrumNumber, double* flux,\n\
                     double* fluxError, const char* initStr) {\n\
           const RealArray energyArray(energy, static_cast<size_t>(nFlux) + 1);\n\
           const RealArray pars(params, static_cast<size_t>(numPars));\n\
           RealArray fluxArray(flux, static_cast<size_t>(nFlux));\n\
           RealArray fluxErrArray(fluxError, static_cast<size_t>(nFlux));\n\
           const string initString(initStr != nullptr ? initStr : \"\");\n\n\
           model(energyArray, pars, spectrumNumber, fluxArray, fluxErrArray,\n\
                 initString);\n\n\
           std::copy(std::begin(fluxArray), std::end(fluxArray), flux);\n\
           std::copy(std::begin(fluxErrArray), std::end(fluxErrArray), fluxError);\n\
         }\n\n\
         }  // namespace\n\nextern \"C\" {\n\n",
    );

    for m in &cxx {
        writeln!(
            out,
            "void xs_cxx_{}_c(const double* energy, int nFlux, const double* params,\n    int spectrumNumber, double* flux, double* fluxError,\n    const char* initStr) {{\n  bridge({}, {}, energy, nFlux, params, spectrumNumber, flux, fluxError,\n         initStr);\n}}\n",
            m.funcname,
            m.funcname,
            m.parameters.len()
        )?;
    }

    out.push_str("}  // extern \"C\"\n");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "name": "powerlaw",
            "funcname": "powerLaw",
            "modeltype": "Add",
            "language": "CppStyle8",
            "elo": 0.0,
            "ehi": 1e20,
            "parameters": [
                {
                    "name": "PhoIndex",
                    "default": 1.0,
                    "softmin": -2.0,
                    "softmax": 9.0,
                    "hardmin": -3.0,
                    "hardmax": 10.0,
                    "delta": 0.01
                }
            ]
        },
        {
            "name": "wabs",
            "funcname": "xswabs",
            "modeltype": "Mul",
            "language": "F77Style4",
            "elo": 0.0,
            "ehi": 1e20,
            "parameters": [
                {
                    "name": "nH",
                    "default": 1.0,
                    "units": "10^22",
                    "softmin": 0.0,
                    "softmax": 1e5,
                    "hardmin": 0.0,
                    "hardmax": 1e6,
                    "delta": 0.001
                }
            ]
        }
    ]"#;

    fn sample() -> Vec<CatalogModel> {
        serde_json::from_str(SAMPLE).unwrap()
    }

    #[test]
    fn test_catalog_decoding() {
        let models = sample();
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].name, "powerlaw");
        assert_eq!(models[0].parameters[0].name, "PhoIndex");
        assert_eq!(models[1].parameters[0].units.as_deref(), Some("10^22"));
    }

    #[test]
    fn test_rust_rendering_registers_both_conventions() {
        let out = render_rust(&sample()).unwrap();
        assert!(out.contains("static POWERLAW_PARS"));
        assert!(out.contains("CallConv::C(C_powerLaw)"));
        assert!(out.contains("Some(xs_cxx_powerLaw_c)"));
        assert!(out.contains("CallConv::F77Single(xswabs_)"));
        assert!(out.contains("pub(crate) static MODELS"));
    }

    #[test]
    fn test_float_literals_are_valid_rust() {
        assert_eq!(lit(1.0), "1.0");
        assert_eq!(lit(0.001), "0.001");
        assert_eq!(lit(1e20), "1e20");
        assert_eq!(lit(-0.999), "-0.999");
    }

    #[test]
    fn test_shim_rendering_covers_cpp_models_only() {
        let out = render_shim(&sample()).unwrap();
        assert!(out.contains("xs_cxx_powerLaw_c"));
        assert!(!out.contains("xswabs"));
    }
}
