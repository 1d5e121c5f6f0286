//! The model catalog: descriptor types and lookup.
//!
//! Each model this crate was built against is described by a static
//! [`XspecModel`] record generated from the native library's model catalog
//! (see the `xtask generate-models` task). The records drive registration:
//! one generic invocation routine per calling convention serves every model,
//! selected by the descriptor's [`LanguageStyle`] tag.
//!
//! Lookup is case-insensitive, matching how the catalog file is used by the
//! native library itself.

use crate::error::{Error, XspecResult};
use crate::models::MODELS;

/// The model categories the crate supports.
///
/// Additive models produce a flux, multiplicative models scale one, and
/// convolution models transform an existing flux array in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelType {
    Add,
    Mul,
    Con,
}

/// The native calling conventions, fixed per model at registration time.
///
/// The tag encodes both the argument layout and the element width the
/// routine expects; see the descriptor methods for the derived properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageStyle {
    /// C++ array-object routine, double precision (reached through its C
    /// bridge for flat-buffer calls, or directly for the array path).
    CppStyle8,
    /// C routine, double precision.
    CStyle8,
    /// FORTRAN routine, single precision.
    F77Style4,
    /// FORTRAN routine, double precision.
    F77Style8,
}

impl LanguageStyle {
    /// True when the routine works on 32-bit values and inputs must be
    /// narrowed before the call.
    pub fn is_single_precision(self) -> bool {
        matches!(self, LanguageStyle::F77Style4)
    }

    /// True when the convention accepts a per-call initialization string.
    pub fn has_init_string(self) -> bool {
        matches!(self, LanguageStyle::CppStyle8 | LanguageStyle::CStyle8)
    }
}

/// Parameter kinds from the model catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    Default,
    Switch,
    Scale,
    Periodic,
}

/// One parameter record from the model catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XspecParameter {
    pub paramtype: ParamType,
    pub name: &'static str,
    pub default: f64,
    pub units: Option<&'static str>,
    /// Frozen parameters are not varied during a fit; they still count
    /// towards the parameter vector this crate expects.
    pub frozen: bool,
    pub softmin: Option<f64>,
    pub softmax: Option<f64>,
    pub hardmin: Option<f64>,
    pub hardmax: Option<f64>,
    pub delta: Option<f64>,
}

/// One model record from the model catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XspecModel {
    pub modeltype: ModelType,
    pub name: &'static str,
    /// The symbol base name in the native library (prefix/suffix decoration
    /// depends on the calling convention).
    pub funcname: &'static str,
    pub language: LanguageStyle,
    /// The energy range, in keV, the model is considered valid over.
    pub elo: f64,
    pub ehi: f64,
    pub parameters: &'static [XspecParameter],
    /// The routine fills in the per-bin error estimate it is handed.
    pub use_errors: bool,
    /// False for models whose output depends on state beyond the parameter
    /// vector, so results cannot be reused between calls.
    pub can_cache: bool,
}

impl XspecModel {
    /// The declared parameter count.
    pub fn num_pars(&self) -> usize {
        self.parameters.len()
    }

    /// The default parameter vector, in catalog order.
    pub fn default_parameters(&self) -> Vec<f64> {
        self.parameters.iter().map(|p| p.default).collect()
    }

    /// True for convolution models, which only support in-place calls.
    pub fn is_convolution(&self) -> bool {
        self.modeltype == ModelType::Con
    }
}

/// Look up a model record by name (case-insensitive).
pub fn info(name: &str) -> XspecResult<&'static XspecModel> {
    MODELS
        .iter()
        .find(|m| m.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::UnknownModel(name.to_string()))
}

/// The names of the catalog models, optionally restricted by type or
/// language.
///
/// With both filters unset every model is returned. When filters are given
/// the result is the union of the matches, mirroring the catalog query the
/// original interface exposed.
pub fn list_models(
    modeltype: Option<ModelType>,
    language: Option<LanguageStyle>,
) -> Vec<&'static str> {
    let mut out: Vec<&'static str> = MODELS
        .iter()
        .filter(|m| {
            if modeltype.is_none() && language.is_none() {
                return true;
            }
            modeltype.is_some_and(|t| m.modeltype == t)
                || language.is_some_and(|l| m.language == l)
        })
        .map(|m| m.name)
        .collect();
    out.sort_unstable();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_is_case_insensitive() {
        let lower = info("wabs").unwrap();
        let upper = info("WABS").unwrap();
        assert_eq!(lower.name, upper.name);
        assert_eq!(lower.name, "wabs");
    }

    #[test]
    fn test_info_unknown_model() {
        let err = info("not-a-model").unwrap_err();
        assert!(matches!(err, Error::UnknownModel(_)));
        assert_eq!(err.to_string(), "Unrecognized XSPEC model 'not-a-model'");
    }

    #[test]
    fn test_wabs_descriptor() {
        // wabs is a stable catalog entry: single-precision FORTRAN
        // multiplicative model with one parameter.
        let model = info("wabs").unwrap();
        assert_eq!(model.modeltype, ModelType::Mul);
        assert_eq!(model.language, LanguageStyle::F77Style4);
        assert_eq!(model.num_pars(), 1);

        let par = &model.parameters[0];
        assert_eq!(par.name, "nH");
        assert!(!par.frozen);
    }

    #[test]
    fn test_list_models_unfiltered_is_sorted() {
        let all = list_models(None, None);
        assert!(!all.is_empty());
        let mut sorted = all.clone();
        sorted.sort_unstable();
        assert_eq!(all, sorted);
        assert!(all.contains(&"powerlaw"));
    }

    #[test]
    fn test_list_models_by_type() {
        let mul = list_models(Some(ModelType::Mul), None);
        assert!(mul.contains(&"wabs"));
        assert!(!mul.contains(&"powerlaw"));

        let con = list_models(Some(ModelType::Con), None);
        assert!(con.contains(&"cflux"));
        assert!(!con.contains(&"wabs"));
    }

    #[test]
    fn test_list_models_filters_union() {
        // Two filters select the union of their matches.
        let out = list_models(Some(ModelType::Con), Some(LanguageStyle::F77Style4));
        assert!(out.contains(&"cflux"));
        assert!(out.contains(&"wabs"));
        assert!(!out.contains(&"powerlaw"));
    }

    #[test]
    fn test_default_parameters_order() {
        let model = info("apec").unwrap();
        let defaults = model.default_parameters();
        assert_eq!(defaults.len(), model.num_pars());
        assert_eq!(defaults[0], model.parameters[0].default);
    }

    #[test]
    fn test_language_style_properties() {
        assert!(LanguageStyle::F77Style4.is_single_precision());
        assert!(!LanguageStyle::F77Style8.is_single_precision());
        assert!(!LanguageStyle::CStyle8.is_single_precision());

        assert!(LanguageStyle::CStyle8.has_init_string());
        assert!(LanguageStyle::CppStyle8.has_init_string());
        assert!(!LanguageStyle::F77Style4.has_init_string());
        assert!(!LanguageStyle::F77Style8.has_init_string());
    }
}
