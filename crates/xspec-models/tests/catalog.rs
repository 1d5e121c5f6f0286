//! Catalog and validation behavior that holds with or without the native
//! library present.

use xspec_models::{info, list_models, LanguageStyle, ModelType};

#[test]
fn test_catalog_covers_every_convention() {
    for style in [
        LanguageStyle::CppStyle8,
        LanguageStyle::CStyle8,
        LanguageStyle::F77Style4,
        LanguageStyle::F77Style8,
    ] {
        assert!(
            !list_models(None, Some(style)).is_empty(),
            "no catalog model uses {style:?}"
        );
    }
}

#[test]
fn test_catalog_covers_every_model_type() {
    for mtype in [ModelType::Add, ModelType::Mul, ModelType::Con] {
        assert!(!list_models(Some(mtype), None).is_empty());
    }
}

#[test]
fn test_catalog_names_are_unique() {
    let all = list_models(None, None);
    let mut deduped = all.clone();
    deduped.dedup();
    assert_eq!(all, deduped);
}

#[test]
fn test_known_models_are_listed() {
    let all = list_models(None, None);
    for name in ["powerlaw", "apec", "wabs", "tbabs", "cflux"] {
        assert!(all.contains(&name), "{name} missing from the catalog");
    }
}

#[test]
fn test_model_lookup_matches_listing() {
    for name in list_models(None, None) {
        let model = info(name).expect("listed model must resolve");
        assert_eq!(model.name, name);
    }
}

#[test]
fn test_convolution_models_only_in_con_listing() {
    let con = list_models(Some(ModelType::Con), None);
    for name in &con {
        assert!(info(name).unwrap().is_convolution());
    }
    let add = list_models(Some(ModelType::Add), None);
    for name in &add {
        assert!(!info(name).unwrap().is_convolution());
    }
}

#[test]
fn test_f77_models_are_single_precision() {
    for name in list_models(None, Some(LanguageStyle::F77Style4)) {
        let model = info(name).unwrap();
        if model.language == LanguageStyle::F77Style4 {
            assert!(model.language.is_single_precision());
            assert!(!model.language.has_init_string());
        }
    }
}

#[test]
fn test_parameter_records_are_well_formed() {
    for name in list_models(None, None) {
        let model = info(name).unwrap();
        for par in model.parameters {
            assert!(!par.name.is_empty());
            if let (Some(lo), Some(hi)) = (par.hardmin, par.hardmax) {
                assert!(lo <= hi, "{name}.{} has inverted hard limits", par.name);
                assert!(
                    par.default >= lo && par.default <= hi,
                    "{name}.{} default outside hard limits",
                    par.name
                );
            }
            if let (Some(lo), Some(hi)) = (par.softmin, par.softmax) {
                assert!(lo <= hi);
            }
        }
    }
}

#[cfg(not(feature = "native"))]
mod without_native {
    use xspec_models::{Error, Xspec};

    #[test]
    fn test_handle_creation_requires_native() {
        let err = Xspec::new().unwrap_err();
        assert!(matches!(err, Error::NativeDisabled));
    }
}
