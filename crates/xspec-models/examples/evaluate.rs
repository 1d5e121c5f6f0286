//! Evaluate a few XSPEC models over a shared energy grid.
//!
//! Run with:
//!   HEADAS=/path/to/heasoft cargo run --example evaluate --features native

use xspec_models::{info, EvalOptions, Xspec};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let xspec = Xspec::new()?;
    xspec.set_chatter(0)?; // hide the screen messages
    println!("XSPEC version: {}", xspec.version()?);

    // 0.1 to 11 keV in 0.01 keV steps.
    let egrid: Vec<f64> = (0..1091).map(|i| 0.1 + 0.01 * f64::from(i)).collect();
    let opts = EvalOptions::default();

    // An additive model at a few temperatures.
    let apec = xspec.model("apec")?;
    for kt in [0.3, 0.5, 1.0, 3.0, 5.0, 10.0] {
        let flux = apec.evaluate(&[kt, 1.0, 0.0], &egrid, &opts)?;
        let total: f64 = flux.iter().sum();
        println!("apec kT={kt:>4}: total flux {total:.6e}");
    }

    // A multiplicative model: phabs scales whatever it multiplies.
    let phabs = xspec.model("phabs")?;
    for nh in [0.01, 0.05, 0.1, 0.5, 1.0] {
        let factors = phabs.evaluate(&[nh], &egrid, &opts)?;
        let min = factors.iter().cloned().fold(f64::INFINITY, f64::min);
        println!("phabs nH={nh:>5}: min transmission {min:.4}");
    }

    // Combine them the way a fit would: absorbed apec.
    let apec_flux = apec.evaluate(&[0.5, 1.0, 0.0], &egrid, &opts)?;
    let absorption = phabs.evaluate(&[0.05], &egrid, &opts)?;
    let absorbed: Vec<f64> = apec_flux
        .iter()
        .zip(&absorption)
        .map(|(f, a)| f * a)
        .collect();
    println!(
        "absorbed apec: {} bins, peak {:.6e}",
        absorbed.len(),
        absorbed.iter().cloned().fold(0.0, f64::max)
    );

    // The catalog knows what each model expects.
    let desc = info("apec")?;
    println!(
        "apec is {:?} / {:?} with {} parameters",
        desc.modeltype,
        desc.language,
        desc.num_pars()
    );

    Ok(())
}
