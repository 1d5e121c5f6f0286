mod codegen;

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tasks for xspec-models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate the per-model registration code from the catalog file
    GenerateModels {
        /// Catalog description (JSON emitted by the external model.dat parser)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Output path for the Rust registration module
        #[arg(long)]
        rust_out: Option<PathBuf>,

        /// Output path for the generated C++ shim bridges
        #[arg(long)]
        shim_out: Option<PathBuf>,
    },

    /// Report what the native build would pick up from the environment
    ReportEnv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::GenerateModels {
            catalog,
            rust_out,
            shim_out,
        } => {
            let root = project_root();
            let catalog = catalog.unwrap_or_else(|| root.join("xtask/catalog/models.json"));
            let rust_out =
                rust_out.unwrap_or_else(|| root.join("crates/xspec-models/src/models.rs"));
            let shim_out =
                shim_out.unwrap_or_else(|| root.join("crates/xspec-models/shim/models_gen.cxx"));
            generate_models(&catalog, &rust_out, &shim_out)?;
        }
        Commands::ReportEnv => {
            report_env();
        }
    }

    Ok(())
}

fn generate_models(catalog: &Path, rust_out: &Path, shim_out: &Path) -> Result<()> {
    let text = std::fs::read_to_string(catalog)
        .with_context(|| format!("Failed to read catalog {}", catalog.display()))?;
    let mut models: Vec<codegen::CatalogModel> =
        serde_json::from_str(&text).context("Failed to parse the model catalog")?;

    // Lookup relies on sorted, unique names.
    models.sort_by(|a, b| a.name.cmp(&b.name));
    for pair in models.windows(2) {
        anyhow::ensure!(
            pair[0].name != pair[1].name,
            "duplicate catalog entry: {}",
            pair[0].name
        );
    }

    let rust = codegen::render_rust(&models)?;
    std::fs::write(rust_out, rust)
        .with_context(|| format!("Failed to write {}", rust_out.display()))?;

    let shim = codegen::render_shim(&models)?;
    std::fs::write(shim_out, shim)
        .with_context(|| format!("Failed to write {}", shim_out.display()))?;

    // Best effort: normalize the emitted Rust. The generator's output is
    // already close, but rustfmt keeps the diff against hand edits clean.
    let _ = Command::new("rustfmt").arg(rust_out).status();

    println!(
        "Generated {} model bindings -> {}",
        models.len(),
        rust_out.display()
    );
    Ok(())
}

fn report_env() {
    match std::env::var("HEADAS") {
        Ok(dir) => {
            println!("HEADAS = {dir}");
            let root = PathBuf::from(dir);
            for sub in ["include", "lib"] {
                let path = root.join(sub);
                let status = if path.is_dir() { "ok" } else { "MISSING" };
                println!("  {sub}: {status} ({})", path.display());
            }
            if let Ok(entries) = std::fs::read_dir(root.join("lib")) {
                let mut libs: Vec<String> = entries
                    .flatten()
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .filter(|n| n.starts_with("libXS") || n.starts_with("libhdsp"))
                    .collect();
                libs.sort();
                for lib in libs {
                    println!("  found {lib}");
                }
            }
        }
        Err(_) => {
            println!("HEADAS is not set; the native feature cannot be built.");
        }
    }
}

fn project_root() -> PathBuf {
    Path::new(&env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(1)
        .expect("xtask lives one level below the workspace root")
        .to_path_buf()
}
