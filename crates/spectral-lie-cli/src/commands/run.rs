use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use spectral_lie::{load_config, AnalysisReport, SpectralLieModel};

#[derive(Args)]
pub struct RunArgs {
    /// Override output.directory from the configuration
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the full report as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

pub fn run(args: RunArgs, config_path: &Path) -> anyhow::Result<()> {
    let mut config = load_config(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    if let Some(output) = args.output {
        config.output.directory = output;
    }

    let model = SpectralLieModel::new(config);
    let (report, path) = model.run()?;

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print_summary(&report);
        println!("results written to {}", path.display());
    }
    Ok(())
}

fn print_summary(report: &AnalysisReport) {
    let info = &report.algebra_info;
    println!(
        "dimension {}  semisimple {}  d^2 = 0: {}",
        info.dimension, info.is_semisimple, report.cohomology.d_squared_zero
    );

    let harmonic = report.spectral_analysis.harmonic_dimensions();
    for (p, b) in &report.cohomology.betti_numbers {
        match harmonic.get(p) {
            Some(h) => println!("  b_{p} = {b}  (harmonic {h})"),
            None => println!("  b_{p} = {b}"),
        }
    }

    if let Some(physics) = &report.physics {
        println!(
            "euler characteristic {}",
            physics.structural_invariants.euler_characteristic
        );
    }
}
