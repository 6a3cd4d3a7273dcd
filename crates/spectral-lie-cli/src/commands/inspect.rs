use std::path::Path;

use anyhow::Context;
use clap::Args;
use spectral_lie::linalg::{numerical_rank, RANK_RTOL};
use spectral_lie::{load_config, CohomologyEngine, SpectralLieModel};

#[derive(Args)]
pub struct InspectArgs {
    /// Cochain degree p of d_p: C^p -> C^{p+1}; every degree up to max_degree when omitted
    #[arg(short, long)]
    degree: Option<usize>,

    /// Print the matrix entries
    #[arg(long)]
    show: bool,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

pub fn run(args: InspectArgs, config_path: &Path) -> anyhow::Result<()> {
    let config = load_config(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let model = SpectralLieModel::new(config);
    let algebra = model.load_algebra()?;
    let engine = model.build_engine(&algebra);

    let degrees: Vec<usize> = match args.degree {
        Some(p) => vec![p],
        None => (0..=engine.max_degree()).collect(),
    };

    if args.json {
        let entries: Vec<serde_json::Value> = degrees
            .iter()
            .map(|&p| describe_json(&engine, p, args.show))
            .collect();
        let value = serde_json::json!({
            "dimension": engine.dimension(),
            "wedge_dimensions": engine.wedge_dimensions(),
            "differentials": entries,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!(
        "dimension {}  wedge dimensions {:?}",
        engine.dimension(),
        engine.wedge_dimensions()
    );
    for p in degrees {
        describe_text(&engine, p, args.show);
    }
    Ok(())
}

fn describe_json(engine: &CohomologyEngine, p: usize, show: bool) -> serde_json::Value {
    let d = engine.assemble_d(p);
    let matrix: Option<Vec<Vec<f64>>> = show.then(|| {
        d.row_iter()
            .map(|row| row.iter().copied().collect())
            .collect()
    });
    serde_json::json!({
        "degree": p,
        "rows": d.nrows(),
        "cols": d.ncols(),
        "rank": numerical_rank(&d, RANK_RTOL),
        "d_squared_defect": engine.d_squared_defect(p),
        "matrix": matrix,
    })
}

fn describe_text(engine: &CohomologyEngine, p: usize, show: bool) {
    let d = engine.assemble_d(p);
    let rank = numerical_rank(&d, RANK_RTOL);
    println!(
        "d_{p}: C^{p} -> C^{}  shape {} x {}  rank {rank}",
        p + 1,
        d.nrows(),
        d.ncols()
    );
    match engine.d_squared_defect(p) {
        Some(defect) => println!("  max |d_{} d_{p}| = {defect:.3e}", p + 1),
        None => println!("  d_{} d_{p} is an empty map", p + 1),
    }
    if show && !d.is_empty() {
        println!("{d}");
    }
}
