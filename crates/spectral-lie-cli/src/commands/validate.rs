use std::path::Path;

use anyhow::Context;
use spectral_lie::{load_config, SourceRegistry};

pub fn run(config_path: &Path) -> anyhow::Result<()> {
    let config = load_config(config_path)
        .with_context(|| format!("invalid configuration {}", config_path.display()))?;

    // the input format must name a registered source
    SourceRegistry::with_defaults().get(&config.input.format)?;

    tracing::info!(path = %config_path.display(), "configuration is valid");
    println!(
        "ok: format={} max_degree={} policy={} semisimple={}",
        config.input.format,
        config.cohomology.max_degree,
        config.cohomology.policy,
        config.cohomology.semisimple
    );
    Ok(())
}
