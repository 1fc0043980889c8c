//! Fit command: estimate the configured model and print it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use crate::cli::FitArgs;
use crate::config::SysidConfig;
use crate::convert;
use crate::data::read_csv;

/// Run the estimation pipeline.
pub fn run(args: FitArgs) -> Result<()> {
    let _cmd = info_span!("fit").entered();
    let config = SysidConfig::load(&args.config)?;
    let report = fit_report(&config, args.data.as_deref())?;
    println!("{report}");
    Ok(())
}

/// Path from the command line, else from `[data].path`.
pub fn resolve_data_path(config: &SysidConfig, data: Option<&Path>) -> Result<PathBuf> {
    data.map(Path::to_path_buf)
        .or_else(|| config.data.path.clone())
        .ok_or_else(|| anyhow::anyhow!("no data path: set [data].path in config or use --data"))
}

fn fit_report(config: &SysidConfig, data: Option<&Path>) -> Result<String> {
    let path = resolve_data_path(config, data)?;
    let pem_config = convert::build_pem_config(&config.estimator)?;
    let spec = convert::build_model_spec(&config.model, pem_config)?;
    let record = read_csv(&path, &config.data.inputs, &config.data.outputs)?;

    let model = spec
        .fit(&record.u, &record.y)
        .with_context(|| format!("estimation failed for {}", path.display()))?;

    if model.converged() {
        info!(structure = %model.structure(), "model estimated");
    } else {
        warn!("iteration cap reached before convergence; the estimate may be unreliable");
    }
    Ok(model.to_string())
}
