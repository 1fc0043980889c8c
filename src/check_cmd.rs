//! Check command: validate the orders against the data shape.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info_span;

use crate::cli::CheckArgs;
use crate::config::SysidConfig;
use crate::convert;
use crate::data::read_csv;
use crate::fit_cmd::resolve_data_path;

/// Run the order/data validation.
pub fn run(args: CheckArgs) -> Result<()> {
    let _cmd = info_span!("check").entered();
    let config = SysidConfig::load(&args.config)?;
    let report = check_report(&config, args.data.as_deref())?;
    println!("{report}");
    Ok(())
}

fn check_report(config: &SysidConfig, data: Option<&Path>) -> Result<String> {
    let path = resolve_data_path(config, data)?;
    let pem_config = convert::build_pem_config(&config.estimator)?;
    let spec = convert::build_model_spec(&config.model, pem_config)?;
    let record = read_csv(&path, &config.data.inputs, &config.data.outputs)?;

    let (n, ny, nu) = (record.n(), record.y.ncols(), record.u.ncols());
    let orders = spec
        .orders(ny, nu)
        .context("orders do not match the data shape")?;
    orders
        .check_samples(n)
        .with_context(|| format!("{} is too short", path.display()))?;

    Ok(format!(
        "structure:      {}\n\
         outputs/inputs: {ny}/{nu}\n\
         samples:        {n}\n\
         history (L):    {}\n\
         min samples:    {}\n\
         parameters:     {}",
        orders.structure(),
        orders.max_lag(),
        orders.min_samples(),
        orders.n_params()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn csv_with_rows(rows: usize) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "u1,u2,y").unwrap();
        for t in 0..rows {
            writeln!(file, "{},{},{}", t % 3, t % 5, t % 7).unwrap();
        }
        file
    }

    fn oe_config() -> SysidConfig {
        toml::from_str(
            r#"
            [data]
            inputs = ["u1", "u2"]
            outputs = ["y"]
            [model]
            structure = "oe"
            nb = [1, 1]
            nf = [2, 2]
            nk = 1
            "#,
        )
        .unwrap()
    }

    #[test]
    fn reports_derived_quantities() {
        let file = csv_with_rows(50);
        let report = check_report(&oe_config(), Some(file.path())).unwrap();
        assert!(report.contains("structure:      OE"));
        assert!(report.contains("outputs/inputs: 1/2"));
        assert!(report.contains("history (L):    2"));
        // 2 (nu + 2) + max(nk) (nu + 1) = 8 + 3
        assert!(report.contains("min samples:    11"));
        assert!(report.contains("parameters:     8"));
    }

    #[test]
    fn short_record_rejected() {
        let file = csv_with_rows(10);
        let err = check_report(&oe_config(), Some(file.path())).unwrap_err();
        assert!(format!("{err:#}").contains("need at least 11"));
    }

    #[test]
    fn shape_mismatch_rejected() {
        let file = csv_with_rows(50);
        let mut config = oe_config();
        config.data.inputs.pop();
        let err = check_report(&config, Some(file.path())).unwrap_err();
        assert!(format!("{err:#}").contains("nb must have shape 1x1, got 1x2"));
    }
}
