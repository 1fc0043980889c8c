//! Pure conversion functions: TOML config structs -> crate API types.

use anyhow::{Context, Result, bail};
use sysid_pem::{ModelSpec, OrderSpec, PemConfig};
use sysid_rls::RlsConfig;

use crate::config::{EstimatorToml, ModelToml, OrderToml};

/// Converts one order entry; an absent entry means "polynomial absent".
pub fn order_spec(order: &Option<OrderToml>) -> OrderSpec {
    match order {
        None => OrderSpec::empty(),
        Some(OrderToml::Scalar(v)) => OrderSpec::from(*v),
        Some(OrderToml::List(v)) => OrderSpec::from(v.clone()),
        Some(OrderToml::Matrix(rows)) => OrderSpec::from(rows.clone()),
    }
}

/// Builds and validates the estimator settings.
pub fn build_pem_config(t: &EstimatorToml) -> Result<PemConfig> {
    let config = PemConfig::new()
        .with_tolerance(t.tolerance)
        .with_max_iterations(t.max_iterations)
        .with_rls(
            RlsConfig::new()
                .with_forgetting_factor(t.forgetting_factor)
                .with_initial_covariance(t.initial_covariance)
                .with_symmetrize_interval(t.symmetrize_interval),
        );
    config.validate().context("invalid [estimator] settings")?;
    Ok(config)
}

/// Builds the model specification named by `[model].structure`.
///
/// Orders the structure does not use must be left out.
pub fn build_model_spec(t: &ModelToml, config: PemConfig) -> Result<ModelSpec> {
    let structure = t.structure.to_lowercase();
    let used: &[&str] = match structure.as_str() {
        "arx" => &["na", "nb", "nk"],
        "armax" => &["na", "nb", "nc", "nk"],
        "oe" => &["nb", "nf", "nk"],
        "bj" => &["nb", "nc", "nd", "nf", "nk"],
        "general" => &["na", "nb", "nc", "nd", "nf", "nk"],
        other => bail!("unknown model structure: {other:?}"),
    };
    let given = [
        ("na", &t.na),
        ("nb", &t.nb),
        ("nc", &t.nc),
        ("nd", &t.nd),
        ("nf", &t.nf),
        ("nk", &t.nk),
    ];
    for (name, value) in given {
        if value.is_some() && !used.contains(&name) {
            bail!("{name} is not part of a {structure} model");
        }
    }

    let spec = match structure.as_str() {
        "arx" => ModelSpec::arx(order_spec(&t.na), order_spec(&t.nb), order_spec(&t.nk)),
        "armax" => ModelSpec::armax(
            order_spec(&t.na),
            order_spec(&t.nb),
            order_spec(&t.nc),
            order_spec(&t.nk),
        ),
        "oe" => ModelSpec::oe(order_spec(&t.nb), order_spec(&t.nf), order_spec(&t.nk)),
        "bj" => ModelSpec::bj(
            order_spec(&t.nb),
            order_spec(&t.nc),
            order_spec(&t.nd),
            order_spec(&t.nf),
            order_spec(&t.nk),
        ),
        _ => ModelSpec::general(
            order_spec(&t.na),
            order_spec(&t.nb),
            order_spec(&t.nc),
            order_spec(&t.nd),
            order_spec(&t.nf),
            order_spec(&t.nk),
        ),
    };
    Ok(spec.with_config(config))
}
