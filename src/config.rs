use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level sysid configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SysidConfig {
    /// Data file and column selection.
    pub data: DataToml,

    /// Model structure and orders.
    pub model: ModelToml,

    /// Estimator settings.
    #[serde(default)]
    pub estimator: EstimatorToml,
}

impl SysidConfig {
    /// Reads and parses a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataToml {
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelToml {
    pub structure: String,
    pub na: Option<OrderToml>,
    pub nb: Option<OrderToml>,
    pub nc: Option<OrderToml>,
    pub nd: Option<OrderToml>,
    pub nf: Option<OrderToml>,
    pub nk: Option<OrderToml>,
}

/// An order written as `2`, `[1, 2]` or `[[1, 0], [0, 1]]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OrderToml {
    Scalar(usize),
    List(Vec<usize>),
    Matrix(Vec<Vec<usize>>),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EstimatorToml {
    #[serde(default = "default_forgetting_factor")]
    pub forgetting_factor: f64,
    #[serde(default = "default_initial_covariance")]
    pub initial_covariance: f64,
    #[serde(default = "default_symmetrize_interval")]
    pub symmetrize_interval: usize,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

impl Default for EstimatorToml {
    fn default() -> Self {
        Self {
            forgetting_factor: default_forgetting_factor(),
            initial_covariance: default_initial_covariance(),
            symmetrize_interval: default_symmetrize_interval(),
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
        }
    }
}

fn default_forgetting_factor() -> f64 {
    1.0
}
fn default_initial_covariance() -> f64 {
    1e6
}
fn default_symmetrize_interval() -> usize {
    10
}
fn default_tolerance() -> f64 {
    1e-6
}
fn default_max_iterations() -> usize {
    100
}
