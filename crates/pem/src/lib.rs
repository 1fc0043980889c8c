//! # sysid-pem
//!
//! Prediction-error identification of MIMO polynomial models
//!
//! ```text
//! A(q) y(t) = B(q)/F(q) u(t) + C(q)/D(q) e(t)
//! ```
//!
//! by recursive least squares and pseudo-linear regression. Every output is
//! estimated on its own; equation-error structures (ARX, FIR) take one RLS
//! pass, the others iterate passes over a noise-model-filtered regressor
//! until the parameters settle.
//!
//! ## Workflow
//!
//! ```mermaid
//! graph LR
//!     A["ModelSpec::bj(nb, nc, nd, nf, nk)"] -->|".fit(&u, &y)?"| B["FittedModel"]
//!     B --> C[".theta() / .covariance()"]
//!     B --> D[".a() .b() .c() .d() .f()"]
//!     B --> E[".status(): passes, convergence"]
//!     B --> F[".within_confidence(&theta0, 0.995)?"]
//!     A -->|".fit_recursive(&u, &y)?"| G["RecursiveFit"]
//! ```
//!
//! ## Two Usage Paths
//!
//! **Builder** (custom settings):
//! ```ignore
//! let model = ModelSpec::oe(1, 2, 1)
//!     .with_config(PemConfig::new().with_max_iterations(20))
//!     .fit(&u, &y)?;
//! ```
//!
//! **Free functions** (defaults):
//! ```ignore
//! let model = arx(2, 1, 1, &u, &y)?;
//! ```
//!
//! ## Glossary
//!
//! | Symbol | Accessor | Meaning |
//! |--------|----------|---------|
//! | na, nb, nc, nd, nf | [`Orders::na()`] ... | free coefficients of each polynomial (B has `nb + 1`) |
//! | nk | [`Orders::nk()`] | pure input delay in samples |
//! | L | [`Orders::max_lag()`] | history skipped before the first regressor |
//! | theta | [`FittedModel::theta()`] | parameters, output by output |
//! | P | [`FittedModel::covariance()`] | RLS covariance of theta |
//! | sigma2 | [`FittedModel::noise_variance()`] | innovation variance per output |

mod config;
mod error;
mod fit;
mod methods;
mod orders;
mod recursive;
mod spec;

pub(crate) mod assembly;
pub(crate) mod data;
pub(crate) mod driver;
pub(crate) mod layout;
pub(crate) mod predictor;
pub(crate) mod regressor;

pub use config::PemConfig;
pub use error::PemError;
pub use fit::{ChannelStatus, FittedModel};
pub use methods::{armax, arx, bj, oe, pem};
pub use orders::{OrderSpec, Orders, Structure};
pub use recursive::RecursiveFit;
pub use spec::ModelSpec;
