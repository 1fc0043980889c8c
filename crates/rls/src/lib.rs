//! # sysid-rls
//!
//! Recursive least squares (RLS) with exponential forgetting, plus the small
//! SPD linear algebra needed to check it against batch least squares.
//!
//! ## State Workflow
//!
//! ```mermaid
//! graph LR
//!     A["RlsConfig::new()"] -->|"Rls::new(n, &config)?"| B["Rls"]
//!     B -->|".update(x, y)?"| B
//!     B -->|".finish()?"| C["RlsEstimate"]
//! ```
//!
//! ## Glossary
//!
//! | Symbol | Accessor | Meaning |
//! |--------|----------|---------|
//! | theta | [`Rls::theta()`] | running parameter estimate |
//! | P | [`Rls::covariance()`] | scaled parameter covariance |
//! | lambda | [`RlsConfig::forgetting_factor()`] | weight on past samples, 1 = plain least squares |
//! | p0 | [`RlsConfig::initial_covariance()`] | diffuse prior scale, `P0 = p0 I` |

mod config;
mod error;
mod linalg;
mod rls;

pub use config::RlsConfig;
pub use error::RlsError;
pub use linalg::{
    cholesky, cholesky_solve, inverse_spd, normal_equations, quadratic_form, solve_spd,
    stack_rows, symmetrize,
};
pub use rls::{Rls, RlsEstimate};
