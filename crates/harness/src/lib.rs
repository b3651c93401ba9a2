//! Fork-sandbox harness for yield-vault contracts.
//!
//! This crate drives scripted user journeys against a vault router running
//! on a local Anvil node, optionally forked from a live chain:
//!
//! - [`Fixture`] owns the sandbox: reset, impersonation, funding and block
//!   production.
//! - [`Scenario`] is a fixed, dependency-ordered list of [`Step`]s.
//! - [`Runner`] executes a scenario, threading a [`ScenarioContext`] from
//!   step to step and checking accounting invariants after every action.
//! - [`ScenarioReport`] records what happened, step by step.
//!
//! # Example
//!
//! ```no_run
//! use vault_harness::{Fixture, ForkSettings, Journey, Runner, RunnerConfig, Scenario};
//! use vault_harness_config::DeploymentConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), vault_harness::HarnessError> {
//!     let deployment = DeploymentConfig::from_json_file("deployments/polygon-legacy.json")?;
//!     let config = RunnerConfig::from_env();
//!
//!     let fixture = Fixture::spawn(ForkSettings::from_env()?, &config).await?;
//!     let mut runner = Runner::new(fixture, config);
//!
//!     let journey = Journey::for_kind(deployment.router_kind);
//!     let scenario = Scenario::journey(journey, &deployment.scenario, deployment.has_boost());
//!     let report = runner.run(&deployment, &scenario).await?;
//!     assert!(report.passed());
//!     Ok(())
//! }
//! ```
//!
//! # Failure handling
//!
//! Every error carries an [`ErrorCategory`]. An invariant violation, revert
//! or timeout ends the current scenario; setup and config failures end the
//! whole run (see [`Runner::run_all`]).

pub mod context;
pub mod error;
pub mod fixture;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod settings;

pub use context::{Actor, ScenarioContext};
pub use error::{ErrorCategory, HarnessError, Result};
pub use fixture::{Asset, Fixture, FundingRoute, FundingSources, Impersonation, NO_DEADLINE};
pub use report::{RunReport, ScenarioReport, StepReport, StepStatus};
pub use runner::{constructor_args, live_fee_schedule, Runner};
pub use scenario::{Journey, Scenario, Step};
pub use settings::{ForkSettings, RunnerConfig};

// Re-export the sibling crates so downstream users need a single dependency.
pub use vault_harness_config as config;
pub use vault_harness_contracts as contracts;
pub use vault_harness_invariants as invariants;
