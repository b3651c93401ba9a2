//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use vault_harness::Journey;
use vault_harness_config::RouterKind;

/// vaultcheck - run yield-vault scenarios on a forked sandbox
#[derive(Parser, Debug)]
#[command(name = "vaultcheck")]
#[command(about = "Run yield-vault user journeys on a forked sandbox and check their accounting", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run scenarios against one or more deployments
    Run(RunArgs),
    /// Load and validate a deployment config
    Validate(ValidateArgs),
    /// Compute a withdrawal fee offline
    Fee(FeeArgs),
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Deployment config file (repeatable)
    #[arg(long = "config", required = true)]
    pub configs: Vec<PathBuf>,

    /// Journey to run; `all` picks the journey matching each router kind
    #[arg(long, default_value = "all")]
    pub scenario: ScenarioArg,

    /// Tolerance for approximate checks, in base units
    #[arg(long)]
    pub epsilon: Option<String>,

    /// RPC URL to fork from (can also use ETH_RPC_URL env var)
    #[arg(long, env = "ETH_RPC_URL")]
    pub rpc_url: String,

    /// Pin the fork to a block (can also use FORK_BLOCK_NUMBER env var)
    #[arg(long, env = "FORK_BLOCK_NUMBER")]
    pub fork_block_number: Option<u64>,

    /// Per-call timeout in milliseconds
    #[arg(long, env = "HARNESS_CALL_TIMEOUT_MS")]
    pub call_timeout_ms: Option<u64>,

    /// Keep state between scenarios instead of resetting the fork
    #[arg(long)]
    pub no_reset: bool,
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Deployment config file
    #[arg(long)]
    pub config: PathBuf,
}

#[derive(Parser, Debug)]
pub struct FeeArgs {
    /// Gross withdrawal in base units
    #[arg(long)]
    pub amount: String,

    /// Retained fraction numerator
    #[arg(long, default_value_t = 9_990)]
    pub factor: u64,

    /// Denominator of the fee factor
    #[arg(long, default_value_t = 10_000)]
    pub max: u64,

    /// Token decimals used for display
    #[arg(long, default_value_t = 18)]
    pub decimals: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScenarioArg {
    Vaulting,
    Boosted,
    #[default]
    All,
}

impl ScenarioArg {
    /// Journey to run for a deployment of the given kind.
    pub fn journey_for(&self, kind: RouterKind) -> Journey {
        match self {
            Self::Vaulting => Journey::Vaulting,
            Self::Boosted => Journey::Boosted,
            Self::All => Journey::for_kind(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scenario_all_follows_router_kind() {
        assert_eq!(ScenarioArg::All.journey_for(RouterKind::Legacy), Journey::Vaulting);
        assert_eq!(ScenarioArg::All.journey_for(RouterKind::Boosted), Journey::Boosted);
        assert_eq!(ScenarioArg::Vaulting.journey_for(RouterKind::Boosted), Journey::Vaulting);
    }

    #[test]
    fn test_fee_defaults() {
        let cli = Cli::parse_from(["vaultcheck", "fee", "--amount", "1000"]);
        match cli.command {
            Commands::Fee(args) => {
                assert_eq!(args.factor, 9_990);
                assert_eq!(args.max, 10_000);
                assert_eq!(args.decimals, 18);
            }
            other => unreachable!("parsed {other:?}"),
        }
    }
}
