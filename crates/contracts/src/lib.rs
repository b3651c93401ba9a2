//! Contract binding layer for the yield-vault harness.
//!
//! A [`Binder`] wraps one provider and a per-call timeout. It turns
//! addresses into typed handles ([`Binder::bind`]), refusing addresses with
//! no code, and deploys compiled artifacts ([`Binder::deploy`]). Every
//! mutating call is a [`PreparedCall`] that is awaited to its receipt.
//!
//! # Example
//!
//! ```no_run
//! use alloy::primitives::{address, U256};
//! use vault_harness_contracts::{connect, Bindable, Binder, Erc20};
//!
//! #[tokio::main]
//! async fn main() -> vault_harness_contracts::Result<()> {
//!     let binder = Binder::new(connect("http://localhost:8545")?);
//!
//!     let wmatic = address!("0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270");
//!     let token: Erc20 = binder.bind(wmatic).await?;
//!     let balance = token.balance_of(wmatic).await?;
//!     assert!(balance >= U256::ZERO);
//!     Ok(())
//! }
//! ```

pub mod artifact;
pub mod binding;
pub mod boost;
pub mod erc20;
pub mod error;
pub mod events;
pub mod prepared_call;
pub mod provider;
pub mod router;
pub mod strategy;
pub mod swap;

pub use artifact::Artifact;
pub use binding::{Bindable, Binder, DEFAULT_CALL_TIMEOUT};
pub use boost::{BoostPool, BoostUserInfo};
pub use erc20::{Erc20, WrappedNative};
pub use error::{ContractError, Result};
pub use events::{decode_earn_outcomes, drain, earn_channel, EarnOutcome, EarnStatus};
pub use prepared_call::PreparedCall;
pub use provider::{connect, HarnessProvider};
pub use router::{LegacyVaultHealer, VaultHealer, VaultRouter};
pub use strategy::{Strategy, StrategyRegistration};
pub use swap::{native_path, LpPair, SwapRouter};
