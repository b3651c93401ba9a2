//! The chain fixture: a sandbox node plus the privileged operations the
//! scenarios need (impersonation, balance minting, block production).

use alloy::{
    node_bindings::{Anvil, AnvilInstance},
    primitives::{keccak256, Address, U256},
    providers::{ext::AnvilApi, Provider},
    rpc::types::anvil::Forking,
    sol_types::SolValue,
};
use tracing::{debug, info};
use vault_harness_config::{format_amount, FundingConfig, DEFAULT_DECIMALS};
use vault_harness_contracts::{
    connect, native_path, Bindable, Binder, Erc20, HarnessProvider, SwapRouter, WrappedNative,
};

use crate::error::{HarnessError, Result};
use crate::settings::{ForkSettings, RunnerConfig};

/// Deadline passed to router calls; the sandbox clock only moves when we mine.
pub const NO_DEADLINE: U256 = U256::MAX;

/// What to fund an identity with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asset {
    Native,
    Token(Address),
}

/// How a token balance was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FundingRoute {
    /// Direct write of the `balanceOf` mapping slot.
    StorageSlot(u64),
    /// `deposit()` on the wrapped native token.
    WrapNative,
    /// `swapExactETHForTokens` on the swap router.
    Swap,
}

/// Token sources available to [`Fixture::fund`].
#[derive(Debug, Clone)]
pub struct FundingSources<'a> {
    pub config: &'a FundingConfig,
    pub wrapped_native: Address,
    pub swap_router: Address,
}

impl FundingSources<'_> {
    /// Pick the funding route for `token`, in order of preference.
    pub fn route_for(&self, token: Address) -> FundingRoute {
        if let Some(slot) = self.config.balance_slots.get(&token) {
            FundingRoute::StorageSlot(*slot)
        } else if token == self.wrapped_native {
            FundingRoute::WrapNative
        } else {
            FundingRoute::Swap
        }
    }

    /// Swap route from wrapped native to `token`: the configured path if
    /// there is one, else the direct pair.
    pub fn swap_path(&self, token: Address) -> Vec<Address> {
        self.config
            .swap_paths
            .get(&token)
            .cloned()
            .unwrap_or_else(|| native_path(self.wrapped_native, token))
    }
}

/// A fixture-scoped right to send transactions as an account the sandbox
/// does not hold keys for.
///
/// Only [`Fixture::impersonate`] creates one. It is released by
/// [`Fixture::release`] or by [`Fixture::reset`].
#[derive(Debug, PartialEq, Eq)]
pub struct Impersonation {
    address: Address,
}

impl Impersonation {
    pub fn address(&self) -> Address {
        self.address
    }
}

/// A running sandbox node and the handles bound against it.
pub struct Fixture {
    // Dropping the instance kills the node.
    _anvil: Option<AnvilInstance>,
    endpoint: String,
    fork: Option<ForkSettings>,
    provider: HarnessProvider,
    binder: Binder,
    signers: Vec<Address>,
    impersonating: Vec<Address>,
}

impl Fixture {
    /// Spawn a forked Anvil node.
    pub async fn spawn(fork: ForkSettings, config: &RunnerConfig) -> Result<Self> {
        let mut anvil = Anvil::new()
            .fork(&fork.rpc_url)
            .arg("--compute-units-per-second")
            .arg(fork.compute_units_per_second.to_string())
            .arg("--retries")
            .arg(fork.retries.to_string())
            .arg("--fork-retry-backoff")
            .arg(fork.fork_retry_backoff_ms.to_string())
            .timeout(fork.timeout_ms);
        if let Some(block) = fork.block_number {
            anvil = anvil.fork_block_number(block);
        }
        let anvil = anvil
            .try_spawn()
            .map_err(|e| HarnessError::Setup(format!("Failed to spawn forked Anvil: {}", e)))?;

        info!(endpoint = %anvil.endpoint(), block = ?fork.block_number, "spawned forked sandbox");
        Self::from_parts(Some(anvil), Some(fork), config).await
    }

    /// Spawn a fresh, non-forked Anvil node.
    pub async fn spawn_local(config: &RunnerConfig) -> Result<Self> {
        let anvil = Anvil::new()
            .try_spawn()
            .map_err(|e| HarnessError::Setup(format!("Failed to spawn Anvil: {}", e)))?;
        Self::from_parts(Some(anvil), None, config).await
    }

    async fn from_parts(
        anvil: Option<AnvilInstance>,
        fork: Option<ForkSettings>,
        config: &RunnerConfig,
    ) -> Result<Self> {
        let endpoint = anvil
            .as_ref()
            .map(|a| a.endpoint())
            .ok_or_else(|| HarnessError::Setup("no sandbox endpoint".to_string()))?;
        let provider = connect(&endpoint)?;
        let signers = provider
            .get_accounts()
            .await
            .map_err(|e| HarnessError::Setup(format!("Failed to list dev accounts: {}", e)))?;
        let binder = Binder::new(provider.clone()).with_call_timeout(config.call_timeout);

        Ok(Self {
            _anvil: anvil,
            endpoint,
            fork,
            provider,
            binder,
            signers,
            impersonating: Vec::new(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn is_forked(&self) -> bool {
        self.fork.is_some()
    }

    pub fn provider(&self) -> &HarnessProvider {
        &self.provider
    }

    pub fn binder(&self) -> &Binder {
        &self.binder
    }

    /// Funded dev identities, in node order.
    pub fn signers(&self) -> &[Address] {
        &self.signers
    }

    /// Accounts currently impersonated.
    pub fn impersonating(&self) -> &[Address] {
        &self.impersonating
    }

    /// Return the fork to its configured block, dropping all impersonations.
    pub async fn reset(&mut self) -> Result<()> {
        for address in std::mem::take(&mut self.impersonating) {
            self.provider
                .anvil_stop_impersonating_account(address)
                .await
                .map_err(|e| setup("anvil_stopImpersonatingAccount", &e))?;
        }

        let forking = self.fork.as_ref().map(|fork| {
            let mut forking = Forking::default();
            forking.json_rpc_url = Some(fork.rpc_url.clone());
            forking.block_number = fork.block_number;
            forking
        });
        self.provider
            .anvil_reset(forking)
            .await
            .map_err(|e| setup("anvil_reset", &e))?;

        info!(block = self.block_number().await?, "sandbox reset");
        Ok(())
    }

    /// Act as `address`. Only available on a forked sandbox.
    pub async fn impersonate(&mut self, address: Address) -> Result<Impersonation> {
        if !self.is_forked() {
            return Err(HarnessError::Setup(format!(
                "cannot impersonate {address} outside a forked sandbox"
            )));
        }
        self.provider
            .anvil_impersonate_account(address)
            .await
            .map_err(|e| setup("anvil_impersonateAccount", &e))?;
        self.impersonating.push(address);

        debug!(%address, "impersonating");
        Ok(Impersonation { address })
    }

    /// Give up an impersonation before the next reset.
    pub async fn release(&mut self, impersonation: Impersonation) -> Result<()> {
        self.provider
            .anvil_stop_impersonating_account(impersonation.address)
            .await
            .map_err(|e| setup("anvil_stopImpersonatingAccount", &e))?;
        self.impersonating.retain(|a| *a != impersonation.address);
        Ok(())
    }

    /// Set the native balance of `identity`.
    pub async fn set_native_balance(&self, identity: Address, amount: U256) -> Result<()> {
        self.provider
            .anvil_set_balance(identity, amount)
            .await
            .map_err(|e| setup("anvil_setBalance", &e))
    }

    /// Fund `identity` with `asset` and return the resulting balance increase.
    ///
    /// Native funding sets the balance to `amount`. Token funding follows
    /// [`FundingSources::route_for`]: a storage write or a wrap credits
    /// exactly `amount` tokens, while a swap spends `amount` native and
    /// credits whatever the pool returns.
    pub async fn fund(
        &self,
        identity: Address,
        asset: Asset,
        amount: U256,
        sources: &FundingSources<'_>,
    ) -> Result<U256> {
        let token = match asset {
            Asset::Native => {
                self.set_native_balance(identity, amount).await?;
                return Ok(amount);
            }
            Asset::Token(token) => token,
        };

        let erc20: Erc20 = self.binder.bind(token).await?;
        let before = erc20.balance_of(identity).await?;
        let route = sources.route_for(token);

        match route {
            FundingRoute::StorageSlot(slot) => {
                // balanceOf[identity] lives at keccak256(abi.encode(identity, slot)).
                let slot_hash = keccak256((identity, U256::from(slot)).abi_encode());
                self.provider
                    .anvil_set_storage_at(token, slot_hash.into(), (before + amount).into())
                    .await
                    .map_err(|e| setup("anvil_setStorageAt", &e))?;
            }
            FundingRoute::WrapNative => {
                let wrapped: WrappedNative = self.binder.bind(token).await?;
                wrapped.deposit(identity, amount).send().await?;
            }
            FundingRoute::Swap => {
                let router: SwapRouter = self.binder.bind(sources.swap_router).await?;
                router
                    .swap_exact_eth_for_tokens(
                        identity,
                        amount,
                        sources.swap_path(token),
                        NO_DEADLINE,
                    )
                    .send()
                    .await?;
            }
        }

        let after = erc20.balance_of(identity).await?;
        let credited = after.saturating_sub(before);
        debug!(
            %identity,
            %token,
            ?route,
            credited = %format_amount(credited, DEFAULT_DECIMALS),
            "funded"
        );
        Ok(credited)
    }

    /// Mine `blocks` blocks.
    pub async fn advance(&self, blocks: u64) -> Result<()> {
        self.provider
            .anvil_mine(Some(blocks), None)
            .await
            .map_err(|e| setup("anvil_mine", &e))?;
        debug!(blocks, "advanced");
        Ok(())
    }

    pub async fn block_number(&self) -> Result<u64> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| setup("eth_blockNumber", &e))
    }

    pub async fn native_balance(&self, identity: Address) -> Result<U256> {
        self.provider
            .get_balance(identity)
            .await
            .map_err(|e| setup("eth_getBalance", &e))
    }

    /// Check that `address` is a handle of kind `H` with deployed code.
    pub async fn bind<H: Bindable>(&self, address: Address) -> Result<H> {
        Ok(self.binder.bind(address).await?)
    }
}

fn setup(method: &str, err: &impl std::fmt::Display) -> HarnessError {
    HarnessError::Setup(format!("{method} failed: {err}"))
}
