//! Strategy bindings.

use alloy::primitives::{Address, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::binding::{impl_bindable, Binder};
use crate::error::Result;

sol! {
    #[sol(rpc)]
    interface IStrategy {
        function vaultChefAddress() external view returns (address);
        function masterchefAddress() external view returns (address);
        function uniRouterAddress() external view returns (address);
        function wantAddress() external view returns (address);
        function earnedAddress() external view returns (address);
        function pid() external view returns (uint256);
        function tolerance() external view returns (uint256);

        function vaultSharesTotal() external view returns (uint256);
        function wantLockedTotal() external view returns (uint256);

        function withdrawFeeFactor() external view returns (uint256);
        function WITHDRAW_FEE_FACTOR_MAX() external view returns (uint256);
    }
}

/// Registration parameters a legacy strategy reports about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyRegistration {
    pub vault_chef: Address,
    pub masterchef: Address,
    pub uni_router: Address,
    pub want: Address,
    pub earned: Address,
    pub pid: U256,
    pub tolerance: U256,
}

/// Handle to a strategy contract.
#[derive(Clone)]
pub struct Strategy {
    address: Address,
    binder: Binder,
}

impl_bindable!(Strategy, "strategy");

impl Strategy {
    /// Read every registration getter.
    pub async fn registration(&self) -> Result<StrategyRegistration> {
        let contract = IStrategy::new(self.address, self.binder.provider());
        let read = &self.binder;

        Ok(StrategyRegistration {
            vault_chef: read
                .read(IStrategy::vaultChefAddressCall::SIGNATURE, contract.vaultChefAddress().call())
                .await?,
            masterchef: read
                .read(IStrategy::masterchefAddressCall::SIGNATURE, contract.masterchefAddress().call())
                .await?,
            uni_router: read
                .read(IStrategy::uniRouterAddressCall::SIGNATURE, contract.uniRouterAddress().call())
                .await?,
            want: read
                .read(IStrategy::wantAddressCall::SIGNATURE, contract.wantAddress().call())
                .await?,
            earned: read
                .read(IStrategy::earnedAddressCall::SIGNATURE, contract.earnedAddress().call())
                .await?,
            pid: read
                .read(IStrategy::pidCall::SIGNATURE, contract.pid().call())
                .await?,
            tolerance: read
                .read(IStrategy::toleranceCall::SIGNATURE, contract.tolerance().call())
                .await?,
        })
    }

    /// Shares the strategy holds in its farm.
    pub async fn vault_shares_total(&self) -> Result<U256> {
        let contract = IStrategy::new(self.address, self.binder.provider());
        self.binder
            .read(IStrategy::vaultSharesTotalCall::SIGNATURE, contract.vaultSharesTotal().call())
            .await
    }

    /// Want tokens attributable to the vault, staked plus idle.
    pub async fn want_locked_total(&self) -> Result<U256> {
        let contract = IStrategy::new(self.address, self.binder.provider());
        self.binder
            .read(IStrategy::wantLockedTotalCall::SIGNATURE, contract.wantLockedTotal().call())
            .await
    }

    /// `(withdrawFeeFactor, WITHDRAW_FEE_FACTOR_MAX)` as deployed.
    pub async fn withdraw_fee_parameters(&self) -> Result<(U256, U256)> {
        let contract = IStrategy::new(self.address, self.binder.provider());
        let factor = self
            .binder
            .read(IStrategy::withdrawFeeFactorCall::SIGNATURE, contract.withdrawFeeFactor().call())
            .await?;
        let max = self
            .binder
            .read(
                IStrategy::WITHDRAW_FEE_FACTOR_MAXCall::SIGNATURE,
                contract.WITHDRAW_FEE_FACTOR_MAX().call(),
            )
            .await?;
        Ok((factor, max))
    }
}
