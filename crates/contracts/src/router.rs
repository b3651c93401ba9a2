//! Vault router bindings.
//!
//! Two router generations are supported. The legacy router registers
//! strategies with `addPool` and takes two-argument `deposit`/`withdraw`.
//! The boosted router creates vaults from an implementation plus config
//! data, tracks shares as ERC-1155 balances and hosts boost pools.

use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionReceipt;
use alloy::sol;
use alloy::sol_types::SolCall;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use crate::binding::{impl_bindable, Binder};
use crate::error::Result;
use crate::events::{decode_earn_outcomes, EarnOutcome, EarnStatus};
use crate::prepared_call::PreparedCall;

sol! {
    #[sol(rpc)]
    interface IVaultHealer {
        event Earned(uint256 indexed vid, uint256 wantLockedTotal, uint256 totalSupply);
        event FailedEarn(uint256 vid, string reason);
        event FailedEarnBytes(uint256 vid, bytes reason);

        function owner() external view returns (address);
        function createVault(address implementation, bytes calldata data) external returns (uint16 vid);
        function numVaultsBase() external view returns (uint16);
        function strat(uint256 vid) external view returns (address);

        function deposit(uint256 vid, uint256 amount, bytes calldata data) external payable;
        function withdraw(uint256 vid, uint256 amount, bytes calldata data) external;
        function balanceOf(address account, uint256 vid) external view returns (uint256);
        function totalSupply(uint256 vid) external view returns (uint256);
        function earn(uint256[] calldata vids) external;

        function createBoost(uint256 vid, address implementation, bytes calldata initdata) external;
        function boostPoolVid(uint256 vid, uint16 n) external view returns (uint256);
        function boostPool(uint256 boostId) external view returns (address);
        function enableBoost(uint256 boostId) external;
        function harvestBoost(uint256 boostId) external;
    }

    #[sol(rpc)]
    interface ILegacyVaultHealer {
        function owner() external view returns (address);
        function addPool(address strategy) external;
        function poolLength() external view returns (uint256);

        function deposit(uint256 pid, uint256 wantAmt) external;
        function withdraw(uint256 pid, uint256 wantAmt) external;
        function stakedWantTokens(uint256 pid, address user) external view returns (uint256);
        function earnSome(uint256[] calldata pids) external;
    }
}

/// Handle to a boosted vault router.
#[derive(Clone)]
pub struct VaultHealer {
    address: Address,
    binder: Binder,
}

impl_bindable!(VaultHealer, "vault-router");

impl VaultHealer {
    pub async fn owner(&self) -> Result<Address> {
        let contract = IVaultHealer::new(self.address, self.binder.provider());
        self.binder
            .read(IVaultHealer::ownerCall::SIGNATURE, contract.owner().call())
            .await
    }

    pub fn create_vault(
        &self,
        from: Address,
        implementation: Address,
        data: Bytes,
    ) -> PreparedCall<'_, IVaultHealer::createVaultCall> {
        let call = IVaultHealer::createVaultCall {
            implementation,
            data,
        };
        self.binder.prepare(self.address, from, call)
    }

    /// Number of base vaults; also the id of the most recently created one.
    pub async fn num_vaults_base(&self) -> Result<U256> {
        let contract = IVaultHealer::new(self.address, self.binder.provider());
        let count = self
            .binder
            .read(IVaultHealer::numVaultsBaseCall::SIGNATURE, contract.numVaultsBase().call())
            .await?;
        Ok(U256::from(count))
    }

    pub async fn strat(&self, vid: U256) -> Result<Address> {
        let contract = IVaultHealer::new(self.address, self.binder.provider());
        self.binder
            .read(IVaultHealer::stratCall::SIGNATURE, contract.strat(vid).call())
            .await
    }

    pub fn deposit(
        &self,
        from: Address,
        vid: U256,
        amount: U256,
    ) -> PreparedCall<'_, IVaultHealer::depositCall> {
        let call = IVaultHealer::depositCall {
            vid,
            amount,
            data: Bytes::new(),
        };
        self.binder.prepare(self.address, from, call)
    }

    pub fn withdraw(
        &self,
        from: Address,
        vid: U256,
        amount: U256,
    ) -> PreparedCall<'_, IVaultHealer::withdrawCall> {
        let call = IVaultHealer::withdrawCall {
            vid,
            amount,
            data: Bytes::new(),
        };
        self.binder.prepare(self.address, from, call)
    }

    /// ERC-1155 share balance.
    pub async fn balance_of(&self, owner: Address, vid: U256) -> Result<U256> {
        let contract = IVaultHealer::new(self.address, self.binder.provider());
        self.binder
            .read(IVaultHealer::balanceOfCall::SIGNATURE, contract.balanceOf(owner, vid).call())
            .await
    }

    pub async fn total_supply(&self, vid: U256) -> Result<U256> {
        let contract = IVaultHealer::new(self.address, self.binder.provider());
        self.binder
            .read(IVaultHealer::totalSupplyCall::SIGNATURE, contract.totalSupply(vid).call())
            .await
    }

    pub fn earn(&self, from: Address, vids: Vec<U256>) -> PreparedCall<'_, IVaultHealer::earnCall> {
        self.binder
            .prepare(self.address, from, IVaultHealer::earnCall { vids })
    }

    pub fn create_boost(
        &self,
        from: Address,
        vid: U256,
        implementation: Address,
        init_data: Bytes,
    ) -> PreparedCall<'_, IVaultHealer::createBoostCall> {
        let call = IVaultHealer::createBoostCall {
            vid,
            implementation,
            initdata: init_data,
        };
        self.binder.prepare(self.address, from, call)
    }

    /// Id of the `n`-th boost attached to `vid`.
    pub async fn boost_pool_vid(&self, vid: U256, n: u16) -> Result<U256> {
        let contract = IVaultHealer::new(self.address, self.binder.provider());
        self.binder
            .read(IVaultHealer::boostPoolVidCall::SIGNATURE, contract.boostPoolVid(vid, n).call())
            .await
    }

    pub async fn boost_pool(&self, boost_id: U256) -> Result<Address> {
        let contract = IVaultHealer::new(self.address, self.binder.provider());
        self.binder
            .read(IVaultHealer::boostPoolCall::SIGNATURE, contract.boostPool(boost_id).call())
            .await
    }

    pub fn enable_boost(
        &self,
        from: Address,
        boost_id: U256,
    ) -> PreparedCall<'_, IVaultHealer::enableBoostCall> {
        let call = IVaultHealer::enableBoostCall { boostId: boost_id };
        self.binder.prepare(self.address, from, call)
    }

    pub fn harvest_boost(
        &self,
        from: Address,
        boost_id: U256,
    ) -> PreparedCall<'_, IVaultHealer::harvestBoostCall> {
        let call = IVaultHealer::harvestBoostCall { boostId: boost_id };
        self.binder.prepare(self.address, from, call)
    }
}

/// Handle to a legacy vault router.
#[derive(Clone)]
pub struct LegacyVaultHealer {
    address: Address,
    binder: Binder,
}

impl_bindable!(LegacyVaultHealer, "legacy-vault-router");

impl LegacyVaultHealer {
    pub async fn owner(&self) -> Result<Address> {
        let contract = ILegacyVaultHealer::new(self.address, self.binder.provider());
        self.binder
            .read(ILegacyVaultHealer::ownerCall::SIGNATURE, contract.owner().call())
            .await
    }

    pub fn add_pool(
        &self,
        from: Address,
        strategy: Address,
    ) -> PreparedCall<'_, ILegacyVaultHealer::addPoolCall> {
        let call = ILegacyVaultHealer::addPoolCall { strategy };
        self.binder.prepare(self.address, from, call)
    }

    pub async fn pool_length(&self) -> Result<U256> {
        let contract = ILegacyVaultHealer::new(self.address, self.binder.provider());
        self.binder
            .read(ILegacyVaultHealer::poolLengthCall::SIGNATURE, contract.poolLength().call())
            .await
    }

    pub fn deposit(
        &self,
        from: Address,
        pid: U256,
        amount: U256,
    ) -> PreparedCall<'_, ILegacyVaultHealer::depositCall> {
        let call = ILegacyVaultHealer::depositCall {
            pid,
            wantAmt: amount,
        };
        self.binder.prepare(self.address, from, call)
    }

    pub fn withdraw(
        &self,
        from: Address,
        pid: U256,
        amount: U256,
    ) -> PreparedCall<'_, ILegacyVaultHealer::withdrawCall> {
        let call = ILegacyVaultHealer::withdrawCall {
            pid,
            wantAmt: amount,
        };
        self.binder.prepare(self.address, from, call)
    }

    pub async fn staked_want_tokens(&self, pid: U256, user: Address) -> Result<U256> {
        let contract = ILegacyVaultHealer::new(self.address, self.binder.provider());
        self.binder
            .read(
                ILegacyVaultHealer::stakedWantTokensCall::SIGNATURE,
                contract.stakedWantTokens(pid, user).call(),
            )
            .await
    }

    pub fn earn_some(
        &self,
        from: Address,
        pids: Vec<U256>,
    ) -> PreparedCall<'_, ILegacyVaultHealer::earnSomeCall> {
        self.binder
            .prepare(self.address, from, ILegacyVaultHealer::earnSomeCall { pids })
    }
}

/// Either router generation behind one position-level surface.
#[derive(Clone)]
pub enum VaultRouter {
    Legacy(LegacyVaultHealer),
    Boosted(VaultHealer),
}

impl VaultRouter {
    pub fn address(&self) -> Address {
        match self {
            Self::Legacy(router) => router.address,
            Self::Boosted(router) => router.address,
        }
    }

    pub async fn owner(&self) -> Result<Address> {
        match self {
            Self::Legacy(router) => router.owner().await,
            Self::Boosted(router) => router.owner().await,
        }
    }

    pub async fn deposit(&self, from: Address, vid: U256, amount: U256) -> Result<TransactionReceipt> {
        match self {
            Self::Legacy(router) => router.deposit(from, vid, amount).send().await,
            Self::Boosted(router) => router.deposit(from, vid, amount).send().await,
        }
    }

    pub async fn withdraw(&self, from: Address, vid: U256, amount: U256) -> Result<TransactionReceipt> {
        match self {
            Self::Legacy(router) => router.withdraw(from, vid, amount).send().await,
            Self::Boosted(router) => router.withdraw(from, vid, amount).send().await,
        }
    }

    /// Position size of `owner` in `vid`: ERC-1155 shares on the boosted
    /// router, staked want tokens on the legacy one.
    pub async fn position(&self, owner: Address, vid: U256) -> Result<U256> {
        match self {
            Self::Legacy(router) => router.staked_want_tokens(vid, owner).await,
            Self::Boosted(router) => router.balance_of(owner, vid).await,
        }
    }

    /// Compound `vids`, publishing one [`EarnOutcome`] per decoded event.
    ///
    /// Partial failures reported through `FailedEarn`/`FailedEarnBytes` are
    /// logged and published, never raised.
    pub async fn earn(
        &self,
        from: Address,
        vids: Vec<U256>,
        outcomes: &UnboundedSender<EarnOutcome>,
    ) -> Result<TransactionReceipt> {
        let receipt = match self {
            Self::Legacy(router) => router.earn_some(from, vids).send().await?,
            Self::Boosted(router) => router.earn(from, vids).send().await?,
        };

        for outcome in decode_earn_outcomes(self.address(), &receipt) {
            match &outcome.status {
                EarnStatus::Compounded { want_locked_total, .. } => {
                    info!(vid = %outcome.vid, %want_locked_total, "compounded");
                }
                EarnStatus::Failed { reason } => {
                    warn!(vid = %outcome.vid, reason, "earn failed for vault");
                }
                EarnStatus::FailedBytes { data } => {
                    warn!(vid = %outcome.vid, %data, "earn failed for vault");
                }
            }
            // A dropped subscriber only loses notifications.
            let _ = outcomes.send(outcome);
        }
        Ok(receipt)
    }

    pub fn as_boosted(&self) -> Option<&VaultHealer> {
        match self {
            Self::Boosted(router) => Some(router),
            Self::Legacy(_) => None,
        }
    }
}
