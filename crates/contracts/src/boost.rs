//! Boost pool bindings.

use alloy::primitives::{Address, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::binding::{impl_bindable, Binder};
use crate::error::Result;

sol! {
    #[sol(rpc)]
    interface IBoostPool {
        function pendingReward(address user) external view returns (uint256);
        function userInfo(address user) external view returns (uint256 amount, uint256 rewardDebt);
    }
}

/// A user's stake in a boost pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoostUserInfo {
    pub amount: U256,
    pub reward_debt: U256,
}

/// Handle to a boost pool.
#[derive(Clone)]
pub struct BoostPool {
    address: Address,
    binder: Binder,
}

impl_bindable!(BoostPool, "boost-pool");

impl BoostPool {
    pub async fn pending_reward(&self, user: Address) -> Result<U256> {
        let contract = IBoostPool::new(self.address, self.binder.provider());
        self.binder
            .read(IBoostPool::pendingRewardCall::SIGNATURE, contract.pendingReward(user).call())
            .await
    }

    pub async fn user_info(&self, user: Address) -> Result<BoostUserInfo> {
        let contract = IBoostPool::new(self.address, self.binder.provider());
        let info = self
            .binder
            .read(IBoostPool::userInfoCall::SIGNATURE, contract.userInfo(user).call())
            .await?;
        Ok(BoostUserInfo {
            amount: info.amount,
            reward_debt: info.rewardDebt,
        })
    }
}
