//! ERC-20 and wrapped-native token bindings.

use alloy::primitives::{Address, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::binding::{impl_bindable, Binder};
use crate::error::Result;
use crate::prepared_call::PreparedCall;

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
        function transfer(address to, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function decimals() external view returns (uint8);
        function symbol() external view returns (string);
    }

    #[sol(rpc)]
    interface IWETH {
        function deposit() external payable;
    }
}

/// Handle to an ERC-20 token.
#[derive(Clone)]
pub struct Erc20 {
    address: Address,
    binder: Binder,
}

impl_bindable!(Erc20, "erc20");

impl Erc20 {
    pub async fn balance_of(&self, owner: Address) -> Result<U256> {
        let contract = IERC20::new(self.address, self.binder.provider());
        self.binder
            .read(IERC20::balanceOfCall::SIGNATURE, contract.balanceOf(owner).call())
            .await
    }

    pub async fn allowance(&self, owner: Address, spender: Address) -> Result<U256> {
        let contract = IERC20::new(self.address, self.binder.provider());
        self.binder
            .read(
                IERC20::allowanceCall::SIGNATURE,
                contract.allowance(owner, spender).call(),
            )
            .await
    }

    pub async fn total_supply(&self) -> Result<U256> {
        let contract = IERC20::new(self.address, self.binder.provider());
        self.binder
            .read(IERC20::totalSupplyCall::SIGNATURE, contract.totalSupply().call())
            .await
    }

    pub async fn decimals(&self) -> Result<u8> {
        let contract = IERC20::new(self.address, self.binder.provider());
        self.binder
            .read(IERC20::decimalsCall::SIGNATURE, contract.decimals().call())
            .await
    }

    pub async fn symbol(&self) -> Result<String> {
        let contract = IERC20::new(self.address, self.binder.provider());
        self.binder
            .read(IERC20::symbolCall::SIGNATURE, contract.symbol().call())
            .await
    }

    pub fn approve(
        &self,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> PreparedCall<'_, IERC20::approveCall> {
        let call = IERC20::approveCall { spender, amount };
        self.binder.prepare(self.address, owner, call)
    }

    pub fn transfer(
        &self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> PreparedCall<'_, IERC20::transferCall> {
        let call = IERC20::transferCall { to, amount };
        self.binder.prepare(self.address, from, call)
    }
}

/// Handle to the chain's wrapped native token.
#[derive(Clone)]
pub struct WrappedNative {
    address: Address,
    binder: Binder,
}

impl_bindable!(WrappedNative, "wrapped-native");

impl WrappedNative {
    /// Wrap `value` native tokens for `from`.
    pub fn deposit(&self, from: Address, value: U256) -> PreparedCall<'_, IWETH::depositCall> {
        self.binder
            .prepare(self.address, from, IWETH::depositCall {})
            .with_value(value)
    }

    /// The same address viewed as a plain ERC-20.
    pub fn as_erc20(&self) -> Erc20 {
        Erc20 {
            address: self.address,
            binder: self.binder.clone(),
        }
    }
}
