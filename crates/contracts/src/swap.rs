//! Uniswap-V2 style router and pair bindings, used to build LP positions.

use alloy::primitives::{Address, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::binding::{impl_bindable, Binder};
use crate::error::Result;
use crate::prepared_call::PreparedCall;

sol! {
    #[sol(rpc)]
    interface IUniRouter02 {
        function swapExactETHForTokens(
            uint256 amountOutMin,
            address[] calldata path,
            address to,
            uint256 deadline
        ) external payable returns (uint256[] memory amounts);

        function addLiquidity(
            address tokenA,
            address tokenB,
            uint256 amountADesired,
            uint256 amountBDesired,
            uint256 amountAMin,
            uint256 amountBMin,
            address to,
            uint256 deadline
        ) external returns (uint256 amountA, uint256 amountB, uint256 liquidity);

        function getAmountsOut(uint256 amountIn, address[] calldata path)
            external view returns (uint256[] memory amounts);
    }

    #[sol(rpc)]
    interface IUniswapV2Pair {
        function token0() external view returns (address);
        function token1() external view returns (address);
    }
}

/// Handle to a swap router.
#[derive(Clone)]
pub struct SwapRouter {
    address: Address,
    binder: Binder,
}

impl_bindable!(SwapRouter, "swap-router");

impl SwapRouter {
    /// Swap `value` native tokens along `path` (starting at wrapped native)
    /// with no slippage bound. The sandbox has no competing trades.
    pub fn swap_exact_eth_for_tokens(
        &self,
        from: Address,
        value: U256,
        path: Vec<Address>,
        deadline: U256,
    ) -> PreparedCall<'_, IUniRouter02::swapExactETHForTokensCall> {
        let call = IUniRouter02::swapExactETHForTokensCall {
            amountOutMin: U256::ZERO,
            path,
            to: from,
            deadline,
        };
        self.binder
            .prepare(self.address, from, call)
            .with_value(value)
    }

    /// Add all of `amount_a`/`amount_b` to the pair, minting LP tokens to `from`.
    pub fn add_liquidity(
        &self,
        from: Address,
        (token_a, amount_a): (Address, U256),
        (token_b, amount_b): (Address, U256),
        deadline: U256,
    ) -> PreparedCall<'_, IUniRouter02::addLiquidityCall> {
        let call = IUniRouter02::addLiquidityCall {
            tokenA: token_a,
            tokenB: token_b,
            amountADesired: amount_a,
            amountBDesired: amount_b,
            amountAMin: U256::ZERO,
            amountBMin: U256::ZERO,
            to: from,
            deadline,
        };
        self.binder.prepare(self.address, from, call)
    }

    pub async fn amounts_out(&self, amount_in: U256, path: Vec<Address>) -> Result<Vec<U256>> {
        let contract = IUniRouter02::new(self.address, self.binder.provider());
        self.binder
            .read(
                IUniRouter02::getAmountsOutCall::SIGNATURE,
                contract.getAmountsOut(amount_in, path).call(),
            )
            .await
    }
}

/// Handle to an LP pair.
#[derive(Clone)]
pub struct LpPair {
    address: Address,
    binder: Binder,
}

impl_bindable!(LpPair, "lp-pair");

impl LpPair {
    /// `(token0, token1)`.
    pub async fn tokens(&self) -> Result<(Address, Address)> {
        let contract = IUniswapV2Pair::new(self.address, self.binder.provider());
        let token0 = self
            .binder
            .read(IUniswapV2Pair::token0Call::SIGNATURE, contract.token0().call())
            .await?;
        let token1 = self
            .binder
            .read(IUniswapV2Pair::token1Call::SIGNATURE, contract.token1().call())
            .await?;
        Ok((token0, token1))
    }
}

/// Swap path from wrapped native to `token`; empty when `token` is wrapped
/// native itself.
pub fn native_path(wrapped_native: Address, token: Address) -> Vec<Address> {
    if token == wrapped_native {
        Vec::new()
    } else {
        vec![wrapped_native, token]
    }
}
