//! Scenario execution.
//!
//! A [`Runner`] owns the [`Fixture`] and executes one [`Scenario`] at a time
//! against it. Each step performs its action, takes snapshots around it and
//! hands them to the [`InvariantChecker`] held in the [`ScenarioContext`].
//!
//! A failing step ends its scenario: the remaining steps are reported as
//! skipped. Only sandbox failures end the run; a deployment that cannot be
//! used fails its own scenario and the next one starts from a reset fork.

use std::time::Instant;

use alloy::{
    primitives::{Address, Bytes, U256},
    sol_types::SolValue,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info, info_span, warn, Instrument};
use vault_harness_config::{
    format_amount, ConfigError, ConstructorArgs, ContractSource, DeploymentConfig, RouterKind,
    DEFAULT_DECIMALS,
};
use vault_harness_contracts::{
    drain, earn_channel, BoostPool, EarnOutcome, Erc20, LegacyVaultHealer, LpPair, Strategy,
    SwapRouter, VaultHealer, VaultRouter,
};
use vault_harness_invariants::{
    mul_div_down, Delta, FeeSchedule, InvariantChecker, ShareRatio, Snapshot,
};

use crate::context::{Actor, ScenarioContext};
use crate::error::{HarnessError, Result};
use crate::fixture::{Asset, Fixture, FundingSources, NO_DEADLINE};
use crate::report::{RunReport, ScenarioReport, StepReport, StepStatus};
use crate::scenario::{Scenario, Step};
use crate::settings::RunnerConfig;

/// Runs scenarios against a fixture.
pub struct Runner {
    fixture: Fixture,
    config: RunnerConfig,
}

impl Runner {
    pub fn new(fixture: Fixture, config: RunnerConfig) -> Self {
        Self { fixture, config }
    }

    pub fn fixture(&self) -> &Fixture {
        &self.fixture
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run every `(deployment, scenario)` pair in order.
    ///
    /// Stops at the first sandbox failure and records it in
    /// [`RunReport::aborted`].
    pub async fn run_all(&mut self, jobs: &[(DeploymentConfig, Scenario)]) -> RunReport {
        let mut report = RunReport::default();

        for (deployment, scenario) in jobs {
            match self.run(deployment, scenario).await {
                Ok(scenario_report) => {
                    let fatal = abort_reason(&scenario_report);
                    report.scenarios.push(scenario_report);
                    if let Some(reason) = fatal {
                        error!(scenario = %scenario.name, deployment = %deployment.name, %reason, "run aborted");
                        report.aborted = Some(reason);
                        break;
                    }
                }
                Err(err) => {
                    error!(scenario = %scenario.name, deployment = %deployment.name, error = %err, "run aborted");
                    report.aborted = Some(err.to_string());
                    break;
                }
            }
        }

        report
    }

    /// Run one scenario against one deployment.
    ///
    /// Step failures are recorded in the returned report, as is a scenario
    /// that does not fit the deployment's router. `Err` is returned only
    /// when the sandbox cannot be reset.
    pub async fn run(
        &mut self,
        deployment: &DeploymentConfig,
        scenario: &Scenario,
    ) -> Result<ScenarioReport> {
        if scenario.kind != deployment.router_kind {
            let err = HarnessError::from(ConfigError::Invalid {
                field: "router_kind",
                reason: format!(
                    "scenario `{}` needs a {} router but deployment `{}` is {}",
                    scenario.name, scenario.kind, deployment.name, deployment.router_kind
                ),
            });
            warn!(scenario = %scenario.name, deployment = %deployment.name, error = %err, "scenario not started");
            return Ok(ScenarioReport::not_started(scenario, deployment, &err));
        }

        if self.config.reset_between_scenarios {
            self.fixture.reset().await?;
        }

        let checker =
            InvariantChecker::new(deployment.fees.withdraw).with_epsilon(self.config.epsilon);
        let mut ctx = ScenarioContext::new(deployment.clone(), checker);
        let (earn_tx, mut earn_rx) = earn_channel();

        info!(
            scenario = %scenario.name,
            deployment = %deployment.name,
            router_kind = %deployment.router_kind,
            steps = scenario.steps.len(),
            "running scenario"
        );

        let mut steps = Vec::with_capacity(scenario.steps.len());
        let mut ended = false;

        for step in &scenario.steps {
            let label = step.label();
            if ended {
                steps.push(StepReport {
                    step: label,
                    status: StepStatus::Skipped,
                    block: None,
                    duration_ms: 0,
                });
                continue;
            }

            let span = info_span!("step", scenario = %scenario.name, step = %label);
            let started = Instant::now();
            let outcome = self
                .execute(*step, &label, &mut ctx, &earn_tx)
                .instrument(span)
                .await;
            let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            ctx.earn_outcomes.extend(drain(&mut earn_rx));

            let status = match outcome {
                Ok(()) => {
                    info!(step = %label, duration_ms, "step passed");
                    StepStatus::Passed
                }
                Err(err) => {
                    warn!(step = %label, category = %err.category(), error = %err, "step failed");
                    ended = true;
                    StepStatus::from_error(&err)
                }
            };
            steps.push(StepReport {
                step: label,
                status,
                block: self.fixture.block_number().await.ok(),
                duration_ms,
            });
        }

        if let Some(impersonation) = ctx.admin_impersonation.take() {
            if let Err(err) = self.fixture.release(impersonation).await {
                warn!(error = %err, "could not release admin impersonation");
            }
        }

        let report = ScenarioReport {
            scenario: scenario.name.clone(),
            deployment: deployment.name.clone(),
            router_kind: deployment.router_kind,
            fees: *ctx.checker.fees(),
            fees_live: ctx.fees_live,
            steps,
            ledger: ctx.ledger,
            earn_outcomes: ctx.earn_outcomes,
            snapshots: ctx.snapshots,
        };
        info!(
            scenario = %report.scenario,
            passed = report.passed(),
            "scenario finished"
        );
        Ok(report)
    }

    async fn execute(
        &mut self,
        step: Step,
        label: &str,
        ctx: &mut ScenarioContext,
        earn_tx: &UnboundedSender<EarnOutcome>,
    ) -> Result<()> {
        match step {
            Step::ProvisionPool => self.provision_pool(ctx).await,
            Step::VerifyRegistration => self.verify_registration(label, ctx).await,
            Step::ProvisionLiquidity => self.provision_liquidity(label, ctx).await,
            Step::Deposit(actor) => self.deposit(label, ctx, actor).await,
            Step::EnableBoost(actor) => self.enable_boost(label, ctx, actor).await,
            Step::AccrueBoost(actor) => self.accrue_boost(label, ctx, actor).await,
            Step::HarvestBoost(actor) => self.harvest_boost(label, ctx, actor).await,
            Step::Earn => self.earn(label, ctx, earn_tx).await,
            Step::PartialWithdraw(actor) => self.partial_withdraw(label, ctx, actor).await,
            Step::FullWithdraw(actor) => self.full_withdraw(label, ctx, actor).await,
            Step::AssertEmpty(actor) => self.assert_empty(label, ctx, actor).await,
        }
    }

    async fn provision_pool(&mut self, ctx: &mut ScenarioContext) -> Result<()> {
        const STEP: &str = "provision_pool";
        let deployment = ctx.deployment.clone();

        let needed = deployment.scenario.depositors + 1;
        let signers = self.fixture.signers();
        if signers.len() < needed {
            return Err(HarnessError::Setup(format!(
                "{needed} dev identities required, sandbox has {}",
                signers.len()
            )));
        }
        let deployer = signers[0];
        ctx.depositors = signers[1..needed].to_vec();

        let (router_address, deployed) = match &deployment.vault_router {
            ContractSource::Existing { address } => (*address, false),
            ContractSource::Deploy {
                artifact,
                constructor,
            } => {
                if matches!(constructor, ConstructorArgs::VaultRouter) {
                    return Err(ConfigError::Invalid {
                        field: "vault_router.constructor",
                        reason: "the router cannot take its own address".to_string(),
                    }
                    .into());
                }
                let args = constructor_args(constructor, Address::ZERO);
                let address = self
                    .fixture
                    .binder()
                    .deploy_artifact(deployer, artifact, &args)
                    .await?;
                info!(%address, "deployed vault router");
                (address, true)
            }
        };

        let router = match deployment.router_kind {
            RouterKind::Legacy => {
                VaultRouter::Legacy(self.fixture.bind::<LegacyVaultHealer>(router_address).await?)
            }
            RouterKind::Boosted => {
                VaultRouter::Boosted(self.fixture.bind::<VaultHealer>(router_address).await?)
            }
        };

        let admin = if deployed {
            deployer
        } else {
            let owner = router.owner().await?;
            let impersonation = self.fixture.impersonate(owner).await?;
            self.fixture
                .set_native_balance(owner, deployment.funding.native_balance)
                .await?;
            ctx.admin_impersonation = Some(impersonation);
            owner
        };
        ctx.admin = Some(admin);

        let args = constructor_args(&deployment.strategy.constructor, router_address);
        let implementation = self
            .fixture
            .binder()
            .deploy_artifact(admin, &deployment.strategy.artifact, &args)
            .await?;

        let (vid, strategy_address) = match &router {
            VaultRouter::Legacy(legacy) => {
                legacy.add_pool(admin, implementation).send().await?;
                let vid = legacy
                    .pool_length()
                    .await?
                    .checked_sub(U256::from(1))
                    .ok_or(HarnessError::MissingPrerequisite {
                        step: STEP,
                        missing: "a registered pool",
                    })?;
                (vid, implementation)
            }
            VaultRouter::Boosted(boosted) => {
                let data = deployment
                    .strategy
                    .deployment_data
                    .clone()
                    .ok_or(ConfigError::Missing {
                        field: "strategy.deployment_data",
                        router_kind: RouterKind::Boosted.as_str(),
                    })?;
                boosted.create_vault(admin, implementation, data).send().await?;
                let vid = boosted.num_vaults_base().await?;
                (vid, boosted.strat(vid).await?)
            }
        };
        let strategy: Strategy = self.fixture.bind(strategy_address).await?;
        info!(%vid, strategy = %strategy_address, "registered strategy");

        if deployment.fees.read_live {
            match strategy.withdraw_fee_parameters().await {
                Ok((factor, max)) => match live_fee_schedule(factor, max) {
                    Some(fees) => {
                        ctx.checker = ctx.checker.with_fees(fees);
                        ctx.fees_live = true;
                        info!(factor = fees.factor(), max = fees.max(), "using live fee schedule");
                    }
                    None => warn!(%factor, %max, "unusable live fee schedule; using configured one"),
                },
                Err(err) => warn!(error = %err, "fee parameters unavailable; using configured schedule"),
            }
        }

        if let (VaultRouter::Boosted(boosted), Some(boost)) = (&router, &deployment.boost) {
            let args = constructor_args(&boost.constructor, router_address);
            let boost_impl = self
                .fixture
                .binder()
                .deploy_artifact(admin, &boost.artifact, &args)
                .await?;
            boosted
                .create_boost(admin, vid, boost_impl, boost.init_data.clone())
                .send()
                .await?;
            let boost_id = boosted.boost_pool_vid(vid, 0).await?;
            let pool_address = boosted.boost_pool(boost_id).await?;
            let pool: BoostPool = self.fixture.bind(pool_address).await?;

            if !boost.reward_funding.is_zero() {
                let sources = FundingSources {
                    config: &deployment.funding,
                    wrapped_native: deployment.wrapped_native,
                    swap_router: boost.reward_router,
                };
                let rewards = self
                    .fixture
                    .fund(admin, Asset::Token(boost.reward_token), boost.reward_funding, &sources)
                    .await?;
                let reward_token: Erc20 = self.fixture.bind(boost.reward_token).await?;
                reward_token
                    .transfer(admin, pool_address, rewards)
                    .send()
                    .await?;
                info!(
                    pool = %pool_address,
                    rewards = %format_amount(rewards, DEFAULT_DECIMALS),
                    "funded boost pool"
                );
            }

            ctx.boost_id = Some(boost_id);
            ctx.boost_pool = Some(pool);
        }

        ctx.router = Some(router);
        ctx.strategy = Some(strategy);
        ctx.vid = Some(vid);
        Ok(())
    }

    async fn verify_registration(&self, label: &str, ctx: &mut ScenarioContext) -> Result<()> {
        const STEP: &str = "verify_registration";
        let router = ctx.router(STEP)?.clone();
        let strategy = ctx.strategy(STEP)?.clone();
        let vid = ctx.vid(STEP)?;
        let checker = ctx.checker;
        let deployment = &ctx.deployment;

        match &router {
            VaultRouter::Legacy(_) => {
                let registration = strategy.registration().await?;
                let addresses = [
                    ("vault_chef", router.address(), registration.vault_chef),
                    ("masterchef", deployment.farm.masterchef, registration.masterchef),
                    ("uni_router", deployment.swap_router, registration.uni_router),
                    ("want", deployment.want, registration.want),
                    ("earned", deployment.primary_earned(), registration.earned),
                ];
                for (what, expected, actual) in addresses {
                    checker.equal(label, what, address_word(expected), address_word(actual))?;
                }
                checker.equal(label, "pid", U256::from(deployment.farm.pid), registration.pid)?;
                checker.equal(
                    label,
                    "tolerance",
                    U256::from(deployment.farm.tolerance),
                    registration.tolerance,
                )?;
            }
            VaultRouter::Boosted(boosted) => {
                checker.equal(label, "want_locked_total", U256::ZERO, strategy.want_locked_total().await?)?;
                checker.equal(label, "vault_shares_total", U256::ZERO, strategy.vault_shares_total().await?)?;
                checker.equal(label, "total_supply", U256::ZERO, boosted.total_supply(vid).await?)?;
            }
        }
        Ok(())
    }

    async fn provision_liquidity(&self, label: &str, ctx: &mut ScenarioContext) -> Result<()> {
        const STEP: &str = "provision_liquidity";
        let router_address = ctx.router(STEP)?.address();
        let deployment = ctx.deployment.clone();
        let checker = ctx.checker;

        let pair: LpPair = self.fixture.bind(deployment.want).await?;
        let (token0, token1) = pair.tokens().await?;
        let swap: SwapRouter = self.fixture.bind(deployment.swap_router).await?;
        let want: Erc20 = self.fixture.bind(deployment.want).await?;
        let erc0: Erc20 = self.fixture.bind(token0).await?;
        let erc1: Erc20 = self.fixture.bind(token1).await?;
        let sources = FundingSources {
            config: &deployment.funding,
            wrapped_native: deployment.wrapped_native,
            swap_router: deployment.swap_router,
        };

        for user in ctx.depositors.clone() {
            self.fixture
                .fund(user, Asset::Native, deployment.funding.native_balance, &sources)
                .await?;
            let amount0 = self
                .fixture
                .fund(user, Asset::Token(token0), deployment.funding.swap_value, &sources)
                .await?;
            let amount1 = self
                .fixture
                .fund(user, Asset::Token(token1), deployment.funding.swap_value, &sources)
                .await?;

            erc0.approve(user, deployment.swap_router, amount0).send().await?;
            erc1.approve(user, deployment.swap_router, amount1).send().await?;

            let before = self
                .snapshot(ctx, format!("lp_balance({user})"), want.balance_of(user).await?)
                .await?;
            swap.add_liquidity(user, (token0, amount0), (token1, amount1), NO_DEADLINE)
                .send()
                .await?;
            let after = self
                .snapshot(ctx, format!("lp_balance({user})"), want.balance_of(user).await?)
                .await?;
            checker.strictly_increased(label, &Delta::new(before, after.clone()))?;

            want.approve(user, router_address, U256::MAX).send().await?;
            info!(
                %user,
                lp = %format_amount(after.value, DEFAULT_DECIMALS),
                "provisioned liquidity"
            );
        }
        Ok(())
    }

    async fn deposit(&self, label: &str, ctx: &mut ScenarioContext, actor: Actor) -> Result<()> {
        const STEP: &str = "deposit";
        let user = ctx.actor(STEP, actor)?;
        let router = ctx.router(STEP)?.clone();
        let strategy = ctx.strategy(STEP)?.clone();
        let vid = ctx.vid(STEP)?;
        let checker = ctx.checker;
        let want: Erc20 = self.fixture.bind(ctx.deployment.want).await?;

        let amount = want.balance_of(user).await?;
        if amount.is_zero() {
            return Err(HarnessError::MissingPrerequisite {
                step: STEP,
                missing: "an LP balance",
            });
        }

        let lp_before = self.snapshot(ctx, format!("lp_balance({user})"), amount).await?;
        let locked_before = self
            .snapshot(ctx, "want_locked_total", strategy.want_locked_total().await?)
            .await?;
        let shares_before = share_total(&router, &strategy, vid).await?;
        let value_before = position_value(&router, &strategy, user, vid).await?;

        router.deposit(user, vid, amount).await?;

        let lp_after = self
            .snapshot(ctx, format!("lp_balance({user})"), want.balance_of(user).await?)
            .await?;
        let locked_after = self
            .snapshot(ctx, "want_locked_total", strategy.want_locked_total().await?)
            .await?;
        ctx.ledger.record_deposit(amount);
        info!(%user, %vid, amount = %format_amount(amount, DEFAULT_DECIMALS), "deposited");

        checker.conservation(
            label,
            &Delta::new(locked_before, locked_after.clone()),
            &Delta::new(lp_before, lp_after),
        )?;

        if shares_before.is_zero() {
            let shares_after = share_total(&router, &strategy, vid).await?;
            checker.first_deposit(label, amount, shares_after)?;
        } else {
            let value_after = position_value(&router, &strategy, user, vid).await?;
            checker.close_to(
                label,
                "position value gained",
                amount,
                value_after.saturating_sub(value_before),
            )?;
        }

        checker.ledger_balanced(label, &ctx.ledger, locked_after.value)?;
        Ok(())
    }

    async fn enable_boost(&self, label: &str, ctx: &mut ScenarioContext, actor: Actor) -> Result<()> {
        const STEP: &str = "enable_boost";
        let user = ctx.actor(STEP, actor)?;
        let router = ctx.router(STEP)?.clone();
        let boosted = boosted_router(STEP, &router)?;
        let vid = ctx.vid(STEP)?;
        let (boost_id, pool) = ctx.boost(STEP)?;
        let pool = pool.clone();

        self.fixture
            .advance(ctx.deployment.scenario.boost_warmup_blocks)
            .await?;
        let shares = boosted.balance_of(user, vid).await?;
        boosted.enable_boost(user, boost_id).send().await?;
        ctx.boost_enabled = true;

        let staked = pool.user_info(user).await?.amount;
        info!(%user, %boost_id, staked = %format_amount(staked, DEFAULT_DECIMALS), "boost enabled");
        ctx.checker.equal(label, "boost stake", shares, staked)?;
        Ok(())
    }

    async fn accrue_boost(&self, label: &str, ctx: &mut ScenarioContext, actor: Actor) -> Result<()> {
        const STEP: &str = "accrue_boost";
        let user = ctx.actor(STEP, actor)?;
        let pool = ctx.boost(STEP)?.1.clone();

        let before = self
            .snapshot(ctx, format!("pending_reward({user})"), pool.pending_reward(user).await?)
            .await?;
        self.fixture
            .advance(ctx.deployment.scenario.boost_accrual_blocks)
            .await?;
        let after = self
            .snapshot(ctx, format!("pending_reward({user})"), pool.pending_reward(user).await?)
            .await?;

        ctx.checker
            .strictly_increased(label, &Delta::new(before, after))?;
        Ok(())
    }

    async fn harvest_boost(&self, label: &str, ctx: &mut ScenarioContext, actor: Actor) -> Result<()> {
        const STEP: &str = "harvest_boost";
        let user = ctx.actor(STEP, actor)?;
        let router = ctx.router(STEP)?.clone();
        let boosted = boosted_router(STEP, &router)?;
        let boost_id = ctx.boost(STEP)?.0;
        let reward_address = ctx
            .deployment
            .boost
            .as_ref()
            .map(|boost| boost.reward_token)
            .ok_or(HarnessError::MissingPrerequisite {
                step: STEP,
                missing: "a boost configuration",
            })?;
        let reward: Erc20 = self.fixture.bind(reward_address).await?;

        let before = self
            .snapshot(ctx, format!("reward_balance({user})"), reward.balance_of(user).await?)
            .await?;
        boosted.harvest_boost(user, boost_id).send().await?;
        let after = self
            .snapshot(ctx, format!("reward_balance({user})"), reward.balance_of(user).await?)
            .await?;

        let delta = Delta::new(before, after);
        info!(%user, harvested = %format_amount(delta.gained(), DEFAULT_DECIMALS), "harvested boost");
        ctx.checker.strictly_increased(label, &delta)?;
        Ok(())
    }

    async fn earn(
        &self,
        label: &str,
        ctx: &mut ScenarioContext,
        earn_tx: &UnboundedSender<EarnOutcome>,
    ) -> Result<()> {
        const STEP: &str = "earn";
        let admin = ctx.actor(STEP, Actor::Admin)?;
        let router = ctx.router(STEP)?.clone();
        let strategy = ctx.strategy(STEP)?.clone();
        let vid = ctx.vid(STEP)?;
        let checker = ctx.checker;
        let recipient = ctx.deployment.fees.recipient;

        self.fixture
            .advance(ctx.deployment.scenario.earn_delay_blocks)
            .await?;

        let shares_before = self
            .snapshot(ctx, "vault_shares_total", strategy.vault_shares_total().await?)
            .await?;
        let locked_before = self
            .snapshot(ctx, "want_locked_total", strategy.want_locked_total().await?)
            .await?;
        let ratio_before = share_ratio(&router, vid, locked_before.value).await?;
        let recipient_before = match recipient {
            Some(address) => Some(
                self.snapshot(ctx, format!("native_balance({address})"), self.fixture.native_balance(address).await?)
                    .await?,
            ),
            None => None,
        };

        router.earn(admin, vec![vid], earn_tx).await?;

        let shares_after = self
            .snapshot(ctx, "vault_shares_total", strategy.vault_shares_total().await?)
            .await?;
        let locked_after = self
            .snapshot(ctx, "want_locked_total", strategy.want_locked_total().await?)
            .await?;
        let growth = locked_after.value.saturating_sub(locked_before.value);
        ctx.ledger.record_compound(growth);
        info!(%vid, growth = %format_amount(growth, DEFAULT_DECIMALS), "earned");

        checker.non_decreasing(label, &Delta::new(locked_before, locked_after.clone()))?;
        checker.strictly_increased(label, &Delta::new(shares_before, shares_after))?;

        if let Some(before) = ratio_before {
            if let Some(after) = share_ratio(&router, vid, locked_after.value).await? {
                checker.share_ratio_held(label, &before, &after)?;
            }
        }

        if let (Some(address), Some(before)) = (recipient, recipient_before) {
            let after = self
                .snapshot(ctx, format!("native_balance({address})"), self.fixture.native_balance(address).await?)
                .await?;
            checker.strictly_increased(label, &Delta::new(before, after))?;
        }

        checker.ledger_balanced(label, &ctx.ledger, locked_after.value)?;
        Ok(())
    }

    async fn partial_withdraw(
        &self,
        label: &str,
        ctx: &mut ScenarioContext,
        actor: Actor,
    ) -> Result<()> {
        const STEP: &str = "partial_withdraw";
        let user = ctx.actor(STEP, actor)?;
        let router = ctx.router(STEP)?.clone();
        let strategy = ctx.strategy(STEP)?.clone();
        let vid = ctx.vid(STEP)?;
        let checker = ctx.checker;
        let want: Erc20 = self.fixture.bind(ctx.deployment.want).await?;

        let gross = position_value(&router, &strategy, user, vid).await? / U256::from(2);
        if gross.is_zero() {
            return Err(HarnessError::MissingPrerequisite {
                step: STEP,
                missing: "a vault position",
            });
        }

        let lp_before = self
            .snapshot(ctx, format!("lp_balance({user})"), want.balance_of(user).await?)
            .await?;
        router.withdraw(user, vid, gross).await?;
        let lp_after = self
            .snapshot(ctx, format!("lp_balance({user})"), want.balance_of(user).await?)
            .await?;
        let locked_after = self
            .snapshot(ctx, "want_locked_total", strategy.want_locked_total().await?)
            .await?;

        let received = Delta::new(lp_before, lp_after).gained();
        ctx.ledger.record_withdrawal(gross, received);
        info!(
            %user,
            gross = %format_amount(gross, DEFAULT_DECIMALS),
            received = %format_amount(received, DEFAULT_DECIMALS),
            "withdrew"
        );

        checker.fee_adjusted(label, gross, received)?;
        checker.ledger_balanced(label, &ctx.ledger, locked_after.value)?;
        Ok(())
    }

    async fn full_withdraw(&self, label: &str, ctx: &mut ScenarioContext, actor: Actor) -> Result<()> {
        const STEP: &str = "full_withdraw";
        let user = ctx.actor(STEP, actor)?;
        let router = ctx.router(STEP)?.clone();
        let strategy = ctx.strategy(STEP)?.clone();
        let vid = ctx.vid(STEP)?;
        let checker = ctx.checker;
        let want: Erc20 = self.fixture.bind(ctx.deployment.want).await?;

        let value = position_value(&router, &strategy, user, vid).await?;
        let lp_before = self
            .snapshot(ctx, format!("lp_balance({user})"), want.balance_of(user).await?)
            .await?;
        let locked_before = self
            .snapshot(ctx, "want_locked_total", strategy.want_locked_total().await?)
            .await?;

        router.withdraw(user, vid, U256::MAX).await?;

        let lp_after = self
            .snapshot(ctx, format!("lp_balance({user})"), want.balance_of(user).await?)
            .await?;
        let locked_after = self
            .snapshot(ctx, "want_locked_total", strategy.want_locked_total().await?)
            .await?;

        let gross = Delta::new(locked_before, locked_after.clone()).lost();
        let received = Delta::new(lp_before, lp_after).gained();
        ctx.ledger.record_withdrawal(gross, received);
        info!(
            %user,
            gross = %format_amount(gross, DEFAULT_DECIMALS),
            received = %format_amount(received, DEFAULT_DECIMALS),
            "withdrew everything"
        );

        checker.close_to(label, "withdrawn position", value, gross)?;
        checker.fee_adjusted_within(label, gross, received)?;
        checker.ledger_balanced(label, &ctx.ledger, locked_after.value)?;
        Ok(())
    }

    async fn assert_empty(&self, label: &str, ctx: &mut ScenarioContext, actor: Actor) -> Result<()> {
        const STEP: &str = "assert_empty";
        let user = ctx.actor(STEP, actor)?;
        let router = ctx.router(STEP)?;
        let vid = ctx.vid(STEP)?;

        // Legacy positions are converted from shares to want and may keep dust.
        let position = router.position(user, vid).await?;
        match router {
            VaultRouter::Legacy(_) => {
                ctx.checker.emptied_within(label, "vault position", position)?;
            }
            VaultRouter::Boosted(_) => ctx.checker.emptied(label, "vault position", position)?,
        }

        if ctx.boost_enabled {
            let (_, pool) = ctx.boost(STEP)?;
            let staked = pool.user_info(user).await?.amount;
            ctx.checker.emptied(label, "boost stake", staked)?;
        }
        Ok(())
    }

    async fn snapshot(
        &self,
        ctx: &mut ScenarioContext,
        label: impl Into<String>,
        value: U256,
    ) -> Result<Snapshot> {
        let block = self.fixture.block_number().await?;
        Ok(ctx.record(Snapshot::new(label, value, block)))
    }
}

/// Why a finished scenario stops the run, if it does.
fn abort_reason(report: &ScenarioReport) -> Option<String> {
    report.first_failure().and_then(|step| match &step.status {
        StepStatus::Failed { category, error } if category.is_fatal() => {
            Some(format!("{} failed: {}", step.step, error))
        }
        _ => None,
    })
}

/// ABI-encoded constructor arguments for a contract deployed next to
/// `router`.
pub fn constructor_args(args: &ConstructorArgs, router: Address) -> Bytes {
    match args {
        ConstructorArgs::None => Bytes::new(),
        ConstructorArgs::Raw(raw) => raw.clone(),
        ConstructorArgs::VaultRouter => router.abi_encode().into(),
    }
}

/// Fee schedule from a strategy's `(factor, max)` pair, if it fits.
pub fn live_fee_schedule(factor: U256, max: U256) -> Option<FeeSchedule> {
    let factor = u64::try_from(factor).ok()?;
    let max = u64::try_from(max).ok()?;
    FeeSchedule::new(factor, max).ok()
}

/// Left-padded word of an address, for equality checks.
fn address_word(address: Address) -> U256 {
    U256::from_be_bytes(address.into_word().0)
}

fn boosted_router<'a>(step: &'static str, router: &'a VaultRouter) -> Result<&'a VaultHealer> {
    router.as_boosted().ok_or(HarnessError::MissingPrerequisite {
        step,
        missing: "a boosted router",
    })
}

/// Share total the first deposit mints against.
async fn share_total(router: &VaultRouter, strategy: &Strategy, vid: U256) -> Result<U256> {
    Ok(match router {
        VaultRouter::Legacy(_) => strategy.vault_shares_total().await?,
        VaultRouter::Boosted(boosted) => boosted.total_supply(vid).await?,
    })
}

/// Position of `user` in want tokens.
async fn position_value(
    router: &VaultRouter,
    strategy: &Strategy,
    user: Address,
    vid: U256,
) -> Result<U256> {
    match router {
        VaultRouter::Legacy(legacy) => Ok(legacy.staked_want_tokens(vid, user).await?),
        VaultRouter::Boosted(boosted) => {
            let shares = boosted.balance_of(user, vid).await?;
            let supply = boosted.total_supply(vid).await?;
            let locked = strategy.want_locked_total().await?;
            Ok(mul_div_down(shares, locked, supply).unwrap_or(U256::ZERO))
        }
    }
}

/// Want per vault share on the boosted router. `None` on the legacy router
/// or while the vault has no shares.
async fn share_ratio(router: &VaultRouter, vid: U256, locked: U256) -> Result<Option<ShareRatio>> {
    let Some(boosted) = router.as_boosted() else {
        return Ok(None);
    };
    let supply = boosted.total_supply(vid).await?;
    Ok((!supply.is_zero()).then_some(ShareRatio::new(locked, supply)))
}
