//! The end-to-end lifecycle run: initialize, mint, transfer to a fresh
//! receiver, burn from the payer.

use myspltoken_sdk::{state::TokenAmount, token::InitTokenParams};
use serde::Serialize;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use tracing::info;

use crate::{
    error::LifecycleError,
    explorer::Cluster,
    ledger::Ledger,
    orchestrator::{InitOutcome, LifecycleOrchestrator, Step, StepReport},
};

// Human-scale quantities, scaled by the mint's decimals at run time.
pub const DEFAULT_MINT_QUANTITY: f64 = 1.0;
pub const DEFAULT_TRANSFER_QUANTITY: f64 = 0.5;
pub const DEFAULT_BURN_QUANTITY: f64 = 0.3;

#[derive(Clone, Debug)]
pub struct ScenarioPlan {
    pub token: InitTokenParams,
    pub mint: f64,
    pub transfer: f64,
    pub burn: f64,
}

impl ScenarioPlan {
    pub fn new(token: InitTokenParams) -> Self {
        Self {
            token,
            mint: DEFAULT_MINT_QUANTITY,
            transfer: DEFAULT_TRANSFER_QUANTITY,
            burn: DEFAULT_BURN_QUANTITY,
        }
    }
}

impl Default for ScenarioPlan {
    fn default() -> Self {
        Self::new(InitTokenParams::default())
    }
}

#[derive(Clone, Debug)]
pub struct ScenarioReport {
    pub program_id: Pubkey,
    pub mint: Pubkey,
    pub metadata: Pubkey,
    pub payer: Pubkey,
    pub receiver: Pubkey,
    pub decimals: u8,
    pub initialization: InitOutcome,
    pub minted: StepReport,
    pub transferred: StepReport,
    pub burned: StepReport,
}

/// Run the full sequence. The first failing step aborts the run; steps that
/// already confirmed stay confirmed.
///
/// Quantities are scaled by the decimals of the mint as found on-chain, which
/// differ from `plan.token.decimals` when the mint predates this run.
pub async fn run_scenario<L: Ledger>(
    orchestrator: &mut LifecycleOrchestrator<L>,
    plan: &ScenarioPlan,
    receiver: &Keypair,
) -> Result<ScenarioReport, LifecycleError> {
    let initialization = orchestrator.ensure_initialized(&plan.token).await?;
    let decimals = orchestrator.decimals().unwrap_or(plan.token.decimals);

    let minted = orchestrator
        .mint(TokenAmount::from_ui(plan.mint, decimals))
        .await?;
    let transferred = orchestrator
        .transfer(receiver, TokenAmount::from_ui(plan.transfer, decimals))
        .await?;
    let burned = orchestrator
        .burn(TokenAmount::from_ui(plan.burn, decimals))
        .await?;

    let report = ScenarioReport {
        program_id: orchestrator.program_id(),
        mint: orchestrator.mint_address(),
        metadata: orchestrator.metadata_address(),
        payer: orchestrator.payer(),
        receiver: receiver.pubkey(),
        decimals,
        initialization,
        minted,
        transferred,
        burned,
    };
    info!(
        payer_balance = report.burned.balances.first().map(|b| b.after),
        receiver_balance = report
            .transferred
            .balance("destination")
            .map(|b| b.after),
        "lifecycle complete"
    );
    Ok(report)
}

// ── JSON Summary ────────────────────────────────────────────────────────────

#[derive(Serialize, Debug)]
pub struct ScenarioSummary {
    pub cluster: String,
    pub program_id: String,
    pub mint: String,
    pub metadata: String,
    pub payer: String,
    pub receiver: String,
    pub initialization: Option<String>,
    pub steps: Vec<StepSummary>,
}

#[derive(Serialize, Debug)]
pub struct StepSummary {
    pub step: Step,
    pub signature: String,
    pub explorer: String,
    pub balances: Vec<BalanceSummary>,
}

#[derive(Serialize, Debug)]
pub struct BalanceSummary {
    pub role: String,
    pub address: String,
    pub before: String,
    pub after: String,
}

impl ScenarioReport {
    pub fn summary(&self, cluster: &Cluster) -> ScenarioSummary {
        let decimals = self.decimals;
        let step = |report: &StepReport| StepSummary {
            step: report.step,
            signature: report.signature.to_string(),
            explorer: cluster.tx_url(&report.signature),
            balances: report
                .balances
                .iter()
                .map(|b| BalanceSummary {
                    role: b.role.to_string(),
                    address: b.address.to_string(),
                    before: TokenAmount::new(b.before).to_ui_string(decimals),
                    after: TokenAmount::new(b.after).to_ui_string(decimals),
                })
                .collect(),
        };

        ScenarioSummary {
            cluster: cluster.to_string(),
            program_id: self.program_id.to_string(),
            mint: self.mint.to_string(),
            metadata: self.metadata.to_string(),
            payer: self.payer.to_string(),
            receiver: self.receiver.to_string(),
            initialization: match &self.initialization {
                InitOutcome::AlreadyInitialized => None,
                InitOutcome::Initialized(signature) => Some(signature.to_string()),
            },
            steps: vec![
                step(&self.minted),
                step(&self.transferred),
                step(&self.burned),
            ],
        }
    }
}
