//! Token lifecycle orchestration.
//!
//! Stages:
//!   Uninitialized → Initialized → Minted
//!
//! Transfer and burn are independent branches off `Minted`: either may run
//! first, and neither changes the stage. Every step is one confirmed
//! transaction followed by fresh balance reads; nothing is retried and a
//! failed step leaves earlier effects in place.

use std::fmt;

use myspltoken_sdk::{
    pda,
    state::{decode_mint, decode_token_account, TokenAmount},
    token::{
        create_burn_tokens_instruction, create_destination_account_instruction,
        create_fund_wallet_instruction, create_init_token_instruction,
        create_mint_tokens_instruction, create_transfer_tokens_instruction, BurnTokensAccounts,
        InitTokenAccounts, InitTokenParams, MintTokensAccounts, TransferTokensAccounts,
    },
};
use serde::Serialize;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};
use tracing::{debug, info, warn};

use crate::{error::LifecycleError, explorer::Cluster, ledger::Ledger};

const ROLE_MINT: &str = "mint";
const ROLE_SOURCE: &str = "source";
const ROLE_DESTINATION: &str = "destination";

// ── Stages and Steps ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStage {
    Uninitialized,
    Initialized,
    Minted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Initialize,
    Mint,
    Transfer,
    Burn,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Initialize => "initialize",
            Step::Mint => "mint",
            Step::Transfer => "transfer",
            Step::Burn => "burn",
        };
        write!(f, "{}", name)
    }
}

// ── Context and Reports ─────────────────────────────────────────────────────

/// Everything a lifecycle run needs, passed in explicitly so that independent
/// runs never share a provider.
pub struct ClusterContext<L> {
    pub ledger: L,
    pub payer: Keypair,
    pub program_id: Pubkey,
    pub cluster: Cluster,
    /// Lamports sent to a receiver before it creates its own token account.
    /// Zero makes the payer fund the account instead.
    pub receiver_funding_lamports: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InitOutcome {
    /// The mint already held data; nothing was submitted.
    AlreadyInitialized,
    Initialized(Signature),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BalanceChange {
    pub role: &'static str,
    pub address: Pubkey,
    pub before: u64,
    pub after: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
    pub step: Step,
    pub signature: Signature,
    pub balances: Vec<BalanceChange>,
    /// Set when the destination token account had to be created first.
    pub provisioned_destination: bool,
}

impl StepReport {
    pub fn balance(&self, role: &str) -> Option<&BalanceChange> {
        self.balances.iter().find(|b| b.role == role)
    }
}

// ── Orchestrator ────────────────────────────────────────────────────────────

pub struct LifecycleOrchestrator<L: Ledger> {
    ctx: ClusterContext<L>,
    mint: Pubkey,
    mint_bump: u8,
    metadata: Pubkey,
    /// Read from the mint account once initialization is settled.
    decimals: Option<u8>,
    stage: LifecycleStage,
    transferred: bool,
    burned: bool,
}

impl<L: Ledger> LifecycleOrchestrator<L> {
    pub fn new(ctx: ClusterContext<L>) -> Result<Self, LifecycleError> {
        let (mint, mint_bump) = pda::find_mint(&ctx.program_id)?;
        let (metadata, _) = pda::find_metadata(&mint)?;

        info!(
            program_id = %ctx.program_id,
            %mint,
            %metadata,
            payer = %ctx.payer.pubkey(),
            cluster = %ctx.cluster,
            explorer = %ctx.cluster.address_url(&mint),
            "derived lifecycle addresses"
        );

        Ok(Self {
            ctx,
            mint,
            mint_bump,
            metadata,
            decimals: None,
            stage: LifecycleStage::Uninitialized,
            transferred: false,
            burned: false,
        })
    }

    pub fn program_id(&self) -> Pubkey {
        self.ctx.program_id
    }

    pub fn mint_address(&self) -> Pubkey {
        self.mint
    }

    pub fn mint_bump(&self) -> u8 {
        self.mint_bump
    }

    pub fn metadata_address(&self) -> Pubkey {
        self.metadata
    }

    /// Decimals of the on-chain mint; `None` before initialization.
    pub fn decimals(&self) -> Option<u8> {
        self.decimals
    }

    pub fn payer(&self) -> Pubkey {
        self.ctx.payer.pubkey()
    }

    pub fn payer_token_account(&self) -> Pubkey {
        pda::associated_token_address(&self.payer(), &self.mint)
    }

    pub fn stage(&self) -> LifecycleStage {
        self.stage
    }

    pub fn has_transferred(&self) -> bool {
        self.transferred
    }

    pub fn has_burned(&self) -> bool {
        self.burned
    }

    pub fn ledger(&self) -> &L {
        &self.ctx.ledger
    }

    pub fn cluster(&self) -> &Cluster {
        &self.ctx.cluster
    }

    /// Create the mint and its metadata unless the mint account already holds
    /// data, in which case nothing is submitted.
    pub async fn ensure_initialized(
        &mut self,
        params: &InitTokenParams,
    ) -> Result<InitOutcome, LifecycleError> {
        let existing = self.ctx.ledger.read_account(&self.mint).await?;
        if let Some(account) = existing.filter(|a| !a.data.is_empty()) {
            let mint = decode_mint(&account.data)?;
            warn!(
                mint = %self.mint,
                decimals = mint.decimals,
                supply = mint.supply,
                "mint account already exists, skipping initialization"
            );
            self.decimals = Some(mint.decimals);
            self.advance(LifecycleStage::Initialized);
            return Ok(InitOutcome::AlreadyInitialized);
        }

        info!(
            mint = %self.mint,
            name = %params.name,
            symbol = %params.symbol,
            decimals = params.decimals,
            "mint account not found, initializing"
        );

        let payer = self.payer();
        let ix = create_init_token_instruction(
            &self.ctx.program_id,
            &InitTokenAccounts {
                metadata: self.metadata,
                mint: self.mint,
                payer,
            },
            params,
        )?;
        let signature = self
            .send(Step::Initialize, &[ix], &payer, &[&self.ctx.payer])
            .await?;

        let account = self
            .ctx
            .ledger
            .read_account(&self.mint)
            .await?
            .ok_or(LifecycleError::AccountMissing {
                role: ROLE_MINT,
                address: self.mint,
            })?;
        let mint = decode_mint(&account.data)?;
        debug!(decimals = mint.decimals, supply = mint.supply, "mint account decoded");

        self.decimals = Some(mint.decimals);
        self.advance(LifecycleStage::Initialized);
        Ok(InitOutcome::Initialized(signature))
    }

    /// Mint `quantity` to the payer's associated token account.
    pub async fn mint(&mut self, quantity: TokenAmount) -> Result<StepReport, LifecycleError> {
        self.require_stage(Step::Mint, LifecycleStage::Initialized)?;

        let payer = self.payer();
        let destination = self.payer_token_account();
        let before = self.token_balance_or_zero(&destination).await?;

        let ix = create_mint_tokens_instruction(
            &self.ctx.program_id,
            &MintTokensAccounts {
                mint: self.mint,
                destination,
                payer,
            },
            quantity.base_units(),
        )?;
        let signature = self
            .send(Step::Mint, &[ix], &payer, &[&self.ctx.payer])
            .await?;

        let after = self.token_balance(ROLE_DESTINATION, &destination).await?;
        let expected = increased(ROLE_DESTINATION, before, quantity)?;
        check_balance(ROLE_DESTINATION, &destination, expected, after)?;

        info!(%destination, %quantity, balance = after, "tokens minted");

        self.advance(LifecycleStage::Minted);
        Ok(StepReport {
            step: Step::Mint,
            signature,
            balances: vec![BalanceChange {
                role: ROLE_DESTINATION,
                address: destination,
                before,
                after,
            }],
            provisioned_destination: false,
        })
    }

    /// Transfer `quantity` from the payer to `receiver`, creating the
    /// receiver's associated token account first if it does not exist.
    pub async fn transfer(
        &mut self,
        receiver: &Keypair,
        quantity: TokenAmount,
    ) -> Result<StepReport, LifecycleError> {
        self.require_stage(Step::Transfer, LifecycleStage::Minted)?;

        let payer = self.payer();
        let source = self.payer_token_account();
        let destination = pda::associated_token_address(&receiver.pubkey(), &self.mint);
        info!(%source, %destination, receiver = %receiver.pubkey(), "transfer accounts resolved");

        let payer_balance = self.ctx.ledger.read_balance(&payer).await?;
        info!(%payer, lamports = payer_balance, "payer balance");

        let provisioned_destination = self
            .ctx
            .ledger
            .read_account(&destination)
            .await?
            .is_none();
        if provisioned_destination {
            self.provision_destination(receiver, &destination).await?;
        }

        let source_before = self.token_balance(ROLE_SOURCE, &source).await?;
        let destination_before = self.token_balance(ROLE_DESTINATION, &destination).await?;

        let ix = create_transfer_tokens_instruction(
            &self.ctx.program_id,
            &TransferTokensAccounts {
                source,
                destination,
                payer,
                authority: payer,
                mint: self.mint,
            },
            quantity.base_units(),
        )?;
        let signature = self
            .send(Step::Transfer, &[ix], &payer, &[&self.ctx.payer])
            .await?;

        let destination_after = self.token_balance(ROLE_DESTINATION, &destination).await?;
        let expected = increased(ROLE_DESTINATION, destination_before, quantity)?;
        check_balance(ROLE_DESTINATION, &destination, expected, destination_after)?;

        let source_after = self.token_balance(ROLE_SOURCE, &source).await?;
        let expected = decreased(ROLE_SOURCE, source_before, quantity)?;
        check_balance(ROLE_SOURCE, &source, expected, source_after)?;

        info!(
            %quantity,
            source_balance = source_after,
            destination_balance = destination_after,
            "tokens transferred"
        );

        self.transferred = true;
        Ok(StepReport {
            step: Step::Transfer,
            signature,
            balances: vec![
                BalanceChange {
                    role: ROLE_SOURCE,
                    address: source,
                    before: source_before,
                    after: source_after,
                },
                BalanceChange {
                    role: ROLE_DESTINATION,
                    address: destination,
                    before: destination_before,
                    after: destination_after,
                },
            ],
            provisioned_destination,
        })
    }

    /// Burn `quantity` from the payer's associated token account.
    pub async fn burn(&mut self, quantity: TokenAmount) -> Result<StepReport, LifecycleError> {
        self.require_stage(Step::Burn, LifecycleStage::Minted)?;

        let payer = self.payer();
        let source = self.payer_token_account();
        let before = self.token_balance(ROLE_SOURCE, &source).await?;

        let ix = create_burn_tokens_instruction(
            &self.ctx.program_id,
            &BurnTokensAccounts {
                mint: self.mint,
                source,
                owner: payer,
            },
            quantity.base_units(),
        )?;
        let signature = self
            .send(Step::Burn, &[ix], &payer, &[&self.ctx.payer])
            .await?;

        let after = self.token_balance(ROLE_SOURCE, &source).await?;
        let expected = decreased(ROLE_SOURCE, before, quantity)?;
        check_balance(ROLE_SOURCE, &source, expected, after)?;

        info!(%source, %quantity, balance = after, "tokens burned");

        self.burned = true;
        Ok(StepReport {
            step: Step::Burn,
            signature,
            balances: vec![BalanceChange {
                role: ROLE_SOURCE,
                address: source,
                before,
                after,
            }],
            provisioned_destination: false,
        })
    }

    // ── Helpers ─────────────────────────────────────────────────────────────

    async fn provision_destination(
        &self,
        receiver: &Keypair,
        destination: &Pubkey,
    ) -> Result<(), LifecycleError> {
        let payer = self.payer();
        let owner = receiver.pubkey();
        let lamports = self.ctx.receiver_funding_lamports;

        let signature = if lamports > 0 {
            let fund = create_fund_wallet_instruction(&payer, &owner, lamports);
            self.send(Step::Transfer, &[fund], &payer, &[&self.ctx.payer])
                .await?;
            let receiver_balance = self.ctx.ledger.read_balance(&owner).await?;
            info!(%owner, lamports, receiver_balance, "receiver funded");

            let create = create_destination_account_instruction(&owner, &owner, &self.mint);
            self.send(Step::Transfer, &[create], &owner, &[receiver])
                .await?
        } else {
            let create = create_destination_account_instruction(&payer, &owner, &self.mint);
            self.send(Step::Transfer, &[create], &payer, &[&self.ctx.payer])
                .await?
        };

        if self.ctx.ledger.read_account(destination).await?.is_none() {
            return Err(LifecycleError::AccountMissing {
                role: ROLE_DESTINATION,
                address: *destination,
            });
        }
        info!(%destination, %signature, "receiver token account created");
        Ok(())
    }

    async fn send(
        &self,
        step: Step,
        instructions: &[Instruction],
        payer: &Pubkey,
        signers: &[&Keypair],
    ) -> Result<Signature, LifecycleError> {
        let signature = self
            .ctx
            .ledger
            .send_instructions(instructions, payer, signers)
            .await?;
        info!(
            %step,
            %signature,
            explorer = %self.ctx.cluster.tx_url(&signature),
            "transaction confirmed"
        );
        Ok(signature)
    }

    async fn token_balance(
        &self,
        role: &'static str,
        address: &Pubkey,
    ) -> Result<u64, LifecycleError> {
        match self.ctx.ledger.read_account(address).await? {
            Some(account) => {
                let amount = decode_token_account(&account.data)?.amount;
                debug!(role, %address, amount, "token balance read");
                Ok(amount)
            }
            None => Err(LifecycleError::AccountMissing {
                role,
                address: *address,
            }),
        }
    }

    async fn token_balance_or_zero(&self, address: &Pubkey) -> Result<u64, LifecycleError> {
        match self.ctx.ledger.read_account(address).await? {
            Some(account) => Ok(decode_token_account(&account.data)?.amount),
            None => Ok(0),
        }
    }

    fn require_stage(&self, step: Step, required: LifecycleStage) -> Result<(), LifecycleError> {
        if self.stage < required {
            return Err(LifecycleError::OutOfOrder {
                step,
                required,
                current: self.stage,
            });
        }
        Ok(())
    }

    fn advance(&mut self, stage: LifecycleStage) {
        self.stage = self.stage.max(stage);
    }
}

fn increased(role: &'static str, balance: u64, quantity: TokenAmount) -> Result<u64, LifecycleError> {
    balance
        .checked_add(quantity.base_units())
        .ok_or(LifecycleError::AmountOutOfRange {
            role,
            balance,
            quantity: quantity.base_units(),
        })
}

fn decreased(role: &'static str, balance: u64, quantity: TokenAmount) -> Result<u64, LifecycleError> {
    balance
        .checked_sub(quantity.base_units())
        .ok_or(LifecycleError::AmountOutOfRange {
            role,
            balance,
            quantity: quantity.base_units(),
        })
}

fn check_balance(
    role: &'static str,
    address: &Pubkey,
    expected: u64,
    actual: u64,
) -> Result<(), LifecycleError> {
    if expected != actual {
        return Err(LifecycleError::BalanceMismatch {
            role,
            address: *address,
            expected,
            actual,
        });
    }
    Ok(())
}
