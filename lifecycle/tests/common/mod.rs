// In-memory ledger for lifecycle tests.
//
// Applies the documented effects of the programs the lifecycle talks to
// (myspltoken, SPL associated token account, system transfer) to a map of
// accounts. A transaction either applies completely or not at all.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use borsh::BorshDeserialize;
use myspltoken_lifecycle::{
    explorer::Cluster,
    ledger::{Ledger, LedgerError},
    ClusterContext, LifecycleOrchestrator,
};
use myspltoken_sdk::{
    constants::*,
    pda,
    token::{discriminator, InitTokenParams},
};
use solana_sdk::{
    account::Account,
    hash::Hash,
    instruction::InstructionError,
    program_option::COption,
    program_pack::Pack,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    system_program,
    transaction::{Transaction, TransactionError},
};
use spl_token::state::{Account as TokenAccount, AccountState, Mint};

pub const PAYER_LAMPORTS: u64 = 10_000_000_000;
pub const TOKEN_ACCOUNT_RENT: u64 = 2_039_280;
pub const MINT_RENT: u64 = 1_461_600;

// Error codes surfaced by the programs the fake stands in for.
const SPL_INSUFFICIENT_FUNDS: u32 = 1;
const SPL_OWNER_MISMATCH: u32 = 4;
const SYSTEM_ACCOUNT_ALREADY_IN_USE: u32 = 0;
const SYSTEM_INSUFFICIENT_LAMPORTS: u32 = 1;
const ANCHOR_ACCOUNT_NOT_INITIALIZED: u32 = 3012;
const ANCHOR_CONSTRAINT_ASSOCIATED: u32 = 2009;

#[derive(Default)]
struct LedgerState {
    accounts: HashMap<Pubkey, Account>,
    confirmed: Vec<Signature>,
    fail_next: Option<TransactionError>,
    /// Base units withheld from every mint_tokens credit.
    mint_skim: u64,
    /// Accounts that exist for transactions but never show up in reads.
    hidden: HashSet<Pubkey>,
    balance_reads: HashMap<Pubkey, usize>,
}

pub struct FakeLedger {
    program_id: Pubkey,
    state: Mutex<LedgerState>,
}

impl FakeLedger {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            state: Mutex::new(LedgerState::default()),
        }
    }

    pub fn fund(&self, address: &Pubkey, lamports: u64) {
        let mut state = self.state.lock().unwrap();
        let account = state
            .accounts
            .entry(*address)
            .or_insert_with(|| Account::new(0, 0, &system_program::id()));
        account.lamports += lamports;
    }

    pub fn put_account(&self, address: Pubkey, account: Account) {
        self.state.lock().unwrap().accounts.insert(address, account);
    }

    pub fn confirmed_count(&self) -> usize {
        self.state.lock().unwrap().confirmed.len()
    }

    pub fn fail_next(&self, err: TransactionError) {
        self.state.lock().unwrap().fail_next = Some(err);
    }

    pub fn set_mint_skim(&self, skim: u64) {
        self.state.lock().unwrap().mint_skim = skim;
    }

    /// Make reads of `address` report no account, whatever transactions do to it.
    pub fn hide(&self, address: Pubkey) {
        self.state.lock().unwrap().hidden.insert(address);
    }

    pub fn token_amount(&self, address: &Pubkey) -> Option<u64> {
        let state = self.state.lock().unwrap();
        state
            .accounts
            .get(address)
            .map(|a| TokenAccount::unpack(&a.data).unwrap().amount)
    }

    pub fn mint_state(&self, address: &Pubkey) -> Option<Mint> {
        let state = self.state.lock().unwrap();
        state
            .accounts
            .get(address)
            .map(|a| Mint::unpack(&a.data).unwrap())
    }

    /// How many times `read_balance` was asked about `address`.
    pub fn balance_reads(&self, address: &Pubkey) -> usize {
        let state = self.state.lock().unwrap();
        state.balance_reads.get(address).copied().unwrap_or(0)
    }

    pub fn lamports(&self, address: &Pubkey) -> u64 {
        let state = self.state.lock().unwrap();
        state.accounts.get(address).map_or(0, |a| a.lamports)
    }

    fn process(
        &self,
        accounts: &mut HashMap<Pubkey, Account>,
        mint_skim: u64,
        program_id: &Pubkey,
        keys: &[Pubkey],
        data: &[u8],
    ) -> Result<(), InstructionError> {
        if *program_id == system_program::id() {
            process_system_transfer(accounts, keys, data)
        } else if *program_id == spl_associated_token_account::id() {
            process_create_ata(accounts, keys)
        } else if *program_id == self.program_id {
            process_myspltoken(accounts, mint_skim, keys, data)
        } else {
            Err(InstructionError::IncorrectProgramId)
        }
    }
}

#[async_trait]
impl Ledger for FakeLedger {
    async fn latest_blockhash(&self) -> Result<Hash, LedgerError> {
        Ok(Hash::new_unique())
    }

    async fn submit_and_confirm(
        &self,
        transaction: Transaction,
    ) -> Result<Signature, LedgerError> {
        transaction.verify()?;

        let mut state = self.state.lock().unwrap();
        if let Some(err) = state.fail_next.take() {
            return Err(err.into());
        }

        let message = &transaction.message;
        let mut scratch = state.accounts.clone();
        for (index, ix) in message.instructions.iter().enumerate() {
            let program_id = message.account_keys[ix.program_id_index as usize];
            let keys: Vec<Pubkey> = ix
                .accounts
                .iter()
                .map(|i| message.account_keys[*i as usize])
                .collect();
            self.process(&mut scratch, state.mint_skim, &program_id, &keys, &ix.data)
                .map_err(|e| TransactionError::InstructionError(index as u8, e))?;
        }

        state.accounts = scratch;
        let signature = transaction.signatures[0];
        state.confirmed.push(signature);
        Ok(signature)
    }

    async fn read_account(&self, address: &Pubkey) -> Result<Option<Account>, LedgerError> {
        let state = self.state.lock().unwrap();
        if state.hidden.contains(address) {
            return Ok(None);
        }
        Ok(state.accounts.get(address).cloned())
    }

    async fn read_balance(&self, address: &Pubkey) -> Result<u64, LedgerError> {
        *self
            .state
            .lock()
            .unwrap()
            .balance_reads
            .entry(*address)
            .or_default() += 1;
        Ok(self.lamports(address))
    }
}

// ── Program Effects ──────────────────────────────────────────────────────────

fn process_system_transfer(
    accounts: &mut HashMap<Pubkey, Account>,
    keys: &[Pubkey],
    data: &[u8],
) -> Result<(), InstructionError> {
    // SystemInstruction::Transfer { lamports } = tag 2 (u32) + u64
    if data.len() != 12 || data[..4] != 2u32.to_le_bytes() {
        return Err(InstructionError::InvalidInstructionData);
    }
    let lamports = u64::from_le_bytes(data[4..12].try_into().unwrap());
    debit(accounts, &keys[0], lamports)?;
    accounts
        .entry(keys[1])
        .or_insert_with(|| Account::new(0, 0, &system_program::id()))
        .lamports += lamports;
    Ok(())
}

fn process_create_ata(
    accounts: &mut HashMap<Pubkey, Account>,
    keys: &[Pubkey],
) -> Result<(), InstructionError> {
    let (funder, ata, wallet, mint) = (keys[0], keys[1], keys[2], keys[3]);
    if ata != pda::associated_token_address(&wallet, &mint) {
        return Err(InstructionError::InvalidSeeds);
    }
    if accounts.contains_key(&ata) {
        return Err(InstructionError::Custom(SYSTEM_ACCOUNT_ALREADY_IN_USE));
    }
    if !accounts.contains_key(&mint) {
        return Err(InstructionError::InvalidAccountData);
    }
    debit(accounts, &funder, TOKEN_ACCOUNT_RENT)?;
    accounts.insert(ata, token_account(mint, wallet, 0));
    Ok(())
}

fn process_myspltoken(
    accounts: &mut HashMap<Pubkey, Account>,
    mint_skim: u64,
    keys: &[Pubkey],
    data: &[u8],
) -> Result<(), InstructionError> {
    if data.len() < 8 {
        return Err(InstructionError::InvalidInstructionData);
    }
    let (tag, args) = data.split_at(8);

    if tag == discriminator(IX_INIT_TOKEN) {
        let params = InitTokenParams::try_from_slice(args)
            .map_err(|_| InstructionError::InvalidInstructionData)?;
        let (metadata, mint, payer) = (keys[0], keys[1], keys[2]);
        if accounts.contains_key(&mint) {
            return Err(InstructionError::Custom(SYSTEM_ACCOUNT_ALREADY_IN_USE));
        }
        debit(accounts, &payer, MINT_RENT)?;
        let mut mint_account = Account::new(MINT_RENT, Mint::LEN, &spl_token::id());
        Mint::pack(
            Mint {
                mint_authority: COption::Some(mint),
                supply: 0,
                decimals: params.decimals,
                is_initialized: true,
                freeze_authority: COption::None,
            },
            &mut mint_account.data,
        )
        .unwrap();
        accounts.insert(mint, mint_account);
        let mut metadata_account = Account::new(0, 0, &TOKEN_METADATA_PROGRAM_ID);
        metadata_account.data = args.to_vec();
        accounts.insert(metadata, metadata_account);
        return Ok(());
    }

    let quantity = u64::from_le_bytes(
        args.try_into()
            .map_err(|_| InstructionError::InvalidInstructionData)?,
    );

    if tag == discriminator(IX_MINT_TOKENS) {
        let (mint, destination, payer) = (keys[0], keys[1], keys[2]);
        if destination != pda::associated_token_address(&payer, &mint) {
            return Err(InstructionError::Custom(ANCHOR_CONSTRAINT_ASSOCIATED));
        }
        if !accounts.contains_key(&mint) {
            return Err(InstructionError::Custom(ANCHOR_ACCOUNT_NOT_INITIALIZED));
        }
        if !accounts.contains_key(&destination) {
            debit(accounts, &payer, TOKEN_ACCOUNT_RENT)?;
            accounts.insert(destination, token_account(mint, payer, 0));
        }
        update_supply(accounts, &mint, |s| s.checked_add(quantity))?;
        update_amount(accounts, &destination, |a| {
            a.checked_add(quantity - mint_skim.min(quantity))
        })?;
        Ok(())
    } else if tag == discriminator(IX_TRANSFER_TOKENS) {
        let (source, destination, authority) = (keys[0], keys[1], keys[3]);
        let source_state = read_token(accounts, &source)?;
        read_token(accounts, &destination)?;
        if source_state.owner != authority {
            return Err(InstructionError::Custom(SPL_OWNER_MISMATCH));
        }
        update_amount(accounts, &source, |a| a.checked_sub(quantity))?;
        update_amount(accounts, &destination, |a| a.checked_add(quantity))?;
        Ok(())
    } else if tag == discriminator(IX_BURN_TOKENS) {
        let (mint, source, owner) = (keys[0], keys[1], keys[2]);
        let source_state = read_token(accounts, &source)?;
        if source_state.owner != owner {
            return Err(InstructionError::Custom(SPL_OWNER_MISMATCH));
        }
        update_amount(accounts, &source, |a| a.checked_sub(quantity))?;
        update_supply(accounts, &mint, |s| s.checked_sub(quantity))?;
        Ok(())
    } else {
        Err(InstructionError::InvalidInstructionData)
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn debit(
    accounts: &mut HashMap<Pubkey, Account>,
    address: &Pubkey,
    lamports: u64,
) -> Result<(), InstructionError> {
    let account = accounts
        .get_mut(address)
        .ok_or(InstructionError::Custom(SYSTEM_INSUFFICIENT_LAMPORTS))?;
    account.lamports = account
        .lamports
        .checked_sub(lamports)
        .ok_or(InstructionError::Custom(SYSTEM_INSUFFICIENT_LAMPORTS))?;
    Ok(())
}

fn token_account(mint: Pubkey, owner: Pubkey, amount: u64) -> Account {
    let mut account = Account::new(TOKEN_ACCOUNT_RENT, TokenAccount::LEN, &spl_token::id());
    TokenAccount::pack(
        TokenAccount {
            mint,
            owner,
            amount,
            state: AccountState::Initialized,
            ..TokenAccount::default()
        },
        &mut account.data,
    )
    .unwrap();
    account
}

fn read_token(
    accounts: &HashMap<Pubkey, Account>,
    address: &Pubkey,
) -> Result<TokenAccount, InstructionError> {
    let account = accounts
        .get(address)
        .ok_or(InstructionError::Custom(ANCHOR_ACCOUNT_NOT_INITIALIZED))?;
    TokenAccount::unpack(&account.data).map_err(|_| InstructionError::InvalidAccountData)
}

fn update_amount<F>(
    accounts: &mut HashMap<Pubkey, Account>,
    address: &Pubkey,
    f: F,
) -> Result<(), InstructionError>
where
    F: FnOnce(u64) -> Option<u64>,
{
    let mut state = read_token(accounts, address)?;
    state.amount = f(state.amount).ok_or(InstructionError::Custom(SPL_INSUFFICIENT_FUNDS))?;
    let account = accounts.get_mut(address).unwrap();
    TokenAccount::pack(state, &mut account.data).unwrap();
    Ok(())
}

fn update_supply<F>(
    accounts: &mut HashMap<Pubkey, Account>,
    mint: &Pubkey,
    f: F,
) -> Result<(), InstructionError>
where
    F: FnOnce(u64) -> Option<u64>,
{
    let account = accounts
        .get_mut(mint)
        .ok_or(InstructionError::Custom(ANCHOR_ACCOUNT_NOT_INITIALIZED))?;
    let mut state = Mint::unpack(&account.data).map_err(|_| InstructionError::InvalidAccountData)?;
    state.supply = f(state.supply).ok_or(InstructionError::Custom(SPL_INSUFFICIENT_FUNDS))?;
    Mint::pack(state, &mut account.data).unwrap();
    Ok(())
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn program_id() -> Pubkey {
    MYSPLTOKEN_PROGRAM_ID
}

/// An orchestrator over `ledger` with a freshly funded payer.
pub fn orchestrator_over(
    ledger: FakeLedger,
    receiver_funding_lamports: u64,
) -> LifecycleOrchestrator<FakeLedger> {
    let payer = Keypair::new();
    ledger.fund(&payer.pubkey(), PAYER_LAMPORTS);
    LifecycleOrchestrator::new(ClusterContext {
        ledger,
        payer,
        program_id: program_id(),
        cluster: Cluster::Custom("http://localhost:8899".to_string()),
        receiver_funding_lamports,
    })
    .unwrap()
}

pub fn setup_with_funding(receiver_funding_lamports: u64) -> LifecycleOrchestrator<FakeLedger> {
    orchestrator_over(FakeLedger::new(program_id()), receiver_funding_lamports)
}

pub fn setup() -> LifecycleOrchestrator<FakeLedger> {
    setup_with_funding(DEFAULT_RECEIVER_FUNDING_LAMPORTS)
}
