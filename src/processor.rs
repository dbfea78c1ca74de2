use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::invoke,
    program::invoke_signed,
    program_error::ProgramError,
    program_pack::Pack,
    pubkey::Pubkey,
    rent::Rent,
    system_instruction,
    sysvar::{clock::Clock, Sysvar},
};

use crate::cpi;
use crate::error::StakeError;
use crate::instruction::{
    StakeInstruction, PAUSE_FLAG_DEPOSIT, PAUSE_FLAG_UNDELEGATE, PAUSE_FLAG_WITHDRAW,
};
use crate::math;
use crate::state::{
    self, StakePool, UserWithdrawIndex, ValidatorDelegation, WithdrawRequest,
    MAX_PROTOCOL_FEE_BIPS, STAKE_POOL_SIZE, STATE_VERSION, USER_WITHDRAW_INDEX_SIZE,
    VALIDATOR_DELEGATION_SIZE, WITHDRAW_KIND_POOL, WITHDRAW_KIND_VALIDATOR,
    WITHDRAW_REQUEST_SIZE,
};

/// Verify the token program is the real SPL Token program.
/// CRITICAL: Without this check, an attacker can pass a fake token program,
/// receive PDA signer authority via invoke_signed, and drain the vault.
fn verify_token_program(token_program: &AccountInfo) -> ProgramResult {
    if *token_program.key != spl_token::id() {
        msg!("Error: invalid token program {}", token_program.key);
        return Err(ProgramError::IncorrectProgramId);
    }
    Ok(())
}

/// Read the share mint supply — the totalShareSupply owned by the token
/// collaborator, never tracked redundantly in pool state.
fn share_supply(share_mint: &AccountInfo) -> Result<u64, ProgramError> {
    let data = share_mint.try_borrow_data()?;
    Ok(spl_token::state::Mint::unpack(&data)?.supply)
}

/// Current balance of an SPL token account.
fn token_balance(account: &AccountInfo) -> Result<u64, ProgramError> {
    let data = account.try_borrow_data()?;
    Ok(spl_token::state::Account::unpack(&data)?.amount)
}

/// Capability check: the account must have signed and match the stored key.
fn require_capability(signer: &AccountInfo, expected: [u8; 32]) -> ProgramResult {
    if !signer.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }
    if signer.key.to_bytes() != expected {
        return Err(StakeError::Unauthorized.into());
    }
    Ok(())
}

pub fn process(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    let instruction = StakeInstruction::unpack(instruction_data)?;

    match instruction {
        StakeInstruction::InitPool { withdraw_delay, protocol_fee_bips } => {
            process_init_pool(program_id, accounts, withdraw_delay, protocol_fee_bips)
        }
        StakeInstruction::Deposit { amount } => {
            process_deposit(program_id, accounts, amount)
        }
        StakeInstruction::Donate { amount } => {
            process_donate(program_id, accounts, amount)
        }
        StakeInstruction::Delegate { validator_id, amount } => {
            process_delegate(program_id, accounts, validator_id, amount)
        }
        StakeInstruction::Undelegate { validator_id, share_amount } => {
            process_undelegate(program_id, accounts, validator_id, share_amount)
        }
        StakeInstruction::UndelegateFromPool { share_amount } => {
            process_undelegate_from_pool(program_id, accounts, share_amount)
        }
        StakeInstruction::Withdraw { id, emergency } => {
            process_withdraw(program_id, accounts, id, emergency)
        }
        StakeInstruction::OperatorUndelegateToPool { validator_id, amount } => {
            process_operator_undelegate_to_pool(program_id, accounts, validator_id, amount)
        }
        StakeInstruction::OperatorWithdrawToPool { id, emergency } => {
            process_operator_withdraw_to_pool(program_id, accounts, id, emergency)
        }
        StakeInstruction::ClaimRewards { validator_ids } => {
            process_claim_rewards(program_id, accounts, &validator_ids)
        }
        StakeInstruction::UpdateConfig {
            new_withdraw_delay, new_protocol_fee_bips, new_treasury,
        } => {
            process_update_config(
                program_id, accounts, new_withdraw_delay, new_protocol_fee_bips, new_treasury,
            )
        }
        StakeInstruction::UpdateRoles { new_operator, new_claimer } => {
            process_update_roles(program_id, accounts, new_operator, new_claimer)
        }
        StakeInstruction::SetPause { flag, paused } => {
            process_set_pause(program_id, accounts, flag, paused)
        }
        StakeInstruction::Migrate => process_migrate(program_id, accounts),
    }
}

// ═══════════════════════════════════════════════════════════════
// Helper: create a withdraw request + append to the owner's index
// ═══════════════════════════════════════════════════════════════

/// The ledger's createRequest: writes the immutable request record under
/// the next counter id and appends the id to the owner's index. The id is
/// never reused — the counter is bumped by the caller before calling this.
#[allow(clippy::too_many_arguments)]
fn create_withdraw_request<'a>(
    program_id: &Pubkey,
    payer: &AccountInfo<'a>,
    pool_key: &Pubkey,
    request_pda: &AccountInfo<'a>,
    index_pda: &AccountInfo<'a>,
    system_program: &AccountInfo<'a>,
    owner: &Pubkey,
    id: u64,
    kind: u8,
    validator_id: u64,
    asset_amount: u64,
    now: i64,
) -> ProgramResult {
    let (expected_request, request_bump) =
        state::derive_withdraw_request_pda(program_id, pool_key, id);
    if *request_pda.key != expected_request {
        return Err(StakeError::InvalidPda.into());
    }
    if !request_pda.data_is_empty() {
        return Err(StakeError::AlreadyInitialized.into());
    }

    let rent = Rent::get()?;
    let id_bytes = id.to_le_bytes();
    let request_seeds: &[&[u8]] = &[
        b"withdraw_request", pool_key.as_ref(), &id_bytes, &[request_bump],
    ];
    invoke_signed(
        &system_instruction::create_account(
            payer.key,
            request_pda.key,
            rent.minimum_balance(WITHDRAW_REQUEST_SIZE),
            WITHDRAW_REQUEST_SIZE as u64,
            program_id,
        ),
        &[payer.clone(), request_pda.clone(), system_program.clone()],
        &[request_seeds],
    )?;

    let mut request_data = request_pda.try_borrow_mut_data()?;
    let request: &mut WithdrawRequest =
        bytemuck::from_bytes_mut(&mut request_data[..WITHDRAW_REQUEST_SIZE]);

    request.is_initialized = 1;
    request.bump = request_bump;
    request.kind = kind;
    request.is_withdrawn = 0;
    request.id = id;
    request.validator_id = validator_id;
    request.asset_amount = asset_amount;
    request.request_timestamp = now;
    request.pool = pool_key.to_bytes();
    request.owner = owner.to_bytes();
    drop(request_data);

    // Per-owner index: created on first request, then append-only
    let (expected_index, index_bump) =
        state::derive_withdraw_index_pda(program_id, pool_key, owner);
    if *index_pda.key != expected_index {
        return Err(StakeError::InvalidPda.into());
    }

    if index_pda.data_is_empty() {
        let index_seeds: &[&[u8]] = &[
            b"withdraw_index", pool_key.as_ref(), owner.as_ref(), &[index_bump],
        ];
        invoke_signed(
            &system_instruction::create_account(
                payer.key,
                index_pda.key,
                rent.minimum_balance(USER_WITHDRAW_INDEX_SIZE),
                USER_WITHDRAW_INDEX_SIZE as u64,
                program_id,
            ),
            &[payer.clone(), index_pda.clone(), system_program.clone()],
            &[index_seeds],
        )?;
    }

    let mut index_data = index_pda.try_borrow_mut_data()?;
    let index: &mut UserWithdrawIndex =
        bytemuck::from_bytes_mut(&mut index_data[..USER_WITHDRAW_INDEX_SIZE]);

    index.is_initialized = 1;
    index.bump = index_bump;
    index.pool = pool_key.to_bytes();
    index.owner = owner.to_bytes();
    index.push(id)?;

    Ok(())
}

// ═══════════════════════════════════════════════════════════════
// 0: InitPool
// ═══════════════════════════════════════════════════════════════

fn process_init_pool(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    withdraw_delay: i64,
    protocol_fee_bips: u16,
) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();

    let admin = next_account_info(accounts_iter)?;
    let hub = next_account_info(accounts_iter)?;
    let pool_pda = next_account_info(accounts_iter)?;
    let share_mint = next_account_info(accounts_iter)?;
    let vault = next_account_info(accounts_iter)?;
    let vault_auth = next_account_info(accounts_iter)?;
    let asset_mint = next_account_info(accounts_iter)?;
    let treasury = next_account_info(accounts_iter)?;
    let staking_program = next_account_info(accounts_iter)?;
    let token_program = next_account_info(accounts_iter)?;
    let system_program = next_account_info(accounts_iter)?;
    let rent_sysvar = next_account_info(accounts_iter)?;

    if !admin.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }
    if withdraw_delay < 0 {
        return Err(ProgramError::InvalidInstructionData);
    }
    if protocol_fee_bips > MAX_PROTOCOL_FEE_BIPS {
        return Err(StakeError::FeeAboveMax.into());
    }

    let (expected_pool, pool_bump) = state::derive_pool_pda(program_id, hub.key);
    if *pool_pda.key != expected_pool {
        return Err(StakeError::InvalidPda.into());
    }
    if !pool_pda.data_is_empty() {
        return Err(StakeError::AlreadyInitialized.into());
    }

    let (expected_vault_auth, vault_auth_bump) =
        state::derive_vault_authority(program_id, &expected_pool);
    if *vault_auth.key != expected_vault_auth {
        return Err(StakeError::InvalidPda.into());
    }

    // Validate token program BEFORE any invoke_signed that grants PDA signer authority
    verify_token_program(token_program)?;

    let rent = Rent::from_account_info(rent_sysvar)?;

    let pool_seeds: &[&[u8]] = &[b"stake_pool", hub.key.as_ref(), &[pool_bump]];
    invoke_signed(
        &system_instruction::create_account(
            admin.key,
            pool_pda.key,
            rent.minimum_balance(STAKE_POOL_SIZE),
            STAKE_POOL_SIZE as u64,
            program_id,
        ),
        &[admin.clone(), pool_pda.clone(), system_program.clone()],
        &[pool_seeds],
    )?;

    // Create share mint (authority = vault_auth PDA)
    let vault_auth_seeds: &[&[u8]] = &[b"vault_auth", pool_pda.key.as_ref(), &[vault_auth_bump]];
    invoke_signed(
        &spl_token::instruction::initialize_mint(
            token_program.key,
            share_mint.key,
            vault_auth.key,
            Some(vault_auth.key),
            9,
        )?,
        &[share_mint.clone(), rent_sysvar.clone()],
        &[vault_auth_seeds],
    )?;

    // Initialize vault token account (authority = vault_auth PDA)
    invoke_signed(
        &spl_token::instruction::initialize_account(
            token_program.key,
            vault.key,
            asset_mint.key,
            vault_auth.key,
        )?,
        &[vault.clone(), asset_mint.clone(), vault_auth.clone(), rent_sysvar.clone()],
        &[vault_auth_seeds],
    )?;

    let mut pool_data = pool_pda.try_borrow_mut_data()?;
    let pool: &mut StakePool = bytemuck::from_bytes_mut(&mut pool_data[..STAKE_POOL_SIZE]);

    pool.is_initialized = 1;
    pool.version = STATE_VERSION;
    pool.bump = pool_bump;
    pool.vault_authority_bump = vault_auth_bump;
    pool.deposit_paused = 0;
    pool.undelegate_paused = 0;
    pool.withdraw_paused = 0;
    pool.hub = hub.key.to_bytes();
    pool.admin = admin.key.to_bytes();
    pool.operator = admin.key.to_bytes();
    pool.claimer = admin.key.to_bytes();
    pool.treasury = treasury.key.to_bytes();
    pool.asset_mint = asset_mint.key.to_bytes();
    pool.share_mint = share_mint.key.to_bytes();
    pool.vault = vault.key.to_bytes();
    pool.staking_program = staking_program.key.to_bytes();
    pool.total_pool = 0;
    pool.total_delegated = 0;
    pool.pending_operator_withdraw = 0;
    pool.withdraw_counter = 0;
    pool.withdraw_delay = withdraw_delay;
    pool.protocol_fee_bips = protocol_fee_bips;

    msg!("StakePool initialized for hub {}", hub.key);
    Ok(())
}

// ═══════════════════════════════════════════════════════════════
// 1: Deposit
// ═══════════════════════════════════════════════════════════════

fn process_deposit(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    amount: u64,
) -> ProgramResult {
    if amount == 0 {
        return Err(StakeError::ZeroAmount.into());
    }

    let accounts_iter = &mut accounts.iter();

    let user = next_account_info(accounts_iter)?;
    let pool_pda = next_account_info(accounts_iter)?;
    let user_ata = next_account_info(accounts_iter)?;
    let vault = next_account_info(accounts_iter)?;
    let share_mint = next_account_info(accounts_iter)?;
    let user_share_ata = next_account_info(accounts_iter)?;
    let vault_auth = next_account_info(accounts_iter)?;
    let token_program = next_account_info(accounts_iter)?;

    if !user.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let mut pool_data = pool_pda.try_borrow_mut_data()?;
    let pool: &mut StakePool = bytemuck::from_bytes_mut(&mut pool_data[..STAKE_POOL_SIZE]);

    if pool.is_initialized != 1 {
        return Err(StakeError::NotInitialized.into());
    }
    if pool.deposit_paused != 0 {
        return Err(StakeError::DepositsPaused.into());
    }
    if pool.share_mint != share_mint.key.to_bytes() {
        return Err(StakeError::InvalidMint.into());
    }
    if pool.vault != vault.key.to_bytes() {
        return Err(StakeError::InvalidPda.into());
    }

    // Validate token program BEFORE any invoke_signed that grants PDA signer authority
    verify_token_program(token_program)?;

    // Conversion happens on pre-transfer totals
    let supply_before = share_supply(share_mint)?;
    let assets_before = pool.total_assets().ok_or(StakeError::Overflow)?;
    let shares_to_mint = math::convert_to_shares(amount, assets_before, supply_before)
        .ok_or(StakeError::Overflow)?;
    if shares_to_mint == 0 {
        return Err(StakeError::ZeroAmount.into());
    }

    // Transfer assets: user ATA → vault
    invoke(
        &spl_token::instruction::transfer(
            token_program.key,
            user_ata.key,
            vault.key,
            user.key,
            &[],
            amount,
        )?,
        &[user_ata.clone(), vault.clone(), user.clone(), token_program.clone()],
    )?;

    // Mint shares to user
    let (expected_vault_auth, _) = state::derive_vault_authority(program_id, pool_pda.key);
    if *vault_auth.key != expected_vault_auth {
        return Err(StakeError::InvalidPda.into());
    }
    let vault_auth_seeds: &[&[u8]] = &[
        b"vault_auth", pool_pda.key.as_ref(), &[pool.vault_authority_bump],
    ];
    invoke_signed(
        &spl_token::instruction::mint_to(
            token_program.key,
            share_mint.key,
            user_share_ata.key,
            vault_auth.key,
            &[],
            shares_to_mint,
        )?,
        &[share_mint.clone(), user_share_ata.clone(), vault_auth.clone(), token_program.clone()],
        &[vault_auth_seeds],
    )?;

    pool.total_pool = pool.total_pool.checked_add(amount)
        .ok_or(StakeError::Overflow)?;

    // Rate guard: truncation favors the pool, so the rate may only drift
    // up by the conversion remainder; any other move aborts the call
    let assets_after = pool.total_assets().ok_or(StakeError::Overflow)?;
    let supply_after = supply_before.checked_add(shares_to_mint)
        .ok_or(StakeError::Overflow)?;
    if !math::rate_within_tolerance(assets_before, supply_before, assets_after, supply_after) {
        return Err(StakeError::RateInvariantViolated.into());
    }

    msg!("Deposited {} assets, minted {} shares", amount, shares_to_mint);
    Ok(())
}

// ═══════════════════════════════════════════════════════════════
// 2: Donate
// ═══════════════════════════════════════════════════════════════

fn process_donate(
    _program_id: &Pubkey,
    accounts: &[AccountInfo],
    amount: u64,
) -> ProgramResult {
    if amount == 0 {
        return Err(StakeError::ZeroAmount.into());
    }

    let accounts_iter = &mut accounts.iter();

    let donor = next_account_info(accounts_iter)?;
    let pool_pda = next_account_info(accounts_iter)?;
    let donor_ata = next_account_info(accounts_iter)?;
    let vault = next_account_info(accounts_iter)?;
    let share_mint = next_account_info(accounts_iter)?;
    let token_program = next_account_info(accounts_iter)?;

    if !donor.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let mut pool_data = pool_pda.try_borrow_mut_data()?;
    let pool: &mut StakePool = bytemuck::from_bytes_mut(&mut pool_data[..STAKE_POOL_SIZE]);

    if pool.is_initialized != 1 {
        return Err(StakeError::NotInitialized.into());
    }
    if pool.share_mint != share_mint.key.to_bytes() {
        return Err(StakeError::InvalidMint.into());
    }
    if pool.vault != vault.key.to_bytes() {
        return Err(StakeError::InvalidPda.into());
    }
    verify_token_program(token_program)?;

    let supply = share_supply(share_mint)?;
    let rate_before = pool.current_rate(supply).ok_or(StakeError::Overflow)?;

    invoke(
        &spl_token::instruction::transfer(
            token_program.key,
            donor_ata.key,
            vault.key,
            donor.key,
            &[],
            amount,
        )?,
        &[donor_ata.clone(), vault.clone(), donor.clone(), token_program.clone()],
    )?;

    pool.total_pool = pool.total_pool.checked_add(amount)
        .ok_or(StakeError::Overflow)?;

    let rate_after = pool.current_rate(supply).ok_or(StakeError::Overflow)?;
    if !math::rate_non_decreasing(rate_before, rate_after) {
        return Err(StakeError::RateDecreased.into());
    }

    msg!("Donated {} assets into the pool", amount);
    Ok(())
}

// ═══════════════════════════════════════════════════════════════
// 3: Delegate
// ═══════════════════════════════════════════════════════════════

fn process_delegate(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    validator_id: u64,
    amount: u64,
) -> ProgramResult {
    if amount == 0 {
        return Err(StakeError::ZeroAmount.into());
    }

    let accounts_iter = &mut accounts.iter();

    let operator = next_account_info(accounts_iter)?;
    let pool_pda = next_account_info(accounts_iter)?;
    let delegation_pda = next_account_info(accounts_iter)?;
    let vault = next_account_info(accounts_iter)?;
    let vault_auth = next_account_info(accounts_iter)?;
    let hub = next_account_info(accounts_iter)?;
    let hub_vault = next_account_info(accounts_iter)?;
    let staking_program = next_account_info(accounts_iter)?;
    let token_program = next_account_info(accounts_iter)?;
    let system_program = next_account_info(accounts_iter)?;

    let mut pool_data = pool_pda.try_borrow_mut_data()?;
    let pool: &mut StakePool = bytemuck::from_bytes_mut(&mut pool_data[..STAKE_POOL_SIZE]);

    if pool.is_initialized != 1 {
        return Err(StakeError::NotInitialized.into());
    }
    require_capability(operator, pool.operator)?;
    if pool.hub != hub.key.to_bytes() {
        return Err(StakeError::InvalidPda.into());
    }
    if pool.vault != vault.key.to_bytes() {
        return Err(StakeError::InvalidPda.into());
    }
    if pool.staking_program != staking_program.key.to_bytes() {
        return Err(StakeError::InvalidStakingProgram.into());
    }
    if amount > pool.total_pool {
        return Err(StakeError::AmountExceedsPool.into());
    }
    verify_token_program(token_program)?;

    let (expected_vault_auth, vault_auth_bump) =
        state::derive_vault_authority(program_id, pool_pda.key);
    if *vault_auth.key != expected_vault_auth {
        return Err(StakeError::InvalidPda.into());
    }
    let vault_auth_seeds: &[&[u8]] = &[b"vault_auth", pool_pda.key.as_ref(), &[vault_auth_bump]];

    // Create or update the per-validator delegation record
    let (expected_delegation, delegation_bump) =
        state::derive_delegation_pda(program_id, pool_pda.key, validator_id);
    if *delegation_pda.key != expected_delegation {
        return Err(StakeError::InvalidPda.into());
    }
    if delegation_pda.data_is_empty() {
        let validator_bytes = validator_id.to_le_bytes();
        let delegation_seeds: &[&[u8]] = &[
            b"delegation", pool_pda.key.as_ref(), &validator_bytes, &[delegation_bump],
        ];
        let rent = Rent::get()?;
        invoke_signed(
            &system_instruction::create_account(
                operator.key,
                delegation_pda.key,
                rent.minimum_balance(VALIDATOR_DELEGATION_SIZE),
                VALIDATOR_DELEGATION_SIZE as u64,
                program_id,
            ),
            &[operator.clone(), delegation_pda.clone(), system_program.clone()],
            &[delegation_seeds],
        )?;
    }

    // Forward the stake to the hub (vault → hub vault, vault_auth signs)
    cpi::cpi_hub_delegate(
        staking_program,
        vault_auth,
        hub,
        vault,
        hub_vault,
        token_program,
        validator_id,
        amount,
        vault_auth_seeds,
    )?;

    // Reallocation between pool and delegated — total assets unchanged,
    // so the rate cannot move here
    pool.total_pool = pool.total_pool.checked_sub(amount)
        .ok_or(StakeError::Overflow)?;
    pool.total_delegated = pool.total_delegated.checked_add(amount)
        .ok_or(StakeError::Overflow)?;

    let mut delegation_data = delegation_pda.try_borrow_mut_data()?;
    let delegation: &mut ValidatorDelegation =
        bytemuck::from_bytes_mut(&mut delegation_data[..VALIDATOR_DELEGATION_SIZE]);
    delegation.is_initialized = 1;
    delegation.bump = delegation_bump;
    delegation.validator_id = validator_id;
    delegation.pool = pool_pda.key.to_bytes();
    delegation.amount = delegation.amount.checked_add(amount)
        .ok_or(StakeError::Overflow)?;

    msg!("Delegated {} assets to validator {}", amount, validator_id);
    Ok(())
}

// ═══════════════════════════════════════════════════════════════
// 4: Undelegate — burn shares against a validator delegation
// ═══════════════════════════════════════════════════════════════

fn process_undelegate(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    validator_id: u64,
    share_amount: u64,
) -> ProgramResult {
    if share_amount == 0 {
        return Err(StakeError::ZeroAmount.into());
    }

    let accounts_iter = &mut accounts.iter();

    let user = next_account_info(accounts_iter)?;
    let pool_pda = next_account_info(accounts_iter)?;
    let delegation_pda = next_account_info(accounts_iter)?;
    let user_share_ata = next_account_info(accounts_iter)?;
    let share_mint = next_account_info(accounts_iter)?;
    let request_pda = next_account_info(accounts_iter)?;
    let index_pda = next_account_info(accounts_iter)?;
    let vault_auth = next_account_info(accounts_iter)?;
    let hub = next_account_info(accounts_iter)?;
    let staking_program = next_account_info(accounts_iter)?;
    let token_program = next_account_info(accounts_iter)?;
    let system_program = next_account_info(accounts_iter)?;

    if !user.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let mut pool_data = pool_pda.try_borrow_mut_data()?;
    let pool: &mut StakePool = bytemuck::from_bytes_mut(&mut pool_data[..STAKE_POOL_SIZE]);

    if pool.is_initialized != 1 {
        return Err(StakeError::NotInitialized.into());
    }
    if pool.undelegate_paused != 0 {
        return Err(StakeError::UndelegationsPaused.into());
    }
    if pool.share_mint != share_mint.key.to_bytes() {
        return Err(StakeError::InvalidMint.into());
    }
    if pool.hub != hub.key.to_bytes() {
        return Err(StakeError::InvalidPda.into());
    }
    if pool.staking_program != staking_program.key.to_bytes() {
        return Err(StakeError::InvalidStakingProgram.into());
    }
    verify_token_program(token_program)?;

    let (expected_vault_auth, _) = state::derive_vault_authority(program_id, pool_pda.key);
    if *vault_auth.key != expected_vault_auth {
        return Err(StakeError::InvalidPda.into());
    }
    let vault_auth_seeds: &[&[u8]] = &[
        b"vault_auth", pool_pda.key.as_ref(), &[pool.vault_authority_bump],
    ];

    let (expected_delegation, _) =
        state::derive_delegation_pda(program_id, pool_pda.key, validator_id);
    if *delegation_pda.key != expected_delegation {
        return Err(StakeError::InvalidPda.into());
    }
    if delegation_pda.data_is_empty() {
        return Err(StakeError::NoDelegationForValidator.into());
    }

    // Conversion on pre-burn totals
    let supply_before = share_supply(share_mint)?;
    let assets_before = pool.total_assets().ok_or(StakeError::Overflow)?;
    let asset_amount = math::convert_to_assets(share_amount, assets_before, supply_before)
        .ok_or(StakeError::Overflow)?;
    if asset_amount == 0 {
        return Err(StakeError::ZeroAmount.into());
    }

    {
        let delegation_data = delegation_pda.try_borrow_data()?;
        let delegation: &ValidatorDelegation =
            bytemuck::from_bytes(&delegation_data[..VALIDATOR_DELEGATION_SIZE]);
        if delegation.is_initialized != 1 {
            return Err(StakeError::NoDelegationForValidator.into());
        }
        if asset_amount > delegation.amount {
            return Err(StakeError::AmountExceedsDelegated.into());
        }
    }

    // The hub is authoritative — after slashing it may hold less than we
    // think we delegated
    let reported = cpi::query_hub_stake(staking_program, hub, vault_auth.key, validator_id)?;
    if reported < asset_amount {
        return Err(StakeError::StakedAmountTooLow.into());
    }

    // Burn the caller's shares
    invoke(
        &spl_token::instruction::burn(
            token_program.key,
            user_share_ata.key,
            share_mint.key,
            user.key,
            &[],
            share_amount,
        )?,
        &[user_share_ata.clone(), share_mint.clone(), user.clone(), token_program.clone()],
    )?;

    let id = pool.withdraw_counter;
    pool.withdraw_counter = pool.withdraw_counter.checked_add(1)
        .ok_or(StakeError::Overflow)?;

    let now = Clock::get()?.unix_timestamp;
    create_withdraw_request(
        program_id,
        user,
        pool_pda.key,
        request_pda,
        index_pda,
        system_program,
        user.key,
        id,
        WITHDRAW_KIND_VALIDATOR,
        validator_id,
        asset_amount,
        now,
    )?;

    pool.total_delegated = pool.total_delegated.checked_sub(asset_amount)
        .ok_or(StakeError::Overflow)?;

    let mut delegation_data = delegation_pda.try_borrow_mut_data()?;
    let delegation: &mut ValidatorDelegation =
        bytemuck::from_bytes_mut(&mut delegation_data[..VALIDATOR_DELEGATION_SIZE]);
    delegation.amount = delegation.amount.checked_sub(asset_amount)
        .ok_or(StakeError::Overflow)?;
    drop(delegation_data);

    cpi::cpi_hub_undelegate(
        staking_program,
        vault_auth,
        hub,
        validator_id,
        id,
        asset_amount,
        vault_auth_seeds,
    )?;

    // Shares burned are proportional to assets removed, so the rate may
    // only move by the conversion remainder
    let assets_after = assets_before.checked_sub(asset_amount)
        .ok_or(StakeError::Overflow)?;
    let supply_after = supply_before.checked_sub(share_amount)
        .ok_or(StakeError::Overflow)?;
    if !math::rate_within_tolerance(assets_before, supply_before, assets_after, supply_after) {
        return Err(StakeError::RateInvariantViolated.into());
    }

    msg!(
        "Undelegate: burned {} shares, request {} for {} assets from validator {}",
        share_amount, id, asset_amount, validator_id,
    );
    Ok(())
}

// ═══════════════════════════════════════════════════════════════
// 5: UndelegateFromPool — burn shares against the undelegated pool
// ═══════════════════════════════════════════════════════════════

fn process_undelegate_from_pool(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    share_amount: u64,
) -> ProgramResult {
    if share_amount == 0 {
        return Err(StakeError::ZeroAmount.into());
    }

    let accounts_iter = &mut accounts.iter();

    let user = next_account_info(accounts_iter)?;
    let pool_pda = next_account_info(accounts_iter)?;
    let user_share_ata = next_account_info(accounts_iter)?;
    let share_mint = next_account_info(accounts_iter)?;
    let request_pda = next_account_info(accounts_iter)?;
    let index_pda = next_account_info(accounts_iter)?;
    let token_program = next_account_info(accounts_iter)?;
    let system_program = next_account_info(accounts_iter)?;

    if !user.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let mut pool_data = pool_pda.try_borrow_mut_data()?;
    let pool: &mut StakePool = bytemuck::from_bytes_mut(&mut pool_data[..STAKE_POOL_SIZE]);

    if pool.is_initialized != 1 {
        return Err(StakeError::NotInitialized.into());
    }
    if pool.undelegate_paused != 0 {
        return Err(StakeError::UndelegationsPaused.into());
    }
    if pool.share_mint != share_mint.key.to_bytes() {
        return Err(StakeError::InvalidMint.into());
    }
    verify_token_program(token_program)?;

    let supply_before = share_supply(share_mint)?;
    let assets_before = pool.total_assets().ok_or(StakeError::Overflow)?;
    let asset_amount = math::convert_to_assets(share_amount, assets_before, supply_before)
        .ok_or(StakeError::Overflow)?;
    if asset_amount == 0 {
        return Err(StakeError::ZeroAmount.into());
    }
    if asset_amount > pool.total_pool {
        return Err(StakeError::AmountExceedsPool.into());
    }

    invoke(
        &spl_token::instruction::burn(
            token_program.key,
            user_share_ata.key,
            share_mint.key,
            user.key,
            &[],
            share_amount,
        )?,
        &[user_share_ata.clone(), share_mint.clone(), user.clone(), token_program.clone()],
    )?;

    let id = pool.withdraw_counter;
    pool.withdraw_counter = pool.withdraw_counter.checked_add(1)
        .ok_or(StakeError::Overflow)?;

    let now = Clock::get()?.unix_timestamp;
    create_withdraw_request(
        program_id,
        user,
        pool_pda.key,
        request_pda,
        index_pda,
        system_program,
        user.key,
        id,
        WITHDRAW_KIND_POOL,
        0,
        asset_amount,
        now,
    )?;

    // The owed assets stay in the vault until claimed; they just stop
    // counting toward the pool total
    pool.total_pool = pool.total_pool.checked_sub(asset_amount)
        .ok_or(StakeError::Overflow)?;

    let assets_after = assets_before.checked_sub(asset_amount)
        .ok_or(StakeError::Overflow)?;
    let supply_after = supply_before.checked_sub(share_amount)
        .ok_or(StakeError::Overflow)?;
    if !math::rate_within_tolerance(assets_before, supply_before, assets_after, supply_after) {
        return Err(StakeError::RateInvariantViolated.into());
    }

    msg!(
        "UndelegateFromPool: burned {} shares, request {} for {} assets",
        share_amount, id, asset_amount,
    );
    Ok(())
}

// ═══════════════════════════════════════════════════════════════
// 6: Withdraw — resolve a request after the delay
// ═══════════════════════════════════════════════════════════════

fn process_withdraw(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    id: u64,
    emergency: bool,
) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();

    let user = next_account_info(accounts_iter)?;
    let pool_pda = next_account_info(accounts_iter)?;
    let request_pda = next_account_info(accounts_iter)?;
    let vault = next_account_info(accounts_iter)?;
    let user_ata = next_account_info(accounts_iter)?;
    let vault_auth = next_account_info(accounts_iter)?;
    let hub = next_account_info(accounts_iter)?;
    let hub_vault = next_account_info(accounts_iter)?;
    let hub_vault_auth = next_account_info(accounts_iter)?;
    let staking_program = next_account_info(accounts_iter)?;
    let token_program = next_account_info(accounts_iter)?;

    if !user.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let mut pool_data = pool_pda.try_borrow_mut_data()?;
    let pool: &mut StakePool = bytemuck::from_bytes_mut(&mut pool_data[..STAKE_POOL_SIZE]);

    if pool.is_initialized != 1 {
        return Err(StakeError::NotInitialized.into());
    }
    if pool.withdraw_paused != 0 {
        return Err(StakeError::WithdrawalsPaused.into());
    }
    if pool.vault != vault.key.to_bytes() {
        return Err(StakeError::InvalidPda.into());
    }
    verify_token_program(token_program)?;

    let (expected_request, _) = state::derive_withdraw_request_pda(program_id, pool_pda.key, id);
    if *request_pda.key != expected_request {
        return Err(StakeError::InvalidPda.into());
    }
    if request_pda.data_is_empty() {
        return Err(StakeError::RequestNotFound.into());
    }

    let (kind, validator_id, asset_amount) = {
        let request_data = request_pda.try_borrow_data()?;
        let request: &WithdrawRequest =
            bytemuck::from_bytes(&request_data[..WITHDRAW_REQUEST_SIZE]);

        let now = Clock::get()?.unix_timestamp;
        request.validate_resolve(user.key, pool_pda.key, now, pool.withdraw_delay)?;
        (request.kind, request.validator_id, request.asset_amount)
    };

    let (expected_vault_auth, _) = state::derive_vault_authority(program_id, pool_pda.key);
    if *vault_auth.key != expected_vault_auth {
        return Err(StakeError::InvalidPda.into());
    }
    let vault_auth_seeds: &[&[u8]] = &[
        b"vault_auth", pool_pda.key.as_ref(), &[pool.vault_authority_bump],
    ];

    // Resolve BEFORE any value leaves: the flip is what makes a re-entrant
    // or repeated call fail with AlreadyWithdrawn
    {
        let mut request_data = request_pda.try_borrow_mut_data()?;
        let request: &mut WithdrawRequest =
            bytemuck::from_bytes_mut(&mut request_data[..WITHDRAW_REQUEST_SIZE]);
        request.is_withdrawn = 1;
    }

    let payout = if kind == WITHDRAW_KIND_VALIDATOR {
        if pool.hub != hub.key.to_bytes() {
            return Err(StakeError::InvalidPda.into());
        }
        if pool.staking_program != staking_program.key.to_bytes() {
            return Err(StakeError::InvalidStakingProgram.into());
        }

        let balance_before = token_balance(vault)?;
        cpi::cpi_hub_withdraw(
            staking_program,
            vault_auth,
            hub,
            hub_vault,
            vault,
            token_program,
            hub_vault_auth,
            validator_id,
            id,
            vault_auth_seeds,
        )?;
        let balance_after = token_balance(vault)?;
        let actual = balance_after.checked_sub(balance_before)
            .ok_or(StakeError::Overflow)?;

        if !emergency && actual < asset_amount {
            return Err(StakeError::WithdrawnAmountTooLow.into());
        }

        // Emergency pays exactly the slashed amount; any hub overpayment
        // is folded into the pool
        let payout = actual.min(asset_amount);
        let surplus = actual - payout;
        if surplus > 0 {
            pool.total_pool = pool.total_pool.checked_add(surplus)
                .ok_or(StakeError::Overflow)?;
        }
        payout
    } else {
        // Pool-kind requests were earmarked at creation; the vault
        // already holds the owed amount
        asset_amount
    };

    invoke_signed(
        &spl_token::instruction::transfer(
            token_program.key,
            vault.key,
            user_ata.key,
            vault_auth.key,
            &[],
            payout,
        )?,
        &[vault.clone(), user_ata.clone(), vault_auth.clone(), token_program.clone()],
        &[vault_auth_seeds],
    )?;

    msg!(
        "Withdraw request {} resolved: paid {} of {} owed (emergency: {})",
        id, payout, asset_amount, emergency,
    );
    Ok(())
}

// ═══════════════════════════════════════════════════════════════
// 7: OperatorUndelegateToPool — clawback, no share burn
// ═══════════════════════════════════════════════════════════════

fn process_operator_undelegate_to_pool(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    validator_id: u64,
    amount: u64,
) -> ProgramResult {
    if amount == 0 {
        return Err(StakeError::ZeroAmount.into());
    }

    let accounts_iter = &mut accounts.iter();

    let operator = next_account_info(accounts_iter)?;
    let pool_pda = next_account_info(accounts_iter)?;
    let delegation_pda = next_account_info(accounts_iter)?;
    let request_pda = next_account_info(accounts_iter)?;
    let index_pda = next_account_info(accounts_iter)?;
    let vault_auth = next_account_info(accounts_iter)?;
    let hub = next_account_info(accounts_iter)?;
    let staking_program = next_account_info(accounts_iter)?;
    let system_program = next_account_info(accounts_iter)?;

    let mut pool_data = pool_pda.try_borrow_mut_data()?;
    let pool: &mut StakePool = bytemuck::from_bytes_mut(&mut pool_data[..STAKE_POOL_SIZE]);

    if pool.is_initialized != 1 {
        return Err(StakeError::NotInitialized.into());
    }
    require_capability(operator, pool.operator)?;
    if pool.hub != hub.key.to_bytes() {
        return Err(StakeError::InvalidPda.into());
    }
    if pool.staking_program != staking_program.key.to_bytes() {
        return Err(StakeError::InvalidStakingProgram.into());
    }

    let (expected_vault_auth, _) = state::derive_vault_authority(program_id, pool_pda.key);
    if *vault_auth.key != expected_vault_auth {
        return Err(StakeError::InvalidPda.into());
    }
    let vault_auth_seeds: &[&[u8]] = &[
        b"vault_auth", pool_pda.key.as_ref(), &[pool.vault_authority_bump],
    ];

    let (expected_delegation, _) =
        state::derive_delegation_pda(program_id, pool_pda.key, validator_id);
    if *delegation_pda.key != expected_delegation {
        return Err(StakeError::InvalidPda.into());
    }
    if delegation_pda.data_is_empty() {
        return Err(StakeError::NoDelegationForValidator.into());
    }
    {
        let delegation_data = delegation_pda.try_borrow_data()?;
        let delegation: &ValidatorDelegation =
            bytemuck::from_bytes(&delegation_data[..VALIDATOR_DELEGATION_SIZE]);
        if delegation.is_initialized != 1 {
            return Err(StakeError::NoDelegationForValidator.into());
        }
        if amount > delegation.amount {
            return Err(StakeError::AmountExceedsDelegated.into());
        }
    }

    let reported = cpi::query_hub_stake(staking_program, hub, vault_auth.key, validator_id)?;
    if reported < amount {
        return Err(StakeError::StakedAmountTooLow.into());
    }

    let id = pool.withdraw_counter;
    pool.withdraw_counter = pool.withdraw_counter.checked_add(1)
        .ok_or(StakeError::Overflow)?;

    // The clawback request is owned by the pool itself — only
    // OperatorWithdrawToPool can resolve it
    let now = Clock::get()?.unix_timestamp;
    create_withdraw_request(
        program_id,
        operator,
        pool_pda.key,
        request_pda,
        index_pda,
        system_program,
        pool_pda.key,
        id,
        WITHDRAW_KIND_VALIDATOR,
        validator_id,
        amount,
        now,
    )?;

    // No shares are burned: the amount moves from delegated to pending so
    // total assets — and the rate — stay put while the stake is in flight
    pool.total_delegated = pool.total_delegated.checked_sub(amount)
        .ok_or(StakeError::Overflow)?;
    pool.pending_operator_withdraw = pool.pending_operator_withdraw.checked_add(amount)
        .ok_or(StakeError::Overflow)?;

    let mut delegation_data = delegation_pda.try_borrow_mut_data()?;
    let delegation: &mut ValidatorDelegation =
        bytemuck::from_bytes_mut(&mut delegation_data[..VALIDATOR_DELEGATION_SIZE]);
    delegation.amount = delegation.amount.checked_sub(amount)
        .ok_or(StakeError::Overflow)?;
    drop(delegation_data);

    cpi::cpi_hub_undelegate(
        staking_program,
        vault_auth,
        hub,
        validator_id,
        id,
        amount,
        vault_auth_seeds,
    )?;

    msg!(
        "Clawback: request {} for {} assets from validator {}",
        id, amount, validator_id,
    );
    Ok(())
}

// ═══════════════════════════════════════════════════════════════
// 8: OperatorWithdrawToPool — settle a clawback, slashing-aware
// ═══════════════════════════════════════════════════════════════

fn process_operator_withdraw_to_pool(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    id: u64,
    emergency: bool,
) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();

    let operator = next_account_info(accounts_iter)?;
    let pool_pda = next_account_info(accounts_iter)?;
    let request_pda = next_account_info(accounts_iter)?;
    let vault = next_account_info(accounts_iter)?;
    let vault_auth = next_account_info(accounts_iter)?;
    let share_mint = next_account_info(accounts_iter)?;
    let hub = next_account_info(accounts_iter)?;
    let hub_vault = next_account_info(accounts_iter)?;
    let hub_vault_auth = next_account_info(accounts_iter)?;
    let staking_program = next_account_info(accounts_iter)?;
    let token_program = next_account_info(accounts_iter)?;

    let mut pool_data = pool_pda.try_borrow_mut_data()?;
    let pool: &mut StakePool = bytemuck::from_bytes_mut(&mut pool_data[..STAKE_POOL_SIZE]);

    if pool.is_initialized != 1 {
        return Err(StakeError::NotInitialized.into());
    }
    require_capability(operator, pool.operator)?;
    if pool.share_mint != share_mint.key.to_bytes() {
        return Err(StakeError::InvalidMint.into());
    }
    if pool.vault != vault.key.to_bytes() {
        return Err(StakeError::InvalidPda.into());
    }
    if pool.hub != hub.key.to_bytes() {
        return Err(StakeError::InvalidPda.into());
    }
    if pool.staking_program != staking_program.key.to_bytes() {
        return Err(StakeError::InvalidStakingProgram.into());
    }
    verify_token_program(token_program)?;

    let (expected_request, _) = state::derive_withdraw_request_pda(program_id, pool_pda.key, id);
    if *request_pda.key != expected_request {
        return Err(StakeError::InvalidPda.into());
    }
    if request_pda.data_is_empty() {
        return Err(StakeError::RequestNotFound.into());
    }

    let (validator_id, asset_amount) = {
        let request_data = request_pda.try_borrow_data()?;
        let request: &WithdrawRequest =
            bytemuck::from_bytes(&request_data[..WITHDRAW_REQUEST_SIZE]);

        // Only pool-owned clawback requests settle through this path: the
        // pool PDA is both the expected owner and the expected pool
        let now = Clock::get()?.unix_timestamp;
        request.validate_resolve(pool_pda.key, pool_pda.key, now, pool.withdraw_delay)?;
        (request.validator_id, request.asset_amount)
    };

    let (expected_vault_auth, _) = state::derive_vault_authority(program_id, pool_pda.key);
    if *vault_auth.key != expected_vault_auth {
        return Err(StakeError::InvalidPda.into());
    }
    let vault_auth_seeds: &[&[u8]] = &[
        b"vault_auth", pool_pda.key.as_ref(), &[pool.vault_authority_bump],
    ];

    let supply = share_supply(share_mint)?;
    let rate_before = pool.current_rate(supply).ok_or(StakeError::Overflow)?;

    {
        let mut request_data = request_pda.try_borrow_mut_data()?;
        let request: &mut WithdrawRequest =
            bytemuck::from_bytes_mut(&mut request_data[..WITHDRAW_REQUEST_SIZE]);
        request.is_withdrawn = 1;
    }

    let balance_before = token_balance(vault)?;
    cpi::cpi_hub_withdraw(
        staking_program,
        vault_auth,
        hub,
        hub_vault,
        vault,
        token_program,
        hub_vault_auth,
        validator_id,
        id,
        vault_auth_seeds,
    )?;
    let balance_after = token_balance(vault)?;
    let actual = balance_after.checked_sub(balance_before)
        .ok_or(StakeError::Overflow)?;

    // Pending drops by what was requested, the pool gains what actually
    // arrived — any shortfall is exactly how slashing loss reaches the rate
    pool.pending_operator_withdraw = pool.pending_operator_withdraw
        .checked_sub(asset_amount)
        .ok_or(StakeError::Overflow)?;
    pool.total_pool = pool.total_pool.checked_add(actual)
        .ok_or(StakeError::Overflow)?;

    if !emergency {
        let rate_after = pool.current_rate(supply).ok_or(StakeError::Overflow)?;
        if !math::rate_non_decreasing(rate_before, rate_after) {
            return Err(StakeError::RateDecreased.into());
        }
    }

    msg!(
        "Clawback request {} settled: requested {}, received {} (emergency: {})",
        id, asset_amount, actual, emergency,
    );
    Ok(())
}

// ═══════════════════════════════════════════════════════════════
// 9: ClaimRewards — skim fee, fold remainder into the pool
// ═══════════════════════════════════════════════════════════════

fn process_claim_rewards(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    validator_ids: &[u64],
) -> ProgramResult {
    if validator_ids.is_empty() {
        return Err(StakeError::ZeroAmount.into());
    }

    let accounts_iter = &mut accounts.iter();

    let claimer = next_account_info(accounts_iter)?;
    let pool_pda = next_account_info(accounts_iter)?;
    let vault = next_account_info(accounts_iter)?;
    let vault_auth = next_account_info(accounts_iter)?;
    let share_mint = next_account_info(accounts_iter)?;
    let treasury_ata = next_account_info(accounts_iter)?;
    let hub = next_account_info(accounts_iter)?;
    let hub_vault = next_account_info(accounts_iter)?;
    let hub_vault_auth = next_account_info(accounts_iter)?;
    let staking_program = next_account_info(accounts_iter)?;
    let token_program = next_account_info(accounts_iter)?;

    let mut pool_data = pool_pda.try_borrow_mut_data()?;
    let pool: &mut StakePool = bytemuck::from_bytes_mut(&mut pool_data[..STAKE_POOL_SIZE]);

    if pool.is_initialized != 1 {
        return Err(StakeError::NotInitialized.into());
    }
    require_capability(claimer, pool.claimer)?;
    if pool.share_mint != share_mint.key.to_bytes() {
        return Err(StakeError::InvalidMint.into());
    }
    if pool.vault != vault.key.to_bytes() {
        return Err(StakeError::InvalidPda.into());
    }
    if pool.hub != hub.key.to_bytes() {
        return Err(StakeError::InvalidPda.into());
    }
    if pool.staking_program != staking_program.key.to_bytes() {
        return Err(StakeError::InvalidStakingProgram.into());
    }
    verify_token_program(token_program)?;

    // The fee must land with the configured treasury, in the pool's asset
    {
        let treasury_data = treasury_ata.try_borrow_data()?;
        let treasury_account = spl_token::state::Account::unpack(&treasury_data)?;
        if treasury_account.owner.to_bytes() != pool.treasury {
            return Err(StakeError::InvalidTreasuryAccount.into());
        }
        if treasury_account.mint.to_bytes() != pool.asset_mint {
            return Err(StakeError::InvalidMint.into());
        }
    }

    let (expected_vault_auth, _) = state::derive_vault_authority(program_id, pool_pda.key);
    if *vault_auth.key != expected_vault_auth {
        return Err(StakeError::InvalidPda.into());
    }
    let vault_auth_seeds: &[&[u8]] = &[
        b"vault_auth", pool_pda.key.as_ref(), &[pool.vault_authority_bump],
    ];

    let supply = share_supply(share_mint)?;
    let rate_before = pool.current_rate(supply).ok_or(StakeError::Overflow)?;
    let balance_before = token_balance(vault)?;

    for &validator_id in validator_ids {
        let pending = cpi::query_hub_pending_rewards(
            staking_program, hub, vault_auth.key, validator_id,
        )?;
        if pending == 0 {
            continue;
        }
        cpi::cpi_hub_claim_rewards(
            staking_program,
            vault_auth,
            hub,
            hub_vault,
            vault,
            token_program,
            hub_vault_auth,
            validator_id,
            vault_auth_seeds,
        )?;
    }

    // What actually arrived, not what the hub promised
    let balance_after = token_balance(vault)?;
    let total_claimed = balance_after.checked_sub(balance_before)
        .ok_or(StakeError::Overflow)?;

    let fee = math::protocol_fee(total_claimed, pool.protocol_fee_bips)
        .ok_or(StakeError::Overflow)?;

    // A failed treasury transfer aborts the whole claim
    if fee > 0 {
        invoke_signed(
            &spl_token::instruction::transfer(
                token_program.key,
                vault.key,
                treasury_ata.key,
                vault_auth.key,
                &[],
                fee,
            )?,
            &[vault.clone(), treasury_ata.clone(), vault_auth.clone(), token_program.clone()],
            &[vault_auth_seeds],
        )?;
    }

    pool.total_pool = pool.total_pool
        .checked_add(total_claimed.checked_sub(fee).ok_or(StakeError::Overflow)?)
        .ok_or(StakeError::Overflow)?;

    // The sole organic growth path — a decrease here is an accounting
    // bug, not a slashing event
    let rate_after = pool.current_rate(supply).ok_or(StakeError::Overflow)?;
    if !math::rate_non_decreasing(rate_before, rate_after) {
        return Err(StakeError::RateDecreased.into());
    }

    msg!(
        "Claimed {} rewards across {} validators, fee {} to treasury",
        total_claimed, validator_ids.len(), fee,
    );
    Ok(())
}

// ═══════════════════════════════════════════════════════════════
// 10: UpdateConfig
// ═══════════════════════════════════════════════════════════════

fn process_update_config(
    _program_id: &Pubkey,
    accounts: &[AccountInfo],
    new_withdraw_delay: Option<i64>,
    new_protocol_fee_bips: Option<u16>,
    new_treasury: Option<Pubkey>,
) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();

    let admin = next_account_info(accounts_iter)?;
    let pool_pda = next_account_info(accounts_iter)?;

    let mut pool_data = pool_pda.try_borrow_mut_data()?;
    let pool: &mut StakePool = bytemuck::from_bytes_mut(&mut pool_data[..STAKE_POOL_SIZE]);

    if pool.is_initialized != 1 {
        return Err(StakeError::NotInitialized.into());
    }
    require_capability(admin, pool.admin)?;

    if let Some(delay) = new_withdraw_delay {
        if delay < 0 {
            return Err(ProgramError::InvalidInstructionData);
        }
        pool.withdraw_delay = delay;
    }
    if let Some(fee) = new_protocol_fee_bips {
        if fee > MAX_PROTOCOL_FEE_BIPS {
            return Err(StakeError::FeeAboveMax.into());
        }
        pool.protocol_fee_bips = fee;
    }
    if let Some(treasury) = new_treasury {
        pool.treasury = treasury.to_bytes();
    }

    msg!("Pool config updated");
    Ok(())
}

// ═══════════════════════════════════════════════════════════════
// 11: UpdateRoles
// ═══════════════════════════════════════════════════════════════

fn process_update_roles(
    _program_id: &Pubkey,
    accounts: &[AccountInfo],
    new_operator: Option<Pubkey>,
    new_claimer: Option<Pubkey>,
) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();

    let admin = next_account_info(accounts_iter)?;
    let pool_pda = next_account_info(accounts_iter)?;

    let mut pool_data = pool_pda.try_borrow_mut_data()?;
    let pool: &mut StakePool = bytemuck::from_bytes_mut(&mut pool_data[..STAKE_POOL_SIZE]);

    if pool.is_initialized != 1 {
        return Err(StakeError::NotInitialized.into());
    }
    require_capability(admin, pool.admin)?;

    if let Some(operator) = new_operator {
        pool.operator = operator.to_bytes();
    }
    if let Some(claimer) = new_claimer {
        pool.claimer = claimer.to_bytes();
    }

    msg!("Pool roles updated");
    Ok(())
}

// ═══════════════════════════════════════════════════════════════
// 12: SetPause
// ═══════════════════════════════════════════════════════════════

fn process_set_pause(
    _program_id: &Pubkey,
    accounts: &[AccountInfo],
    flag: u8,
    paused: bool,
) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();

    let admin = next_account_info(accounts_iter)?;
    let pool_pda = next_account_info(accounts_iter)?;

    let mut pool_data = pool_pda.try_borrow_mut_data()?;
    let pool: &mut StakePool = bytemuck::from_bytes_mut(&mut pool_data[..STAKE_POOL_SIZE]);

    if pool.is_initialized != 1 {
        return Err(StakeError::NotInitialized.into());
    }
    require_capability(admin, pool.admin)?;

    let target = match flag {
        PAUSE_FLAG_DEPOSIT => &mut pool.deposit_paused,
        PAUSE_FLAG_UNDELEGATE => &mut pool.undelegate_paused,
        PAUSE_FLAG_WITHDRAW => &mut pool.withdraw_paused,
        _ => return Err(ProgramError::InvalidInstructionData),
    };
    let new_value = paused as u8;
    if *target == new_value {
        return Err(StakeError::PauseUnchanged.into());
    }
    *target = new_value;

    msg!("Pause flag {} set to {}", flag, paused);
    Ok(())
}

// ═══════════════════════════════════════════════════════════════
// 13: Migrate
// ═══════════════════════════════════════════════════════════════

fn process_migrate(
    _program_id: &Pubkey,
    accounts: &[AccountInfo],
) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();

    let admin = next_account_info(accounts_iter)?;
    let pool_pda = next_account_info(accounts_iter)?;

    let mut pool_data = pool_pda.try_borrow_mut_data()?;
    let pool: &mut StakePool = bytemuck::from_bytes_mut(&mut pool_data[..STAKE_POOL_SIZE]);

    if pool.is_initialized != 1 {
        return Err(StakeError::NotInitialized.into());
    }
    require_capability(admin, pool.admin)?;

    if pool.version >= STATE_VERSION {
        return Err(StakeError::AlreadyCurrentVersion.into());
    }
    // Future layout bumps add their field rewrites here, gated on the
    // version being migrated from
    pool.version = STATE_VERSION;

    msg!("Pool state migrated to version {}", STATE_VERSION);
    Ok(())
}
