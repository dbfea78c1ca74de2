//! CPI helpers for calling the staking hub program.
//!
//! We construct raw instruction data manually since we don't depend on the
//! hub crate. Tags match the hub's instruction decoder. The pool's staker
//! identity on the hub is the vault_auth PDA: it signs every hub call, and
//! the pool vault (owned by vault_auth) is the token account the hub pulls
//! from / pays into.
//!
//! Read-only queries (stake, pending rewards) use CPI return data: the hub
//! sets an 8-byte little-endian amount via set_return_data.

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    instruction::{AccountMeta, Instruction},
    program::{get_return_data, invoke, invoke_signed},
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::error::StakeError;

// ═══════════════════════════════════════════════════════════════
// Hub instruction tags (from the hub's instruction decoder)
// ═══════════════════════════════════════════════════════════════

const TAG_HUB_DELEGATE: u8 = 1;
const TAG_HUB_UNDELEGATE: u8 = 2;
const TAG_HUB_WITHDRAW: u8 = 3;
const TAG_HUB_PENDING_REWARDS: u8 = 4;
const TAG_HUB_CLAIM_REWARDS: u8 = 5;
const TAG_HUB_GET_STAKE: u8 = 6;

// ═══════════════════════════════════════════════════════════════
// Delegate (Tag 1) — value-bearing, staker signs
// ═══════════════════════════════════════════════════════════════
// Accounts: [staker(signer), hub(w), staker_ata(w), hub_vault(w), token_program]
// Data: tag(1) + validator_id(8) + amount(8)

pub fn cpi_hub_delegate<'a>(
    staking_program: &AccountInfo<'a>,
    staker: &AccountInfo<'a>,     // vault_auth PDA (we invoke_signed)
    hub: &AccountInfo<'a>,
    staker_ata: &AccountInfo<'a>, // pool vault (owned by vault_auth)
    hub_vault: &AccountInfo<'a>,
    token_program: &AccountInfo<'a>,
    validator_id: u64,
    amount: u64,
    staker_seeds: &[&[u8]],
) -> ProgramResult {
    let mut data = Vec::with_capacity(17);
    data.push(TAG_HUB_DELEGATE);
    data.extend_from_slice(&validator_id.to_le_bytes());
    data.extend_from_slice(&amount.to_le_bytes());

    let ix = Instruction {
        program_id: *staking_program.key,
        accounts: vec![
            AccountMeta::new_readonly(*staker.key, true),
            AccountMeta::new(*hub.key, false),
            AccountMeta::new(*staker_ata.key, false),
            AccountMeta::new(*hub_vault.key, false),
            AccountMeta::new_readonly(*token_program.key, false),
        ],
        data,
    };

    invoke_signed(
        &ix,
        &[
            staker.clone(),
            hub.clone(),
            staker_ata.clone(),
            hub_vault.clone(),
            token_program.clone(),
        ],
        &[staker_seeds],
    )
}

// ═══════════════════════════════════════════════════════════════
// Undelegate (Tag 2) — staker signs; hub starts its unbonding clock
// ═══════════════════════════════════════════════════════════════
// Accounts: [staker(signer), hub(w)]
// Data: tag(1) + validator_id(8) + request_id(8) + amount(8)

pub fn cpi_hub_undelegate<'a>(
    staking_program: &AccountInfo<'a>,
    staker: &AccountInfo<'a>,
    hub: &AccountInfo<'a>,
    validator_id: u64,
    request_id: u64,
    amount: u64,
    staker_seeds: &[&[u8]],
) -> ProgramResult {
    let mut data = Vec::with_capacity(25);
    data.push(TAG_HUB_UNDELEGATE);
    data.extend_from_slice(&validator_id.to_le_bytes());
    data.extend_from_slice(&request_id.to_le_bytes());
    data.extend_from_slice(&amount.to_le_bytes());

    let ix = Instruction {
        program_id: *staking_program.key,
        accounts: vec![
            AccountMeta::new_readonly(*staker.key, true),
            AccountMeta::new(*hub.key, false),
        ],
        data,
    };

    invoke_signed(&ix, &[staker.clone(), hub.clone()], &[staker_seeds])
}

// ═══════════════════════════════════════════════════════════════
// Withdraw (Tag 3) — value-bearing return; may pay less than the
// undelegated amount if the validator was slashed
// ═══════════════════════════════════════════════════════════════
// Accounts: [staker(signer), hub(w), hub_vault(w), staker_ata(w),
//            token_program, hub_vault_auth]
// Data: tag(1) + validator_id(8) + request_id(8)

pub fn cpi_hub_withdraw<'a>(
    staking_program: &AccountInfo<'a>,
    staker: &AccountInfo<'a>,
    hub: &AccountInfo<'a>,
    hub_vault: &AccountInfo<'a>,
    staker_ata: &AccountInfo<'a>, // pool vault — receives the actual amount
    token_program: &AccountInfo<'a>,
    hub_vault_auth: &AccountInfo<'a>,
    validator_id: u64,
    request_id: u64,
    staker_seeds: &[&[u8]],
) -> ProgramResult {
    let mut data = Vec::with_capacity(17);
    data.push(TAG_HUB_WITHDRAW);
    data.extend_from_slice(&validator_id.to_le_bytes());
    data.extend_from_slice(&request_id.to_le_bytes());

    let ix = Instruction {
        program_id: *staking_program.key,
        accounts: vec![
            AccountMeta::new_readonly(*staker.key, true),
            AccountMeta::new(*hub.key, false),
            AccountMeta::new(*hub_vault.key, false),
            AccountMeta::new(*staker_ata.key, false),
            AccountMeta::new_readonly(*token_program.key, false),
            AccountMeta::new_readonly(*hub_vault_auth.key, false),
        ],
        data,
    };

    invoke_signed(
        &ix,
        &[
            staker.clone(),
            hub.clone(),
            hub_vault.clone(),
            staker_ata.clone(),
            token_program.clone(),
            hub_vault_auth.clone(),
        ],
        &[staker_seeds],
    )
}

// ═══════════════════════════════════════════════════════════════
// ClaimRewards (Tag 5) — value-bearing return into staker_ata
// ═══════════════════════════════════════════════════════════════
// Accounts: [staker(signer), hub(w), hub_vault(w), staker_ata(w),
//            token_program, hub_vault_auth]
// Data: tag(1) + validator_id(8)

pub fn cpi_hub_claim_rewards<'a>(
    staking_program: &AccountInfo<'a>,
    staker: &AccountInfo<'a>,
    hub: &AccountInfo<'a>,
    hub_vault: &AccountInfo<'a>,
    staker_ata: &AccountInfo<'a>,
    token_program: &AccountInfo<'a>,
    hub_vault_auth: &AccountInfo<'a>,
    validator_id: u64,
    staker_seeds: &[&[u8]],
) -> ProgramResult {
    let mut data = Vec::with_capacity(9);
    data.push(TAG_HUB_CLAIM_REWARDS);
    data.extend_from_slice(&validator_id.to_le_bytes());

    let ix = Instruction {
        program_id: *staking_program.key,
        accounts: vec![
            AccountMeta::new_readonly(*staker.key, true),
            AccountMeta::new(*hub.key, false),
            AccountMeta::new(*hub_vault.key, false),
            AccountMeta::new(*staker_ata.key, false),
            AccountMeta::new_readonly(*token_program.key, false),
            AccountMeta::new_readonly(*hub_vault_auth.key, false),
        ],
        data,
    };

    invoke_signed(
        &ix,
        &[
            staker.clone(),
            hub.clone(),
            hub_vault.clone(),
            staker_ata.clone(),
            token_program.clone(),
            hub_vault_auth.clone(),
        ],
        &[staker_seeds],
    )
}

// ═══════════════════════════════════════════════════════════════
// Return-data queries (Tags 4, 6) — no signer, hub read-only
// ═══════════════════════════════════════════════════════════════
// Accounts: [hub]
// Data: tag(1) + staker(32) + validator_id(8)
// Return data: amount as u64 LE

fn query_hub_amount<'a>(
    staking_program: &AccountInfo<'a>,
    hub: &AccountInfo<'a>,
    tag: u8,
    staker: &Pubkey,
    validator_id: u64,
) -> Result<u64, ProgramError> {
    let mut data = Vec::with_capacity(41);
    data.push(tag);
    data.extend_from_slice(staker.as_ref());
    data.extend_from_slice(&validator_id.to_le_bytes());

    let ix = Instruction {
        program_id: *staking_program.key,
        accounts: vec![AccountMeta::new_readonly(*hub.key, false)],
        data,
    };

    invoke(&ix, &[hub.clone()])?;

    let (responder, payload) = get_return_data().ok_or(StakeError::InvalidHubResponse)?;
    if responder != *staking_program.key || payload.len() < 8 {
        return Err(StakeError::InvalidHubResponse.into());
    }
    Ok(u64::from_le_bytes(
        payload[0..8].try_into().map_err(|_| StakeError::InvalidHubResponse)?,
    ))
}

/// Stake the hub reports for (staker, validator). The authoritative
/// figure — our ValidatorDelegation record is only the internal view.
pub fn query_hub_stake<'a>(
    staking_program: &AccountInfo<'a>,
    hub: &AccountInfo<'a>,
    staker: &Pubkey,
    validator_id: u64,
) -> Result<u64, ProgramError> {
    query_hub_amount(staking_program, hub, TAG_HUB_GET_STAKE, staker, validator_id)
}

/// Rewards claimable right now for (staker, validator).
pub fn query_hub_pending_rewards<'a>(
    staking_program: &AccountInfo<'a>,
    hub: &AccountInfo<'a>,
    staker: &Pubkey,
    validator_id: u64,
) -> Result<u64, ProgramError> {
    query_hub_amount(staking_program, hub, TAG_HUB_PENDING_REWARDS, staker, validator_id)
}
