use bytemuck::{Pod, Zeroable};
use solana_program::pubkey::Pubkey;

use crate::error::StakeError;
use crate::math;

/// Current layout version of [`StakePool`]. Bumped together with a
/// migration arm in the Migrate instruction whenever the layout changes.
pub const STATE_VERSION: u8 = 1;

/// Capacity of the per-user withdraw index. The ledger itself is
/// append-only and unbounded (one PDA per request); only the per-user
/// pagination index is capped.
pub const MAX_USER_WITHDRAWS: usize = 128;

/// Default withdraw delay: 14 days in seconds.
pub const DEFAULT_WITHDRAW_DELAY: i64 = 14 * 24 * 60 * 60;

/// Default protocol fee: 1000 bips (10%).
pub const DEFAULT_PROTOCOL_FEE_BIPS: u16 = 1000;

/// Upper bound on the protocol fee.
pub const MAX_PROTOCOL_FEE_BIPS: u16 = 10_000;

/// Withdraw request kinds.
pub const WITHDRAW_KIND_POOL: u8 = 0;
pub const WITHDRAW_KIND_VALIDATOR: u8 = 1;

/// Liquid staking pool state — one per staking hub.
/// PDA seeds: [b"stake_pool", hub_pubkey]
///
/// Holds the three accounting totals, the capability pubkeys, and the
/// admin-mutable configuration. The share supply is deliberately NOT
/// tracked here — it is read from the share mint, which is the single
/// source of truth for shares outstanding.
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct StakePool {
    /// Whether the pool is initialized (1 = yes, 0 = no)
    pub is_initialized: u8,

    /// Layout version, set to STATE_VERSION at init
    pub version: u8,

    /// Bump seed for the pool PDA
    pub bump: u8,

    /// Bump seed for the vault authority PDA
    pub vault_authority_bump: u8,

    /// Per-function pause flags (1 = paused)
    pub deposit_paused: u8,
    pub undelegate_paused: u8,
    pub withdraw_paused: u8,

    /// Padding for alignment
    pub _padding0: u8,

    /// The staking hub state account this pool delegates through
    pub hub: [u8; 32],

    /// Admin capability: config, roles, pause toggles, migration
    pub admin: [u8; 32],

    /// Operator capability: delegate, clawback undelegate/withdraw
    pub operator: [u8; 32],

    /// Claimant capability: reward claiming
    pub claimer: [u8; 32],

    /// Treasury wallet receiving the protocol fee
    pub treasury: [u8; 32],

    /// Base asset mint
    pub asset_mint: [u8; 32],

    /// Share mint (authority = vault_auth PDA); its supply is the
    /// totalShareSupply read by the conversion engine
    pub share_mint: [u8; 32],

    /// Vault holding undelegated assets and in-transit withdrawals
    /// (owned by vault_auth PDA)
    pub vault: [u8; 32],

    /// Staking hub program ID (for CPI)
    pub staking_program: [u8; 32],

    /// Assets held undelegated, immediately available for delegation
    /// or pool-undelegation
    pub total_pool: u64,

    /// Assets believed delegated to validators, as tracked internally.
    /// May diverge from the hub's truth after slashing until an operator
    /// withdraw reconciles it.
    pub total_delegated: u64,

    /// Assets undelegated by the operator and not yet returned to the
    /// pool. Still counts toward total assets so the clawback does not
    /// move the rate.
    pub pending_operator_withdraw: u64,

    /// Monotonic withdraw request id source. Never reused, shared across
    /// both request kinds.
    pub withdraw_counter: u64,

    /// Seconds between request creation and claimability
    pub withdraw_delay: i64,

    /// Protocol fee on claimed rewards, in bips (max 10_000)
    pub protocol_fee_bips: u16,

    /// Padding for alignment
    pub _padding1: [u8; 6],

    /// Reserved for future use
    pub _reserved: [u8; 64],
}

/// Size of StakePool in bytes
pub const STAKE_POOL_SIZE: usize = core::mem::size_of::<StakePool>();

/// One pending or resolved withdraw claim.
/// PDA seeds: [b"withdraw_request", pool_pda, id_le_bytes]
///
/// Append-only ledger entry: written once at creation, mutated exactly
/// once (is_withdrawn 0 → 1), never closed.
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct WithdrawRequest {
    /// Whether this record is initialized
    pub is_initialized: u8,

    /// Bump seed for the request PDA
    pub bump: u8,

    /// WITHDRAW_KIND_POOL or WITHDRAW_KIND_VALIDATOR
    pub kind: u8,

    /// Set once by a matching withdraw; never reverts to 0
    pub is_withdrawn: u8,

    /// Padding
    pub _padding: [u8; 4],

    /// Globally unique id assigned from the pool counter
    pub id: u64,

    /// Meaningful only for WITHDRAW_KIND_VALIDATOR
    pub validator_id: u64,

    /// Amount owed, fixed at creation
    pub asset_amount: u64,

    /// Unix timestamp of creation; claimable after withdraw_delay
    pub request_timestamp: i64,

    /// The pool this request belongs to
    pub pool: [u8; 32],

    /// The only address that may claim this request. Operator clawback
    /// requests are owned by the pool PDA itself.
    pub owner: [u8; 32],

    /// Reserved for future use
    pub _reserved: [u8; 32],
}

/// Size of WithdrawRequest in bytes
pub const WITHDRAW_REQUEST_SIZE: usize = core::mem::size_of::<WithdrawRequest>();

/// Per-user ordered sequence of withdraw request ids, append-only.
/// PDA seeds: [b"withdraw_index", pool_pda, owner]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct UserWithdrawIndex {
    /// Whether this record is initialized
    pub is_initialized: u8,

    /// Bump seed for the index PDA
    pub bump: u8,

    /// Padding
    pub _padding: [u8; 6],

    /// Number of ids appended so far
    pub count: u64,

    /// The pool this index belongs to
    pub pool: [u8; 32],

    /// The owner whose requests are indexed
    pub owner: [u8; 32],

    /// Request ids, oldest first
    pub ids: [u64; MAX_USER_WITHDRAWS],

    /// Reserved for future use
    pub _reserved: [u8; 16],
}

/// Size of UserWithdrawIndex in bytes
pub const USER_WITHDRAW_INDEX_SIZE: usize = core::mem::size_of::<UserWithdrawIndex>();

/// Internally tracked stake per validator.
/// PDA seeds: [b"delegation", pool_pda, validator_id_le_bytes]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct ValidatorDelegation {
    /// Whether this record is initialized
    pub is_initialized: u8,

    /// Bump seed for the delegation PDA
    pub bump: u8,

    /// Padding
    pub _padding: [u8; 6],

    /// Hub validator id
    pub validator_id: u64,

    /// Assets delegated to this validator, as tracked internally
    pub amount: u64,

    /// The pool this delegation belongs to
    pub pool: [u8; 32],

    /// Reserved for future use
    pub _reserved: [u8; 32],
}

/// Size of ValidatorDelegation in bytes
pub const VALIDATOR_DELEGATION_SIZE: usize = core::mem::size_of::<ValidatorDelegation>();

impl StakePool {
    pub fn hub_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.hub)
    }

    pub fn admin_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.admin)
    }

    pub fn operator_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.operator)
    }

    pub fn claimer_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.claimer)
    }

    pub fn treasury_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.treasury)
    }

    pub fn share_mint_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.share_mint)
    }

    pub fn vault_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.vault)
    }

    pub fn staking_program_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.staking_program)
    }

    /// Total assets = pool + delegated + pending operator withdraw.
    /// Delegates to pure math module.
    pub fn total_assets(&self) -> Option<u64> {
        math::total_assets(
            self.total_pool,
            self.total_delegated,
            self.pending_operator_withdraw,
        )
    }

    /// Shares minted for an asset deposit, given the share mint supply.
    pub fn calc_shares_for_deposit(&self, amount: u64, share_supply: u64) -> Option<u64> {
        math::convert_to_shares(amount, self.total_assets()?, share_supply)
    }

    /// Assets owed for a share burn, given the share mint supply.
    pub fn calc_assets_for_shares(&self, shares: u64, share_supply: u64) -> Option<u64> {
        math::convert_to_assets(shares, self.total_assets()?, share_supply)
    }

    /// Exchange rate in 1e18 fixed point.
    pub fn current_rate(&self, share_supply: u64) -> Option<u128> {
        Some(math::rate(self.total_assets()?, share_supply))
    }
}

impl WithdrawRequest {
    pub fn pool_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.pool)
    }

    pub fn owner_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.owner)
    }

    /// Whether the withdraw delay has elapsed.
    pub fn is_claimable(&self, now: i64, withdraw_delay: i64) -> bool {
        now >= self.request_timestamp.saturating_add(withdraw_delay)
    }

    /// Preconditions for resolving this request, checked in a fixed order
    /// by both withdraw paths before any state mutation. A request resolves
    /// at most once: the second attempt fails with AlreadyWithdrawn.
    pub fn validate_resolve(
        &self,
        caller: &Pubkey,
        pool: &Pubkey,
        now: i64,
        withdraw_delay: i64,
    ) -> Result<(), StakeError> {
        if self.is_initialized != 1 {
            return Err(StakeError::RequestNotFound);
        }
        if self.pool != pool.to_bytes() {
            return Err(StakeError::InvalidPda);
        }
        if self.owner != caller.to_bytes() {
            return Err(StakeError::NotRequestOwner);
        }
        if self.is_withdrawn != 0 {
            return Err(StakeError::AlreadyWithdrawn);
        }
        if !self.is_claimable(now, withdraw_delay) {
            return Err(StakeError::DelayNotElapsed);
        }
        Ok(())
    }
}

impl UserWithdrawIndex {
    /// Append a request id. Exactly one append per created request.
    pub fn push(&mut self, id: u64) -> Result<(), StakeError> {
        let at = self.count as usize;
        if at >= MAX_USER_WITHDRAWS {
            return Err(StakeError::UserIndexFull);
        }
        self.ids[at] = id;
        self.count += 1;
        Ok(())
    }

    /// Cursor-based pagination over the id sequence. Pure index
    /// arithmetic, no mutation. Forward order walks oldest-to-newest
    /// starting at `skip`; reverse walks newest-to-oldest starting at
    /// the skip-th-from-newest.
    pub fn page(&self, skip: u64, max_size: u64, reverse: bool) -> Result<Vec<u64>, StakeError> {
        if max_size == 0 {
            return Err(StakeError::MaxSizeZero);
        }
        if skip >= self.count {
            return Err(StakeError::SkipOutOfRange);
        }
        let len = math::page_len(self.count, skip, max_size);
        let mut out = Vec::with_capacity(len as usize);
        for i in 0..len {
            let pos = math::page_position(self.count, skip, i, reverse);
            out.push(self.ids[pos as usize]);
        }
        Ok(out)
    }
}

/// Derive the stake pool PDA for a given hub.
pub fn derive_pool_pda(program_id: &Pubkey, hub: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[b"stake_pool", hub.as_ref()], program_id)
}

/// Derive the vault authority PDA for a given pool.
/// Controls: share mint authority + vault token account authority +
/// the pool's staker identity on the hub.
pub fn derive_vault_authority(program_id: &Pubkey, pool: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[b"vault_auth", pool.as_ref()], program_id)
}

/// Derive the withdraw request PDA for a given id.
pub fn derive_withdraw_request_pda(program_id: &Pubkey, pool: &Pubkey, id: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[b"withdraw_request", pool.as_ref(), &id.to_le_bytes()],
        program_id,
    )
}

/// Derive the per-user withdraw index PDA.
pub fn derive_withdraw_index_pda(
    program_id: &Pubkey,
    pool: &Pubkey,
    owner: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[b"withdraw_index", pool.as_ref(), owner.as_ref()],
        program_id,
    )
}

/// Derive the per-validator delegation PDA.
pub fn derive_delegation_pda(
    program_id: &Pubkey,
    pool: &Pubkey,
    validator_id: u64,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[b"delegation", pool.as_ref(), &validator_id.to_le_bytes()],
        program_id,
    )
}
