//! Liquid Staking Pool Program
//!
//! Accounting core for a liquid staking protocol. Users deposit the asset
//! token and receive a fungible share token; the pool delegates the assets
//! to validators on an external staking hub program via CPI, claims the
//! rewards, and the share/asset exchange rate appreciates.
//!
//! Architecture:
//! - One StakePool PDA per staking hub, holding the split accounting
//!   (total_pool / total_delegated / pending_operator_withdraw)
//! - The vault_auth PDA is the pool's staker identity on the hub: it owns
//!   the asset vault, is the share mint authority, and signs every hub CPI
//! - Share supply lives in the SPL mint — never mirrored in pool state
//! - Exits are two-phase: burn shares to open a WithdrawRequest, then
//!   withdraw after the configured delay (validator exits pull the stake
//!   back from the hub at resolution time)
//! - The exchange rate is guarded on every accounting path: it may only
//!   grow via reward claims and donations, and slashing losses require an
//!   explicit emergency flag to be realized
//!
//! Instructions:
//!   0 - InitPool:                 Create pool PDA, share mint, asset vault
//!   1 - Deposit:                  Assets → vault, mint shares pro-rata
//!   2 - Donate:                   Assets → pool, no shares (rate grows)
//!   3 - Delegate:                 Operator moves pool assets to a validator (hub CPI)
//!   4 - Undelegate:               Burn shares against a delegation, open request
//!   5 - UndelegateFromPool:       Burn shares against the pool, open request
//!   6 - Withdraw:                 Resolve a request after the delay
//!   7 - OperatorUndelegateToPool: Clawback from a validator, no burn
//!   8 - OperatorWithdrawToPool:   Settle a clawback into the pool
//!   9 - ClaimRewards:             Claim hub rewards, skim fee, grow the rate
//!  10 - UpdateConfig:             Admin updates delay / fee / treasury
//!  11 - UpdateRoles:              Admin rotates operator / claimer
//!  12 - SetPause:                 Admin toggles deposit/undelegate/withdraw pause
//!  13 - Migrate:                  Admin bumps the state layout version

pub mod cpi;
pub mod error;
pub mod instruction;
pub mod math;
pub mod processor;
pub mod state;

#[cfg(not(feature = "no-entrypoint"))]
mod entrypoint;
