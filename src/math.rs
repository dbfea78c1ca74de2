//! Pure share/asset conversion and rate math — extracted for Kani formal
//! verification and proptest.
//!
//! No Solana/Pubkey dependencies. Just arithmetic.
//! Kani can verify these functions exhaustively (see kani-proofs/).

/// Fixed-point scale of the exchange rate: 1e18.
pub const RATE_SCALE: u128 = 1_000_000_000_000_000_000;

/// Basis-point denominator for the protocol fee.
pub const BIPS_DENOMINATOR: u64 = 10_000;

/// Convert an asset amount to shares at the current pool totals.
///
/// # Invariant
/// Bootstrap (zero assets or zero supply): 1:1.
/// Otherwise `shares = amount * supply / total_assets`, truncated toward
/// zero — rounds in favor of the pool (fewer shares minted per asset).
///
/// # Returns
/// * `Some(shares)` — shares to mint
/// * `None` — arithmetic overflow
pub fn convert_to_shares(amount: u64, total_assets: u64, share_supply: u64) -> Option<u64> {
    if total_assets == 0 || share_supply == 0 {
        return Some(amount);
    }
    let shares = (amount as u128)
        .checked_mul(share_supply as u128)?
        .checked_div(total_assets as u128)?;
    if shares > u64::MAX as u128 {
        None
    } else {
        Some(shares as u64)
    }
}

/// Convert a share amount to assets at the current pool totals.
///
/// Symmetric inverse of [`convert_to_shares`]: same bootstrap rule, same
/// truncation direction (fewer assets returned per share).
pub fn convert_to_assets(shares: u64, total_assets: u64, share_supply: u64) -> Option<u64> {
    if total_assets == 0 || share_supply == 0 {
        return Some(shares);
    }
    let assets = (shares as u128)
        .checked_mul(total_assets as u128)?
        .checked_div(share_supply as u128)?;
    if assets > u64::MAX as u128 {
        None
    } else {
        Some(assets as u64)
    }
}

/// Exchange rate in 1e18 fixed point: asset value of one unit of share.
///
/// Zero supply bootstraps to exactly `RATE_SCALE` (rate 1.0).
/// Cannot overflow: `u64::MAX * RATE_SCALE < u128::MAX`.
pub fn rate(total_assets: u64, share_supply: u64) -> u128 {
    if share_supply == 0 {
        return RATE_SCALE;
    }
    (total_assets as u128) * RATE_SCALE / (share_supply as u128)
}

/// Guard for share-moving operations (deposit, share burn). Compared by
/// cross-multiplication so no fixed-point division error enters:
/// `rate_after >= rate_before` iff
/// `assets_after * supply_before >= assets_before * supply_after`.
/// The increase is capped at what one truncated conversion can account
/// for: the remainder is `< assets_before` when minting and
/// `< supply_before` when burning. A larger jump, or any decrease, is an
/// accounting defect and the caller must abort.
pub fn rate_within_tolerance(
    assets_before: u64,
    supply_before: u64,
    assets_after: u64,
    supply_after: u64,
) -> bool {
    if supply_before == 0 || supply_after == 0 {
        // Bootstrap mint and full exit convert 1:1
        return true;
    }
    let lhs = (assets_after as u128) * (supply_before as u128);
    let rhs = (assets_before as u128) * (supply_after as u128);
    lhs >= rhs && lhs - rhs <= assets_before.max(supply_before) as u128
}

/// Growth paths (reward claim, donation) and the operator withdraw-to-pool
/// path: any decrease is illegitimate, growth is unbounded.
pub fn rate_non_decreasing(before: u128, after: u128) -> bool {
    after >= before
}

/// Total assets under management: pool + delegated + in-flight operator
/// withdrawals. `None` means the accounting overflowed, which is fatal.
pub fn total_assets(total_pool: u64, total_delegated: u64, pending_operator_withdraw: u64) -> Option<u64> {
    total_pool
        .checked_add(total_delegated)?
        .checked_add(pending_operator_withdraw)
}

/// Protocol fee skimmed from claimed rewards: `total * fee_bips / 10_000`,
/// truncated. With `fee_bips <= 10_000` the result never exceeds `total`.
pub fn protocol_fee(total: u64, fee_bips: u16) -> Option<u64> {
    let fee = (total as u128)
        .checked_mul(fee_bips as u128)?
        .checked_div(BIPS_DENOMINATOR as u128)?;
    if fee > u64::MAX as u128 {
        None
    } else {
        Some(fee as u64)
    }
}

/// Number of items a page returns: `min(max_size, count - skip)`.
/// Precondition (validated by the caller): `skip < count`, `max_size > 0`.
pub fn page_len(count: u64, skip: u64, max_size: u64) -> u64 {
    max_size.min(count - skip)
}

/// Index-arithmetic for pagination: position of the `i`-th item of a page.
/// Forward walks oldest-to-newest from `skip`; reverse walks
/// newest-to-oldest from the `skip`-th-from-newest.
pub fn page_position(count: u64, skip: u64, i: u64, reverse: bool) -> u64 {
    if reverse {
        count - 1 - skip - i
    } else {
        skip + i
    }
}
