//! Kani formal verification for liquid-stake share math.
//!
//! ZERO dependencies. Pure Rust. CBMC-friendly.
//!
//! KEY DESIGN DECISION: Functions use u32 inputs / u64 intermediates.
//! The production code uses u64/u128, but the arithmetic properties
//! (conservation, monotonicity, bounds) are scale-invariant.
//! u32 keeps SAT formulas tractable for CBMC (<60s per proof).
//!
//! Run all:   cargo kani --lib
//! Run one:   cargo kani --harness proof_first_depositor_exact

// ═══════════════════════════════════════════════════════════════
// Share Math (u32/u64 mirror of liquid-stake/src/math.rs)
// Arithmetic is IDENTICAL — just narrower types for CBMC tractability.
// ═══════════════════════════════════════════════════════════════

/// Fixed-point rate scale. Narrow mirror of the production 1e18.
pub const RATE_SCALE: u64 = 1_000_000;

/// Shares for a deposit. Bootstrap: 1:1. Subsequent: pro-rata (floor).
pub fn convert_to_shares(amount: u32, total_assets: u32, share_supply: u32) -> Option<u32> {
    if total_assets == 0 || share_supply == 0 {
        return Some(amount);
    }
    let shares = (amount as u64)
        .checked_mul(share_supply as u64)?
        .checked_div(total_assets as u64)?;
    if shares > u32::MAX as u64 {
        None
    } else {
        Some(shares as u32)
    }
}

/// Assets for a share burn. Symmetric inverse, same truncation direction.
pub fn convert_to_assets(shares: u32, total_assets: u32, share_supply: u32) -> Option<u32> {
    if total_assets == 0 || share_supply == 0 {
        return Some(shares);
    }
    let assets = (shares as u64)
        .checked_mul(total_assets as u64)?
        .checked_div(share_supply as u64)?;
    if assets > u32::MAX as u64 {
        None
    } else {
        Some(assets as u32)
    }
}

/// Exchange rate in fixed point. Zero supply bootstraps to RATE_SCALE.
pub fn rate(total_assets: u32, share_supply: u32) -> u64 {
    if share_supply == 0 {
        return RATE_SCALE;
    }
    (total_assets as u64) * RATE_SCALE / (share_supply as u64)
}

/// Rate guard for share-moving operations: cross-multiplied non-decrease,
/// with the increase capped at the conversion remainder (`< assets_before`
/// on a mint, `< supply_before` on a burn).
pub fn rate_within_tolerance(
    assets_before: u32,
    supply_before: u32,
    assets_after: u32,
    supply_after: u32,
) -> bool {
    if supply_before == 0 || supply_after == 0 {
        return true;
    }
    let lhs = (assets_after as u64) * (supply_before as u64);
    let rhs = (assets_before as u64) * (supply_after as u64);
    lhs >= rhs && lhs - rhs <= assets_before.max(supply_before) as u64
}

/// Rate guard for growth operations.
pub fn rate_non_decreasing(before: u64, after: u64) -> bool {
    after >= before
}

/// Total assets = pool + delegated + pending.
pub fn total_assets(pool: u32, delegated: u32, pending: u32) -> Option<u32> {
    pool.checked_add(delegated)?.checked_add(pending)
}

/// Fee skim: total * bips / 10_000, floor.
pub fn protocol_fee(total: u32, fee_bips: u16) -> Option<u32> {
    let fee = (total as u64)
        .checked_mul(fee_bips as u64)?
        .checked_div(10_000)?;
    if fee > u32::MAX as u64 {
        None
    } else {
        Some(fee as u32)
    }
}

// ═══════════════════════════════════════════════════════════════
// KANI PROOFS
// ═══════════════════════════════════════════════════════════════

#[cfg(kani)]
mod proofs {
    use super::*;

    // ── 1. Conservation ──

    /// Deposit→exit roundtrip: can't get back more than deposited.
    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_deposit_exit_no_inflation() {
        let supply: u32 = kani::any();
        let assets: u32 = kani::any();
        let deposit: u32 = kani::any();
        kani::assume(deposit > 0 && deposit < 20);
        kani::assume(supply > 0 && supply < 20);
        kani::assume(assets > 0 && assets < 20);

        let shares = match convert_to_shares(deposit, assets, supply) {
            Some(s) if s > 0 => s,
            _ => return,
        };
        let ns = supply + shares;
        let na = assets + deposit;

        let back = match convert_to_assets(shares, na, ns) {
            Some(v) => v,
            None => return,
        };
        assert!(back <= deposit);
    }

    /// First depositor: exact 1:1 in and out.
    #[kani::proof]
    fn proof_first_depositor_exact() {
        let amount: u32 = kani::any();
        kani::assume(amount > 0);

        let shares = convert_to_shares(amount, 0, 0).unwrap();
        assert_eq!(shares, amount);

        let back = convert_to_assets(shares, amount, shares).unwrap();
        assert_eq!(back, amount);
    }

    /// Two depositors both exiting can never extract more than they put in.
    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_two_depositors_conservation() {
        let a: u32 = kani::any();
        let b: u32 = kani::any();
        kani::assume(a > 0 && a < 20);
        kani::assume(b > 0 && b < 20);

        let a_shares = convert_to_shares(a, 0, 0).unwrap();
        let b_shares = match convert_to_shares(b, a, a_shares) {
            Some(s) if s > 0 => s,
            _ => return,
        };
        let s2 = a_shares + b_shares;
        let t2 = a + b;

        let a_back = match convert_to_assets(a_shares, t2, s2) {
            Some(v) => v,
            None => return,
        };
        let b_back = match convert_to_assets(b_shares, t2 - a_back, s2 - a_shares) {
            Some(v) => v,
            None => return,
        };
        assert!(a_back + b_back <= a + b);
    }

    // ── 2. Arithmetic safety ──

    /// convert_to_shares never panics for any inputs.
    #[kani::proof]
    fn proof_shares_no_panic() {
        let amount: u32 = kani::any();
        let assets: u32 = kani::any();
        let supply: u32 = kani::any();
        let _ = convert_to_shares(amount, assets, supply);
    }

    /// convert_to_assets never panics for any inputs.
    #[kani::proof]
    fn proof_assets_no_panic() {
        let shares: u32 = kani::any();
        let assets: u32 = kani::any();
        let supply: u32 = kani::any();
        let _ = convert_to_assets(shares, assets, supply);
    }

    /// rate never panics — u32::MAX * RATE_SCALE fits in u64.
    #[kani::proof]
    fn proof_rate_no_panic() {
        let assets: u32 = kani::any();
        let supply: u32 = kani::any();
        let _ = rate(assets, supply);
    }

    /// total_assets never panics.
    #[kani::proof]
    fn proof_total_assets_no_panic() {
        let p: u32 = kani::any();
        let d: u32 = kani::any();
        let w: u32 = kani::any();
        let _ = total_assets(p, d, w);
    }

    // ── 3. Fairness ──

    /// Equal deposits get equal shares.
    #[kani::proof]
    fn proof_equal_deposits_equal_shares() {
        let supply: u32 = kani::any();
        let assets: u32 = kani::any();
        let amount: u32 = kani::any();
        assert_eq!(
            convert_to_shares(amount, assets, supply),
            convert_to_shares(amount, assets, supply)
        );
    }

    /// Larger deposit never mints fewer shares.
    #[kani::proof]
    fn proof_larger_deposit_more_shares() {
        let supply: u32 = kani::any();
        let assets: u32 = kani::any();
        let small: u32 = kani::any();
        let large: u32 = kani::any();
        kani::assume(supply > 0 && assets > 0);
        kani::assume(small > 0 && large > small);

        let (s, l) = match (
            convert_to_shares(small, assets, supply),
            convert_to_shares(large, assets, supply),
        ) {
            (Some(s), Some(l)) => (s, l),
            _ => return,
        };
        assert!(l >= s);
    }

    /// Larger burn never returns fewer assets.
    #[kani::proof]
    fn proof_larger_burn_more_assets() {
        let supply: u32 = kani::any();
        let assets: u32 = kani::any();
        let small: u32 = kani::any();
        let large: u32 = kani::any();
        kani::assume(supply > 0 && assets > 0);
        kani::assume(small > 0 && large > small && large <= supply);

        let (s, l) = match (
            convert_to_assets(small, assets, supply),
            convert_to_assets(large, assets, supply),
        ) {
            (Some(s), Some(l)) => (s, l),
            _ => return,
        };
        assert!(l >= s);
    }

    // ── 4. Exit bounds ──

    /// Burning the whole supply can't extract more than total assets.
    #[kani::proof]
    fn proof_full_burn_bounded() {
        let supply: u32 = kani::any();
        let assets: u32 = kani::any();
        kani::assume(supply > 0);

        if let Some(out) = convert_to_assets(supply, assets, supply) {
            assert!(out <= assets);
        }
    }

    // ── 5. Rate invariant ──

    /// A pro-rata deposit stays within the truncation allowance.
    #[kani::proof]
    fn proof_deposit_rate_within_tolerance() {
        let supply: u32 = kani::any();
        let assets: u32 = kani::any();
        let deposit: u32 = kani::any();
        kani::assume(supply > 0 && assets > 0 && deposit > 0);
        kani::assume(deposit <= u32::MAX - assets);

        let shares = match convert_to_shares(deposit, assets, supply) {
            Some(s) if s > 0 => s,
            _ => return,
        };
        if supply.checked_add(shares).is_none() {
            return;
        }

        assert!(rate_within_tolerance(assets, supply, assets + deposit, supply + shares));
    }

    /// A pro-rata burn stays within the truncation allowance.
    #[kani::proof]
    fn proof_burn_rate_within_tolerance() {
        let supply: u32 = kani::any();
        let assets: u32 = kani::any();
        let burn: u32 = kani::any();
        kani::assume(supply > 1 && assets > 0);
        kani::assume(burn > 0 && burn < supply);

        let out = match convert_to_assets(burn, assets, supply) {
            Some(v) => v,
            None => return,
        };

        assert!(rate_within_tolerance(assets, supply, assets - out, supply - burn));
    }

    /// Rewards folded in without minting never decrease the rate.
    #[kani::proof]
    fn proof_reward_growth_monotone() {
        let supply: u32 = kani::any();
        let assets: u32 = kani::any();
        let reward: u32 = kani::any();
        kani::assume(assets.checked_add(reward).is_some());

        let before = rate(assets, supply);
        let after = rate(assets + reward, supply);
        assert!(rate_non_decreasing(before, after));
    }

    // ── 6. Fee bounds ──

    /// The fee never exceeds the claimed total for any in-range bips.
    #[kani::proof]
    fn proof_fee_bounded() {
        let total: u32 = kani::any();
        let bips: u16 = kani::any();
        kani::assume(bips <= 10_000);

        let fee = protocol_fee(total, bips).unwrap();
        assert!(fee <= total);
    }

    /// Full bips takes exactly the total; zero bips takes nothing.
    #[kani::proof]
    fn proof_fee_endpoints() {
        let total: u32 = kani::any();
        assert_eq!(protocol_fee(total, 10_000), Some(total));
        assert_eq!(protocol_fee(total, 0), Some(0));
    }

    // ── 7. Rounding direction ──

    /// Share minting rounds down: shares * assets <= deposit * supply.
    #[kani::proof]
    fn proof_shares_round_down() {
        let supply: u32 = kani::any();
        let assets: u32 = kani::any();
        let deposit: u32 = kani::any();
        kani::assume(supply > 0 && assets > 0 && deposit > 0);

        if let Some(shares) = convert_to_shares(deposit, assets, supply) {
            assert!((shares as u64) * (assets as u64) <= (deposit as u64) * (supply as u64));
        }
    }

    /// Asset conversion rounds down: out * supply <= shares * assets.
    #[kani::proof]
    fn proof_assets_round_down() {
        let supply: u32 = kani::any();
        let assets: u32 = kani::any();
        let shares: u32 = kani::any();
        kani::assume(supply > 0 && assets > 0 && shares > 0);
        kani::assume(shares <= supply);

        if let Some(out) = convert_to_assets(shares, assets, supply) {
            assert!((out as u64) * (supply as u64) <= (shares as u64) * (assets as u64));
        }
    }
}
