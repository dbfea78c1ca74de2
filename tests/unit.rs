//! Unit tests for liquid-stake share math, state, and lifecycle accounting.

use bytemuck::Zeroable;
use liquid_stake::error::StakeError;
use liquid_stake::math;
use liquid_stake::state::{
    StakePool, UserWithdrawIndex, WithdrawRequest, DEFAULT_WITHDRAW_DELAY, MAX_USER_WITHDRAWS,
    WITHDRAW_KIND_POOL, WITHDRAW_KIND_VALIDATOR,
};
use solana_program::pubkey::Pubkey;

// ═══════════════════════════════════════════════════════════════
// Helpers: zeroed state plus a tracked share supply (on-chain the
// supply lives in the SPL mint; here the harness carries it)
// ═══════════════════════════════════════════════════════════════

fn new_pool() -> StakePool {
    let mut pool = StakePool::zeroed();
    pool.is_initialized = 1;
    pool.version = 1;
    pool.bump = 255;
    pool.vault_authority_bump = 254;
    pool.withdraw_delay = DEFAULT_WITHDRAW_DELAY;
    pool.protocol_fee_bips = 1000;
    pool
}

/// Deposit: mirror of the processor's accounting (mint supply tracked
/// by the caller).
fn do_deposit(pool: &mut StakePool, supply: &mut u64, amount: u64) -> u64 {
    let shares = pool.calc_shares_for_deposit(amount, *supply).unwrap();
    assert!(shares > 0);
    let (assets_before, supply_before) = (pool.total_assets().unwrap(), *supply);
    pool.total_pool += amount;
    *supply += shares;
    assert!(math::rate_within_tolerance(
        assets_before,
        supply_before,
        pool.total_assets().unwrap(),
        *supply,
    ));
    shares
}

/// Undelegate-from-pool: burn shares, earmark assets.
fn do_pool_exit(pool: &mut StakePool, supply: &mut u64, shares: u64) -> u64 {
    let assets = pool.calc_assets_for_shares(shares, *supply).unwrap();
    let (assets_before, supply_before) = (pool.total_assets().unwrap(), *supply);
    pool.total_pool -= assets;
    *supply -= shares;
    assert!(math::rate_within_tolerance(
        assets_before,
        supply_before,
        pool.total_assets().unwrap(),
        *supply,
    ));
    assets
}

// ═══════════════════════════════════════════════════════════════
// Share Math Through Pool State
// ═══════════════════════════════════════════════════════════════

#[test]
fn test_first_depositor_gets_1_to_1() {
    let pool = new_pool();
    let shares = pool.calc_shares_for_deposit(1_000_000, 0).unwrap();
    assert_eq!(shares, 1_000_000, "First depositor should get 1:1 shares");
}

#[test]
fn test_second_depositor_pro_rata() {
    let mut pool = new_pool();
    let mut supply = 0u64;
    do_deposit(&mut pool, &mut supply, 1_000_000);
    let shares = pool.calc_shares_for_deposit(500_000, supply).unwrap();
    assert_eq!(shares, 500_000);
}

#[test]
fn test_deposit_after_appreciation_buys_fewer_shares() {
    let mut pool = new_pool();
    let mut supply = 0u64;
    do_deposit(&mut pool, &mut supply, 1_000_000);

    // Rewards fold 250K into the pool without minting
    pool.total_pool += 250_000;

    // 250K now buys 200K shares at rate 1.25
    let shares = pool.calc_shares_for_deposit(250_000, supply).unwrap();
    assert_eq!(shares, 200_000);
}

#[test]
fn test_exit_returns_proportional() {
    let mut pool = new_pool();
    let mut supply = 0u64;
    do_deposit(&mut pool, &mut supply, 2_000_000);

    let assets = pool.calc_assets_for_shares(1_000_000, supply).unwrap();
    assert_eq!(assets, 1_000_000);
}

#[test]
fn test_total_assets_spans_all_three_buckets() {
    let mut pool = new_pool();
    pool.total_pool = 100;
    pool.total_delegated = 200;
    pool.pending_operator_withdraw = 50;
    assert_eq!(pool.total_assets(), Some(350));
}

#[test]
fn test_total_assets_overflow_is_none() {
    let mut pool = new_pool();
    pool.total_pool = u64::MAX;
    pool.total_delegated = 1;
    assert!(pool.total_assets().is_none());
}

#[test]
fn test_rounding_favors_pool() {
    let mut pool = new_pool();
    pool.total_pool = 1_000_000;
    // supply slightly below assets → tiny deposit rounds to zero shares
    let shares = pool.calc_shares_for_deposit(1, 999_999).unwrap();
    assert_eq!(shares, 0, "Tiny deposit should round down to 0 shares");
}

#[test]
fn test_large_amounts_no_overflow() {
    let mut pool = new_pool();
    pool.total_pool = u64::MAX / 2;
    let shares = pool
        .calc_shares_for_deposit(u64::MAX / 4, u64::MAX / 2)
        .unwrap();
    assert_eq!(shares, u64::MAX / 4);
}

// ═══════════════════════════════════════════════════════════════
// Lifecycle: deposit → delegate → reward → exit
// ═══════════════════════════════════════════════════════════════

#[test]
fn test_deposit_exit_conservation() {
    let mut pool = new_pool();
    let mut supply = 0u64;

    let shares = do_deposit(&mut pool, &mut supply, 1_000_000);
    let back = do_pool_exit(&mut pool, &mut supply, shares);

    assert_eq!(back, 1_000_000, "First depositor should get exact amount back");
    assert_eq!(supply, 0);
    assert_eq!(pool.total_pool, 0);
}

#[test]
fn test_delegation_does_not_move_rate() {
    let mut pool = new_pool();
    let mut supply = 0u64;
    do_deposit(&mut pool, &mut supply, 1_000_000);

    let before = pool.current_rate(supply).unwrap();
    // Delegate reallocates between buckets
    pool.total_pool -= 600_000;
    pool.total_delegated += 600_000;
    assert_eq!(pool.current_rate(supply).unwrap(), before);

    // Clawback to pending does not move it either
    pool.total_delegated -= 100_000;
    pool.pending_operator_withdraw += 100_000;
    assert_eq!(pool.current_rate(supply).unwrap(), before);
}

#[test]
fn test_reward_claim_grows_rate_net_of_fee() {
    let mut pool = new_pool();
    let mut supply = 0u64;
    do_deposit(&mut pool, &mut supply, 1_000_000);

    let before = pool.current_rate(supply).unwrap();

    // 100K claimed, 10% fee skimmed, 90K folded in
    let claimed = 100_000u64;
    let fee = math::protocol_fee(claimed, pool.protocol_fee_bips).unwrap();
    assert_eq!(fee, 10_000);
    pool.total_pool += claimed - fee;

    let after = pool.current_rate(supply).unwrap();
    assert!(math::rate_non_decreasing(before, after));
    assert_eq!(after, math::RATE_SCALE / 100 * 109);
}

#[test]
fn test_late_depositor_pays_appreciated_rate() {
    let mut pool = new_pool();
    let mut supply = 0u64;

    do_deposit(&mut pool, &mut supply, 100);
    pool.total_pool += 20; // rewards

    let shares = do_deposit(&mut pool, &mut supply, 60);
    assert_eq!(shares, 50);

    // First holder's claim grew, second holder's is whole
    assert_eq!(pool.calc_assets_for_shares(100, supply), Some(120));
    assert_eq!(pool.calc_assets_for_shares(50, supply), Some(60));
}

#[test]
fn test_uneven_deposit_passes_rate_guard() {
    // 7 into a 10-asset / 3-share pool mints 2 (7*3/10 = 2.1); the
    // truncation remainder must not trip the guard
    let mut pool = new_pool();
    pool.total_pool = 10;
    let mut supply = 3u64;
    let shares = do_deposit(&mut pool, &mut supply, 7);
    assert_eq!(shares, 2);
    assert_eq!(pool.total_pool, 17);
    assert_eq!(supply, 5);
}

#[test]
fn test_production_scale_uneven_deposit_passes_rate_guard() {
    // 10T assets / 8T shares; a deposit one unit off a clean multiple
    // shifts the scaled rate by far more than one 1e18 unit, and the
    // guard must still accept it
    let mut pool = new_pool();
    pool.total_pool = 10_000_000_000_000;
    let mut supply = 8_000_000_000_000u64;
    let shares = do_deposit(&mut pool, &mut supply, 50_000_000_001);
    assert_eq!(shares, 40_000_000_000);
}

#[test]
fn test_uneven_exit_passes_rate_guard() {
    let mut pool = new_pool();
    pool.total_pool = 10;
    let mut supply = 7u64;
    let assets = do_pool_exit(&mut pool, &mut supply, 3);
    assert_eq!(assets, 4); // 3*10/7 = 4.28, floored
}

#[test]
fn test_multiple_cycles_conservation() {
    let mut pool = new_pool();
    let mut supply = 0u64;
    let mut total_in = 0u64;
    let mut total_out = 0u64;

    for i in 1..=10u64 {
        let amount = i * 100_000;
        let shares = do_deposit(&mut pool, &mut supply, amount);
        total_in += amount;

        let back = do_pool_exit(&mut pool, &mut supply, shares);
        total_out += back;
    }

    assert!(total_out <= total_in, "total_out={} > total_in={}", total_out, total_in);
    assert!(total_in - total_out <= 10, "Too much rounding dust");
}

#[test]
fn test_clawback_settlement_with_slashing_loss() {
    let mut pool = new_pool();
    let mut supply = 0u64;
    do_deposit(&mut pool, &mut supply, 1_000_000);
    pool.total_pool -= 800_000;
    pool.total_delegated += 800_000;

    // Operator claws back 500K
    pool.total_delegated -= 500_000;
    pool.pending_operator_withdraw += 500_000;
    let before = pool.current_rate(supply).unwrap();

    // Hub only pays 450K back — validator was slashed
    let requested = 500_000u64;
    let actual = 450_000u64;
    pool.pending_operator_withdraw -= requested;
    pool.total_pool += actual;

    let after = pool.current_rate(supply).unwrap();
    // Non-emergency settlement must refuse this
    assert!(!math::rate_non_decreasing(before, after));
    assert_eq!(pool.total_assets(), Some(950_000));
}

// ═══════════════════════════════════════════════════════════════
// Withdraw Requests
// ═══════════════════════════════════════════════════════════════

fn new_request(id: u64, ts: i64) -> WithdrawRequest {
    let mut request = WithdrawRequest::zeroed();
    request.is_initialized = 1;
    request.id = id;
    request.kind = WITHDRAW_KIND_VALIDATOR;
    request.asset_amount = 1_000;
    request.request_timestamp = ts;
    request
}

#[test]
fn test_request_not_claimable_before_delay() {
    let request = new_request(0, 1_000_000);
    let delay = DEFAULT_WITHDRAW_DELAY;
    assert!(!request.is_claimable(1_000_000, delay));
    assert!(!request.is_claimable(1_000_000 + delay - 1, delay));
}

#[test]
fn test_request_claimable_at_exact_boundary() {
    let request = new_request(0, 1_000_000);
    let delay = DEFAULT_WITHDRAW_DELAY;
    assert!(request.is_claimable(1_000_000 + delay, delay));
    assert!(request.is_claimable(1_000_000 + delay + 1, delay));
}

#[test]
fn test_zero_delay_immediately_claimable() {
    let request = new_request(0, 1_000_000);
    assert!(request.is_claimable(1_000_000, 0));
}

#[test]
fn test_withdrawn_flag_one_way() {
    let mut request = new_request(3, 0);
    assert_eq!(request.is_withdrawn, 0);
    request.is_withdrawn = 1;
    assert_eq!(request.is_withdrawn, 1);
}

#[test]
fn test_request_kinds_distinct() {
    assert_ne!(WITHDRAW_KIND_POOL, WITHDRAW_KIND_VALIDATOR);
}

// ═══════════════════════════════════════════════════════════════
// Resolve Preconditions
// ═══════════════════════════════════════════════════════════════

fn resolvable_request(pool: &Pubkey, owner: &Pubkey, ts: i64) -> WithdrawRequest {
    let mut request = WithdrawRequest::zeroed();
    request.is_initialized = 1;
    request.kind = WITHDRAW_KIND_VALIDATOR;
    request.asset_amount = 1_000;
    request.request_timestamp = ts;
    request.pool = pool.to_bytes();
    request.owner = owner.to_bytes();
    request
}

#[test]
fn test_resolve_after_delay_succeeds() {
    let (pool, owner) = (Pubkey::new_unique(), Pubkey::new_unique());
    let request = resolvable_request(&pool, &owner, 1_000_000);
    let ready = 1_000_000 + DEFAULT_WITHDRAW_DELAY;
    assert_eq!(
        request.validate_resolve(&owner, &pool, ready, DEFAULT_WITHDRAW_DELAY),
        Ok(())
    );
}

#[test]
fn test_resolve_uninitialized_request_rejected() {
    let (pool, owner) = (Pubkey::new_unique(), Pubkey::new_unique());
    let request = WithdrawRequest::zeroed();
    assert_eq!(
        request.validate_resolve(&owner, &pool, i64::MAX, 0),
        Err(StakeError::RequestNotFound)
    );
}

#[test]
fn test_resolve_wrong_pool_rejected() {
    let (pool, owner) = (Pubkey::new_unique(), Pubkey::new_unique());
    let request = resolvable_request(&pool, &owner, 0);
    assert_eq!(
        request.validate_resolve(&owner, &Pubkey::new_unique(), i64::MAX, 0),
        Err(StakeError::InvalidPda)
    );
}

#[test]
fn test_resolve_wrong_owner_rejected() {
    let (pool, owner) = (Pubkey::new_unique(), Pubkey::new_unique());
    let request = resolvable_request(&pool, &owner, 0);
    assert_eq!(
        request.validate_resolve(&Pubkey::new_unique(), &pool, i64::MAX, 0),
        Err(StakeError::NotRequestOwner)
    );
}

#[test]
fn test_resolve_before_delay_rejected() {
    let (pool, owner) = (Pubkey::new_unique(), Pubkey::new_unique());
    let request = resolvable_request(&pool, &owner, 1_000_000);
    let delay = DEFAULT_WITHDRAW_DELAY;
    assert_eq!(
        request.validate_resolve(&owner, &pool, 1_000_000 + delay - 1, delay),
        Err(StakeError::DelayNotElapsed)
    );
}

#[test]
fn test_second_resolve_rejected_as_already_withdrawn() {
    let (pool, owner) = (Pubkey::new_unique(), Pubkey::new_unique());
    let mut request = resolvable_request(&pool, &owner, 1_000_000);
    let ready = 1_000_000 + DEFAULT_WITHDRAW_DELAY;

    assert_eq!(
        request.validate_resolve(&owner, &pool, ready, DEFAULT_WITHDRAW_DELAY),
        Ok(())
    );
    request.is_withdrawn = 1;

    // Replaying the same claim must fail, no matter how much later
    assert_eq!(
        request.validate_resolve(&owner, &pool, ready + 1_000_000, DEFAULT_WITHDRAW_DELAY),
        Err(StakeError::AlreadyWithdrawn)
    );
}

#[test]
fn test_resolve_clawback_owned_by_pool() {
    // Clawback requests carry the pool PDA as owner; only a caller
    // presenting the pool key passes the owner gate
    let pool = Pubkey::new_unique();
    let request = resolvable_request(&pool, &pool, 0);
    assert_eq!(request.validate_resolve(&pool, &pool, i64::MAX, 0), Ok(()));
    assert_eq!(
        request.validate_resolve(&Pubkey::new_unique(), &pool, i64::MAX, 0),
        Err(StakeError::NotRequestOwner)
    );
}

// ═══════════════════════════════════════════════════════════════
// Per-User Withdraw Index + Pagination
// ═══════════════════════════════════════════════════════════════

fn index_with_ids(ids: &[u64]) -> UserWithdrawIndex {
    let mut index = UserWithdrawIndex::zeroed();
    index.is_initialized = 1;
    for &id in ids {
        index.push(id).unwrap();
    }
    index
}

#[test]
fn test_index_push_appends_in_order() {
    let index = index_with_ids(&[100, 200, 300]);
    assert_eq!(index.count, 3);
    assert_eq!(&index.ids[..3], &[100, 200, 300]);
}

#[test]
fn test_index_full_rejects_push() {
    let mut index = UserWithdrawIndex::zeroed();
    for i in 0..MAX_USER_WITHDRAWS as u64 {
        index.push(i).unwrap();
    }
    assert!(index.push(999).is_err());
    assert_eq!(index.count, MAX_USER_WITHDRAWS as u64);
}

#[test]
fn test_page_forward() {
    let index = index_with_ids(&[100, 200, 300]);
    assert_eq!(index.page(0, 10, false).unwrap(), vec![100, 200, 300]);
    assert_eq!(index.page(1, 10, false).unwrap(), vec![200, 300]);
    assert_eq!(index.page(0, 2, false).unwrap(), vec![100, 200]);
}

#[test]
fn test_page_reverse() {
    let index = index_with_ids(&[100, 200, 300]);
    assert_eq!(index.page(0, 10, true).unwrap(), vec![300, 200, 100]);
    assert_eq!(index.page(1, 10, true).unwrap(), vec![200, 100]);
    assert_eq!(index.page(0, 2, true).unwrap(), vec![300, 200]);
}

#[test]
fn test_page_skip_out_of_range() {
    let index = index_with_ids(&[100, 200, 300]);
    assert!(index.page(3, 1, false).is_err());
    assert!(index.page(100, 1, true).is_err());
}

#[test]
fn test_page_zero_max_size() {
    let index = index_with_ids(&[100]);
    assert!(index.page(0, 0, false).is_err());
}

#[test]
fn test_page_empty_index_rejects_any_skip() {
    let index = UserWithdrawIndex::zeroed();
    assert!(index.page(0, 1, false).is_err());
}

// ═══════════════════════════════════════════════════════════════
// PDA Derivation
// ═══════════════════════════════════════════════════════════════

#[test]
fn test_pda_derivation_deterministic() {
    use liquid_stake::state::{
        derive_delegation_pda, derive_pool_pda, derive_vault_authority,
        derive_withdraw_index_pda, derive_withdraw_request_pda,
    };
    use solana_program::pubkey::Pubkey;

    let program_id = Pubkey::new_unique();
    let hub = Pubkey::new_unique();
    let owner = Pubkey::new_unique();

    let (pool1, bump1) = derive_pool_pda(&program_id, &hub);
    let (pool2, bump2) = derive_pool_pda(&program_id, &hub);
    assert_eq!(pool1, pool2);
    assert_eq!(bump1, bump2);

    let (auth1, _) = derive_vault_authority(&program_id, &pool1);
    let (auth2, _) = derive_vault_authority(&program_id, &pool1);
    assert_eq!(auth1, auth2);

    let (req1, _) = derive_withdraw_request_pda(&program_id, &pool1, 7);
    let (req2, _) = derive_withdraw_request_pda(&program_id, &pool1, 7);
    assert_eq!(req1, req2);

    let (idx1, _) = derive_withdraw_index_pda(&program_id, &pool1, &owner);
    let (idx2, _) = derive_withdraw_index_pda(&program_id, &pool1, &owner);
    assert_eq!(idx1, idx2);

    let (del1, _) = derive_delegation_pda(&program_id, &pool1, 3);
    let (del2, _) = derive_delegation_pda(&program_id, &pool1, 3);
    assert_eq!(del1, del2);
}

#[test]
fn test_different_hubs_different_pools() {
    use liquid_stake::state::derive_pool_pda;
    use solana_program::pubkey::Pubkey;

    let program_id = Pubkey::new_unique();
    let (pool_a, _) = derive_pool_pda(&program_id, &Pubkey::new_unique());
    let (pool_b, _) = derive_pool_pda(&program_id, &Pubkey::new_unique());
    assert_ne!(pool_a, pool_b, "Different hubs must have different pool PDAs");
}

#[test]
fn test_different_ids_different_request_pdas() {
    use liquid_stake::state::{derive_pool_pda, derive_withdraw_request_pda};
    use solana_program::pubkey::Pubkey;

    let program_id = Pubkey::new_unique();
    let (pool, _) = derive_pool_pda(&program_id, &Pubkey::new_unique());

    let (req_a, _) = derive_withdraw_request_pda(&program_id, &pool, 0);
    let (req_b, _) = derive_withdraw_request_pda(&program_id, &pool, 1);
    assert_ne!(req_a, req_b, "Different ids must have different request PDAs");
}

#[test]
fn test_different_validators_different_delegation_pdas() {
    use liquid_stake::state::{derive_delegation_pda, derive_pool_pda};
    use solana_program::pubkey::Pubkey;

    let program_id = Pubkey::new_unique();
    let (pool, _) = derive_pool_pda(&program_id, &Pubkey::new_unique());

    let (del_a, _) = derive_delegation_pda(&program_id, &pool, 1);
    let (del_b, _) = derive_delegation_pda(&program_id, &pool, 2);
    assert_ne!(del_a, del_b);
}
