//! CPI tag and data-layout verification tests.
//!
//! Cross-references our hub CPI instruction data with the staking hub's
//! instruction decoder. Tag mismatches = calling wrong instruction.

/// These tags MUST match the hub program's instruction decoder:
///   Tag 1: Delegate
///   Tag 2: Undelegate
///   Tag 3: Withdraw
///   Tag 4: PendingRewards (return-data query)
///   Tag 5: ClaimRewards
///   Tag 6: GetStake (return-data query)
#[test]
fn test_cpi_tag_delegate() {
    let data = build_hub_delegate(7, 1000);
    assert_eq!(data[0], 1);
    assert_eq!(data.len(), 17);
}

#[test]
fn test_cpi_tag_undelegate() {
    let data = build_hub_undelegate(7, 3, 1000);
    assert_eq!(data[0], 2);
    assert_eq!(data.len(), 25);
}

#[test]
fn test_cpi_tag_withdraw() {
    let data = build_hub_withdraw(7, 3);
    assert_eq!(data[0], 3);
    assert_eq!(data.len(), 17);
}

#[test]
fn test_cpi_tag_claim_rewards() {
    // CRITICAL: ClaimRewards is 5, NOT 4 (4 = PendingRewards query).
    // Sending 4 here would silently claim nothing.
    let data = build_hub_claim_rewards(7);
    assert_eq!(data[0], 5, "ClaimRewards must be tag 5, not 4");
    assert_eq!(data.len(), 9);
}

#[test]
fn test_cpi_tag_queries() {
    let pending = build_hub_query(4, [9u8; 32], 7);
    assert_eq!(pending[0], 4);
    assert_eq!(pending.len(), 41);

    let stake = build_hub_query(6, [9u8; 32], 7);
    assert_eq!(stake[0], 6, "GetStake must be tag 6, not 5");
    assert_eq!(stake.len(), 41);
}

#[test]
fn test_undelegate_field_order() {
    // validator_id before request_id before amount; hub decodes positionally
    let data = build_hub_undelegate(0x1111, 0x2222, 0x3333);
    assert_eq!(u64::from_le_bytes(data[1..9].try_into().unwrap()), 0x1111);
    assert_eq!(u64::from_le_bytes(data[9..17].try_into().unwrap()), 0x2222);
    assert_eq!(u64::from_le_bytes(data[17..25].try_into().unwrap()), 0x3333);
}

#[test]
fn test_query_staker_precedes_validator() {
    let staker = [5u8; 32];
    let data = build_hub_query(6, staker, 0xABCD);
    assert_eq!(&data[1..33], &staker);
    assert_eq!(u64::from_le_bytes(data[33..41].try_into().unwrap()), 0xABCD);
}

// ═══════════════════════════════════════════════════════════════
// CPI data builders (mirror the construction in src/cpi.rs)
// ═══════════════════════════════════════════════════════════════

fn build_hub_delegate(validator_id: u64, amount: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(17);
    data.push(1); // TAG_HUB_DELEGATE
    data.extend_from_slice(&validator_id.to_le_bytes());
    data.extend_from_slice(&amount.to_le_bytes());
    data
}

fn build_hub_undelegate(validator_id: u64, request_id: u64, amount: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(25);
    data.push(2); // TAG_HUB_UNDELEGATE
    data.extend_from_slice(&validator_id.to_le_bytes());
    data.extend_from_slice(&request_id.to_le_bytes());
    data.extend_from_slice(&amount.to_le_bytes());
    data
}

fn build_hub_withdraw(validator_id: u64, request_id: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(17);
    data.push(3); // TAG_HUB_WITHDRAW
    data.extend_from_slice(&validator_id.to_le_bytes());
    data.extend_from_slice(&request_id.to_le_bytes());
    data
}

fn build_hub_claim_rewards(validator_id: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(9);
    data.push(5); // TAG_HUB_CLAIM_REWARDS
    data.extend_from_slice(&validator_id.to_le_bytes());
    data
}

fn build_hub_query(tag: u8, staker: [u8; 32], validator_id: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(41);
    data.push(tag);
    data.extend_from_slice(&staker);
    data.extend_from_slice(&validator_id.to_le_bytes());
    data
}
