use solana_program::{program_error::ProgramError, pubkey::Pubkey};

/// Upper bound on validator ids per ClaimRewards call (compute budget).
pub const MAX_CLAIM_VALIDATORS: usize = 16;

/// Pause flag selectors for SetPause.
pub const PAUSE_FLAG_DEPOSIT: u8 = 0;
pub const PAUSE_FLAG_UNDELEGATE: u8 = 1;
pub const PAUSE_FLAG_WITHDRAW: u8 = 2;

/// Instructions for the liquid staking pool program.
#[derive(Debug)]
pub enum StakeInstruction {
    /// Initialize a stake pool for a staking hub.
    /// Creates the pool PDA, share mint, and asset vault.
    ///
    /// Both parameters are explicit on the wire; clients pass
    /// [`crate::state::DEFAULT_WITHDRAW_DELAY`] and
    /// [`crate::state::DEFAULT_PROTOCOL_FEE_BIPS`] unless overridden.
    ///
    /// Accounts:
    ///   0. `[signer, writable]` Admin (pays rent, receives all capabilities)
    ///   1. `[]` Hub state account (the staking backend's market/registry)
    ///   2. `[writable]` Pool PDA (stake_pool, to be created)
    ///   3. `[writable]` Share mint (to be created, authority = vault_auth PDA)
    ///   4. `[writable]` Vault token account (to be created, authority = vault_auth PDA)
    ///   5. `[]` Vault authority PDA
    ///   6. `[]` Asset mint
    ///   7. `[]` Treasury wallet
    ///   8. `[]` Staking hub program ID
    ///   9. `[]` Token program
    ///  10. `[]` System program
    ///  11. `[]` Rent sysvar
    InitPool {
        withdraw_delay: i64,
        protocol_fee_bips: u16,
    },

    /// Deposit assets into the pool. Mints shares pro-rata.
    ///
    /// Accounts:
    ///   0. `[signer]` User depositing
    ///   1. `[writable]` Pool PDA
    ///   2. `[writable]` User's asset token account (source)
    ///   3. `[writable]` Pool vault token account (destination)
    ///   4. `[writable]` Share mint
    ///   5. `[writable]` User's share token account (receives shares)
    ///   6. `[]` Vault authority PDA (mint authority)
    ///   7. `[]` Token program
    Deposit { amount: u64 },

    /// Donate assets into the pool without minting shares. The donation
    /// is folded into the pool and raises the rate for all holders.
    ///
    /// Accounts:
    ///   0. `[signer]` Donor
    ///   1. `[writable]` Pool PDA
    ///   2. `[writable]` Donor's asset token account (source)
    ///   3. `[writable]` Pool vault token account (destination)
    ///   4. `[]` Share mint (supply read for the rate guard)
    ///   5. `[]` Token program
    Donate { amount: u64 },

    /// Move assets from the pool into a validator delegation on the hub.
    /// Operator only. Does not affect the rate.
    ///
    /// Accounts:
    ///   0. `[signer, writable]` Operator (pays rent for the delegation PDA)
    ///   1. `[writable]` Pool PDA
    ///   2. `[writable]` Delegation PDA (per-validator, created if needed)
    ///   3. `[writable]` Pool vault token account (source)
    ///   4. `[]` Vault authority PDA (signs CPI, staker identity on the hub)
    ///   5. `[writable]` Hub state account
    ///   6. `[writable]` Hub vault token account (destination)
    ///   7. `[]` Staking hub program
    ///   8. `[]` Token program
    ///   9. `[]` System program
    Delegate { validator_id: u64, amount: u64 },

    /// Burn shares against a validator delegation and open a withdraw
    /// request for the converted asset amount.
    ///
    /// Accounts:
    ///   0. `[signer, writable]` User (pays rent for request/index PDAs)
    ///   1. `[writable]` Pool PDA
    ///   2. `[writable]` Delegation PDA
    ///   3. `[writable]` User's share token account (source, shares burned)
    ///   4. `[writable]` Share mint
    ///   5. `[writable]` Withdraw request PDA (to be created)
    ///   6. `[writable]` User withdraw index PDA (created if needed)
    ///   7. `[]` Vault authority PDA (signs the hub CPI)
    ///   8. `[writable]` Hub state account
    ///   9. `[]` Staking hub program
    ///  10. `[]` Token program
    ///  11. `[]` System program
    Undelegate { validator_id: u64, share_amount: u64 },

    /// Burn shares against the undelegated pool and open a withdraw
    /// request. No hub call.
    ///
    /// Accounts:
    ///   0. `[signer, writable]` User (pays rent for request/index PDAs)
    ///   1. `[writable]` Pool PDA
    ///   2. `[writable]` User's share token account (source, shares burned)
    ///   3. `[writable]` Share mint
    ///   4. `[writable]` Withdraw request PDA (to be created)
    ///   5. `[writable]` User withdraw index PDA (created if needed)
    ///   6. `[]` Token program
    ///   7. `[]` System program
    UndelegateFromPool { share_amount: u64 },

    /// Resolve a withdraw request after the delay. Validator-kind
    /// requests pull the stake back from the hub first; if the hub
    /// returns less than owed (slashing), the call fails unless
    /// `emergency` — in which case the caller receives exactly the
    /// lower actual amount.
    ///
    /// Accounts:
    ///   0. `[signer]` Request owner
    ///   1. `[writable]` Pool PDA
    ///   2. `[writable]` Withdraw request PDA
    ///   3. `[writable]` Pool vault token account
    ///   4. `[writable]` Owner's asset token account (destination)
    ///   5. `[]` Vault authority PDA
    ///   6. `[writable]` Hub state account
    ///   7. `[writable]` Hub vault token account (source for hub withdraw)
    ///   8. `[]` Hub vault authority PDA
    ///   9. `[]` Staking hub program
    ///  10. `[]` Token program
    Withdraw { id: u64, emergency: bool },

    /// Operator clawback: undelegate from a validator back toward the
    /// pool without burning shares. The amount moves from delegated to
    /// pending, so total assets — and the rate — do not change.
    ///
    /// Accounts:
    ///   0. `[signer, writable]` Operator (pays rent for request/index PDAs)
    ///   1. `[writable]` Pool PDA
    ///   2. `[writable]` Delegation PDA
    ///   3. `[writable]` Withdraw request PDA (to be created, owner = pool PDA)
    ///   4. `[writable]` Pool withdraw index PDA (created if needed)
    ///   5. `[]` Vault authority PDA (signs the hub CPI)
    ///   6. `[writable]` Hub state account
    ///   7. `[]` Staking hub program
    ///   8. `[]` System program
    OperatorUndelegateToPool { validator_id: u64, amount: u64 },

    /// Resolve a clawback request: pull the stake from the hub into the
    /// vault and fold the actual received amount into the pool. A
    /// shortfall (slashing) drops the rate, so the non-emergency path
    /// refuses it — the operator must pass `emergency` to socialize the
    /// loss across all holders.
    ///
    /// Accounts:
    ///   0. `[signer]` Operator
    ///   1. `[writable]` Pool PDA
    ///   2. `[writable]` Withdraw request PDA
    ///   3. `[writable]` Pool vault token account (destination)
    ///   4. `[]` Vault authority PDA
    ///   5. `[]` Share mint (supply read for the rate guard)
    ///   6. `[writable]` Hub state account
    ///   7. `[writable]` Hub vault token account (source)
    ///   8. `[]` Hub vault authority PDA
    ///   9. `[]` Staking hub program
    ///  10. `[]` Token program
    OperatorWithdrawToPool { id: u64, emergency: bool },

    /// Claim pending rewards for a set of validators, skim the protocol
    /// fee to the treasury, fold the remainder into the pool. The only
    /// path where the rate organically grows.
    ///
    /// Accounts:
    ///   0. `[signer]` Claimer
    ///   1. `[writable]` Pool PDA
    ///   2. `[writable]` Pool vault token account (receives rewards)
    ///   3. `[]` Vault authority PDA (signs the fee transfer)
    ///   4. `[]` Share mint (supply read for the rate guard)
    ///   5. `[writable]` Treasury asset token account (receives the fee)
    ///   6. `[writable]` Hub state account
    ///   7. `[writable]` Hub vault token account (source)
    ///   8. `[]` Hub vault authority PDA
    ///   9. `[]` Staking hub program
    ///  10. `[]` Token program
    ClaimRewards { validator_ids: Vec<u64> },

    /// Admin updates pool configuration.
    ///
    /// Accounts:
    ///   0. `[signer]` Admin
    ///   1. `[writable]` Pool PDA
    UpdateConfig {
        new_withdraw_delay: Option<i64>,
        new_protocol_fee_bips: Option<u16>,
        new_treasury: Option<Pubkey>,
    },

    /// Admin rotates the operator and/or claimer capabilities.
    ///
    /// Accounts:
    ///   0. `[signer]` Admin
    ///   1. `[writable]` Pool PDA
    UpdateRoles {
        new_operator: Option<Pubkey>,
        new_claimer: Option<Pubkey>,
    },

    /// Admin toggles a per-function pause flag. Setting a flag to its
    /// current value is rejected.
    ///
    /// Accounts:
    ///   0. `[signer]` Admin
    ///   1. `[writable]` Pool PDA
    SetPause { flag: u8, paused: bool },

    /// Admin migrates the pool state to the current layout version.
    /// With only v1 in existence this always fails with
    /// AlreadyCurrentVersion; the arm is the hook future layouts use.
    ///
    /// Accounts:
    ///   0. `[signer]` Admin
    ///   1. `[writable]` Pool PDA
    Migrate,
}

impl StakeInstruction {
    pub fn unpack(data: &[u8]) -> Result<Self, ProgramError> {
        let (&tag, rest) = data.split_first().ok_or(ProgramError::InvalidInstructionData)?;

        match tag {
            0 => {
                // InitPool: withdraw_delay(8) + protocol_fee_bips(2)
                if rest.len() < 10 {
                    return Err(ProgramError::InvalidInstructionData);
                }
                let withdraw_delay = i64::from_le_bytes(rest[0..8].try_into().unwrap());
                let protocol_fee_bips = u16::from_le_bytes(rest[8..10].try_into().unwrap());
                Ok(Self::InitPool { withdraw_delay, protocol_fee_bips })
            }
            1 => {
                if rest.len() < 8 {
                    return Err(ProgramError::InvalidInstructionData);
                }
                let amount = u64::from_le_bytes(rest[0..8].try_into().unwrap());
                Ok(Self::Deposit { amount })
            }
            2 => {
                if rest.len() < 8 {
                    return Err(ProgramError::InvalidInstructionData);
                }
                let amount = u64::from_le_bytes(rest[0..8].try_into().unwrap());
                Ok(Self::Donate { amount })
            }
            3 => {
                if rest.len() < 16 {
                    return Err(ProgramError::InvalidInstructionData);
                }
                let validator_id = u64::from_le_bytes(rest[0..8].try_into().unwrap());
                let amount = u64::from_le_bytes(rest[8..16].try_into().unwrap());
                Ok(Self::Delegate { validator_id, amount })
            }
            4 => {
                if rest.len() < 16 {
                    return Err(ProgramError::InvalidInstructionData);
                }
                let validator_id = u64::from_le_bytes(rest[0..8].try_into().unwrap());
                let share_amount = u64::from_le_bytes(rest[8..16].try_into().unwrap());
                Ok(Self::Undelegate { validator_id, share_amount })
            }
            5 => {
                if rest.len() < 8 {
                    return Err(ProgramError::InvalidInstructionData);
                }
                let share_amount = u64::from_le_bytes(rest[0..8].try_into().unwrap());
                Ok(Self::UndelegateFromPool { share_amount })
            }
            6 => {
                if rest.len() < 9 {
                    return Err(ProgramError::InvalidInstructionData);
                }
                let id = u64::from_le_bytes(rest[0..8].try_into().unwrap());
                Ok(Self::Withdraw { id, emergency: rest[8] != 0 })
            }
            7 => {
                if rest.len() < 16 {
                    return Err(ProgramError::InvalidInstructionData);
                }
                let validator_id = u64::from_le_bytes(rest[0..8].try_into().unwrap());
                let amount = u64::from_le_bytes(rest[8..16].try_into().unwrap());
                Ok(Self::OperatorUndelegateToPool { validator_id, amount })
            }
            8 => {
                if rest.len() < 9 {
                    return Err(ProgramError::InvalidInstructionData);
                }
                let id = u64::from_le_bytes(rest[0..8].try_into().unwrap());
                Ok(Self::OperatorWithdrawToPool { id, emergency: rest[8] != 0 })
            }
            9 => {
                // ClaimRewards: count(1) + count * validator_id(8)
                if rest.is_empty() {
                    return Err(ProgramError::InvalidInstructionData);
                }
                let count = rest[0] as usize;
                if count > MAX_CLAIM_VALIDATORS || rest.len() < 1 + count * 8 {
                    return Err(ProgramError::InvalidInstructionData);
                }
                let mut validator_ids = Vec::with_capacity(count);
                for i in 0..count {
                    let at = 1 + i * 8;
                    validator_ids.push(u64::from_le_bytes(rest[at..at + 8].try_into().unwrap()));
                }
                Ok(Self::ClaimRewards { validator_ids })
            }
            10 => {
                // UpdateConfig: flag+i64(9) + flag+u16(3) + flag+pubkey(33)
                if rest.len() < 45 {
                    return Err(ProgramError::InvalidInstructionData);
                }
                let has_delay = rest[0] != 0;
                let delay = i64::from_le_bytes(rest[1..9].try_into().unwrap());
                let has_fee = rest[9] != 0;
                let fee = u16::from_le_bytes(rest[10..12].try_into().unwrap());
                let has_treasury = rest[12] != 0;
                let treasury = Pubkey::try_from(&rest[13..45])
                    .map_err(|_| ProgramError::InvalidInstructionData)?;
                Ok(Self::UpdateConfig {
                    new_withdraw_delay: if has_delay { Some(delay) } else { None },
                    new_protocol_fee_bips: if has_fee { Some(fee) } else { None },
                    new_treasury: if has_treasury { Some(treasury) } else { None },
                })
            }
            11 => {
                // UpdateRoles: flag+pubkey(33) + flag+pubkey(33)
                if rest.len() < 66 {
                    return Err(ProgramError::InvalidInstructionData);
                }
                let has_operator = rest[0] != 0;
                let operator = Pubkey::try_from(&rest[1..33])
                    .map_err(|_| ProgramError::InvalidInstructionData)?;
                let has_claimer = rest[33] != 0;
                let claimer = Pubkey::try_from(&rest[34..66])
                    .map_err(|_| ProgramError::InvalidInstructionData)?;
                Ok(Self::UpdateRoles {
                    new_operator: if has_operator { Some(operator) } else { None },
                    new_claimer: if has_claimer { Some(claimer) } else { None },
                })
            }
            12 => {
                if rest.len() < 2 {
                    return Err(ProgramError::InvalidInstructionData);
                }
                Ok(Self::SetPause { flag: rest[0], paused: rest[1] != 0 })
            }
            13 => Ok(Self::Migrate),
            _ => Err(ProgramError::InvalidInstructionData),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Tag 0: InitPool ──

    #[test]
    fn test_unpack_init_pool() {
        let mut data = vec![0u8];
        data.extend_from_slice(&1_209_600i64.to_le_bytes());
        data.extend_from_slice(&1000u16.to_le_bytes());
        match StakeInstruction::unpack(&data).unwrap() {
            StakeInstruction::InitPool { withdraw_delay, protocol_fee_bips } => {
                assert_eq!(withdraw_delay, 1_209_600);
                assert_eq!(protocol_fee_bips, 1000);
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_unpack_init_pool_too_short() {
        let data = vec![0u8, 1, 2, 3];
        assert!(StakeInstruction::unpack(&data).is_err());
    }

    // ── Tag 1: Deposit ──

    #[test]
    fn test_unpack_deposit() {
        let mut data = vec![1u8];
        data.extend_from_slice(&42u64.to_le_bytes());
        match StakeInstruction::unpack(&data).unwrap() {
            StakeInstruction::Deposit { amount } => assert_eq!(amount, 42),
            _ => panic!("wrong variant"),
        }
    }

    // ── Tag 2: Donate ──

    #[test]
    fn test_unpack_donate() {
        let mut data = vec![2u8];
        data.extend_from_slice(&777u64.to_le_bytes());
        match StakeInstruction::unpack(&data).unwrap() {
            StakeInstruction::Donate { amount } => assert_eq!(amount, 777),
            _ => panic!("wrong variant"),
        }
    }

    // ── Tag 3: Delegate ──

    #[test]
    fn test_unpack_delegate() {
        let mut data = vec![3u8];
        data.extend_from_slice(&9u64.to_le_bytes());
        data.extend_from_slice(&500u64.to_le_bytes());
        match StakeInstruction::unpack(&data).unwrap() {
            StakeInstruction::Delegate { validator_id, amount } => {
                assert_eq!(validator_id, 9);
                assert_eq!(amount, 500);
            }
            _ => panic!("wrong variant"),
        }
    }

    // ── Tag 4: Undelegate ──

    #[test]
    fn test_unpack_undelegate() {
        let mut data = vec![4u8];
        data.extend_from_slice(&3u64.to_le_bytes());
        data.extend_from_slice(&999u64.to_le_bytes());
        match StakeInstruction::unpack(&data).unwrap() {
            StakeInstruction::Undelegate { validator_id, share_amount } => {
                assert_eq!(validator_id, 3);
                assert_eq!(share_amount, 999);
            }
            _ => panic!("wrong variant"),
        }
    }

    // ── Tag 5: UndelegateFromPool ──

    #[test]
    fn test_unpack_undelegate_from_pool() {
        let mut data = vec![5u8];
        data.extend_from_slice(&123u64.to_le_bytes());
        match StakeInstruction::unpack(&data).unwrap() {
            StakeInstruction::UndelegateFromPool { share_amount } => {
                assert_eq!(share_amount, 123);
            }
            _ => panic!("wrong variant"),
        }
    }

    // ── Tag 6: Withdraw ──

    #[test]
    fn test_unpack_withdraw_emergency_flag() {
        let mut data = vec![6u8];
        data.extend_from_slice(&5u64.to_le_bytes());
        data.push(1);
        match StakeInstruction::unpack(&data).unwrap() {
            StakeInstruction::Withdraw { id, emergency } => {
                assert_eq!(id, 5);
                assert!(emergency);
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_unpack_withdraw_missing_flag() {
        let mut data = vec![6u8];
        data.extend_from_slice(&5u64.to_le_bytes());
        assert!(StakeInstruction::unpack(&data).is_err());
    }

    // ── Tag 7: OperatorUndelegateToPool ──

    #[test]
    fn test_unpack_operator_undelegate() {
        let mut data = vec![7u8];
        data.extend_from_slice(&2u64.to_le_bytes());
        data.extend_from_slice(&40_000u64.to_le_bytes());
        match StakeInstruction::unpack(&data).unwrap() {
            StakeInstruction::OperatorUndelegateToPool { validator_id, amount } => {
                assert_eq!(validator_id, 2);
                assert_eq!(amount, 40_000);
            }
            _ => panic!("wrong variant"),
        }
    }

    // ── Tag 8: OperatorWithdrawToPool ──

    #[test]
    fn test_unpack_operator_withdraw_non_emergency() {
        let mut data = vec![8u8];
        data.extend_from_slice(&17u64.to_le_bytes());
        data.push(0);
        match StakeInstruction::unpack(&data).unwrap() {
            StakeInstruction::OperatorWithdrawToPool { id, emergency } => {
                assert_eq!(id, 17);
                assert!(!emergency);
            }
            _ => panic!("wrong variant"),
        }
    }

    // ── Tag 9: ClaimRewards ──

    #[test]
    fn test_unpack_claim_rewards() {
        let mut data = vec![9u8, 3];
        for vid in [1u64, 5, 9] {
            data.extend_from_slice(&vid.to_le_bytes());
        }
        match StakeInstruction::unpack(&data).unwrap() {
            StakeInstruction::ClaimRewards { validator_ids } => {
                assert_eq!(validator_ids, vec![1, 5, 9]);
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_unpack_claim_rewards_empty_list() {
        let data = vec![9u8, 0];
        match StakeInstruction::unpack(&data).unwrap() {
            StakeInstruction::ClaimRewards { validator_ids } => {
                assert!(validator_ids.is_empty());
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_unpack_claim_rewards_over_cap() {
        let mut data = vec![9u8, (MAX_CLAIM_VALIDATORS + 1) as u8];
        for i in 0..MAX_CLAIM_VALIDATORS + 1 {
            data.extend_from_slice(&(i as u64).to_le_bytes());
        }
        assert!(StakeInstruction::unpack(&data).is_err());
    }

    #[test]
    fn test_unpack_claim_rewards_truncated() {
        let data = vec![9u8, 2, 1, 0, 0, 0, 0, 0, 0, 0]; // claims 2 ids, carries 1
        assert!(StakeInstruction::unpack(&data).is_err());
    }

    // ── Tag 10: UpdateConfig ──

    #[test]
    fn test_unpack_update_config_all() {
        let treasury = Pubkey::new_unique();
        let mut data = vec![10u8];
        data.push(1);
        data.extend_from_slice(&86_400i64.to_le_bytes());
        data.push(1);
        data.extend_from_slice(&250u16.to_le_bytes());
        data.push(1);
        data.extend_from_slice(treasury.as_ref());
        match StakeInstruction::unpack(&data).unwrap() {
            StakeInstruction::UpdateConfig {
                new_withdraw_delay,
                new_protocol_fee_bips,
                new_treasury,
            } => {
                assert_eq!(new_withdraw_delay, Some(86_400));
                assert_eq!(new_protocol_fee_bips, Some(250));
                assert_eq!(new_treasury, Some(treasury));
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_unpack_update_config_none() {
        let mut data = vec![10u8];
        data.push(0);
        data.extend_from_slice(&0i64.to_le_bytes());
        data.push(0);
        data.extend_from_slice(&0u16.to_le_bytes());
        data.push(0);
        data.extend_from_slice(&[0u8; 32]);
        match StakeInstruction::unpack(&data).unwrap() {
            StakeInstruction::UpdateConfig {
                new_withdraw_delay,
                new_protocol_fee_bips,
                new_treasury,
            } => {
                assert_eq!(new_withdraw_delay, None);
                assert_eq!(new_protocol_fee_bips, None);
                assert_eq!(new_treasury, None);
            }
            _ => panic!("wrong variant"),
        }
    }

    // ── Tag 11: UpdateRoles ──

    #[test]
    fn test_unpack_update_roles_operator_only() {
        let operator = Pubkey::new_unique();
        let mut data = vec![11u8];
        data.push(1);
        data.extend_from_slice(operator.as_ref());
        data.push(0);
        data.extend_from_slice(&[0u8; 32]);
        match StakeInstruction::unpack(&data).unwrap() {
            StakeInstruction::UpdateRoles { new_operator, new_claimer } => {
                assert_eq!(new_operator, Some(operator));
                assert_eq!(new_claimer, None);
            }
            _ => panic!("wrong variant"),
        }
    }

    // ── Tag 12: SetPause ──

    #[test]
    fn test_unpack_set_pause() {
        let data = vec![12u8, PAUSE_FLAG_WITHDRAW, 1];
        match StakeInstruction::unpack(&data).unwrap() {
            StakeInstruction::SetPause { flag, paused } => {
                assert_eq!(flag, PAUSE_FLAG_WITHDRAW);
                assert!(paused);
            }
            _ => panic!("wrong variant"),
        }
    }

    // ── Tag 13: Migrate ──

    #[test]
    fn test_unpack_migrate() {
        let data = vec![13u8];
        match StakeInstruction::unpack(&data).unwrap() {
            StakeInstruction::Migrate => {}
            _ => panic!("wrong variant"),
        }
    }

    // ── Invalid tag / boundaries ──

    #[test]
    fn test_unpack_invalid_tag() {
        let data = vec![255u8];
        assert!(StakeInstruction::unpack(&data).is_err());
    }

    #[test]
    fn test_unpack_empty() {
        let data: Vec<u8> = vec![];
        assert!(StakeInstruction::unpack(&data).is_err());
    }

    #[test]
    fn test_unpack_max_values() {
        let mut data = vec![1u8];
        data.extend_from_slice(&u64::MAX.to_le_bytes());
        match StakeInstruction::unpack(&data).unwrap() {
            StakeInstruction::Deposit { amount } => assert_eq!(amount, u64::MAX),
            _ => panic!("wrong variant"),
        }
    }
}
