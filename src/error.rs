use solana_program::program_error::ProgramError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum StakeError {
    /// Pool already initialized for this hub
    AlreadyInitialized = 0,
    /// Pool not initialized
    NotInitialized = 1,
    /// Signer does not hold the required capability
    Unauthorized = 2,
    /// Zero amount
    ZeroAmount = 3,
    /// Arithmetic overflow
    Overflow = 4,
    /// Mint mismatch — share or asset mint does not match pool state
    InvalidMint = 5,
    /// Invalid PDA derivation
    InvalidPda = 6,
    /// Staking hub program does not match stored value
    InvalidStakingProgram = 7,
    /// Amount exceeds the undelegated pool
    AmountExceedsPool = 8,
    /// Amount exceeds the recorded delegation for this validator
    AmountExceedsDelegated = 9,
    /// No delegation recorded for this validator
    NoDelegationForValidator = 10,
    /// Hub reports less delegated stake than requested
    StakedAmountTooLow = 11,
    /// Withdraw request id was never created
    RequestNotFound = 12,
    /// Withdraw delay not elapsed
    DelayNotElapsed = 13,
    /// Withdraw request already resolved
    AlreadyWithdrawn = 14,
    /// Caller is not the request owner
    NotRequestOwner = 15,
    /// Pagination skip is past the end of the user's index
    SkipOutOfRange = 16,
    /// Pagination max_size is zero
    MaxSizeZero = 17,
    /// User withdraw index is at capacity
    UserIndexFull = 18,
    /// Hub returned less than the requested amount on a non-emergency withdraw
    WithdrawnAmountTooLow = 19,
    /// Protocol fee above 10_000 bips
    FeeAboveMax = 20,
    /// Pause flag already has the requested value
    PauseUnchanged = 21,
    /// Deposits are paused
    DepositsPaused = 22,
    /// Undelegations are paused
    UndelegationsPaused = 23,
    /// Withdrawals are paused
    WithdrawalsPaused = 24,
    /// Rate moved outside the one-rounding-unit tolerance
    RateInvariantViolated = 25,
    /// Rate decreased on a path where decrease is never legitimate
    RateDecreased = 26,
    /// Hub query returned missing or malformed return data
    InvalidHubResponse = 27,
    /// Pool state is already at the current version
    AlreadyCurrentVersion = 28,
    /// Treasury token account is not owned by the configured treasury
    InvalidTreasuryAccount = 29,
}

impl From<StakeError> for ProgramError {
    fn from(e: StakeError) -> Self {
        ProgramError::Custom(e as u32)
    }
}
