use cosmwasm_std::{OverflowError, StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("Semver parsing error: {0}")]
    SemVer(String),

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Only the owner can change the owner")]
    OnlyOwnerCanChangeOwner {},

    #[error("Cannot unstake {requested}, only {available} staked")]
    InsufficientBalance {
        requested: Uint128,
        available: Uint128,
    },

    #[error("Amount must be greater than zero")]
    InvalidZeroAmount {},

    #[error("No claims that can be released currently")]
    NothingToClaim {},

    #[error("Given address already registered as a hook")]
    HookAlreadyRegistered {},

    #[error("Given address not registered as a hook")]
    HookNotFound {},

    #[error("Height {requested} is in the future (current height is {current})")]
    InvalidHeight { requested: u64, current: u64 },

    #[error("Outbound token transfer failed: {reason}")]
    OutboundTransferFailed { reason: String },

    #[error("Stake change hook rejected the notification: {reason}")]
    HookRejected { reason: String },

    #[error("Received tokens from {received}, only {expected} can be staked")]
    InvalidToken { received: String, expected: String },

    #[error("Unstaking duration can not be zero")]
    InvalidUnstakingDuration {},

    #[error("Too many outstanding claims, claim some tokens before unstaking more")]
    TooManyClaims {},

    #[error("Claims must have a release point")]
    ClaimNeverReleases {},

    #[error("Unknown reply id {id}")]
    UnknownReplyId { id: u64 },

    #[error("Cannot migrate from contract {previous}, expected {expected}")]
    ContractNameMismatch { previous: String, expected: String },

    #[error("Cannot migrate from newer version {previous} to {new}")]
    CannotMigrateToOlder { previous: String, new: String },

    #[error("Version {version} is not a beta release, use from_compatible")]
    NotABetaRelease { version: String },
}

impl From<semver::Error> for ContractError {
    fn from(err: semver::Error) -> Self {
        Self::SemVer(err.to_string())
    }
}
