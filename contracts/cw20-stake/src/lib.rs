/*!
Staking ledger for a single cw20 token, built to back governance voting power.

Tokens are deposited with the cw20 `Send` / `Receive` flow and staked 1:1.
Every balance change is written as a checkpoint keyed by block height, for the
staker and for the total, so both can be queried at any past height. This is
what a governance core needs to compute the voting power that existed when a
proposal was opened, regardless of what happened to the stakes afterwards.

Unstaking removes voting power immediately. When an `unstaking_duration` is
configured the tokens are queued as a claim that can be withdrawn once the
duration (in blocks or seconds) has passed, otherwise they are sent back in
the same transaction.

Contracts registered as hooks receive a `stake_change_hook` message on every
deposit and unstake. A hook that fails reverts the whole operation, so a hook
can never miss a stake change.
*/

pub mod claims;
pub mod contract;
mod error;
pub mod execute;
pub mod hooks;
pub mod msg;
pub mod query;
pub mod snapshot;
pub mod state;

pub use crate::error::ContractError;
