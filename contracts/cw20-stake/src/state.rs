use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Api, StdResult};
use cw_storage_plus::Item;
use cw_utils::Duration;

use crate::claims::ClaimQueue;
use crate::error::ContractError;
use crate::hooks::HookRegistry;
use crate::snapshot::SnapshotLedger;

#[cw_serde]
pub struct Config {
    /// Owner can update every field of the config and manage hooks. This will generally be a DAO.
    pub owner: Option<Addr>,
    /// Manager can do everything the owner can except changing the owner. This will generally be
    /// an operations multisig.
    pub manager: Option<Addr>,
    /// cw20 token that is staked. Fixed at instantiation.
    pub token_address: Addr,
    /// How long unstaked tokens stay locked before they can be claimed.
    /// `None` releases them in the same transaction.
    pub unstaking_duration: Option<Duration>,
}

impl Config {
    /// Either privilege holder may act, when set.
    pub fn is_privileged(&self, sender: &Addr) -> bool {
        self.owner.as_ref() == Some(sender) || self.manager.as_ref() == Some(sender)
    }

    pub fn assert_privileged(&self, sender: &Addr) -> Result<(), ContractError> {
        if self.is_privileged(sender) {
            Ok(())
        } else {
            Err(ContractError::Unauthorized {})
        }
    }
}

/// Config layout written by the beta releases, stored under the same key.
#[cw_serde]
pub struct BetaConfig {
    pub admin: Option<Addr>,
    pub token_address: Addr,
    pub unstaking_duration: Option<Duration>,
}

pub fn validate_duration(duration: Option<Duration>) -> Result<(), ContractError> {
    match duration {
        Some(Duration::Height(0)) | Some(Duration::Time(0)) => {
            Err(ContractError::InvalidUnstakingDuration {})
        }
        _ => Ok(()),
    }
}

pub fn maybe_addr(api: &dyn Api, addr: Option<String>) -> StdResult<Option<Addr>> {
    addr.map(|a| api.addr_validate(&a)).transpose()
}

pub const CONFIG: Item<Config> = Item::new("config");
pub const BETA_CONFIG: Item<BetaConfig> = Item::new("config");

pub const LEDGER: SnapshotLedger = SnapshotLedger::new(
    "staked_balances",
    "staked_balances__checkpoints",
    "total_staked",
    "total_staked__checkpoints",
);

pub const CLAIMS: ClaimQueue = ClaimQueue::new("claims");

pub const HOOKS: HookRegistry = HookRegistry::new("hooks");
