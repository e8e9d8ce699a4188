use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint128;
use cw2::ContractVersion;
use cw20::Cw20ReceiveMsg;
use cw_utils::Duration;

pub use cw_controllers::ClaimsResponse;

use crate::state::Config;

#[cw_serde]
pub struct InstantiateMsg {
    // Owner can update the config and the hooks. This will generally be a DAO.
    pub owner: Option<String>,
    // Manager can update everything except the owner.
    // This will generally be an operations multisig.
    pub manager: Option<String>,
    /// cw20 contract whose tokens are staked
    pub token_address: String,
    /// How long until unstaked tokens become liquid again. Immediate if not set.
    pub unstaking_duration: Option<Duration>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Deposit notification sent by the staked cw20 contract on `Send`
    Receive(Cw20ReceiveMsg),
    /// Unstake will start the unstaking process for the given number of tokens.
    /// The sender immediately loses voting power for these tokens, and can claim them
    /// back after `unstaking_duration`, or receives them right away if no duration is set.
    Unstake { amount: Uint128 },
    /// Claim releases all tokens whose unstaking duration has passed
    Claim {},
    /// Replaces owner, manager and unstaking duration. Must be called by owner or manager,
    /// only the owner may change the owner
    UpdateConfig {
        owner: Option<String>,
        manager: Option<String>,
        duration: Option<Duration>,
    },
    /// Add a new hook to be informed of all stake changes. Must be called by owner or manager
    AddHook { addr: String },
    /// Remove a hook. Must be called by owner or manager
    RemoveHook { addr: String },
}

/// Payload of the `msg` field of [`Cw20ReceiveMsg`]
#[cw_serde]
pub enum ReceiveMsg {
    Stake {},
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Staked balance of an address at a height, defaults to the current height
    #[returns(StakedBalanceAtHeightResponse)]
    StakedBalanceAtHeight {
        address: String,
        height: Option<u64>,
    },
    #[returns(TotalStakedAtHeightResponse)]
    TotalStakedAtHeight { height: Option<u64> },
    /// Amount of underlying tokens the address can withdraw by unstaking everything
    #[returns(StakedValueResponse)]
    StakedValue { address: String },
    #[returns(TotalValueResponse)]
    TotalValue {},
    #[returns(Config)]
    GetConfig {},
    /// Claims shows the tokens in process of unstaking for this address
    #[returns(ClaimsResponse)]
    Claims { address: String },
    #[returns(GetHooksResponse)]
    GetHooks {},
    #[returns(ListStakersResponse)]
    ListStakers {
        start_after: Option<String>,
        limit: Option<u32>,
    },
    /// Voting power of an address for the governance core
    #[returns(VotingPowerAtHeightResponse)]
    VotingPowerAtHeight {
        address: String,
        height: Option<u64>,
    },
    #[returns(TotalPowerAtHeightResponse)]
    TotalPowerAtHeight { height: Option<u64> },
    /// Contract name and version
    #[returns(InfoResponse)]
    Info {},
}

#[cw_serde]
pub enum MigrateMsg {
    /// Converts the config of a 0.x release, which had a single `admin`
    FromBeta { manager: Option<String> },
    FromCompatible {},
}

#[cw_serde]
pub struct StakedBalanceAtHeightResponse {
    pub balance: Uint128,
    pub height: u64,
}

#[cw_serde]
pub struct TotalStakedAtHeightResponse {
    pub total: Uint128,
    pub height: u64,
}

#[cw_serde]
pub struct StakedValueResponse {
    pub value: Uint128,
}

#[cw_serde]
pub struct TotalValueResponse {
    pub total: Uint128,
}

#[cw_serde]
pub struct GetHooksResponse {
    pub hooks: Vec<String>,
}

#[cw_serde]
pub struct ListStakersResponse {
    pub stakers: Vec<StakerBalanceResponse>,
}

#[cw_serde]
pub struct StakerBalanceResponse {
    pub address: String,
    pub balance: Uint128,
}

#[cw_serde]
pub struct VotingPowerAtHeightResponse {
    pub power: Uint128,
    pub height: u64,
}

#[cw_serde]
pub struct TotalPowerAtHeightResponse {
    pub power: Uint128,
    pub height: u64,
}

#[cw_serde]
pub struct InfoResponse {
    pub info: ContractVersion,
}
