use cosmwasm_std::{Deps, Env, StdResult};
use cw2::get_contract_version;

use crate::error::ContractError;
use crate::msg::{
    ClaimsResponse, GetHooksResponse, InfoResponse, ListStakersResponse,
    StakedBalanceAtHeightResponse, StakedValueResponse, StakerBalanceResponse,
    TotalPowerAtHeightResponse, TotalStakedAtHeightResponse, TotalValueResponse,
    VotingPowerAtHeightResponse,
};
use crate::state::{maybe_addr, Config, CLAIMS, CONFIG, HOOKS, LEDGER};

// settings for pagination
const MAX_LIMIT: u32 = 30;
const DEFAULT_LIMIT: u32 = 10;

/// Snapshots are never extrapolated: a height after the current block is rejected.
fn resolve_height(env: &Env, height: Option<u64>) -> Result<u64, ContractError> {
    let current = env.block.height;
    match height {
        Some(requested) if requested > current => {
            Err(ContractError::InvalidHeight { requested, current })
        }
        Some(requested) => Ok(requested),
        None => Ok(current),
    }
}

pub fn query_staked_balance_at_height(
    deps: Deps,
    env: Env,
    address: String,
    height: Option<u64>,
) -> Result<StakedBalanceAtHeightResponse, ContractError> {
    let address = deps.api.addr_validate(&address)?;
    let height = resolve_height(&env, height)?;
    let balance = LEDGER.balance_at(deps.storage, &address, height)?;
    Ok(StakedBalanceAtHeightResponse { balance, height })
}

pub fn query_total_staked_at_height(
    deps: Deps,
    env: Env,
    height: Option<u64>,
) -> Result<TotalStakedAtHeightResponse, ContractError> {
    let height = resolve_height(&env, height)?;
    let total = LEDGER.total_at(deps.storage, height)?;
    Ok(TotalStakedAtHeightResponse { total, height })
}

pub fn query_voting_power_at_height(
    deps: Deps,
    env: Env,
    address: String,
    height: Option<u64>,
) -> Result<VotingPowerAtHeightResponse, ContractError> {
    let res = query_staked_balance_at_height(deps, env, address, height)?;
    Ok(VotingPowerAtHeightResponse {
        power: res.balance,
        height: res.height,
    })
}

pub fn query_total_power_at_height(
    deps: Deps,
    env: Env,
    height: Option<u64>,
) -> Result<TotalPowerAtHeightResponse, ContractError> {
    let res = query_total_staked_at_height(deps, env, height)?;
    Ok(TotalPowerAtHeightResponse {
        power: res.total,
        height: res.height,
    })
}

// Staking is 1:1 custodial, the value of a stake is the stake itself.
pub fn query_staked_value(deps: Deps, address: String) -> StdResult<StakedValueResponse> {
    let address = deps.api.addr_validate(&address)?;
    let value = LEDGER.balance(deps.storage, &address)?;
    Ok(StakedValueResponse { value })
}

pub fn query_total_value(deps: Deps) -> StdResult<TotalValueResponse> {
    let total = LEDGER.total(deps.storage)?;
    Ok(TotalValueResponse { total })
}

pub fn query_config(deps: Deps) -> StdResult<Config> {
    CONFIG.load(deps.storage)
}

pub fn query_claims(deps: Deps, address: String) -> StdResult<ClaimsResponse> {
    let address = deps.api.addr_validate(&address)?;
    CLAIMS.query_claims(deps.storage, &address)
}

pub fn query_hooks(deps: Deps) -> StdResult<GetHooksResponse> {
    HOOKS.query_hooks(deps.storage)
}

pub fn query_list_stakers(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<ListStakersResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = maybe_addr(deps.api, start_after)?;

    let stakers = LEDGER
        .stakers(deps.storage, start.as_ref(), limit)?
        .into_iter()
        .map(|(address, balance)| StakerBalanceResponse {
            address: address.into(),
            balance,
        })
        .collect();

    Ok(ListStakersResponse { stakers })
}

pub fn query_info(deps: Deps) -> StdResult<InfoResponse> {
    let info = get_contract_version(deps.storage)?;
    Ok(InfoResponse { info })
}
