#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response, SubMsgResult,
};
use cw2::{get_contract_version, set_contract_version};
use semver::Version;

use crate::error::ContractError;
use crate::execute::{
    display_addr, execute_add_hook, execute_claim, execute_receive, execute_remove_hook,
    execute_unstake, execute_update_config, TRANSFER_REPLY_ID,
};
use crate::hooks::HOOK_REPLY_ID;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query::{
    query_claims, query_config, query_hooks, query_info, query_list_stakers,
    query_staked_balance_at_height, query_staked_value, query_total_power_at_height,
    query_total_staked_at_height, query_total_value, query_voting_power_at_height,
};
use crate::state::{maybe_addr, validate_duration, Config, BETA_CONFIG, CONFIG};

// version info for migration info
pub(crate) const CONTRACT_NAME: &str = "crates.io:cw20-stake";
pub(crate) const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let owner = maybe_addr(deps.api, msg.owner)?;
    let manager = maybe_addr(deps.api, msg.manager)?;
    let token_address = deps.api.addr_validate(&msg.token_address)?;
    validate_duration(msg.unstaking_duration)?;

    let config = Config {
        owner,
        manager,
        token_address,
        unstaking_duration: msg.unstaking_duration,
    };
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("owner", display_addr(&config.owner))
        .add_attribute("manager", display_addr(&config.manager))
        .add_attribute("token_address", config.token_address))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Receive(msg) => execute_receive(deps, env, info, msg),
        ExecuteMsg::Unstake { amount } => execute_unstake(deps, env, info, amount),
        ExecuteMsg::Claim {} => execute_claim(deps, env, info),
        ExecuteMsg::UpdateConfig {
            owner,
            manager,
            duration,
        } => execute_update_config(deps, info, owner, manager, duration),
        ExecuteMsg::AddHook { addr } => execute_add_hook(deps, info, addr),
        ExecuteMsg::RemoveHook { addr } => execute_remove_hook(deps, info, addr),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    let res = match msg {
        QueryMsg::StakedBalanceAtHeight { address, height } => to_json_binary(
            &query_staked_balance_at_height(deps, env, address, height)?,
        ),
        QueryMsg::TotalStakedAtHeight { height } => {
            to_json_binary(&query_total_staked_at_height(deps, env, height)?)
        }
        QueryMsg::StakedValue { address } => to_json_binary(&query_staked_value(deps, address)?),
        QueryMsg::TotalValue {} => to_json_binary(&query_total_value(deps)?),
        QueryMsg::GetConfig {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Claims { address } => to_json_binary(&query_claims(deps, address)?),
        QueryMsg::GetHooks {} => to_json_binary(&query_hooks(deps)?),
        QueryMsg::ListStakers { start_after, limit } => {
            to_json_binary(&query_list_stakers(deps, start_after, limit)?)
        }
        QueryMsg::VotingPowerAtHeight { address, height } => to_json_binary(
            &query_voting_power_at_height(deps, env, address, height)?,
        ),
        QueryMsg::TotalPowerAtHeight { height } => {
            to_json_binary(&query_total_power_at_height(deps, env, height)?)
        }
        QueryMsg::Info {} => to_json_binary(&query_info(deps)?),
    }?;
    Ok(res)
}

/// Only failures come back here. Turning them into errors reverts the
/// whole invocation, including the balance change that caused them.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(_deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    match (msg.id, msg.result) {
        (HOOK_REPLY_ID, SubMsgResult::Err(reason)) => Err(ContractError::HookRejected { reason }),
        (TRANSFER_REPLY_ID, SubMsgResult::Err(reason)) => {
            Err(ContractError::OutboundTransferFailed { reason })
        }
        (HOOK_REPLY_ID | TRANSFER_REPLY_ID, SubMsgResult::Ok(_)) => Ok(Response::new()),
        (id, _) => Err(ContractError::UnknownReplyId { id }),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::ContractNameMismatch {
            previous: stored.contract,
            expected: CONTRACT_NAME.to_string(),
        });
    }
    let previous: Version = stored.version.parse()?;
    let new: Version = CONTRACT_VERSION.parse()?;
    if previous > new {
        return Err(ContractError::CannotMigrateToOlder {
            previous: stored.version,
            new: CONTRACT_VERSION.to_string(),
        });
    }

    match msg {
        MigrateMsg::FromBeta { manager } => {
            // the beta layout shares its key with the current one
            if previous.major != 0 {
                return Err(ContractError::NotABetaRelease {
                    version: stored.version,
                });
            }
            let beta = BETA_CONFIG.load(deps.storage)?;
            let config = Config {
                owner: beta.admin,
                manager: maybe_addr(deps.api, manager)?,
                token_address: beta.token_address,
                unstaking_duration: beta.unstaking_duration,
            };
            CONFIG.save(deps.storage, &config)?;
        }
        MigrateMsg::FromCompatible {} => {}
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
