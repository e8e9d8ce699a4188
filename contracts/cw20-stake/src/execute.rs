use cosmwasm_std::{
    from_json, to_json_binary, Addr, DepsMut, Env, MessageInfo, Response, StdResult, SubMsg,
    Uint128, WasmMsg,
};
use cw20::{Cw20ExecuteMsg, Cw20ReceiveMsg};
use cw_utils::Duration;

use crate::error::ContractError;
use crate::hooks::StakeChangedHookMsg;
use crate::msg::ReceiveMsg;
use crate::state::{maybe_addr, validate_duration, CLAIMS, CONFIG, HOOKS, LEDGER};

/// Reply id of outbound token transfers, see [`crate::contract::reply`].
pub const TRANSFER_REPLY_ID: u64 = 2;

pub fn execute_receive(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    wrapper: Cw20ReceiveMsg,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.token_address {
        return Err(ContractError::InvalidToken {
            received: info.sender.into(),
            expected: config.token_address.into(),
        });
    }
    let msg: ReceiveMsg = from_json(&wrapper.msg)?;
    let sender = deps.api.addr_validate(&wrapper.sender)?;
    match msg {
        ReceiveMsg::Stake {} => execute_stake(deps, env, sender, wrapper.amount),
    }
}

pub fn execute_stake(
    deps: DepsMut,
    env: Env,
    sender: Addr,
    amount: Uint128,
) -> Result<Response, ContractError> {
    if amount.is_zero() {
        return Err(ContractError::InvalidZeroAmount {});
    }

    let old_balance = LEDGER.balance(deps.storage, &sender)?;
    let new_balance = old_balance.checked_add(amount)?;
    let new_total = LEDGER.total(deps.storage)?.checked_add(amount)?;
    LEDGER.record(
        deps.storage,
        &sender,
        env.block.height,
        new_balance,
        new_total,
    )?;

    let hook_msgs = HOOKS.prepare_hooks(
        deps.storage,
        &StakeChangedHookMsg::Stake {
            addr: sender.clone(),
            amount,
            old_balance,
            new_balance,
        },
    )?;

    Ok(Response::new()
        .add_submessages(hook_msgs)
        .add_attribute("action", "stake")
        .add_attribute("from", sender)
        .add_attribute("amount", amount)
        .add_attribute("new_balance", new_balance)
        .add_attribute("total_staked", new_total))
}

pub fn execute_unstake(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    amount: Uint128,
) -> Result<Response, ContractError> {
    if amount.is_zero() {
        return Err(ContractError::InvalidZeroAmount {});
    }

    let config = CONFIG.load(deps.storage)?;
    let old_balance = LEDGER.balance(deps.storage, &info.sender)?;
    if amount > old_balance {
        return Err(ContractError::InsufficientBalance {
            requested: amount,
            available: old_balance,
        });
    }
    let new_balance = old_balance.checked_sub(amount)?;
    let new_total = LEDGER.total(deps.storage)?.checked_sub(amount)?;
    LEDGER.record(
        deps.storage,
        &info.sender,
        env.block.height,
        new_balance,
        new_total,
    )?;

    let hook_msgs = HOOKS.prepare_hooks(
        deps.storage,
        &StakeChangedHookMsg::Unstake {
            addr: info.sender.clone(),
            amount,
            old_balance,
            new_balance,
        },
    )?;

    let res = Response::new()
        .add_attribute("action", "unstake")
        .add_attribute("from", info.sender.as_str())
        .add_attribute("amount", amount)
        .add_attribute("new_balance", new_balance)
        .add_attribute("total_staked", new_total);

    let res = match config.unstaking_duration {
        None => res
            .add_submessage(transfer_msg(&config.token_address, &info.sender, amount)?)
            .add_attribute("claim_release", "immediate"),
        Some(duration) => {
            let release_at = duration.after(&env.block);
            CLAIMS.create_claim(deps.storage, &info.sender, amount, release_at)?;
            res.add_attribute("claim_release", release_at.to_string())
        }
    };
    Ok(res.add_submessages(hook_msgs))
}

pub fn execute_claim(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let release = CLAIMS.claim_tokens(deps.storage, &info.sender, &env.block)?;
    let config = CONFIG.load(deps.storage)?;

    Ok(Response::new()
        .add_submessage(transfer_msg(&config.token_address, &info.sender, release)?)
        .add_attribute("action", "claim")
        .add_attribute("from", info.sender)
        .add_attribute("amount", release))
}

pub fn execute_update_config(
    deps: DepsMut,
    info: MessageInfo,
    new_owner: Option<String>,
    new_manager: Option<String>,
    duration: Option<Duration>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    config.assert_privileged(&info.sender)?;
    validate_duration(duration)?;

    let new_owner = maybe_addr(deps.api, new_owner)?;
    if new_owner != config.owner && config.owner.as_ref() != Some(&info.sender) {
        return Err(ContractError::OnlyOwnerCanChangeOwner {});
    }

    config.owner = new_owner;
    config.manager = maybe_addr(deps.api, new_manager)?;
    config.unstaking_duration = duration;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_config")
        .add_attribute("owner", display_addr(&config.owner))
        .add_attribute("manager", display_addr(&config.manager))
        .add_attribute(
            "unstaking_duration",
            config
                .unstaking_duration
                .map(|d| d.to_string())
                .unwrap_or_else(|| "None".to_string()),
        ))
}

pub fn execute_add_hook(
    deps: DepsMut,
    info: MessageInfo,
    addr: String,
) -> Result<Response, ContractError> {
    CONFIG.load(deps.storage)?.assert_privileged(&info.sender)?;
    let hook = deps.api.addr_validate(&addr)?;
    HOOKS.add_hook(deps.storage, hook)?;
    Ok(Response::new()
        .add_attribute("action", "add_hook")
        .add_attribute("hook", addr))
}

pub fn execute_remove_hook(
    deps: DepsMut,
    info: MessageInfo,
    addr: String,
) -> Result<Response, ContractError> {
    CONFIG.load(deps.storage)?.assert_privileged(&info.sender)?;
    let hook = deps.api.addr_validate(&addr)?;
    HOOKS.remove_hook(deps.storage, hook)?;
    Ok(Response::new()
        .add_attribute("action", "remove_hook")
        .add_attribute("hook", addr))
}

fn transfer_msg(token: &Addr, recipient: &Addr, amount: Uint128) -> StdResult<SubMsg> {
    let transfer = WasmMsg::Execute {
        contract_addr: token.to_string(),
        msg: to_json_binary(&Cw20ExecuteMsg::Transfer {
            recipient: recipient.to_string(),
            amount,
        })?,
        funds: vec![],
    };
    Ok(SubMsg::reply_on_error(transfer, TRANSFER_REPLY_ID))
}

pub(crate) fn display_addr(addr: &Option<Addr>) -> String {
    addr.as_ref()
        .map(Addr::to_string)
        .unwrap_or_else(|| "None".to_string())
}
