use cosmwasm_schema::cw_serde;
use cosmwasm_std::{to_json_binary, Addr, Binary, StdResult, Storage, SubMsg, Uint128, WasmMsg};
use cw_storage_plus::Item;

use crate::error::ContractError;
use crate::msg::GetHooksResponse;

/// Reply id of every hook notification. A failing hook is turned into
/// [`ContractError::HookRejected`] by the reply handler, which aborts the
/// whole transaction.
pub const HOOK_REPLY_ID: u64 = 1;

/// Sent to every registered hook after a balance change.
#[cw_serde]
pub enum StakeChangedHookMsg {
    Stake {
        addr: Addr,
        amount: Uint128,
        old_balance: Uint128,
        new_balance: Uint128,
    },
    Unstake {
        addr: Addr,
        amount: Uint128,
        old_balance: Uint128,
        new_balance: Uint128,
    },
}

// This is just a helper to properly serialize the above message
#[cw_serde]
enum StakeChangedExecuteMsg {
    StakeChangeHook(StakeChangedHookMsg),
}

impl StakeChangedHookMsg {
    /// serializes the message
    pub fn into_json_binary(self) -> StdResult<Binary> {
        let msg = StakeChangedExecuteMsg::StakeChangeHook(self);
        to_json_binary(&msg)
    }

    /// creates a sub message that replies only on error
    pub fn into_sub_msg<T: Into<String>>(self, contract_addr: T) -> StdResult<SubMsg> {
        let execute = WasmMsg::Execute {
            contract_addr: contract_addr.into(),
            msg: self.into_json_binary()?,
            funds: vec![],
        };
        Ok(SubMsg::reply_on_error(execute, HOOK_REPLY_ID))
    }
}

/// Ordered set of contracts notified on every stake change.
// store all hook addresses in one item. We cannot have many of them before the contract becomes unusable anyway.
pub struct HookRegistry(Item<Vec<Addr>>);

impl HookRegistry {
    pub const fn new(storage_key: &'static str) -> Self {
        HookRegistry(Item::new(storage_key))
    }

    pub fn add_hook(&self, storage: &mut dyn Storage, addr: Addr) -> Result<(), ContractError> {
        let mut hooks = self.hooks(storage)?;
        if hooks.iter().any(|h| h == &addr) {
            return Err(ContractError::HookAlreadyRegistered {});
        }
        hooks.push(addr);
        Ok(self.0.save(storage, &hooks)?)
    }

    pub fn remove_hook(&self, storage: &mut dyn Storage, addr: Addr) -> Result<(), ContractError> {
        let mut hooks = self.hooks(storage)?;
        if let Some(p) = hooks.iter().position(|h| h == &addr) {
            hooks.remove(p);
        } else {
            return Err(ContractError::HookNotFound {});
        }
        Ok(self.0.save(storage, &hooks)?)
    }

    /// Registered hooks in insertion order.
    pub fn hooks(&self, storage: &dyn Storage) -> StdResult<Vec<Addr>> {
        Ok(self.0.may_load(storage)?.unwrap_or_default())
    }

    pub fn prepare_hooks(
        &self,
        storage: &dyn Storage,
        msg: &StakeChangedHookMsg,
    ) -> StdResult<Vec<SubMsg>> {
        self.hooks(storage)?
            .into_iter()
            .map(|h| msg.clone().into_sub_msg(h))
            .collect()
    }

    pub fn query_hooks(&self, storage: &dyn Storage) -> StdResult<GetHooksResponse> {
        let hooks = self
            .hooks(storage)?
            .into_iter()
            .map(String::from)
            .collect();
        Ok(GetHooksResponse { hooks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::MockStorage;
    use cosmwasm_std::{from_json, CosmosMsg, ReplyOn};

    const HOOKS: HookRegistry = HookRegistry::new("hooks");

    #[test]
    fn add_and_remove_keep_order() {
        let mut storage = MockStorage::new();
        let (one, two, three) = (
            Addr::unchecked("one"),
            Addr::unchecked("two"),
            Addr::unchecked("three"),
        );

        HOOKS.add_hook(&mut storage, one.clone()).unwrap();
        HOOKS.add_hook(&mut storage, two.clone()).unwrap();
        HOOKS.add_hook(&mut storage, three.clone()).unwrap();
        assert_eq!(
            HOOKS.add_hook(&mut storage, two.clone()).unwrap_err(),
            ContractError::HookAlreadyRegistered {}
        );

        HOOKS.remove_hook(&mut storage, two.clone()).unwrap();
        assert_eq!(HOOKS.hooks(&storage).unwrap(), vec![one, three]);
        assert_eq!(
            HOOKS.remove_hook(&mut storage, two).unwrap_err(),
            ContractError::HookNotFound {}
        );

        let res = HOOKS.query_hooks(&storage).unwrap();
        assert_eq!(res.hooks, vec!["one".to_string(), "three".to_string()]);
    }

    #[test]
    fn remove_from_empty_registry() {
        let mut storage = MockStorage::new();
        assert_eq!(
            HOOKS
                .remove_hook(&mut storage, Addr::unchecked("ghost"))
                .unwrap_err(),
            ContractError::HookNotFound {}
        );
    }

    #[test]
    fn prepared_hooks_reply_on_error() {
        let mut storage = MockStorage::new();
        HOOKS
            .add_hook(&mut storage, Addr::unchecked("gov"))
            .unwrap();
        HOOKS
            .add_hook(&mut storage, Addr::unchecked("cache"))
            .unwrap();

        let change = StakeChangedHookMsg::Stake {
            addr: Addr::unchecked("alice"),
            amount: Uint128::new(10),
            old_balance: Uint128::new(5),
            new_balance: Uint128::new(15),
        };
        let msgs = HOOKS.prepare_hooks(&storage, &change).unwrap();
        assert_eq!(msgs.len(), 2);

        let targets: Vec<_> = msgs
            .iter()
            .map(|sub| {
                assert_eq!(sub.id, HOOK_REPLY_ID);
                assert_eq!(sub.reply_on, ReplyOn::Error);
                match &sub.msg {
                    CosmosMsg::Wasm(WasmMsg::Execute {
                        contract_addr, msg, ..
                    }) => {
                        let parsed: StakeChangedExecuteMsg = from_json(msg).unwrap();
                        assert_eq!(parsed, StakeChangedExecuteMsg::StakeChangeHook(change.clone()));
                        contract_addr.clone()
                    }
                    m => panic!("Unexpected message: {m:?}"),
                }
            })
            .collect();
        assert_eq!(targets, vec!["gov".to_string(), "cache".to_string()]);
    }

    #[test]
    fn hook_message_wire_format() {
        let change = StakeChangedHookMsg::Unstake {
            addr: Addr::unchecked("alice"),
            amount: Uint128::new(40),
            old_balance: Uint128::new(100),
            new_balance: Uint128::new(60),
        };
        let json = String::from_utf8(change.into_json_binary().unwrap().to_vec()).unwrap();
        assert_eq!(
            json,
            r#"{"stake_change_hook":{"unstake":{"addr":"alice","amount":"40","old_balance":"100","new_balance":"60"}}}"#
        );
    }
}
