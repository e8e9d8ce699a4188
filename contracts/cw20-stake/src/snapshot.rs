use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Order, StdError, StdResult, Storage, Uint128};
use cw_storage_plus::{Bound, Item, Map};

/// A balance as of the end of `height`.
#[cw_serde]
#[derive(Copy, Eq)]
pub struct Checkpoint {
    pub height: u64,
    pub balance: Uint128,
}

/// Height-indexed history of every staker's balance and of the total staked.
///
/// Checkpoints are keyed by `(address, height)` so the storage order is the
/// height order. A lookup at height `h` is a single reverse range bounded by
/// `h` inclusive, which is a logarithmic seek in the underlying tree. There is
/// at most one checkpoint per height: writing twice in the same block
/// overwrites the first value. Checkpoints are never removed.
///
/// The current balance of every non-zero staker is also kept in a plain map,
/// which backs the staker enumeration.
pub struct SnapshotLedger<'a> {
    balances: Map<&'a Addr, Uint128>,
    checkpoints: Map<(&'a Addr, u64), Uint128>,
    total: Item<Uint128>,
    total_checkpoints: Map<u64, Uint128>,
}

impl<'a> SnapshotLedger<'a> {
    pub const fn new(
        balances_key: &'static str,
        checkpoints_key: &'static str,
        total_key: &'static str,
        total_checkpoints_key: &'static str,
    ) -> Self {
        SnapshotLedger {
            balances: Map::new(balances_key),
            checkpoints: Map::new(checkpoints_key),
            total: Item::new(total_key),
            total_checkpoints: Map::new(total_checkpoints_key),
        }
    }

    pub fn balance(&self, storage: &dyn Storage, addr: &Addr) -> StdResult<Uint128> {
        Ok(self.balances.may_load(storage, addr)?.unwrap_or_default())
    }

    pub fn total(&self, storage: &dyn Storage) -> StdResult<Uint128> {
        Ok(self.total.may_load(storage)?.unwrap_or_default())
    }

    /// Writes `new_balance` for `addr` and `new_total` for the aggregate, both at `height`.
    /// Heights must never go backwards for a given sequence.
    pub fn record(
        &self,
        storage: &mut dyn Storage,
        addr: &Addr,
        height: u64,
        new_balance: Uint128,
        new_total: Uint128,
    ) -> StdResult<()> {
        if let Some(last) = self.last_height(storage, addr)? {
            if height < last {
                return Err(StdError::generic_err(format!(
                    "Checkpoint at height {height} would precede existing checkpoint at {last}"
                )));
            }
        }
        self.checkpoints.save(storage, (addr, height), &new_balance)?;
        if new_balance.is_zero() {
            self.balances.remove(storage, addr);
        } else {
            self.balances.save(storage, addr, &new_balance)?;
        }

        if let Some(last) = self.last_total_height(storage)? {
            if height < last {
                return Err(StdError::generic_err(format!(
                    "Total checkpoint at height {height} would precede existing checkpoint at {last}"
                )));
            }
        }
        self.total_checkpoints.save(storage, height, &new_total)?;
        self.total.save(storage, &new_total)
    }

    /// Balance of `addr` at the greatest checkpoint not newer than `height`, or zero.
    pub fn balance_at(
        &self,
        storage: &dyn Storage,
        addr: &Addr,
        height: u64,
    ) -> StdResult<Uint128> {
        let found = self
            .checkpoints
            .prefix(addr)
            .range(
                storage,
                None,
                Some(Bound::inclusive(height)),
                Order::Descending,
            )
            .next()
            .transpose()?;
        Ok(found.map(|(_, balance)| balance).unwrap_or_default())
    }

    pub fn total_at(&self, storage: &dyn Storage, height: u64) -> StdResult<Uint128> {
        let found = self
            .total_checkpoints
            .range(
                storage,
                None,
                Some(Bound::inclusive(height)),
                Order::Descending,
            )
            .next()
            .transpose()?;
        Ok(found.map(|(_, total)| total).unwrap_or_default())
    }

    /// Full history for `addr`, oldest first.
    pub fn checkpoints(&self, storage: &dyn Storage, addr: &Addr) -> StdResult<Vec<Checkpoint>> {
        self.checkpoints
            .prefix(addr)
            .range(storage, None, None, Order::Ascending)
            .map(|item| item.map(|(height, balance)| Checkpoint { height, balance }))
            .collect()
    }

    /// Stakers with a non-zero current balance, ascending by address.
    pub fn stakers(
        &self,
        storage: &dyn Storage,
        start_after: Option<&Addr>,
        limit: usize,
    ) -> StdResult<Vec<(Addr, Uint128)>> {
        let start = start_after.map(Bound::exclusive);
        self.balances
            .range(storage, start, None, Order::Ascending)
            .take(limit)
            .collect()
    }

    fn last_height(&self, storage: &dyn Storage, addr: &Addr) -> StdResult<Option<u64>> {
        self.checkpoints
            .prefix(addr)
            .keys(storage, None, None, Order::Descending)
            .next()
            .transpose()
    }

    fn last_total_height(&self, storage: &dyn Storage) -> StdResult<Option<u64>> {
        self.total_checkpoints
            .keys(storage, None, None, Order::Descending)
            .next()
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::MockStorage;

    const LEDGER: SnapshotLedger = SnapshotLedger::new("b", "b__cp", "t", "t__cp");

    fn addr(name: &str) -> Addr {
        Addr::unchecked(name)
    }

    #[test]
    fn empty_ledger_reads_zero() {
        let storage = MockStorage::new();
        let alice = addr("alice");
        assert_eq!(LEDGER.balance(&storage, &alice).unwrap(), Uint128::zero());
        assert_eq!(LEDGER.balance_at(&storage, &alice, 100).unwrap(), Uint128::zero());
        assert_eq!(LEDGER.total(&storage).unwrap(), Uint128::zero());
        assert_eq!(LEDGER.total_at(&storage, 100).unwrap(), Uint128::zero());
        assert!(LEDGER.checkpoints(&storage, &alice).unwrap().is_empty());
    }

    #[test]
    fn historical_lookup_picks_latest_checkpoint_not_after_height() {
        let mut storage = MockStorage::new();
        let alice = addr("alice");

        LEDGER
            .record(&mut storage, &alice, 10, Uint128::new(100), Uint128::new(100))
            .unwrap();
        LEDGER
            .record(&mut storage, &alice, 20, Uint128::new(60), Uint128::new(60))
            .unwrap();
        LEDGER
            .record(&mut storage, &alice, 35, Uint128::new(75), Uint128::new(75))
            .unwrap();

        // before any checkpoint
        assert_eq!(LEDGER.balance_at(&storage, &alice, 9).unwrap(), Uint128::zero());
        // exact hits
        assert_eq!(LEDGER.balance_at(&storage, &alice, 10).unwrap(), Uint128::new(100));
        assert_eq!(LEDGER.balance_at(&storage, &alice, 20).unwrap(), Uint128::new(60));
        // between checkpoints
        assert_eq!(LEDGER.balance_at(&storage, &alice, 34).unwrap(), Uint128::new(60));
        // after the last one
        assert_eq!(LEDGER.balance_at(&storage, &alice, 1000).unwrap(), Uint128::new(75));

        assert_eq!(LEDGER.total_at(&storage, 15).unwrap(), Uint128::new(100));
        assert_eq!(LEDGER.total_at(&storage, 35).unwrap(), Uint128::new(75));
        assert_eq!(LEDGER.balance(&storage, &alice).unwrap(), Uint128::new(75));
    }

    #[test]
    fn same_height_overwrites() {
        let mut storage = MockStorage::new();
        let alice = addr("alice");

        LEDGER
            .record(&mut storage, &alice, 5, Uint128::new(10), Uint128::new(10))
            .unwrap();
        LEDGER
            .record(&mut storage, &alice, 7, Uint128::new(20), Uint128::new(20))
            .unwrap();
        LEDGER
            .record(&mut storage, &alice, 7, Uint128::new(25), Uint128::new(25))
            .unwrap();

        let history = LEDGER.checkpoints(&storage, &alice).unwrap();
        assert_eq!(
            history,
            vec![
                Checkpoint {
                    height: 5,
                    balance: Uint128::new(10)
                },
                Checkpoint {
                    height: 7,
                    balance: Uint128::new(25)
                },
            ]
        );
        assert_eq!(LEDGER.total_at(&storage, 7).unwrap(), Uint128::new(25));
    }

    #[test]
    fn heights_cannot_go_backwards() {
        let mut storage = MockStorage::new();
        let alice = addr("alice");
        LEDGER
            .record(&mut storage, &alice, 50, Uint128::new(10), Uint128::new(10))
            .unwrap();
        let err = LEDGER
            .record(&mut storage, &alice, 49, Uint128::new(5), Uint128::new(5))
            .unwrap_err();
        assert!(matches!(err, StdError::GenericErr { .. }));
    }

    #[test]
    fn zero_balance_leaves_staker_index_but_keeps_history() {
        let mut storage = MockStorage::new();
        let alice = addr("alice");
        let bob = addr("bob");

        LEDGER
            .record(&mut storage, &alice, 1, Uint128::new(10), Uint128::new(10))
            .unwrap();
        LEDGER
            .record(&mut storage, &bob, 1, Uint128::new(5), Uint128::new(15))
            .unwrap();
        LEDGER
            .record(&mut storage, &alice, 2, Uint128::zero(), Uint128::new(5))
            .unwrap();

        let stakers = LEDGER.stakers(&storage, None, 10).unwrap();
        assert_eq!(stakers, vec![(bob, Uint128::new(5))]);
        assert_eq!(LEDGER.balance_at(&storage, &alice, 1).unwrap(), Uint128::new(10));
        assert_eq!(LEDGER.balance_at(&storage, &alice, 2).unwrap(), Uint128::zero());
    }

    #[test]
    fn stakers_paginate_exclusively() {
        let mut storage = MockStorage::new();
        let mut total = Uint128::zero();
        for (i, name) in ["carol", "alice", "bob"].iter().enumerate() {
            total += Uint128::new(10);
            LEDGER
                .record(&mut storage, &addr(name), i as u64, Uint128::new(10), total)
                .unwrap();
        }

        let page = LEDGER.stakers(&storage, None, 2).unwrap();
        let names: Vec<_> = page.iter().map(|(a, _)| a.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob"]);

        let page = LEDGER.stakers(&storage, Some(&addr("bob")), 2).unwrap();
        let names: Vec<_> = page.iter().map(|(a, _)| a.as_str()).collect();
        assert_eq!(names, vec!["carol"]);
    }
}
