use cosmwasm_std::{Addr, BlockInfo, StdResult, Storage, Uint128};
use cw_controllers::{Claim, ClaimsResponse};
use cw_storage_plus::Map;
use cw_utils::Expiration;

use crate::error::ContractError;

/// Upper bound of pending claims per address. Each claim is settled by
/// iterating the whole queue, so the queue must stay small.
pub const MAX_CLAIMS: usize = 100;

/// Pending withdrawals created by unstaking, one queue per address.
///
/// Every unstake produces its own entry, even when another entry with the same
/// release point already exists. A queue is kept sorted by release point,
/// entries with an equal release point stay in the order they were created.
pub struct ClaimQueue<'a>(Map<&'a Addr, Vec<Claim>>);

impl<'a> ClaimQueue<'a> {
    pub const fn new(storage_key: &'static str) -> Self {
        ClaimQueue(Map::new(storage_key))
    }

    /// Queues `amount` for `addr`, releasable once `release_at` has passed.
    pub fn create_claim(
        &self,
        storage: &mut dyn Storage,
        addr: &Addr,
        amount: Uint128,
        release_at: Expiration,
    ) -> Result<(), ContractError> {
        if amount.is_zero() {
            return Err(ContractError::InvalidZeroAmount {});
        }
        if matches!(release_at, Expiration::Never {}) {
            return Err(ContractError::ClaimNeverReleases {});
        }

        let mut claims = self.0.may_load(storage, addr)?.unwrap_or_default();
        if claims.len() >= MAX_CLAIMS {
            return Err(ContractError::TooManyClaims {});
        }
        let key = release_key(&release_at);
        let pos = claims.partition_point(|c| release_key(&c.release_at) <= key);
        claims.insert(pos, Claim { amount, release_at });
        self.0.save(storage, addr, &claims)?;
        Ok(())
    }

    /// Removes every matured claim of `addr` and returns their sum.
    /// Fails with `NothingToClaim` when none has matured; immature claims are kept as they are.
    pub fn claim_tokens(
        &self,
        storage: &mut dyn Storage,
        addr: &Addr,
        block: &BlockInfo,
    ) -> Result<Uint128, ContractError> {
        let claims = self.0.may_load(storage, addr)?.unwrap_or_default();
        let (matured, waiting): (Vec<_>, Vec<_>) = claims
            .into_iter()
            .partition(|c| c.release_at.is_expired(block));
        if matured.is_empty() {
            return Err(ContractError::NothingToClaim {});
        }

        let to_send = matured
            .iter()
            .try_fold(Uint128::zero(), |acc, c| acc.checked_add(c.amount))?;

        if waiting.is_empty() {
            self.0.remove(storage, addr);
        } else {
            self.0.save(storage, addr, &waiting)?;
        }
        Ok(to_send)
    }

    pub fn claims(&self, storage: &dyn Storage, addr: &Addr) -> StdResult<Vec<Claim>> {
        Ok(self.0.may_load(storage, addr)?.unwrap_or_default())
    }

    pub fn query_claims(&self, storage: &dyn Storage, addr: &Addr) -> StdResult<ClaimsResponse> {
        let claims = self.claims(storage, addr)?;
        Ok(ClaimsResponse { claims })
    }
}

// Heights sort before timestamps when a queue mixes both, which happens
// after the unstaking duration is switched from one kind to the other.
fn release_key(release_at: &Expiration) -> (u8, u64) {
    match release_at {
        Expiration::AtHeight(height) => (0, *height),
        Expiration::AtTime(time) => (1, time.nanos()),
        Expiration::Never {} => (2, 0),
    }
}
