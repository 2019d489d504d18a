//! Budget accounting for pay-per-call spending.
//!
//! A [`BudgetLedger`] tracks cumulative spend against a hard ceiling.
//! Charges go through a two-phase sequence: [`BudgetLedger::reserve`] holds
//! the amount before any payment is signed, and the returned
//! [`BudgetReservation`] is either committed once the server confirms the
//! paid call, or rolled back when the reservation guard drops. The ledger
//! never records a payment the server did not accept, and concurrent
//! reservations can never jointly exceed the ceiling.

use alloy_primitives::U256;
use std::sync::Mutex;
use tracing::debug;

#[derive(Debug)]
struct LedgerState {
    ceiling: U256,
    spent: U256,
    reserved: U256,
}

/// Tracks spending against a fixed ceiling, in asset base units.
#[derive(Debug)]
pub struct BudgetLedger {
    state: Mutex<LedgerState>,
}

/// Error returned when a prospective charge would breach the ceiling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "charge of {required} base units would exceed budget: \
     {spent} spent + {reserved} reserved of {ceiling} ceiling"
)]
pub struct BudgetExceeded {
    /// The amount that was requested.
    pub required: U256,
    /// Confirmed spend at the time of the request.
    pub spent: U256,
    /// Outstanding reservations at the time of the request.
    pub reserved: U256,
    /// The configured ceiling.
    pub ceiling: U256,
}

impl BudgetLedger {
    /// Creates a ledger with the given ceiling and nothing spent.
    pub fn new(ceiling: U256) -> Self {
        Self {
            state: Mutex::new(LedgerState {
                ceiling,
                spent: U256::ZERO,
                reserved: U256::ZERO,
            }),
        }
    }

    /// Provisionally holds `amount` against the ceiling.
    ///
    /// Succeeds iff spent + reserved + amount ≤ ceiling. The hold is
    /// released by dropping the returned reservation, or converted into
    /// confirmed spend by [`BudgetReservation::commit`].
    pub fn reserve(&self, amount: U256) -> Result<BudgetReservation<'_>, BudgetExceeded> {
        let mut state = self.lock();
        let held = state.spent + state.reserved;
        if held + amount > state.ceiling {
            return Err(BudgetExceeded {
                required: amount,
                spent: state.spent,
                reserved: state.reserved,
                ceiling: state.ceiling,
            });
        }
        state.reserved += amount;
        debug!(%amount, reserved = %state.reserved, "reserved budget");
        Ok(BudgetReservation {
            ledger: self,
            amount,
            committed: false,
        })
    }

    /// Confirmed spend so far.
    pub fn spent(&self) -> U256 {
        self.lock().spent
    }

    /// Headroom left for new reservations.
    pub fn remaining(&self) -> U256 {
        let state = self.lock();
        state.ceiling - state.spent - state.reserved
    }

    /// The configured ceiling.
    pub fn ceiling(&self) -> U256 {
        self.lock().ceiling
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LedgerState> {
        self.state.lock().expect("budget ledger lock poisoned")
    }
}

/// A provisional hold on budget headroom.
///
/// Dropping the reservation without committing rolls the hold back, so an
/// aborted call after a successful reserve cannot leak headroom.
#[derive(Debug)]
#[must_use = "an unused reservation rolls back immediately"]
pub struct BudgetReservation<'a> {
    ledger: &'a BudgetLedger,
    amount: U256,
    committed: bool,
}

impl BudgetReservation<'_> {
    /// The amount held by this reservation.
    pub fn amount(&self) -> U256 {
        self.amount
    }

    /// Converts the hold into confirmed spend.
    ///
    /// Call only once the server has confirmed the paid request succeeded.
    pub fn commit(mut self) {
        let mut state = self.ledger.lock();
        state.reserved -= self.amount;
        state.spent += self.amount;
        debug!(amount = %self.amount, spent = %state.spent, "committed charge");
        self.committed = true;
    }
}

impl Drop for BudgetReservation<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        let mut state = self.ledger.lock();
        state.reserved -= self.amount;
        debug!(amount = %self.amount, "rolled back reservation");
    }
}
