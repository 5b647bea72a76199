//! Credits and tickets ledger
//!
//! Balances never go negative: spending more than the balance fails and leaves
//! it untouched. Every successful mutation queues a [`BalanceChange`] that the
//! HUD side drains.

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// A balance notification carrying the new value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceChange {
    Credits(u64),
    Tickets(u64),
}

/// Shared currency ledger for a play session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EconomyLedger {
    credits: u64,
    tickets: u64,
    #[serde(skip)]
    changes: Vec<BalanceChange>,
}

impl EconomyLedger {
    /// Create a ledger with starting balances (negative values clamp to 0)
    pub fn new(credits: i64, tickets: i64) -> Self {
        Self {
            credits: credits.max(0) as u64,
            tickets: tickets.max(0) as u64,
            changes: Vec::new(),
        }
    }

    pub fn credits(&self) -> u64 {
        self.credits
    }

    pub fn tickets(&self) -> u64 {
        self.tickets
    }

    /// Whether both costs could be paid right now
    pub fn can_afford(&self, credit_cost: u64, ticket_cost: u64) -> bool {
        self.credits >= credit_cost && self.tickets >= ticket_cost
    }

    pub fn add_credits(&mut self, amount: i64) -> Result<u64, LedgerError> {
        self.credits = checked_add(self.credits, amount)?;
        self.changes.push(BalanceChange::Credits(self.credits));
        Ok(self.credits)
    }

    /// Returns `Ok(false)` without touching the balance if it is too low
    pub fn spend_credits(&mut self, amount: i64) -> Result<bool, LedgerError> {
        match checked_sub(self.credits, amount)? {
            Some(left) => {
                self.credits = left;
                self.changes.push(BalanceChange::Credits(left));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn add_tickets(&mut self, amount: i64) -> Result<u64, LedgerError> {
        self.tickets = checked_add(self.tickets, amount)?;
        self.changes.push(BalanceChange::Tickets(self.tickets));
        Ok(self.tickets)
    }

    /// Returns `Ok(false)` without touching the balance if it is too low
    pub fn spend_tickets(&mut self, amount: i64) -> Result<bool, LedgerError> {
        match checked_sub(self.tickets, amount)? {
            Some(left) => {
                self.tickets = left;
                self.changes.push(BalanceChange::Tickets(left));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Take all notifications queued since the last drain (oldest first)
    pub fn drain_changes(&mut self) -> Vec<BalanceChange> {
        std::mem::take(&mut self.changes)
    }
}

fn non_negative(amount: i64) -> Result<u64, LedgerError> {
    u64::try_from(amount).map_err(|_| LedgerError::NegativeAmount { amount })
}

fn checked_add(balance: u64, amount: i64) -> Result<u64, LedgerError> {
    balance
        .checked_add(non_negative(amount)?)
        .ok_or(LedgerError::Overflow)
}

fn checked_sub(balance: u64, amount: i64) -> Result<Option<u64>, LedgerError> {
    Ok(balance.checked_sub(non_negative(amount)?))
}
