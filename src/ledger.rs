//! In-memory payment ledger and status state machine.
//!
//! The ledger is the process-wide store mapping transaction ids to payment
//! records. It replaces the database pool of a durable design: records live
//! only for the lifetime of the process and are never deleted.
//!
//! # Concurrency
//!
//! Concurrent request handlers share one `PaymentLedger` behind an `Arc`.
//! Every operation is a single read-modify-write under one mutex
//! acquisition, so a record is only ever observed in its initial status or
//! `Approved`, never torn. Two racing confirmations both converge on
//! `Approved` (the transition is idempotent). All operations are CPU-bound
//! string work that completes in microseconds, so a blocking `std` mutex is
//! used rather than an async one.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::payment::{PaymentMethod, PaymentRecord, PaymentStatus};

/// Dependency-injected key-value store for payment records.
///
/// Handlers receive it through application state; tests construct their own
/// instance in isolation.
#[derive(Debug, Default)]
pub struct PaymentLedger {
    records: Mutex<HashMap<String, PaymentRecord>>,
}

/// Result of a confirmation attempt that did not fail.
#[derive(Debug)]
pub struct ConfirmOutcome {
    /// The record after the operation (already cloned out of the ledger)
    pub record: PaymentRecord,

    /// True when the payment was approved before this call; the caller
    /// reports success with an informational message instead of an error.
    pub already_confirmed: bool,
}

impl PaymentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a freshly created record.
    ///
    /// Transaction ids are generated from a v4 UUID per call, so inserts
    /// never collide and never overwrite an existing record.
    pub fn insert(&self, record: PaymentRecord) {
        let mut records = self.records.lock().expect("payment ledger poisoned");
        records.insert(record.transaction_id.clone(), record);
    }

    /// Look up a record by transaction id, cloned out of the store.
    pub fn get(&self, transaction_id: &str) -> Option<PaymentRecord> {
        let records = self.records.lock().expect("payment ledger poisoned");
        records.get(transaction_id).cloned()
    }

    /// Number of tracked transactions.
    pub fn len(&self) -> usize {
        let records = self.records.lock().expect("payment ledger poisoned");
        records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Confirm a PIX payment, transitioning it to `Approved`.
    ///
    /// The whole check-and-transition sequence runs under one lock
    /// acquisition. Checks, in order:
    ///
    /// 1. unknown id → [`AppError::TransactionNotFound`]
    /// 2. caller is neither the owner nor privileged → [`AppError::Forbidden`]
    /// 3. method is not PIX → [`AppError::InvalidRequest`]
    /// 4. past `expires_at` → [`AppError::InvalidRequest`]
    /// 5. already `Approved` → success with `already_confirmed` set, the
    ///    record untouched
    /// 6. otherwise status becomes `Approved` and the message is rewritten
    ///
    /// `now` is passed in rather than read from the clock so expiry is
    /// testable; callers use `Utc::now()`.
    pub fn confirm_pix(
        &self,
        transaction_id: &str,
        caller_email: &str,
        privileged: bool,
        now: DateTime<Utc>,
    ) -> Result<ConfirmOutcome, AppError> {
        let mut records = self.records.lock().expect("payment ledger poisoned");

        let record = records
            .get_mut(transaction_id)
            .ok_or(AppError::TransactionNotFound)?;

        if record.owner_email != caller_email && !privileged {
            return Err(AppError::Forbidden);
        }

        if record.method != PaymentMethod::Pix {
            return Err(AppError::InvalidRequest(
                "Only PIX payments can be confirmed through this endpoint".to_string(),
            ));
        }

        // Invariant: pix data is present whenever the method is PIX
        let pix = record.pix.as_ref().ok_or_else(|| {
            AppError::InvalidRequest("Payment has no PIX data".to_string())
        })?;

        if now > pix.expires_at {
            return Err(AppError::InvalidRequest(
                "PIX payment has expired".to_string(),
            ));
        }

        if record.status == PaymentStatus::Approved {
            return Ok(ConfirmOutcome {
                record: record.clone(),
                already_confirmed: true,
            });
        }

        record.status = PaymentStatus::Approved;
        record.message = "PIX payment confirmed.".to_string();

        Ok(ConfirmOutcome {
            record: record.clone(),
            already_confirmed: false,
        })
    }
}
