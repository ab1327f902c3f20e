//! # ledgertap-ledger
//!
//! The ledger platform seen from the outside: digest retrieval for
//! out-of-band integrity verification, and transactional document commit.
//! Both are single-call wrappers over the managed ledger service — no retry
//! or backoff here; a failed call surfaces to the caller.

pub mod client;
pub mod remote;

pub use client::{Digest, LedgerError, LedgerService, TransactionId};
pub use remote::RemoteLedger;
