//! Tally - A plain text double-entry ledger parser and evaluator
//! ---
//!
//! A ledger file is a sequence of dated transactions, each moving amounts
//! between two or more accounts:
//!
//! ```text
//! 2016/01/01 Coffee
//!   Expenses:Coffee  5 USD
//!   Assets:Cash
//! ```
//!
//! [`parse`] turns the text into [`Statement`]s, and a [`LedgerState`] folds
//! them, one by one in file order, into balanced
//! [`EvaluatedTransaction`]s where every elided amount has been inferred.
//! Presentation and file loading are left to the client code.

extern crate pest;
#[macro_use]
extern crate pest_derive;

/// Account paths, e.g. `Assets:Bank:Jawir`.
pub mod account;

/// Commodities and exact decimal amounts.
pub mod amount;

pub mod error;

/// Running balances and the statement fold.
pub mod ledger;

/// Our main parser entrypoints.
pub mod parser;

pub mod statement;
pub mod transaction;

pub use account::Account;
pub use amount::{Amount, Commodity};
pub use error::{CommodityMismatch, ErrorKind, EvaluationError, ParseError};
pub use ledger::LedgerState;
pub use parser::{evaluate, parse};
pub use statement::Statement;
pub use transaction::{
    EvaluatedPosting, EvaluatedTransaction, Posting, Transaction, TransactionState,
};
