//! Error types for the expense ledger

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Error, Debug)]
pub enum Error {
    /// Expense or share rejected by validation
    #[error("Validation error: {0}")]
    Validation(#[from] RejectionReason),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why an expense or its participant list was rejected.
///
/// Variants appear in the order the validator checks them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// Description missing or blank
    #[error("Description cannot be empty")]
    EmptyDescription,

    /// Amount is zero or negative
    #[error("Amount must be a positive number, got {0}")]
    NonPositiveAmount(Decimal),

    /// Amount above the largest value the balance fold can carry
    #[error("Amount {amount} exceeds the maximum of {max}")]
    AmountTooLarge {
        /// Offending amount
        amount: Decimal,
        /// Largest accepted amount
        max: Decimal,
    },

    /// Amount missing or not a number
    #[error("Amount must be a number")]
    AmountNotNumber,

    /// Payer missing or blank
    #[error("PaidBy cannot be empty")]
    EmptyPayer,

    /// Participants is not a JSON array
    #[error("Participants must be an array")]
    ParticipantsNotArray,

    /// Participant entry is not an object
    #[error("Participant {index} must be an object")]
    ParticipantNotObject {
        /// Position in the participant list
        index: usize,
    },

    /// Participant name missing, not a string, or blank
    #[error("Participant {index} must have a non-empty name")]
    EmptyParticipantName {
        /// Position in the participant list
        index: usize,
    },

    /// Split tag outside the known set
    #[error("Participant {index} has unknown split type {tag:?}")]
    UnknownSplitType {
        /// Position in the participant list
        index: usize,
        /// The tag as received
        tag: String,
    },

    /// Share missing or not a number
    #[error("Participant {index} must have a numeric share")]
    ShareNotNumber {
        /// Position in the participant list
        index: usize,
    },

    /// Share below zero
    #[error("Participant {name} has negative share {share}")]
    NegativeShare {
        /// Participant name
        name: String,
        /// Offending share
        share: Decimal,
    },

    /// Share above the largest accepted weight
    #[error("Participant {name} has share {share} above the maximum of {max}")]
    ShareTooLarge {
        /// Participant name
        name: String,
        /// Offending share
        share: Decimal,
        /// Largest accepted share
        max: Decimal,
    },

    /// Single percentage share above 100
    #[error("Participant {name} has percentage {share} above 100")]
    PercentageOutOfRange {
        /// Participant name
        name: String,
        /// Offending share
        share: Decimal,
    },

    /// Percentages in one expense add up to more than 100
    #[error("Percentage shares total {total}, which exceeds 100")]
    PercentageTotalExceeded {
        /// Sum of all percentage shares
        total: Decimal,
    },

    /// Single exact share above the expense amount
    #[error("Participant {name} has exact share {share} above amount {amount}")]
    ExactShareExceedsAmount {
        /// Participant name
        name: String,
        /// Offending share
        share: Decimal,
        /// Expense amount
        amount: Decimal,
    },

    /// Exact shares in one expense add up to more than the amount
    #[error("Exact shares total {total}, which exceeds amount {amount}")]
    ExactTotalExceedsAmount {
        /// Sum of all exact shares
        total: Decimal,
        /// Expense amount
        amount: Decimal,
    },
}
