//! Core types for the expense ledger
//!
//! All types are designed for:
//! - Exact arithmetic (Decimal for money)
//! - Wire compatibility with the expense store (camelCase JSON, numeric amounts)
//! - Per-computation lifetime (nothing here is cached between calls)

use indexmap::IndexMap;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Person identifier (display name as entered by users)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(String);

impl PersonId {
    /// Create new person ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the name has no visible characters
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PersonId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PersonId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// How a participant's share of an expense is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    /// Share is a percentage (0-100) of the expense amount
    #[serde(alias = "Percentage")]
    Percentage,
    /// Share is an absolute amount
    #[default]
    #[serde(alias = "Exact")]
    Exact,
    /// Share is a relative weight among the expense's unit participants
    #[serde(rename = "share", alias = "units", alias = "Units")]
    Units,
}

impl SplitType {
    /// Wire tag as stored by the expense store
    pub fn tag(&self) -> &'static str {
        match self {
            SplitType::Percentage => "percentage",
            SplitType::Exact => "exact",
            SplitType::Units => "share",
        }
    }

    /// Parse from a wire tag
    ///
    /// Accepts the same tags as deserialization: the lowercase tag, its
    /// capitalized form, and `units` for `share`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "percentage" | "Percentage" => Some(SplitType::Percentage),
            "exact" | "Exact" => Some(SplitType::Exact),
            "share" | "units" | "Units" => Some(SplitType::Units),
            _ => None,
        }
    }
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// One person's part of an expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantShare {
    /// Who owes
    pub name: PersonId,

    /// Meaning of `share`
    #[serde(rename = "type", alias = "splitType", default)]
    pub split_type: SplitType,

    /// Percentage, exact amount or unit weight depending on `split_type`
    pub share: Decimal,
}

impl ParticipantShare {
    /// Create new participant share
    pub fn new(name: impl Into<PersonId>, split_type: SplitType, share: Decimal) -> Self {
        Self {
            name: name.into(),
            split_type,
            share,
        }
    }
}

/// An expense as supplied by the expense store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    /// Display text, not used in computation
    pub description: String,

    /// Total cost (positive)
    pub amount: Decimal,

    /// Who fronted the money
    pub paid_by: PersonId,

    /// Who owes what; empty means an equal split across everyone
    #[serde(default)]
    pub participants: Vec<ParticipantShare>,
}

impl ExpenseRecord {
    /// Create an expense with no explicit participants
    pub fn new(description: impl Into<String>, amount: Decimal, paid_by: impl Into<PersonId>) -> Self {
        Self {
            description: description.into(),
            amount,
            paid_by: paid_by.into(),
            participants: Vec::new(),
        }
    }

    /// Replace the participant list
    pub fn with_participants(mut self, participants: Vec<ParticipantShare>) -> Self {
        self.participants = participants;
        self
    }

    /// Sum of shares of one split type
    pub fn share_total(&self, split_type: SplitType) -> Decimal {
        self.participants
            .iter()
            .filter(|p| p.split_type == split_type)
            .map(|p| p.share)
            .sum()
    }
}

/// Net position per person (positive = owed money, negative = owes money)
///
/// Keys keep the order in which they were first touched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceMap(IndexMap<PersonId, Decimal>);

impl BalanceMap {
    /// Create empty balance map
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Balance slot for a person, inserted at zero on first touch
    pub fn entry(&mut self, person: &PersonId) -> &mut Decimal {
        self.0.entry(person.clone()).or_insert(Decimal::ZERO)
    }

    /// Increase a person's balance
    pub fn credit(&mut self, person: &PersonId, amount: Decimal) {
        *self.entry(person) += amount;
    }

    /// Decrease a person's balance
    pub fn debit(&mut self, person: &PersonId, amount: Decimal) {
        *self.entry(person) -= amount;
    }

    /// Balance of a person (zero when absent)
    pub fn get(&self, person: &PersonId) -> Decimal {
        self.0.get(person).copied().unwrap_or(Decimal::ZERO)
    }

    /// True if the person has been touched
    pub fn contains(&self, person: &PersonId) -> bool {
        self.0.contains_key(person)
    }

    /// Number of people
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no one has a balance
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in first-touch order
    pub fn iter(&self) -> impl Iterator<Item = (&PersonId, Decimal)> + '_ {
        self.0.iter().map(|(person, balance)| (person, *balance))
    }

    /// Sum of all balances (zero for a fully allocated ledger)
    pub fn total(&self) -> Decimal {
        self.0.values().copied().sum()
    }

    /// Number of people whose balance is not within `epsilon` of zero
    pub fn nonzero_count(&self, epsilon: Decimal) -> usize {
        self.0.values().filter(|b| b.abs() >= epsilon).count()
    }

    /// True if every balance is within `epsilon` of zero
    pub fn is_settled(&self, epsilon: Decimal) -> bool {
        self.nonzero_count(epsilon) == 0
    }

    /// Display copy rounded to `scale` decimal places
    pub fn rounded(&self, scale: u32) -> Self {
        Self(
            self.0
                .iter()
                .map(|(person, balance)| {
                    (
                        person.clone(),
                        balance.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero),
                    )
                })
                .collect(),
        )
    }
}

impl FromIterator<(PersonId, Decimal)> for BalanceMap {
    /// Repeated people accumulate
    fn from_iter<I: IntoIterator<Item = (PersonId, Decimal)>>(iter: I) -> Self {
        let mut balances = BalanceMap::new();
        for (person, amount) in iter {
            balances.credit(&person, amount);
        }
        balances
    }
}
