//! Partial expense updates
//!
//! A stored expense is edited field by field. Changing only the amount of an
//! expense that has participants re-splits it equally in exact amounts, since
//! the old shares no longer add up. The last participant takes whatever cent
//! rounding leaves over, so the shares always total the new amount.

use crate::{
    error::RejectionReason,
    types::{ExpenseRecord, ParticipantShare, PersonId, SplitType},
    validation::{check_amount, check_description, check_payer, validate_shares},
};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Fields to change on an expense; `None` leaves a field as is
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseUpdate {
    /// New description
    pub description: Option<String>,

    /// New amount
    pub amount: Option<Decimal>,

    /// New payer
    pub paid_by: Option<PersonId>,

    /// Replacement participant list
    pub participants: Option<Vec<ParticipantShare>>,
}

impl ExpenseRecord {
    /// Apply an update, leaving the record untouched if it is rejected
    pub fn apply_update(&mut self, update: ExpenseUpdate) -> Result<(), RejectionReason> {
        if let Some(amount) = update.amount {
            check_amount(amount)?;
        }
        if let Some(description) = &update.description {
            check_description(description)?;
        }
        if let Some(paid_by) = &update.paid_by {
            check_payer(paid_by.as_str())?;
        }

        let amount = update.amount.unwrap_or(self.amount);
        let participants = match update.participants {
            Some(participants) => Some(participants),
            None if amount != self.amount && !self.participants.is_empty() => {
                Some(equal_exact_split(&self.participants, amount))
            }
            None => None,
        };
        if let Some(participants) = &participants {
            validate_shares(participants, amount)?;
        }

        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(paid_by) = update.paid_by {
            self.paid_by = paid_by;
        }
        if let Some(participants) = participants {
            self.participants = participants;
        }
        self.amount = amount;

        Ok(())
    }
}

/// Same people, equal exact shares rounded to cents
///
/// Rounding rests on the last participant. `participants` is never empty.
fn equal_exact_split(participants: &[ParticipantShare], amount: Decimal) -> Vec<ParticipantShare> {
    let count = participants.len();
    let per_person = (amount / Decimal::from(count))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let last_share = amount - per_person * Decimal::from(count - 1);

    tracing::debug!(%amount, %per_person, %last_share, count, "Re-splitting expense equally");

    participants
        .iter()
        .enumerate()
        .map(|(index, p)| {
            let share = if index + 1 == count { last_share } else { per_person };
            ParticipantShare::new(p.name.clone(), SplitType::Exact, share)
        })
        .collect()
}
