//! Write-path validation
//!
//! Runs before an expense is stored or mutated. The balance engine trusts its
//! input, so everything it would choke on is rejected here.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. Expense fields: non-blank description, positive amount up to
//!    [`MAX_AMOUNT`], non-blank payer
//! 2. Shape: participants form an array of objects (raw JSON only)
//! 3. Each entry has a non-empty name and a known split type
//! 4. Each share is a non-negative number, unit weights at most [`MAX_UNITS`]
//! 5. Percentages: each and the total at most 100
//! 6. Exact amounts: each and the total at most the expense amount

use crate::{
    error::RejectionReason,
    types::{ExpenseRecord, ParticipantShare, PersonId, SplitType},
};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

type Validation<T> = std::result::Result<T, RejectionReason>;

/// Largest accepted expense amount (10^15)
///
/// Keeps every product the balance fold forms, amount times percentage or
/// unit weight, inside `Decimal` range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Largest accepted unit weight (10^12)
pub const MAX_UNITS: Decimal = Decimal::from_parts(0xD4A5_1000, 0x0000_00E8, 0, false, 0);

/// Validate participant shares against the expense amount
pub fn validate_shares(participants: &[ParticipantShare], amount: Decimal) -> Validation<()> {
    check_amount_range(amount)?;

    for (index, participant) in participants.iter().enumerate() {
        if participant.name.is_blank() {
            return Err(RejectionReason::EmptyParticipantName { index });
        }
        if participant.share < Decimal::ZERO {
            return Err(RejectionReason::NegativeShare {
                name: participant.name.to_string(),
                share: participant.share,
            });
        }
        if participant.split_type == SplitType::Units && participant.share > MAX_UNITS {
            return Err(RejectionReason::ShareTooLarge {
                name: participant.name.to_string(),
                share: participant.share,
                max: MAX_UNITS,
            });
        }
    }

    let mut percentage_total = Decimal::ZERO;
    for participant in participants.iter().filter(|p| p.split_type == SplitType::Percentage) {
        if participant.share > Decimal::ONE_HUNDRED {
            return Err(RejectionReason::PercentageOutOfRange {
                name: participant.name.to_string(),
                share: participant.share,
            });
        }
        percentage_total += participant.share;
    }
    if percentage_total > Decimal::ONE_HUNDRED {
        return Err(RejectionReason::PercentageTotalExceeded {
            total: percentage_total,
        });
    }

    let mut exact_total = Decimal::ZERO;
    for participant in participants.iter().filter(|p| p.split_type == SplitType::Exact) {
        if participant.share > amount {
            return Err(RejectionReason::ExactShareExceedsAmount {
                name: participant.name.to_string(),
                share: participant.share,
                amount,
            });
        }
        exact_total += participant.share;
    }
    if exact_total > amount {
        return Err(RejectionReason::ExactTotalExceedsAmount {
            total: exact_total,
            amount,
        });
    }

    Ok(())
}

/// Validate a whole expense before it is stored
pub fn validate_expense(expense: &ExpenseRecord) -> Validation<()> {
    check_description(&expense.description)?;
    check_amount(expense.amount)?;
    check_payer(expense.paid_by.as_str())?;
    validate_shares(&expense.participants, expense.amount)
}

pub(crate) fn check_description(description: &str) -> Validation<()> {
    if description.trim().is_empty() {
        return Err(RejectionReason::EmptyDescription);
    }
    Ok(())
}

pub(crate) fn check_amount(amount: Decimal) -> Validation<()> {
    if amount <= Decimal::ZERO {
        return Err(RejectionReason::NonPositiveAmount(amount));
    }
    check_amount_range(amount)
}

pub(crate) fn check_payer(paid_by: &str) -> Validation<()> {
    if paid_by.trim().is_empty() {
        return Err(RejectionReason::EmptyPayer);
    }
    Ok(())
}

fn check_amount_range(amount: Decimal) -> Validation<()> {
    if amount > MAX_AMOUNT {
        return Err(RejectionReason::AmountTooLarge {
            amount,
            max: MAX_AMOUNT,
        });
    }
    Ok(())
}

/// Shape-check an untyped participant list
///
/// `null` (or an absent field) is an empty list. Numeric checks are left to
/// [`validate_shares`].
pub fn parse_participants(value: &Value) -> Validation<Vec<ParticipantShare>> {
    let entries = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(entries) => entries,
        _ => return Err(RejectionReason::ParticipantsNotArray),
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_participant(index, entry))
        .collect()
}

fn parse_participant(index: usize, entry: &Value) -> Validation<ParticipantShare> {
    let fields = entry
        .as_object()
        .ok_or(RejectionReason::ParticipantNotObject { index })?;

    let name = fields
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.trim().is_empty())
        .ok_or(RejectionReason::EmptyParticipantName { index })?;

    let split_type = match fields.get("type").or_else(|| fields.get("splitType")) {
        None | Some(Value::Null) => SplitType::default(),
        Some(Value::String(tag)) => {
            SplitType::from_tag(tag).ok_or_else(|| RejectionReason::UnknownSplitType {
                index,
                tag: tag.clone(),
            })?
        }
        Some(other) => {
            return Err(RejectionReason::UnknownSplitType {
                index,
                tag: other.to_string(),
            })
        }
    };

    let share = fields
        .get("share")
        .and_then(decimal_from_json)
        .ok_or(RejectionReason::ShareNotNumber { index })?;

    Ok(ParticipantShare::new(PersonId::new(name), split_type, share))
}

/// Shape-check and fully validate an untyped expense object
///
/// The expense's own fields are checked before anything in the participant
/// list.
pub fn parse_expense(value: &Value) -> Validation<ExpenseRecord> {
    let description = value
        .get("description")
        .and_then(Value::as_str)
        .ok_or(RejectionReason::EmptyDescription)?;
    check_description(description)?;

    let amount = value
        .get("amount")
        .and_then(decimal_from_json)
        .ok_or(RejectionReason::AmountNotNumber)?;
    check_amount(amount)?;

    let paid_by = value
        .get("paidBy")
        .and_then(Value::as_str)
        .ok_or(RejectionReason::EmptyPayer)?;
    check_payer(paid_by)?;

    let participants = parse_participants(value.get("participants").unwrap_or(&Value::Null))?;
    validate_shares(&participants, amount)?;

    Ok(ExpenseRecord::new(description, amount, paid_by).with_participants(participants))
}

/// JSON number as an exact decimal
fn decimal_from_json(value: &Value) -> Option<Decimal> {
    let Value::Number(number) = value else {
        return None;
    };
    if let Some(int) = number.as_i64() {
        return Some(Decimal::from(int));
    }
    if let Some(uint) = number.as_u64() {
        return Some(Decimal::from(uint));
    }
    // f64 Display is the shortest round-trip form, so 0.1 stays 0.1
    number
        .as_f64()
        .and_then(|float| Decimal::from_str(&float.to_string()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn share(name: &str, split_type: SplitType, share: Decimal) -> ParticipantShare {
        ParticipantShare::new(name, split_type, share)
    }

    #[test]
    fn test_valid_mixed_shares() {
        let participants = vec![
            share("B", SplitType::Percentage, dec!(25)),
            share("C", SplitType::Exact, dec!(30)),
            share("D", SplitType::Units, dec!(2)),
        ];
        assert!(validate_shares(&participants, dec!(100)).is_ok());
        assert!(validate_shares(&[], dec!(100)).is_ok());
    }

    #[test]
    fn test_exact_share_above_amount_rejected() {
        let participants = vec![share("B", SplitType::Exact, dec!(150))];

        let result = validate_shares(&participants, dec!(100));
        assert_eq!(
            result,
            Err(RejectionReason::ExactShareExceedsAmount {
                name: "B".to_string(),
                share: dec!(150),
                amount: dec!(100),
            })
        );
    }

    #[test]
    fn test_exact_total_above_amount_rejected() {
        let participants = vec![
            share("B", SplitType::Exact, dec!(60)),
            share("C", SplitType::Exact, dec!(60)),
        ];

        let result = validate_shares(&participants, dec!(100));
        assert!(matches!(
            result,
            Err(RejectionReason::ExactTotalExceedsAmount { total, .. }) if total == dec!(120)
        ));
    }

    #[test]
    fn test_percentage_limits() {
        let single = vec![share("B", SplitType::Percentage, dec!(100.5))];
        assert!(matches!(
            validate_shares(&single, dec!(10)),
            Err(RejectionReason::PercentageOutOfRange { .. })
        ));

        let total = vec![
            share("B", SplitType::Percentage, dec!(60)),
            share("C", SplitType::Percentage, dec!(41)),
        ];
        assert!(matches!(
            validate_shares(&total, dec!(10)),
            Err(RejectionReason::PercentageTotalExceeded { .. })
        ));

        let full = vec![
            share("B", SplitType::Percentage, dec!(60)),
            share("C", SplitType::Percentage, dec!(40)),
        ];
        assert!(validate_shares(&full, dec!(10)).is_ok());
    }

    #[test]
    fn test_negative_share_rejected_before_totals() {
        let participants = vec![
            share("B", SplitType::Exact, dec!(500)),
            share("C", SplitType::Units, dec!(-1)),
        ];
        assert!(matches!(
            validate_shares(&participants, dec!(100)),
            Err(RejectionReason::NegativeShare { ref name, .. }) if name == "C"
        ));
    }

    #[test]
    fn test_units_zero_share_allowed() {
        let participants = vec![share("B", SplitType::Units, Decimal::ZERO)];
        assert!(validate_shares(&participants, dec!(100)).is_ok());
    }

    #[test]
    fn test_validate_expense_fields() {
        let ok = ExpenseRecord::new("Lunch", dec!(10), "A");
        assert!(validate_expense(&ok).is_ok());

        let blank = ExpenseRecord::new("  ", dec!(10), "A");
        assert_eq!(validate_expense(&blank), Err(RejectionReason::EmptyDescription));

        let zero = ExpenseRecord::new("Lunch", Decimal::ZERO, "A");
        assert_eq!(
            validate_expense(&zero),
            Err(RejectionReason::NonPositiveAmount(Decimal::ZERO))
        );

        let no_payer = ExpenseRecord::new("Lunch", dec!(10), "");
        assert_eq!(validate_expense(&no_payer), Err(RejectionReason::EmptyPayer));
    }

    #[test]
    fn test_parse_participants_shape() {
        assert_eq!(parse_participants(&Value::Null), Ok(vec![]));
        assert_eq!(
            parse_participants(&json!({"name": "B"})),
            Err(RejectionReason::ParticipantsNotArray)
        );
        assert_eq!(
            parse_participants(&json!(["B"])),
            Err(RejectionReason::ParticipantNotObject { index: 0 })
        );
        assert_eq!(
            parse_participants(&json!([{"name": "B", "share": 1}, {"name": " ", "share": 1}])),
            Err(RejectionReason::EmptyParticipantName { index: 1 })
        );
        assert_eq!(
            parse_participants(&json!([{"name": 7, "share": 1}])),
            Err(RejectionReason::EmptyParticipantName { index: 0 })
        );
        assert_eq!(
            parse_participants(&json!([{"name": "B", "share": 1, "type": "equal"}])),
            Err(RejectionReason::UnknownSplitType {
                index: 0,
                tag: "equal".to_string()
            })
        );
        assert_eq!(
            parse_participants(&json!([{"name": "B", "share": "10"}])),
            Err(RejectionReason::ShareNotNumber { index: 0 })
        );
    }

    #[test]
    fn test_parse_participants_values() {
        let parsed = parse_participants(&json!([
            {"name": "B", "share": 60, "type": "percentage"},
            {"name": "C", "share": 12.25},
            {"name": "D", "share": 2, "splitType": "Units"}
        ]))
        .unwrap();

        assert_eq!(parsed[0], share("B", SplitType::Percentage, dec!(60)));
        assert_eq!(parsed[1], share("C", SplitType::Exact, dec!(12.25)));
        assert_eq!(parsed[2], share("D", SplitType::Units, dec!(2)));
    }

    #[test]
    fn test_parse_expense() {
        let expense = parse_expense(&json!({
            "description": "Hotel",
            "amount": 100,
            "paidBy": "A",
            "participants": [{"name": "B", "share": 150, "type": "exact"}]
        }));
        assert!(matches!(
            expense,
            Err(RejectionReason::ExactShareExceedsAmount { .. })
        ));

        let expense = parse_expense(&json!({"description": "Hotel", "amount": -5, "paidBy": "A"}));
        assert_eq!(expense, Err(RejectionReason::NonPositiveAmount(dec!(-5))));

        let expense = parse_expense(&json!({"description": "Hotel", "paidBy": "A"}));
        assert_eq!(expense, Err(RejectionReason::AmountNotNumber));

        let expense = parse_expense(&json!({"description": "Hotel", "amount": 90, "paidBy": "A"})).unwrap();
        assert!(expense.participants.is_empty());
    }

    #[test]
    fn test_parse_expense_checks_fields_before_participants() {
        let expense = parse_expense(&json!({
            "description": " ",
            "amount": 10,
            "paidBy": "A",
            "participants": "everyone"
        }));
        assert_eq!(expense, Err(RejectionReason::EmptyDescription));

        let expense = parse_expense(&json!({
            "description": "Taxi",
            "amount": 10,
            "paidBy": "",
            "participants": [{"name": "", "share": 1}]
        }));
        assert_eq!(expense, Err(RejectionReason::EmptyPayer));

        let expense = parse_expense(&json!({
            "description": "Taxi",
            "amount": 0,
            "paidBy": "A",
            "participants": [7]
        }));
        assert_eq!(expense, Err(RejectionReason::NonPositiveAmount(Decimal::ZERO)));
    }

    #[test]
    fn test_amount_limit() {
        let at_limit = ExpenseRecord::new("Yacht", MAX_AMOUNT, "A")
            .with_participants(vec![share("B", SplitType::Percentage, dec!(100))]);
        assert!(validate_expense(&at_limit).is_ok());

        let over = ExpenseRecord::new("Yacht", MAX_AMOUNT + dec!(0.01), "A");
        assert_eq!(
            validate_expense(&over),
            Err(RejectionReason::AmountTooLarge {
                amount: MAX_AMOUNT + dec!(0.01),
                max: MAX_AMOUNT,
            })
        );

        let expense = parse_expense(&json!({
            "description": "Yacht",
            "amount": 1e27,
            "paidBy": "A",
            "participants": [{"name": "B", "share": 100, "type": "percentage"}]
        }));
        assert!(matches!(expense, Err(RejectionReason::AmountTooLarge { .. })));
    }

    #[test]
    fn test_unit_weight_limit() {
        let participants = vec![
            share("B", SplitType::Units, MAX_UNITS),
            share("C", SplitType::Units, dec!(1)),
        ];
        assert!(validate_shares(&participants, MAX_AMOUNT).is_ok());

        let participants = vec![share("B", SplitType::Units, MAX_UNITS + dec!(1))];
        assert!(matches!(
            validate_shares(&participants, dec!(10)),
            Err(RejectionReason::ShareTooLarge { ref name, .. }) if name == "B"
        ));
    }
}
