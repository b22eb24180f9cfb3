//! Turns what an admin typed into a [`NewPaymentRequest`].
//!
//! This is the caller's side of `create`: phone numbers are validated here,
//! the initiator is appended when they share the bill, and shares are either
//! taken as given or computed with [`split_even`]. The state machine only
//! ever sees fully resolved amounts.

use crate::domain::payment_request::{NewParticipant, NewPaymentRequest, UserRef};
use crate::domain::phone::PhoneNumber;
use crate::domain::split::split_even;
use crate::error::{Result, SplitPayError};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One participant as entered, identity already resolved.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParticipantEntry {
    pub user: UserRef,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub amount: Option<u64>,
}

/// Contact details of the initiator, used when they pay a share too.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactEntry {
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SplitOptions {
    /// Falls back to the engine's configured step.
    #[serde(default)]
    pub round_to: Option<u64>,
    /// Adds the initiator as one more participant taking an equal share.
    #[serde(default)]
    pub include_self: Option<ContactEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RequestDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub total_amount: u64,
    pub created_by: UserRef,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub participants: Vec<ParticipantEntry>,
    /// Even split; without it every participant needs an explicit amount.
    #[serde(default)]
    pub split: Option<SplitOptions>,
}

impl RequestDraft {
    pub fn resolve(self, default_round_to: u64) -> Result<NewPaymentRequest> {
        let mut contacts = self
            .participants
            .into_iter()
            .map(|entry| {
                let phone = PhoneNumber::parse(&entry.phone)?;
                Ok((entry.user, entry.name, phone, entry.amount))
            })
            .collect::<Result<Vec<_>>>()?;

        let amounts = match self.split {
            None => contacts
                .iter()
                .map(|(user, _, _, amount)| {
                    amount.ok_or_else(|| {
                        SplitPayError::ValidationError(format!(
                            "Participant {user} needs an amount or an even split"
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            Some(options) => {
                if contacts.iter().any(|(_, _, _, amount)| amount.is_some()) {
                    return Err(SplitPayError::validation(
                        "Explicit amounts cannot be combined with an even split",
                    ));
                }
                if let Some(me) = options.include_self {
                    let phone = PhoneNumber::parse(&me.phone)?;
                    contacts.push((self.created_by.clone(), me.name, phone, None));
                }
                even_shares(
                    self.total_amount,
                    contacts.len(),
                    options.round_to.unwrap_or(default_round_to),
                )?
            }
        };

        let participants = contacts
            .into_iter()
            .zip(amounts)
            .map(|((user_ref, name, phone, _), amount)| NewParticipant {
                user_ref,
                name,
                phone,
                amount,
            })
            .collect();

        Ok(NewPaymentRequest {
            title: self.title,
            description: self.description,
            total_amount: self.total_amount,
            created_by: self.created_by,
            due_date: self.due_date,
            participants,
        })
    }
}

/// Even shares that always add up to `total`: whatever the allocator could
/// not distribute goes to the first participant.
pub fn even_shares(total: u64, count: usize, round_to: u64) -> Result<Vec<u64>> {
    if count == 0 {
        return Err(SplitPayError::validation(
            "At least one participant is required",
        ));
    }

    let split = split_even(total, count, round_to);
    let mut shares = split.shares();
    shares[0] += split.residual;

    if shares.contains(&0) {
        return Err(SplitPayError::ValidationError(format!(
            "Total {total} is too small to split among {count} participants in steps of {round_to}"
        )));
    }
    Ok(shares)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment_request::PaymentRequest;

    fn entry(user: &str, phone: &str, amount: Option<u64>) -> ParticipantEntry {
        ParticipantEntry {
            user: UserRef::new(user),
            name: user.to_string(),
            phone: phone.to_string(),
            amount,
        }
    }

    fn draft(participants: Vec<ParticipantEntry>, split: Option<SplitOptions>) -> RequestDraft {
        RequestDraft {
            title: "Room rent".to_string(),
            description: None,
            total_amount: 6_000_000,
            created_by: UserRef::new("admin"),
            due_date: None,
            participants,
            split,
        }
    }

    #[test]
    fn test_explicit_amounts_pass_through() {
        let new = draft(
            vec![
                entry("an", "0912345678", Some(4_000_000)),
                entry("binh", "0387654321", Some(2_000_000)),
            ],
            None,
        )
        .resolve(1000)
        .unwrap();

        let amounts: Vec<_> = new.participants.iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![4_000_000, 2_000_000]);
        assert!(PaymentRequest::create(new, Utc::now()).is_ok());
    }

    #[test]
    fn test_missing_amount_without_split() {
        let result = draft(vec![entry("an", "0912345678", None)], None).resolve(1000);
        assert!(matches!(result, Err(SplitPayError::ValidationError(_))));
    }

    #[test]
    fn test_even_split_with_initiator() {
        let options = SplitOptions {
            round_to: None,
            include_self: Some(ContactEntry {
                name: "Admin".to_string(),
                phone: "0977777777".to_string(),
            }),
        };
        let new = draft(
            vec![
                entry("an", "0912345678", None),
                entry("binh", "0387654321", None),
                entry("chi", "0512345678", None),
            ],
            Some(options),
        )
        .resolve(1000)
        .unwrap();

        assert_eq!(new.participants.len(), 4);
        assert_eq!(new.participants[3].user_ref, UserRef::new("admin"));
        assert!(new.participants.iter().all(|p| p.amount == 1_500_000));
    }

    #[test]
    fn test_even_split_residual_goes_to_first() {
        let mut d = draft(
            vec![
                entry("an", "0912345678", None),
                entry("binh", "0387654321", None),
                entry("chi", "0512345678", None),
            ],
            Some(SplitOptions::default()),
        );
        d.total_amount = 100_500;
        let new = d.resolve(1000).unwrap();

        let amounts: Vec<_> = new.participants.iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![34_500, 33_000, 33_000]);
        assert_eq!(amounts.iter().sum::<u64>(), 100_500);
    }

    #[test]
    fn test_split_rejects_mixed_amounts_and_bad_phones() {
        let mixed = draft(
            vec![entry("an", "0912345678", Some(1000))],
            Some(SplitOptions::default()),
        );
        assert!(matches!(
            mixed.resolve(1000),
            Err(SplitPayError::ValidationError(_))
        ));

        let bad_phone = draft(vec![entry("an", "0212345678", Some(6_000_000))], None);
        assert!(matches!(
            bad_phone.resolve(1000),
            Err(SplitPayError::ValidationError(_))
        ));
    }

    #[test]
    fn test_even_shares_too_small() {
        assert!(matches!(
            even_shares(1000, 3, 1000),
            Err(SplitPayError::ValidationError(_))
        ));
        assert_eq!(even_shares(1000, 3, 1).unwrap(), vec![334, 333, 333]);
        assert!(even_shares(1000, 0, 1).is_err());
    }
}
