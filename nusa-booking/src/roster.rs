//! Traveler slots derived from adult/child counts.

use nusa_core::ValidationError;
use std::iter;

use crate::models::{TravelerDetail, TravelerType};

/// Rebuilds the roster for new counts.
///
/// Adults come first, then children. Existing entries of each type are kept
/// in order up to the new count; missing slots are blank; surplus slots are
/// dropped.
pub fn build_roster(
    previous: &[TravelerDetail],
    adult_count: u32,
    child_count: u32,
) -> Vec<TravelerDetail> {
    let adults = slots(previous, TravelerType::Adult, adult_count);
    let children = slots(previous, TravelerType::Child, child_count);
    adults.chain(children).collect()
}

fn slots(
    previous: &[TravelerDetail],
    traveler_type: TravelerType,
    count: u32,
) -> impl Iterator<Item = TravelerDetail> + '_ {
    previous
        .iter()
        .filter(move |t| t.traveler_type == traveler_type)
        .cloned()
        .chain(iter::repeat_with(move || TravelerDetail::blank(traveler_type)))
        .take(count as usize)
}

/// Checks a submitted roster against the declared counts.
pub fn validate_roster(
    travelers: &[TravelerDetail],
    adult_count: u32,
    child_count: u32,
) -> Result<(), ValidationError> {
    let expected = adult_count + child_count;
    if travelers.len() != expected as usize {
        return Err(ValidationError::RosterLength {
            expected,
            actual: u32::try_from(travelers.len()).unwrap_or(u32::MAX),
        });
    }

    for (index, traveler) in travelers.iter().enumerate() {
        let expected_type = if index < adult_count as usize {
            TravelerType::Adult
        } else {
            TravelerType::Child
        };
        if traveler.traveler_type != expected_type {
            return Err(ValidationError::TravelerTypeMismatch { index });
        }
        if traveler.full_name.is_blank() {
            return Err(ValidationError::MissingTravelerName { index });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn names(roster: &[TravelerDetail]) -> Vec<(TravelerType, &str)> {
        roster.iter().map(|t| (t.traveler_type, t.full_name.as_str())).collect()
    }

    #[test]
    fn test_grow_then_shrink_adults() {
        let start = vec![TravelerDetail::adult("Ana")];

        let grown = build_roster(&start, 2, 0);
        assert_eq!(names(&grown), vec![(TravelerType::Adult, "Ana"), (TravelerType::Adult, "")]);
        assert_eq!(grown[1].title, "Mr");

        let shrunk = build_roster(&grown, 1, 0);
        assert_eq!(shrunk, start);
    }

    #[test]
    fn test_children_follow_adults() {
        let start = vec![
            TravelerDetail::adult("Ana"),
            TravelerDetail::child("Citra", Some(7)),
        ];

        let roster = build_roster(&start, 2, 2);
        assert_eq!(
            names(&roster),
            vec![
                (TravelerType::Adult, "Ana"),
                (TravelerType::Adult, ""),
                (TravelerType::Child, "Citra"),
                (TravelerType::Child, ""),
            ]
        );
        assert_eq!(roster[2].age, Some(7));
    }

    #[test]
    fn test_removed_slots_are_discarded() {
        let start = vec![
            TravelerDetail::adult("Ana"),
            TravelerDetail::adult("Budi"),
            TravelerDetail::child("Citra", None),
        ];

        let roster = build_roster(&start, 1, 0);
        assert_eq!(names(&roster), vec![(TravelerType::Adult, "Ana")]);

        // Budi does not come back: shrinking discards
        let regrown = build_roster(&roster, 2, 0);
        assert_eq!(regrown[1].full_name.as_str(), "");
    }

    #[test]
    fn test_validate_roster() {
        let roster = vec![TravelerDetail::adult("Ana"), TravelerDetail::child("Citra", Some(7))];
        assert!(validate_roster(&roster, 1, 1).is_ok());

        assert_eq!(
            validate_roster(&roster, 2, 1),
            Err(ValidationError::RosterLength { expected: 3, actual: 2 })
        );
        assert_eq!(
            validate_roster(&roster, 2, 0),
            Err(ValidationError::TravelerTypeMismatch { index: 1 })
        );

        let unnamed = build_roster(&roster, 2, 1);
        assert_eq!(
            validate_roster(&unnamed, 2, 1),
            Err(ValidationError::MissingTravelerName { index: 1 })
        );

        let whitespace = vec![TravelerDetail::adult("   ")];
        assert_eq!(
            validate_roster(&whitespace, 1, 0),
            Err(ValidationError::MissingTravelerName { index: 0 })
        );
    }

    fn traveler_strategy() -> impl Strategy<Value = TravelerDetail> {
        (any::<bool>(), "[A-Za-z ]{0,12}").prop_map(|(adult, name)| {
            if adult {
                TravelerDetail::adult(&name)
            } else {
                TravelerDetail::child(&name, None)
            }
        })
    }

    proptest! {
        #[test]
        fn prop_roster_shape(
            previous in proptest::collection::vec(traveler_strategy(), 0..8),
            adults in 0u32..8,
            children in 0u32..8,
        ) {
            let roster = build_roster(&previous, adults, children);

            prop_assert_eq!(roster.len(), (adults + children) as usize);
            for (i, traveler) in roster.iter().enumerate() {
                let expected = if i < adults as usize { TravelerType::Adult } else { TravelerType::Child };
                prop_assert_eq!(traveler.traveler_type, expected);
            }

            // deterministic
            prop_assert_eq!(&roster, &build_roster(&previous, adults, children));

            // carried-over adults keep their data
            let previous_adults: Vec<_> = previous.iter().filter(|t| t.traveler_type == TravelerType::Adult).collect();
            for (i, kept) in previous_adults.iter().take(adults as usize).enumerate() {
                prop_assert_eq!(&roster[i], *kept);
            }
        }
    }
}
