//! Property-based tests for input parsing.
//!
//! Invariants tested:
//! - Every base-10 digit string within range parses to its value
//! - Anything containing a non-digit is rejected
//! - Account parsing trims and never accepts blank input

use proptest::prelude::*;
use records_client::{Account, ErrorKind, PatientId};

proptest! {
    #[test]
    fn prop_digit_strings_parse_to_their_value(id in any::<u64>(), pad in 0usize..3) {
        let raw = format!("{}{id}{}", " ".repeat(pad), " ".repeat(pad));
        prop_assert_eq!(PatientId::parse(&raw).unwrap().get(), id);
    }

    #[test]
    fn prop_non_digit_input_is_rejected(raw in "[0-9]{0,4}[^0-9\\s][0-9a-z]{0,4}") {
        let err = PatientId::parse(&raw).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn prop_blank_accounts_are_rejected(raw in "\\s{0,6}") {
        prop_assert!(Account::parse(&raw).is_err());
    }

    #[test]
    fn prop_account_parse_trims(core in "G[A-Z0-9]{1,20}", pad in 0usize..4) {
        let raw = format!("{}{core}{}", " ".repeat(pad), "\t".repeat(pad));
        let account = Account::parse(&raw).unwrap();
        prop_assert_eq!(account.as_str(), core.as_str());
    }
}
