//! Duplicate and casing anomaly detection.

use super::{AccountRecord, LoginStats};
use std::collections::HashSet;

/// Scan accounts in order and count duplicate and "mixed cased" entries.
///
/// An account is a duplicate when its lower-cased email, or failing that its
/// lower-cased login, was already seen on an earlier account. A record whose
/// email collides is counted once and its login is not recorded.
///
/// The mixed-case count increments when the email *or* the login is already
/// entirely lower case. This inverted-looking predicate matches the values
/// existing dashboards were built against and is kept as is.
pub fn detect(accounts: &[AccountRecord]) -> LoginStats {
    let mut stats = LoginStats::default();
    let mut emails: HashSet<String> = HashSet::with_capacity(accounts.len());
    let mut logins: HashSet<String> = HashSet::with_capacity(accounts.len());

    for account in accounts {
        let email_lower = fold_case(&account.email);
        let login_lower = fold_case(&account.login);

        if email_lower == account.email || login_lower == account.login {
            stats.mixed_cased_users += 1;
        }

        if !emails.insert(email_lower) {
            stats.duplicate_user_entries += 1;
            continue;
        }

        if !logins.insert(login_lower) {
            stats.duplicate_user_entries += 1;
        }
    }

    stats
}

/// Lower-case one character at a time, without context rules.
///
/// Final sigma folds to `σ` like any other sigma, and `İ` folds to a plain
/// `i` rather than `i` plus a combining dot.
fn fold_case(s: &str) -> String {
    s.chars()
        .flat_map(|c| {
            let lower = if c == '\u{130}' { 'i' } else { c };
            lower.to_lowercase()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accounts(pairs: &[(&str, &str)]) -> Vec<AccountRecord> {
        pairs
            .iter()
            .map(|(login, email)| AccountRecord::new(*login, *email))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(detect(&[]), LoginStats::default());
    }

    #[test]
    fn test_distinct_accounts_have_no_duplicates() {
        let stats = detect(&accounts(&[
            ("alice", "alice@x.com"),
            ("Bob", "Bob@X.com"),
            ("carol", "carol@y.org"),
            ("DAVE", "dave@y.org"),
        ]));
        assert_eq!(stats.duplicate_user_entries, 0);
        assert!(!stats.has_duplicate_user_entries());
    }

    #[test]
    fn test_shared_email_counts_once() {
        let stats = detect(&accounts(&[
            ("alice", "shared@x.com"),
            ("alice2", "SHARED@x.com"),
            ("carol", "carol@x.com"),
        ]));
        assert_eq!(stats.duplicate_user_entries, 1);
        assert!(stats.has_duplicate_user_entries());
    }

    #[test]
    fn test_login_collision_ignores_case() {
        let stats = detect(&accounts(&[("bob", "b@x.com"), ("BOB", "other@x.com")]));
        assert_eq!(stats.duplicate_user_entries, 1);
    }

    #[test]
    fn test_email_collision_skips_login_bookkeeping() {
        // The second record collides on email, so its login "eve" is never
        // recorded and the third record's login does not collide.
        let stats = detect(&accounts(&[
            ("mallory", "m@x.com"),
            ("eve", "M@x.com"),
            ("Eve", "eve@x.com"),
        ]));
        assert_eq!(stats.duplicate_user_entries, 1);
    }

    #[test]
    fn test_record_colliding_on_both_fields_counts_once() {
        let stats = detect(&accounts(&[("bob", "bob@x.com"), ("Bob", "BOB@x.com")]));
        assert_eq!(stats.duplicate_user_entries, 1);
    }

    #[test]
    fn test_each_repeat_is_counted() {
        let stats = detect(&accounts(&[
            ("a", "same@x.com"),
            ("b", "same@x.com"),
            ("c", "same@x.com"),
        ]));
        assert_eq!(stats.duplicate_user_entries, 2);
    }

    #[test]
    fn test_mixed_case_rule_counts_lowercase_fields() {
        let stats = detect(&accounts(&[("Alice", "alice@x.com")]));
        assert_eq!(stats.mixed_cased_users, 1);
        assert_eq!(stats.duplicate_user_entries, 0);
    }

    #[test]
    fn test_mixed_case_rule_skips_fully_uppercased_record() {
        let stats = detect(&accounts(&[("Alice", "Alice@X.com")]));
        assert_eq!(stats.mixed_cased_users, 0);
    }

    #[test]
    fn test_mixed_case_rule_counts_record_once() {
        let stats = detect(&accounts(&[("alice", "alice@x.com"), ("Bob", "bob@x.com")]));
        assert_eq!(stats.mixed_cased_users, 2);
    }

    #[test]
    fn test_unicode_case_folding() {
        let stats = detect(&accounts(&[("ÉLODIE", "e@x.com"), ("élodie", "f@x.com")]));
        assert_eq!(stats.duplicate_user_entries, 1);
    }

    #[test]
    fn test_final_sigma_folds_like_any_sigma() {
        let stats = detect(&accounts(&[("a", "ΟΔΟΣ@x.gr"), ("b", "οδοσ@x.gr")]));
        assert_eq!(stats.duplicate_user_entries, 1);
    }

    #[test]
    fn test_dotted_capital_i_folds_to_plain_i() {
        let stats = detect(&accounts(&[("İsmail", "a@x.com"), ("ismail", "b@x.com")]));
        assert_eq!(stats.duplicate_user_entries, 1);
        assert_eq!(fold_case("İ"), "i");
    }

    #[test]
    fn test_flag_tracks_count() {
        let inputs = [
            accounts(&[]),
            accounts(&[("a", "a@x.com")]),
            accounts(&[("a", "a@x.com"), ("A", "b@x.com")]),
            accounts(&[("a", "a@x.com"), ("b", "A@x.com"), ("B", "c@x.com")]),
        ];
        for input in &inputs {
            let stats = detect(input);
            assert_eq!(
                stats.has_duplicate_user_entries(),
                stats.duplicate_user_entries > 0
            );
        }
    }

    #[test]
    fn test_deterministic_for_same_order() {
        let input = accounts(&[("x", "X@x.com"), ("X", "y@x.com"), ("z", "x@x.com")]);
        assert_eq!(detect(&input), detect(&input));
    }
}
