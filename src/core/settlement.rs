//! Settlement engine
//!
//! Pure functions that turn a group's members and expenses into net balances
//! and a list of transfers that settles every balance.
//!
//! # Algorithm
//!
//! 1. Sum what each member paid (members without expenses paid `0`).
//! 2. Split the total evenly: `share = total / member_count`.
//! 3. Net balance per member is `paid - share`. Positive balances are owed
//!    money (creditors), negative balances owe money (debtors).
//! 4. Greedily pair the largest debtor with the largest creditor, transferring
//!    `min(|debtor|, creditor)` until either side runs out.
//!
//! Greedy pairing bounds the number of transfers by `member_count - 1` and runs
//! in `O(n log n)`. It is not guaranteed minimal in every case, but it is
//! deterministic: ties keep member order because the sorts are stable.
//!
//! Values within [`SETTLEMENT_TOLERANCE`] of zero are treated as settled.
//! Computation uses full `f64` precision; rounding happens only for display.

use crate::types::{Expense, Group, Person};
use std::collections::HashMap;

/// Balances and transfers smaller than this are treated as zero
pub const SETTLEMENT_TOLERANCE: f64 = 0.01;

/// A member's position after an equal split
#[derive(Debug, Clone, PartialEq)]
pub struct MemberBalance {
    /// The member
    pub person: Person,

    /// Total amount this member paid
    pub paid: f64,

    /// `paid - share`; positive means the member is owed money
    pub balance: f64,
}

impl MemberBalance {
    /// Whether the balance is within tolerance of zero
    pub fn is_settled(&self) -> bool {
        self.balance.abs() < SETTLEMENT_TOLERANCE
    }

    /// Whether the member is owed more than the tolerance
    pub fn is_creditor(&self) -> bool {
        self.balance > SETTLEMENT_TOLERANCE
    }

    /// Whether the member owes more than the tolerance
    pub fn is_debtor(&self) -> bool {
        self.balance < -SETTLEMENT_TOLERANCE
    }
}

/// A single payment from a debtor to a creditor
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    /// Member who pays
    pub from: Person,

    /// Member who receives
    pub to: Person,

    /// Amount to pay, full precision
    pub amount: f64,
}

/// Full result of settling a group
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    /// Sum of all expenses
    pub total: f64,

    /// Equal share per member
    pub share: f64,

    /// Net balance per member, in member order
    pub balances: Vec<MemberBalance>,

    /// Payments that settle the balances, in greedy order
    pub transfers: Vec<Transfer>,
}

impl Settlement {
    /// Whether no transfers are needed
    pub fn is_settled(&self) -> bool {
        self.transfers.is_empty()
    }

    /// Look up the balance of a member by person id
    pub fn balance_of(&self, person_id: &str) -> Option<f64> {
        self.balances
            .iter()
            .find(|b| b.person.id == person_id)
            .map(|b| b.balance)
    }
}

/// What the group-details view shows in its settlement section
#[derive(Debug, Clone, PartialEq)]
pub enum SettlementStatus {
    /// The group has no members; no settlement section is shown
    NoMembers,

    /// Nothing has been spent yet; no settlement is computed
    NoExpenses,

    /// Every balance is within tolerance of zero
    AllSettled,

    /// These payments are still outstanding
    Pending(Vec<Transfer>),
}

impl SettlementStatus {
    /// Classify a group, computing its settlement when there is one
    pub fn for_group(group: &Group) -> Self {
        settle_with_status(group).1
    }

    /// Outstanding transfers (empty for every non-pending state)
    pub fn transfers(&self) -> &[Transfer] {
        match self {
            SettlementStatus::Pending(transfers) => transfers,
            _ => &[],
        }
    }
}

/// Sum what each member paid, aligned with `members`
///
/// Expenses attributed to a person who is not a member contribute nothing here.
pub fn paid_totals(members: &[Person], expenses: &[Expense]) -> Vec<f64> {
    let mut paid: HashMap<&str, f64> = members.iter().map(|m| (m.id.as_str(), 0.0)).collect();
    for expense in expenses {
        if let Some(total) = paid.get_mut(expense.person.id.as_str()) {
            *total += expense.amount;
        }
    }
    members
        .iter()
        .map(|m| paid.get(m.id.as_str()).copied().unwrap_or(0.0))
        .collect()
}

/// Equal share of `total` across `member_count` members
///
/// Returns `None` when there are no members.
pub fn fair_share(total: f64, member_count: usize) -> Option<f64> {
    if member_count == 0 {
        None
    } else {
        Some(total / member_count as f64)
    }
}

/// Compute every member's net balance
///
/// Returns `None` when there are no members.
pub fn net_balances(members: &[Person], expenses: &[Expense]) -> Option<Vec<MemberBalance>> {
    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    let share = fair_share(total, members.len())?;

    let balances = members
        .iter()
        .zip(paid_totals(members, expenses))
        .map(|(person, paid)| MemberBalance {
            person: person.clone(),
            paid,
            balance: paid - share,
        })
        .collect();
    Some(balances)
}

/// Greedily match debtors to creditors
///
/// Debtors are visited most-negative first and creditors most-positive first.
/// Each step pays `min(|debtor|, creditor)`; a party leaves its list once its
/// remaining balance is within tolerance.
pub fn settle_balances(balances: &[MemberBalance]) -> Vec<Transfer> {
    // (index into balances, remaining balance)
    let mut debtors: Vec<(usize, f64)> = balances
        .iter()
        .enumerate()
        .filter(|(_, b)| b.is_debtor())
        .map(|(i, b)| (i, b.balance))
        .collect();
    debtors.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut creditors: Vec<(usize, f64)> = balances
        .iter()
        .enumerate()
        .filter(|(_, b)| b.is_creditor())
        .map(|(i, b)| (i, b.balance))
        .collect();
    creditors.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut transfers = Vec::new();
    let (mut d, mut c) = (0, 0);

    while d < debtors.len() && c < creditors.len() {
        let (debtor_idx, owed) = debtors[d];
        let (creditor_idx, due) = creditors[c];
        let amount = (-owed).min(due);

        if amount <= SETTLEMENT_TOLERANCE {
            // A remainder sits exactly on the tolerance; only that side is done.
            if -owed <= SETTLEMENT_TOLERANCE {
                d += 1;
            }
            if due <= SETTLEMENT_TOLERANCE {
                c += 1;
            }
            continue;
        }

        transfers.push(Transfer {
            from: balances[debtor_idx].person.clone(),
            to: balances[creditor_idx].person.clone(),
            amount,
        });
        debtors[d].1 += amount;
        creditors[c].1 -= amount;

        if debtors[d].1.abs() < SETTLEMENT_TOLERANCE {
            d += 1;
        }
        if creditors[c].1 < SETTLEMENT_TOLERANCE {
            c += 1;
        }
    }

    transfers
}

/// Settle a set of members and their expenses
///
/// Returns `None` when there are no members, so the caller never divides by
/// zero. The result is derived fresh on every call.
pub fn compute_settlement(members: &[Person], expenses: &[Expense]) -> Option<Settlement> {
    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    let share = fair_share(total, members.len())?;
    let balances = net_balances(members, expenses)?;
    let transfers = settle_balances(&balances);

    Some(Settlement {
        total,
        share,
        balances,
        transfers,
    })
}

/// Settle a group
pub fn settle_group(group: &Group) -> Option<Settlement> {
    compute_settlement(&group.members, &group.expenses)
}

/// Settle a group once and classify the result for the details view
///
/// The settlement is `None` when the group has no members or no expenses.
pub fn settle_with_status(group: &Group) -> (Option<Settlement>, SettlementStatus) {
    if group.members.is_empty() {
        return (None, SettlementStatus::NoMembers);
    }
    if group.expenses.is_empty() {
        return (None, SettlementStatus::NoExpenses);
    }
    match settle_group(group) {
        Some(settlement) if settlement.is_settled() => {
            (Some(settlement), SettlementStatus::AllSettled)
        }
        Some(settlement) => {
            let status = SettlementStatus::Pending(settlement.transfers.clone());
            (Some(settlement), status)
        }
        None => (None, SettlementStatus::NoMembers),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn person(id: &str, name: &str) -> Person {
        Person::new(id, name, "9999999999", format!("{}@upi", name.to_lowercase()))
    }

    fn members(names: &[&str]) -> Vec<Person> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| person(&(i + 1).to_string(), name))
            .collect()
    }

    fn expenses(members: &[Person], paid: &[(usize, f64)]) -> Vec<Expense> {
        paid.iter()
            .map(|&(i, amount)| Expense::new(members[i].clone(), amount))
            .collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < SETTLEMENT_TOLERANCE
    }

    #[test]
    fn test_one_payer_three_members() {
        let m = members(&["Alice", "Bob", "Carol"]);
        let e = expenses(&m, &[(0, 300.0)]);

        let settlement = compute_settlement(&m, &e).unwrap();

        assert_eq!(settlement.total, 300.0);
        assert_eq!(settlement.share, 100.0);
        assert_eq!(settlement.balance_of("1"), Some(200.0));
        assert_eq!(settlement.balance_of("2"), Some(-100.0));
        assert_eq!(settlement.balance_of("3"), Some(-100.0));

        let pairs: Vec<(&str, &str, f64)> = settlement
            .transfers
            .iter()
            .map(|t| (t.from.name.as_str(), t.to.name.as_str(), t.amount))
            .collect();
        assert_eq!(pairs, vec![("Bob", "Alice", 100.0), ("Carol", "Alice", 100.0)]);
    }

    #[test]
    fn test_even_payments_are_settled() {
        let m = members(&["Alice", "Bob"]);
        let e = expenses(&m, &[(0, 50.0), (1, 50.0)]);

        let settlement = compute_settlement(&m, &e).unwrap();

        assert!(settlement.balances.iter().all(MemberBalance::is_settled));
        assert!(settlement.is_settled());
    }

    #[test]
    fn test_zero_members_has_no_settlement() {
        let stranger = person("9", "Zed");
        let e = vec![Expense::new(stranger, 40.0)];

        assert_eq!(compute_settlement(&[], &e), None);
        assert_eq!(compute_settlement(&[], &[]), None);
        assert_eq!(fair_share(40.0, 0), None);
    }

    #[test]
    fn test_members_without_expenses_paid_zero() {
        let m = members(&["Alice", "Bob", "Carol"]);
        let e = expenses(&m, &[(1, 10.0), (1, 5.0)]);

        assert_eq!(paid_totals(&m, &e), vec![0.0, 15.0, 0.0]);
    }

    #[test]
    fn test_non_member_expense_counts_toward_total_only() {
        let m = members(&["Alice", "Bob"]);
        let mut e = expenses(&m, &[(0, 100.0)]);
        e.push(Expense::new(person("99", "Ghost"), 100.0));

        let settlement = compute_settlement(&m, &e).unwrap();

        assert_eq!(settlement.total, 200.0);
        assert_eq!(settlement.share, 100.0);
        assert_eq!(settlement.balance_of("1"), Some(0.0));
        assert_eq!(settlement.balance_of("2"), Some(-100.0));
        assert_eq!(settlement.balance_of("99"), None);
        // Nobody is owed money among the members, so nothing can be matched.
        assert!(settlement.transfers.is_empty());
    }

    #[test]
    fn test_sub_tolerance_differences_are_ignored() {
        let m = members(&["Alice", "Bob"]);
        let e = expenses(&m, &[(0, 50.005), (1, 49.995)]);

        let settlement = compute_settlement(&m, &e).unwrap();
        assert!(settlement.is_settled());
    }

    #[test]
    fn test_largest_debtor_pays_largest_creditor_first() {
        let m = members(&["Alice", "Bob", "Carol", "Dave"]);
        // total 600, share 150: Alice +200, Bob +50, Carol -100, Dave -150
        let e = expenses(&m, &[(0, 350.0), (1, 200.0), (2, 50.0)]);

        let settlement = compute_settlement(&m, &e).unwrap();
        let pairs: Vec<(&str, &str, f64)> = settlement
            .transfers
            .iter()
            .map(|t| (t.from.name.as_str(), t.to.name.as_str(), t.amount))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("Dave", "Alice", 150.0),
                ("Carol", "Alice", 50.0),
                ("Carol", "Bob", 50.0),
            ]
        );
    }

    #[test]
    fn test_idempotent() {
        let m = members(&["Alice", "Bob", "Carol"]);
        let e = expenses(&m, &[(0, 12.34), (1, 56.78), (0, 9.1)]);

        assert_eq!(compute_settlement(&m, &e), compute_settlement(&m, &e));
    }

    #[rstest]
    #[case::single_payer(&["A", "B", "C"], &[(0, 300.0)])]
    #[case::two_payers(&["A", "B", "C", "D"], &[(0, 120.0), (1, 80.0)])]
    #[case::uneven_cents(&["A", "B", "C"], &[(0, 10.0), (1, 20.0), (2, 3.33)])]
    #[case::everyone_pays(&["A", "B", "C", "D", "E"], &[(0, 5.0), (1, 17.5), (2, 42.0), (3, 0.99), (4, 100.0)])]
    #[case::repeat_payer(&["A", "B"], &[(1, 7.25), (1, 7.25), (0, 1.0)])]
    #[case::single_member(&["A"], &[(0, 99.0)])]
    fn test_conservation_and_transfer_bound(
        #[case] names: &[&str],
        #[case] paid: &[(usize, f64)],
    ) {
        let m = members(names);
        let e = expenses(&m, paid);
        let settlement = compute_settlement(&m, &e).unwrap();

        assert!(settlement.transfers.len() <= m.len().saturating_sub(1));

        for balance in &settlement.balances {
            let received: f64 = settlement
                .transfers
                .iter()
                .filter(|t| t.to.id == balance.person.id)
                .map(|t| t.amount)
                .sum();
            let sent: f64 = settlement
                .transfers
                .iter()
                .filter(|t| t.from.id == balance.person.id)
                .map(|t| t.amount)
                .sum();
            assert!(
                approx(received - sent, balance.balance),
                "member {} received {} sent {} balance {}",
                balance.person.name,
                received,
                sent,
                balance.balance
            );
        }

        for transfer in &settlement.transfers {
            assert!(transfer.amount > SETTLEMENT_TOLERANCE);
            assert_ne!(transfer.from.id, transfer.to.id);
        }
    }

    #[test]
    fn test_tolerance_boundary_terminates() {
        let m = members(&["A", "B"]);
        let balances = vec![
            MemberBalance {
                person: m[0].clone(),
                paid: 0.0,
                balance: -0.010000001,
            },
            MemberBalance {
                person: m[1].clone(),
                paid: 0.0,
                balance: 0.010000001,
            },
        ];

        let transfers = settle_balances(&balances);
        assert!(transfers.len() <= 1);
    }

    #[test]
    fn test_debtor_on_tolerance_boundary_does_not_skip_creditor() {
        // Two ulps above the tolerance, so `a - b` lands exactly on it
        let b = f64::from_bits(SETTLEMENT_TOLERANCE.to_bits() + 2);
        let a = b + SETTLEMENT_TOLERANCE;
        assert_eq!(a - b, SETTLEMENT_TOLERANCE);

        let m = members(&["D", "E", "X", "Y"]);
        let balances: Vec<MemberBalance> = m
            .iter()
            .zip([-a, -b, b, b])
            .map(|(person, balance)| MemberBalance {
                person: person.clone(),
                paid: 0.0,
                balance,
            })
            .collect();

        let transfers = settle_balances(&balances);
        let pairs: Vec<(&str, &str, f64)> = transfers
            .iter()
            .map(|t| (t.from.name.as_str(), t.to.name.as_str(), t.amount))
            .collect();
        assert_eq!(pairs, vec![("D", "X", b), ("E", "Y", b)]);
    }

    #[test]
    fn test_settle_with_status_shares_one_settlement() {
        let m = members(&["Alice", "Bob"]);
        let mut group = Group::new("g", "Lunch", m.clone());

        let (settlement, status) = settle_with_status(&group);
        assert_eq!((settlement, status), (None, SettlementStatus::NoExpenses));

        group.expenses = expenses(&m, &[(0, 30.0)]);
        let (settlement, status) = settle_with_status(&group);
        let settlement = settlement.unwrap();
        assert_eq!(status.transfers(), settlement.transfers.as_slice());
        assert_eq!(settlement.balance_of("2"), Some(-15.0));
    }

    #[rstest]
    #[case::no_members(Group::new("g", "Empty", vec![]), SettlementStatus::NoMembers)]
    #[case::no_expenses(Group::new("g", "Fresh", members(&["A", "B"])), SettlementStatus::NoExpenses)]
    fn test_status_degenerate_groups(#[case] group: Group, #[case] expected: SettlementStatus) {
        assert_eq!(SettlementStatus::for_group(&group), expected);
        assert!(SettlementStatus::for_group(&group).transfers().is_empty());
    }

    #[test]
    fn test_status_all_settled_and_pending() {
        let m = members(&["Alice", "Bob"]);

        let mut group = Group::new("g", "Lunch", m.clone());
        group.expenses = expenses(&m, &[(0, 50.0), (1, 50.0)]);
        assert_eq!(SettlementStatus::for_group(&group), SettlementStatus::AllSettled);

        group.expenses.push(Expense::new(m[0].clone(), 30.0));
        let status = SettlementStatus::for_group(&group);
        assert_eq!(status.transfers().len(), 1);
        assert_eq!(status.transfers()[0].from.name, "Bob");
        assert!(approx(status.transfers()[0].amount, 15.0));
    }
}
