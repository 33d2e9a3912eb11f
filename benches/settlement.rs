//! Benchmark suite for the settlement engine
//!
//! Measures balance computation and greedy matching for groups of increasing
//! size, using the divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```

use expense_splitter::{compute_settlement, Expense, Person};

fn main() {
    divan::main();
}

/// Build a group of `size` members where every third member paid something
fn fixture(size: usize) -> (Vec<Person>, Vec<Expense>) {
    let members: Vec<Person> = (0..size)
        .map(|i| Person::new(i.to_string(), format!("Member {}", i), "9999999999", "m@upi"))
        .collect();
    let expenses = members
        .iter()
        .enumerate()
        .filter(|(i, _)| i % 3 == 0)
        .map(|(i, m)| Expense::new(m.clone(), (i as f64 * 17.31) % 500.0 + 1.0))
        .collect();
    (members, expenses)
}

/// Settle groups of 3 to 1,000 members
#[divan::bench(args = [3, 10, 100, 1000])]
fn settle_group(bencher: divan::Bencher, size: usize) {
    let (members, expenses) = fixture(size);

    bencher.bench(|| compute_settlement(divan::black_box(&members), divan::black_box(&expenses)));
}
