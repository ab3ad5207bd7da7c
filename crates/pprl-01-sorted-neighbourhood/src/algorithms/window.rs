//! Sliding window over the exchanged representative values
//!
//! Both parties' values are merged into one sorted list. A window of 2w
//! consecutive values slides over it with stride 1; a window is extended to
//! the right until it holds at least w values of each party or the list ends.
//! Every (Alice value, Bob value) combination inside a window becomes a
//! candidate pair.

use rayon::prelude::*;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, warn};

use crate::domain::SENTINEL;

/// Candidate (Alice value, Bob value) pairs, deduplicated in first-emission
/// order.
pub fn candidate_value_pairs(alice: &[String], bob: &[String], w: usize) -> Vec<(String, String)> {
    let alice_set: HashSet<&str> = alice.iter().map(String::as_str).collect();
    let bob_set: HashSet<&str> = bob.iter().map(String::as_str).collect();

    let union: Vec<&str> = alice_set
        .iter()
        .chain(bob_set.iter())
        .copied()
        .filter(|v| *v != SENTINEL)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if union.is_empty() || w == 0 {
        return Vec::new();
    }

    let size = 2 * w;
    if union.len() < size {
        warn!(
            values = union.len(),
            window = size,
            "Fewer representative values than one window; no candidate pairs"
        );
        return Vec::new();
    }
    let window_count = union.len() - size + 1;

    let per_window: Vec<Vec<(&str, &str)>> = (0..window_count)
        .into_par_iter()
        .map(|start| window_pairs(&union, start, size, w, &alice_set, &bob_set))
        .collect();

    let mut seen = HashSet::new();
    let mut pairs = Vec::new();
    for (a, b) in per_window.into_iter().flatten() {
        if seen.insert((a, b)) {
            pairs.push((a.to_string(), b.to_string()));
        }
    }

    debug!(
        values = union.len(),
        windows = window_count,
        pairs = pairs.len(),
        "Window scan complete"
    );
    pairs
}

fn window_pairs<'a>(
    union: &[&'a str],
    start: usize,
    size: usize,
    w: usize,
    alice: &HashSet<&str>,
    bob: &HashSet<&str>,
) -> Vec<(&'a str, &'a str)> {
    let mut end = (start + size).min(union.len());
    let count = |set: &HashSet<&str>, end: usize| union[start..end].iter().filter(|v| set.contains(*v)).count();

    let (mut in_alice, mut in_bob) = (count(alice, end), count(bob, end));
    while (in_alice < w || in_bob < w) && end < union.len() {
        let next = union[end];
        in_alice += usize::from(alice.contains(next));
        in_bob += usize::from(bob.contains(next));
        end += 1;
    }

    let window = &union[start..end];
    let mut pairs = Vec::new();
    for &a in window.iter().filter(|v| alice.contains(*v)) {
        for &b in window.iter().filter(|v| bob.contains(*v)) {
            pairs.push((a, b));
        }
    }
    pairs
}
