#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Weighted random choice over a finite option set.
//!
//! Callers turn a chance table into options with [`options_from_table`], which
//! drops every non-positive weight, and then draw with [`choose`]. An empty
//! option list is reported as an error instead of silently picking a default.

use rand::Rng;
use shroom_sniff_core::ChanceTable;
use thiserror::Error;

/// Candidate value paired with its relative weight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightedOption<T> {
    value: T,
    weight: f32,
}

impl<T> WeightedOption<T> {
    /// Creates an option; callers are expected to pass a positive weight.
    #[must_use]
    pub const fn new(value: T, weight: f32) -> Self {
        Self { value, weight }
    }

    /// Candidate value.
    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Relative weight.
    #[must_use]
    pub const fn weight(&self) -> f32 {
        self.weight
    }
}

/// Reasons a draw cannot be made.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// No option carries a positive weight.
    #[error("no options with a positive weight to choose from")]
    NoOptions,
}

/// Builds options from the positive entries of `table` accepted by `keep`.
#[must_use]
pub fn options_from_table<K: Copy + PartialEq>(
    table: &ChanceTable<K>,
    mut keep: impl FnMut(&K) -> bool,
) -> Vec<WeightedOption<K>> {
    table
        .iter()
        .filter(|(key, weight)| **weight > 0 && keep(key))
        .map(|(key, weight)| WeightedOption::new(*key, *weight as f32))
        .collect()
}

/// Draws one value with probability proportional to its weight.
///
/// The roll is uniform in `[0, total]`; the first option whose cumulative
/// weight reaches the roll wins and the last option absorbs rounding at the
/// upper boundary.
pub fn choose<T: Clone, R: Rng + ?Sized>(
    options: &[WeightedOption<T>],
    rng: &mut R,
) -> Result<T, SelectionError> {
    let total: f32 = options
        .iter()
        .map(|option| option.weight.max(0.0))
        .sum();
    let Some(last) = options.last() else {
        return Err(SelectionError::NoOptions);
    };
    if total <= 0.0 || !total.is_finite() {
        return Err(SelectionError::NoOptions);
    }

    let roll = rng.gen_range(0.0..=total);
    let mut cumulative = 0.0;
    for option in options {
        cumulative += option.weight.max(0.0);
        if roll <= cumulative {
            return Ok(option.value.clone());
        }
    }
    Ok(last.value.clone())
}
