//! Field validators for input validation
//!
//! The first half of this module is a set of domain-free predicates answering
//! yes/no questions about a value. The second half wraps them into
//! `Result<(), String>` field validators used by the request extractors.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Anything with a well-defined element count.
///
/// Strings count Unicode scalar values, not bytes, so `"João"` has length 4.
pub trait HasLength {
    fn length(&self) -> usize;
}

impl HasLength for str {
    fn length(&self) -> usize {
        self.chars().count()
    }
}

impl HasLength for String {
    fn length(&self) -> usize {
        self.as_str().length()
    }
}

impl<T> HasLength for [T] {
    fn length(&self) -> usize {
        self.len()
    }
}

impl<T, const N: usize> HasLength for [T; N] {
    fn length(&self) -> usize {
        N
    }
}

impl<T> HasLength for Vec<T> {
    fn length(&self) -> usize {
        self.len()
    }
}

impl<T, S> HasLength for HashSet<T, S> {
    fn length(&self) -> usize {
        self.len()
    }
}

impl<T> HasLength for BTreeSet<T> {
    fn length(&self) -> usize {
        self.len()
    }
}

impl<K, V, S> HasLength for HashMap<K, V, S> {
    fn length(&self) -> usize {
        self.len()
    }
}

impl<K, V> HasLength for BTreeMap<K, V> {
    fn length(&self) -> usize {
        self.len()
    }
}

impl<T: HasLength + ?Sized> HasLength for &T {
    fn length(&self) -> usize {
        (**self).length()
    }
}

/// True iff the element count is at most `max_length` (equality is within bounds)
pub fn is_length_within_max<V: HasLength + ?Sized>(value: &V, max_length: usize) -> bool {
    value.length() <= max_length
}

/// True iff the element count is at least `min_length`
pub fn is_length_at_least<V: HasLength + ?Sized>(value: &V, min_length: usize) -> bool {
    value.length() >= min_length
}

/// Conjunction of [`is_length_within_max`] and [`is_length_at_least`]
pub fn is_length_acceptable<V: HasLength + ?Sized>(
    value: &V,
    max_length: usize,
    min_length: usize,
) -> bool {
    is_length_within_max(value, max_length) && is_length_at_least(value, min_length)
}

/// True iff `value` equals some element of `options`.
///
/// Comparison is exact; callers normalize case before asking.
pub fn is_member_of<T, Q>(value: &Q, options: &[T]) -> bool
where
    T: PartialEq<Q>,
    Q: ?Sized,
{
    options.iter().any(|option| *option == *value)
}

/// Validate that a string is not empty after trimming
pub fn validate_required(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", field_name));
    }
    Ok(())
}

/// Validate string length within bounds
pub fn validate_length(value: &str, min: usize, max: usize) -> Result<(), String> {
    if !is_length_at_least(value, min) {
        return Err(format!("must be at least {} characters", min));
    }
    if !is_length_within_max(value, max) {
        return Err(format!("must be at most {} characters", max));
    }
    Ok(())
}

/// Validate that an integer is zero or greater
pub fn validate_non_negative(value: i32) -> Result<(), String> {
    if value < 0 {
        return Err(format!("must be zero or greater, got {}", value));
    }
    Ok(())
}

/// Validate that a real number is finite and strictly positive
pub fn validate_positive(value: f64) -> Result<(), String> {
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("must be a positive number, got {}", value));
    }
    Ok(())
}
