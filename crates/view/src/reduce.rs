//! Reduce stage: leaf reduce and rereduce.
//!
//! A reducer folds the values sharing a key (leaf `reduce`) and folds
//! partial results computed over disjoint parts of a group (`rereduce`).
//! For every partition of a group, rereducing the partials must equal
//! reducing the whole group.

use alloc::vec::Vec;
use viewdex_core::{Value, ValueShape};

/// An associative aggregation over the values of a view.
pub trait Reducer<V>: Send + Sync {
    type Output: Clone + Send + Sync;

    /// Name used in logs and configuration errors.
    fn name(&self) -> &str;

    /// Returns whether values of the given shape can be aggregated.
    fn accepts(&self, shape: ValueShape) -> bool {
        let _ = shape;
        true
    }

    /// Reduces the raw values of one group.
    fn reduce(&self, values: &[&V]) -> Self::Output;

    /// Combines partial results of the same group.
    fn rereduce(&self, partials: &[Self::Output]) -> Self::Output;
}

/// Counts values; partial counts are summed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Count;

impl<V> Reducer<V> for Count {
    type Output = u64;

    fn name(&self) -> &str {
        "count"
    }

    fn reduce(&self, values: &[&V]) -> u64 {
        values.len() as u64
    }

    fn rereduce(&self, partials: &[u64]) -> u64 {
        partials.iter().sum()
    }
}

/// Keeps the greatest value of a group, e.g. the latest timestamp.
///
/// Values are sorted ascending and the last one is kept. An empty group
/// reduces to the empty array, so the result is not always of the value type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MaxValue;

impl MaxValue {
    fn last_sorted(mut values: Vec<&Value>) -> Value {
        values.sort();
        values
            .pop()
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()))
    }
}

impl Reducer<Value> for MaxValue {
    type Output = Value;

    fn name(&self) -> &str {
        "max"
    }

    fn accepts(&self, shape: ValueShape) -> bool {
        shape.is_orderable()
    }

    fn reduce(&self, values: &[&Value]) -> Value {
        Self::last_sorted(values.to_vec())
    }

    fn rereduce(&self, partials: &[Value]) -> Value {
        Self::last_sorted(partials.iter().collect())
    }
}

/// Marker for views without a reduce function. Never invoked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoReduce;

impl<V> Reducer<V> for NoReduce {
    type Output = ();

    fn name(&self) -> &str {
        "none"
    }

    fn reduce(&self, _values: &[&V]) {}

    fn rereduce(&self, _partials: &[()]) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn strings(items: &[&str]) -> Vec<Value> {
        items.iter().map(|s| Value::from(*s)).collect()
    }

    #[test]
    fn test_count_leaf_and_rereduce() {
        let values = vec!["a", "b", "c"];
        let refs: Vec<&&str> = values.iter().collect();
        assert_eq!(Count.reduce(refs.as_slice()), 3);
        assert_eq!(Reducer::<&str>::rereduce(&Count, &[3, 4, 0]), 7);
    }

    #[test]
    fn test_count_partition_law() {
        let values: Vec<i32> = (0..10).collect();
        let refs: Vec<&i32> = values.iter().collect();
        let whole = Count.reduce(refs.as_slice());
        for split in 1..refs.len() {
            let (left, right) = refs.split_at(split);
            let partials = [Count.reduce(left), Count.reduce(right)];
            assert_eq!(Reducer::<i32>::rereduce(&Count, &partials), whole);
        }
    }

    #[test]
    fn test_max_leaf() {
        let values = strings(&["2020-01-01", "2021-06-01", "2019-03-01"]);
        let refs: Vec<&Value> = values.iter().collect();
        assert_eq!(MaxValue.reduce(refs.as_slice()), Value::from("2021-06-01"));
    }

    #[test]
    fn test_max_rereduce() {
        let partials = strings(&["2021-06-01", "2020-05-05"]);
        assert_eq!(MaxValue.rereduce(&partials), Value::from("2021-06-01"));
    }

    #[test]
    fn test_max_empty_group_is_empty_array() {
        assert_eq!(MaxValue.reduce(&[]), Value::Array(vec![]));
        assert_eq!(MaxValue.rereduce(&[]), Value::Array(vec![]));
    }

    #[test]
    fn test_max_partition_law_with_array_values() {
        // Arrays sort after strings, so an array value is the maximum
        let values = vec![Value::from("2020-01-01"), Value::Array(vec![])];
        let refs: Vec<&Value> = values.iter().collect();
        let whole = MaxValue.reduce(refs.as_slice());
        assert_eq!(whole, Value::Array(vec![]));

        let (left, right) = refs.split_at(1);
        let partials = [MaxValue.reduce(left), MaxValue.reduce(right)];
        assert_eq!(MaxValue.rereduce(&partials), whole);
    }

    #[test]
    fn test_max_accepts_only_scalars() {
        assert!(MaxValue.accepts(ValueShape::Scalar));
        assert!(!MaxValue.accepts(ValueShape::Document));
        assert!(!MaxValue.accepts(ValueShape::Any));
        assert!(Reducer::<Value>::accepts(&Count, ValueShape::Document));
    }
}
