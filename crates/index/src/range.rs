//! Key ranges for view lookups.

use core::ops::Bound;

/// The span of view keys a lookup covers.
///
/// Mirrors the `key`, `startkey` and `endkey` parameters of a view query:
/// a single key, one open-ended side, or both sides, each side inclusive
/// unless marked exclusive.
#[derive(Clone, Debug, PartialEq)]
pub enum KeyRange<K> {
    /// Every key in the view
    All,
    /// Exactly one key, e.g. one fingerprint
    Only(K),
    /// From `value` to the last key
    LowerBound { value: K, exclusive: bool },
    /// From the first key to `value`
    UpperBound { value: K, exclusive: bool },
    /// From `lower` to `upper`
    Bound {
        lower: K,
        upper: K,
        lower_exclusive: bool,
        upper_exclusive: bool,
    },
}

impl<K> Default for KeyRange<K> {
    fn default() -> Self {
        KeyRange::All
    }
}

impl<K: Ord> KeyRange<K> {
    pub fn all() -> Self {
        KeyRange::All
    }

    /// Selects the rows emitted under one key.
    pub fn only(key: K) -> Self {
        KeyRange::Only(key)
    }

    /// Keys after `start` (or from it, unless `exclusive`).
    pub fn lower_bound(start: K, exclusive: bool) -> Self {
        KeyRange::LowerBound {
            value: start,
            exclusive,
        }
    }

    /// Keys before `end` (or up to it, unless `exclusive`).
    pub fn upper_bound(end: K, exclusive: bool) -> Self {
        KeyRange::UpperBound {
            value: end,
            exclusive,
        }
    }

    pub fn bound(start: K, end: K, start_exclusive: bool, end_exclusive: bool) -> Self {
        KeyRange::Bound {
            lower: start,
            upper: end,
            lower_exclusive: start_exclusive,
            upper_exclusive: end_exclusive,
        }
    }

    /// `[start, end)`: the usual prefix-style scan over string keys.
    pub fn half_open(start: K, end: K) -> Self {
        Self::bound(start, end, false, true)
    }

    pub fn is_only(&self) -> bool {
        matches!(self, KeyRange::Only(_))
    }

    pub fn is_all(&self) -> bool {
        matches!(self, KeyRange::All)
    }

    /// Returns false when no key can satisfy the range, e.g. `(5, 5)` or `[7, 3]`.
    ///
    /// `BTreeMap::range` panics on such bounds, so callers check first.
    pub fn is_satisfiable(&self) -> bool {
        match self {
            KeyRange::Bound {
                lower,
                upper,
                lower_exclusive,
                upper_exclusive,
            } => {
                if *lower_exclusive || *upper_exclusive {
                    lower < upper
                } else {
                    lower <= upper
                }
            }
            _ => true,
        }
    }

    /// Returns the range as a pair of standard bounds.
    pub fn as_bounds(&self) -> (Bound<&K>, Bound<&K>) {
        fn edge<K>(value: &K, exclusive: bool) -> Bound<&K> {
            if exclusive {
                Bound::Excluded(value)
            } else {
                Bound::Included(value)
            }
        }

        match self {
            KeyRange::All => (Bound::Unbounded, Bound::Unbounded),
            KeyRange::Only(key) => (Bound::Included(key), Bound::Included(key)),
            KeyRange::LowerBound { value, exclusive } => (edge(value, *exclusive), Bound::Unbounded),
            KeyRange::UpperBound { value, exclusive } => (Bound::Unbounded, edge(value, *exclusive)),
            KeyRange::Bound {
                lower,
                upper,
                lower_exclusive,
                upper_exclusive,
            } => (edge(lower, *lower_exclusive), edge(upper, *upper_exclusive)),
        }
    }

    /// Checks if a key falls within this range.
    pub fn contains(&self, key: &K) -> bool {
        let (lower, upper) = self.as_bounds();
        let lower_ok = match lower {
            Bound::Included(v) => key >= v,
            Bound::Excluded(v) => key > v,
            Bound::Unbounded => true,
        };
        let upper_ok = match upper {
            Bound::Included(v) => key <= v,
            Bound::Excluded(v) => key < v,
            Bound::Unbounded => true,
        };
        lower_ok && upper_ok
    }

    /// Converts the keys of this range, e.g. `&str` bounds into owned strings.
    pub fn map<U: Ord>(self, mut f: impl FnMut(K) -> U) -> KeyRange<U> {
        match self {
            KeyRange::All => KeyRange::All,
            KeyRange::Only(key) => KeyRange::Only(f(key)),
            KeyRange::LowerBound { value, exclusive } => KeyRange::LowerBound {
                value: f(value),
                exclusive,
            },
            KeyRange::UpperBound { value, exclusive } => KeyRange::UpperBound {
                value: f(value),
                exclusive,
            },
            KeyRange::Bound {
                lower,
                upper,
                lower_exclusive,
                upper_exclusive,
            } => KeyRange::Bound {
                lower: f(lower),
                upper: f(upper),
                lower_exclusive,
                upper_exclusive,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_range_all() {
        let range: KeyRange<i32> = KeyRange::all();
        assert!(range.contains(&-100));
        assert!(range.contains(&100));
        assert!(range.is_all());
    }

    #[test]
    fn test_key_range_only() {
        let range = KeyRange::only(5);
        assert!(!range.contains(&4));
        assert!(range.contains(&5));
        assert!(!range.contains(&6));
        assert!(range.is_only());
    }

    #[test]
    fn test_key_range_lower_bound() {
        let range = KeyRange::lower_bound(5, false);
        assert!(!range.contains(&4));
        assert!(range.contains(&5));

        let range_ex = KeyRange::lower_bound(5, true);
        assert!(!range_ex.contains(&5));
        assert!(range_ex.contains(&6));
    }

    #[test]
    fn test_key_range_upper_bound() {
        let range = KeyRange::upper_bound(5, false);
        assert!(range.contains(&5));
        assert!(!range.contains(&6));

        let range_ex = KeyRange::upper_bound(5, true);
        assert!(range_ex.contains(&4));
        assert!(!range_ex.contains(&5));
    }

    #[test]
    fn test_key_range_contains_string() {
        let range = KeyRange::bound("B", "D", false, true);
        assert!(!range.contains(&"A"));
        assert!(range.contains(&"B"));
        assert!(range.contains(&"C"));
        assert!(!range.contains(&"D"));
    }

    #[test]
    fn test_key_range_satisfiable() {
        assert!(KeyRange::bound(3, 7, false, false).is_satisfiable());
        assert!(KeyRange::bound(5, 5, false, false).is_satisfiable());
        assert!(!KeyRange::bound(5, 5, true, false).is_satisfiable());
        assert!(!KeyRange::bound(7, 3, false, false).is_satisfiable());
        assert!(KeyRange::<i32>::all().is_satisfiable());
    }

    #[test]
    fn test_key_range_bounds() {
        let range = KeyRange::half_open(1, 9);
        assert_eq!(range.as_bounds(), (Bound::Included(&1), Bound::Excluded(&9)));
        assert_eq!(
            KeyRange::only(4).as_bounds(),
            (Bound::Included(&4), Bound::Included(&4))
        );
    }

    #[test]
    fn test_key_range_map() {
        let range = KeyRange::bound("a", "c", true, false).map(alloc::string::String::from);
        assert!(range.contains(&"b".into()));
        assert!(!range.contains(&"a".into()));
    }
}
