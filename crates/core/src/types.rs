//! Value shape definitions.
//!
//! A `ValueShape` is the coarse kind of value a map function emits. Reducers
//! declare which shapes they can aggregate, and views check the pairing when
//! they are built.

use core::fmt;

/// The coarse kind of an emitted value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueShape {
    /// Unknown or mixed; only shape-agnostic reducers accept it.
    Any,
    /// Null, boolean, number or string (timestamps, names, counts)
    Scalar,
    /// An ordered sequence
    Sequence,
    /// A structured record built by the map function
    Record,
    /// A reference to a whole indexed document
    Document,
}

impl ValueShape {
    /// Returns whether values of this shape have a meaningful ordering for
    /// min/max style aggregation.
    pub fn is_orderable(&self) -> bool {
        matches!(self, ValueShape::Scalar)
    }
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueShape::Any => "any",
            ValueShape::Scalar => "scalar",
            ValueShape::Sequence => "sequence",
            ValueShape::Record => "record",
            ValueShape::Document => "document",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_orderable() {
        assert!(ValueShape::Scalar.is_orderable());
        assert!(!ValueShape::Document.is_orderable());
        assert!(!ValueShape::Any.is_orderable());
    }

    #[test]
    fn test_display() {
        assert_eq!(ValueShape::Record.to_string(), "record");
    }
}
