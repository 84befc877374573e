// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Argument Value Model
//!
//! One parsed argument of an entity instance line. Aggregates nest
//! arbitrarily; order inside a list is the token order of the file.
//! `Display` writes the value back out as STEP text.

use crate::strings::encode_string;
use std::fmt;

/// One parsed argument value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Explicit unset attribute (`$`). Positional: dropping one shifts
    /// every following argument against the schema.
    Null,
    /// Decoded string literal
    Text(String),
    /// Enumeration literal name, without the dots
    Enum(String),
    /// Float value
    Real(f64),
    /// Integer value
    Integer(i64),
    /// Reference to another instance line (`#n`)
    EntityRef(u32),
    /// Unlabeled aggregate
    List(Vec<Value>),
    /// Labeled aggregate, e.g. `IFCCARTESIANPOINT(1.,2.,3.)` as a value
    Typed(String, Vec<Value>),
}

impl Value {
    /// Get as entity reference id
    #[inline]
    pub fn as_entity_ref(&self) -> Option<u32> {
        match self {
            Value::EntityRef(id) => Some(*id),
            _ => None,
        }
    }

    /// Get as text
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get as enumeration name
    #[inline]
    pub fn as_enum(&self) -> Option<&str> {
        match self {
            Value::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Get as float, widening integers
    #[inline]
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get as integer, truncating floats
    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Real(f) => Some(*f as i64),
            _ => None,
        }
    }

    /// Get as list members
    #[inline]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get as labeled aggregate: type name plus members
    #[inline]
    pub fn as_typed(&self) -> Option<(&str, &[Value])> {
        match self {
            Value::Typed(name, members) => Some((name, members)),
            _ => None,
        }
    }

    /// Check if unset
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "$"),
            Value::Text(s) => write!(f, "'{}'", encode_string(s)),
            Value::Enum(name) => write!(f, ".{name}."),
            Value::Real(v) => write!(f, "{v:?}"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::EntityRef(id) => write!(f, "#{id}"),
            Value::List(items) => write_members(f, items),
            Value::Typed(name, members) => {
                write!(f, "{name}")?;
                write_members(f, members)
            }
        }
    }
}

/// `(a,b,c)` with no spaces, the form files actually carry
pub(crate) fn write_members(f: &mut fmt::Formatter<'_>, members: &[Value]) -> fmt::Result {
    write!(f, "(")?;
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{member}")?;
    }
    write!(f, ")")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        assert_eq!(Value::EntityRef(7).as_entity_ref(), Some(7));
        assert_eq!(Value::Text("a".into()).as_text(), Some("a"));
        assert_eq!(Value::Enum("T".into()).as_enum(), Some("T"));
        assert_eq!(Value::Real(1.5).as_real(), Some(1.5));
        assert_eq!(Value::Integer(3).as_real(), Some(3.0));
        assert_eq!(Value::Real(2.9).as_int(), Some(2));
        assert!(Value::Null.is_null());
        assert!(!Value::Integer(0).is_null());
        assert_eq!(Value::Text("a".into()).as_entity_ref(), None);
    }

    #[test]
    fn test_typed_accessor() {
        let value = Value::Typed("IFCLABEL".into(), vec![Value::Text("x".into())]);
        let (name, members) = value.as_typed().unwrap();
        assert_eq!(name, "IFCLABEL");
        assert_eq!(members, &[Value::Text("x".into())]);
    }

    #[test]
    fn test_display_scalars() {
        assert_eq!(Value::Null.to_string(), "$");
        assert_eq!(Value::Integer(-4).to_string(), "-4");
        assert_eq!(Value::Real(0.5).to_string(), "0.5");
        assert_eq!(Value::EntityRef(42).to_string(), "#42");
        assert_eq!(Value::Enum("NOTDEFINED".into()).to_string(), ".NOTDEFINED.");
        assert_eq!(Value::Text("it's".into()).to_string(), "'it''s'");
    }

    #[test]
    fn test_display_aggregates() {
        let list = Value::List(vec![Value::Integer(1), Value::Null, Value::EntityRef(2)]);
        assert_eq!(list.to_string(), "(1,$,#2)");

        let typed = Value::Typed(
            "IFCCARTESIANPOINT".into(),
            vec![Value::Real(1.0), Value::Real(2.0)],
        );
        assert_eq!(typed.to_string(), "IFCCARTESIANPOINT(1.0,2.0)");
    }
}
