// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Line Records
//!
//! The parsed form of one instance line: id, canonical type name, and the
//! positional argument values. A record owns its data outright; nothing in
//! the parsing machinery holds onto it once built.

use crate::cursor::TextCursor;
use crate::error::{Error, Result};
use crate::parser::{parse_arguments, SkipLog};
use crate::scan::ScannedLine;
use crate::schema::TypeRegistry;
use crate::token::TokenCursor;
use crate::value::{write_members, Value};
use std::fmt;

/// One parsed instance line
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineRecord {
    pub id: u32,
    pub type_name: String,
    pub arguments: Vec<Value>,
}

impl LineRecord {
    /// Create new record
    pub fn new(id: u32, type_name: String, arguments: Vec<Value>) -> Self {
        Self {
            id,
            type_name,
            arguments,
        }
    }

    /// Get argument by position
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.arguments.get(index)
    }

    /// Get entity reference argument
    pub fn get_ref(&self, index: usize) -> Option<u32> {
        self.get(index).and_then(|v| v.as_entity_ref())
    }

    /// Get text argument
    pub fn get_text(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(|v| v.as_text())
    }

    /// Get float argument
    pub fn get_real(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(|v| v.as_real())
    }

    /// Get list argument
    pub fn get_list(&self, index: usize) -> Option<&[Value]> {
        self.get(index).and_then(|v| v.as_list())
    }
}

impl fmt::Display for LineRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}={}", self.id, self.type_name)?;
        write_members(f, &self.arguments)?;
        write!(f, ";")
    }
}

/// Assemble a record from an externally resolved type name and a cursor
/// sitting at the line's first argument token.
///
/// Pure composition: no resolution, no validation of the name. Payload
/// failures land in `skips`, never abort the record.
pub fn build_line_record<C: TokenCursor + ?Sized>(
    id: u32,
    type_name: &str,
    cursor: &mut C,
    skips: &mut SkipLog,
) -> LineRecord {
    LineRecord {
        id,
        type_name: type_name.to_string(),
        arguments: parse_arguments(cursor, skips),
    }
}

/// Parse a scanned line out of `content`, resolving the type name through
/// the registry first.
///
/// The registry decides the canonical spelling. An unregistered name is a
/// hard error: a record whose type nobody can resolve is useless to every
/// downstream consumer, unlike a damaged argument.
pub fn read_line_record(
    content: &str,
    line: &ScannedLine<'_>,
    registry: &TypeRegistry,
    skips: &mut SkipLog,
) -> Result<LineRecord> {
    let code = registry
        .type_code(line.type_name)
        .ok_or_else(|| Error::UnknownTypeName(line.type_name.to_string()))?;
    let canonical = registry.type_name(code).unwrap_or(line.type_name);
    let mut cursor = TextCursor::new(&content[line.args_offset..line.end]);
    Ok(build_line_record(line.id, canonical, &mut cursor, skips))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::LineScanner;

    fn scan_first(content: &str) -> ScannedLine<'_> {
        LineScanner::new(content).next_line().unwrap()
    }

    #[test]
    fn test_read_line_record() {
        let content = "#7=IFCCARTESIANPOINT((0.,0.,0.));";
        let registry = TypeRegistry::with_common_types();
        let mut skips = SkipLog::new();
        let record =
            read_line_record(content, &scan_first(content), &registry, &mut skips).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.type_name, "IFCCARTESIANPOINT");
        assert_eq!(
            record.arguments,
            vec![Value::List(vec![
                Value::Real(0.0),
                Value::Real(0.0),
                Value::Real(0.0)
            ])]
        );
        assert!(skips.is_empty());
    }

    #[test]
    fn test_type_name_canonicalized() {
        let content = "#2=IfcWall($);";
        let registry = TypeRegistry::with_common_types();
        let mut skips = SkipLog::new();
        let record =
            read_line_record(content, &scan_first(content), &registry, &mut skips).unwrap();
        assert_eq!(record.type_name, "IFCWALL");
        assert_eq!(record.arguments, vec![Value::Null]);
    }

    #[test]
    fn test_unknown_type_name_is_an_error() {
        let content = "#1=IFCFLUXCAPACITOR(1);";
        let registry = TypeRegistry::with_common_types();
        let mut skips = SkipLog::new();
        let err =
            read_line_record(content, &scan_first(content), &registry, &mut skips).unwrap_err();
        match err {
            Error::UnknownTypeName(name) => assert_eq!(name, "IFCFLUXCAPACITOR"),
            other => panic!("Expected UnknownTypeName, got {:?}", other),
        }
    }

    #[test]
    fn test_build_does_not_resolve() {
        // The builder takes the caller's word for the type name
        let mut cursor = TextCursor::new("1,$);");
        let mut skips = SkipLog::new();
        let record = build_line_record(9, "IFCANYTHING", &mut cursor, &mut skips);
        assert_eq!(record.type_name, "IFCANYTHING");
        assert_eq!(record.arguments, vec![Value::Integer(1), Value::Null]);
    }

    #[test]
    fn test_accessors() {
        let record = LineRecord::new(
            1,
            "IFCWALL".to_string(),
            vec![
                Value::EntityRef(2),
                Value::Text("Wall-001".to_string()),
                Value::Real(3.5),
                Value::List(vec![Value::Integer(1)]),
            ],
        );
        assert_eq!(record.get_ref(0), Some(2));
        assert_eq!(record.get_text(1), Some("Wall-001"));
        assert_eq!(record.get_real(2), Some(3.5));
        assert_eq!(record.get_list(3).map(|l| l.len()), Some(1));
        assert!(record.get(4).is_none());
    }

    #[test]
    fn test_display_round_trip() {
        let content = "#5=IFCWALL('it''s',$,#3,(1,2.5),.T.,IFCBOOLEAN(.F.));";
        let registry = TypeRegistry::with_common_types();
        let mut skips = SkipLog::new();
        let record =
            read_line_record(content, &scan_first(content), &registry, &mut skips).unwrap();

        let written = record.to_string();
        let reread =
            read_line_record(&written, &scan_first(&written), &registry, &mut skips).unwrap();
        assert_eq!(record, reread);
    }

    #[test]
    fn test_reparse_after_reset_is_identical() {
        let mut cursor = TextCursor::new("'a',$,(#1,#2);");
        let mut skips = SkipLog::new();
        let first = build_line_record(3, "IFCWALL", &mut cursor, &mut skips);
        cursor.reset();
        let second = build_line_record(3, "IFCWALL", &mut cursor, &mut skips);
        assert_eq!(first, second);
    }
}
