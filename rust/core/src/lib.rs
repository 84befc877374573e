// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Stepline Core
//!
//! STEP physical file (ISO 10303-21) scanner and entity argument parser.
//! Rebuilds the positional argument list of instance lines like
//! `#12=IFCWALL('guid',$,#30,(1.,2.));` into typed values, skipping and
//! logging damaged arguments instead of failing the line.
//!
//! ## Overview
//!
//! - **Line Scanning**: SIMD-accelerated instance line discovery using
//!   [memchr](https://docs.rs/memchr), quote- and comment-aware
//! - **Token Cursor**: two-phase peek/take reader, swappable behind the
//!   [`TokenCursor`] trait
//! - **Argument Parsing**: recursive descent with positional nulls, nested
//!   lists and labeled aggregates preserved exactly
//! - **Recovery**: skip-and-log policy; one malformed payload costs one
//!   value, never the line or the file
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepline_core::{read_line_record, LineScanner, SkipLog, TypeRegistry};
//!
//! let content = "#12=IFCWALL('2O2Fr$t4X7Zf8NOew3FNr2',$,'South wall',$,$,#30,#45,$,.SOLIDWALL.);";
//! let registry = TypeRegistry::with_common_types();
//! let mut skips = SkipLog::new();
//!
//! let mut scanner = LineScanner::new(content);
//! while let Some(line) = scanner.next_line() {
//!     let record = read_line_record(content, &line, &registry, &mut skips)?;
//!     println!("#{} {} with {} arguments", record.id, record.type_name, record.arguments.len());
//! }
//! ```
//!
//! ## Performance
//!
//! - **Line scanning**: single O(n) pass, byte-level with [memchr](https://docs.rs/memchr)
//! - **Number parsing**: [fast-float](https://docs.rs/fast-float) and
//!   [lexical-core](https://docs.rs/lexical-core) instead of std
//! - **Payload decoding**: deferred until a `take_*` read asks for it
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for parsed data

pub mod cursor;
pub mod error;
pub mod parser;
pub mod record;
pub mod scan;
pub mod schema;
pub mod strings;
pub mod token;
pub mod value;

pub use cursor::TextCursor;
pub use error::{Error, Result};
pub use parser::{parse_arguments, parse_nested_list, SkipLog, SkippedToken};
pub use record::{build_line_record, read_line_record, LineRecord};
pub use scan::{build_line_index, IndexedLine, LineIndex, LineScanner, ScannedLine};
pub use schema::{TypeCode, TypeRegistry};
pub use strings::{decode_string, encode_string};
pub use token::{TokenCursor, TokenKind};
pub use value::Value;
