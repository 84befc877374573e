// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Stepline Graph
//!
//! Lazy line store and spatial relationship graph over `stepline-core`.
//!
//! [`LineStore`] keeps the raw file content plus its line index and parses
//! individual lines on first access, memoizing the results behind `Arc`.
//! [`ModelGraph`] walks the aggregation and containment relationships of a
//! stored model and exposes them as a queryable directed graph, together
//! with the model's property sets.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepline_graph::{LineStore, ModelGraph};
//!
//! let content = std::fs::read_to_string("model.ifc")?;
//! let mut store = LineStore::new(&content);
//! let graph = ModelGraph::build(&mut store);
//!
//! for root in graph.source_ids() {
//!     println!("root #{root} relates {:?}", graph.related_ids(root));
//! }
//! ```

pub mod error;
pub mod graph;
pub mod store;

pub use error::{Error, Result};
pub use graph::{ModelGraph, PropSet, Relation};
pub use store::LineStore;
