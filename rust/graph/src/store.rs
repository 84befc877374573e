// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Line Store - Lazy id → record view over one file's content
//!
//! Indexes the content once up front, then parses instance lines on demand
//! and memoizes them behind `Arc`. One store serves one thread; clones of
//! the returned records are reference-counted, not copied.

use crate::error::{Error, Result};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use stepline_core::{
    build_line_index, build_line_record, LineIndex, LineRecord, SkipLog, TextCursor, TypeCode,
    TypeRegistry,
};

/// Lazy parsing store over borrowed file content
pub struct LineStore<'a> {
    content: &'a str,
    registry: TypeRegistry,
    index: LineIndex,
    /// Parsed records by id; Arc avoids expensive clones on cache hits
    cache: FxHashMap<u32, Arc<LineRecord>>,
    /// Recovered parse failures across every line read so far
    skips: SkipLog,
}

impl<'a> LineStore<'a> {
    /// Index `content` and start with an empty cache. Every type name the
    /// file carries is registered, on top of the common IFC4 seed set.
    pub fn new(content: &'a str) -> Self {
        let mut registry = TypeRegistry::with_common_types();
        let index = build_line_index(content, &mut registry);
        tracing::debug!(
            lines = index.len(),
            types = registry.len(),
            "Indexed model content"
        );
        Self {
            content,
            registry,
            index,
            cache: FxHashMap::default(),
            skips: SkipLog::new(),
        }
    }

    /// Parse the line with `id`, or return the memoized record.
    pub fn record(&mut self, id: u32) -> Result<Arc<LineRecord>> {
        if let Some(record) = self.cache.get(&id) {
            return Ok(Arc::clone(record));
        }
        let entry = *self.index.get(&id).ok_or(Error::LineNotFound(id))?;
        // Registered when the index was built
        let type_name = self.registry.type_name(entry.type_code).unwrap_or("");
        let mut cursor = TextCursor::new(&self.content[entry.args_offset..entry.end]);
        let record = Arc::new(build_line_record(
            id,
            type_name,
            &mut cursor,
            &mut self.skips,
        ));
        self.cache.insert(id, Arc::clone(&record));
        Ok(record)
    }

    /// Follow the reference argument at `index` of line `id`.
    ///
    /// An unset (`$`) or missing argument resolves to `None`; any other
    /// non-reference value is an error.
    pub fn resolve_ref(&mut self, id: u32, index: usize) -> Result<Option<Arc<LineRecord>>> {
        let record = self.record(id)?;
        match record.get(index) {
            None => Ok(None),
            Some(value) if value.is_null() => Ok(None),
            Some(value) => match value.as_entity_ref() {
                Some(ref_id) => Ok(Some(self.record(ref_id)?)),
                None => Err(Error::ExpectedRef { id, index }),
            },
        }
    }

    /// Follow every reference in the list argument at `index` of line `id`.
    /// The argument must be a list and every member a reference.
    pub fn resolve_ref_list(&mut self, id: u32, index: usize) -> Result<Vec<Arc<LineRecord>>> {
        let record = self.record(id)?;
        let list = record
            .get_list(index)
            .ok_or(Error::ExpectedList { id, index })?;
        let mut records = Vec::with_capacity(list.len());
        for member in list {
            match member.as_entity_ref() {
                Some(ref_id) => records.push(self.record(ref_id)?),
                None => return Err(Error::ExpectedRef { id, index }),
            }
        }
        Ok(records)
    }

    /// All line ids known to the index, unordered.
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.index.keys().copied()
    }

    /// Highest id the file carries, 0 for an empty file.
    pub fn max_id(&self) -> u32 {
        self.index.keys().copied().max().unwrap_or(0)
    }

    /// Number of instance lines in the file
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Type code of line `id` without parsing it
    pub fn line_type(&self, id: u32) -> Option<TypeCode> {
        self.index.get(&id).map(|entry| entry.type_code)
    }

    /// Canonical type name of line `id` without parsing it
    pub fn type_name_of(&self, id: u32) -> Option<&str> {
        self.line_type(id)
            .and_then(|code| self.registry.type_name(code))
    }

    /// Ids of every line of the named type, ascending. A name the registry
    /// has never seen is an error; a known type with no lines is empty.
    pub fn ids_of_type(&self, type_name: &str) -> Result<Vec<u32>> {
        let code = self
            .registry
            .type_code(type_name)
            .ok_or_else(|| stepline_core::Error::UnknownTypeName(type_name.to_string()))?;
        let mut ids: Vec<u32> = self
            .index
            .iter()
            .filter(|(_, entry)| entry.type_code == code)
            .map(|(&id, _)| id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    /// Parsed records of every line of the named type, ascending by id.
    pub fn records_of_type(&mut self, type_name: &str) -> Result<Vec<Arc<LineRecord>>> {
        let ids = self.ids_of_type(type_name)?;
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            records.push(self.record(id)?);
        }
        Ok(records)
    }

    /// The registry backing this store
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Recovered parse failures accumulated across all reads
    pub fn skips(&self) -> &SkipLog {
        &self.skips
    }

    /// Clear cache to free memory
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Get cache size
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepline_core::Value;

    const MODEL: &str = "\
#1=IFCPROJECT('3Gn$tItn90gf8nY4PKmZ5e',$,'Tower',$,$,$,$,(#10),#2);
#2=IFCSITE('0Kq2LWJzj7lOCnUrTpmYnX',$,'Site',$,$,#5,$,$,.ELEMENT.,$,$,0.,$,$);
#5=IFCLOCALPLACEMENT($,#7);
#7=IFCAXIS2PLACEMENT3D(#8,$,$);
#8=IFCCARTESIANPOINT((0.,0.,0.));
#9=IFCWALL('2um$kzpGv1wuo3k0P1Xc9g',$,'Wall',$,$,#5,$,$,.SOLIDWALL.);
#11=IFCRELAGGREGATES('1f8hLQGkXBeejp4Cq6sUQr',$,$,$,#1,(#2));
";

    #[test]
    fn test_record_and_memoization() {
        let mut store = LineStore::new(MODEL);
        let first = store.record(8).unwrap();
        let second = store.record(8).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.cache_size(), 1);
        assert_eq!(first.type_name, "IFCCARTESIANPOINT");
        assert_eq!(
            first.arguments,
            vec![Value::List(vec![
                Value::Real(0.0),
                Value::Real(0.0),
                Value::Real(0.0)
            ])]
        );
    }

    #[test]
    fn test_line_not_found() {
        let mut store = LineStore::new(MODEL);
        assert!(matches!(
            store.record(999).unwrap_err(),
            Error::LineNotFound(999)
        ));
    }

    #[test]
    fn test_resolve_ref() {
        let mut store = LineStore::new(MODEL);
        // Wall's placement is argument 5
        let placement = store.resolve_ref(9, 5).unwrap().unwrap();
        assert_eq!(placement.id, 5);
        assert_eq!(placement.type_name, "IFCLOCALPLACEMENT");
        // Unset argument resolves to None
        assert!(store.resolve_ref(9, 1).unwrap().is_none());
        // Non-reference argument is an error
        assert!(matches!(
            store.resolve_ref(9, 0).unwrap_err(),
            Error::ExpectedRef { id: 9, index: 0 }
        ));
    }

    #[test]
    fn test_resolve_ref_list() {
        let mut store = LineStore::new(MODEL);
        let related = store.resolve_ref_list(11, 5).unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].id, 2);
        assert!(matches!(
            store.resolve_ref_list(11, 0).unwrap_err(),
            Error::ExpectedList { id: 11, index: 0 }
        ));
    }

    #[test]
    fn test_ids_and_types() {
        let store = LineStore::new(MODEL);
        assert_eq!(store.len(), 7);
        assert_eq!(store.max_id(), 11);
        assert_eq!(store.type_name_of(9), Some("IFCWALL"));
        assert_eq!(store.ids_of_type("IfcWall").unwrap(), vec![9]);
        // Known type, no lines of it
        assert!(store.ids_of_type("IFCSLAB").unwrap().is_empty());
        // Name nobody ever registered
        assert!(matches!(
            store.ids_of_type("IFCWIDGET").unwrap_err(),
            Error::Core(stepline_core::Error::UnknownTypeName(_))
        ));
    }

    #[test]
    fn test_records_of_type() {
        let mut store = LineStore::new(MODEL);
        let walls = store.records_of_type("IFCWALL").unwrap();
        assert_eq!(walls.len(), 1);
        assert_eq!(walls[0].get_text(2), Some("Wall"));
    }

    #[test]
    fn test_skips_accumulate() {
        let content = "#1=IFCCARTESIANPOINT((1.2.3,4.));";
        let mut store = LineStore::new(content);
        store.record(1).unwrap();
        assert_eq!(store.skips().len(), 1);
    }

    #[test]
    fn test_clear_cache() {
        let mut store = LineStore::new(MODEL);
        store.record(1).unwrap();
        assert_eq!(store.cache_size(), 1);
        store.clear_cache();
        assert_eq!(store.cache_size(), 0);
    }
}
