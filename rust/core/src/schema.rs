//! Entity Type Registry
//!
//! Interns type names to dense codes so downstream tables key on a `u32`
//! instead of comparing strings. Pre-seeded with the common IFC4 entity
//! types; whatever else a file carries is registered on first sight.

use rustc_hash::FxHashMap;

/// Dense code assigned to an interned type name
pub type TypeCode = u32;

/// Common IFC4 entity types, seeded by [`TypeRegistry::with_common_types`]
const COMMON_TYPES: &[&str] = &[
    // Structural Elements
    "IFCWALL",
    "IFCWALLSTANDARDCASE",
    "IFCSLAB",
    "IFCBEAM",
    "IFCCOLUMN",
    "IFCROOF",
    "IFCSTAIR",
    "IFCRAILING",
    "IFCCURTAINWALL",
    "IFCPLATE",
    "IFCMEMBER",
    // Openings
    "IFCDOOR",
    "IFCWINDOW",
    "IFCOPENINGELEMENT",
    // Spaces
    "IFCSPACE",
    "IFCBUILDINGSTOREY",
    "IFCBUILDING",
    "IFCSITE",
    "IFCPROJECT",
    // Relationships
    "IFCRELAGGREGATES",
    "IFCRELCONTAINEDINSPATIALSTRUCTURE",
    "IFCRELDEFINESBYPROPERTIES",
    "IFCRELASSOCIATESMATERIAL",
    "IFCRELVOIDSELEMENT",
    "IFCRELFILLSELEMENT",
    // Properties
    "IFCPROPERTYSET",
    "IFCPROPERTYSINGLEVALUE",
    "IFCPROPERTYENUMERATEDVALUE",
    "IFCELEMENTQUANTITY",
    // Materials
    "IFCMATERIAL",
    "IFCMATERIALLAYER",
    "IFCMATERIALLAYERSET",
    "IFCMATERIALLAYERSETUSAGE",
    // Geometry
    "IFCSHAPEREPRESENTATION",
    "IFCPRODUCTDEFINITIONSHAPE",
    "IFCEXTRUDEDAREASOLID",
    "IFCAXIS2PLACEMENT3D",
    "IFCAXIS2PLACEMENT2D",
    "IFCLOCALPLACEMENT",
    "IFCCARTESIANPOINT",
    "IFCDIRECTION",
    "IFCPOLYLINE",
    "IFCARBITRARYCLOSEDPROFILEDEF",
    "IFCARBITRARYPROFILEDEFWITHVOIDS",
    "IFCRECTANGLEPROFILEDEF",
    "IFCCIRCLEPROFILEDEF",
    "IFCISHAPEPROFILEDEF",
    "IFCLSHAPEPROFILEDEF",
    "IFCUSHAPEPROFILEDEF",
    "IFCTSHAPEPROFILEDEF",
    "IFCCSHAPEPROFILEDEF",
    "IFCZSHAPEPROFILEDEF",
    "IFCCIRCLEHOLLOWPROFILEDEF",
    // Curve types
    "IFCINDEXEDPOLYCURVE",
    "IFCCOMPOSITECURVE",
    "IFCCOMPOSITECURVESEGMENT",
    "IFCTRIMMEDCURVE",
    "IFCCIRCLE",
    "IFCELLIPSE",
    "IFCLINE",
    // Points
    "IFCCARTESIANPOINTLIST2D",
    "IFCCARTESIANPOINTLIST3D",
    // MEP
    "IFCPIPESEGMENT",
    "IFCDUCTSEGMENT",
    "IFCCABLESEGMENT",
    // Furniture
    "IFCFURNISHINGELEMENT",
    "IFCFURNITURE",
    // Annotations
    "IFCANNOTATION",
    "IFCGRID",
    // Other common types
    "IFCOWNERHISTORY",
    "IFCPERSON",
    "IFCORGANIZATION",
    "IFCAPPLICATION",
];

/// Name ⇄ code interning table. Names are canonicalized to uppercase;
/// codes are dense and stable for the lifetime of the registry.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    names: Vec<String>,
    codes: FxHashMap<String, TypeCode>,
}

impl TypeRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            codes: FxHashMap::default(),
        }
    }

    /// Registry seeded with the common IFC4 entity types
    pub fn with_common_types() -> Self {
        let mut registry = Self {
            names: Vec::with_capacity(COMMON_TYPES.len()),
            codes: FxHashMap::with_capacity_and_hasher(COMMON_TYPES.len(), Default::default()),
        };
        for name in COMMON_TYPES {
            registry.register(name);
        }
        registry
    }

    /// Intern a name, returning its code. Idempotent; case-insensitive.
    pub fn register(&mut self, name: &str) -> TypeCode {
        let canonical = name.to_ascii_uppercase();
        if let Some(&code) = self.codes.get(&canonical) {
            return code;
        }
        let code = self.names.len() as TypeCode;
        self.names.push(canonical.clone());
        self.codes.insert(canonical, code);
        code
    }

    /// Look up a name, case-insensitive. `None` if never registered.
    pub fn type_code(&self, name: &str) -> Option<TypeCode> {
        if let Some(&code) = self.codes.get(name) {
            return Some(code);
        }
        // Files carry uppercase names, the fast path above covers them
        if name.bytes().any(|b| b.is_ascii_lowercase()) {
            return self.codes.get(&name.to_ascii_uppercase()).copied();
        }
        None
    }

    /// Canonical name for a code
    pub fn type_name(&self, code: TypeCode) -> Option<&str> {
        self.names.get(code as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_common_types()
    }
}
