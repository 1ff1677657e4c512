// Deduplicated storage of every type the checker knows about.
//
// Types are addressed by `TypeId`. `find_or_add` hash-conses: structurally
// equal types share one id. `push` always appends, for declarations that need
// an identity of their own (a record's nominal type, each generic parameter).

use std::ops::Index;

use rustc_hash::FxHashMap;

use crate::types::{CheckedType, TypeId};

pub struct TypeTable {
    types: Vec<CheckedType>,
    intern_map: FxHashMap<CheckedType, TypeId>,
}

impl std::fmt::Debug for TypeTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeTable")
            .field("types_count", &self.types.len())
            .finish_non_exhaustive()
    }
}

impl TypeTable {
    /// Create a table with the reserved types interned at their fixed ids.
    pub fn new() -> Self {
        let mut table = Self {
            types: Vec::new(),
            intern_map: FxHashMap::default(),
        };

        let unknown = table.find_or_add(CheckedType::Unknown);
        debug_assert_eq!(unknown, TypeId::UNKNOWN);
        let unit = table.find_or_add(CheckedType::Unit);
        debug_assert_eq!(unit, TypeId::UNIT);
        let int = table.find_or_add(CheckedType::Int);
        debug_assert_eq!(int, TypeId::INT);
        let string = table.find_or_add(CheckedType::String);
        debug_assert_eq!(string, TypeId::STRING);

        table
    }

    /// Return the id of a structurally equal type, interning `ty` if it is new.
    pub fn find_or_add(&mut self, ty: CheckedType) -> TypeId {
        if let Some(&id) = self.intern_map.get(&ty) {
            return id;
        }
        let id = TypeId::from_index(self.types.len());
        tracing::trace!(?ty, ?id, "interned type");
        self.types.push(ty.clone());
        self.intern_map.insert(ty, id);
        id
    }

    /// Append `ty` under a fresh id even if an equal type already exists.
    /// The first id stays the canonical one for `find_or_add`.
    pub fn push(&mut self, ty: CheckedType) -> TypeId {
        let id = TypeId::from_index(self.types.len());
        self.types.push(ty.clone());
        self.intern_map.entry(ty).or_insert(id);
        id
    }

    pub fn get(&self, id: TypeId) -> &CheckedType {
        &self.types[id.index()]
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &CheckedType)> {
        self.types
            .iter()
            .enumerate()
            .map(|(index, ty)| (TypeId::from_index(index), ty))
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<TypeId> for TypeTable {
    type Output = CheckedType;

    fn index(&self, id: TypeId) -> &CheckedType {
        self.get(id)
    }
}
