use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::defs::RecordId;

/// Handle to an interned type in the project's type table.
///
/// Unlike `RecordId` (which names a record *declaration*), a `TypeId` names a
/// concrete use of a type: `Record(Box)` and `Box<Int>` are different ids.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    // Reserved ids, interned in this order by `TypeTable::new()`.

    /// Type not yet resolved, or resolution failed.
    pub const UNKNOWN: TypeId = TypeId(0);
    /// No value (a function without a return type).
    pub const UNIT: TypeId = TypeId(1);
    pub const INT: TypeId = TypeId(2);
    pub const STRING: TypeId = TypeId(3);

    /// First index handed out for non-reserved types.
    pub const FIRST_DYNAMIC: u32 = 4;

    pub(crate) fn from_index(index: usize) -> Self {
        TypeId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn is_unknown(self) -> bool {
        self == Self::UNKNOWN
    }

    #[inline]
    pub fn is_reserved(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }
}

/// Generic argument lists rarely exceed a handful of entries.
pub type TypeIdVec = SmallVec<[TypeId; 4]>;

/// A checked type. Equality is structural; the type table hash-conses on it.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum CheckedType {
    Unknown,
    Unit,
    Int,
    String,
    /// Nominal record type, without generic arguments.
    Record(RecordId),
    /// A record applied to (possibly partial) generic arguments: `Box<Int>`, `Pair<T, Int>`.
    GenericInstance(RecordId, TypeIdVec),
    /// An unbound generic parameter, by name.
    TypeVariable(SmolStr),
    RawPtr(TypeId),
}

impl CheckedType {
    pub fn is_type_variable(&self) -> bool {
        matches!(self, CheckedType::TypeVariable(_))
    }
}
