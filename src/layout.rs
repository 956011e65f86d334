//! In-memory layout reflection for plain-data composites.
//!
//! `#[derive(Reflect)]` reports a struct's field count and, per field, the byte offset
//! the compiler actually chose (`core::mem::offset_of!`) together with the field's size
//! and alignment. The wire format never depends on these numbers; they exist so callers
//! can check that a type's memory image matches an external C definition.

/// One field of a composite's in-memory layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Field {
    /// Field name; tuple fields use their index (`"0"`, `"1"`, ...).
    pub name: &'static str,
    /// Byte offset from the start of the composite.
    pub offset: usize,
    /// `size_of` the field's type.
    pub size: usize,
    /// `align_of` the field's type.
    pub align: usize,
}

/// Ordered field layout of a composite, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    fields: Vec<Field>,
}

impl Layout {
    /// Builds a layout from fields listed in declaration order.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `true` for a composite without fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks a field up by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Byte offsets in declaration order.
    pub fn offsets(&self) -> Vec<usize> {
        self.fields.iter().map(|f| f.offset).collect()
    }

    /// Offsets the C layout rules would assign to these fields: align the running
    /// cursor up to each field's alignment, record it, advance by the field's size.
    pub fn natural_offsets(&self) -> Vec<usize> {
        let mut cursor = 0usize;
        self.fields
            .iter()
            .map(|f| {
                cursor = cursor.next_multiple_of(f.align.max(1));
                let offset = cursor;
                cursor += f.size;
                offset
            })
            .collect()
    }

    /// `true` when every field sits where [`Layout::natural_offsets`] puts it, which is
    /// guaranteed for `#[repr(C)]` types.
    pub fn is_natural(&self) -> bool {
        self.offsets() == self.natural_offsets()
    }
}

/// Compile-time field enumeration, implemented by `#[derive(Reflect)]`.
pub trait Reflect {
    /// Number of fields, skipped ones included.
    const FIELD_COUNT: usize;

    /// The layout of `Self` on the current target.
    fn layout() -> Layout;
}
