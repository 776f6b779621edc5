use crate::classfile::bytes::Cursor;
use crate::classfile::{AttributeInfo, ElementValue, Result};

/// Attribute name the compiler uses for annotation element defaults.
pub const ANNOTATION_DEFAULT: &str = "AnnotationDefault";

/// Decoded `AnnotationDefault` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationDefault {
	/// Utf8 index of the attribute name.
	pub name_index: u16,
	/// `attribute_length` as encoded, not recomputed.
	pub declared_length: u32,
	/// Root default value.
	pub value: ElementValue,
}

impl AnnotationDefault {
	/// Decode the root element value from a raw attribute.
	///
	/// Bytes left over after the value are not an error here; they surface as a
	/// length mismatch during reconciliation.
	pub fn parse(attr: &AttributeInfo) -> Result<Self> {
		let mut cursor = Cursor::new(&attr.info);
		let value = ElementValue::parse(&mut cursor)?;
		Ok(Self {
			name_index: attr.name_index,
			declared_length: attr.declared_length(),
			value,
		})
	}
}
