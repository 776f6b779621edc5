use std::fmt;

use crate::classfile::bytes::Cursor;
use crate::classfile::{ClassFileError, Result};

const MAX_DEPTH: u32 = 64;

/// Element-value tag, stored on disk as its ASCII character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
	/// `B`
	Byte,
	/// `C`
	Char,
	/// `D`
	Double,
	/// `F`
	Float,
	/// `I`
	Int,
	/// `J`
	Long,
	/// `S`
	Short,
	/// `Z`
	Boolean,
	/// `s`
	String,
	/// `e`
	EnumClass,
	/// `c`
	Class,
	/// `@`
	Annotation,
	/// `[`
	Array,
}

impl Tag {
	/// Every tag, in format table order.
	pub const ALL: [Tag; 13] = [
		Tag::Byte,
		Tag::Char,
		Tag::Double,
		Tag::Float,
		Tag::Int,
		Tag::Long,
		Tag::Short,
		Tag::Boolean,
		Tag::String,
		Tag::EnumClass,
		Tag::Class,
		Tag::Annotation,
		Tag::Array,
	];

	/// Tag character as written in the class file.
	pub fn as_char(self) -> char {
		match self {
			Tag::Byte => 'B',
			Tag::Char => 'C',
			Tag::Double => 'D',
			Tag::Float => 'F',
			Tag::Int => 'I',
			Tag::Long => 'J',
			Tag::Short => 'S',
			Tag::Boolean => 'Z',
			Tag::String => 's',
			Tag::EnumClass => 'e',
			Tag::Class => 'c',
			Tag::Annotation => '@',
			Tag::Array => '[',
		}
	}

	/// Map a tag character back to its tag.
	pub fn from_char(ch: char) -> Option<Tag> {
		Tag::ALL.into_iter().find(|tag| tag.as_char() == ch)
	}

	/// Lowercase element kind name used in diagnostics.
	pub fn name(self) -> &'static str {
		match self {
			Tag::Byte => "byte",
			Tag::Char => "char",
			Tag::Double => "double",
			Tag::Float => "float",
			Tag::Int => "int",
			Tag::Long => "long",
			Tag::Short => "short",
			Tag::Boolean => "boolean",
			Tag::String => "string",
			Tag::EnumClass => "enum_class",
			Tag::Class => "class",
			Tag::Annotation => "annotation",
			Tag::Array => "array",
		}
	}
}

impl fmt::Display for Tag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {}", self.as_char(), self.name())
	}
}

/// Tags whose payload is a single constant pool reference to a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstTag {
	/// `B`
	Byte,
	/// `C`
	Char,
	/// `D`
	Double,
	/// `F`
	Float,
	/// `I`
	Int,
	/// `J`
	Long,
	/// `S`
	Short,
	/// `Z`
	Boolean,
	/// `s`
	String,
}

impl ConstTag {
	/// Widen to the full tag set.
	pub fn tag(self) -> Tag {
		match self {
			ConstTag::Byte => Tag::Byte,
			ConstTag::Char => Tag::Char,
			ConstTag::Double => Tag::Double,
			ConstTag::Float => Tag::Float,
			ConstTag::Int => Tag::Int,
			ConstTag::Long => Tag::Long,
			ConstTag::Short => Tag::Short,
			ConstTag::Boolean => Tag::Boolean,
			ConstTag::String => Tag::String,
		}
	}

	/// Narrow a tag to its literal kind; `None` for composite tags.
	pub fn from_tag(tag: Tag) -> Option<ConstTag> {
		Some(match tag {
			Tag::Byte => ConstTag::Byte,
			Tag::Char => ConstTag::Char,
			Tag::Double => ConstTag::Double,
			Tag::Float => ConstTag::Float,
			Tag::Int => ConstTag::Int,
			Tag::Long => ConstTag::Long,
			Tag::Short => ConstTag::Short,
			Tag::Boolean => ConstTag::Boolean,
			Tag::String => ConstTag::String,
			Tag::EnumClass | Tag::Class | Tag::Annotation | Tag::Array => return None,
		})
	}
}

/// Recursive element-value tree.
///
/// `L` is the leaf type: a constant pool index (`u16`) for trees decoded from a
/// class file, or expectation text for trees built from an expectation document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element<L> {
	/// Primitive or string literal.
	Const {
		/// Literal kind.
		tag: ConstTag,
		/// Literal leaf.
		value: L,
	},
	/// Enum constant.
	Enum {
		/// Enum type descriptor leaf.
		type_name: L,
		/// Constant simple-name leaf.
		const_name: L,
	},
	/// Class literal; a return descriptor, never a loaded type.
	Class(L),
	/// Nested annotation.
	Annotation(Annotation<L>),
	/// Ordered array of values.
	Array(Vec<Element<L>>),
}

/// Annotation body: type descriptor plus named element values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation<L> {
	/// Annotation type descriptor leaf.
	pub type_name: L,
	/// Element-value pairs in encoded order.
	pub pairs: Vec<Pair<L>>,
}

/// One named element value inside an annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair<L> {
	/// Element name leaf.
	pub name: L,
	/// Element value.
	pub value: Element<L>,
}

/// What a leaf stands for, handed to [`Element::try_map`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafRole {
	/// Literal of the given kind.
	Const(ConstTag),
	/// Enum type descriptor.
	EnumType,
	/// Enum constant name.
	EnumConst,
	/// Class literal descriptor.
	ClassDescriptor,
	/// Annotation type descriptor.
	AnnotationType,
	/// Annotation element name.
	PairName,
}

/// Element-value tree decoded from a class file; leaves are constant pool indices.
pub type ElementValue = Element<u16>;

impl<L> Element<L> {
	/// Tag implied by the variant.
	pub fn tag(&self) -> Tag {
		match self {
			Element::Const { tag, .. } => tag.tag(),
			Element::Enum { .. } => Tag::EnumClass,
			Element::Class(_) => Tag::Class,
			Element::Annotation(_) => Tag::Annotation,
			Element::Array(_) => Tag::Array,
		}
	}

	/// Rebuild the tree with every leaf converted by `f`, stopping at the first error.
	pub fn try_map<M, E>(&self, f: &mut impl FnMut(LeafRole, &L) -> std::result::Result<M, E>) -> std::result::Result<Element<M>, E> {
		Ok(match self {
			Element::Const { tag, value } => Element::Const {
				tag: *tag,
				value: f(LeafRole::Const(*tag), value)?,
			},
			Element::Enum { type_name, const_name } => Element::Enum {
				type_name: f(LeafRole::EnumType, type_name)?,
				const_name: f(LeafRole::EnumConst, const_name)?,
			},
			Element::Class(descriptor) => Element::Class(f(LeafRole::ClassDescriptor, descriptor)?),
			Element::Annotation(annotation) => Element::Annotation(annotation.try_map(f)?),
			Element::Array(items) => {
				let mut out = Vec::with_capacity(items.len());
				for item in items {
					out.push(item.try_map(f)?);
				}
				Element::Array(out)
			}
		})
	}
}

impl<L> Annotation<L> {
	fn try_map<M, E>(&self, f: &mut impl FnMut(LeafRole, &L) -> std::result::Result<M, E>) -> std::result::Result<Annotation<M>, E> {
		let type_name = f(LeafRole::AnnotationType, &self.type_name)?;
		let mut pairs = Vec::with_capacity(self.pairs.len());
		for pair in &self.pairs {
			pairs.push(Pair {
				name: f(LeafRole::PairName, &pair.name)?,
				value: pair.value.try_map(f)?,
			});
		}
		Ok(Annotation { type_name, pairs })
	}
}

impl ElementValue {
	/// Decode one `element_value` structure, tag byte included.
	pub fn parse(cursor: &mut Cursor<'_>) -> Result<Self> {
		parse_element(cursor, 0)
	}
}

fn parse_element(cursor: &mut Cursor<'_>, depth: u32) -> Result<ElementValue> {
	if depth >= MAX_DEPTH {
		return Err(ClassFileError::ElementDepthExceeded { max_depth: MAX_DEPTH });
	}

	let at = cursor.pos();
	let raw = cursor.read_u8()?;
	let tag = Tag::from_char(char::from(raw)).ok_or(ClassFileError::UnknownElementTag { tag: raw, at })?;

	if let Some(tag) = ConstTag::from_tag(tag) {
		return Ok(Element::Const {
			tag,
			value: cursor.read_u16()?,
		});
	}

	Ok(match tag {
		Tag::EnumClass => Element::Enum {
			type_name: cursor.read_u16()?,
			const_name: cursor.read_u16()?,
		},
		Tag::Class => Element::Class(cursor.read_u16()?),
		Tag::Annotation => Element::Annotation(parse_annotation(cursor, depth)?),
		Tag::Array => {
			let count = usize::from(cursor.read_u16()?);
			let mut items = Vec::with_capacity(count);
			for _ in 0..count {
				items.push(parse_element(cursor, depth + 1)?);
			}
			Element::Array(items)
		}
		// Constant tags returned above.
		_ => return Err(ClassFileError::UnknownElementTag { tag: raw, at }),
	})
}

fn parse_annotation(cursor: &mut Cursor<'_>, depth: u32) -> Result<Annotation<u16>> {
	let type_name = cursor.read_u16()?;
	let count = usize::from(cursor.read_u16()?);
	let mut pairs = Vec::with_capacity(count);
	for _ in 0..count {
		let name = cursor.read_u16()?;
		let value = parse_element(cursor, depth + 1)?;
		pairs.push(Pair { name, value });
	}
	Ok(Annotation { type_name, pairs })
}
