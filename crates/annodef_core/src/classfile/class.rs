use std::path::Path;

use crate::classfile::bytes::Cursor;
use crate::classfile::{ClassFileError, ConstantPool, Result};

const MAGIC: u32 = 0xCAFE_BABE;

/// Raw attribute: name index plus undecoded `info` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeInfo {
	/// Utf8 index of the attribute name.
	pub name_index: u16,
	/// Attribute payload; its length is the declared `attribute_length`.
	pub info: Vec<u8>,
}

impl AttributeInfo {
	fn parse(cursor: &mut Cursor<'_>) -> Result<Self> {
		let name_index = cursor.read_u16()?;
		let len = cursor.read_u32()? as usize;
		let info = cursor.read_exact(len)?.to_vec();
		Ok(Self { name_index, info })
	}

	/// Declared `attribute_length` field.
	pub fn declared_length(&self) -> u32 {
		// `parse` read at most `u32::MAX` bytes.
		self.info.len() as u32
	}

	/// Resolve the attribute name.
	pub fn name<'p>(&self, pool: &'p ConstantPool) -> Result<&'p str> {
		pool.utf8(self.name_index)
	}
}

/// Field or method declaration with its attribute table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
	/// Access flag bits.
	pub access_flags: u16,
	/// Utf8 index of the member name.
	pub name_index: u16,
	/// Utf8 index of the member descriptor.
	pub descriptor_index: u16,
	/// Attributes in declaration order.
	pub attributes: Vec<AttributeInfo>,
}

impl MemberInfo {
	fn parse(cursor: &mut Cursor<'_>) -> Result<Self> {
		let access_flags = cursor.read_u16()?;
		let name_index = cursor.read_u16()?;
		let descriptor_index = cursor.read_u16()?;
		let attributes = parse_attributes(cursor)?;
		Ok(Self {
			access_flags,
			name_index,
			descriptor_index,
			attributes,
		})
	}

	/// Resolve the member name.
	pub fn name<'p>(&self, pool: &'p ConstantPool) -> Result<&'p str> {
		pool.utf8(self.name_index)
	}

	/// Resolve the member descriptor.
	pub fn descriptor<'p>(&self, pool: &'p ConstantPool) -> Result<&'p str> {
		pool.utf8(self.descriptor_index)
	}

	/// Attributes whose name resolves to `name`; unresolvable names are skipped.
	pub fn attributes_named<'a>(&'a self, pool: &'a ConstantPool, name: &'a str) -> impl Iterator<Item = &'a AttributeInfo> + 'a {
		self.attributes.iter().filter(move |attr| attr.name(pool).is_ok_and(|item| item == name))
	}
}

/// Minimal structural view of a compiled class file.
#[derive(Debug, Clone)]
pub struct ClassFile {
	/// Minor format version.
	pub minor_version: u16,
	/// Major format version.
	pub major_version: u16,
	/// Constant pool.
	pub pool: ConstantPool,
	/// Class access flag bits.
	pub access_flags: u16,
	/// Class index of this class.
	pub this_class: u16,
	/// Class index of the superclass, or 0.
	pub super_class: u16,
	/// Class indices of direct superinterfaces.
	pub interfaces: Vec<u16>,
	/// Declared fields.
	pub fields: Vec<MemberInfo>,
	/// Declared methods.
	pub methods: Vec<MemberInfo>,
	/// Class-level attributes.
	pub attributes: Vec<AttributeInfo>,
}

impl ClassFile {
	/// Read and parse a class file from disk.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let bytes = std::fs::read(path)?;
		Self::parse(&bytes)
	}

	/// Parse a class file from memory. Trailing bytes after the attribute table are ignored.
	pub fn parse(bytes: &[u8]) -> Result<Self> {
		let mut cursor = Cursor::new(bytes);

		let magic = cursor.read_u32()?;
		if magic != MAGIC {
			return Err(ClassFileError::BadMagic { magic });
		}

		let minor_version = cursor.read_u16()?;
		let major_version = cursor.read_u16()?;
		let pool = ConstantPool::parse(&mut cursor)?;
		let access_flags = cursor.read_u16()?;
		let this_class = cursor.read_u16()?;
		let super_class = cursor.read_u16()?;

		let interface_count = usize::from(cursor.read_u16()?);
		let mut interfaces = Vec::with_capacity(interface_count);
		for _ in 0..interface_count {
			interfaces.push(cursor.read_u16()?);
		}

		let fields = parse_members(&mut cursor)?;
		let methods = parse_members(&mut cursor)?;
		let attributes = parse_attributes(&mut cursor)?;

		Ok(Self {
			minor_version,
			major_version,
			pool,
			access_flags,
			this_class,
			super_class,
			interfaces,
			fields,
			methods,
			attributes,
		})
	}

	/// Resolve this class's internal name.
	pub fn class_name(&self) -> Result<&str> {
		self.pool.class_name(self.this_class)
	}
}

fn parse_members(cursor: &mut Cursor<'_>) -> Result<Vec<MemberInfo>> {
	let count = usize::from(cursor.read_u16()?);
	let mut out = Vec::with_capacity(count);
	for _ in 0..count {
		out.push(MemberInfo::parse(cursor)?);
	}
	Ok(out)
}

fn parse_attributes(cursor: &mut Cursor<'_>) -> Result<Vec<AttributeInfo>> {
	let count = usize::from(cursor.read_u16()?);
	let mut out = Vec::with_capacity(count);
	for _ in 0..count {
		out.push(AttributeInfo::parse(cursor)?);
	}
	Ok(out)
}

#[cfg(test)]
mod tests;
