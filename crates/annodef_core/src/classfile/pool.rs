use crate::classfile::bytes::Cursor;
use crate::classfile::{ClassFileError, Result};

/// One constant pool entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
	/// Slot 0, or the second slot occupied by a `Long`/`Double`.
	Unusable,
	/// `CONSTANT_Utf8`, decoded from modified UTF-8.
	Utf8(Box<str>),
	/// `CONSTANT_Integer`; also backs `byte`, `char`, `short`, and `boolean` values.
	Integer(i32),
	/// `CONSTANT_Float`.
	Float(f32),
	/// `CONSTANT_Long`.
	Long(i64),
	/// `CONSTANT_Double`.
	Double(f64),
	/// `CONSTANT_Class`.
	Class {
		/// Utf8 index of the internal class name.
		name_index: u16,
	},
	/// `CONSTANT_String`.
	String {
		/// Utf8 index of the string contents.
		string_index: u16,
	},
	/// `CONSTANT_Fieldref`, `CONSTANT_Methodref`, or `CONSTANT_InterfaceMethodref`.
	MemberRef {
		/// Raw pool tag (9, 10, or 11).
		tag: u8,
		/// Class index of the owner.
		class_index: u16,
		/// NameAndType index of the member.
		name_and_type_index: u16,
	},
	/// `CONSTANT_NameAndType`.
	NameAndType {
		/// Utf8 index of the member name.
		name_index: u16,
		/// Utf8 index of the descriptor.
		descriptor_index: u16,
	},
	/// `CONSTANT_MethodHandle`.
	MethodHandle {
		/// Reference kind (1..=9).
		reference_kind: u8,
		/// Index of the referenced member.
		reference_index: u16,
	},
	/// `CONSTANT_MethodType`.
	MethodType {
		/// Utf8 index of the method descriptor.
		descriptor_index: u16,
	},
	/// `CONSTANT_Dynamic` or `CONSTANT_InvokeDynamic`.
	Dynamic {
		/// Raw pool tag (17 or 18).
		tag: u8,
		/// Index into the `BootstrapMethods` attribute.
		bootstrap_method_attr_index: u16,
		/// NameAndType index.
		name_and_type_index: u16,
	},
	/// `CONSTANT_Module`.
	Module {
		/// Utf8 index of the module name.
		name_index: u16,
	},
	/// `CONSTANT_Package`.
	Package {
		/// Utf8 index of the package name.
		name_index: u16,
	},
}

impl Constant {
	/// Short entry kind label used in diagnostics.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Unusable => "unusable",
			Self::Utf8(_) => "Utf8",
			Self::Integer(_) => "Integer",
			Self::Float(_) => "Float",
			Self::Long(_) => "Long",
			Self::Double(_) => "Double",
			Self::Class { .. } => "Class",
			Self::String { .. } => "String",
			Self::MemberRef { tag: 9, .. } => "Fieldref",
			Self::MemberRef { tag: 10, .. } => "Methodref",
			Self::MemberRef { .. } => "InterfaceMethodref",
			Self::NameAndType { .. } => "NameAndType",
			Self::MethodHandle { .. } => "MethodHandle",
			Self::MethodType { .. } => "MethodType",
			Self::Dynamic { tag: 17, .. } => "Dynamic",
			Self::Dynamic { .. } => "InvokeDynamic",
			Self::Module { .. } => "Module",
			Self::Package { .. } => "Package",
		}
	}
}

/// Parsed class-file constant pool with typed lookups.
#[derive(Debug, Clone, Default)]
pub struct ConstantPool {
	entries: Vec<Constant>,
}

impl ConstantPool {
	/// Parse `constant_pool_count` followed by the pool entries.
	pub fn parse(cursor: &mut Cursor<'_>) -> Result<Self> {
		let count = usize::from(cursor.read_u16()?);
		let mut entries = Vec::with_capacity(count.max(1));
		entries.push(Constant::Unusable);

		while entries.len() < count {
			let at = cursor.pos();
			let tag = cursor.read_u8()?;
			let entry = match tag {
				1 => {
					let len = usize::from(cursor.read_u16()?);
					Constant::Utf8(decode_modified_utf8(cursor.read_exact(len)?)?)
				}
				3 => Constant::Integer(cursor.read_i32()?),
				4 => Constant::Float(f32::from_bits(cursor.read_u32()?)),
				5 => Constant::Long(cursor.read_i64()?),
				6 => Constant::Double(f64::from_bits(cursor.read_i64()? as u64)),
				7 => Constant::Class { name_index: cursor.read_u16()? },
				8 => Constant::String { string_index: cursor.read_u16()? },
				9..=11 => Constant::MemberRef {
					tag,
					class_index: cursor.read_u16()?,
					name_and_type_index: cursor.read_u16()?,
				},
				12 => Constant::NameAndType {
					name_index: cursor.read_u16()?,
					descriptor_index: cursor.read_u16()?,
				},
				15 => Constant::MethodHandle {
					reference_kind: cursor.read_u8()?,
					reference_index: cursor.read_u16()?,
				},
				16 => Constant::MethodType {
					descriptor_index: cursor.read_u16()?,
				},
				17 | 18 => Constant::Dynamic {
					tag,
					bootstrap_method_attr_index: cursor.read_u16()?,
					name_and_type_index: cursor.read_u16()?,
				},
				19 => Constant::Module { name_index: cursor.read_u16()? },
				20 => Constant::Package { name_index: cursor.read_u16()? },
				_ => return Err(ClassFileError::UnknownConstantTag { tag, at }),
			};

			let wide = matches!(entry, Constant::Long(_) | Constant::Double(_));
			entries.push(entry);
			if wide {
				entries.push(Constant::Unusable);
			}
		}

		// A wide entry in the last slot spills one past the declared count.
		entries.truncate(count.max(1));
		Ok(Self { entries })
	}

	/// Build a pool from already-decoded entries; slot 0 is inserted automatically.
	pub fn from_entries(entries: impl IntoIterator<Item = Constant>) -> Self {
		let mut out = vec![Constant::Unusable];
		out.extend(entries);
		Self { entries: out }
	}

	/// Declared pool size, including the unusable slot 0.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// True when the pool holds no usable entries.
	pub fn is_empty(&self) -> bool {
		self.entries.len() <= 1
	}

	/// Look up a usable entry.
	pub fn get(&self, idx: u16) -> Result<&Constant> {
		match self.entries.get(usize::from(idx)) {
			Some(Constant::Unusable) | None => Err(ClassFileError::PoolIndexOutOfRange { idx, len: self.entries.len() }),
			Some(entry) => Ok(entry),
		}
	}

	/// Resolve a `CONSTANT_Utf8` entry.
	pub fn utf8(&self, idx: u16) -> Result<&str> {
		match self.get(idx)? {
			Constant::Utf8(text) => Ok(text),
			other => Err(mismatch(idx, "Utf8", other)),
		}
	}

	/// Resolve a `CONSTANT_Integer` entry.
	pub fn integer(&self, idx: u16) -> Result<i32> {
		match self.get(idx)? {
			Constant::Integer(value) => Ok(*value),
			other => Err(mismatch(idx, "Integer", other)),
		}
	}

	/// Resolve a `CONSTANT_Long` entry.
	pub fn long(&self, idx: u16) -> Result<i64> {
		match self.get(idx)? {
			Constant::Long(value) => Ok(*value),
			other => Err(mismatch(idx, "Long", other)),
		}
	}

	/// Resolve a `CONSTANT_Float` entry.
	pub fn float(&self, idx: u16) -> Result<f32> {
		match self.get(idx)? {
			Constant::Float(value) => Ok(*value),
			other => Err(mismatch(idx, "Float", other)),
		}
	}

	/// Resolve a `CONSTANT_Double` entry.
	pub fn double(&self, idx: u16) -> Result<f64> {
		match self.get(idx)? {
			Constant::Double(value) => Ok(*value),
			other => Err(mismatch(idx, "Double", other)),
		}
	}

	/// Resolve a `CONSTANT_Class` entry to its internal name.
	pub fn class_name(&self, idx: u16) -> Result<&str> {
		match self.get(idx)? {
			Constant::Class { name_index } => self.utf8(*name_index),
			other => Err(mismatch(idx, "Class", other)),
		}
	}
}

fn mismatch(idx: u16, expected: &'static str, got: &Constant) -> ClassFileError {
	ClassFileError::PoolEntryMismatch {
		idx,
		expected,
		got: got.kind(),
	}
}

/// Decode JVM modified UTF-8: `NUL` as `C0 80`, supplementary characters as surrogate pairs.
fn decode_modified_utf8(bytes: &[u8]) -> Result<Box<str>> {
	let mut units = Vec::with_capacity(bytes.len());
	let mut at = 0;
	while at < bytes.len() {
		let lead = bytes[at];
		let (unit, width) = match lead {
			0x01..=0x7f => (u16::from(lead), 1),
			0xc0..=0xdf => {
				let next = continuation(bytes, at + 1)?;
				((u16::from(lead & 0x1f) << 6) | next, 2)
			}
			0xe0..=0xef => {
				let mid = continuation(bytes, at + 1)?;
				let low = continuation(bytes, at + 2)?;
				((u16::from(lead & 0x0f) << 12) | (mid << 6) | low, 3)
			}
			_ => return Err(ClassFileError::BadModifiedUtf8 { at }),
		};
		units.push(unit);
		at += width;
	}

	Ok(String::from_utf16_lossy(&units).into_boxed_str())
}

fn continuation(bytes: &[u8], at: usize) -> Result<u16> {
	match bytes.get(at) {
		Some(byte) if byte & 0xc0 == 0x80 => Ok(u16::from(byte & 0x3f)),
		_ => Err(ClassFileError::BadModifiedUtf8 { at }),
	}
}

#[cfg(test)]
mod tests;
