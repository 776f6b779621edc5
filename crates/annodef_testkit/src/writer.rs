use std::collections::HashMap;

use serde_json::{Value, json};

const ACC_ANNOTATION_INTERFACE: u16 = 0x2601;
const ACC_PUBLIC_ABSTRACT: u16 = 0x0401;

/// Default-value literal, written into the pool the way a compiler would.
#[derive(Debug, Clone, PartialEq)]
pub enum Lit {
	/// `byte`
	Byte(i8),
	/// `char`
	Char(char),
	/// `double`
	Double(f64),
	/// `float`
	Float(f32),
	/// `int`
	Int(i32),
	/// `long`
	Long(i64),
	/// `short`
	Short(i16),
	/// `boolean`
	Bool(bool),
	/// `String`
	Str(String),
	/// Enum constant: type descriptor plus constant name.
	Enum(String, String),
	/// Class literal descriptor.
	Class(String),
	/// Nested annotation: type descriptor plus named values.
	Annotation(String, Vec<(String, Lit)>),
	/// Array of values.
	Array(Vec<Lit>),
}

impl Lit {
	/// Element-value tag character.
	pub fn tag(&self) -> char {
		match self {
			Lit::Byte(_) => 'B',
			Lit::Char(_) => 'C',
			Lit::Double(_) => 'D',
			Lit::Float(_) => 'F',
			Lit::Int(_) => 'I',
			Lit::Long(_) => 'J',
			Lit::Short(_) => 'S',
			Lit::Bool(_) => 'Z',
			Lit::Str(_) => 's',
			Lit::Enum(..) => 'e',
			Lit::Class(_) => 'c',
			Lit::Annotation(..) => '@',
			Lit::Array(_) => '[',
		}
	}

	/// Expectation spec (`{"tag", "values"}`) this literal satisfies.
	pub fn spec_json(&self) -> Value {
		let values: Vec<Value> = match self {
			Lit::Byte(value) => vec![json!(value.to_string())],
			Lit::Char(value) => vec![json!(value.to_string())],
			Lit::Double(value) => vec![json!(value.to_string())],
			Lit::Float(value) => vec![json!(value.to_string())],
			Lit::Int(value) => vec![json!(value.to_string())],
			Lit::Long(value) => vec![json!(value.to_string())],
			Lit::Short(value) => vec![json!(value.to_string())],
			Lit::Bool(value) => vec![json!(value.to_string())],
			Lit::Str(value) | Lit::Class(value) => vec![json!(value)],
			Lit::Enum(type_name, const_name) => vec![json!(type_name), json!(const_name)],
			Lit::Annotation(type_name, pairs) => std::iter::once(json!(type_name))
				.chain(pairs.iter().map(|(name, value)| json!({ "name": name, "value": value.spec_json() })))
				.collect(),
			Lit::Array(items) => items.iter().map(Lit::spec_json).collect(),
		};
		json!({ "tag": self.tag().to_string(), "values": values })
	}

	fn descriptor(&self) -> String {
		match self {
			Lit::Byte(_) => "B".to_owned(),
			Lit::Char(_) => "C".to_owned(),
			Lit::Double(_) => "D".to_owned(),
			Lit::Float(_) => "F".to_owned(),
			Lit::Int(_) => "I".to_owned(),
			Lit::Long(_) => "J".to_owned(),
			Lit::Short(_) => "S".to_owned(),
			Lit::Bool(_) => "Z".to_owned(),
			Lit::Str(_) => "Ljava/lang/String;".to_owned(),
			Lit::Class(_) => "Ljava/lang/Class;".to_owned(),
			Lit::Enum(type_name, _) | Lit::Annotation(type_name, _) => type_name.clone(),
			Lit::Array(items) => format!("[{}", items.first().map_or_else(|| "I".to_owned(), Lit::descriptor)),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum PoolKey {
	Utf8(String),
	Int(i32),
	Float(u32),
	Long(i64),
	Double(u64),
	Class(String),
}

#[derive(Debug, Default)]
struct PoolWriter {
	bytes: Vec<u8>,
	next: u16,
	index: HashMap<PoolKey, u16>,
}

impl PoolWriter {
	fn intern(&mut self, key: PoolKey) -> u16 {
		if let Some(idx) = self.index.get(&key) {
			return *idx;
		}
		if self.next == 0 {
			self.next = 1;
		}

		let idx = self.next;
		let mut slots = 1;
		match &key {
			PoolKey::Utf8(text) => {
				let encoded = modified_utf8(text);
				self.bytes.push(1);
				self.bytes.extend_from_slice(&(encoded.len() as u16).to_be_bytes());
				self.bytes.extend_from_slice(&encoded);
			}
			PoolKey::Int(value) => {
				self.bytes.push(3);
				self.bytes.extend_from_slice(&value.to_be_bytes());
			}
			PoolKey::Float(bits) => {
				self.bytes.push(4);
				self.bytes.extend_from_slice(&bits.to_be_bytes());
			}
			PoolKey::Long(value) => {
				self.bytes.push(5);
				self.bytes.extend_from_slice(&value.to_be_bytes());
				slots = 2;
			}
			PoolKey::Double(bits) => {
				self.bytes.push(6);
				self.bytes.extend_from_slice(&bits.to_be_bytes());
				slots = 2;
			}
			PoolKey::Class(name) => {
				let name_index = self.intern(PoolKey::Utf8(name.clone()));
				// The nested intern may have advanced the cursor.
				let idx = self.next;
				self.bytes.push(7);
				self.bytes.extend_from_slice(&name_index.to_be_bytes());
				self.next = idx + 1;
				self.index.insert(key, idx);
				return idx;
			}
		}

		self.next = idx + slots;
		self.index.insert(key, idx);
		idx
	}
}

fn modified_utf8(text: &str) -> Vec<u8> {
	let mut out = Vec::with_capacity(text.len());
	for unit in text.encode_utf16() {
		match unit {
			0x0001..=0x007f => out.push(unit as u8),
			0x0000 | 0x0080..=0x07ff => {
				out.push(0xc0 | (unit >> 6) as u8);
				out.push(0x80 | (unit & 0x3f) as u8);
			}
			_ => {
				out.push(0xe0 | (unit >> 12) as u8);
				out.push(0x80 | ((unit >> 6) & 0x3f) as u8);
				out.push(0x80 | (unit & 0x3f) as u8);
			}
		}
	}
	out
}

#[derive(Debug)]
struct MethodEntry {
	name: String,
	name_index: u16,
	descriptor_index: u16,
	attributes: Vec<(u16, Vec<u8>)>,
	default: Option<Lit>,
}

/// Builder for an annotation-interface class file, standing in for a compiler.
#[derive(Debug)]
pub struct ClassWriter {
	pool: PoolWriter,
	this_class: u16,
	super_class: u16,
	interface: u16,
	methods: Vec<MethodEntry>,
}

impl ClassWriter {
	/// Start an annotation interface with internal name `name`.
	pub fn annotation_interface(name: &str) -> Self {
		let mut pool = PoolWriter::default();
		let this_class = pool.intern(PoolKey::Class(name.to_owned()));
		let super_class = pool.intern(PoolKey::Class("java/lang/Object".to_owned()));
		let interface = pool.intern(PoolKey::Class("java/lang/annotation/Annotation".to_owned()));
		Self {
			pool,
			this_class,
			super_class,
			interface,
			methods: Vec::new(),
		}
	}

	/// Declare an element with a default value.
	pub fn element(mut self, name: &str, default: Lit) -> Self {
		let attr_name = self.utf8("AnnotationDefault");
		let info = self.encode(&default);
		let descriptor = format!("(){}", default.descriptor());
		self.push_method(name, &descriptor, vec![(attr_name, info)], Some(default));
		self
	}

	/// Declare an element without a default clause.
	pub fn element_without_default(mut self, name: &str, descriptor: &str) -> Self {
		self.push_method(name, descriptor, Vec::new(), None);
		self
	}

	/// Declare an element carrying hand-written attributes, as `(name, info)` pairs.
	pub fn element_with_attributes(mut self, name: &str, descriptor: &str, attributes: Vec<(&str, Vec<u8>)>) -> Self {
		let attributes = attributes.into_iter().map(|(attr, info)| (self.utf8(attr), info)).collect();
		self.push_method(name, descriptor, attributes, None);
		self
	}

	/// Intern a Utf8 constant and return its index, for hand-written attributes.
	pub fn utf8(&mut self, text: &str) -> u16 {
		self.pool.intern(PoolKey::Utf8(text.to_owned()))
	}

	/// Intern an Integer constant and return its index.
	pub fn int(&mut self, value: i32) -> u16 {
		self.pool.intern(PoolKey::Int(value))
	}

	/// Encode a literal as an `element_value`, interning its constants.
	pub fn encode(&mut self, lit: &Lit) -> Vec<u8> {
		let mut out = Vec::new();
		self.encode_into(lit, &mut out);
		out
	}

	fn encode_into(&mut self, lit: &Lit, out: &mut Vec<u8>) {
		out.push(lit.tag() as u8);
		let index = match lit {
			Lit::Byte(value) => self.int(i32::from(*value)),
			Lit::Char(value) => {
				let mut units = [0_u16; 2];
				let unit = value.encode_utf16(&mut units)[0];
				self.int(i32::from(unit))
			}
			Lit::Short(value) => self.int(i32::from(*value)),
			Lit::Bool(value) => self.int(i32::from(*value)),
			Lit::Int(value) => self.int(*value),
			Lit::Long(value) => self.pool.intern(PoolKey::Long(*value)),
			Lit::Float(value) => self.pool.intern(PoolKey::Float(value.to_bits())),
			Lit::Double(value) => self.pool.intern(PoolKey::Double(value.to_bits())),
			Lit::Str(value) | Lit::Class(value) => self.utf8(value),
			Lit::Enum(type_name, const_name) => {
				let type_index = self.utf8(type_name);
				let const_index = self.utf8(const_name);
				out.extend_from_slice(&type_index.to_be_bytes());
				out.extend_from_slice(&const_index.to_be_bytes());
				return;
			}
			Lit::Annotation(type_name, pairs) => {
				let type_index = self.utf8(type_name);
				out.extend_from_slice(&type_index.to_be_bytes());
				out.extend_from_slice(&(pairs.len() as u16).to_be_bytes());
				for (name, value) in pairs {
					let name_index = self.utf8(name);
					out.extend_from_slice(&name_index.to_be_bytes());
					self.encode_into(value, out);
				}
				return;
			}
			Lit::Array(items) => {
				out.extend_from_slice(&(items.len() as u16).to_be_bytes());
				for item in items {
					self.encode_into(item, out);
				}
				return;
			}
		};
		out.extend_from_slice(&index.to_be_bytes());
	}

	fn push_method(&mut self, name: &str, descriptor: &str, attributes: Vec<(u16, Vec<u8>)>, default: Option<Lit>) {
		let name_index = self.utf8(name);
		let descriptor_index = self.utf8(descriptor);
		self.methods.push(MethodEntry {
			name: name.to_owned(),
			name_index,
			descriptor_index,
			attributes,
			default,
		});
	}

	/// Serialize the class file.
	pub fn build(&self) -> Vec<u8> {
		let mut out = Vec::new();
		out.extend_from_slice(&0xCAFE_BABE_u32.to_be_bytes());
		out.extend_from_slice(&0_u16.to_be_bytes());
		out.extend_from_slice(&65_u16.to_be_bytes());
		out.extend_from_slice(&self.pool.next.max(1).to_be_bytes());
		out.extend_from_slice(&self.pool.bytes);
		out.extend_from_slice(&ACC_ANNOTATION_INTERFACE.to_be_bytes());
		out.extend_from_slice(&self.this_class.to_be_bytes());
		out.extend_from_slice(&self.super_class.to_be_bytes());
		out.extend_from_slice(&1_u16.to_be_bytes());
		out.extend_from_slice(&self.interface.to_be_bytes());
		out.extend_from_slice(&0_u16.to_be_bytes());

		out.extend_from_slice(&(self.methods.len() as u16).to_be_bytes());
		for method in &self.methods {
			out.extend_from_slice(&ACC_PUBLIC_ABSTRACT.to_be_bytes());
			out.extend_from_slice(&method.name_index.to_be_bytes());
			out.extend_from_slice(&method.descriptor_index.to_be_bytes());
			out.extend_from_slice(&(method.attributes.len() as u16).to_be_bytes());
			for (name_index, info) in &method.attributes {
				out.extend_from_slice(&name_index.to_be_bytes());
				out.extend_from_slice(&(info.len() as u32).to_be_bytes());
				out.extend_from_slice(info);
			}
		}

		out.extend_from_slice(&0_u16.to_be_bytes());
		out
	}

	/// Expectation document covering every element declared with a default.
	pub fn expected_json(&self) -> Value {
		let methods: serde_json::Map<String, Value> = self
			.methods
			.iter()
			.filter_map(|method| method.default.as_ref().map(|lit| (method.name.clone(), lit.spec_json())))
			.collect();
		json!({ "methods": methods })
	}
}
