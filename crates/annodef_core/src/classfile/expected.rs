use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::classfile::{Annotation, ClassFileError, ConstTag, ConstantPool, Element, ElementValue, LeafRole, Pair, Result, Scalar, Tag};

/// Expectation leaf text: a literal token, descriptor, or element name.
pub type Token = Box<str>;

/// Compiled expectation tree, same shape as a decoded [`ElementValue`].
pub type ExpectedValue = Element<Token>;

/// Declarative expectation for one value: tag character plus raw tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedSpec {
	/// Tag character, for example `I` or `[`.
	pub tag: char,
	/// Tokens, interpreted according to `tag`.
	#[serde(default)]
	pub values: Vec<RawToken>,
}

/// One raw expectation token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawToken {
	/// Nested value, used by arrays.
	Spec(ExpectedSpec),
	/// Named element, used by annotations.
	Pair {
		/// Element name.
		name: String,
		/// Element value.
		value: ExpectedSpec,
	},
	/// Text token.
	Text(String),
	/// Numeric token, kept textual.
	Number(serde_json::Number),
	/// Boolean token.
	Bool(bool),
}

impl RawToken {
	fn scalar_text(&self) -> Option<String> {
		match self {
			RawToken::Text(text) => Some(text.clone()),
			RawToken::Number(number) => Some(number.to_string()),
			RawToken::Bool(value) => Some(value.to_string()),
			RawToken::Spec(_) | RawToken::Pair { .. } => None,
		}
	}
}

impl ExpectedSpec {
	/// Check the token layout against the tag and build the expectation tree.
	pub fn compile(&self) -> Result<ExpectedValue> {
		let tag = Tag::from_char(self.tag).ok_or(ClassFileError::UnknownSpecTag { tag: self.tag })?;
		let invalid = |reason: String| ClassFileError::InvalidSpec { tag: self.tag, reason };

		Ok(match tag {
			Tag::EnumClass => match self.values.as_slice() {
				[type_name, const_name] => Element::Enum {
					type_name: text_token(type_name).ok_or_else(|| invalid("enum type must be a text token".to_owned()))?,
					const_name: text_token(const_name).ok_or_else(|| invalid("enum constant must be a text token".to_owned()))?,
				},
				other => return Err(invalid(format!("expected 2 tokens, got {}", other.len()))),
			},
			Tag::Class => Element::Class(self.single_text().map_err(invalid)?),
			Tag::Annotation => {
				let Some((first, rest)) = self.values.split_first() else {
					return Err(invalid("missing annotation type token".to_owned()));
				};
				let type_name = text_token(first).ok_or_else(|| invalid("annotation type must be a text token".to_owned()))?;
				let mut pairs = Vec::with_capacity(rest.len());
				for token in rest {
					let RawToken::Pair { name, value } = token else {
						return Err(invalid("annotation elements must be {name, value} objects".to_owned()));
					};
					pairs.push(Pair {
						name: name.as_str().into(),
						value: value.compile()?,
					});
				}
				Element::Annotation(Annotation { type_name, pairs })
			}
			Tag::Array => {
				let mut items = Vec::with_capacity(self.values.len());
				for token in &self.values {
					let RawToken::Spec(spec) = token else {
						return Err(invalid("array items must be nested {tag, values} objects".to_owned()));
					};
					items.push(spec.compile()?);
				}
				Element::Array(items)
			}
			_ => Element::Const {
				tag: ConstTag::from_tag(tag).ok_or(ClassFileError::UnknownSpecTag { tag: self.tag })?,
				value: self.single_text().map_err(invalid)?,
			},
		})
	}

	fn single_text(&self) -> std::result::Result<Token, String> {
		match self.values.as_slice() {
			[token] => token
				.scalar_text()
				.map(String::into_boxed_str)
				.ok_or_else(|| "expected a scalar token".to_owned()),
			other => Err(format!("expected 1 token, got {}", other.len())),
		}
	}
}

fn text_token(token: &RawToken) -> Option<Token> {
	match token {
		RawToken::Text(text) => Some(text.as_str().into()),
		_ => None,
	}
}

impl From<&ExpectedValue> for ExpectedSpec {
	fn from(value: &ExpectedValue) -> Self {
		let tag = value.tag().as_char();
		let text = |token: &Token| RawToken::Text(token.to_string());
		let values = match value {
			Element::Const { value, .. } => vec![text(value)],
			Element::Enum { type_name, const_name } => vec![text(type_name), text(const_name)],
			Element::Class(descriptor) => vec![text(descriptor)],
			Element::Annotation(annotation) => {
				let mut out = Vec::with_capacity(annotation.pairs.len() + 1);
				out.push(text(&annotation.type_name));
				out.extend(annotation.pairs.iter().map(|pair| RawToken::Pair {
					name: pair.name.to_string(),
					value: ExpectedSpec::from(&pair.value),
				}));
				out
			}
			Element::Array(items) => items.iter().map(|item| RawToken::Spec(ExpectedSpec::from(item))).collect(),
		};
		Self { tag, values }
	}
}

impl ExpectedValue {
	/// Render a decoded tree as the expectation it satisfies, resolving every pool reference.
	pub fn from_node(node: &ElementValue, pool: &ConstantPool) -> Result<Self> {
		node.try_map(&mut |role, idx: &u16| -> Result<Token> {
			match role {
				LeafRole::Const(tag) => {
					let scalar = Scalar::resolve(pool, tag, *idx)?;
					let token = scalar.to_token(tag).map_err(|reason| ClassFileError::InvalidSpec {
						tag: tag.tag().as_char(),
						reason,
					})?;
					Ok(token.into_boxed_str())
				}
				_ => Ok(pool.utf8(*idx)?.into()),
			}
		})
	}
}

/// Expectation document: one spec per method name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpectedDoc {
	/// Specs keyed by method name.
	pub methods: BTreeMap<String, ExpectedSpec>,
}

/// Compiled expectations keyed by method name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpectedSet {
	methods: BTreeMap<String, ExpectedValue>,
}

impl ExpectedSet {
	/// Compile every spec in a document.
	pub fn from_doc(doc: &ExpectedDoc) -> Result<Self> {
		let mut methods = BTreeMap::new();
		for (name, spec) in &doc.methods {
			methods.insert(name.clone(), spec.compile()?);
		}
		Ok(Self { methods })
	}

	/// Parse and compile a JSON expectation document.
	pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
		let doc = serde_json::from_slice::<ExpectedDoc>(bytes)?;
		Self::from_doc(&doc)
	}

	/// Add or replace the expectation for one method.
	pub fn insert(&mut self, method: impl Into<String>, value: ExpectedValue) {
		self.methods.insert(method.into(), value);
	}

	/// Expectation for `method`, if any.
	pub fn get(&self, method: &str) -> Option<&ExpectedValue> {
		self.methods.get(method)
	}

	/// Number of methods with an expectation.
	pub fn len(&self) -> usize {
		self.methods.len()
	}

	/// True when no method has an expectation.
	pub fn is_empty(&self) -> bool {
		self.methods.is_empty()
	}

	/// Convert back to the serializable document form.
	pub fn to_doc(&self) -> ExpectedDoc {
		ExpectedDoc {
			methods: self.methods.iter().map(|(name, value)| (name.clone(), ExpectedSpec::from(value))).collect(),
		}
	}
}
