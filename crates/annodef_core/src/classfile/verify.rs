use tracing::{debug, trace};

use crate::classfile::{Annotation, Check, ClassFileError, ConstTag, ConstantPool, Element, ElementValue, ExpectedValue, Outcome, Scalar, Side, Token};

/// Path label of the root value.
pub const ROOT_PATH: &str = "default";

/// Compare a decoded value tree with an expectation, one outcome per comparison.
///
/// Failures never stop sibling comparisons. A tag mismatch, an array count
/// mismatch, or an unresolvable reference stops only the subtree where it occurs.
/// The decoded tree is trusted to be well formed in every other respect.
pub fn verify(node: &ElementValue, expected: &ExpectedValue, pool: &ConstantPool) -> Vec<Outcome> {
	let mut walker = Walker { pool, outcomes: Vec::new() };
	walker.element(ROOT_PATH, node, expected);
	walker.outcomes
}

struct Walker<'a> {
	pool: &'a ConstantPool,
	outcomes: Vec<Outcome>,
}

impl Walker<'_> {
	fn element(&mut self, path: &str, node: &ElementValue, expected: &ExpectedValue) {
		let (want, got) = (expected.tag(), node.tag());
		let description = format!("check tag {want}");
		if want != got {
			self.record(
				path,
				description,
				Check::TagMismatch {
					expected: want.as_char(),
					found: got.as_char(),
				},
			);
			return;
		}
		self.record(path, description, Check::Match);

		match (node, expected) {
			(Element::Const { tag, value: idx }, Element::Const { value: token, .. }) => self.literal(path, *tag, *idx, token),
			(
				Element::Enum { type_name, const_name },
				Element::Enum {
					type_name: want_type,
					const_name: want_const,
				},
			) => {
				self.descriptor(path, "enum type", *type_name, want_type);
				self.descriptor(path, "enum constant", *const_name, want_const);
			}
			(Element::Class(idx), Element::Class(token)) => self.descriptor(path, "class descriptor", *idx, token),
			(Element::Annotation(annotation), Element::Annotation(want)) => self.annotation(path, annotation, want),
			(Element::Array(items), Element::Array(want)) => self.array(path, items, want),
			// Equal tags imply equal variants.
			_ => {}
		}
	}

	fn literal(&mut self, path: &str, tag: ConstTag, idx: u16, token: &Token) {
		let description = format!("check {} value", tag.tag().name());
		let found = match Scalar::resolve(self.pool, tag, idx) {
			Ok(value) => value,
			Err(err) => return self.malformed(path, description, &err),
		};
		let want = match Scalar::parse(tag, token) {
			Ok(value) => value,
			Err(reason) => return self.record(path, description, Check::Malformed { reason }),
		};

		let check = if found == want {
			Check::Match
		} else {
			Check::ValueMismatch {
				expected: token.to_string(),
				found: found.to_token(tag).unwrap_or_else(|_| found.to_string()),
			}
		};
		self.record(path, description, check);
	}

	fn descriptor(&mut self, path: &str, what: &str, idx: u16, token: &Token) {
		let description = format!("check {what}");
		let found = match self.pool.utf8(idx) {
			Ok(text) => text,
			Err(err) => return self.malformed(path, description, &err),
		};

		let check = if found == &**token {
			Check::Match
		} else {
			Check::ValueMismatch {
				expected: token.to_string(),
				found: found.to_owned(),
			}
		};
		self.record(path, description, check);
	}

	fn annotation(&mut self, path: &str, node: &Annotation<u16>, expected: &Annotation<Token>) {
		self.descriptor(path, "annotation type", node.type_name, &expected.type_name);

		let pool = self.pool;
		let mut names = Vec::with_capacity(node.pairs.len());
		for pair in &node.pairs {
			match pool.utf8(pair.name) {
				Ok(name) => names.push(name),
				Err(err) => return self.malformed(path, "resolve element name".to_owned(), &err),
			}
		}

		let mut missing = false;
		for want in &expected.pairs {
			match names.iter().position(|name| *name == &*want.name) {
				Some(at) => self.element(&format!("{path}.{}", want.name), &node.pairs[at].value, &want.value),
				None => {
					missing = true;
					self.record(
						path,
						format!("find element {}", want.name),
						Check::MissingField {
							name: want.name.to_string(),
							missing_from: Side::Node,
						},
					);
				}
			}
		}

		for name in &names {
			if !expected.pairs.iter().any(|want| &*want.name == *name) {
				missing = true;
				self.record(
					path,
					format!("find element {name}"),
					Check::MissingField {
						name: (*name).to_owned(),
						missing_from: Side::Expected,
					},
				);
			}
		}

		// Duplicate names can leave counts apart even when every name matched.
		if !missing && names.len() != expected.pairs.len() {
			self.record(
				path,
				"check element count".to_owned(),
				Check::ArityMismatch {
					expected: expected.pairs.len(),
					found: names.len(),
				},
			);
		}
	}

	fn array(&mut self, path: &str, items: &[ElementValue], expected: &[ExpectedValue]) {
		let description = "check array length".to_owned();
		if items.len() != expected.len() {
			return self.record(
				path,
				description,
				Check::ArityMismatch {
					expected: expected.len(),
					found: items.len(),
				},
			);
		}
		self.record(path, description, Check::Match);

		for (at, (item, want)) in items.iter().zip(expected).enumerate() {
			self.element(&format!("{path}[{at}]"), item, want);
		}
	}

	fn malformed(&mut self, path: &str, description: String, err: &ClassFileError) {
		self.record(path, description, Check::Malformed { reason: err.to_string() });
	}

	fn record(&mut self, path: &str, description: String, check: Check) {
		if matches!(check, Check::Match) {
			trace!(path, %description, "match");
		} else {
			debug!(path, %description, %check, "comparison failed");
		}
		self.outcomes.push(Outcome {
			path: path.to_owned(),
			description,
			check,
		});
	}
}
