use std::fmt;

use serde::Serialize;

/// Which side of a comparison lacked a named element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
	/// The decoded class-file value.
	Node,
	/// The expectation.
	Expected,
}

/// Result of one individual comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Check {
	/// Compared values agree.
	Match,
	/// Decoded tag differs from the expected tag; the subtree was not descended.
	TagMismatch {
		/// Expected tag character.
		expected: char,
		/// Decoded tag character.
		found: char,
	},
	/// Resolved leaf content differs from the expected token.
	ValueMismatch {
		/// Expected token.
		expected: String,
		/// Resolved value, rendered.
		found: String,
	},
	/// Array element count or annotation element count differs.
	ArityMismatch {
		/// Expected count.
		expected: usize,
		/// Decoded count.
		found: usize,
	},
	/// Size computed from structure differs from `attribute_length`.
	LengthMismatch {
		/// Size computed from the decoded tree.
		computed: u64,
		/// Declared attribute length.
		declared: u64,
	},
	/// Named element present on one side only.
	MissingField {
		/// Element name.
		name: String,
		/// Side the element is absent from.
		missing_from: Side,
	},
	/// Attribute presence differs from the case configuration.
	PresenceMismatch {
		/// Whether the configuration expected the attribute.
		expected_present: bool,
	},
	/// Input could not be resolved or interpreted; the subtree was not descended.
	Malformed {
		/// Underlying error text.
		reason: String,
	},
}

impl Check {
	/// Stable snake_case label, matching the serialized `kind`.
	pub fn label(&self) -> &'static str {
		match self {
			Check::Match => "match",
			Check::TagMismatch { .. } => "tag_mismatch",
			Check::ValueMismatch { .. } => "value_mismatch",
			Check::ArityMismatch { .. } => "arity_mismatch",
			Check::LengthMismatch { .. } => "length_mismatch",
			Check::MissingField { .. } => "missing_field",
			Check::PresenceMismatch { .. } => "presence_mismatch",
			Check::Malformed { .. } => "malformed",
		}
	}
}

impl fmt::Display for Check {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Check::Match => f.write_str("ok"),
			Check::TagMismatch { expected, found } => write!(f, "tag mismatch: expected {expected}, found {found}"),
			Check::ValueMismatch { expected, found } => write!(f, "value mismatch: expected {expected}, found {found}"),
			Check::ArityMismatch { expected, found } => write!(f, "count mismatch: expected {expected}, found {found}"),
			Check::LengthMismatch { computed, declared } => write!(f, "length mismatch: computed {computed}, declared {declared}"),
			Check::MissingField { name, missing_from } => {
				let side = match missing_from {
					Side::Node => "class file",
					Side::Expected => "expectation",
				};
				write!(f, "element {name} missing from {side}")
			}
			Check::PresenceMismatch { expected_present: true } => f.write_str("attribute expected but absent"),
			Check::PresenceMismatch { expected_present: false } => f.write_str("attribute present but not expected"),
			Check::Malformed { reason } => write!(f, "malformed: {reason}"),
		}
	}
}

/// One recorded comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
	/// Location in the value tree, for example `default[1].name`.
	pub path: String,
	/// What was compared.
	pub description: String,
	/// Comparison result.
	pub check: Check,
}

impl Outcome {
	/// True when the comparison matched.
	pub fn is_match(&self) -> bool {
		matches!(self.check, Check::Match)
	}
}

impl fmt::Display for Outcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}: {}", self.path, self.description, self.check)
	}
}
