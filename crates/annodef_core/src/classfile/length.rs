use tracing::debug;

use crate::classfile::{AnnotationDefault, Check, Element, Outcome, ROOT_PATH, Tag};

impl<L> Element<L> {
	/// Encoded size in bytes, tag byte included, computed from structure alone.
	///
	/// Leaf values are never inspected, so trees of the same shape always have the
	/// same size whatever indices they hold.
	pub fn encoded_len(&self) -> u64 {
		1 + self.body_len()
	}

	fn body_len(&self) -> u64 {
		match self {
			Element::Const { .. } | Element::Class(_) => 2,
			Element::Enum { .. } => 4,
			// type_index + num_element_value_pairs, then name_index + value per pair
			Element::Annotation(annotation) => 4 + annotation.pairs.iter().map(|pair| 2 + pair.value.encoded_len()).sum::<u64>(),
			// num_values, then each value with its own tag byte
			Element::Array(items) => 2 + items.iter().map(Element::encoded_len).sum::<u64>(),
		}
	}
}

/// Reconcile the attribute's declared length with the size its value tree encodes to.
///
/// `tag` is the root tag the caller expects; a different root tag is reported
/// instead of a length comparison.
pub fn check_length(tag: Tag, attribute: &AnnotationDefault) -> Outcome {
	let description = format!("check length : {}", tag.as_char());
	let found = attribute.value.tag();
	let check = if found != tag {
		Check::TagMismatch {
			expected: tag.as_char(),
			found: found.as_char(),
		}
	} else {
		let computed = attribute.value.encoded_len();
		let declared = u64::from(attribute.declared_length);
		if computed == declared {
			Check::Match
		} else {
			debug!(computed, declared, "attribute length mismatch");
			Check::LengthMismatch { computed, declared }
		}
	};

	Outcome {
		path: ROOT_PATH.to_owned(),
		description,
		check,
	}
}
