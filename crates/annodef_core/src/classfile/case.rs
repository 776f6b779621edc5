use serde::Serialize;
use tracing::{debug, info};

use crate::classfile::{
	ANNOTATION_DEFAULT, AnnotationDefault, AttributeInfo, Check, ClassFile, ExpectedSet, Outcome, ROOT_PATH, Result, Side, check_length, verify,
};

/// Retention policy declared on the annotation interface under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionPolicy {
	/// Discarded by the compiler.
	Source,
	/// Recorded in the class file, not retained at run time.
	Class,
	/// Recorded and retained at run time.
	Runtime,
}

impl RetentionPolicy {
	/// All policies in declaration order.
	pub const ALL: [RetentionPolicy; 3] = [RetentionPolicy::Source, RetentionPolicy::Class, RetentionPolicy::Runtime];
}

/// Whether the annotation interface is declared repeatable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Repeatability {
	/// Plain annotation interface.
	Single,
	/// Annotated `@Repeatable(Container.class)`.
	Repeatable,
}

/// Whether element declarations carry `default` clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultPresence {
	/// Every element declares a default, so every method carries the attribute.
	Present,
	/// Defaults were removed, so no method may carry the attribute.
	Stripped,
}

/// One point in the case parameter space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CaseConfig {
	/// Retention policy label.
	pub retention: RetentionPolicy,
	/// Repeatability label.
	pub repeatability: Repeatability,
	/// Whether defaults are expected.
	pub defaults: DefaultPresence,
}

impl Default for CaseConfig {
	fn default() -> Self {
		Self {
			retention: RetentionPolicy::Runtime,
			repeatability: Repeatability::Single,
			defaults: DefaultPresence::Present,
		}
	}
}

impl CaseConfig {
	/// Every configuration: defaults outermost, then repeatability, then retention.
	pub fn matrix() -> Vec<CaseConfig> {
		let mut out = Vec::with_capacity(12);
		for defaults in [DefaultPresence::Present, DefaultPresence::Stripped] {
			for repeatability in [Repeatability::Single, Repeatability::Repeatable] {
				for retention in RetentionPolicy::ALL {
					out.push(CaseConfig {
						retention,
						repeatability,
						defaults,
					});
				}
			}
		}
		out
	}

	/// True when every method is expected to carry an `AnnotationDefault` attribute.
	pub fn expects_default(&self) -> bool {
		self.defaults == DefaultPresence::Present
	}
}

/// Outcomes recorded for one method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodReport {
	/// Method name.
	pub name: String,
	/// Comparisons in the order they ran.
	pub outcomes: Vec<Outcome>,
}

/// Outcomes recorded for one class under one configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseReport {
	/// Internal class name.
	pub class_name: String,
	/// Configuration the class was checked under.
	pub config: CaseConfig,
	/// Per-method outcomes in declaration order.
	pub methods: Vec<MethodReport>,
}

impl CaseReport {
	/// Failed outcomes across all methods.
	pub fn failures(&self) -> impl Iterator<Item = (&str, &Outcome)> {
		self.methods
			.iter()
			.flat_map(|method| method.outcomes.iter().map(move |outcome| (method.name.as_str(), outcome)))
			.filter(|(_, outcome)| !outcome.is_match())
	}

	/// Total comparisons across all methods.
	pub fn comparisons(&self) -> usize {
		self.methods.iter().map(|method| method.outcomes.len()).sum()
	}

	/// True when every comparison matched.
	pub fn passed(&self) -> bool {
		self.failures().next().is_none()
	}
}

/// Check every method of `class` against `expected` under `config`.
///
/// Errors are reserved for a class whose own name or method names cannot be
/// resolved; problems inside one attribute are recorded as outcomes.
pub fn check_class(class: &ClassFile, expected: &ExpectedSet, config: &CaseConfig) -> Result<CaseReport> {
	let class_name = class.class_name()?.to_owned();
	info!(class = %class_name, ?config, "checking class");

	let mut methods = Vec::with_capacity(class.methods.len());
	for method in &class.methods {
		let name = method.name(&class.pool)?.to_owned();
		let attrs: Vec<_> = method.attributes_named(&class.pool, ANNOTATION_DEFAULT).collect();
		let mut outcomes = Vec::new();

		let present = !attrs.is_empty();
		let presence = Outcome {
			path: ROOT_PATH.to_owned(),
			description: format!("check {ANNOTATION_DEFAULT} presence"),
			check: if present == config.expects_default() {
				Check::Match
			} else {
				Check::PresenceMismatch {
					expected_present: config.expects_default(),
				}
			},
		};
		outcomes.push(presence);

		if present && config.expects_default() {
			check_method(&name, &attrs, class, expected, &mut outcomes);
		}

		debug!(method = %name, outcomes = outcomes.len(), "method checked");
		methods.push(MethodReport { name, outcomes });
	}

	Ok(CaseReport {
		class_name,
		config: *config,
		methods,
	})
}

fn check_method(name: &str, attrs: &[&AttributeInfo], class: &ClassFile, expected: &ExpectedSet, outcomes: &mut Vec<Outcome>) {
	let outcome = |description: String, check: Check| Outcome {
		path: ROOT_PATH.to_owned(),
		description,
		check,
	};

	let count = attrs.len();
	outcomes.push(outcome(
		format!("number of {ANNOTATION_DEFAULT} attributes"),
		if count == 1 {
			Check::Match
		} else {
			Check::ArityMismatch { expected: 1, found: count }
		},
	));

	let Some(raw) = attrs.first() else {
		return;
	};

	let attribute = match AnnotationDefault::parse(raw) {
		Ok(attribute) => attribute,
		Err(err) => {
			outcomes.push(outcome("decode default value".to_owned(), Check::Malformed { reason: err.to_string() }));
			return;
		}
	};

	outcomes.push(outcome(
		format!("check {ANNOTATION_DEFAULT} attribute name"),
		match class.pool.utf8(attribute.name_index) {
			Ok(found) if found == ANNOTATION_DEFAULT => Check::Match,
			Ok(found) => Check::ValueMismatch {
				expected: ANNOTATION_DEFAULT.to_owned(),
				found: found.to_owned(),
			},
			Err(err) => Check::Malformed { reason: err.to_string() },
		},
	));

	let Some(want) = expected.get(name) else {
		outcomes.push(outcome(
			"find expected value".to_owned(),
			Check::MissingField {
				name: name.to_owned(),
				missing_from: Side::Expected,
			},
		));
		return;
	};

	outcomes.extend(verify(&attribute.value, want, &class.pool));
	// Reconciled against the decoded root tag so a tag mismatch is not reported twice.
	outcomes.push(check_length(attribute.value.tag(), &attribute));
}

#[cfg(test)]
mod tests;
