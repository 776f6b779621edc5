use annodef_testkit::{ClassWriter, Lit};

use crate::classfile::test_support::{expected_for, expected_set};
use crate::classfile::{
	CaseConfig, CaseReport, Check, ClassFile, DefaultPresence, ExpectedSet, Repeatability, RetentionPolicy, Side, check_class,
};

fn sample_writer() -> ClassWriter {
	ClassWriter::annotation_interface("pkg/Sample")
		.element("count", Lit::Int(5))
		.element("label", Lit::Str("x".to_owned()))
		.element("kinds", Lit::Array(vec![Lit::Enum("Lpkg/Kind;".to_owned(), "A".to_owned())]))
}

fn run(writer: &ClassWriter, expected: &ExpectedSet, config: &CaseConfig) -> CaseReport {
	let class = ClassFile::parse(&writer.build()).expect("class parses");
	check_class(&class, expected, config).expect("class checks")
}

fn failed_checks(report: &CaseReport) -> Vec<(String, Check)> {
	report
		.failures()
		.map(|(method, outcome)| (method.to_owned(), outcome.check.clone()))
		.collect()
}

#[test]
fn matrix_covers_every_configuration_once() {
	let matrix = CaseConfig::matrix();
	assert_eq!(matrix.len(), 12);
	assert_eq!(
		matrix[0],
		CaseConfig {
			retention: RetentionPolicy::Source,
			repeatability: Repeatability::Single,
			defaults: DefaultPresence::Present,
		}
	);
	assert_eq!(matrix[3].repeatability, Repeatability::Repeatable);
	assert!(matrix[..6].iter().all(CaseConfig::expects_default));
	assert!(matrix[6..].iter().all(|config| !config.expects_default()));
	for (at, config) in matrix.iter().enumerate() {
		assert!(!matrix[at + 1..].contains(config), "{config:?} repeated");
	}
}

#[test]
fn default_config_expects_runtime_single_with_defaults() {
	let config = CaseConfig::default();
	assert_eq!(config.retention, RetentionPolicy::Runtime);
	assert_eq!(config.repeatability, Repeatability::Single);
	assert!(config.expects_default());
}

#[test]
fn matching_class_passes_under_every_configuration_with_defaults() {
	let writer = sample_writer();
	let expected = expected_set(&writer);
	for config in CaseConfig::matrix().into_iter().filter(CaseConfig::expects_default) {
		let report = run(&writer, &expected, &config);
		assert!(report.passed(), "{config:?}: {:?}", failed_checks(&report));
		assert_eq!(report.class_name, "pkg/Sample");
		assert_eq!(report.config, config);
	}
}

#[test]
fn report_keeps_declaration_order_and_counts_every_comparison() {
	let writer = sample_writer();
	let report = run(&writer, &expected_set(&writer), &CaseConfig::default());

	let names: Vec<_> = report.methods.iter().map(|method| method.name.as_str()).collect();
	assert_eq!(names, ["count", "label", "kinds"]);

	// presence, count, name, tag, value, length
	let outcomes = &report.methods[0].outcomes;
	assert_eq!(outcomes.len(), 6);
	assert_eq!(outcomes[0].description, "check AnnotationDefault presence");
	assert_eq!(outcomes[2].description, "check AnnotationDefault attribute name");
	assert_eq!(outcomes[2].check, Check::Match);
	assert_eq!(outcomes[5].description, "check length : I");
	assert_eq!(report.comparisons(), report.methods.iter().map(|method| method.outcomes.len()).sum::<usize>());
}

#[test]
fn value_mismatch_is_reported_against_its_method() {
	let writer = sample_writer();
	let mut expected = expected_set(&writer);
	expected.insert("count", expected_for(&Lit::Int(6)));

	let failed = failed_checks(&run(&writer, &expected, &CaseConfig::default()));
	assert_eq!(
		failed,
		vec![(
			"count".to_owned(),
			Check::ValueMismatch {
				expected: "6".to_owned(),
				found: "5".to_owned(),
			}
		)]
	);
}

#[test]
fn stripped_configuration_rejects_present_defaults() {
	let writer = sample_writer();
	let config = CaseConfig {
		defaults: DefaultPresence::Stripped,
		..CaseConfig::default()
	};
	let report = run(&writer, &expected_set(&writer), &config);

	let failed = failed_checks(&report);
	assert_eq!(failed.len(), 3);
	assert!(failed.iter().all(|(_, check)| *check == Check::PresenceMismatch { expected_present: false }));
	assert!(report.methods.iter().all(|method| method.outcomes.len() == 1));
}

#[test]
fn stripped_class_passes_stripped_configuration() {
	let writer = ClassWriter::annotation_interface("pkg/Bare")
		.element_without_default("count", "()I")
		.element_without_default("label", "()Ljava/lang/String;");
	let config = CaseConfig {
		defaults: DefaultPresence::Stripped,
		retention: RetentionPolicy::Class,
		repeatability: Repeatability::Repeatable,
	};
	let report = run(&writer, &ExpectedSet::default(), &config);
	assert!(report.passed());
	assert_eq!(report.comparisons(), 2);
}

#[test]
fn missing_default_is_a_presence_mismatch() {
	let writer = sample_writer().element_without_default("bare", "()I");
	let failed = failed_checks(&run(&writer, &expected_set(&writer), &CaseConfig::default()));
	assert_eq!(failed, vec![("bare".to_owned(), Check::PresenceMismatch { expected_present: true })]);
}

#[test]
fn method_without_expectation_is_reported() {
	let writer = sample_writer();
	let only_count = ClassWriter::annotation_interface("pkg/Sample").element("count", Lit::Int(5));
	let failed = failed_checks(&run(&writer, &expected_set(&only_count), &CaseConfig::default()));

	assert_eq!(failed.len(), 2);
	assert_eq!(
		failed[0],
		(
			"label".to_owned(),
			Check::MissingField {
				name: "label".to_owned(),
				missing_from: Side::Expected,
			}
		)
	);
	assert_eq!(failed[1].0, "kinds");
}

#[test]
fn duplicate_attribute_is_counted_and_first_is_verified() {
	let mut writer = ClassWriter::annotation_interface("pkg/Twice");
	let info = writer.encode(&Lit::Int(7));
	let writer = writer.element_with_attributes("value", "()I", vec![("AnnotationDefault", info.clone()), ("AnnotationDefault", info)]);
	let mut expected = ExpectedSet::default();
	expected.insert("value", expected_for(&Lit::Int(7)));

	let failed = failed_checks(&run(&writer, &expected, &CaseConfig::default()));
	assert_eq!(failed, vec![("value".to_owned(), Check::ArityMismatch { expected: 1, found: 2 })]);
}

#[test]
fn trailing_bytes_surface_as_length_mismatch() {
	let mut writer = ClassWriter::annotation_interface("pkg/Padded");
	let mut info = writer.encode(&Lit::Int(7));
	info.push(0);
	let writer = writer.element_with_attributes("value", "()I", vec![("AnnotationDefault", info)]);
	let mut expected = ExpectedSet::default();
	expected.insert("value", expected_for(&Lit::Int(7)));

	let failed = failed_checks(&run(&writer, &expected, &CaseConfig::default()));
	assert_eq!(failed, vec![("value".to_owned(), Check::LengthMismatch { computed: 3, declared: 4 })]);
}

#[test]
fn undecodable_attribute_is_malformed_and_siblings_still_run() {
	let writer = ClassWriter::annotation_interface("pkg/Broken")
		.element_with_attributes("bad", "()I", vec![("AnnotationDefault", vec![b'x', 0, 1])])
		.element_with_attributes("empty", "()I", vec![("AnnotationDefault", Vec::new())])
		.element("good", Lit::Long(-1));
	let mut expected = ExpectedSet::default();
	expected.insert("bad", expected_for(&Lit::Int(1)));
	expected.insert("empty", expected_for(&Lit::Int(1)));
	expected.insert("good", expected_for(&Lit::Long(-1)));

	let report = run(&writer, &expected, &CaseConfig::default());
	let failed: Vec<_> = report.failures().collect();
	assert_eq!(failed.len(), 2);
	assert_eq!(failed[0].0, "bad");
	assert_eq!(failed[1].0, "empty");
	assert!(failed.iter().all(|(_, outcome)| outcome.description == "decode default value"));
	assert!(failed.iter().all(|(_, outcome)| matches!(outcome.check, Check::Malformed { .. })));
	assert!(report.methods[2].outcomes.iter().all(|outcome| outcome.is_match()));
}

#[test]
fn report_serializes_with_snake_case_labels() {
	let writer = sample_writer().element_without_default("bare", "()I");
	let report = run(&writer, &expected_set(&writer), &CaseConfig::default());
	let value = serde_json::to_value(&report).expect("report serializes");

	assert_eq!(value["config"]["retention"], "runtime");
	assert_eq!(value["config"]["defaults"], "present");
	assert_eq!(value["methods"][3]["outcomes"][0]["check"]["kind"], "presence_mismatch");
	assert_eq!(value["methods"][3]["outcomes"][0]["check"]["expected_present"], true);
}
