use annodef_testkit::{ClassWriter, Lit};

use crate::classfile::{ANNOTATION_DEFAULT, AnnotationDefault, ClassFile, ExpectedSet, ExpectedSpec, ExpectedValue};

/// Compile a one-element annotation interface whose element `value` defaults to `lit`.
pub(crate) fn single_default(lit: Lit) -> (ClassFile, AnnotationDefault) {
	let bytes = ClassWriter::annotation_interface("Single").element("value", lit).build();
	let class = ClassFile::parse(&bytes).expect("class parses");
	let attribute = default_of(&class, "value");
	(class, attribute)
}

/// Decode the AnnotationDefault attribute of method `name`.
pub(crate) fn default_of(class: &ClassFile, name: &str) -> AnnotationDefault {
	let method = class
		.methods
		.iter()
		.find(|method| method.name(&class.pool).is_ok_and(|item| item == name))
		.expect("method exists");
	let raw = method.attributes_named(&class.pool, ANNOTATION_DEFAULT).next().expect("attribute exists");
	AnnotationDefault::parse(raw).expect("attribute decodes")
}

/// Compile the expectation a literal satisfies.
pub(crate) fn expected_for(lit: &Lit) -> ExpectedValue {
	let spec: ExpectedSpec = serde_json::from_value(lit.spec_json()).expect("spec json deserializes");
	spec.compile().expect("spec compiles")
}

/// Compile a testkit expectation document.
pub(crate) fn expected_set(writer: &ClassWriter) -> ExpectedSet {
	let bytes = serde_json::to_vec(&writer.expected_json()).expect("json serializes");
	ExpectedSet::from_json_slice(&bytes).expect("expectations compile")
}
