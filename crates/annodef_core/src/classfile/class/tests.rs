use annodef_testkit::{ClassWriter, Lit};

use crate::classfile::{ANNOTATION_DEFAULT, ClassFile, ClassFileError};

#[test]
fn parses_writer_output() {
	let bytes = ClassWriter::annotation_interface("pkg/Defaults")
		.element("count", Lit::Int(3))
		.element_without_default("plain", "()I")
		.build();

	let class = ClassFile::parse(&bytes).expect("class parses");
	assert_eq!(class.class_name().expect("name resolves"), "pkg/Defaults");
	assert_eq!(class.major_version, 65);
	assert_eq!(class.interfaces.len(), 1);
	assert_eq!(class.methods.len(), 2);

	let count = &class.methods[0];
	assert_eq!(count.name(&class.pool).expect("name resolves"), "count");
	assert_eq!(count.descriptor(&class.pool).expect("descriptor resolves"), "()I");
	assert_eq!(count.attributes_named(&class.pool, ANNOTATION_DEFAULT).count(), 1);

	let plain = &class.methods[1];
	assert_eq!(plain.attributes_named(&class.pool, ANNOTATION_DEFAULT).count(), 0);
}

#[test]
fn rejects_bad_magic() {
	let err = ClassFile::parse(&[0xde, 0xad, 0xbe, 0xef, 0, 0]).expect_err("magic is checked");
	assert!(matches!(err, ClassFileError::BadMagic { magic: 0xdead_beef }));
}

#[test]
fn reports_truncation() {
	let bytes = ClassWriter::annotation_interface("T").element("v", Lit::Long(1)).build();
	let err = ClassFile::parse(&bytes[..bytes.len() - 3]).expect_err("truncated class fails");
	assert!(matches!(err, ClassFileError::UnexpectedEof { .. }));
}

#[test]
fn raw_attribute_keeps_declared_length() {
	let bytes = ClassWriter::annotation_interface("T")
		.element_with_attributes("v", "()I", vec![(ANNOTATION_DEFAULT, vec![b'I', 0, 1, 0xff])])
		.build();
	let class = ClassFile::parse(&bytes).expect("class parses");
	let attr = class.methods[0].attributes_named(&class.pool, ANNOTATION_DEFAULT).next().expect("attribute exists");
	assert_eq!(attr.declared_length(), 4);
}
