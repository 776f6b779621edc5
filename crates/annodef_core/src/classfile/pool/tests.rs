use crate::classfile::bytes::Cursor;
use crate::classfile::{ClassFileError, Constant, ConstantPool};

fn parse(count: u16, entries: &[u8]) -> Result<ConstantPool, ClassFileError> {
	let mut bytes = count.to_be_bytes().to_vec();
	bytes.extend_from_slice(entries);
	ConstantPool::parse(&mut Cursor::new(&bytes))
}

#[test]
fn long_and_double_take_two_slots() {
	let mut entries = Vec::new();
	entries.push(5);
	entries.extend_from_slice(&(-7_i64).to_be_bytes());
	entries.push(6);
	entries.extend_from_slice(&2.5_f64.to_bits().to_be_bytes());
	entries.push(3);
	entries.extend_from_slice(&42_i32.to_be_bytes());

	let pool = parse(6, &entries).expect("pool parses");
	assert_eq!(pool.len(), 6);
	assert_eq!(pool.long(1).expect("long resolves"), -7);
	assert!(matches!(pool.get(2), Err(ClassFileError::PoolIndexOutOfRange { idx: 2, .. })));
	assert_eq!(pool.double(3).expect("double resolves"), 2.5);
	assert_eq!(pool.integer(5).expect("int resolves"), 42);
}

#[test]
fn decodes_modified_utf8() {
	// "a", NUL as C0 80, U+00E9, then U+1F600 as a surrogate pair.
	let text: &[u8] = &[b'a', 0xc0, 0x80, 0xc3, 0xa9, 0xed, 0xa0, 0xbd, 0xed, 0xb8, 0x80];
	let mut entries = vec![1];
	entries.extend_from_slice(&(text.len() as u16).to_be_bytes());
	entries.extend_from_slice(text);

	let pool = parse(2, &entries).expect("pool parses");
	assert_eq!(pool.utf8(1).expect("utf8 resolves"), "a\0\u{e9}\u{1f600}");
}

#[test]
fn rejects_truncated_utf8_sequence() {
	let entries = [1, 0, 1, 0xc3];
	let err = parse(2, &entries).expect_err("truncated sequence fails");
	assert!(matches!(err, ClassFileError::BadModifiedUtf8 { at: 1 }));
}

#[test]
fn reports_unknown_tag_with_offset() {
	let err = parse(2, &[2, 0, 0]).expect_err("tag 2 is not defined");
	assert!(matches!(err, ClassFileError::UnknownConstantTag { tag: 2, at: 2 }));
}

#[test]
fn typed_lookup_reports_entry_kind() {
	let pool = ConstantPool::from_entries([Constant::Integer(1), Constant::Utf8("x".into())]);
	let err = pool.utf8(1).expect_err("integer is not utf8");
	assert!(matches!(
		err,
		ClassFileError::PoolEntryMismatch {
			idx: 1,
			expected: "Utf8",
			got: "Integer"
		}
	));
	assert!(matches!(pool.get(0), Err(ClassFileError::PoolIndexOutOfRange { idx: 0, len: 3 })));
	assert!(matches!(pool.get(9), Err(ClassFileError::PoolIndexOutOfRange { idx: 9, .. })));
}

#[test]
fn resolves_class_names_through_utf8() {
	let pool = ConstantPool::from_entries([Constant::Utf8("pkg/Thing".into()), Constant::Class { name_index: 1 }]);
	assert_eq!(pool.class_name(2).expect("class resolves"), "pkg/Thing");
}
