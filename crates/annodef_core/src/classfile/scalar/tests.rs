use crate::classfile::{ConstTag, Constant, ConstantPool, Scalar};

#[test]
fn parses_tokens_at_exact_width() {
	assert_eq!(Scalar::parse(ConstTag::Byte, "-128"), Ok(Scalar::Int(-128)));
	assert!(Scalar::parse(ConstTag::Byte, "128").is_err());
	assert!(Scalar::parse(ConstTag::Short, "40000").is_err());
	assert!(Scalar::parse(ConstTag::Int, "2147483648").is_err());
	assert_eq!(Scalar::parse(ConstTag::Long, "2147483648"), Ok(Scalar::Long(2_147_483_648)));
	assert_eq!(Scalar::parse(ConstTag::Boolean, "true"), Ok(Scalar::Int(1)));
	assert!(Scalar::parse(ConstTag::Boolean, "1").is_err());
	assert_eq!(Scalar::parse(ConstTag::Char, "A"), Ok(Scalar::Int(65)));
	assert!(Scalar::parse(ConstTag::Char, "AB").is_err());
	assert!(Scalar::parse(ConstTag::Char, "\u{1f600}").is_err());
}

#[test]
fn floats_compare_by_representation() {
	assert_eq!(Scalar::Float(f32::NAN), Scalar::Float(-f32::NAN));
	assert_ne!(Scalar::Float(0.0), Scalar::Float(-0.0));
	assert_ne!(Scalar::Double(0.1 + 0.2), Scalar::Double(0.3));
	assert_ne!(Scalar::Int(1), Scalar::Long(1));
}

#[test]
fn resolves_by_tag_entry_kind() {
	let pool = ConstantPool::from_entries([Constant::Integer(7), Constant::Float(1.5), Constant::Utf8("hi".into())]);
	assert_eq!(Scalar::resolve(&pool, ConstTag::Short, 1).expect("int resolves"), Scalar::Int(7));
	assert_eq!(Scalar::resolve(&pool, ConstTag::Float, 2).expect("float resolves"), Scalar::Float(1.5));
	assert_eq!(Scalar::resolve(&pool, ConstTag::String, 3).expect("utf8 resolves"), Scalar::Text("hi".into()));
	assert!(Scalar::resolve(&pool, ConstTag::Double, 2).is_err());
}

#[test]
fn tokens_parse_back_to_the_same_value() {
	let cases = [
		(ConstTag::Boolean, Scalar::Int(0)),
		(ConstTag::Char, Scalar::Int(0x263a)),
		(ConstTag::Float, Scalar::Float(-1.25e-7)),
		(ConstTag::Double, Scalar::Double(f64::INFINITY)),
		(ConstTag::Long, Scalar::Long(i64::MIN)),
	];
	for (tag, value) in cases {
		let token = value.to_token(tag).expect("token renders");
		assert_eq!(Scalar::parse(tag, &token), Ok(value));
	}
	assert!(Scalar::Int(2).to_token(ConstTag::Boolean).is_err());
	assert!(Scalar::Int(300).to_token(ConstTag::Byte).is_err());
}

#[test]
fn char_tokens_cover_every_code_unit() {
	assert_eq!(Scalar::parse(ConstTag::Char, "\\uD800"), Ok(Scalar::Int(0xd800)));
	assert_eq!(Scalar::parse(ConstTag::Char, "\\udfff"), Ok(Scalar::Int(0xdfff)));
	assert_eq!(Scalar::parse(ConstTag::Char, "\\u0041"), Ok(Scalar::Int(65)));
	assert_eq!(Scalar::parse(ConstTag::Char, "\\"), Ok(Scalar::Int(0x5c)));
	assert!(Scalar::parse(ConstTag::Char, "\\u+041").is_err());
	assert!(Scalar::parse(ConstTag::Char, "\\uD80").is_err());

	assert_eq!(Scalar::Int(0xd800).to_token(ConstTag::Char), Ok("\\uD800".to_owned()));
	assert_eq!(Scalar::Int(65).to_token(ConstTag::Char), Ok("A".to_owned()));
	assert!(Scalar::Int(0x1_0000).to_token(ConstTag::Char).is_err());
	for unit in [0_i32, 0x5c, 0xd7ff, 0xd800, 0xdbff, 0xdc00, 0xdfff, 0xe000, 0xffff] {
		let token = Scalar::Int(unit).to_token(ConstTag::Char).expect("token renders");
		assert_eq!(Scalar::parse(ConstTag::Char, &token), Ok(Scalar::Int(unit)), "unit {unit:#x}");
	}
}
