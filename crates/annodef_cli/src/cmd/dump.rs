use std::collections::BTreeMap;
use std::path::PathBuf;

use annodef::classfile::{ANNOTATION_DEFAULT, AnnotationDefault, ClassFile, ExpectedSpec, ExpectedValue, Result};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	/// Class file to read.
	pub path: PathBuf,
	/// Print an expectation document as JSON.
	#[arg(long)]
	pub json: bool,
}

/// Print each method's default value, usable as a `check --expect` document with `--json`.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let class = ClassFile::open(&path)?;
	let mut methods = BTreeMap::new();
	let mut lengths = BTreeMap::new();
	let mut bare = Vec::new();

	for method in &class.methods {
		let name = method.name(&class.pool)?.to_owned();
		let Some(raw) = method.attributes_named(&class.pool, ANNOTATION_DEFAULT).next() else {
			bare.push(name);
			continue;
		};
		let attribute = AnnotationDefault::parse(raw)?;
		let value = ExpectedValue::from_node(&attribute.value, &class.pool)?;
		lengths.insert(
			name.clone(),
			LengthJson {
				declared: attribute.declared_length,
				computed: attribute.value.encoded_len(),
			},
		);
		methods.insert(name, ExpectedSpec::from(&value));
	}

	if json {
		return emit_json(&DumpJson {
			class: class.class_name()?.to_owned(),
			methods,
			lengths,
			without_default: bare,
		});
	}

	println!("path: {}", path.display());
	println!("class: {}", class.class_name()?);
	println!("defaults: {}", methods.len());
	for ((name, spec), length) in methods.iter().zip(lengths.values()) {
		println!(
			"  {name}\t{}\tdeclared={}\tcomputed={}\t{}",
			spec.tag,
			length.declared,
			length.computed,
			serde_json::to_string(&spec.values)?
		);
	}
	for name in &bare {
		println!("  {name}\t-");
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct LengthJson {
	declared: u32,
	computed: u64,
}

#[derive(serde::Serialize)]
struct DumpJson {
	class: String,
	methods: BTreeMap<String, ExpectedSpec>,
	lengths: BTreeMap<String, LengthJson>,
	without_default: Vec<String>,
}
