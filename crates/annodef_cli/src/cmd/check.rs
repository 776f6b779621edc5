use std::path::PathBuf;

use annodef::classfile::{CaseConfig, CaseReport, ClassFile, DefaultPresence, ExpectedSet, Repeatability, Result, RetentionPolicy, check_class};
use tracing::info;

use crate::cmd::util::emit_json;

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum Retention {
	Source,
	Class,
	Runtime,
}

impl From<Retention> for RetentionPolicy {
	fn from(value: Retention) -> Self {
		match value {
			Retention::Source => RetentionPolicy::Source,
			Retention::Class => RetentionPolicy::Class,
			Retention::Runtime => RetentionPolicy::Runtime,
		}
	}
}

#[derive(clap::Args)]
pub struct Args {
	/// Class file to check.
	pub path: PathBuf,
	/// Expectation document, `{"methods": {name: spec}}`.
	#[arg(long)]
	pub expect: PathBuf,
	/// Retention policy label for the report.
	#[arg(long, value_enum, default_value = "runtime")]
	pub retention: Retention,
	/// Label the interface as repeatable.
	#[arg(long)]
	pub repeatable: bool,
	/// Expect no method to carry a default.
	#[arg(long)]
	pub stripped: bool,
	/// Print the report as JSON.
	#[arg(long)]
	pub json: bool,
}

/// Check one class file and print its report; returns whether every comparison matched.
pub fn run(args: Args) -> Result<bool> {
	let Args {
		path,
		expect,
		retention,
		repeatable,
		stripped,
		json,
	} = args;

	let class = ClassFile::open(&path)?;
	let expected = ExpectedSet::from_json_slice(&std::fs::read(&expect)?)?;
	info!(expectations = expected.len(), path = %expect.display(), "expectations loaded");

	let config = CaseConfig {
		retention: retention.into(),
		repeatability: if repeatable { Repeatability::Repeatable } else { Repeatability::Single },
		defaults: if stripped { DefaultPresence::Stripped } else { DefaultPresence::Present },
	};
	let report = check_class(&class, &expected, &config)?;
	let passed = report.passed();

	if json {
		emit_json(&CheckJson {
			path: path.display().to_string(),
			passed,
			report: &report,
		})?;
		return Ok(passed);
	}

	print_text(&path, &report);
	Ok(passed)
}

fn print_text(path: &std::path::Path, report: &CaseReport) {
	let config = &report.config;
	println!("path: {}", path.display());
	println!("class: {}", report.class_name);
	println!(
		"config: retention={} repeatability={} defaults={}",
		match config.retention {
			RetentionPolicy::Source => "source",
			RetentionPolicy::Class => "class",
			RetentionPolicy::Runtime => "runtime",
		},
		match config.repeatability {
			Repeatability::Single => "single",
			Repeatability::Repeatable => "repeatable",
		},
		match config.defaults {
			DefaultPresence::Present => "present",
			DefaultPresence::Stripped => "stripped",
		},
	);

	for method in &report.methods {
		let failed: Vec<_> = method.outcomes.iter().filter(|outcome| !outcome.is_match()).collect();
		if failed.is_empty() {
			println!("PASS {} ({} checks)", method.name, method.outcomes.len());
			continue;
		}
		println!("FAIL {} ({} of {} checks)", method.name, failed.len(), method.outcomes.len());
		for outcome in failed {
			println!("  {outcome}");
		}
	}

	println!("comparisons: {}", report.comparisons());
	println!("failures: {}", report.failures().count());
}

#[derive(serde::Serialize)]
struct CheckJson<'a> {
	path: String,
	passed: bool,
	report: &'a CaseReport,
}
