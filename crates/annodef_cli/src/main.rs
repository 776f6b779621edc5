#![allow(missing_docs)]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod cmd;

#[derive(Parser)]
#[command(name = "annodef", about = "AnnotationDefault attribute conformance tools")]
struct Cli {
	/// Log filter directive, for example `debug` or `annodef=trace`.
	#[arg(long = "log-level", default_value = "warn", global = true)]
	log_level: String,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Verify every method's default value against an expectation document.
	Check(cmd::check::Args),
	/// Print the default values a class file carries as an expectation document.
	Dump(cmd::dump::Args),
}

fn main() -> ExitCode {
	let cli = Cli::parse();

	let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
	tracing_subscriber::registry()
		.with(filter)
		.with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
		.init();

	let result = match cli.command {
		Commands::Check(args) => cmd::check::run(args),
		Commands::Dump(args) => cmd::dump::run(args).map(|()| true),
	};

	match result {
		Ok(true) => ExitCode::SUCCESS,
		Ok(false) => ExitCode::from(1),
		Err(err) => {
			eprintln!("error: {err}");
			ExitCode::from(2)
		}
	}
}
