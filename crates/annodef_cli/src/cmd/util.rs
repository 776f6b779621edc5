use annodef::classfile::Result;
use serde::Serialize;

/// Print `payload` to stdout as pretty JSON.
pub(crate) fn emit_json<T: Serialize>(payload: &T) -> Result<()> {
	println!("{}", serde_json::to_string_pretty(payload)?);
	Ok(())
}
