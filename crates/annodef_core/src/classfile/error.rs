use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, ClassFileError>;

/// Errors produced while reading class files and loading expectation documents.
#[derive(Debug, Error)]
pub enum ClassFileError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Expectation document was not valid JSON for the expected shape.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// Leading magic is not `0xCAFEBABE`.
	#[error("not a class file (magic=0x{magic:08x})")]
	BadMagic {
		/// First four bytes read as big-endian.
		magic: u32,
	},
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Constant pool entry tag is not one the reader knows.
	#[error("unknown constant pool tag {tag} at offset {at}")]
	UnknownConstantTag {
		/// Raw tag byte.
		tag: u8,
		/// Byte offset of the tag.
		at: usize,
	},
	/// `CONSTANT_Utf8` payload is not valid modified UTF-8.
	#[error("malformed modified utf-8 at byte {at}")]
	BadModifiedUtf8 {
		/// Byte offset inside the entry payload.
		at: usize,
	},
	/// Constant pool reference is zero or past the end of the pool.
	#[error("constant pool index {idx} out of range (pool size {len})")]
	PoolIndexOutOfRange {
		/// Offending index.
		idx: u16,
		/// Declared pool size (`constant_pool_count`).
		len: usize,
	},
	/// Constant pool reference points at an entry of the wrong kind.
	#[error("constant pool index {idx}: expected {expected}, got {got}")]
	PoolEntryMismatch {
		/// Offending index.
		idx: u16,
		/// Entry kind required by the reader.
		expected: &'static str,
		/// Entry kind actually stored.
		got: &'static str,
	},
	/// Element-value tag byte is not part of the format.
	#[error("unknown element value tag 0x{tag:02x} at offset {at}")]
	UnknownElementTag {
		/// Raw tag byte.
		tag: u8,
		/// Byte offset of the tag.
		at: usize,
	},
	/// Element-value nesting exceeded the decoder ceiling.
	#[error("element value nesting exceeded (max={max_depth})")]
	ElementDepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Expectation tag character is not part of the format.
	#[error("unknown expectation tag {tag:?}")]
	UnknownSpecTag {
		/// Offending tag character.
		tag: char,
	},
	/// Expectation values do not fit the shape required by the tag.
	#[error("invalid expectation for tag {tag:?}: {reason}")]
	InvalidSpec {
		/// Tag of the offending expectation.
		tag: char,
		/// What was wrong with its values.
		reason: String,
	},
}
