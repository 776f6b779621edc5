mod attribute;
mod bytes;
mod case;
mod class;
mod element;
mod error;
mod expected;
mod length;
mod outcome;
mod pool;
mod scalar;
mod verify;

/// Decoded `AnnotationDefault` attribute record.
pub use attribute::{ANNOTATION_DEFAULT, AnnotationDefault};
/// Bounded big-endian byte cursor.
pub use bytes::Cursor;
/// Case configuration, driver entry point, and reports.
pub use case::{CaseConfig, CaseReport, DefaultPresence, MethodReport, Repeatability, RetentionPolicy, check_class};
/// Class-file structure.
pub use class::{AttributeInfo, ClassFile, MemberInfo};
/// Tagged element-value model.
pub use element::{Annotation, ConstTag, Element, ElementValue, LeafRole, Pair, Tag};
/// Error and result aliases.
pub use error::{ClassFileError, Result};
/// Expectation documents and compiled expectation trees.
pub use expected::{ExpectedDoc, ExpectedSet, ExpectedSpec, ExpectedValue, RawToken, Token};
/// Length reconciliation entry point.
pub use length::check_length;
/// Comparison outcome types.
pub use outcome::{Check, Outcome, Side};
/// Constant pool representation.
pub use pool::{Constant, ConstantPool};
/// Width-exact literal values.
pub use scalar::Scalar;
/// Structural verification entry point.
pub use verify::{ROOT_PATH, verify};

#[cfg(test)]
mod test_support;
