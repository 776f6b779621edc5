//! Public library API for checking `AnnotationDefault` attributes in compiled class files.

/// Class-file reading, element-value decoding, structural verification, and length reconciliation.
pub mod classfile;
