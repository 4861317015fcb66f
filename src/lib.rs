//! # classload
//!
//! The front end of a JVM class loader: find the bytes of a class on the
//! boot/extension/user classpath and decode them into a class descriptor.
//!
//! ## Architecture
//!
//! - **reader**: Forward-only big-endian cursor over the class file buffer
//! - **error**: Decode error taxonomy (format and reference errors)
//! - **constant_pool**: Tagged constant table with index resolution helpers
//! - **attribute**: Name-keyed attribute records, including `Code`
//! - **class_file**: Top-level decoder producing `ClassDescriptor`
//! - **archive**: Reading a single entry out of a jar/zip
//! - **scan**: Non-recursive jar discovery for wildcard entries
//! - **entry**: Directory, archive, composite and wildcard classpath entries
//! - **classpath**: Boot → ext → user resolution of class names
//! - **config**: JRE discovery and classpath defaults
//! - **cli**: Command line surface of the `classload` binary

pub mod archive;
pub mod attribute;
pub mod class_file;
pub mod classpath;
pub mod cli;
pub mod config;
pub mod constant_pool;
pub mod entry;
pub mod error;
pub mod reader;
pub mod scan;

#[cfg(test)]
mod test_util;

pub use class_file::ClassDescriptor;
pub use classpath::Classpath;
pub use entry::ClasspathEntry;
pub use error::ClassFormatError;
