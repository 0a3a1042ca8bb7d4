//! Filesystem primitives for fs-tour
//!
//! Line-oriented text I/O, semicolon-delimited user records, directory
//! traversal with two interchangeable strategies, and zip archive packing.

pub mod archive;
pub mod csv;
pub mod error;
pub mod io;
pub mod path;
pub mod walk;

pub use archive::ZipArchiveWriter;
pub use csv::Record;
pub use error::{Error, Result};
pub use path::EntryPath;
pub use walk::{
    CountingVisitor, DirectoryVisitor, DirectoryWalker, Node, NodeKind, Strategy,
    TraversalResult, VisitControl,
};
