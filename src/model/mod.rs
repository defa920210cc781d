//! Typed records produced by the decoding and parsing pipelines.
//!
//! The JSON service API and the HTML notebook describe books and annotations
//! differently and are never merged, so each surface has its own record type:
//! [`LibraryBook`] / [`Annotation`] for JSON, [`NotebookBook`] /
//! [`NotebookAnnotation`] for HTML.

mod annotation;
mod book;

pub use annotation::{Annotation, AnnotationColor, AnnotationKind, NotebookAnnotation};
pub use book::{BookDetails, BookMetadata, LastPageRead, LibraryBook, NotebookBook};
