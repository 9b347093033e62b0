//! Core intake pipeline.
//!
//! Data flows one direction: raw bytes + declared metadata go through the
//! policy checker, then the bounded extractor (via the dispatcher), producing
//! a per-file result that the batch coordinator aggregates.

pub mod batch;
pub mod bounded;
pub mod mime;
pub mod parser;
pub mod policy;
pub mod signature;
