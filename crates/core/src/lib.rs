//! Core domain types for archgraph
//!
//! This crate defines the data structures exchanged between the pipeline
//! stages: raw and canonical relationships, component roles, the canonical
//! graph, external suggestions and the positioned layout.

pub mod component;
pub mod relationship;
pub mod graph;
pub mod suggestion;
pub mod layout;
pub mod error;

pub use component::ComponentRole;
pub use relationship::{RawRelationship, Relationship};
pub use graph::{Graph, GraphBuilder};
pub use suggestion::Suggestion;
pub use layout::{LayerAssignment, Position, PositionedGraph};
pub use error::{CoreError, Result};
