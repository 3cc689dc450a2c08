//! Discogen Core Library
//!
//! This library compiles Google Discovery documents into single-file,
//! statically-typed TypeScript client modules: it flattens the resource
//! tree into request methods, translates the Discovery type system into
//! TypeScript types, and synthesizes wire ↔ runtime codecs for exactly the
//! schemas that need them.

pub mod codec;
pub mod config;
pub mod convert;
pub mod discovery;
pub mod error;
pub mod flatten;
pub mod generator;
pub mod methods;
pub mod naming;
pub mod schema;
pub mod types;
pub mod writer;

pub use crate::{
    config::Config,
    discovery::DiscoveryDocument,
    error::{Error, Result},
    generator::{Generator, RUNTIME_MODULE},
};
