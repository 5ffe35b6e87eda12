pub mod config;
pub mod context;
pub mod emit;
pub mod error;
pub mod fragment;
pub mod naming;
pub mod output;
pub mod parse;
pub mod registry;
pub mod transform;

pub use config::TransformOptions;
pub use context::Context;
pub use emit::Emitter;
pub use output::{Output, Section};
pub use parse::document::{Document, OpenApiVersion};
pub use transform::{transform, transform_raw_schema, transform_value, transform_with_operations};
