pub mod emitter;
pub mod emitters;
pub mod error;
pub mod generator;
pub mod module;
pub mod refs;
pub mod type_mapper;

pub use emitter::TypeScriptEmitter;
pub use error::GenerateError;
pub use generator::{
    generate_document, generate_document_sections, generate_module, generate_sections,
};
pub use module::render_module;
