pub mod assembler;
mod collections;
pub mod connector;
mod constants;
pub mod errors;
pub mod query_pipeline;
pub mod resolver;
pub mod structs;
