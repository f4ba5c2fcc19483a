pub mod ast;
pub mod builder;
pub mod parser;
pub mod cache;
