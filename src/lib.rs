pub mod config;
pub mod error;
pub mod input;
pub mod memory;
pub mod messages;
pub mod opcodes;
pub mod symtab;
pub mod third;
pub mod vm;
