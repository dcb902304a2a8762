pub mod args;
pub mod config;
pub mod date;
pub mod dialect;
pub mod extract;
pub mod metadata;
pub mod nctg;
pub mod text;
pub mod tree;
