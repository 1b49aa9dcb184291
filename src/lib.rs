pub mod config;
pub mod context;
pub mod corpus;
pub mod display;
pub mod driver;
pub mod errors;
pub mod parse;
pub mod runner;
pub mod stats;
pub mod toolchain;
pub mod types;
