pub mod domain;
pub mod error;
pub mod token;
pub mod types;
