pub mod memory;
pub mod storage;
pub mod user;
