pub mod export;
pub mod jpeg;
