pub mod caption;
pub mod image;
