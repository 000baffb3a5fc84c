pub mod state;
pub mod studio;
