pub mod actions;
pub mod profile;
