pub mod file;
pub mod song;
