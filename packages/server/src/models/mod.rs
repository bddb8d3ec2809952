pub mod file;
pub mod schema;
pub mod song;
