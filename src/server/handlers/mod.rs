pub mod categories;
pub mod sessions;
