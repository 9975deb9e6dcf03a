pub mod metadata;
pub mod organisation;
