pub mod load;
pub mod summary;
