pub mod datasets;
pub mod extract;
