pub mod collector;
pub mod writer;
