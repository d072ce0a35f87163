pub mod align;
pub mod classify;
pub mod fadb;
pub mod filter;
pub mod las;
pub mod ranges;
pub mod report;
