pub mod human;
pub mod output;
