pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod payload;
pub mod report;

#[cfg(test)]
pub mod test_utils;
