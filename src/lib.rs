pub mod catalog;
pub mod guid;
pub mod output;
pub mod runner;
pub mod snapshot;
pub mod store;
pub mod strategy;
