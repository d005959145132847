pub mod board;
pub mod config;
pub mod highlight;
pub mod scheduler;
pub mod solver;
