pub mod files;
pub mod git;
pub mod health;
pub mod process;
