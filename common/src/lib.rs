#![no_std]

pub mod config;
pub mod types;
pub mod utils;
