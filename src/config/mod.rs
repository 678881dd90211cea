// src/config/mod.rs
pub mod feed;
