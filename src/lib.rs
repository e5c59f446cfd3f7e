// src/lib.rs

//! leetcrawl library
//!
//! Sequential, politely paced crawler for the LeetCode problem catalog.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
