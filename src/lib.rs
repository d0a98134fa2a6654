// src/lib.rs

//! jobpress: job-feed fetch, transform and multi-target publisher library

pub mod config;
pub mod error;
pub mod format;
pub mod history;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod rules;
pub mod services;
pub mod storage;
