// src/lib.rs

//! Afropedia client library.
//!
//! A typed client for the Afropedia REST backend and the terminal views
//! built on it: articles with references, revision history and diffs,
//! comments, moderation, peer review, the book library and notifications.

pub mod backend;
pub mod error;
pub mod models;
pub mod pages;
pub mod render;
pub mod services;
pub mod session;
pub mod utils;
