//! quizgrade-core: quiz model, definition store, and grading engine.
//!
//! This crate defines the question/quiz data model, the read-only quiz
//! registry, and the pure grading function the rest of quizgrade builds on.

pub mod engine;
pub mod error;
pub mod issue;
pub mod model;
pub mod parser;
pub mod results;
pub mod scoring;
pub mod snapshot;
pub mod store;
