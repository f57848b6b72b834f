//! quizgrade-report: presentation helpers for graded quizzes.
//!
//! Turns a [`GradeResult`](quizgrade_core::results::GradeResult) into
//! display text and HTML. Nothing here affects scoring.

pub mod html;
pub mod message;
