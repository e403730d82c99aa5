// src/engine/mod.rs

//! Quiz assembly and grading.
//!
//! Both operations are synchronous and total over their inputs. Callers load
//! the bank, hand it to [`assemble`], keep the result fixed for the attempt,
//! and pass the same sequence to [`grade`] together with the collected answers.

pub mod assembler;
pub mod grader;

pub use assembler::assemble;
pub use grader::{FeedbackItem, GradeReport, grade};
