// src/engine/assembler.rs

use rand::{Rng, seq::SliceRandom};

use crate::models::question::Question;

/// Draws a randomised quiz for `module` from the bank.
///
/// * Only questions whose module equals `module` are eligible.
/// * Returns `count` distinct questions sampled without replacement, or every
///   eligible question when `count` is at least the eligible size. Either way
///   the order is random and becomes the numbering and grading order.
/// * Each returned question gets a fresh permutation of its options.
///
/// Never fails; an unknown module or `count == 0` gives an empty quiz.
pub fn assemble<R>(bank: &[Question], module: &str, count: usize, rng: &mut R) -> Vec<Question>
where
    R: Rng + ?Sized,
{
    let mut eligible: Vec<Question> = bank.iter().filter(|q| q.module == module).cloned().collect();

    // A full shuffle followed by truncation is a uniform sample in random order.
    eligible.shuffle(rng);
    eligible.truncate(count);

    for question in &mut eligible {
        question.options.shuffle(rng);
    }

    eligible
}
