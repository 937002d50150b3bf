use itertools::{repeat_n, Itertools};

use crate::{
    automaton::{Alphabet, Language, Symbol},
    error::Result,
};

/// Searches for a word of length below `max_word_length` that is accepted by
/// exactly one of the two automata. Words are enumerated by length, so the
/// returned word is a shortest one.
///
/// Alphabets are compared as sets. If they differ, `None` is returned only if
/// no distinguishing word exists over the alphabet of `a`.
pub fn distinguishing_word<S: Symbol>(
    a: &impl Language<Letter = S>,
    b: &impl Language<Letter = S>,
    max_word_length: usize,
) -> Result<Option<Vec<S>>> {
    if max_word_length == 0 {
        return Ok(None);
    }

    if a.accepts(std::iter::empty())? != b.accepts(std::iter::empty())? {
        return Ok(Some(vec![]));
    }

    for length in 1..max_word_length {
        let words = repeat_n(a.alphabet(), length).multi_cartesian_product();

        for word in words {
            let word = word.into_iter().cloned().collect_vec();
            if a.accepts(&word)? != b.accepts(&word)? {
                return Ok(Some(word));
            }
        }
    }

    Ok(None)
}

/// Checks if two automata accept the same language.
/// This is done by checking if the alphabets are the same and then checking if
/// the automata accept the same words up to a certain length.
pub fn same_language<S: Symbol>(
    a: &impl Language<Letter = S>,
    b: &impl Language<Letter = S>,
    max_word_length: usize,
) -> Result<bool> {
    if !same_alphabet(a, b) {
        return Ok(false);
    }

    Ok(distinguishing_word(a, b, max_word_length)?.is_none())
}

pub fn assert_same_language<S: Symbol>(
    a: &impl Language<Letter = S>,
    b: &impl Language<Letter = S>,
    max_word_length: usize,
) {
    assert!(same_alphabet(a, b), "Alphabets are not the same");

    match distinguishing_word(a, b, max_word_length) {
        Ok(None) => {}
        Ok(Some(word)) => panic!(
            "{:?} is accepted by exactly one of the automata. Thus their languages are not equal.",
            word
        ),
        Err(e) => panic!("Failed to run word on automaton: {}", e),
    }
}

fn same_alphabet<S: Symbol>(a: &impl Alphabet<Letter = S>, b: &impl Alphabet<Letter = S>) -> bool {
    a.alphabet().iter().sorted().eq(b.alphabet().iter().sorted())
}
