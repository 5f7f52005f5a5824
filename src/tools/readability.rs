//! Coleman-Liau text-readability scoring.

use std::fmt;

/// Raw counts the Coleman-Liau index is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStats {
    pub letters: usize,
    pub words: usize,
    pub sentences: usize,
}

/// Reading grade produced by the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    BeforeOne,
    Level(i32),
    SixteenPlus,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::BeforeOne => write!(f, "Before Grade 1"),
            Grade::Level(n) => write!(f, "Grade {}", n),
            Grade::SixteenPlus => write!(f, "Grade 16+"),
        }
    }
}

fn is_sentence_end(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Count letters, whitespace-delimited words, and sentences.
///
/// Consecutive end marks ("Wait...!") count as a single sentence.
pub fn analyze(text: &str) -> TextStats {
    let letters = text.chars().filter(|c| c.is_alphabetic()).count();
    let words = text.split_whitespace().count();

    let mut sentences = 0;
    let mut prev_was_end = false;
    for c in text.chars() {
        let is_end = is_sentence_end(c);
        if is_end && !prev_was_end {
            sentences += 1;
        }
        prev_was_end = is_end;
    }

    TextStats {
        letters,
        words,
        sentences,
    }
}

/// Coleman-Liau grade: 0.0588*L - 0.296*S - 15.8, where L and S are letters
/// and sentences per 100 words, rounded to the nearest grade.
pub fn coleman_liau(stats: TextStats) -> Grade {
    if stats.words == 0 {
        return Grade::BeforeOne;
    }

    let per_hundred = 100.0 / stats.words as f64;
    let l = stats.letters as f64 * per_hundred;
    let s = stats.sentences as f64 * per_hundred;
    let index = (0.0588 * l - 0.296 * s - 15.8).round() as i32;

    if index >= 16 {
        Grade::SixteenPlus
    } else if index < 1 {
        Grade::BeforeOne
    } else {
        Grade::Level(index)
    }
}

/// Analyze and score in one step.
pub fn grade(text: &str) -> Grade {
    coleman_liau(analyze(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_counts() {
        let stats = analyze("One fish. Two fish. Red fish. Blue fish.");
        assert_eq!(
            stats,
            TextStats {
                letters: 29,
                words: 8,
                sentences: 4
            }
        );
    }

    #[test]
    fn test_consecutive_end_marks_are_one_sentence() {
        let stats = analyze("What is going on...?");
        assert_eq!(stats.sentences, 1);
    }

    #[test]
    fn test_grade_two() {
        let text = "Would you like them here or there? I would not like them \
                    here or there. I would not like them anywhere.";
        assert_eq!(grade(text), Grade::Level(2));
    }

    #[test]
    fn test_grade_three() {
        let text = "Congratulations! Today is your day. You're off to Great \
                    Places! You're off and away!";
        assert_eq!(grade(text), Grade::Level(3));
    }

    #[test]
    fn test_before_grade_one() {
        assert_eq!(
            grade("One fish. Two fish. Red fish. Blue fish."),
            Grade::BeforeOne
        );
        assert_eq!(grade(""), Grade::BeforeOne);
    }

    #[test]
    fn test_grade_sixteen_plus() {
        let text = "A large class of computational problems involve the \
                    determination of properties of graphs, digraphs, integers, \
                    arrays of integers, finite families of finite sets, boolean \
                    formulas and elements of other countable domains.";
        assert_eq!(grade(text), Grade::SixteenPlus);
        assert_eq!(grade(text).to_string(), "Grade 16+");
    }
}
