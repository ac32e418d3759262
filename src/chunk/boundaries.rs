//! Break point detection for chunking

/// Priority levels for break points
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BreakPriority {
    /// Sentence boundary
    Sentence = 1,
    /// Paragraph boundary (highest)
    Paragraph = 2,
}

/// Find the best cut position in `chars[floor..limit]` for the given
/// priority, scanning backwards so the chunk stays as full as possible.
/// The returned position is the index *after* the separator.
pub fn last_break(
    chars: &[char],
    floor: usize,
    limit: usize,
    priority: BreakPriority,
) -> Option<usize> {
    let mut pos = limit;
    while pos > floor {
        if break_ends_at(chars, pos, priority) {
            return Some(pos);
        }
        pos -= 1;
    }
    None
}

fn break_ends_at(chars: &[char], pos: usize, priority: BreakPriority) -> bool {
    match priority {
        BreakPriority::Paragraph => {
            pos >= 2 && chars[pos - 1] == '\n' && chars[pos - 2] == '\n'
        }
        BreakPriority::Sentence => {
            if pos >= 1 && chars[pos - 1] == '\n' {
                return true;
            }
            pos >= 2 && matches!(chars[pos - 2], '.' | '!' | '?') && chars[pos - 1] == ' '
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_break_priority_ordering() {
        assert!(BreakPriority::Paragraph > BreakPriority::Sentence);
    }

    #[test]
    fn test_paragraph_break_found() {
        let text = chars("first para\n\nsecond para");
        let pos = last_break(&text, 0, text.len(), BreakPriority::Paragraph);
        assert_eq!(pos, Some(12)); // index after "\n\n"
    }

    #[test]
    fn test_sentence_break_found() {
        let text = chars("One sentence. Another one here");
        let pos = last_break(&text, 0, text.len(), BreakPriority::Sentence);
        assert_eq!(pos, Some(14)); // index after ". "
    }

    #[test]
    fn test_no_break_in_plain_word_run() {
        let text = chars("nowhitespaceatall");
        assert_eq!(last_break(&text, 0, text.len(), BreakPriority::Paragraph), None);
        assert_eq!(last_break(&text, 0, text.len(), BreakPriority::Sentence), None);
    }

    #[test]
    fn test_floor_excludes_early_breaks() {
        let text = chars("a. bcdefghij");
        // The only sentence break ends at 3, below the floor.
        assert_eq!(last_break(&text, 5, text.len(), BreakPriority::Sentence), None);
    }
}
