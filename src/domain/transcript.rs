//! Plain-text persistence of a decision tree.
//!
//! A transcript lists the nodes in pre-order, one per line: questions as
//! `Q:<text>` followed by their yes-subtree and then their no-subtree,
//! guesses as `A:<text>`. There is no header, footer or escaping.
//!
//! ```text
//! Q:Does it have wheels?
//! A:car
//! A:computer
//! ```

use std::io::{BufRead, Write};

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::arena::DecisionArena;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::DecisionNode;

pub const QUESTION_LABEL: &str = "Q:";
pub const ANSWER_LABEL: &str = "A:";

enum Entry {
    Question(String),
    Answer(String),
}

/// Writes the subtree rooted at `from` as a transcript.
#[instrument(level = "debug", skip(tree, out))]
pub fn write_transcript<W: Write>(
    tree: &DecisionArena,
    from: Index,
    out: &mut W,
) -> DomainResult<()> {
    tree.node(from)?;
    for visit in tree.iter_from(from) {
        let label = if visit.node.is_leaf() {
            ANSWER_LABEL
        } else {
            QUESTION_LABEL
        };
        writeln!(out, "{}{}", label, visit.node.text()).map_err(DomainError::Transcript)?;
    }
    out.flush().map_err(DomainError::Transcript)
}

/// Renders the whole tree as a transcript string.
pub fn to_transcript(tree: &DecisionArena) -> DomainResult<String> {
    let mut buf = Vec::new();
    write_transcript(tree, tree.root(), &mut buf)?;
    String::from_utf8(buf).map_err(|e| {
        DomainError::Transcript(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

/// Parses a transcript into a new tree.
///
/// The tree is built bottom-up with an explicit stack of open questions, so
/// deeply nested transcripts cannot exhaust the call stack. Blank lines after
/// the complete tree are ignored. Reading does not stop at the end of the
/// tree: any other line after it is rejected with
/// [`DomainError::TrailingContent`], never silently skipped.
#[instrument(level = "debug", skip(input))]
pub fn read_transcript<R: BufRead>(input: R) -> DomainResult<DecisionArena> {
    let mut arena = Arena::new();
    // open questions with their yes-subtree once it is complete
    let mut pending: Vec<(String, Option<Index>)> = Vec::new();
    let mut root = None;
    let mut line_no = 0;

    for line in input.lines() {
        let line = line.map_err(DomainError::Transcript)?;
        line_no += 1;
        let line = line.strip_suffix('\r').unwrap_or(&line);

        if root.is_some() {
            if line.trim().is_empty() {
                continue;
            }
            return Err(DomainError::TrailingContent { line: line_no });
        }

        let mut finished = match parse_line(line, line_no)? {
            Entry::Question(text) => {
                pending.push((text, None));
                continue;
            }
            Entry::Answer(text) => arena.insert(DecisionNode::leaf(text)),
        };

        // a completed subtree fills the innermost open question
        loop {
            match pending.pop() {
                None => {
                    root = Some(finished);
                    break;
                }
                Some((text, None)) => {
                    pending.push((text, Some(finished)));
                    break;
                }
                Some((text, Some(yes))) => {
                    finished = arena.insert(DecisionNode::question(text, yes, finished));
                }
            }
        }
    }

    match root {
        Some(root) => {
            debug!("read {} transcript line(s), {} node(s)", line_no, arena.len());
            Ok(DecisionArena::from_parts(arena, root))
        }
        None if line_no == 0 => Err(DomainError::EmptyTranscript),
        None => Err(DomainError::TruncatedTranscript { lines: line_no }),
    }
}

fn parse_line(line: &str, line_no: usize) -> DomainResult<Entry> {
    if line.len() < 2 {
        return Err(DomainError::malformed(
            line_no,
            "line too short for a Q:/A: label",
        ));
    }
    if let Some(text) = line.strip_prefix(QUESTION_LABEL) {
        Ok(Entry::Question(text.to_string()))
    } else if let Some(text) = line.strip_prefix(ANSWER_LABEL) {
        Ok(Entry::Answer(text.to_string()))
    } else {
        Err(DomainError::malformed(
            line_no,
            format!("expected Q: or A: label, found {:?}", line),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(text: &str) -> DomainResult<DecisionArena> {
        read_transcript(text.as_bytes())
    }

    #[test]
    fn given_single_answer_when_reading_then_single_leaf() {
        let tree = read("A:dog\n").unwrap();

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.leaf_texts(), vec!["dog"]);
        assert_eq!(to_transcript(&tree).unwrap(), "A:dog\n");
    }

    #[test]
    fn given_nested_questions_when_reading_then_shape_preserved() {
        let text = "Q:Is it alive?\nQ:Does it bark?\nA:dog\nA:cat\nA:computer\n";

        let tree = read(text).unwrap();

        let root = tree.get_node(tree.root()).unwrap();
        assert_eq!(root.text(), "Is it alive?");
        let yes = tree.get_node(root.yes().unwrap()).unwrap();
        assert_eq!(yes.text(), "Does it bark?");
        let no = tree.get_node(root.no().unwrap()).unwrap();
        assert_eq!(no.text(), "computer");
        assert!(no.is_leaf());
        assert_eq!(to_transcript(&tree).unwrap(), text);
    }

    #[test]
    fn given_crlf_lines_when_reading_then_carriage_return_stripped() {
        let tree = read("Q:Is it big?\r\nA:whale\r\nA:ant\r\n").unwrap();
        assert_eq!(tree.leaf_texts(), vec!["whale", "ant"]);
    }

    #[test]
    fn given_text_with_colons_when_reading_then_kept_verbatim() {
        let tree = read("Q:Q: or A:?\nA:A:B\nA:\n").unwrap();
        assert_eq!(tree.leaf_texts(), vec!["A:B", ""]);
    }

    #[test]
    fn given_unknown_label_when_reading_then_malformed_line() {
        let result = read("X:bad");
        assert!(matches!(
            result,
            Err(DomainError::MalformedLine { line: 1, .. })
        ));
    }

    #[test]
    fn given_short_line_when_reading_then_malformed_line() {
        let result = read("Q:Is it red?\nA:apple\nQ\n");
        assert!(matches!(
            result,
            Err(DomainError::MalformedLine { line: 3, .. })
        ));
    }

    #[test]
    fn given_missing_subtree_when_reading_then_truncated() {
        let result = read("Q:Is it red?\nA:apple\n");
        assert!(matches!(
            result,
            Err(DomainError::TruncatedTranscript { lines: 2 })
        ));
    }

    #[test]
    fn given_no_lines_when_reading_then_empty_transcript() {
        assert!(matches!(read(""), Err(DomainError::EmptyTranscript)));
    }

    #[test]
    fn given_trailing_blank_lines_when_reading_then_ignored() {
        let tree = read("A:dog\n\n  \n").unwrap();
        assert_eq!(tree.leaf_texts(), vec!["dog"]);
    }

    #[test]
    fn given_trailing_node_when_reading_then_trailing_content() {
        let result = read("A:dog\nA:cat\n");
        assert!(matches!(
            result,
            Err(DomainError::TrailingContent { line: 2 })
        ));
    }

    #[test]
    fn given_deep_chain_when_reading_then_no_stack_overflow() {
        let depth = 100_000;
        let mut text = String::new();
        for i in 0..depth {
            text.push_str(&format!("Q:q{}\nA:a{}\n", i, i));
        }
        text.push_str("A:last\n");

        let tree = read(&text).unwrap();

        assert_eq!(tree.question_count(), depth);
        assert_eq!(tree.depth(), depth + 1);
    }
}
