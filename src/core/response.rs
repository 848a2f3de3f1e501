use crate::core::prompt::{FILE_END_MARKER, FILE_START_MARKER};
use crate::domain::model::FixedFiles;

/// Extracts `START_FILE: <path>` ... `END_FILE` blocks from a model reply.
///
/// Text before the first marker is ignored. A block with no path line or no
/// closing marker is dropped with a warning. When a path appears twice the
/// later block wins.
pub fn parse_fixed_files(text: &str) -> FixedFiles {
    let mut fixed_files = FixedFiles::new();

    for block in text.split(FILE_START_MARKER).skip(1) {
        if block.trim().is_empty() {
            continue;
        }

        let Some((path_line, rest)) = block.split_once('\n') else {
            tracing::warn!("Skipping block without a body: {:?}", block.trim());
            continue;
        };

        let path = path_line.trim();
        if path.is_empty() {
            tracing::warn!("Skipping block with an empty path");
            continue;
        }

        match rest.rfind(FILE_END_MARKER) {
            Some(end) => {
                fixed_files.insert(path.to_string(), rest[..end].trim().to_string());
            }
            None => tracing::warn!("Could not find {} for {}", FILE_END_MARKER, path),
        }
    }

    fixed_files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_multiple_blocks() {
        let reply = "Here you go.\n\
            START_FILE: src/app.js\n\
            const x = 1;\n\
            END_FILE\n\
            START_FILE: src/lib/util.js\n\
            export const y = 2;\n\
            END_FILE\n";

        let fixed = parse_fixed_files(reply);
        assert_eq!(fixed.len(), 2);
        assert_eq!(fixed["src/app.js"], "const x = 1;");
        assert_eq!(fixed["src/lib/util.js"], "export const y = 2;");
    }

    #[test]
    fn test_block_without_end_marker_is_skipped() {
        let reply = "START_FILE: a.py\nprint(1)\n\
            START_FILE: b.py\nprint(2)\nEND_FILE";

        let fixed = parse_fixed_files(reply);
        assert_eq!(fixed.len(), 1);
        assert_eq!(fixed["b.py"], "print(2)");
    }

    #[test]
    fn test_content_ends_at_last_end_marker() {
        // The body mentions the marker itself; only the final one closes the block.
        let reply = "START_FILE: notes.md\nwrite END_FILE when done\nEND_FILE\n";

        let fixed = parse_fixed_files(reply);
        assert_eq!(fixed["notes.md"], "write END_FILE when done");
    }

    #[test]
    fn test_block_without_newline_is_skipped() {
        assert!(parse_fixed_files("START_FILE: lonely.txt").is_empty());
    }

    #[test]
    fn test_later_block_wins_and_path_is_trimmed() {
        let reply = "START_FILE:  a.txt  \nfirst\nEND_FILE\nSTART_FILE: a.txt\nsecond\nEND_FILE";

        let fixed = parse_fixed_files(reply);
        assert_eq!(fixed.len(), 1);
        assert_eq!(fixed["a.txt"], "second");
    }

    #[test]
    fn test_reply_without_blocks_yields_nothing() {
        assert!(parse_fixed_files("No changes were necessary.").is_empty());
        assert!(parse_fixed_files("").is_empty());
    }

    #[test]
    fn test_text_before_first_marker_is_not_a_block() {
        let reply = "notes.txt\nlooks like a file\nEND_FILE\nSTART_FILE: a.py\nx = 1\nEND_FILE";
        let fixed = parse_fixed_files(reply);
        assert_eq!(fixed.len(), 1);
        assert_eq!(fixed["a.py"], "x = 1");
    }
}
