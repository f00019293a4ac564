//! Completion sentinel — makes "command finished" observable in a plain
//! byte stream.
//!
//! A session shell gives no structured signal when a command ends, so every
//! submitted command is wrapped in a line that redirects its output to the
//! command's log file and then appends a marker carrying the exit status:
//!
//! ```text
//! ( <command> ) > <log> 2>&1 ; echo "DTN_EXIT: $?" >> <log>
//! ```
//!
//! The tailer delivers the log bytes back to us, and [`extract`] pulls the
//! marker out again.

use std::path::Path;

/// Prefix of the marker line the wrapped command appends to its log file.
pub const EXIT_MARKER: &str = "DTN_EXIT: ";

/// Build the shell line submitted to a session's stdin for `command`.
///
/// Stdout and stderr both land in `log_path`; the marker is appended to the
/// same file so the tailer sees output and completion in write order.
///
/// The command runs in a subshell: redirection then covers the whole command
/// text (not just its last `;`-separated segment), and an `exit N` inside it
/// terminates only the subshell — the session shell survives and the marker
/// still reports N.
pub fn wrap(command: &str, log_path: &Path) -> String {
    let log = log_path.display();
    format!("( {command} ) > {log} 2>&1 ; echo \"{EXIT_MARKER}$?\" >> {log}\n")
}

/// Scan `text` for a completed marker line.
///
/// Returns the parsed exit code and `text` with the marker line removed, or
/// `(None, text)` unchanged when no marker is present. Only a
/// newline-terminated line is accepted, so a marker whose tail has not been
/// flushed yet is left alone for a later scan — callers re-run `extract`
/// over their accumulated text as more chunks arrive, which is what makes a
/// marker split across two reads eventually parse.
pub fn extract(text: &str) -> (Option<i32>, String) {
    for line in text.split_inclusive('\n') {
        if !line.ends_with('\n') {
            continue;
        }
        let Some(rest) = line.trim_end().strip_prefix(EXIT_MARKER) else {
            continue;
        };
        if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        if let Ok(code) = rest.parse::<i32>() {
            return (Some(code), text.replacen(line, "", 1));
        }
    }
    (None, text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn wrap_redirects_and_appends_marker() {
        let line = wrap("echo hello", &PathBuf::from("/tmp/x.log"));
        assert_eq!(
            line,
            "( echo hello ) > /tmp/x.log 2>&1 ; echo \"DTN_EXIT: $?\" >> /tmp/x.log\n"
        );
    }

    #[test]
    fn extract_without_marker_returns_text_unchanged() {
        let (code, text) = extract("plain output\nmore\n");
        assert_eq!(code, None);
        assert_eq!(text, "plain output\nmore\n");
    }

    #[test]
    fn extract_removes_marker_line() {
        let (code, text) = extract("hello\nDTN_EXIT: 0\n");
        assert_eq!(code, Some(0));
        assert_eq!(text, "hello\n");
    }

    #[test]
    fn extract_parses_multi_digit_codes() {
        let (code, text) = extract("command not found\nDTN_EXIT: 127\n");
        assert_eq!(code, Some(127));
        assert_eq!(text, "command not found\n");
    }

    #[test]
    fn extract_ignores_unterminated_marker() {
        // The marker's newline has not been written yet — must not parse,
        // the caller rescans once the rest of the line arrives.
        let (code, text) = extract("hello\nDTN_EXIT: 12");
        assert_eq!(code, None);
        assert_eq!(text, "hello\nDTN_EXIT: 12");

        let (code, text) = extract("hello\nDTN_EXIT: 12\n");
        assert_eq!(code, Some(12));
        assert_eq!(text, "hello\n");
    }

    #[test]
    fn extract_ignores_marker_text_inside_output() {
        // A line that merely mentions the prefix with trailing junk is output.
        let (code, text) = extract("DTN_EXIT: not-a-code\n");
        assert_eq!(code, None);
        assert_eq!(text, "DTN_EXIT: not-a-code\n");
    }
}
