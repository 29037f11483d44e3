//! Human-readable transcript of one input file's run.
//!
//! The log is built in memory and written next to the output corpus once
//! every sentence is decided.

use std::error::Error;
use std::path::Path;

use uuid::Uuid;

use super::Counters;
use crate::ports::{Clock, Confirmation, Operator};

/// Transcript of progress, operator questions and answers, and unmatched
/// sentences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLog {
    lines: Vec<String>,
    not_found: Vec<String>,
}

impl AuditLog {
    /// Starts a log with the run header, stamped by `clock`.
    #[must_use]
    pub fn begin(run_id: Uuid, clock: &dyn Clock, mode: &str, input: &Path) -> Self {
        let lines = vec![
            format!("run: {run_id}"),
            format!("mode: {mode}"),
            format!("input: {}", input.display()),
            format!("started: {}", clock.stamp()),
            String::new(),
        ];
        Self { lines, not_found: Vec::new() }
    }

    /// Appends a free-form line.
    pub fn note(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Records that no counterpart was found for `sentence`.
    pub fn not_found(&mut self, sentence: &str) {
        self.lines.push(format!("{sentence}: not found"));
        self.not_found.push(sentence.to_string());
    }

    /// Identifiers of unmatched sentences, in corpus order.
    #[must_use]
    pub fn not_found_ids(&self) -> &[String] {
        &self.not_found
    }

    /// Asks `operator` to confirm `request`, recording the question, its
    /// context and the answer.
    ///
    /// # Errors
    ///
    /// Returns the operator's error; the failure is recorded too.
    pub fn confirm(
        &mut self,
        operator: &dyn Operator,
        request: &Confirmation,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        self.lines.push(format!("{}: {}", request.sentence, request.question));
        self.lines.extend(request.context.iter().map(|line| format!("    {line}")));
        let answer = operator.confirm(request);
        self.lines.push(match &answer {
            Ok(true) => "    answer: yes".to_string(),
            Ok(false) => "    answer: no".to_string(),
            Err(e) => format!("    no answer: {e}"),
        });
        answer
    }

    /// Closes the log with the finish time and the file's counters.
    pub fn finish(&mut self, clock: &dyn Clock, counters: &Counters) {
        self.lines.push(String::new());
        self.lines.push(format!("finished: {}", clock.stamp()));
        self.lines.extend(counters.to_string().lines().map(str::to_string));
    }

    /// The log file contents.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    /// The not-found report, one identifier per line, or `None` when every
    /// sentence was matched.
    #[must_use]
    pub fn render_not_found(&self) -> Option<String> {
        if self.not_found.is_empty() {
            return None;
        }
        let mut out = self.not_found.join("\n");
        out.push('\n');
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::scripted::{FixedOperator, ScriptedOperator};
    use crate::ports::Topic;
    use crate::resync::testing::FixedClock;

    fn log() -> AuditLog {
        AuditLog::begin(Uuid::nil(), &FixedClock, "treebank", Path::new("in.cupt"))
    }

    fn request() -> Confirmation {
        Confirmation {
            topic: Topic::ChangedTokenization,
            sentence: "s4".into(),
            context: vec!["- 2 walks".into(), "+ 2 walked".into()],
            question: "Apply the new tokenization?".into(),
        }
    }

    #[test]
    fn header_names_run_and_input() {
        let text = log().render();
        assert!(text.starts_with("run: 00000000-0000-0000-0000-000000000000\nmode: treebank\n"));
        assert!(text.contains("input: in.cupt"));
        assert!(text.contains("started: 1970-01-01T00:00:00Z\n"));
    }

    #[test]
    fn transcript_records_question_context_and_answer() {
        let mut log = log();
        assert!(log.confirm(&FixedOperator(true), &request()).unwrap());
        let text = log.render();
        assert!(text.contains(
            "s4: Apply the new tokenization?\n    - 2 walks\n    + 2 walked\n    answer: yes\n"
        ));
    }

    #[test]
    fn operator_failure_is_logged_and_returned() {
        let mut log = log();
        assert!(log.confirm(&ScriptedOperator::new([false; 0]), &request()).is_err());
        assert!(log.render().contains("    no answer: no scripted answer left for s4"));
    }

    #[test]
    fn not_found_report_lists_ids_in_order() {
        let mut log = log();
        assert_eq!(log.render_not_found(), None);
        log.not_found("s2");
        log.not_found("s9");
        assert_eq!(log.render_not_found().as_deref(), Some("s2\ns9\n"));
        assert_eq!(log.not_found_ids(), ["s2", "s9"]);
    }

    #[test]
    fn finish_appends_counters() {
        let mut log = log();
        log.finish(&FixedClock, &Counters { auto_updated: 3, ..Counters::default() });
        let text = log.render();
        assert!(text.contains("\nfinished: 1970-01-01T00:00:00Z\n"));
        assert!(text.contains("auto-updated:            3\n"));
    }
}
