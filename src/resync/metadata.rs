//! Provenance rewriting for resynchronized sentences.

use std::path::Path;

use crate::corpus::sentence::{SOURCE_SENT_ID_KEY, TEXT_KEY};
use crate::corpus::{Metadata, Sentence};

/// Where a sentence's new morphosyntax came from.
#[derive(Debug, Clone, Copy)]
pub struct Provenance<'a> {
    /// Configured URI of the source corpus release.
    pub corpus_uri: &'a str,
    /// Candidate file the matching sentence was found in.
    pub file: &'a Path,
    /// The matching sentence's own identifier.
    pub sent_id: &'a str,
}

impl Provenance<'_> {
    /// Value written to `source_sent_id`: `<uri> <file> <sent_id>`.
    #[must_use]
    pub fn render(&self) -> String {
        format!("{} {} {}", self.corpus_uri, self.file.display(), self.sent_id)
    }
}

/// Builds the metadata block for a merged sentence.
///
/// `source_sent_id` points at the new source and `text` follows the new
/// tokens. Every other key keeps its value and position; a missing
/// `source_sent_id` is appended.
#[must_use]
pub fn rewrite(old: &Sentence, new: &Sentence, provenance: &Provenance<'_>) -> Metadata {
    let mut metadata = old.metadata.clone();
    metadata.set(SOURCE_SENT_ID_KEY, provenance.render());
    if let Some(text) = new.text().or_else(|| old.text()) {
        metadata.set(TEXT_KEY, text);
    }
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{Corpus, Layout};

    fn sentence(text: &str) -> Sentence {
        Corpus::parse(text, Layout::Plain).unwrap().sentences.remove(0)
    }

    fn old() -> Sentence {
        sentence(
            "# global.columns = ID FORM PARSEME:MWE\n\
             # source_sent_id = http://old UD/old.conllu s1\n\
             # text = He walks fast\n\
             # annotator = x\n\
             1\tHe\n",
        )
    }

    fn new() -> Sentence {
        sentence("# sent_id = train-7\n# text = He walked fast\n1\tHe\n")
    }

    fn provenance(sent_id: &str) -> Provenance<'_> {
        Provenance { corpus_uri: "http://new", file: Path::new("a.conllu"), sent_id }
    }

    #[test]
    fn provenance_renders_three_fields() {
        let p = Provenance {
            corpus_uri: "http://hdl.handle.net/11234/1-5150",
            file: Path::new("UD_English-EWT/en_ewt-ud-train.conllu"),
            sent_id: "train-7",
        };
        assert_eq!(
            p.render(),
            "http://hdl.handle.net/11234/1-5150 UD_English-EWT/en_ewt-ud-train.conllu train-7"
        );
    }

    #[test]
    fn new_tokens_bring_new_text_and_keep_other_keys_in_place() {
        let p = provenance("train-7");
        let meta = rewrite(&old(), &new(), &p);
        let lines: Vec<String> = meta.lines().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec![
                "# global.columns = ID FORM PARSEME:MWE",
                "# source_sent_id = http://new a.conllu train-7",
                "# text = He walked fast",
                "# annotator = x",
            ]
        );
    }

    #[test]
    fn missing_new_text_keeps_old_text_and_appends_provenance() {
        let plain = sentence("# sent_id = train-8\n1\tHe\n");
        let bare = sentence("# text = He walks fast\n1\tHe\n");
        let p = provenance("train-8");
        let meta = rewrite(&bare, &plain, &p);
        let lines: Vec<String> = meta.lines().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec!["# text = He walks fast", "# source_sent_id = http://new a.conllu train-8"]
        );
    }
}
