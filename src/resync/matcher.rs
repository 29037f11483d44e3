//! Finds an old sentence's counterpart among the new-source candidates.

use std::collections::HashMap;
use std::error::Error;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::audit::AuditLog;
use crate::corpus::{Corpus, Layout, Sentence};
use crate::error::{ResyncError, Result};
use crate::ports::{Confirmation, FileSystem, Operator, Topic};

/// Extensions of files picked up when a candidate path is a directory.
const CANDIDATE_EXTENSIONS: [&str; 2] = ["conllu", "cupt"];

/// A new-source sentence and the file it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// File the sentence was read from, as found on the command line or
    /// below a candidate directory.
    pub file: PathBuf,
    /// The sentence itself.
    pub sentence: Sentence,
}

/// How a counterpart was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Same source identifier and the same text.
    Identifier,
    /// Byte-identical text.
    ExactText,
    /// Same text up to case and whitespace, confirmed by the operator.
    Approximate,
}

/// A counterpart found by [`CandidatePool::find`].
#[derive(Debug, Clone, Copy)]
pub struct Found<'a> {
    /// The matching candidate.
    pub candidate: &'a Candidate,
    /// Which rule found it.
    pub kind: MatchKind,
}

/// Read-only index over every new-source sentence.
///
/// Candidates keep file order, then position order; every index lists
/// positions in that order so "first hit" is well defined.
#[derive(Debug, Default)]
pub struct CandidatePool {
    candidates: Vec<Candidate>,
    by_id: HashMap<String, Vec<usize>>,
    by_text: HashMap<String, Vec<usize>>,
    by_normalized: HashMap<String, Vec<usize>>,
}

impl CandidatePool {
    /// Reads every candidate file below `paths`.
    ///
    /// A path may be a file or a directory; directories are walked for
    /// `.conllu` and `.cupt` files.
    ///
    /// # Errors
    ///
    /// Returns an error if a path does not exist, a directory holds no
    /// corpus files, or a file cannot be read or parsed.
    pub fn load(fs: &dyn FileSystem, paths: &[PathBuf]) -> Result<Self> {
        let mut corpora = Vec::new();
        for path in paths {
            for file in candidate_files(fs, path)? {
                let contents = fs
                    .read_to_string(&file)
                    .map_err(|source| ResyncError::Read { path: file.clone(), source })?;
                let corpus = Corpus::parse(&contents, Layout::detect(&file, &contents))
                    .map_err(|source| ResyncError::Malformed { path: file.clone(), source })?;
                let sentences = corpus.sentences.len();
                debug!(file = %file.display(), sentences, "loaded candidates");
                corpora.push((file, corpus));
            }
        }
        Ok(Self::from_corpora(corpora))
    }

    /// Builds a pool from already parsed corpora, in the given order.
    pub fn from_corpora(corpora: impl IntoIterator<Item = (PathBuf, Corpus)>) -> Self {
        let mut pool = Self::default();
        for (file, corpus) in corpora {
            for sentence in corpus.sentences {
                pool.push(Candidate { file: file.clone(), sentence });
            }
        }
        pool
    }

    fn push(&mut self, candidate: Candidate) {
        let position = self.candidates.len();
        let sentence = &candidate.sentence;
        if let Some(id) = sentence.sent_id() {
            self.by_id.entry(id.to_string()).or_default().push(position);
        }
        if let Some(text) = sentence.text() {
            self.by_text.entry(text.to_string()).or_default().push(position);
            self.by_normalized.entry(normalize(text)).or_default().push(position);
        }
        self.candidates.push(candidate);
    }

    /// Number of candidate sentences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns `true` if the pool holds no sentences.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Looks up the counterpart of `old`.
    ///
    /// Rules are tried in order: identifier (only if the text agrees), exact
    /// text, then approximate text. Each approximate hit is put to the
    /// operator; the first one confirmed wins. `Ok(None)` means not found.
    ///
    /// # Errors
    ///
    /// Returns the operator's error if a confirmation could not be obtained.
    pub fn find(
        &self,
        old: &Sentence,
        operator: &dyn Operator,
        audit: &mut AuditLog,
    ) -> std::result::Result<Option<Found<'_>>, Box<dyn Error + Send + Sync>> {
        let Some(text) = old.text() else {
            debug!(sentence = old.label(), "no text to match on");
            return Ok(None);
        };

        if let Some(id) = old.source_sent_id() {
            let hit = self
                .hits(&self.by_id, id)
                .find(|c| c.sentence.text() == Some(text));
            if let Some(candidate) = hit {
                return Ok(Some(Found { candidate, kind: MatchKind::Identifier }));
            }
            debug!(sentence = old.label(), "identifier gave no candidate with the same text");
        }

        if let Some(candidate) = self.hits(&self.by_text, text).next() {
            return Ok(Some(Found { candidate, kind: MatchKind::ExactText }));
        }

        for candidate in self.hits(&self.by_normalized, &normalize(text)) {
            let request = Confirmation {
                topic: Topic::ApproximateMatch,
                sentence: old.label().to_string(),
                context: vec![
                    format!("old: {text}"),
                    format!(
                        "new: {} ({} {})",
                        candidate.sentence.text().unwrap_or_default(),
                        candidate.file.display(),
                        candidate.sentence.label()
                    ),
                ],
                question: "Is this the same sentence?".into(),
            };
            if audit.confirm(operator, &request)? {
                return Ok(Some(Found { candidate, kind: MatchKind::Approximate }));
            }
        }

        Ok(None)
    }

    fn hits<'a>(
        &'a self,
        index: &'a HashMap<String, Vec<usize>>,
        key: &str,
    ) -> impl Iterator<Item = &'a Candidate> + 'a {
        index.get(key).into_iter().flatten().map(|&i| &self.candidates[i])
    }
}

/// Case-folded text with all whitespace removed.
fn normalize(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).flat_map(char::to_lowercase).collect()
}

fn candidate_files(fs: &dyn FileSystem, path: &Path) -> Result<Vec<PathBuf>> {
    if !fs.exists(path) {
        return Err(ResyncError::NoFiles { path: path.to_path_buf() });
    }
    if !fs.is_dir(path) {
        return Ok(vec![path.to_path_buf()]);
    }
    let files: Vec<PathBuf> = fs
        .walk_files(path)
        .map_err(|source| ResyncError::Read { path: path.to_path_buf(), source })?
        .into_iter()
        .filter(|f| {
            f.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| CANDIDATE_EXTENSIONS.contains(&e))
        })
        .collect();
    if files.is_empty() {
        return Err(ResyncError::NoFiles { path: path.to_path_buf() });
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::scripted::{FixedOperator, ScriptedOperator};
    use crate::resync::testing::{audit, MemFs};

    fn corpus(text: &str) -> Corpus {
        Corpus::parse(text, Layout::Plain).unwrap()
    }

    fn old(meta: &str) -> Sentence {
        corpus(&format!("{meta}1\tx\n")).sentences.remove(0)
    }

    fn pool() -> CandidatePool {
        CandidatePool::from_corpora([
            (
                PathBuf::from("ud/a.conllu"),
                corpus(
                    "# sent_id = a-1\n# text = The cat sat.\n1\tThe\n\n\
                     # sent_id = a-2\n# text = Dogs bark.\n1\tDogs\n",
                ),
            ),
            (
                PathBuf::from("ud/b.conllu"),
                corpus(
                    "# sent_id = b-1\n# text = Dogs bark.\n1\tDogs\n\n\
                     # sent_id = b-2\n# text = New  York\n1\tNew\n\n\
                     # sent_id = b-3\n# text = new york\n1\tnew\n",
                ),
            ),
        ])
    }

    #[test]
    fn identifier_with_same_text_wins() {
        let pool = pool();
        let old = old("# source_sent_id = http://x ud/b.conllu b-1\n# text = Dogs bark.\n");
        let found = pool.find(&old, &FixedOperator(false), &mut audit()).unwrap().unwrap();
        assert_eq!(found.kind, MatchKind::Identifier);
        assert_eq!(found.candidate.sentence.sent_id(), Some("b-1"));
    }

    #[test]
    fn stale_identifier_falls_back_to_exact_text() {
        let pool = pool();
        let old = old("# source_sent_id = http://x ud/a.conllu a-1\n# text = Dogs bark.\n");
        let found = pool.find(&old, &FixedOperator(false), &mut audit()).unwrap().unwrap();
        assert_eq!(found.kind, MatchKind::ExactText);
        assert_eq!(found.candidate.sentence.sent_id(), Some("a-2"));
        assert_eq!(found.candidate.file, PathBuf::from("ud/a.conllu"));
    }

    #[test]
    fn approximate_hits_are_confirmed_one_at_a_time() {
        let pool = pool();
        let old = old("# text = NEW YORK\n");
        let op = ScriptedOperator::new([false, true]);
        let mut log = audit();
        let found = pool.find(&old, &op, &mut log).unwrap().unwrap();
        assert_eq!(found.kind, MatchKind::Approximate);
        assert_eq!(found.candidate.sentence.sent_id(), Some("b-3"));
        let asked = op.asked();
        assert_eq!(asked.len(), 2);
        assert!(asked[0].context[1].contains("b-2"));
        assert!(log.render().contains("Is this the same sentence?"));
    }

    #[test]
    fn declining_every_approximate_hit_is_not_found() {
        let pool = pool();
        let old = old("# text = new YORK\n");
        assert!(pool.find(&old, &FixedOperator(false), &mut audit()).unwrap().is_none());
    }

    #[test]
    fn operator_failure_is_reported() {
        let pool = pool();
        let old = old("# text = new YORK\n");
        let op = ScriptedOperator::new([false; 0]);
        assert!(pool.find(&old, &op, &mut audit()).is_err());
    }

    #[test]
    fn sentence_without_text_is_not_found() {
        let pool = pool();
        let old = old("# source_sent_id = http://x ud/a.conllu a-1\n");
        assert!(pool.find(&old, &FixedOperator(true), &mut audit()).unwrap().is_none());
    }

    #[test]
    fn load_walks_directories_for_corpus_files() {
        let fs = MemFs::default();
        fs.insert("ud/train.conllu", "# sent_id = t1\n# text = Hi\n1\tHi\n");
        fs.insert("ud/sub/dev.cupt", "# sent_id = d1\n# text = Yo\n1\tYo\t*\n");
        fs.insert("ud/README.md", "# not a corpus\n");
        let pool = CandidatePool::load(&fs, &[PathBuf::from("ud")]).unwrap();
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn missing_candidate_path_is_fatal() {
        let fs = MemFs::default();
        let err = CandidatePool::load(&fs, &[PathBuf::from("nowhere")]).unwrap_err();
        assert!(matches!(err, ResyncError::NoFiles { .. }));
    }

    #[test]
    fn malformed_candidate_file_is_fatal() {
        let fs = MemFs::default();
        fs.insert("bad.conllu", "one-column\n");
        let err = CandidatePool::load(&fs, &[PathBuf::from("bad.conllu")]).unwrap_err();
        assert!(matches!(err, ResyncError::Malformed { .. }));
    }
}
