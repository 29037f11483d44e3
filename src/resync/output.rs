//! Input discovery and output placement.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use tracing::info;

use super::audit::AuditLog;
use crate::corpus::{Corpus, Layout};
use crate::error::{ResyncError, Result};
use crate::ports::FileSystem;

/// Extension of annotated corpus files.
const CORPUS_EXTENSION: &str = "cupt";

/// Where the files produced for one input go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// The reannotated corpus: `<stem>.<suffix>.<ext>`.
    pub corpus: PathBuf,
    /// The audit log: `<stem>.reannotation.log`.
    pub log: PathBuf,
    /// The not-found report: `<stem>.notfound.txt`.
    pub not_found: PathBuf,
}

impl OutputPaths {
    /// Places the outputs for `input` next to it, or in `output_dir`.
    #[must_use]
    pub fn for_input(input: &Path, output_dir: Option<&Path>, suffix: &str) -> Self {
        let stem = input.file_stem().map_or_else(|| "corpus".into(), |s| s.to_string_lossy());
        let ext =
            input.extension().map_or_else(|| CORPUS_EXTENSION.into(), |e| e.to_string_lossy());
        let dir = output_dir
            .map(Path::to_path_buf)
            .or_else(|| input.parent().map(Path::to_path_buf))
            .unwrap_or_default();

        Self {
            corpus: dir.join(format!("{stem}.{suffix}.{ext}")),
            log: dir.join(format!("{stem}.reannotation.log")),
            not_found: dir.join(format!("{stem}.notfound.txt")),
        }
    }

    fn all(&self) -> [&PathBuf; 3] {
        [&self.corpus, &self.log, &self.not_found]
    }
}

/// Expands the input arguments into corpus files.
///
/// Files are taken as given. Directories are walked for `.cupt` files,
/// skipping earlier outputs (files already carrying `suffix`).
///
/// # Errors
///
/// Returns an error if a path does not exist or a directory holds no
/// corpus files.
pub fn collect_inputs(
    fs: &dyn FileSystem,
    paths: &[PathBuf],
    suffix: &str,
) -> Result<Vec<PathBuf>> {
    let produced = format!(".{suffix}.{CORPUS_EXTENSION}");
    let mut inputs = Vec::new();
    for path in paths {
        if !fs.exists(path) {
            return Err(ResyncError::NoFiles { path: path.clone() });
        }
        if !fs.is_dir(path) {
            inputs.push(path.clone());
            continue;
        }
        let found: Vec<PathBuf> = fs
            .walk_files(path)
            .map_err(|source| ResyncError::Read { path: path.clone(), source })?
            .into_iter()
            .filter(|f| f.extension().is_some_and(|e| e == CORPUS_EXTENSION))
            .filter(|f| !f.to_string_lossy().ends_with(&produced))
            .collect();
        if found.is_empty() {
            return Err(ResyncError::NoFiles { path: path.clone() });
        }
        inputs.extend(found);
    }
    Ok(inputs)
}

/// Reads and parses one input corpus.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is malformed.
pub fn read_corpus(fs: &dyn FileSystem, path: &Path) -> Result<Corpus> {
    let contents = fs
        .read_to_string(path)
        .map_err(|source| ResyncError::Read { path: path.to_path_buf(), source })?;
    Corpus::parse(&contents, Layout::detect(path, &contents))
        .map_err(|source| ResyncError::Malformed { path: path.to_path_buf(), source })
}

/// Everything produced for one input file, held until the whole run is
/// decided.
#[derive(Debug)]
pub struct FileResult {
    /// The input file.
    pub input: PathBuf,
    /// Where to write.
    pub paths: OutputPaths,
    /// The output corpus.
    pub corpus: Corpus,
    /// The file's transcript.
    pub audit: AuditLog,
}

/// Writes every result.
///
/// Nothing is written unless all output paths are distinct from each other
/// and from every input.
///
/// # Errors
///
/// Returns an error on colliding outputs or a failed write.
pub fn write_results(fs: &dyn FileSystem, results: &[FileResult]) -> Result<()> {
    let inputs: HashSet<PathBuf> = results.iter().map(|r| normalized(&r.input)).collect();
    let mut seen = HashSet::new();
    for path in results.iter().flat_map(|r| r.paths.all()) {
        let key = normalized(path);
        if inputs.contains(&key) || !seen.insert(key) {
            return Err(ResyncError::OutputCollision { path: path.clone() });
        }
    }

    for result in results {
        let write = |path: &Path, contents: &str| {
            fs.write(path, contents)
                .map_err(|source| ResyncError::Write { path: path.to_path_buf(), source })
        };
        write(&result.paths.corpus, &result.corpus.to_string())?;
        write(&result.paths.log, &result.audit.render())?;
        if let Some(report) = result.audit.render_not_found() {
            write(&result.paths.not_found, &report)?;
        }
        info!(output = %result.paths.corpus.display(), "wrote reannotated corpus");
    }
    Ok(())
}

/// Absolute form of `path` with `.` and `..` resolved lexically, so two
/// spellings of one file compare equal.
fn normalized(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir
                if matches!(out.components().next_back(), Some(Component::Normal(_))) =>
            {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resync::testing::{audit, MemFs};

    #[test]
    fn outputs_sit_next_to_the_input_by_default() {
        let paths = OutputPaths::for_input(Path::new("data/fr-train.cupt"), None, "reannotated");
        assert_eq!(paths.corpus, PathBuf::from("data/fr-train.reannotated.cupt"));
        assert_eq!(paths.log, PathBuf::from("data/fr-train.reannotation.log"));
        assert_eq!(paths.not_found, PathBuf::from("data/fr-train.notfound.txt"));
    }

    #[test]
    fn output_dir_overrides_the_input_directory() {
        let paths =
            OutputPaths::for_input(Path::new("data/fr-train.cupt"), Some(Path::new("out")), "v2");
        assert_eq!(paths.corpus, PathBuf::from("out/fr-train.v2.cupt"));
    }

    #[test]
    fn output_overwriting_another_input_is_rejected() {
        let fs = MemFs::default();
        let result = |input: &str| FileResult {
            input: PathBuf::from(input),
            paths: OutputPaths::for_input(Path::new(input), None, "reannotated"),
            corpus: Corpus::default(),
            audit: audit(),
        };
        let results = vec![result("a.cupt"), result("a.reannotated.cupt")];
        let err = write_results(&fs, &results).unwrap_err();
        assert!(matches!(err, ResyncError::OutputCollision { .. }));
        assert!(fs.get("a.reannotation.log").is_none());
    }

    #[test]
    fn differently_spelled_paths_to_one_file_collide() {
        let fs = MemFs::default();
        let results = vec![
            FileResult {
                input: PathBuf::from("./a.cupt"),
                paths: OutputPaths::for_input(Path::new("./a.cupt"), None, "reannotated"),
                corpus: Corpus::default(),
                audit: audit(),
            },
            FileResult {
                input: PathBuf::from("b.cupt"),
                paths: OutputPaths::for_input(Path::new("sub/../a.cupt"), None, "reannotated"),
                corpus: Corpus::default(),
                audit: audit(),
            },
        ];
        let err = write_results(&fs, &results).unwrap_err();
        assert!(matches!(err, ResyncError::OutputCollision { .. }));
        assert!(fs.get("a.reannotated.cupt").is_none());
        assert_eq!(normalized(Path::new("./x/../a.cupt")), normalized(Path::new("a.cupt")));
    }

    #[test]
    fn directories_are_walked_for_fresh_cupt_files() {
        let fs = MemFs::default();
        fs.insert("in/a.cupt", "");
        fs.insert("in/a.reannotated.cupt", "");
        fs.insert("in/sub/b.cupt", "");
        fs.insert("in/notes.txt", "");
        fs.insert("c.conllu", "");
        let roots = [PathBuf::from("in"), PathBuf::from("c.conllu")];
        let inputs = collect_inputs(&fs, &roots, "reannotated").unwrap();
        assert_eq!(inputs, ["in/a.cupt", "in/sub/b.cupt", "c.conllu"].map(PathBuf::from));
    }

    #[test]
    fn missing_input_is_fatal() {
        let fs = MemFs::default();
        assert!(matches!(
            collect_inputs(&fs, &[PathBuf::from("nope")], "reannotated"),
            Err(ResyncError::NoFiles { .. })
        ));
    }

    #[test]
    fn results_are_written_with_report_only_when_needed() {
        let fs = MemFs::default();
        let mut log = audit();
        log.not_found("s3");
        let results = vec![FileResult {
            input: PathBuf::from("a.cupt"),
            paths: OutputPaths::for_input(Path::new("a.cupt"), None, "reannotated"),
            corpus: Corpus::default(),
            audit: log,
        }];
        write_results(&fs, &results).unwrap();
        assert_eq!(fs.get("a.reannotated.cupt").as_deref(), Some(""));
        assert_eq!(fs.get("a.notfound.txt").as_deref(), Some("s3\n"));
        assert!(fs.get("a.reannotation.log").unwrap().contains("s3: not found"));
    }

    #[test]
    fn colliding_outputs_write_nothing() {
        let fs = MemFs::default();
        let result = |input: &str| FileResult {
            input: PathBuf::from(input),
            paths: OutputPaths::for_input(Path::new(input), Some(Path::new("out")), "r"),
            corpus: Corpus::default(),
            audit: audit(),
        };
        let results = vec![result("a/x.cupt"), result("b/x.cupt")];
        assert!(write_results(&fs, &results).is_err());
        assert!(fs.get("out/x.r.cupt").is_none());
    }
}
