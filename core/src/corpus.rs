use crate::dict::{ChainedHashDictionary, Dictionary};
use crate::page::{Page, PageId};
use crate::tokenizer::tokenize;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// One page as stored on disk. `words` wins over `body` when both are present.
#[derive(Debug, Deserialize)]
struct PageRecord {
    uri: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    links: Vec<String>,
    #[serde(default)]
    words: Option<Vec<String>>,
    #[serde(default)]
    body: Option<String>,
}

/// Pages read from disk, plus their display titles.
#[derive(Debug, Default)]
pub struct Corpus {
    pub pages: Vec<Page>,
    titles: ChainedHashDictionary<PageId, String>,
}

impl Corpus {
    pub fn title(&self, uri: &str) -> Option<&str> {
        self.titles.get(uri).ok().map(String::as_str)
    }

    fn push(&mut self, record: PageRecord) {
        let words = match (record.words, record.body) {
            (Some(words), _) => words,
            (None, Some(body)) => tokenize(&body),
            (None, None) => Vec::new(),
        };
        if let Some(title) = record.title {
            self.titles.put(record.uri.clone(), title);
        }
        self.pages.push(Page { uri: record.uri, links: record.links, words });
    }
}

/// Loads pages from a `.json` / `.jsonl` file, or from every such file under a directory.
pub fn load_corpus(path: impl AsRef<Path>) -> Result<Corpus> {
    let path = path.as_ref();
    let mut files: Vec<PathBuf> = Vec::new();
    if path.is_dir() {
        for entry in WalkDir::new(path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && matches!(extension(p), Some("json" | "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
    } else if path.is_file() {
        files.push(path.to_path_buf());
    } else {
        anyhow::bail!("no such corpus path: {}", path.display());
    }

    let mut corpus = Corpus::default();
    for file in &files {
        if extension(file) == Some("jsonl") {
            read_jsonl(file, &mut corpus)?;
        } else {
            read_json(file, &mut corpus)?;
        }
    }
    debug!(files = files.len(), pages = corpus.pages.len(), "loaded corpus");
    Ok(corpus)
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|s| s.to_str())
}

fn read_jsonl(file: &Path, corpus: &mut Corpus) -> Result<()> {
    let reader = BufReader::new(File::open(file).with_context(|| format!("opening {}", file.display()))?);
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: PageRecord = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: malformed page record", file.display(), number + 1))?;
        corpus.push(record);
    }
    Ok(())
}

fn read_json(file: &Path, corpus: &mut Corpus) -> Result<()> {
    let reader = BufReader::new(File::open(file).with_context(|| format!("opening {}", file.display()))?);
    let json: serde_json::Value = serde_json::from_reader(reader)
        .with_context(|| format!("{}: invalid json", file.display()))?;
    match json {
        serde_json::Value::Array(values) => {
            for value in values {
                corpus.push(serde_json::from_value(value)?);
            }
        }
        serde_json::Value::Object(_) => corpus.push(serde_json::from_value(json)?),
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_jsonl_and_tokenizes_bodies() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("pages.jsonl");
        fs::write(
            &file,
            concat!(
                r#"{"uri":"a","title":"A","links":["b"],"body":"Running dogs"}"#, "\n",
                "\n",
                r#"{"uri":"b","words":["x","y"]}"#, "\n",
            ),
        )
        .unwrap();

        let corpus = load_corpus(&file).unwrap();
        assert_eq!(corpus.pages.len(), 2);
        assert_eq!(corpus.pages[0].words, vec!["run", "dog"]);
        assert_eq!(corpus.pages[0].links, vec!["b"]);
        assert_eq!(corpus.pages[1].words, vec!["x", "y"]);
        assert_eq!(corpus.title("a"), Some("A"));
        assert_eq!(corpus.title("b"), None);
    }

    #[test]
    fn walks_directories_for_json_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("one.json"), r#"[{"uri":"a"},{"uri":"b"}]"#).unwrap();
        fs::write(dir.path().join("two.json"), r#"{"uri":"c"}"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let corpus = load_corpus(dir.path()).unwrap();
        let uris: Vec<&str> = corpus.pages.iter().map(|p| p.uri.as_str()).collect();
        assert_eq!(uris, vec!["a", "b", "c"]);
    }

    #[test]
    fn malformed_line_reports_location() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("bad.jsonl");
        fs::write(&file, "{\"uri\":\"a\"}\nnot json\n").unwrap();
        let err = load_corpus(&file).unwrap_err();
        assert!(format!("{err:#}").contains(":2:"));
    }

    #[test]
    fn missing_path_is_an_error() {
        assert!(load_corpus("/definitely/not/here").is_err());
    }
}
