use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::sets::bulk::{NewWord, duplicate_hints};
use crate::sets::{Word, WordSet};
use crate::store::schema::LibraryData;

const LIBRARY_FILE: &str = "sets.json";
const STARTER_SETS: &str = include_str!("../../assets/sets/starter.json");

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("set not found: {0}")]
    SetNotFound(String),
    #[error("word not found: {0}")]
    WordNotFound(String),
    #[error("set name must not be empty")]
    EmptyName,
    #[error("a word needs a hint and at least one answer")]
    InvalidWord,
    #[error("duplicate hints: {}", .0.join(", "))]
    DuplicateHints(Vec<String>),
}

pub type LibraryResult<T> = Result<T, LibraryError>;

/// Word sets kept in a single JSON document.
pub struct SetLibrary {
    base_dir: PathBuf,
}

impl SetLibrary {
    pub fn new(data_dir: &Path) -> LibraryResult<Self> {
        Self::with_base_dir(data_dir.to_path_buf())
    }

    pub fn with_base_dir(base_dir: PathBuf) -> LibraryResult<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self) -> PathBuf {
        self.base_dir.join(LIBRARY_FILE)
    }

    fn load(&self) -> LibraryResult<LibraryData> {
        let path = self.file_path();
        if !path.exists() {
            let sets: Vec<WordSet> = serde_json::from_str(STARTER_SETS)?;
            info!(sets = sets.len(), "seeding starter library");
            let data = LibraryData {
                sets,
                ..LibraryData::default()
            };
            self.save(&data)?;
            return Ok(data);
        }
        let content = fs::read_to_string(&path)?;
        match serde_json::from_str::<LibraryData>(&content) {
            Ok(data) if !data.needs_reset() => Ok(data),
            Ok(_) => {
                warn!("library schema changed, starting with an empty library");
                Ok(LibraryData::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, data: &LibraryData) -> LibraryResult<()> {
        let path = self.file_path();
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn modify<T>(&self, f: impl FnOnce(&mut LibraryData) -> LibraryResult<T>) -> LibraryResult<T> {
        let mut data = self.load()?;
        let out = f(&mut data)?;
        self.save(&data)?;
        Ok(out)
    }

    pub fn list_sets(&self) -> LibraryResult<Vec<WordSet>> {
        Ok(self.load()?.sets)
    }

    pub fn get_set(&self, set_id: &str) -> LibraryResult<WordSet> {
        self.load()?
            .sets
            .into_iter()
            .find(|s| s.id == set_id)
            .ok_or_else(|| LibraryError::SetNotFound(set_id.to_string()))
    }

    pub fn create_set(&self, name: &str) -> LibraryResult<WordSet> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LibraryError::EmptyName);
        }
        let set = WordSet::new(Uuid::new_v4().to_string(), name, Vec::new());
        self.modify(|data| {
            data.sets.push(set.clone());
            Ok(())
        })?;
        info!(set_id = %set.id, name, "set created");
        Ok(set)
    }

    pub fn rename_set(&self, set_id: &str, name: &str) -> LibraryResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LibraryError::EmptyName);
        }
        self.modify(|data| {
            let set = find_set(data, set_id)?;
            set.name = name.to_string();
            Ok(())
        })
    }

    pub fn delete_set(&self, set_id: &str) -> LibraryResult<()> {
        self.modify(|data| {
            let before = data.sets.len();
            data.sets.retain(|s| s.id != set_id);
            if data.sets.len() == before {
                return Err(LibraryError::SetNotFound(set_id.to_string()));
            }
            Ok(())
        })
    }

    pub fn add_word(&self, set_id: &str, hint: &str, answers: &[String]) -> LibraryResult<Word> {
        let new_word = NewWord {
            hint: hint.trim().to_string(),
            answers: clean_answers(answers),
        };
        let mut added = self.add_words_bulk(set_id, &[new_word])?;
        added.pop().ok_or(LibraryError::InvalidWord)
    }

    /// Adds every word or none: duplicate hints are reported before writing.
    pub fn add_words_bulk(&self, set_id: &str, items: &[NewWord]) -> LibraryResult<Vec<Word>> {
        if items
            .iter()
            .any(|w| w.hint.trim().is_empty() || clean_answers(&w.answers).is_empty())
        {
            return Err(LibraryError::InvalidWord);
        }
        let added = self.modify(|data| {
            let set = find_set(data, set_id)?;
            let duplicates = duplicate_hints(set.words.iter().map(|w| w.hint.as_str()), items);
            if !duplicates.is_empty() {
                return Err(LibraryError::DuplicateHints(duplicates));
            }
            let words: Vec<Word> = items
                .iter()
                .map(|item| Word {
                    id: Uuid::new_v4().to_string(),
                    hint: item.hint.trim().to_string(),
                    answers: clean_answers(&item.answers),
                    progress_counter: 0,
                    origin_set_id: None,
                })
                .collect();
            set.words.extend(words.iter().cloned());
            Ok(words)
        })?;
        info!(set_id, count = added.len(), "words added");
        Ok(added)
    }

    pub fn update_word(&self, word_id: &str, hint: &str, answers: &[String]) -> LibraryResult<()> {
        let hint = hint.trim();
        let answers = clean_answers(answers);
        if hint.is_empty() || answers.is_empty() {
            return Err(LibraryError::InvalidWord);
        }
        self.modify(|data| {
            let word = data
                .sets
                .iter_mut()
                .flat_map(|s| s.words.iter_mut())
                .find(|w| w.id == word_id)
                .ok_or_else(|| LibraryError::WordNotFound(word_id.to_string()))?;
            word.hint = hint.to_string();
            word.answers = answers;
            Ok(())
        })
    }

    pub fn delete_word(&self, word_id: &str) -> LibraryResult<()> {
        self.modify(|data| {
            for set in &mut data.sets {
                if let Some(pos) = set.words.iter().position(|w| w.id == word_id) {
                    set.words.remove(pos);
                    return Ok(());
                }
            }
            Err(LibraryError::WordNotFound(word_id.to_string()))
        })
    }
}

fn find_set<'a>(data: &'a mut LibraryData, set_id: &str) -> LibraryResult<&'a mut WordSet> {
    data.sets
        .iter_mut()
        .find(|s| s.id == set_id)
        .ok_or_else(|| LibraryError::SetNotFound(set_id.to_string()))
}

fn clean_answers(answers: &[String]) -> Vec<String> {
    answers
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}
