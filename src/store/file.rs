// src/store/file.rs

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};

use super::{QuestionStore, ScoreStore, SettingsStore, StoreError, seed_questions};
use crate::models::{question::Question, score::ScoreRecord, settings::QuizSettings};

const QUESTIONS_FILE: &str = "questions.json";
const SCORES_FILE: &str = "scores.jsonl";
const SETTINGS_FILE: &str = "settings.json";

/// Flat-file backend.
///
/// * `questions.json`: the bank as a JSON array, rewritten on every save.
/// * `scores.jsonl`: one score record per line, only ever appended to.
/// * `settings.json`: quiz settings, merged over defaults on load.
pub struct FileStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Opens the data directory, creating and seeding it on first use.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        };

        fs::create_dir_all(&store.dir).await?;

        let questions = store.path(QUESTIONS_FILE);
        if !fs::try_exists(&questions).await? {
            tracing::info!("Seeding question bank at {}", questions.display());
            write_json_atomic(&questions, &seed_questions()).await?;
        }

        let scores = store.path(SCORES_FILE);
        if !fs::try_exists(&scores).await? {
            fs::write(&scores, b"").await?;
        }

        let settings = store.path(SETTINGS_FILE);
        if !fs::try_exists(&settings).await? {
            write_json_atomic(&settings, &QuizSettings::default()).await?;
        }

        Ok(store)
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }
}

async fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(e.into()),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
        file: path.display().to_string(),
        source,
    })
}

/// Writes to a sibling temp file, then renames over the target.
async fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Json {
        file: path.display().to_string(),
        source,
    })?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

#[async_trait]
impl QuestionStore for FileStore {
    async fn load_questions(&self) -> Result<Vec<Question>, StoreError> {
        let _guard = self.lock.lock().await;
        let questions: Vec<Question> = read_json(&self.path(QUESTIONS_FILE)).await?;
        Ok(questions.into_iter().map(Question::normalize).collect())
    }

    async fn save_questions(&self, questions: &[Question]) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        write_json_atomic(&self.path(QUESTIONS_FILE), questions).await
    }
}

#[async_trait]
impl ScoreStore for FileStore {
    async fn append_score(&self, record: &ScoreRecord) -> Result<(), StoreError> {
        let path = self.path(SCORES_FILE);
        let mut line = serde_json::to_vec(record).map_err(|source| StoreError::Json {
            file: path.display().to_string(),
            source,
        })?;
        line.push(b'\n');

        let _guard = self.lock.lock().await;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }

    async fn load_scores(&self) -> Result<Vec<ScoreRecord>, StoreError> {
        let _guard = self.lock.lock().await;
        let content = match fs::read_to_string(self.path(SCORES_FILE)).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ScoreRecord>(line) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Skipping malformed score record on line {}: {}", idx + 1, e),
            }
        }
        Ok(records)
    }

    async fn clear_scores(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        fs::write(self.path(SCORES_FILE), b"").await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for FileStore {
    async fn load_settings(&self) -> Result<QuizSettings, StoreError> {
        let _guard = self.lock.lock().await;
        read_json(&self.path(SETTINGS_FILE)).await
    }

    async fn save_settings(&self, settings: &QuizSettings) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        write_json_atomic(&self.path(SETTINGS_FILE), settings).await
    }
}
