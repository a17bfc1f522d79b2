use crate::domain::{Dataset, Store};
use crate::utils::error::{RecommenderError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Flat-file store: one CSV file per dataset inside `data_dir`.
#[derive(Debug, Clone)]
pub struct CsvStore {
    data_dir: PathBuf,
}

impl CsvStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for(&self, dataset: Dataset) -> PathBuf {
        self.data_dir.join(dataset.file_name())
    }

    /// Create the data directory and any missing dataset file with its
    /// header row. Existing files are left untouched.
    pub fn init(&self) -> Result<Vec<Dataset>> {
        fs::create_dir_all(&self.data_dir)?;

        let mut created = Vec::new();
        for dataset in Dataset::ALL {
            let path = self.path_for(dataset);
            if path.exists() {
                continue;
            }
            let mut writer = csv::Writer::from_path(&path)?;
            writer.write_record(dataset.headers())?;
            writer.flush()?;
            tracing::info!("Created {} with header row", path.display());
            created.push(dataset);
        }
        Ok(created)
    }

    fn open(&self, path: &Path, options: &OpenOptions) -> Result<File> {
        options.open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => RecommenderError::StoreUnavailable {
                path: path.display().to_string(),
            },
            _ => RecommenderError::IoError(e),
        })
    }
}

/// True when the file has content that does not end in a newline, in which
/// case a row appended verbatim would be glued onto the last line.
fn missing_trailing_newline(file: &mut File) -> Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

impl Store for CsvStore {
    async fn load<T>(&self, dataset: Dataset) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        let path = self.path_for(dataset);
        let file = self.open(&path, OpenOptions::new().read(true))?;

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(file);
        let rows = reader
            .deserialize()
            .collect::<std::result::Result<Vec<T>, csv::Error>>()?;

        tracing::debug!("Loaded {} rows from {}", rows.len(), path.display());
        Ok(rows)
    }

    async fn append<T>(&self, dataset: Dataset, record: &T) -> Result<()>
    where
        T: Serialize + Sync,
    {
        let path = self.path_for(dataset);
        let mut file = self.open(&path, OpenOptions::new().read(true).append(true))?;

        if missing_trailing_newline(&mut file)? {
            file.write_all(b"\n")?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;

        tracing::debug!("Appended row to {}", path.display());
        Ok(())
    }
}
