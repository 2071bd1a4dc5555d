//! Filesystem JSON implementation of the record storage collaborator.
//!
//! Records live under `<root>/<kind>/<context-kind>-<context-id>.json`, one
//! pretty-printed array per context. The context id is percent-encoded in the
//! file name, so distinct ids never share a file. Reference data lives in
//! `<root>/reference.json`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};
use tracing::debug;
use uuid::Uuid;

use spendscope_core::{CoreError, RecordStorage, ReferenceData};
use spendscope_domain::{Category, ContextRef, PaymentMethod, Record, RecordKind};

const FILE_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";
const REFERENCE_FILE_NAME: &str = "reference.json";

/// JSON-file persistence for one record kind.
#[derive(Debug)]
pub struct JsonRecordStorage {
    root: PathBuf,
    kind: RecordKind,
    // Serializes read-modify-write cycles on the record files.
    write_lock: Mutex<()>,
}

impl JsonRecordStorage {
    pub fn new(root: impl Into<PathBuf>, kind: RecordKind) -> Self {
        Self {
            root: root.into(),
            kind,
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding the records of `context`.
    pub fn context_path(&self, context: &ContextRef) -> PathBuf {
        self.root.join(kind_dir(self.kind)).join(format!(
            "{}-{}.{}",
            context.kind(),
            urlencoding::encode(context.id().as_str()),
            FILE_EXTENSION
        ))
    }

    async fn read_records(&self, context: &ContextRef) -> Result<Vec<Record>, CoreError> {
        let path = self.context_path(context);
        if !fs::try_exists(&path).await? {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&path).await?;
        serde_json::from_str(&data).map_err(serde_error)
    }

    async fn write_records(&self, context: &ContextRef, records: &[Record]) -> Result<(), CoreError> {
        let path = self.context_path(context);
        let json = serde_json::to_string_pretty(records).map_err(serde_error)?;
        save_atomic(&path, &json).await
    }
}

#[async_trait]
impl RecordStorage for JsonRecordStorage {
    fn kind(&self) -> RecordKind {
        self.kind
    }

    async fn list(&self, context: &ContextRef, user_id: &str) -> Result<Vec<Record>, CoreError> {
        let records = self.read_records(context).await?;
        debug!(%context, user_id, count = records.len(), "records loaded from disk");
        Ok(records)
    }

    async fn create(&self, context: &ContextRef, mut record: Record) -> Result<Record, CoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_records(context).await?;
        record.id = Some(Uuid::new_v4());
        record.kind = self.kind;
        record.context = context.clone();
        records.push(record.clone());
        self.write_records(context, &records).await?;
        Ok(record)
    }

    async fn update(&self, context: &ContextRef, mut record: Record) -> Result<Record, CoreError> {
        let id = record
            .id
            .ok_or_else(|| CoreError::Validation("cannot update a record that has no id".into()))?;
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_records(context).await?;
        let existing = records
            .iter_mut()
            .find(|candidate| candidate.id == Some(id))
            .ok_or(CoreError::RecordNotFound(id))?;
        record.kind = self.kind;
        record.context = context.clone();
        *existing = record.clone();
        self.write_records(context, &records).await?;
        Ok(record)
    }

    async fn delete(&self, context: &ContextRef, record_id: Uuid) -> Result<(), CoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_records(context).await?;
        let before = records.len();
        records.retain(|record| record.id != Some(record_id));
        if records.len() == before {
            return Err(CoreError::RecordNotFound(record_id));
        }
        self.write_records(context, &records).await
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReferenceFile {
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    payment_methods: Vec<PaymentMethod>,
}

pub fn reference_path(root: &Path) -> PathBuf {
    root.join(REFERENCE_FILE_NAME)
}

/// Reads categories and payment methods; a missing file yields empty tables.
pub async fn load_reference_data(root: &Path) -> Result<ReferenceData, CoreError> {
    let path = reference_path(root);
    if !fs::try_exists(&path).await? {
        debug!(path = %path.display(), "no reference data on disk");
        return Ok(ReferenceData::default());
    }
    let data = fs::read_to_string(&path).await?;
    let file: ReferenceFile = serde_json::from_str(&data).map_err(serde_error)?;
    Ok(ReferenceData::new(file.categories, file.payment_methods))
}

pub async fn save_reference_data(root: &Path, reference: &ReferenceData) -> Result<(), CoreError> {
    let file = ReferenceFile {
        categories: reference.categories.clone(),
        payment_methods: reference.payment_methods.clone(),
    };
    let json = serde_json::to_string_pretty(&file).map_err(serde_error)?;
    save_atomic(&reference_path(root), &json).await
}

fn kind_dir(kind: RecordKind) -> String {
    kind.plural().to_lowercase()
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

async fn save_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let tmp = tmp_path(path);
    let mut file = fs::File::create(&tmp).await?;
    file.write_all(data.as_bytes()).await?;
    file.flush().await?;
    drop(file);
    fs::rename(&tmp, path).await?;
    Ok(())
}

fn serde_error(err: serde_json::Error) -> CoreError {
    CoreError::Transport(format!("serialization error: {err}"))
}
