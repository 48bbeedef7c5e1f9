use crate::core::{Mailer, Storage};
use crate::domain::model::EmailMessage;
use crate::utils::error::{Result, SolarError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

pub const OUTBOX_DIR: &str = "outbox";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEntry {
    pub queued_at: DateTime<Utc>,
    pub message: EmailMessage,
}

/// 將每封信以 JSON 寫入 `outbox/`，由外部寄送程序取走
///
/// 檔名含 pid 與建立時間的實例標記，多個行程共用同一 outbox 也不會互相覆蓋。
pub struct OutboxMailer<S: Storage> {
    storage: S,
    instance: String,
    sequence: AtomicU64,
}

impl<S: Storage> OutboxMailer<S> {
    pub fn new(storage: S) -> Self {
        let started = Utc::now();
        Self {
            storage,
            instance: format!(
                "{}-{:x}",
                std::process::id(),
                started.timestamp_subsec_nanos()
            ),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn entry_path(&self, entry: &OutboxEntry) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!(
            "{}/{}-{}-{}-{:04}.json",
            OUTBOX_DIR,
            entry.queued_at.format("%Y%m%dT%H%M%S%.3fZ"),
            entry.message.kind.as_str(),
            self.instance,
            seq
        )
    }
}

#[async_trait]
impl<S: Storage> Mailer for OutboxMailer<S> {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let entry = OutboxEntry {
            queued_at: Utc::now(),
            message: message.clone(),
        };
        let path = self.entry_path(&entry);
        let data = serde_json::to_vec_pretty(&entry)?;

        tracing::debug!("Writing outbox entry ({} bytes) to {}", data.len(), path);
        self.storage
            .write_file(&path, &data)
            .await
            .map_err(|e| SolarError::DeliveryError {
                message: format!("Could not queue message in outbox: {}", e),
            })
    }
}

/// Mailer that only logs; used for dry runs.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        tracing::info!(
            to = %message.to,
            reply_to = %message.reply_to,
            "✉️ {}",
            message.subject
        );
        tracing::debug!("{}", message.text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::LocalStorage;
    use crate::core::forms::Envelope;
    use crate::domain::model::{ContactForm, FormKind};
    use tempfile::TempDir;

    fn message() -> EmailMessage {
        ContactForm {
            name: "Alex".to_string(),
            email: "alex@example.be".to_string(),
            message: "Hello".to_string(),
        }
        .compose(&Envelope::default())
    }

    #[tokio::test]
    async fn test_outbox_writes_one_file_per_message() {
        let temp_dir = TempDir::new().unwrap();
        let mailer = OutboxMailer::new(LocalStorage::new(temp_dir.path()));

        mailer.send(&message()).await.unwrap();
        mailer.send(&message()).await.unwrap();

        let mut files: Vec<_> = std::fs::read_dir(temp_dir.path().join(OUTBOX_DIR))
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        files.sort();
        assert_eq!(files.len(), 2);

        let entry: OutboxEntry =
            serde_json::from_slice(&std::fs::read(&files[0]).unwrap()).unwrap();
        assert_eq!(entry.message.kind, FormKind::Contact);
        assert_eq!(entry.message.subject, "cv services Contact (Alex, alex@example.be)");
        assert!(files[0].to_string_lossy().contains("-contact-"));
    }

    #[tokio::test]
    async fn test_outbox_names_carry_process_instance() {
        let temp_dir = TempDir::new().unwrap();
        let first = OutboxMailer::new(LocalStorage::new(temp_dir.path()));
        let second = OutboxMailer::new(LocalStorage::new(temp_dir.path()));
        assert!(first
            .instance()
            .starts_with(&format!("{}-", std::process::id())));

        // 兩個實例的序號都從 0 開始
        first.send(&message()).await.unwrap();
        second.send(&message()).await.unwrap();

        let names: Vec<String> = std::fs::read_dir(temp_dir.path().join(OUTBOX_DIR))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(names.iter().all(|n| n.ends_with("-0000.json")));
        if first.instance() != second.instance() {
            assert_eq!(names.len(), 2);
        }
        assert!(names
            .iter()
            .all(|n| n.contains(&format!("-contact-{}-", std::process::id()))));
    }

    #[test]
    fn test_log_mailer_always_succeeds() {
        assert!(tokio_test::block_on(LogMailer.send(&message())).is_ok());
    }
}
