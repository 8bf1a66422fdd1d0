//! File-based implementation of SubmissionOutbox
//!
//! One pretty-printed JSON file per submission, named `<uuid>.json`.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use uuid::Uuid;

use fieldbill_domain::model::InvoiceSubmission;
use fieldbill_domain::repository::SubmissionOutbox;
use fieldbill_types::Result;

pub struct FileOutbox {
    dir: PathBuf,
}

impl FileOutbox {
    pub fn open(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }
}

impl SubmissionOutbox for FileOutbox {
    fn enqueue(&self, submission: &InvoiceSubmission) -> Result<()> {
        let path = self.file_for(submission.id);
        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(writer, submission)?;
        info!(id = %submission.id, path = %path.display(), "submission queued");
        Ok(())
    }

    fn pending(&self) -> Result<Vec<InvoiceSubmission>> {
        let mut submissions = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let reader = BufReader::new(File::open(&path)?);
            match serde_json::from_reader::<_, InvoiceSubmission>(reader) {
                Ok(submission) => submissions.push(submission),
                Err(e) => warn!(path = %path.display(), "skipping unreadable submission: {}", e),
            }
        }
        submissions.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        Ok(submissions)
    }

    fn remove(&self, id: Uuid) -> Result<bool> {
        let path = self.file_for(id);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        debug!(id = %id, "submission removed from outbox");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use fieldbill_domain::model::InvoiceHeader;
    use fieldbill_domain::service::Ledger;
    use tempfile::tempdir;

    fn submission(customer: &str, minutes_ago: i64) -> InvoiceSubmission {
        InvoiceSubmission {
            id: Uuid::new_v4(),
            form: "invoice".to_string(),
            submitted_at: Utc::now() - Duration::minutes(minutes_ago),
            header: InvoiceHeader {
                customer: customer.to_string(),
                ..Default::default()
            },
            ledger: Ledger::new().snapshot(),
        }
    }

    #[test]
    fn test_enqueue_and_list_oldest_first() {
        let dir = tempdir().unwrap();
        let outbox = FileOutbox::open(dir.path().join("outbox")).unwrap();
        assert!(outbox.dir().is_dir());
        let newer = submission("Newer Co", 1);
        let older = submission("Older Co", 30);
        outbox.enqueue(&newer).unwrap();
        outbox.enqueue(&older).unwrap();

        let pending = outbox.pending().unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].header.customer, "Older Co");
        assert_eq!(pending[1], newer);
    }

    #[test]
    fn test_remove() {
        let dir = tempdir().unwrap();
        let outbox = FileOutbox::open(dir.path().to_path_buf()).unwrap();
        let queued = submission("Acme", 0);
        outbox.enqueue(&queued).unwrap();
        assert!(outbox.remove(queued.id).unwrap());
        assert!(!outbox.remove(queued.id).unwrap());
        assert!(outbox.pending().unwrap().is_empty());
    }

    #[test]
    fn test_foreign_files_are_ignored() {
        let dir = tempdir().unwrap();
        let outbox = FileOutbox::open(dir.path().to_path_buf()).unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        fs::write(dir.path().join("broken.json"), "{").unwrap();
        assert!(outbox.pending().unwrap().is_empty());
    }
}
