//! Persisting one message to disk: sequence numbering, body text, and
//! streamed attachment downloads.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{FetchError, Result};
use crate::model::identity::ResolvedIdentity;
use crate::model::message::Message;

/// Subdirectory of the downloads root that holds every sender directory.
pub const INBOX_DIR_NAME: &str = "AlgebraixInbox";

/// GET a URL and stream the response body.
///
/// A non-success status is a fatal [`FetchError::Download`]; transport-level
/// failures (DNS, TLS, connection) are [`FetchError::Transport`].
pub trait Transport {
    /// Issue a blocking GET, returning a streamable body on success.
    fn get(&self, url: &str) -> Result<Box<dyn Read + '_>>;
}

/// Production [`Transport`] over a blocking reqwest client.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Build a client with timeouts sized for large attachment bodies.
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| FetchError::Transport {
                url: "(client construction)".to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Box<dyn Read + '_>> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Download {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(Box::new(response))
    }
}

/// In-memory [`Transport`] for tests: URL → body bytes or a failing status.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    bodies: HashMap<String, Vec<u8>>,
    failures: HashMap<String, u16>,
}

impl MemoryTransport {
    /// Serve `body` for `url`.
    pub fn with_body(mut self, url: &str, body: &[u8]) -> Self {
        self.bodies.insert(url.to_string(), body.to_vec());
        self
    }

    /// Answer `url` with a non-success `status`.
    pub fn with_failure(mut self, url: &str, status: u16) -> Self {
        self.failures.insert(url.to_string(), status);
        self
    }
}

impl Transport for MemoryTransport {
    fn get(&self, url: &str) -> Result<Box<dyn Read + '_>> {
        if let Some(&status) = self.failures.get(url) {
            return Err(FetchError::Download {
                url: url.to_string(),
                status,
            });
        }
        let body = self
            .bodies
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Download {
                url: url.to_string(),
                status: 404,
            })?;
        Ok(Box::new(Cursor::new(body)))
    }
}

/// What one message wrote to disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct DownloadReport {
    /// Files written (body file plus attachments).
    pub files: usize,
    /// Total bytes written.
    pub bytes: u64,
}

/// The per-sender directory for a resolved identity:
/// `<root>/AlgebraixInbox/<group><CanonicalNameNoSpaces>`.
pub fn target_directory(downloads_root: &Path, identity: &ResolvedIdentity) -> PathBuf {
    downloads_root
        .join(INBOX_DIR_NAME)
        .join(identity.directory_name())
}

/// Smallest sequence number `n ≥ 1` whose `NN.txt` does not exist yet.
///
/// The directory's contents are the only source of truth, which keeps
/// numbering idempotent and collision-free across repeated runs.
pub fn next_sequence(dir: &Path) -> u32 {
    let mut n: u32 = 1;
    while dir.join(format!("{n:02}.txt")).exists() {
        n += 1;
    }
    n
}

/// Write one message's body and attachments into `target_dir`.
///
/// The directory is created if needed. The body file `NN.txt` is always
/// written before the first attachment fetch, so a failed download still
/// leaves the body persisted. Attachments are fetched in page order and
/// written to `NN_<filename>`; the first failure aborts the rest.
pub fn download(
    target_dir: &Path,
    message: &Message,
    transport: &dyn Transport,
) -> Result<DownloadReport> {
    std::fs::create_dir_all(target_dir).map_err(|e| FetchError::io(target_dir, e))?;

    let seq = next_sequence(target_dir);
    let body_path = target_dir.join(format!("{seq:02}.txt"));
    std::fs::write(&body_path, &message.body_text).map_err(|e| FetchError::io(&body_path, e))?;
    tracing::debug!(path = %body_path.display(), "Wrote body text");

    let mut report = DownloadReport {
        files: 1,
        bytes: message.body_text.len() as u64,
    };

    for attachment in &message.attachments {
        let mut body = transport.get(&attachment.url)?;
        let path = target_dir.join(format!("{seq:02}_{}", attachment.filename));
        let mut file = File::create(&path).map_err(|e| FetchError::io(&path, e))?;
        let written = std::io::copy(&mut body, &mut file).map_err(|e| FetchError::io(&path, e))?;
        tracing::debug!(path = %path.display(), bytes = written, "Wrote attachment");
        report.files += 1;
        report.bytes += written;
    }

    Ok(report)
}
