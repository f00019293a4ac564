//! Log tailer — follows an append-only file as it grows.
//!
//! The shell writes each command's output to a dedicated log file; nothing
//! else signals progress. The tailer reads forward from the file's current
//! position and delivers every newly appended chunk on a channel, waiting at
//! end-of-file instead of terminating when follow mode is on.

use std::io;
use std::time::Duration;

use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

const READ_BUF_SIZE: usize = 4096;

/// How long to wait at end-of-file before probing for appended data.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Start tailing `file` from its current position on a background task.
///
/// Returns two receivers: one delivering non-empty byte chunks in write
/// order, one delivering at most one terminal I/O error. The task runs until
/// `cancel` fires, the error is delivered, or (with `follow` off) end-of-file
/// is reached. Dropping the chunk receiver also stops the task on its next
/// delivery attempt.
///
/// Chunks are trimmed of leading/trailing NUL bytes — pre-allocated file
/// regions read back as zero padding — and an all-NUL read is not delivered
/// at all.
pub fn spawn(
    file: File,
    follow: bool,
    cancel: CancellationToken,
) -> (mpsc::Receiver<Vec<u8>>, mpsc::Receiver<io::Error>) {
    let (chunk_tx, chunk_rx) = mpsc::channel(32);
    let (err_tx, err_rx) = mpsc::channel(1);

    tokio::spawn(read_loop(file, follow, cancel, chunk_tx, err_tx));

    (chunk_rx, err_rx)
}

async fn read_loop(
    mut file: File,
    follow: bool,
    cancel: CancellationToken,
    chunk_tx: mpsc::Sender<Vec<u8>>,
    err_tx: mpsc::Sender<io::Error>,
) {
    let mut buf = [0u8; READ_BUF_SIZE];

    loop {
        let read = tokio::select! {
            _ = cancel.cancelled() => {
                debug!("tailer cancelled");
                return;
            }
            read = file.read(&mut buf) => read,
        };

        match read {
            Ok(0) => {
                if !follow {
                    return;
                }
                // At end-of-file: wait for the writer to append more.
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep(POLL_INTERVAL) => {}
                }
            }
            Ok(n) => {
                let chunk = trim_nul(&buf[..n]);
                if chunk.is_empty() {
                    continue;
                }
                if chunk_tx.send(chunk.to_vec()).await.is_err() {
                    // Receiver gone — nobody cares about this tail anymore.
                    return;
                }
            }
            Err(e) => {
                debug!("tailer read error: {e}");
                let _ = err_tx.send(e).await;
                return;
            }
        }
    }
}

fn trim_nul(chunk: &[u8]) -> &[u8] {
    let start = chunk.iter().position(|&b| b != 0).unwrap_or(chunk.len());
    let end = chunk.iter().rposition(|&b| b != 0).map_or(start, |i| i + 1);
    &chunk[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tokio::time::timeout;

    async fn open(path: &std::path::Path) -> File {
        File::open(path).await.unwrap()
    }

    #[test]
    fn trim_nul_strips_padding() {
        assert_eq!(trim_nul(b"\0\0abc\0"), b"abc");
        assert_eq!(trim_nul(b"abc"), b"abc");
        assert_eq!(trim_nul(b"\0\0\0"), b"");
        assert_eq!(trim_nul(b""), b"");
    }

    #[tokio::test]
    async fn reads_existing_content_then_stops_without_follow() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");
        std::fs::write(&path, b"hello world").unwrap();

        let (mut chunks, mut errors) = spawn(open(&path).await, false, CancellationToken::new());

        let mut collected = Vec::new();
        while let Some(chunk) = chunks.recv().await {
            collected.extend(chunk);
        }
        assert_eq!(collected, b"hello world");
        assert!(errors.recv().await.is_none());
    }

    #[tokio::test]
    async fn follow_mode_delivers_appended_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");
        std::fs::write(&path, b"first").unwrap();

        let cancel = CancellationToken::new();
        let (mut chunks, _errors) = spawn(open(&path).await, true, cancel.clone());

        let first = timeout(Duration::from_secs(5), chunks.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first, b"first");

        // Append after the tailer has hit end-of-file.
        let mut f = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        f.write_all(b"second").unwrap();
        f.flush().unwrap();

        let second = timeout(Duration::from_secs(5), chunks.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second, b"second");

        cancel.cancel();
        // After cancellation the channel closes rather than hanging.
        let end = timeout(Duration::from_secs(5), chunks.recv()).await.unwrap();
        assert!(end.is_none());
    }

    #[tokio::test]
    async fn nul_only_writes_are_not_delivered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");
        std::fs::write(&path, [0u8; 64]).unwrap();

        let (mut chunks, _errors) = spawn(open(&path).await, false, CancellationToken::new());
        assert!(chunks.recv().await.is_none());
    }
}
