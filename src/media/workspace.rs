//! Request-scoped temporary directories.
//!
//! Every upload gets its own uniquely-named directory holding the uploaded
//! file, any extracted audio, and the transcript. The directory and its
//! contents are deleted when the `Workspace` is dropped, on success and on
//! every failure path alike.

use crate::error::{AppError, AppResult};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A per-request temporary directory. Never shared between requests.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh uniquely-named workspace under the system temp directory.
    pub fn create() -> AppResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix("transcribe-")
            .tempdir()?;
        Ok(Self { dir })
    }

    /// The workspace directory path.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write uploaded bytes into the workspace, preserving the original filename.
    ///
    /// Only the final path component of the filename is used, so an upload
    /// cannot place files outside the workspace.
    pub async fn stage_upload(&self, filename: &str, bytes: &[u8]) -> AppResult<PathBuf> {
        let name = Path::new(filename)
            .file_name()
            .ok_or_else(|| AppError::Validation("No filename provided.".to_string()))?;
        let dest = self.dir.path().join(name);
        tokio::fs::write(&dest, bytes).await?;
        Ok(dest)
    }

    /// Write the transcript text to `transcript.txt` inside the workspace.
    pub async fn write_transcript(&self, text: &str) -> AppResult<PathBuf> {
        let dest = self.dir.path().join("transcript.txt");
        tokio::fs::write(&dest, text).await?;
        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stage_upload_preserves_filename() {
        let workspace = Workspace::create().unwrap();
        let path = workspace
            .stage_upload("meeting.mp3", b"fake audio")
            .await
            .unwrap();

        assert_eq!(path.file_name().unwrap(), "meeting.mp3");
        assert!(path.starts_with(workspace.path()));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"fake audio");
    }

    #[tokio::test]
    async fn test_path_components_are_stripped() {
        let workspace = Workspace::create().unwrap();
        let path = workspace
            .stage_upload("../../etc/evil.mp3", b"x")
            .await
            .unwrap();

        assert_eq!(path.file_name().unwrap(), "evil.mp3");
        assert!(path.starts_with(workspace.path()));
    }

    #[tokio::test]
    async fn test_workspaces_are_independent() {
        let first = Workspace::create().unwrap();
        let second = Workspace::create().unwrap();
        assert_ne!(first.path(), second.path());

        first.stage_upload("a.mp3", b"a").await.unwrap();
        assert!(!second.path().join("a.mp3").exists());
    }

    #[tokio::test]
    async fn test_drop_removes_directory_and_contents() {
        let workspace = Workspace::create().unwrap();
        let upload = workspace.stage_upload("clip.wav", b"pcm").await.unwrap();
        let transcript = workspace.write_transcript("hello").await.unwrap();
        let root = workspace.path().to_path_buf();

        drop(workspace);

        assert!(!upload.exists());
        assert!(!transcript.exists());
        assert!(!root.exists());
    }
}
