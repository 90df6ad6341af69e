use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;

/// Repository for the verified endpoint list file
#[derive(Debug, Clone)]
pub struct ResultRepository {
    path: PathBuf,
}

impl ResultRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the file with one endpoint per line
    pub async fn save(&self, verified: &[String]) -> Result<()> {
        let mut contents = String::with_capacity(verified.iter().map(|v| v.len() + 1).sum());
        for endpoint in verified {
            contents.push_str(endpoint);
            contents.push('\n');
        }

        tokio::fs::write(&self.path, contents).await?;
        debug!(
            "Wrote {} verified endpoints to {}",
            verified.len(),
            self.path.display()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sockscheck-{}-{}", std::process::id(), name))
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_contents() {
        let path = temp_path("checked.txt");
        let repo = ResultRepository::new(&path);

        repo.save(&["1.1.1.1:1080".to_string(), "2.2.2.2:1080".to_string()])
            .await
            .unwrap();
        assert_eq!(
            tokio::fs::read_to_string(&path).await.unwrap(),
            "1.1.1.1:1080\n2.2.2.2:1080\n"
        );

        repo.save(&["3.3.3.3:1080".to_string()]).await.unwrap();
        assert_eq!(
            tokio::fs::read_to_string(&path).await.unwrap(),
            "3.3.3.3:1080\n"
        );

        repo.save(&[]).await.unwrap();
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "");

        let _ = tokio::fs::remove_file(&path).await;
    }
}
