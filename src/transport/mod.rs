//! HTTP transport backed by reqwest

use crate::core::{SysrootError, SysrootResult};
use crate::di::Transport;
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Downloads over HTTP(S)
#[derive(Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    async fn get(&self, url: &str) -> SysrootResult<Response> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(SysrootError::Transport(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> SysrootResult<Vec<u8>> {
        let bytes = self.get(url).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn fetch_to_file(&self, url: &str, dest: &Path) -> SysrootResult<()> {
        let mut response = self.get(url).await?;

        // Write next to the destination and rename once complete
        let mut partial = dest.as_os_str().to_owned();
        partial.push(".part");
        let partial = std::path::PathBuf::from(partial);

        let mut file = fs::File::create(&partial).await?;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        drop(file);

        fs::rename(&partial, dest).await?;
        Ok(())
    }
}
