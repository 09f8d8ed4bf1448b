//! Per-invocation wiring: credential store, API client and auth view-model.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use tokio::sync::broadcast;
use tracing::debug;

use learnverse_core::{AccessToken, BaseUrl};
use learnverse_http::{ApiClient, AuthViewModel, ClientConfig, SessionInvalidated};
use learnverse_store::{CredentialStore, FileCredentialBackend};

use crate::output;

/// Everything a command needs, built once at startup.
pub struct AppContext {
    client: ApiClient,
    view_model: AuthViewModel,
    invalidated: broadcast::Receiver<SessionInvalidated>,
}

impl AppContext {
    pub async fn open(api: &str, data_dir: Option<&Path>) -> Result<Self> {
        let base_url = BaseUrl::new(api).context("Invalid API URL")?;
        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => default_data_dir()?,
        };

        let backend = FileCredentialBackend::in_dir(&data_dir);
        debug!(path = %backend.path().display(), "Using credential file");
        let store = CredentialStore::open(backend)
            .await
            .context("Failed to load stored credentials")?;

        let config = ClientConfig::new(base_url)
            .with_user_agent(format!("learnverse-cli/{}", env!("LEARNVERSE_VERSION")));
        let client = ApiClient::new(config, store).context("Failed to build HTTP client")?;

        let invalidated = client.subscribe_invalidation();
        let view_model = AuthViewModel::new(client.clone());
        view_model.start();

        Ok(Self {
            client,
            view_model,
            invalidated,
        })
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn view_model(&self) -> &AuthViewModel {
        &self.view_model
    }

    /// Fail early when no one is logged in.
    pub fn require_session(&self) -> Result<()> {
        if !self.view_model.session_state().is_logged_in() {
            bail!("Not logged in. Run 'learnverse auth login' first.");
        }
        Ok(())
    }

    /// The stored access token, for calls that attach it by hand.
    pub fn access_token(&self) -> Result<AccessToken> {
        self.client
            .store()
            .access_token()
            .filter(|t| !t.is_blank())
            .context("Not logged in. Run 'learnverse auth login' first.")
    }

    /// Apply any session invalidation observed while the command ran.
    pub async fn finish(mut self) -> Result<()> {
        if self.invalidated.try_recv().is_ok() {
            self.view_model
                .clear_session()
                .await
                .context("Failed to clear stored credentials")?;
            output::error("Your session has expired. Run 'learnverse auth login' to continue.");
        }
        Ok(())
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("app", "LearnVerse", "learnverse")
        .context("Could not determine data directory")?;
    Ok(dirs.data_dir().to_path_buf())
}
