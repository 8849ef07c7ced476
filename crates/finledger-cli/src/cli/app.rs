//! Per-invocation state: config, the auth context and the navigator.

use anyhow::{Result, bail};
use finledger_core::api::{ApiClient, ApiError};
use finledger_core::auth::AuthContext;
use finledger_core::config::Config;
use finledger_core::guard::{Navigator, Route};
use finledger_core::session::SessionHandle;

pub struct App {
    pub config: Config,
    auth: AuthContext,
    navigator: Navigator,
}

impl App {
    /// Opens the file-backed session and restores it.
    pub fn open(config: Config) -> Result<Self> {
        let session = SessionHandle::file_backed();
        let api = ApiClient::from_config(&config, session)?;
        tracing::debug!(api = %api.base_url(), "using backend");
        let navigator = Navigator::new(api.session().subscribe(), api.subscribe());
        let auth = AuthContext::new(api);
        auth.hydrate();

        Ok(Self {
            config,
            auth,
            navigator,
        })
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn api(&self) -> &ApiClient {
        self.auth.api()
    }

    /// Moves to `route`, failing if the guard sends us elsewhere.
    pub async fn enter(&mut self, route: Route) -> Result<()> {
        let landed = self.navigator.navigate(route).await;
        if landed != route {
            bail!("Not logged in. Run `finledger login` first.");
        }
        Ok(())
    }

    /// Turns an API result into a command result, routing rejected sessions
    /// back to the login view.
    pub fn check<T>(&mut self, result: Result<T, ApiError>) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(err) if err.is_unauthorized() => {
                self.navigator.drain_events();
                Err(anyhow::Error::new(err)
                    .context("Session expired. Run `finledger login` to sign in again"))
            }
            Err(err) => Err(err.into()),
        }
    }
}
