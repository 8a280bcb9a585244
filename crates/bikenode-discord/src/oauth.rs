//! Discord OAuth2 identity provider

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU16, Ordering};

use async_trait::async_trait;
use oauth2::basic::{BasicClient, BasicErrorResponse};
use oauth2::{
    AsyncHttpClient, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken,
    EndpointNotSet, EndpointSet, HttpClientError, HttpRequest, HttpResponse, RedirectUrl,
    RequestTokenError, Scope, TokenResponse, TokenUrl,
};
use tracing::{debug, instrument, warn};

use bikenode_common::DiscordConfig;
use bikenode_core::{
    DiscordLogin, DiscordProfile, DiscordTokens, IdentityProvider, UpstreamError,
};

use crate::error::{check_status, from_body_error, network, ClientSetupError};

const SERVICE: &str = "discord";

/// Fixed scope set requested at login
pub const DISCORD_SCOPES: [&str; 3] = ["identify", "email", "guilds"];

/// OAuth2 client with the authorize and token endpoints configured
pub type OAuth2Client =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Discord login: authorize URL, code exchange and profile fetch
#[derive(Clone)]
pub struct DiscordOAuthClient {
    oauth: OAuth2Client,
    http: reqwest::Client,
    api_base_url: String,
}

impl DiscordOAuthClient {
    pub fn new(config: &DiscordConfig, http: reqwest::Client) -> Result<Self, ClientSetupError> {
        if config.client_id.is_empty() || config.client_secret.is_empty() {
            warn!("Discord client id/secret not configured; logins will fail");
        }

        let oauth = BasicClient::new(ClientId::new(config.client_id.clone()))
            .set_client_secret(ClientSecret::new(config.client_secret.clone()))
            .set_auth_uri(
                AuthUrl::new(config.auth_url.clone())
                    .map_err(|e| ClientSetupError::InvalidUrl("authorize", e.to_string()))?,
            )
            .set_token_uri(
                TokenUrl::new(config.token_url.clone())
                    .map_err(|e| ClientSetupError::InvalidUrl("token", e.to_string()))?,
            )
            .set_redirect_uri(
                RedirectUrl::new(config.redirect_uri.clone())
                    .map_err(|e| ClientSetupError::InvalidUrl("redirect", e.to_string()))?,
            );

        Ok(Self {
            oauth,
            http,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn exchange_token(&self, code: &str) -> Result<DiscordTokens, UpstreamError> {
        let recorder = StatusRecorder::new(&self.http);
        let token = self
            .oauth
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&recorder)
            .await
            .map_err(|e| map_token_error(e, recorder.status()))?;

        Ok(DiscordTokens {
            access_token: token.access_token().secret().clone(),
            refresh_token: token.refresh_token().map(|t| t.secret().clone()),
        })
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<DiscordProfile, UpstreamError> {
        let response = self
            .http
            .get(format!("{}/users/@me", self.api_base_url))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| network(SERVICE, &e))?;

        check_status(SERVICE, response)?
            .json::<DiscordProfile>()
            .await
            .map_err(|e| from_body_error(SERVICE, &e))
    }
}

#[async_trait]
impl IdentityProvider for DiscordOAuthClient {
    fn authorization_url(&self, state: &str) -> String {
        let state = state.to_string();
        let (url, _) = self
            .oauth
            .authorize_url(move || CsrfToken::new(state))
            .add_scopes(DISCORD_SCOPES.iter().map(|s| Scope::new((*s).to_string())))
            .url();
        url.to_string()
    }

    #[instrument(skip(self, code))]
    async fn exchange_code(&self, code: &str) -> Result<DiscordLogin, UpstreamError> {
        let tokens = self.exchange_token(code).await.inspect_err(|e| {
            warn!(error = %e, "Discord token exchange failed");
        })?;
        let profile = self
            .fetch_profile(&tokens.access_token)
            .await
            .inspect_err(|e| warn!(error = %e, "Discord profile fetch failed"))?;

        debug!(discord_id = %profile.id, "Discord login exchanged");
        Ok(DiscordLogin { tokens, profile })
    }
}

impl std::fmt::Debug for DiscordOAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordOAuthClient")
            .field("api_base_url", &self.api_base_url)
            .finish_non_exhaustive()
    }
}

/// oauth2 hides the HTTP status of failed token responses; this wrapper
/// remembers it so a rejection can be told apart from a garbled body.
struct StatusRecorder<'a> {
    client: &'a reqwest::Client,
    status: AtomicU16,
}

impl<'a> StatusRecorder<'a> {
    fn new(client: &'a reqwest::Client) -> Self {
        Self {
            client,
            status: AtomicU16::new(0),
        }
    }

    fn status(&self) -> u16 {
        self.status.load(Ordering::Relaxed)
    }
}

impl<'c> AsyncHttpClient<'c> for StatusRecorder<'_> {
    type Error = HttpClientError<reqwest::Error>;
    type Future = Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + Send + 'c>>;

    fn call(&'c self, request: HttpRequest) -> Self::Future {
        Box::pin(async move {
            let response = self.client.call(request).await?;
            self.status.store(response.status().as_u16(), Ordering::Relaxed);
            Ok(response)
        })
    }
}

fn map_token_error(
    err: RequestTokenError<HttpClientError<reqwest::Error>, BasicErrorResponse>,
    status: u16,
) -> UpstreamError {
    match err {
        RequestTokenError::Request(e) => UpstreamError::Network {
            service: SERVICE,
            message: e.to_string(),
        },
        RequestTokenError::Parse(e, _) if (200..300).contains(&status) => {
            UpstreamError::Decode {
                service: SERVICE,
                message: e.to_string(),
            }
        }
        // proxy error pages and rate-limit bodies are not RFC 6749 errors
        RequestTokenError::Parse(_, _) => UpstreamError::Status {
            service: SERVICE,
            status,
        },
        RequestTokenError::ServerResponse(body) => {
            debug!(error = ?body.error(), "Token endpoint rejected the code");
            UpstreamError::Status {
                service: SERVICE,
                status,
            }
        }
        // unexpected content type on a 2xx, or an empty error body
        RequestTokenError::Other(message) if (200..300).contains(&status) => {
            UpstreamError::Decode {
                service: SERVICE,
                message,
            }
        }
        RequestTokenError::Other(_) => UpstreamError::Status {
            service: SERVICE,
            status,
        },
    }
}
