//! Bot control API client

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use url::Url;

use bikenode_common::BotConfig;
use bikenode_core::{BotApi, ServerChannel, ServerConfig, UpstreamError};

use crate::error::{check_status, from_body_error, network, ClientSetupError};

const SERVICE: &str = "bot";

/// The bot answers either with a bare array or wrapped in `{"channels": [...]}`
#[derive(Deserialize)]
#[serde(untagged)]
enum ChannelList {
    Bare(Vec<ServerChannel>),
    Wrapped { channels: Vec<ServerChannel> },
}

impl From<ChannelList> for Vec<ServerChannel> {
    fn from(list: ChannelList) -> Self {
        match list {
            ChannelList::Bare(channels) | ChannelList::Wrapped { channels } => channels,
        }
    }
}

/// Body of the config-changed notification
#[derive(Debug, Serialize)]
struct ConfigChanged<'a> {
    server_id: &'a str,
    create_brand_roles: bool,
    create_type_roles: bool,
    create_model_roles: bool,
    story_feed_channel_id: &'a str,
    updated_at: DateTime<Utc>,
}

/// HTTP client for the companion bot process
#[derive(Clone)]
pub struct BotApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl BotApiClient {
    pub fn new(config: &BotConfig, http: reqwest::Client) -> Result<Self, ClientSetupError> {
        let base_url = Url::parse(&config.api_url)
            .map_err(|e| ClientSetupError::InvalidUrl("bot API", e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientSetupError::InvalidUrl(
                "bot API",
                config.api_url.clone(),
            ));
        }
        if config.token.is_empty() {
            warn!("DISCORD_BOT_TOKEN not set; bot API calls are sent unauthenticated");
        }

        Ok(Self {
            http,
            base_url,
            token: config.token.clone(),
        })
    }

    /// `{base}/api/servers/{id}/{leaf}`, with the id escaped as one path segment
    fn endpoint(&self, discord_server_id: &str, leaf: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "servers", discord_server_id, leaf]);
        }
        url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.token.is_empty() {
            request
        } else {
            request.header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.token))
        }
    }
}

#[async_trait]
impl BotApi for BotApiClient {
    #[instrument(skip(self))]
    async fn list_channels(
        &self,
        discord_server_id: &str,
    ) -> Result<Vec<ServerChannel>, UpstreamError> {
        let request = self.http.get(self.endpoint(discord_server_id, "channels"));
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| network(SERVICE, &e))?;

        let list = check_status(SERVICE, response)?
            .json::<ChannelList>()
            .await
            .map_err(|e| from_body_error(SERVICE, &e))?;

        Ok(list.into())
    }

    #[instrument(skip(self, config))]
    async fn notify_config_changed(
        &self,
        discord_server_id: &str,
        config: &ServerConfig,
    ) -> Result<(), UpstreamError> {
        let body = ConfigChanged {
            server_id: discord_server_id,
            create_brand_roles: config.create_brand_roles,
            create_type_roles: config.create_type_roles,
            create_model_roles: config.create_model_roles,
            story_feed_channel_id: &config.story_feed_channel_id,
            updated_at: config.updated_at,
        };

        let request = self
            .http
            .post(self.endpoint(discord_server_id, "config"))
            .json(&body);
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| network(SERVICE, &e))?;
        check_status(SERVICE, response)?;

        info!("Bot notified of config change");
        Ok(())
    }
}

impl std::fmt::Debug for BotApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}
