//! Service context - dependency container for services
//!
//! Holds all repositories, the Discord integrations and the shared
//! token/id machinery needed by services.

use std::sync::Arc;

use bikenode_common::auth::JwtService;
use bikenode_core::traits::{
    BotApi, IdentityProvider, MotorcycleRepository, OwnershipRepository, ServerConfigRepository,
    ServerRepository, TimelineEventRepository, UserRepository, UserRoleRepository,
    VisibilityRepository,
};
use bikenode_core::{Snowflake, SnowflakeGenerator};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Database repositories
/// - The Discord identity provider and the bot control API
/// - JWT service for session tokens
/// - Snowflake generator for ID generation
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    motorcycle_repo: Arc<dyn MotorcycleRepository>,
    ownership_repo: Arc<dyn OwnershipRepository>,
    timeline_repo: Arc<dyn TimelineEventRepository>,
    server_repo: Arc<dyn ServerRepository>,
    server_config_repo: Arc<dyn ServerConfigRepository>,
    role_repo: Arc<dyn UserRoleRepository>,
    visibility_repo: Arc<dyn VisibilityRepository>,

    // Discord
    identity_provider: Arc<dyn IdentityProvider>,
    bot_api: Arc<dyn BotApi>,

    // Services
    jwt_service: Arc<JwtService>,
    snowflake_generator: Arc<SnowflakeGenerator>,
}

impl ServiceContext {
    /// Start assembling a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn motorcycle_repo(&self) -> &dyn MotorcycleRepository {
        self.motorcycle_repo.as_ref()
    }

    pub fn ownership_repo(&self) -> &dyn OwnershipRepository {
        self.ownership_repo.as_ref()
    }

    pub fn timeline_repo(&self) -> &dyn TimelineEventRepository {
        self.timeline_repo.as_ref()
    }

    pub fn server_repo(&self) -> &dyn ServerRepository {
        self.server_repo.as_ref()
    }

    pub fn server_config_repo(&self) -> &dyn ServerConfigRepository {
        self.server_config_repo.as_ref()
    }

    /// Cached Discord roles
    pub fn role_repo(&self) -> &dyn UserRoleRepository {
        self.role_repo.as_ref()
    }

    pub fn visibility_repo(&self) -> &dyn VisibilityRepository {
        self.visibility_repo.as_ref()
    }

    // === Discord ===

    /// Discord OAuth2 identity provider
    pub fn identity_provider(&self) -> &dyn IdentityProvider {
        self.identity_provider.as_ref()
    }

    /// HTTP API of the companion bot
    pub fn bot_api(&self) -> &dyn BotApi {
        self.bot_api.as_ref()
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("jwt_service", &self.jwt_service)
            .field("worker_id", &self.snowflake_generator.worker_id())
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    motorcycle_repo: Option<Arc<dyn MotorcycleRepository>>,
    ownership_repo: Option<Arc<dyn OwnershipRepository>>,
    timeline_repo: Option<Arc<dyn TimelineEventRepository>>,
    server_repo: Option<Arc<dyn ServerRepository>>,
    server_config_repo: Option<Arc<dyn ServerConfigRepository>>,
    role_repo: Option<Arc<dyn UserRoleRepository>>,
    visibility_repo: Option<Arc<dyn VisibilityRepository>>,
    identity_provider: Option<Arc<dyn IdentityProvider>>,
    bot_api: Option<Arc<dyn BotApi>>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn motorcycle_repo(mut self, repo: Arc<dyn MotorcycleRepository>) -> Self {
        self.motorcycle_repo = Some(repo);
        self
    }

    pub fn ownership_repo(mut self, repo: Arc<dyn OwnershipRepository>) -> Self {
        self.ownership_repo = Some(repo);
        self
    }

    pub fn timeline_repo(mut self, repo: Arc<dyn TimelineEventRepository>) -> Self {
        self.timeline_repo = Some(repo);
        self
    }

    pub fn server_repo(mut self, repo: Arc<dyn ServerRepository>) -> Self {
        self.server_repo = Some(repo);
        self
    }

    pub fn server_config_repo(mut self, repo: Arc<dyn ServerConfigRepository>) -> Self {
        self.server_config_repo = Some(repo);
        self
    }

    pub fn role_repo(mut self, repo: Arc<dyn UserRoleRepository>) -> Self {
        self.role_repo = Some(repo);
        self
    }

    pub fn visibility_repo(mut self, repo: Arc<dyn VisibilityRepository>) -> Self {
        self.visibility_repo = Some(repo);
        self
    }

    pub fn identity_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.identity_provider = Some(provider);
        self
    }

    pub fn bot_api(mut self, bot_api: Arc<dyn BotApi>) -> Self {
        self.bot_api = Some(bot_api);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
        }

        Ok(ServiceContext {
            user_repo: required(self.user_repo, "user_repo")?,
            motorcycle_repo: required(self.motorcycle_repo, "motorcycle_repo")?,
            ownership_repo: required(self.ownership_repo, "ownership_repo")?,
            timeline_repo: required(self.timeline_repo, "timeline_repo")?,
            server_repo: required(self.server_repo, "server_repo")?,
            server_config_repo: required(self.server_config_repo, "server_config_repo")?,
            role_repo: required(self.role_repo, "role_repo")?,
            visibility_repo: required(self.visibility_repo, "visibility_repo")?,
            identity_provider: required(self.identity_provider, "identity_provider")?,
            bot_api: required(self.bot_api, "bot_api")?,
            jwt_service: required(self.jwt_service, "jwt_service")?,
            snowflake_generator: required(self.snowflake_generator, "snowflake_generator")?,
        })
    }
}
