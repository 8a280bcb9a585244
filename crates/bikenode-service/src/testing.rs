//! In-memory fakes for service and HTTP tests
//!
//! [`FakeDb`] implements every repository trait over plain vectors and keeps
//! the constraints the PostgreSQL schema enforces (unique discord ids, one
//! active ownership per user+motorcycle, cascading deletes). The Discord
//! fakes return canned data and record what they were asked.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bikenode_common::{JwtService, SESSION_TTL_SECS};
use bikenode_core::entities::{
    DiscordLogin, DiscordProfile, DiscordTokens, Motorcycle, MotorcycleFilter, Ownership, Server,
    ServerChannel, ServerConfig, ServerVisibility, TimelineEvent, User, UserRole,
};
use bikenode_core::traits::{
    BotApi, IdentityProvider, MotorcycleRepository, OwnershipRepository, RepoResult,
    ServerConfigRepository, ServerRepository, TimelineEventRepository, UserRepository,
    UserRoleRepository, VisibilityRepository,
};
use bikenode_core::{
    DomainError, PageRequest, Permissions, Snowflake, SnowflakeGenerator, UpstreamError,
};
use chrono::{Duration, Utc};

use crate::services::ServiceContext;

/// Secret the harness signs session tokens with
pub const TEST_JWT_SECRET: &str = "test-session-secret-for-fakes-only";

static NEXT_ROLE_ID: AtomicI64 = AtomicI64::new(1);

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Fixtures
// ============================================================================

/// Catalog row without package/category/engine
pub fn motorcycle(id: i64, year: i32, make: &str, model: &str) -> Motorcycle {
    let now = Utc::now();
    Motorcycle {
        id: Snowflake::new(id),
        year,
        make: make.to_string(),
        model: model.to_string(),
        package: None,
        category: None,
        engine: None,
        created_at: now,
        updated_at: now,
    }
}

/// Server named after its Discord id
pub fn server(id: i64, discord_server_id: &str, owner_discord_id: &str) -> Server {
    let now = Utc::now();
    Server {
        id: Snowflake::new(id),
        discord_server_id: discord_server_id.to_string(),
        name: format!("Server {discord_server_id}"),
        icon: None,
        owner_discord_id: Some(owner_discord_id.to_string()),
        member_count: 10,
        bot_joined_at: Some(now),
        created_at: now,
        updated_at: now,
    }
}

/// Cached role on local server `server_id`
pub fn role(user_id: Snowflake, server_id: i64, permissions: Permissions) -> UserRole {
    let id = NEXT_ROLE_ID.fetch_add(1, Ordering::Relaxed);
    UserRole {
        id: Snowflake::new(id),
        user_id,
        server_id: Snowflake::new(server_id),
        role_id: format!("role-{id}"),
        role_name: format!("Role {id}"),
        role_color: 0,
        permissions,
    }
}

pub fn channel(id: &str, name: &str, kind: u8, position: i32) -> ServerChannel {
    ServerChannel {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        position,
    }
}

fn catalog_key(bike: &Motorcycle) -> (i32, String, String, String) {
    (
        bike.year,
        bike.make.trim().to_lowercase(),
        bike.model.trim().to_lowercase(),
        bike.package
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_lowercase(),
    )
}

// ============================================================================
// Repositories
// ============================================================================

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    motorcycles: Vec<Motorcycle>,
    ownerships: Vec<Ownership>,
    events: Vec<TimelineEvent>,
    servers: Vec<Server>,
    configs: Vec<ServerConfig>,
    roles: Vec<UserRole>,
    visibility: Vec<ServerVisibility>,
}

/// All repositories over one in-memory table set
#[derive(Default)]
pub struct FakeDb {
    tables: Mutex<Tables>,
}

impl FakeDb {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_user(&self, user: User) {
        lock(&self.tables).users.push(user);
    }

    pub fn add_motorcycle(&self, bike: Motorcycle) {
        lock(&self.tables).motorcycles.push(bike);
    }

    pub fn add_server(&self, server: Server) {
        lock(&self.tables).servers.push(server);
    }

    pub fn add_role(&self, role: UserRole) {
        lock(&self.tables).roles.push(role);
    }

    pub fn add_visibility(&self, visibility: ServerVisibility) {
        lock(&self.tables).visibility.push(visibility);
    }

    pub fn users(&self) -> Vec<User> {
        lock(&self.tables).users.clone()
    }

    pub fn motorcycle_count(&self) -> usize {
        lock(&self.tables).motorcycles.len()
    }

    pub fn event_count(&self) -> usize {
        lock(&self.tables).events.len()
    }

    pub fn config_count(&self) -> usize {
        lock(&self.tables).configs.len()
    }

    pub fn visibility_count(&self) -> usize {
        lock(&self.tables).visibility.len()
    }
}

#[async_trait]
impl UserRepository for FakeDb {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(lock(&self.tables).users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_discord_id(&self, discord_id: &str) -> RepoResult<Option<User>> {
        Ok(lock(&self.tables)
            .users
            .iter()
            .find(|u| u.discord_id == discord_id)
            .cloned())
    }

    async fn upsert_by_discord_id(&self, user: &User) -> RepoResult<(User, bool)> {
        let mut tables = lock(&self.tables);
        if let Some(stored) = tables
            .users
            .iter_mut()
            .find(|u| u.discord_id == user.discord_id)
        {
            stored.username.clone_from(&user.username);
            stored.discriminator.clone_from(&user.discriminator);
            stored.avatar.clone_from(&user.avatar);
            stored.email.clone_from(&user.email);
            stored.access_token.clone_from(&user.access_token);
            stored.refresh_token.clone_from(&user.refresh_token);
            stored.updated_at = Utc::now();
            return Ok((stored.clone(), false));
        }
        tables.users.push(user.clone());
        Ok((user.clone(), true))
    }
}

#[async_trait]
impl MotorcycleRepository for FakeDb {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Motorcycle>> {
        Ok(lock(&self.tables)
            .motorcycles
            .iter()
            .find(|m| m.id == id)
            .cloned())
    }

    async fn search(
        &self,
        filter: &MotorcycleFilter,
        page: PageRequest,
    ) -> RepoResult<(Vec<Motorcycle>, i64)> {
        let mut rows: Vec<Motorcycle> = lock(&self.tables)
            .motorcycles
            .iter()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();
        // NULL packages sort last, as in PostgreSQL
        rows.sort_by(|a, b| {
            b.year
                .cmp(&a.year)
                .then_with(|| a.make.cmp(&b.make))
                .then_with(|| a.model.cmp(&b.model))
                .then_with(|| match (&a.package, &b.package) {
                    (Some(x), Some(y)) => x.cmp(y),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                })
        });
        let total = rows.len() as i64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let page_rows = rows
            .into_iter()
            .skip(offset)
            .take(page.limit() as usize)
            .collect();
        Ok((page_rows, total))
    }

    async fn bulk_insert(&self, rows: &[Motorcycle]) -> RepoResult<u64> {
        let mut tables = lock(&self.tables);
        let mut inserted = 0;
        for row in rows {
            let key = catalog_key(row);
            if tables.motorcycles.iter().any(|m| catalog_key(m) == key) {
                continue;
            }
            tables.motorcycles.push(row.clone());
            inserted += 1;
        }
        Ok(inserted)
    }
}

#[async_trait]
impl OwnershipRepository for FakeDb {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Ownership>> {
        Ok(lock(&self.tables)
            .ownerships
            .iter()
            .find(|o| o.id == id)
            .cloned())
    }

    async fn find_active(
        &self,
        user_id: Snowflake,
        motorcycle_id: Snowflake,
    ) -> RepoResult<Option<Ownership>> {
        Ok(lock(&self.tables)
            .ownerships
            .iter()
            .find(|o| o.user_id == user_id && o.motorcycle_id == motorcycle_id && o.is_active())
            .cloned())
    }

    async fn list_by_user(
        &self,
        user_id: Snowflake,
        include_inactive: bool,
    ) -> RepoResult<Vec<Ownership>> {
        let mut rows: Vec<Ownership> = lock(&self.tables)
            .ownerships
            .iter()
            .filter(|o| o.user_id == user_id && (include_inactive || o.is_active()))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.purchase_date
                .cmp(&a.purchase_date)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(rows)
    }

    async fn create(&self, ownership: &Ownership) -> RepoResult<()> {
        let mut tables = lock(&self.tables);
        if !tables.users.iter().any(|u| u.id == ownership.user_id) {
            return Err(DomainError::UserNotFound(ownership.user_id));
        }
        if !tables.motorcycles.iter().any(|m| m.id == ownership.motorcycle_id) {
            return Err(DomainError::MotorcycleNotFound(ownership.motorcycle_id));
        }
        if tables.ownerships.iter().any(|o| {
            o.user_id == ownership.user_id
                && o.motorcycle_id == ownership.motorcycle_id
                && o.is_active()
        }) {
            return Err(DomainError::ActiveOwnershipExists(ownership.motorcycle_id));
        }
        tables.ownerships.push(ownership.clone());
        Ok(())
    }

    async fn update(&self, ownership: &Ownership) -> RepoResult<()> {
        let mut tables = lock(&self.tables);
        let stored = tables
            .ownerships
            .iter_mut()
            .find(|o| o.id == ownership.id)
            .ok_or(DomainError::OwnershipNotFound(ownership.id))?;
        stored.end_date = ownership.end_date;
        stored.end_reason.clone_from(&ownership.end_reason);
        stored.notes.clone_from(&ownership.notes);
        stored.updated_at = ownership.updated_at;
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut tables = lock(&self.tables);
        let before = tables.ownerships.len();
        tables.ownerships.retain(|o| o.id != id);
        if tables.ownerships.len() == before {
            return Err(DomainError::OwnershipNotFound(id));
        }
        tables.events.retain(|e| e.ownership_id != id);
        Ok(())
    }
}

#[async_trait]
impl TimelineEventRepository for FakeDb {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<TimelineEvent>> {
        Ok(lock(&self.tables).events.iter().find(|e| e.id == id).cloned())
    }

    async fn list_by_ownership(&self, ownership_id: Snowflake) -> RepoResult<Vec<TimelineEvent>> {
        let mut rows: Vec<TimelineEvent> = lock(&self.tables)
            .events
            .iter()
            .filter(|e| e.ownership_id == ownership_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn create(&self, event: &TimelineEvent) -> RepoResult<()> {
        let mut tables = lock(&self.tables);
        if !tables.ownerships.iter().any(|o| o.id == event.ownership_id) {
            return Err(DomainError::OwnershipNotFound(event.ownership_id));
        }
        check_shares(&tables, event)?;
        tables.events.push(event.clone());
        Ok(())
    }

    async fn update(&self, event: &TimelineEvent) -> RepoResult<()> {
        let mut tables = lock(&self.tables);
        check_shares(&tables, event)?;
        let stored = tables
            .events
            .iter_mut()
            .find(|e| e.id == event.id)
            .ok_or(DomainError::TimelineEventNotFound(event.id))?;
        *stored = TimelineEvent {
            created_at: stored.created_at,
            ..event.clone()
        };
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut tables = lock(&self.tables);
        let before = tables.events.len();
        tables.events.retain(|e| e.id != id);
        if tables.events.len() == before {
            return Err(DomainError::TimelineEventNotFound(id));
        }
        Ok(())
    }
}

fn check_shares(tables: &Tables, event: &TimelineEvent) -> RepoResult<()> {
    match event
        .shared_to_servers
        .iter()
        .find(|id| !tables.servers.iter().any(|s| s.id == **id))
    {
        Some(id) => Err(DomainError::ValidationError(format!(
            "cannot share to unknown server {id}"
        ))),
        None => Ok(()),
    }
}

#[async_trait]
impl ServerRepository for FakeDb {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Server>> {
        Ok(lock(&self.tables).servers.iter().find(|s| s.id == id).cloned())
    }

    async fn find_by_discord_id(&self, discord_server_id: &str) -> RepoResult<Option<Server>> {
        Ok(lock(&self.tables)
            .servers
            .iter()
            .find(|s| s.discord_server_id == discord_server_id)
            .cloned())
    }

    async fn list_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<Server>> {
        let tables = lock(&self.tables);
        let discord_id = tables
            .users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.discord_id.clone());
        let mut rows: Vec<Server> = tables
            .servers
            .iter()
            .filter(|s| {
                tables
                    .visibility
                    .iter()
                    .any(|v| v.user_id == user_id && v.server_id == s.id)
                    || tables
                        .roles
                        .iter()
                        .any(|r| r.user_id == user_id && r.server_id == s.id)
                    || discord_id.as_deref().is_some_and(|id| s.is_owned_by(id))
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(rows)
    }
}

#[async_trait]
impl ServerConfigRepository for FakeDb {
    async fn find_by_server(&self, server_id: Snowflake) -> RepoResult<Option<ServerConfig>> {
        Ok(lock(&self.tables)
            .configs
            .iter()
            .find(|c| c.server_id == server_id)
            .cloned())
    }

    async fn insert_if_absent(&self, config: &ServerConfig) -> RepoResult<ServerConfig> {
        let mut tables = lock(&self.tables);
        if let Some(stored) = tables.configs.iter().find(|c| c.server_id == config.server_id) {
            return Ok(stored.clone());
        }
        tables.configs.push(config.clone());
        Ok(config.clone())
    }

    async fn upsert(&self, config: &ServerConfig) -> RepoResult<ServerConfig> {
        let mut tables = lock(&self.tables);
        if let Some(stored) = tables
            .configs
            .iter_mut()
            .find(|c| c.server_id == config.server_id)
        {
            let floor = stored.updated_at + Duration::microseconds(1);
            *stored = ServerConfig {
                id: stored.id,
                created_at: stored.created_at,
                updated_at: config.updated_at.max(floor),
                ..config.clone()
            };
            return Ok(stored.clone());
        }
        tables.configs.push(config.clone());
        Ok(config.clone())
    }
}

#[async_trait]
impl UserRoleRepository for FakeDb {
    async fn list_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<UserRole>> {
        Ok(lock(&self.tables)
            .roles
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_by_user_and_server(
        &self,
        user_id: Snowflake,
        server_id: Snowflake,
    ) -> RepoResult<Vec<UserRole>> {
        Ok(lock(&self.tables)
            .roles
            .iter()
            .filter(|r| r.user_id == user_id && r.server_id == server_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl VisibilityRepository for FakeDb {
    async fn find(
        &self,
        user_id: Snowflake,
        server_id: Snowflake,
    ) -> RepoResult<Option<ServerVisibility>> {
        Ok(lock(&self.tables)
            .visibility
            .iter()
            .find(|v| v.user_id == user_id && v.server_id == server_id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<ServerVisibility>> {
        Ok(lock(&self.tables)
            .visibility
            .iter()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn set(&self, visibility: &ServerVisibility) -> RepoResult<ServerVisibility> {
        let mut tables = lock(&self.tables);
        if !tables.servers.iter().any(|s| s.id == visibility.server_id) {
            return Err(DomainError::ServerNotFound(visibility.server_id.to_string()));
        }
        if let Some(stored) = tables
            .visibility
            .iter_mut()
            .find(|v| v.user_id == visibility.user_id && v.server_id == visibility.server_id)
        {
            stored.is_visible = visibility.is_visible;
            stored.updated_at = Utc::now();
            return Ok(stored.clone());
        }
        tables.visibility.push(visibility.clone());
        Ok(visibility.clone())
    }
}

// ============================================================================
// Discord
// ============================================================================

/// Identity provider answering every code with a canned login
pub struct FakeIdentityProvider {
    response: Mutex<Result<DiscordLogin, UpstreamError>>,
    codes: Mutex<Vec<String>>,
}

impl Default for FakeIdentityProvider {
    fn default() -> Self {
        Self {
            response: Mutex::new(Err(UpstreamError::Status {
                service: "discord",
                status: 401,
            })),
            codes: Mutex::new(Vec::new()),
        }
    }
}

impl FakeIdentityProvider {
    /// Answer the next exchanges with this profile
    pub fn respond_with(&self, discord_id: &str, username: &str) {
        *lock(&self.response) = Ok(DiscordLogin {
            tokens: DiscordTokens {
                access_token: format!("access-{discord_id}"),
                refresh_token: Some(format!("refresh-{discord_id}")),
            },
            profile: DiscordProfile {
                id: discord_id.to_string(),
                username: username.to_string(),
                discriminator: Some("0".to_string()),
                avatar: None,
                email: Some(format!("{username}@example.com")),
            },
        });
    }

    pub fn fail_with(&self, error: UpstreamError) {
        *lock(&self.response) = Err(error);
    }

    /// Authorization codes received so far
    pub fn codes(&self) -> Vec<String> {
        lock(&self.codes).clone()
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    fn authorization_url(&self, state: &str) -> String {
        format!(
            "https://discord.test/oauth2/authorize?response_type=code&client_id=test&state={state}"
        )
    }

    async fn exchange_code(&self, code: &str) -> Result<DiscordLogin, UpstreamError> {
        lock(&self.codes).push(code.to_string());
        lock(&self.response).clone()
    }
}

/// Bot API with canned channels and a log of config notifications
#[derive(Default)]
pub struct FakeBotApi {
    channels: Mutex<Vec<ServerChannel>>,
    channels_error: Mutex<Option<UpstreamError>>,
    notify_error: Mutex<Option<UpstreamError>>,
    notifications: Mutex<Vec<(String, ServerConfig)>>,
}

impl FakeBotApi {
    pub fn set_channels(&self, channels: Vec<ServerChannel>) {
        *lock(&self.channels) = channels;
    }

    pub fn fail_channels_with(&self, error: UpstreamError) {
        *lock(&self.channels_error) = Some(error);
    }

    pub fn fail_notify_with(&self, error: UpstreamError) {
        *lock(&self.notify_error) = Some(error);
    }

    /// Delivered notifications as (discord server id, config)
    pub fn notifications(&self) -> Vec<(String, ServerConfig)> {
        lock(&self.notifications).clone()
    }
}

#[async_trait]
impl BotApi for FakeBotApi {
    async fn list_channels(
        &self,
        _discord_server_id: &str,
    ) -> Result<Vec<ServerChannel>, UpstreamError> {
        if let Some(error) = lock(&self.channels_error).clone() {
            return Err(error);
        }
        Ok(lock(&self.channels).clone())
    }

    async fn notify_config_changed(
        &self,
        discord_server_id: &str,
        config: &ServerConfig,
    ) -> Result<(), UpstreamError> {
        if let Some(error) = lock(&self.notify_error).clone() {
            return Err(error);
        }
        lock(&self.notifications).push((discord_server_id.to_string(), config.clone()));
        Ok(())
    }
}

// ============================================================================
// Harness
// ============================================================================

/// A `ServiceContext` wired to fresh fakes, with handles to all of them
pub struct TestHarness {
    pub ctx: ServiceContext,
    pub db: Arc<FakeDb>,
    pub idp: Arc<FakeIdentityProvider>,
    pub bot: Arc<FakeBotApi>,
}

impl TestHarness {
    pub fn new() -> Self {
        let db = FakeDb::new();
        let idp = Arc::new(FakeIdentityProvider::default());
        let bot = Arc::new(FakeBotApi::default());
        let jwt = JwtService::new(TEST_JWT_SECRET, SESSION_TTL_SECS)
            .unwrap_or_else(|e| panic!("test JWT service: {e}"));

        let ctx = ServiceContext::builder()
            .user_repo(db.clone())
            .motorcycle_repo(db.clone())
            .ownership_repo(db.clone())
            .timeline_repo(db.clone())
            .server_repo(db.clone())
            .server_config_repo(db.clone())
            .role_repo(db.clone())
            .visibility_repo(db.clone())
            .identity_provider(idp.clone())
            .bot_api(bot.clone())
            .jwt_service(Arc::new(jwt))
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
            .build()
            .unwrap_or_else(|e| panic!("test service context: {e}"));

        Self { ctx, db, idp, bot }
    }

    /// Store a user as if they had signed in before
    pub fn seed_user(&self, discord_id: &str, username: &str) -> User {
        let profile = DiscordProfile {
            id: discord_id.to_string(),
            username: username.to_string(),
            discriminator: None,
            avatar: None,
            email: None,
        };
        let tokens = DiscordTokens {
            access_token: "seeded".to_string(),
            refresh_token: None,
        };
        let user = User::from_discord(self.ctx.generate_id(), &profile, &tokens);
        self.db.add_user(user.clone());
        user
    }

    /// A valid session token for `user_id`
    pub fn session_for(&self, user_id: Snowflake) -> String {
        self.ctx
            .jwt_service()
            .issue(user_id)
            .map(|s| s.token)
            .unwrap_or_else(|e| panic!("issue test session: {e}"))
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
