pub mod activities;
pub mod coins;
pub mod config;
pub mod error;
pub mod journeys;
pub mod rest;
pub mod sessions;
pub mod stats;
pub mod storage;
pub mod streaks;
pub mod users;

use std::sync::Arc;

use activities::storage::ActivityStorage;
use coins::CoinLedger;
use config::ServerConfig;
use journeys::storage::JourneyStorage;
use sessions::storage::MeditationStorage;
use storage::Storage;
use streaks::storage::StreakStorage;
use users::UserStorage;

/// Shared application state passed to every HTTP handler.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub storage: Arc<Storage>,
    pub users: Arc<UserStorage>,
    pub streaks: Arc<StreakStorage>,
    pub journeys: Arc<JourneyStorage>,
    pub meditation: Arc<MeditationStorage>,
    pub activities: Arc<ActivityStorage>,
    pub coins: Arc<CoinLedger>,
    pub started_at: std::time::Instant,
}

impl AppContext {
    /// Build the full context from a config: open the database, run the
    /// schema bootstrap, seed the catalogues, and wire the per-domain
    /// storage layers over the shared pool.
    pub async fn init(config: Arc<ServerConfig>) -> anyhow::Result<Self> {
        let storage = Arc::new(
            Storage::new_with_slow_query(
                &config.data_dir,
                config.observability.slow_query_threshold_ms,
            )
            .await?,
        );
        let pool = storage.pool();

        let journeys = Arc::new(JourneyStorage::new(pool.clone()));
        journeys.seed_default_path().await?;
        let activities = Arc::new(ActivityStorage::new(pool.clone()));
        activities.seed_catalog().await?;

        Ok(Self {
            users: Arc::new(UserStorage::new(pool.clone())),
            streaks: Arc::new(StreakStorage::new(pool.clone())),
            meditation: Arc::new(MeditationStorage::new(pool.clone())),
            coins: Arc::new(CoinLedger::new(pool)),
            journeys,
            activities,
            config,
            storage,
            started_at: std::time::Instant::now(),
        })
    }
}
