use std::{fmt, sync::Arc};

use sqlx::PgPool;

use kinoteka_config::Config;
use kinoteka_core::database::repositories::{
    CatalogRepository, RatingRepository, ReferenceRepository, ReviewRepository, UserRepository,
    WatchlistRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogRepository,
    pub reviews: ReviewRepository,
    pub ratings: RatingRepository,
    pub watchlist: WatchlistRepository,
    pub reference: ReferenceRepository,
    pub users: UserRepository,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pool: PgPool, config: Arc<Config>) -> Self {
        Self {
            catalog: CatalogRepository::new(pool.clone()),
            reviews: ReviewRepository::new(pool.clone()),
            ratings: RatingRepository::new(pool.clone()),
            watchlist: WatchlistRepository::new(pool.clone()),
            reference: ReferenceRepository::new(pool.clone()),
            users: UserRepository::new(pool),
            config,
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
