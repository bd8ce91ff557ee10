//! Behavioural tests against a real Postgres instance.
//!
//! These run only when `DATABASE_URL` points at a disposable database; they
//! are skipped otherwise so the unit suite stays green without
//! infrastructure.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;
use sqlx::PgPool;

use kinoteka_core::api_types::MovieSummary;
use kinoteka_core::catalog::CatalogSection;
use kinoteka_core::database::repositories::{
    CatalogRepository, RatingRepository, ReviewRepository, WatchlistRepository,
};
use kinoteka_core::database::{MIGRATOR, connect};
use kinoteka_core::error::CoreError;
use kinoteka_core::types::NewMovie;

async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = connect(&url, 5).await.ok()?;
    MIGRATOR.run(&pool).await.ok()?;
    Some(pool)
}

fn unique() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos()
}

async fn seed_user(pool: &PgPool, tag: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO users (username) VALUES ($1) RETURNING id")
        .bind(format!("{tag}-{}", unique()))
        .fetch_one(pool)
        .await
        .expect("insert user")
}

async fn seed_movie(pool: &PgPool, title: &str) -> i64 {
    let catalog = CatalogRepository::new(pool.clone());
    catalog
        .create_movie(&NewMovie {
            title: title.to_string(),
            country: "USA".to_string(),
            runtime: "120 min".to_string(),
            description: String::new(),
            poster_path: "posters/test.jpg".to_string(),
            premiere: NaiveDate::from_ymd_opt(2020, 6, 1).expect("valid date"),
            tagline: String::new(),
            trailer: format!("https://www.youtube.com/watch?v=test{}", unique()),
            year: 2020,
            budget: 1_000_000,
            box_office: 5_000_000,
            draft: false,
            certificate_id: None,
            imdb_id: None,
            genre_ids: vec![],
            production_ids: vec![],
            streaming_ids: vec![],
            director_ids: vec![],
        })
        .await
        .expect("create movie")
}

/// Monotonically increasing vote counts, so freshly seeded movies outrank
/// anything left over from earlier runs in votes-ordered listings.
fn vote_stamp() -> i32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_secs() as i32
}

async fn attach_imdb(pool: &PgPool, movie_id: i64, point: f64, votes: i32) {
    let imdb_id: i64 =
        sqlx::query_scalar("INSERT INTO imdb_ratings (point, votes) VALUES ($1, $2) RETURNING id")
            .bind(point)
            .bind(votes)
            .fetch_one(pool)
            .await
            .expect("insert imdb rating");
    sqlx::query("UPDATE movies SET imdb_id = $1 WHERE id = $2")
        .bind(imdb_id)
        .bind(movie_id)
        .execute(pool)
        .await
        .expect("attach imdb rating");
}

/// Backdate (or, with negative offsets, advance) a movie's premiere and
/// listing date relative to now.
async fn shift_dates(pool: &PgPool, movie_id: i64, premiere_days_ago: i32, created_days_ago: i32) {
    sqlx::query(
        "UPDATE movies SET premiere = (NOW() - make_interval(days => $1))::date, \
         created_at = NOW() - make_interval(days => $2) WHERE id = $3",
    )
    .bind(premiere_days_ago)
    .bind(created_days_ago)
    .bind(movie_id)
    .execute(pool)
    .await
    .expect("shift movie dates");
}

fn position(list: &[MovieSummary], id: i64) -> Option<usize> {
    list.iter().position(|movie| movie.id == id)
}

#[tokio::test]
async fn movie_creation_derives_transliterated_slug() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let suffix = unique();
    let movie_id = seed_movie(&pool, &format!("Köhnə Şəhər {suffix}")).await;

    let slug: Option<String> = sqlx::query_scalar("SELECT slug FROM movies WHERE id = $1")
        .bind(movie_id)
        .fetch_one(&pool)
        .await
        .expect("fetch slug");
    assert_eq!(slug, Some(format!("kohne-seher-{suffix}")));
}

#[tokio::test]
async fn rating_upsert_keeps_one_row_per_user_movie() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let user = seed_user(&pool, "rater").await;
    let movie = seed_movie(&pool, "Rated Movie").await;
    let ratings = RatingRepository::new(pool.clone());

    ratings.upsert(user, movie, 5).await.expect("first rating");
    ratings.upsert(user, movie, 8).await.expect("re-rating");

    let rows: Vec<(i16,)> = sqlx::query_as(
        "SELECT rs.value FROM ratings r JOIN rating_stars rs ON rs.id = r.star_id \
         WHERE r.user_id = $1 AND r.movie_id = $2",
    )
    .bind(user)
    .bind(movie)
    .fetch_all(&pool)
    .await
    .expect("fetch ratings");
    assert_eq!(rows, vec![(8,)]);
}

#[tokio::test]
async fn rating_rejects_unknown_star_value() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let user = seed_user(&pool, "rater").await;
    let movie = seed_movie(&pool, "Rated Movie").await;

    let err = RatingRepository::new(pool.clone())
        .upsert(user, movie, 42)
        .await
        .expect_err("42 is out of the star domain");
    assert!(matches!(err, CoreError::Validation(_)));
}

#[tokio::test]
async fn like_and_unlike_sets_stay_exclusive() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let author = seed_user(&pool, "author").await;
    let voter = seed_user(&pool, "voter").await;
    let movie = seed_movie(&pool, "Discussed Movie").await;
    let reviews = ReviewRepository::new(pool.clone());

    let review = reviews
        .create(author, movie, "solid movie", false)
        .await
        .expect("create review");

    let node = reviews
        .toggle_unlike(voter, review.id)
        .await
        .expect("unlike on");
    assert!(node.is_unlike && !node.is_like);

    // Liking while an unlike stands removes the unlike atomically.
    let node = reviews.toggle_like(voter, review.id).await.expect("like on");
    assert!(node.is_like && !node.is_unlike);
    assert_eq!(node.likes, 1);
    assert_eq!(node.unlikes, 0);

    // A second like is a pure flip back off.
    let node = reviews
        .toggle_like(voter, review.id)
        .await
        .expect("like off");
    assert!(!node.is_like && !node.is_unlike);
    assert_eq!(node.likes, 0);
}

#[tokio::test]
async fn reply_joins_parent_movie_and_nests_in_listing() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let author = seed_user(&pool, "author").await;
    let replier = seed_user(&pool, "replier").await;
    let movie = seed_movie(&pool, "Threaded Movie").await;
    let reviews = ReviewRepository::new(pool.clone());

    let parent = reviews
        .create(author, movie, "top level", false)
        .await
        .expect("create review");
    let reply = reviews
        .create_reply(replier, parent.id, "I agree")
        .await
        .expect("create reply");
    assert!(reply.is_reply);

    let listing = reviews
        .list_for_movie(movie, None)
        .await
        .expect("list reviews");
    assert_eq!(listing.review_count, 2);
    assert_eq!(listing.reviews.len(), 1, "reply must not appear at top level");
    assert_eq!(listing.reviews[0].id, parent.id);
    assert_eq!(listing.reviews[0].children[0].id, reply.id);

    let err = reviews
        .create_reply(replier, parent.id, "   ")
        .await
        .expect_err("empty reply content");
    assert!(matches!(err, CoreError::Validation(_)));
}

#[tokio::test]
async fn review_delete_is_owner_only() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let author = seed_user(&pool, "author").await;
    let stranger = seed_user(&pool, "stranger").await;
    let movie = seed_movie(&pool, "Owned Movie").await;
    let reviews = ReviewRepository::new(pool.clone());

    let review = reviews
        .create(author, movie, "mine", false)
        .await
        .expect("create review");

    let err = reviews
        .delete(stranger, review.id)
        .await
        .expect_err("stranger cannot delete");
    assert!(matches!(err, CoreError::PermissionDenied(_)));

    reviews.delete(author, review.id).await.expect("owner deletes");
    let err = reviews
        .delete(author, review.id)
        .await
        .expect_err("already gone");
    assert!(matches!(err, CoreError::NotFound(_)));
}

#[tokio::test]
async fn watchlist_toggle_and_all_or_nothing_bulk_remove() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let user = seed_user(&pool, "collector").await;
    let first = seed_movie(&pool, "Saved One").await;
    let second = seed_movie(&pool, "Saved Two").await;
    let absent = seed_movie(&pool, "Never Saved").await;
    let watchlist = WatchlistRepository::new(pool.clone());

    let toggled = watchlist.toggle(user, first).await.expect("add first");
    assert!(toggled.added);
    watchlist.toggle(user, second).await.expect("add second");

    // One of the requested ids is not in the list: nothing is removed.
    let err = watchlist
        .bulk_remove(user, &[first, absent])
        .await
        .expect_err("partial match must fail");
    assert!(matches!(err, CoreError::NotFound(_)));
    let (count, _) = watchlist
        .list(user, &Default::default(), None, Default::default())
        .await
        .expect("list");
    assert_eq!(count, 2, "failed bulk remove must not delete anything");

    let titles = watchlist
        .bulk_remove(user, &[first, second])
        .await
        .expect("full match succeeds");
    assert_eq!(titles.len(), 2);

    // Toggling an absent movie adds it back.
    let toggled = watchlist.toggle(user, first).await.expect("re-add");
    assert!(toggled.added);
    let toggled = watchlist.toggle(user, first).await.expect("remove");
    assert!(!toggled.added);
}

#[tokio::test]
async fn catalog_sections_apply_their_predicates() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let catalog = CatalogRepository::new(pool.clone());
    let tag = unique();

    // new-added: listed within the window, premiered well before it. The two
    // qualifying movies get listing dates slightly in the future, pinning
    // them to the head of the newest-listed-first ordering.
    let fresh = seed_movie(&pool, &format!("Fresh Listing {tag}")).await;
    shift_dates(&pool, fresh, 3000, -1).await;
    let freshest = seed_movie(&pool, &format!("Freshest Listing {tag}")).await;
    shift_dates(&pool, freshest, 3000, -2).await;
    let recent_premiere = seed_movie(&pool, &format!("Recent Premiere {tag}")).await;
    shift_dates(&pool, recent_premiere, 10, 0).await;
    let stale_listing = seed_movie(&pool, &format!("Stale Listing {tag}")).await;
    shift_dates(&pool, stale_listing, 3000, 200).await;

    let section = catalog
        .section(CatalogSection::NewAdded, 12)
        .await
        .expect("new-added section");
    assert!(section.len() <= 12);
    assert_eq!(section[0].id, freshest);
    assert_eq!(section[1].id, fresh);
    assert!(
        position(&section, recent_premiere).is_none(),
        "a movie premiered inside the window is not newly added"
    );
    assert!(
        position(&section, stale_listing).is_none(),
        "a movie listed outside the window is not newly added"
    );

    // most-popular: point within [7, 8] and enough votes, newest premiere
    // first.
    let popular_late = seed_movie(&pool, &format!("Popular Late {tag}")).await;
    attach_imdb(&pool, popular_late, 7.5, 400_000).await;
    shift_dates(&pool, popular_late, -3, 0).await;
    let popular_early = seed_movie(&pool, &format!("Popular Early {tag}")).await;
    attach_imdb(&pool, popular_early, 7.9, 400_000).await;
    shift_dates(&pool, popular_early, -2, 0).await;
    let over_point = seed_movie(&pool, &format!("Over Point {tag}")).await;
    attach_imdb(&pool, over_point, 8.5, 400_000).await;
    let few_votes = seed_movie(&pool, &format!("Few Votes {tag}")).await;
    attach_imdb(&pool, few_votes, 7.5, 100_000).await;

    let section = catalog
        .section(CatalogSection::MostPopular, 6)
        .await
        .expect("most-popular section");
    assert!(section.len() <= 6);
    let late = position(&section, popular_late).expect("qualifying movie listed");
    let early = position(&section, popular_early).expect("qualifying movie listed");
    assert!(late < early, "later premiere sorts first");
    assert!(position(&section, over_point).is_none());
    assert!(position(&section, few_votes).is_none());

    // most-rated: vote floor, best point first.
    let stamp = vote_stamp();
    let blockbuster = seed_movie(&pool, &format!("Blockbuster {tag}")).await;
    attach_imdb(&pool, blockbuster, 9.9, stamp - 60_000).await;
    let runner_up = seed_movie(&pool, &format!("Runner Up {tag}")).await;
    attach_imdb(&pool, runner_up, 9.5, stamp - 61_000).await;
    let under_votes = seed_movie(&pool, &format!("Under Votes {tag}")).await;
    attach_imdb(&pool, under_votes, 9.9, 700_000).await;

    let section = catalog
        .section(CatalogSection::MostRated, 12)
        .await
        .expect("most-rated section");
    assert!(section.len() <= 12);
    let top = position(&section, blockbuster).expect("qualifying movie listed");
    let next = position(&section, runner_up).expect("qualifying movie listed");
    assert!(top < next, "higher point sorts first");
    assert!(position(&section, under_votes).is_none());
}

#[tokio::test]
async fn home_page_video_and_new_movies_share_the_recent_pool() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let catalog = CatalogRepository::new(pool.clone());
    let tag = unique();
    let stamp = vote_stamp();

    let headliner = seed_movie(&pool, &format!("Headliner {tag}")).await;
    attach_imdb(&pool, headliner, 9.0, stamp).await;
    let second = seed_movie(&pool, &format!("Second Billing {tag}")).await;
    attach_imdb(&pool, second, 6.5, stamp - 1_000).await;
    let third = seed_movie(&pool, &format!("Third Billing {tag}")).await;
    attach_imdb(&pool, third, 6.4, stamp - 2_000).await;
    let low_point = seed_movie(&pool, &format!("Low Point {tag}")).await;
    attach_imdb(&pool, low_point, 5.0, stamp - 500).await;
    let too_old = seed_movie(&pool, &format!("Too Old {tag}")).await;
    attach_imdb(&pool, too_old, 9.0, stamp - 100).await;
    shift_dates(&pool, too_old, 4000, 0).await;

    let video = catalog
        .home_page_video()
        .await
        .expect("home page query")
        .expect("pool is non-empty");
    assert_eq!(video.title, format!("Headliner {tag}"));
    assert!(video.video_id.starts_with("test"), "id comes from the trailer URL");
    assert!(!video.welcome_text.is_empty());

    let strip = catalog.new_movies(8).await.expect("new movies strip");
    assert!(strip.len() <= 8);
    assert_eq!(
        strip[0].id, second,
        "the pool's top entry is reserved for the homepage video"
    );
    assert_eq!(strip[1].id, third);
    assert!(position(&strip, headliner).is_none());
    assert!(position(&strip, low_point).is_none(), "point floor applies");
    assert!(position(&strip, too_old).is_none(), "premiere lookback applies");
}

#[tokio::test]
async fn movie_detail_reports_rating_aggregates_and_requester_fields() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let catalog = CatalogRepository::new(pool.clone());
    let rater = seed_user(&pool, "rater").await;
    let other = seed_user(&pool, "other").await;
    let movie = seed_movie(&pool, "Detailed Movie").await;

    // Unrated: the average is absent, never zero.
    let detail = catalog
        .movie_detail(movie, Some(rater))
        .await
        .expect("detail before rating");
    assert_eq!(detail.middle_star, None);
    assert_eq!(detail.count_votes, 0);
    assert_eq!(detail.rating_user, None);
    assert!(!detail.is_watchlist);
    assert_eq!(detail.budget, "1,000,000");
    assert_eq!(detail.box_office, "5,000,000");

    let ratings = RatingRepository::new(pool.clone());
    ratings.upsert(rater, movie, 7).await.expect("first rating");
    ratings.upsert(other, movie, 9).await.expect("second rating");
    WatchlistRepository::new(pool.clone())
        .toggle(rater, movie)
        .await
        .expect("save to watchlist");

    let detail = catalog
        .movie_detail(movie, Some(rater))
        .await
        .expect("detail after rating");
    assert_eq!(detail.middle_star, Some(8.0));
    assert_eq!(detail.count_votes, 2);
    assert_eq!(detail.rating_user, Some(7));
    assert!(detail.is_watchlist);

    // Anonymous requests keep the aggregates but carry no personal fields.
    let detail = catalog
        .movie_detail(movie, None)
        .await
        .expect("anonymous detail");
    assert_eq!(detail.middle_star, Some(8.0));
    assert_eq!(detail.rating_user, None);
    assert!(!detail.is_watchlist);
}

#[tokio::test]
async fn watchlist_search_stays_inside_the_requesters_list() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let collector = seed_user(&pool, "collector").await;
    let bystander = seed_user(&pool, "bystander").await;
    let watchlist = WatchlistRepository::new(pool.clone());
    let tag = unique();

    let mut saved = Vec::new();
    for n in 0..6 {
        let movie = seed_movie(&pool, &format!("Signal {tag} #{n}")).await;
        watchlist.toggle(collector, movie).await.expect("save");
        saved.push(movie);
    }
    let foreign = seed_movie(&pool, &format!("Signal {tag} foreign")).await;
    watchlist.toggle(bystander, foreign).await.expect("save elsewhere");
    let unsaved = seed_movie(&pool, &format!("Signal {tag} unsaved")).await;

    let found = watchlist
        .search(collector, &format!("Signal {tag}"))
        .await
        .expect("scoped search");
    assert_eq!(found.len(), 5, "capped at five matches");
    assert!(found.iter().all(|movie| saved.contains(&movie.id)));
    assert!(position(&found, foreign).is_none(), "other lists stay invisible");
    assert!(position(&found, unsaved).is_none());

    let err = watchlist
        .search(collector, "   ")
        .await
        .expect_err("blank query");
    assert!(matches!(err, CoreError::Validation(_)));
}
