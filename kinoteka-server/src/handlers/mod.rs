pub mod movies;
pub mod ratings;
pub mod reference;
pub mod reviews;
pub mod watchlist;
