pub mod omdb;
pub mod traits;

pub use omdb::{OmdbClient, OmdbError};
pub use traits::{MediaKind, MovieDetail, MovieService, SearchPage, SearchResult};
