//! The movie domain: records, validation, pagination and the owner-scoped
//! service that ties them together.

pub mod memory;
pub mod model;
pub mod pagination;
pub mod repository;
pub mod service;
pub mod validation;

pub use memory::InMemoryMovieRepository;
pub use model::{
    CreateMovie, Movie, MovieChanges, MoviePage, NewMovie, PosterSource, UpdateMovie,
};
pub use pagination::{PageRequest, DEFAULT_PAGE, DEFAULT_PAGE_LIMIT};
pub use repository::MovieRepository;
pub use service::MovieService;
