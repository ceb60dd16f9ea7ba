//! Catalog operations over a [`shopcat_core::CatalogRepository`]: load,
//! mutate, persist and project products, prices, stock, categories and
//! reviews.

mod availability;
mod categories;
pub mod error;
mod facade;
mod products;
mod reviews;

pub use error::{FacadeError, FacadeResult};
pub use facade::ProductCommonFacade;
