pub mod catalog_repository;
pub mod catalog_service;

pub use catalog_repository::CatalogRepository;
pub use catalog_service::CatalogService;
