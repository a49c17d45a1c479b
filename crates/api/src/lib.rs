#![forbid(unsafe_code)]

pub mod auth;
pub mod contract;
pub mod rest;

pub use auth::CredentialStore;
pub use contract::{
    ApiError, Backend, CatalogApi, CourseHead, InMemoryApi, ProgressApi, ReviewApi,
};
pub use rest::RestApi;
