//! The cats resource: model, request payloads, service and handlers

pub mod dto;
pub mod handlers;
pub mod model;
pub mod service;

pub use model::{Cat, CatChanges, NewCat};
pub use service::CatsService;
