pub mod actuality_repository;
pub mod actuality_service;
pub mod pagination;
pub mod preview;
pub mod reconciler;
