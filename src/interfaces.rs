pub mod handlers;
pub mod inference;
pub mod repositories;
pub mod routes;
