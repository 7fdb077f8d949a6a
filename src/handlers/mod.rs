pub mod admin;
pub mod auth;
pub mod extract;
pub mod mapper;
pub mod orders;
pub mod perfumes;
pub mod registration;
pub mod users;
