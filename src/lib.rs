pub mod authentication;
pub mod categories;
pub mod cli;
pub mod conversion;
mod cors;
mod database;
mod http_err;
mod models;
mod repos;
pub mod server;
pub mod validation;

#[cfg(test)]
mod testing;
