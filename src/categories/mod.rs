//! Storage and listing of simple labelled category records.

pub mod domain;
pub mod http;
pub mod seeder;
pub mod services;
