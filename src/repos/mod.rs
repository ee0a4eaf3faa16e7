mod categories;

pub use categories::{CategoryRepo, DynCategoryRepo};
