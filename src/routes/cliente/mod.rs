mod handler;
mod model;

pub use handler::{create, delete, find_by_id, list, update};
pub use model::ClienteRequest;
