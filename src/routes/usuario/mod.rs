mod handler;
mod model;

pub use handler::{create, list};
pub use model::CreateUsuarioRequest;
