pub mod cliente;
pub mod produto;
pub mod user;

pub use cliente::{Cliente, NewCliente};
pub use produto::{NewProduto, Produto};
pub use user::{User, UserSummary};
