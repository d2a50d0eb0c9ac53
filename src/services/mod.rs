mod cliente;
mod usuario;

pub use cliente::ClienteService;
pub use usuario::UsuarioService;
