use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub usuario: String,
    pub senha: String,
}
