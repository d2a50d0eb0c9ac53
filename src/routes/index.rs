use axum::Json;
use serde_json::{Value, json};

pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "clientes API",
        "endpoints": {
            "clientes": "/clientes",
            "produtos": "/produtos",
        },
    }))
}
