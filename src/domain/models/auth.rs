use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,

    #[serde(rename = "https://clinic.example/claims/tenant_id")]
    pub tenant_id: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub tenant_key: String,
}
