use std::env;

/// Server configuration assembled once at startup from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Secret used to sign and verify access tokens.
    pub secret: String,
    /// Public base URL used when composing storefront and media links.
    pub base_url: String,
    /// Directory where uploaded media files are stored.
    pub upload_dir: String,
}

impl ServerConfig {
    /// Read the configuration from the environment, falling back to
    /// development defaults where a value is optional.
    pub fn from_env() -> Result<Self, String> {
        let secret = env::var("SECRET_KEY")
            .map_err(|_| "SECRET_KEY environment variable not set".to_string())?;
        let base_url =
            env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());

        Ok(Self {
            secret,
            base_url: base_url.trim_end_matches('/').to_string(),
            upload_dir,
        })
    }
}
