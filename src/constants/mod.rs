pub struct Env {
    pub database_url: String,
    pub media_store_url: String,
    pub media_store_key: String,
    pub media_timeout_secs: u64,
    pub frontend_url: String,
    pub ip: String,
    pub port: u16,
}

impl Env {
    fn new() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set in .env file or environment variable");

        let media_store_url = std::env::var("MEDIA_STORE_URL")
            .expect("MEDIA_STORE_URL must be set in .env file or environment variable");
        let media_store_key = std::env::var("MEDIA_STORE_KEY")
            .expect("MEDIA_STORE_KEY must be set in .env file or environment variable");
        let media_timeout_secs = std::env::var("MEDIA_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .expect("MEDIA_TIMEOUT_SECS must be a valid u64 integer");

        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let ip = std::env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .expect("PORT must be a valid u16 integer");
        Env {
            database_url,
            media_store_url,
            media_store_key,
            media_timeout_secs,
            frontend_url,
            ip,
            port,
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}
