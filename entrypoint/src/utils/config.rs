use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "api", about = "Storefront catalog API")]
pub struct ApiArgs {
    #[arg(long, env = "MONGO_DB_HOST", default_value = "localhost")]
    pub mongo_host: String,
    #[arg(long, env = "MONGO_DB_PORT", default_value_t = 27017)]
    pub mongo_port: u16,
    #[arg(long, env = "MONGO_DB_USER", default_value = "root")]
    pub mongo_user: String,
    #[arg(
        long,
        env = "MONGO_DB_PASSWORD",
        default_value = "root",
        hide_env_values = true
    )]
    pub mongo_password: String,
    #[arg(long, env = "MONGO_DB_NAME", default_value = "storefront")]
    pub database: String,
    #[arg(long, env = "API_BIND_ADDRESS", default_value = "0.0.0.0:8080")]
    pub bind: String,
    /// Origin the storefront is served from, sent back in CORS headers
    #[arg(long, env = "API_ALLOWED_ORIGIN", default_value = "http://localhost:3000")]
    pub allowed_origin: String,
}

impl ApiArgs {
    pub fn connection_uri(&self) -> String {
        format!(
            "mongodb://{}:{}@{}:{}",
            self.mongo_user, self.mongo_password, self.mongo_host, self.mongo_port
        )
    }
}
