use super::Config;

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) =
            std::env::var("METABOLICAL_HOST").or_else(|_| std::env::var("HOST"))
            && !host.is_empty()
        {
            self.gateway.host = host;
        }

        if let Ok(port_str) =
            std::env::var("METABOLICAL_PORT").or_else(|_| std::env::var("PORT"))
            && let Ok(port) = port_str.parse::<u16>()
        {
            self.gateway.port = port;
        }

        if let Ok(origins) = std::env::var("METABOLICAL_CORS_ORIGINS") {
            self.gateway.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect();
        }

        if let Ok(flag) = std::env::var("METABOLICAL_PRODUCTION") {
            self.gateway.production = is_truthy(&flag);
        }

        if let Ok(flag) = std::env::var("METABOLICAL_DEBUG") {
            self.debug = is_truthy(&flag);
        }

        if let Ok(url) = std::env::var("METABOLICAL_ENGINE_URL")
            && !url.is_empty()
        {
            self.engine.base_url = url;
        }

        if let Ok(model) = std::env::var("METABOLICAL_MODEL")
            && !model.is_empty()
        {
            self.engine.model = model;
        }

        if let Ok(key) = std::env::var("METABOLICAL_ENGINE_API_KEY")
            && !key.is_empty()
        {
            self.engine.api_key = Some(key);
        }

        if let Ok(secret) =
            std::env::var("METABOLICAL_SECRET_KEY").or_else(|_| std::env::var("SECRET_KEY"))
            && !secret.trim().is_empty()
        {
            self.session.secret = Some(secret);
        }
    }
}
