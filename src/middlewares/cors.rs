use crate::config::ServerConfig;
use actix_cors::Cors;

pub fn create_cors(config: &ServerConfig) -> Cors {
    let cors = match config.allowed_origins() {
        Some(origins) => origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin)),
        None => Cors::default().allow_any_origin(),
    };
    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allow_any_header()
        .max_age(3600)
}
