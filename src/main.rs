//! # VHost Server - Entry Point
//! src/main.rs

use tracing::error;
use vhost_server::config::Config;
use vhost_server::logging;
use vhost_server::server::Server;

fn main() {
    let config = Config::new();
    logging::init(&config.log_level);

    let server = match Server::from_config(&config) {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "server could not start");
            std::process::exit(1);
        }
    };

    server.run();
}
