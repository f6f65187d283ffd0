use std::process::ExitCode;

use database::{DatabaseConnectionInfo, SqliteDatabase};
use railway::client::Client;
use web::{start_web_server, WebConfig, WebState};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    // database
    let database_connection_info = DatabaseConnectionInfo::from_env().unwrap_or_default();
    let database = match SqliteDatabase::connect(database_connection_info).await {
        Ok(database) => database,
        Err(why) => {
            log::error!("could not open database: {}", why);
            return ExitCode::FAILURE;
        }
    };

    // web server
    let state = WebState {
        railway_client: Client::new("REST API", database),
    };
    if let Err(why) = start_web_server(state, WebConfig::from_env()).await {
        log::error!("web server stopped: {}", why);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
