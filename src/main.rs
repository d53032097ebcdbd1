use std::sync::Arc;

use ridetime::config::Config;
use ridetime::db::PgPool;
use ridetime::engine::Engine;
use ridetime::external::openrouteservice::OrsGateway;
use ridetime::server;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let config = Config::from_env().unwrap();

    let PgPool(pool) = PgPool::new(&config.database_url, 5).await.unwrap();

    let gateway = Arc::new(OrsGateway::new(config.ors.clone()).unwrap());
    let engine = Engine::new(pool, gateway).await.unwrap();

    server::serve(engine, config.bind_addr).await;
}
