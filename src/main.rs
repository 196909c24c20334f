use std::env;

use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;
use tera::Tera;

use storelink::config::ServerConfig;
use storelink::db::establish_connection_pool;
use storelink::repository::DieselRepository;
use storelink::routes::admin::{
    approve_seller, extend_trial, list_sellers, set_broadcasts_enabled, set_seller_active,
};
use storelink::routes::analytics::{record_event, summarize};
use storelink::routes::auth::{login, register};
use storelink::routes::broadcasts::{
    create_broadcast, list_broadcasts, list_subscribers, schedule_broadcast, send_broadcast,
    subscribe, unsubscribe,
};
use storelink::routes::cart::{add_item, checkout, remove_item, view_cart};
use storelink::routes::media::upload_image;
use storelink::routes::products::{
    create_product, delete_product, get_product, list_products, update_product, upload_products,
};
use storelink::routes::promotions::{
    create_promotion, delete_promotion, list_promotions, update_promotion,
};
use storelink::routes::storefront::{get_store, get_store_product, merchant_feed};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let database_url = env::var("DATABASE_URL").unwrap_or("app.db".to_string());
    let port = env::var("PORT").unwrap_or("8080".to_string());
    let port = port.parse::<u16>().unwrap_or(8080);
    let address = env::var("ADDRESS").unwrap_or("127.0.0.1".to_string());

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to read configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let tera = match Tera::new("templates/**/*") {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    let upload_dir = config.upload_dir.clone();
    if let Err(e) = std::fs::create_dir_all(&upload_dir) {
        log::error!("Failed to create upload directory {upload_dir}: {e}");
        std::process::exit(1);
    }

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/uploads", &upload_dir))
            .service(
                web::scope("/api")
                    .service(register)
                    .service(login)
                    .service(list_products)
                    .service(create_product)
                    .service(upload_products)
                    .service(get_product)
                    .service(update_product)
                    .service(delete_product)
                    .service(list_promotions)
                    .service(create_promotion)
                    .service(update_promotion)
                    .service(delete_promotion)
                    .service(view_cart)
                    .service(add_item)
                    .service(remove_item)
                    .service(checkout)
                    .service(subscribe)
                    .service(unsubscribe)
                    .service(list_subscribers)
                    .service(list_broadcasts)
                    .service(create_broadcast)
                    .service(schedule_broadcast)
                    .service(send_broadcast)
                    .service(record_event)
                    .service(summarize)
                    .service(list_sellers)
                    .service(approve_seller)
                    .service(set_seller_active)
                    .service(set_broadcasts_enabled)
                    .service(extend_trial)
                    .service(upload_image)
                    .service(get_store)
                    .service(get_store_product)
                    .service(merchant_feed),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(config.clone()))
    })
    .bind((address, port))?
    .run()
    .await
}
