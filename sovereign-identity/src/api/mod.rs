pub mod admin;
pub mod auth;

use std::net::IpAddr;
use std::sync::Arc;

use rocket::fairing::AdHoc;
use rocket::figment::{providers::Env, Figment};
use rocket::{catch, catchers, get, serde::json::Json, Config};
use rocket_okapi::settings::UrlObject;
use rocket_okapi::{openapi, openapi_get_routes, rapidoc::*, swagger_ui::*};
use tokio::sync::Notify;

use sovereign_db::storage::UserStorage;

use crate::config::IdentityConfig;
use admin::*;
use auth::*;

#[openapi(tag = "misc")]
#[get("/ping")]
fn ping() -> Json<()> {
    Json(())
}

// Unknown paths get a bare text body, not an HTML error page
#[catch(404)]
fn not_found() -> &'static str {
    "Not found"
}

pub async fn serve_api(
    address: IpAddr,
    port: u16,
    start_notify: Arc<Notify>,
    storage: Arc<dyn UserStorage>,
    config: IdentityConfig,
) -> Result<(), rocket::Error> {
    let figment = Figment::from(Config {
        address,
        port,
        ..Config::default()
    })
    .merge(Env::prefixed("SOVEREIGN_").global());

    let on_ready = AdHoc::on_liftoff("API Start!", |_| {
        Box::pin(async move {
            start_notify.notify_one();
        })
    });

    rocket::custom(figment)
        .mount(
            "/",
            openapi_get_routes![
                ping,
                register_simple,
                register_premium,
                login,
                user_status,
                whoami,
                approve_user
            ],
        )
        .mount(
            "/swagger/",
            make_swagger_ui(&SwaggerUIConfig {
                url: "../openapi.json".to_owned(),
                ..Default::default()
            }),
        )
        .mount(
            "/rapidoc/",
            make_rapidoc(&RapiDocConfig {
                general: GeneralConfig {
                    spec_urls: vec![UrlObject::new("General", "../openapi.json")],
                    ..Default::default()
                },
                hide_show: HideShowConfig {
                    allow_spec_url_load: false,
                    allow_spec_file_load: false,
                    ..Default::default()
                },
                ..Default::default()
            }),
        )
        .register("/", catchers![not_found])
        .manage(storage)
        .manage(config)
        .attach(on_ready)
        .launch()
        .await?;
    Ok(())
}
