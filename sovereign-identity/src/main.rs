use clap::Parser;
use futures::future::{AbortHandle, Abortable, Aborted};
use log::*;
use std::error::Error;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::sleep;

use sovereign_db::memory::MemoryStorage;
use sovereign_db::storage::UserStorage;
use sovereign_identity::api::serve_api;
use sovereign_identity::config::IdentityConfig;

#[derive(Parser, Debug, Clone)]
#[clap(about, version, author)]
struct Args {
    /// Address to listen incoming API requests on
    #[clap(long, default_value = "127.0.0.1", env = "SOVEREIGN_API_ADDRESS")]
    address: IpAddr,
    /// Port to listen incoming API requests on
    #[clap(long, default_value = "8080", env = "SOVEREIGN_API_PORT")]
    port: u16,
    /// Email the administrator logs in with. Empty disables the root login
    #[clap(long, default_value = "", env = "ADMIN_EMAIL")]
    admin_email: String,
    /// Bcrypt hash of the administrator password, produced by admin-hash
    #[clap(
        long,
        default_value = "",
        env = "ADMIN_PASSWORD_HASH",
        hide_env_values = true
    )]
    admin_password_hash: String,
    /// Key the session tokens are signed with
    #[clap(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,
    #[clap(subcommand)]
    subcmd: SubCommand,
}

#[derive(Parser, Debug, Clone)]
enum SubCommand {
    /// Start listening incoming API requests
    Serve,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    env_logger::init();

    match args.subcmd.clone() {
        // The user set outlives API restarts, so it is created outside the loop
        SubCommand::Serve => {
            let storage: Arc<dyn UserStorage> = Arc::new(MemoryStorage::new());
            loop {
                let (_abort_api_handle, abort_api_reg) = AbortHandle::new_pair();
                let start_notify = Arc::new(Notify::new());
                let config = IdentityConfig {
                    admin_email: args.admin_email.clone(),
                    admin_password_hash: args.admin_password_hash.clone(),
                    jwt_secret: args.jwt_secret.clone(),
                };

                info!("Serving API");
                let api_fut = tokio::spawn(serve_api(
                    args.address,
                    args.port,
                    start_notify,
                    storage.clone(),
                    config,
                ));
                match Abortable::new(api_fut, abort_api_reg).await {
                    Ok(_) => (),
                    Err(Aborted) => {
                        error!("API thread aborted")
                    }
                }

                let restart_dt = Duration::from_secs(5);
                info!("Adding {:?} delay before restarting logic", restart_dt);
                sleep(restart_dt).await;
            }
        }
    }
}
