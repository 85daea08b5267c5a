use anyhow::{bail, Result};
use clap::Parser;
use pwhash::bcrypt;

/// Program to derive the bcrypt hash the service expects in ADMIN_PASSWORD_HASH
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Bcrypt cost factor
    #[clap(short, long, default_value = "10")]
    cost: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let password_entered = rpassword::prompt_password("Enter admin password: ")?;
    let password_repeated = rpassword::prompt_password("Repeat admin password: ")?;
    if password_entered != password_repeated {
        bail!("Passwords do not match");
    };

    let hash = bcrypt::hash_with(
        bcrypt::BcryptSetup {
            cost: Some(args.cost),
            ..Default::default()
        },
        &password_entered,
    )?;
    println!("{hash}");

    Ok(())
}
