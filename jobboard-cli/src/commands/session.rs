use std::io::{self, Write};

use anyhow::{Result, bail};
use rpassword::prompt_password;
use tracing::warn;

use super::{Session, print_json};

/// Signs in and stores the session.
///
/// # Errors
/// Returns an error when input is missing or the server rejects the
/// credentials.
pub async fn login(session: &Session, email: Option<String>) -> Result<()> {
    let email = match email {
        Some(email) => email.trim().to_string(),
        None => prompt("Email: ")?,
    };
    if email.is_empty() {
        bail!("email must not be empty");
    }
    let password = prompt_password("Password: ")?;
    if password.trim().is_empty() {
        bail!("password must not be empty");
    }

    let auth = session.context.auth();
    let user = match auth.login(&email, &password).await {
        Ok(user) => user,
        Err(err) => bail!("login failed: {err}"),
    };
    if let Err(err) = auth.ensure_profile().await {
        warn!(error = %err, "signed in but the profile could not be loaded");
    }

    println!("Signed in as {} ({})", user.email, user.role);
    println!("Session stored at {}", session.path.display());
    Ok(())
}

/// Ends the session on the server and removes it locally.
pub async fn logout(session: &Session) {
    if !session.is_signed_in() {
        println!("No active session at {}", session.path.display());
        return;
    }
    session.context.auth().logout().await;
    println!("Signed out");
}

/// Prints the signed-in user, fetching the profile when only the login
/// details are stored.
///
/// # Errors
/// Returns an error if the profile request fails.
pub async fn whoami(session: &Session, json: bool) -> Result<()> {
    if !session.is_signed_in() {
        println!("Not signed in");
        return Ok(());
    }

    let user = match session.context.auth().ensure_profile().await {
        Ok(Some(user)) => user,
        Ok(None) => {
            println!("Not signed in");
            return Ok(());
        }
        Err(err) if err.is_unauthorized() => {
            bail!("session expired; run `jobboard login` to sign in again")
        }
        Err(err) => bail!("failed to load profile: {err}"),
    };

    if json {
        return print_json(&user);
    }

    let name = format!("{} {}", user.first_name, user.last_name);
    println!("{:<8} {}", "Email:", user.email);
    println!("{:<8} {}", "Role:", user.role);
    if !name.trim().is_empty() {
        println!("{:<8} {}", "Name:", name.trim());
    }
    if let Some(phone) = &user.phone {
        println!("{:<8} {phone}", "Phone:");
    }
    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush().ok();
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let trimmed = input.trim().to_string();
    if trimmed.is_empty() {
        bail!("input must not be empty");
    }
    Ok(trimmed)
}
