//! Login, logout and whoami handlers.

use std::io::{BufRead, Write};

use academy_core::api::{ApiError, Gateway};
use academy_core::login::{LoginError, OtpLogin};
use academy_core::nav::Route;
use academy_core::session::{SessionController, SessionError};
use anyhow::{Context, Result, bail};

pub async fn login(gateway: &Gateway, session: &SessionController) -> Result<()> {
    if session.has_token() {
        bail!("Already logged in. Run `academy logout` first.");
    }

    let phone = prompt("Phone number: ")?;
    let mut login = OtpLogin::new();
    login
        .request_otp(gateway, &phone)
        .await
        .context("request OTP")?;
    println!("OTP sent to {}.", login.phone());

    loop {
        let code = prompt("OTP: ")?;
        match login.verify_otp(gateway, session, &code).await {
            Ok(route) => {
                print_welcome(session, route);
                return Ok(());
            }
            // Wrong code: report and let the user retry.
            Err(LoginError::Api(ApiError::Server { message, .. })) => {
                println!("{} ({} failed attempts)", message, login.attempt_count());
            }
            Err(LoginError::EmptyCode) => {
                println!("Enter the OTP, or press Ctrl-C to abort.");
            }
            Err(e) => return Err(e).context("verify OTP"),
        }
    }
}

fn print_welcome(session: &SessionController, route: Route) {
    let name = session
        .user()
        .and_then(|u| u.name)
        .unwrap_or_else(|| "there".to_string());
    println!("Logged in. Welcome, {name}.");
    if route == Route::CompleteProfile {
        println!("Your profile is incomplete. Run `academy profile complete`.");
    }
}

pub async fn logout(gateway: &Gateway, session: &SessionController) -> Result<()> {
    if session.logout(gateway).await {
        println!("Logged out.");
    } else {
        println!("No active session.");
    }
    Ok(())
}

pub async fn me(gateway: &Gateway, session: &SessionController) -> Result<()> {
    let route = match session.refresh_user(gateway).await {
        Ok(route) => route,
        Err(SessionError::NotAuthenticated) => bail!("Not logged in. Run `academy login`."),
        Err(SessionError::Api(e)) => bail!("{}", e.user_message()),
        Err(e) => return Err(e).context("fetch profile"),
    };

    let Some(user) = session.user() else {
        bail!("Not logged in. Run `academy login`.");
    };
    println!("id:     {}", user.id);
    println!("phone:  {}", user.phone);
    println!("name:   {}", user.name.as_deref().unwrap_or("-"));
    println!("email:  {}", user.email.as_deref().unwrap_or("-"));
    if route == Route::CompleteProfile {
        println!("Profile incomplete. Run `academy profile complete`.");
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    std::io::stdout().flush().context("flush stdout")?;

    let mut line = String::new();
    let read = std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read input")?;
    if read == 0 {
        bail!("input closed");
    }
    Ok(line.trim().to_string())
}
