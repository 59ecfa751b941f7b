//! User management command handlers.

use academy_core::api::Gateway;
use academy_core::api::types::{ManagedUser, NewUser};
use academy_core::users;
use anyhow::{Context, Result};

pub async fn list(gateway: &Gateway) -> Result<()> {
    let users = users::list(gateway).await.context("list users")?;
    if users.is_empty() {
        println!("No users found.");
    } else {
        for user in users {
            println!(
                "{}  {}  {}  {}  {}",
                user.id,
                user.phone,
                user.name.as_deref().unwrap_or("-"),
                user.role.as_deref().unwrap_or("-"),
                if user.active { "active" } else { "inactive" }
            );
        }
    }
    Ok(())
}

pub async fn show(gateway: &Gateway, id: &str) -> Result<()> {
    let user = users::details(gateway, id)
        .await
        .with_context(|| format!("load user '{id}'"))?;
    print_user(&user);
    Ok(())
}

pub async fn toggle(gateway: &Gateway, id: &str) -> Result<()> {
    let user = users::toggle_status(gateway, id)
        .await
        .with_context(|| format!("toggle user '{id}'"))?;
    println!(
        "User {} is now {}.",
        user.id,
        if user.active { "active" } else { "inactive" }
    );
    Ok(())
}

pub async fn add(
    gateway: &Gateway,
    name: String,
    phone: String,
    email: Option<String>,
    role: Option<String>,
) -> Result<()> {
    let user = users::add(
        gateway,
        &NewUser {
            name,
            phone,
            email,
            role,
        },
    )
    .await
    .context("add user")?;
    println!("Created user {}.", user.id);
    Ok(())
}

fn print_user(user: &ManagedUser) {
    println!("id:     {}", user.id);
    println!("phone:  {}", user.phone);
    println!("name:   {}", user.name.as_deref().unwrap_or("-"));
    println!("email:  {}", user.email.as_deref().unwrap_or("-"));
    println!("role:   {}", user.role.as_deref().unwrap_or("-"));
    println!("status: {}", if user.active { "active" } else { "inactive" });
}
