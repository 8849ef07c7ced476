//! Login, registration and session status.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use finledger_core::guard::Route;

use crate::cli::app::App;

pub async fn login(app: &mut App, user: Option<String>, password_stdin: bool) -> Result<()> {
    app.enter(Route::Login).await?;

    let user = match user {
        Some(user) => user,
        None => prompt("Username or email: ")?,
    };
    let password = read_password(password_stdin)?;

    let user = app.auth().login(&user, &password).await?;
    println!("Logged in as {} <{}>", user.username, user.email);
    Ok(())
}

pub async fn register(
    app: &mut App,
    username: &str,
    email: &str,
    password_stdin: bool,
) -> Result<()> {
    app.enter(Route::Register).await?;

    let password = read_password(password_stdin)?;
    let user = app.auth().register(username, email, &password).await?;
    println!("Registered and logged in as {} <{}>", user.username, user.email);
    Ok(())
}

pub fn logout(app: &App) -> Result<()> {
    let was_logged_in = app.auth().is_authenticated();
    app.auth().logout().context("clear stored session")?;
    if was_logged_in {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

pub fn status(app: &App) {
    match app.auth().user() {
        Some(user) => println!("Logged in as {} <{}>", user.username, user.email),
        None => println!("Not logged in."),
    }
    println!("API: {}", app.api().base_url());
}

fn read_password(from_stdin: bool) -> Result<String> {
    let password = if from_stdin {
        read_line().context("read password from stdin")?
    } else {
        prompt("Password: ")?
    };
    Ok(password.trim_end_matches(['\r', '\n']).to_string())
}

fn prompt(label: &str) -> Result<String> {
    let mut stderr = io::stderr();
    write!(stderr, "{label}")?;
    stderr.flush()?;
    let line = read_line().with_context(|| format!("read {}", label.trim_end_matches([':', ' '])))?;
    Ok(line.trim().to_string())
}

fn read_line() -> Result<String> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}
