//! Session commands against `/api/auth`.

use clap::ValueEnum;
use millwright_core::{NewUser, Role};
use millwright_http::{AuthClient, LOGIN_FAILED, REGISTER_FAILED};
use serde_json::json;

use super::{print_json, Context};
use crate::OutputFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum RoleArg {
    Admin,
    Manager,
    Technician,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Admin => Role::Admin,
            RoleArg::Manager => Role::Manager,
            RoleArg::Technician => Role::Technician,
        }
    }
}

fn client(ctx: &Context) -> AuthClient {
    AuthClient::new(ctx.api())
}

/// The token goes to stdout on its own so it can be captured by scripts.
pub(crate) async fn cmd_login(ctx: &Context, email: &str, password: &str) -> Result<(), String> {
    let token = client(ctx)
        .login(email, password)
        .await
        .map_err(|e| e.user_message(LOGIN_FAILED))?;
    match ctx.output {
        OutputFormat::Json => print_json(&json!({ "token": token })),
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
    }
}

pub(crate) async fn cmd_logout(ctx: &Context) -> Result<(), String> {
    client(ctx)
        .logout()
        .await
        .map_err(|e| e.user_message("Failed to log out"))?;
    match ctx.output {
        OutputFormat::Json => print_json(&json!({ "message": "Logged out" })),
        OutputFormat::Text => {
            if !ctx.quiet {
                println!("Logged out");
            }
            Ok(())
        }
    }
}

pub(crate) async fn cmd_whoami(ctx: &Context) -> Result<(), String> {
    let me = client(ctx)
        .me()
        .await
        .map_err(|e| e.user_message("Not signed in"))?;
    match ctx.output {
        OutputFormat::Json => print_json(&me),
        OutputFormat::Text => {
            match me.get("email").and_then(|v| v.as_str()) {
                Some(email) => println!("Signed in as {}", email),
                None => println!("Signed in"),
            }
            Ok(())
        }
    }
}

pub(crate) async fn cmd_register(ctx: &Context, user: &NewUser) -> Result<(), String> {
    let created = client(ctx)
        .register(user)
        .await
        .map_err(|e| e.user_message(REGISTER_FAILED))?;
    match ctx.output {
        OutputFormat::Json => print_json(&created),
        OutputFormat::Text => {
            if !ctx.quiet {
                println!(
                    "Account created for {} ({})",
                    user.username,
                    user.role.as_str()
                );
            }
            Ok(())
        }
    }
}
