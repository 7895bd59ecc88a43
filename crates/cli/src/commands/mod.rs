//! Subcommand implementations. Each returns `Err(message)` for
//! [`report_error`](crate::report_error); nothing here exits the process.

pub(crate) mod auth;
pub(crate) mod resource;
pub(crate) mod stats;

use std::path::Path;
use std::sync::Arc;

use millwright_card::{LoadState, ResourceCard};
use millwright_core::Resource;
use millwright_http::{ClientConfig, HttpApi};
use serde::Serialize;
use serde_json::Value;

use crate::OutputFormat;

/// Resolved settings shared by every command.
pub(crate) struct Context {
    pub config: ClientConfig,
    pub output: OutputFormat,
    pub quiet: bool,
}

impl Context {
    pub fn api(&self) -> HttpApi {
        HttpApi::new(&self.config)
    }
}

/// Run a generic command with the record type matching a `ResourceKind`.
macro_rules! with_resource {
    ($kind:expr, $($func:ident)::+ ( $($arg:expr),* $(,)? )) => {
        match $kind {
            millwright_core::ResourceKind::Machines => {
                $($func)::+::<millwright_core::Machine>($($arg),*).await
            }
            millwright_core::ResourceKind::Plants => {
                $($func)::+::<millwright_core::Plant>($($arg),*).await
            }
            millwright_core::ResourceKind::Vendors => {
                $($func)::+::<millwright_core::Vendor>($($arg),*).await
            }
            millwright_core::ResourceKind::Users => {
                $($func)::+::<millwright_core::User>($($arg),*).await
            }
            millwright_core::ResourceKind::WorkOrders => {
                $($func)::+::<millwright_core::WorkOrder>($($arg),*).await
            }
            millwright_core::ResourceKind::MaintenanceSchedules => {
                $($func)::+::<millwright_core::MaintenanceSchedule>($($arg),*).await
            }
            millwright_core::ResourceKind::Inventory => {
                $($func)::+::<millwright_core::InventoryItem>($($arg),*).await
            }
        }
    };
}
pub(crate) use with_resource;

/// A loaded card, or the load failure's notice text.
pub(crate) async fn mount<R: Resource>(ctx: &Context) -> Result<ResourceCard<R, HttpApi>, String> {
    let card = ResourceCard::mount(Arc::new(ctx.api())).await;
    if card.load_state() == LoadState::Failed {
        return Err(card
            .notice()
            .map(|n| n.message.clone())
            .unwrap_or_else(|| "Failed to load data".to_string()));
    }
    Ok(card)
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let json =
        serde_json::to_string_pretty(value).map_err(|e| format!("serialization: {}", e))?;
    println!("{}", json);
    Ok(())
}

pub(crate) fn read_json(path: &Path) -> Result<Value, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;
    serde_json::from_str(&content)
        .map_err(|e| format!("could not parse '{}': {}", path.display(), e))
}
