//! list, show, create, update, delete and export over any resource kind.

use std::io::Write;
use std::path::{Path, PathBuf};

use millwright_card::{Confirm, DeleteOutcome, ResourceCard};
use millwright_core::{apply_assignments, merge_json, FieldAssignment, Resource};
use millwright_http::HttpApi;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use super::{mount, print_json, read_json, Context};
use crate::render;
use crate::{OutputFormat, SearchArgs};

impl SearchArgs {
    fn apply<R: Resource>(&self, card: &mut ResourceCard<R, HttpApi>) {
        if let Some(term) = &self.search {
            card.set_local_search(term.as_str());
        }
        if let Some(term) = &self.global_search {
            card.set_global_search(term.as_str());
        }
    }
}

pub(crate) async fn cmd_list<R: Resource>(ctx: &Context, search: &SearchArgs) -> Result<(), String> {
    let mut card = mount::<R>(ctx).await?;
    search.apply(&mut card);
    let visible = card.visible();

    match ctx.output {
        OutputFormat::Json => print_json(&visible),
        OutputFormat::Text => {
            render::print_table(&visible, card.references());
            if !ctx.quiet {
                println!();
                println!(
                    "{} of {} {}",
                    visible.len(),
                    card.records().len(),
                    R::KIND
                );
            }
            Ok(())
        }
    }
}

pub(crate) async fn cmd_show<R: Resource>(ctx: &Context, id: &str) -> Result<(), String> {
    let card = mount::<R>(ctx).await?;
    let record = card
        .get(id)
        .ok_or_else(|| format!("{} '{}' not found", R::KIND.label(), id))?;

    match ctx.output {
        OutputFormat::Json => print_json(record),
        OutputFormat::Text => {
            render::print_table(&[record], card.references());
            render::print_details(record);
            Ok(())
        }
    }
}

pub(crate) async fn cmd_create<R: Resource>(
    ctx: &Context,
    data: Option<&Path>,
    sets: &[FieldAssignment],
) -> Result<(), String> {
    // Malformed input fails here, before any request.
    let draft = edit(&R::Draft::default(), data, sets)?;

    let mut card = mount::<R>(ctx).await?;
    card.open_form();
    card.set_draft(draft);
    let created = card.create().await;
    finish(ctx, &card, created.as_ref())
}

pub(crate) async fn cmd_update<R: Resource>(
    ctx: &Context,
    id: &str,
    data: Option<&Path>,
    sets: &[FieldAssignment],
) -> Result<(), String> {
    if data.is_none() && sets.is_empty() {
        return Err("nothing to update: pass --set FIELD=VALUE or --data FILE".to_string());
    }
    let mut card = mount::<R>(ctx).await?;
    if !card.begin_edit(id) {
        return Err(format!("{} '{}' not found", R::KIND.label(), id));
    }
    if let Some(record) = card.editing_mut() {
        *record = edit(record, data, sets)?;
    }
    let updated = card.save_edit().await;
    finish(ctx, &card, updated.as_ref())
}

pub(crate) async fn cmd_delete<R: Resource>(ctx: &Context, id: &str, yes: bool) -> Result<(), String> {
    let mut card = mount::<R>(ctx).await?;
    let outcome = if yes {
        card.delete(id, &mut true).await
    } else {
        card.delete(id, &mut StdinConfirm).await
    };
    match outcome {
        DeleteOutcome::Declined => Err("delete cancelled".to_string()),
        DeleteOutcome::Deleted | DeleteOutcome::Failed => finish(ctx, &card, None),
    }
}

pub(crate) async fn cmd_export<R: Resource>(
    ctx: &Context,
    search: &SearchArgs,
    out: Option<&Path>,
) -> Result<(), String> {
    let mut card = mount::<R>(ctx).await?;
    search.apply(&mut card);
    let export = card.export();
    let rows = card.visible().len();

    let path = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&export.file_name));
    std::fs::write(&path, &export.contents)
        .map_err(|e| format!("could not write '{}': {}", path.display(), e))?;
    tracing::info!(kind = %R::KIND, rows, path = %path.display(), "exported");

    match ctx.output {
        OutputFormat::Json => print_json(&json!({
            "file": path.display().to_string(),
            "records": rows,
        })),
        OutputFormat::Text => {
            if !ctx.quiet {
                println!("Exported {} {} to {}", rows, R::KIND, path.display());
            }
            Ok(())
        }
    }
}

/// `--data` fields, then `--set` assignments, over `base`.
fn edit<T>(base: &T, data: Option<&Path>, sets: &[FieldAssignment]) -> Result<T, String>
where
    T: Serialize + DeserializeOwned,
{
    match data {
        Some(path) => {
            let merged = merge_json(base, &read_json(path)?)
                .map_err(|e| format!("{}: {}", path.display(), e))?;
            apply_assignments(&merged, sets)
        }
        None => apply_assignments(base, sets),
    }
    .map_err(|e| e.to_string())
}

/// Print the card's notice and the affected record. An error notice
/// becomes the command's error.
fn finish<R: Resource>(
    ctx: &Context,
    card: &ResourceCard<R, HttpApi>,
    record: Option<&R>,
) -> Result<(), String> {
    let Some(notice) = card.notice() else {
        return Ok(());
    };
    if notice.is_error() {
        return Err(notice.message.clone());
    }
    match ctx.output {
        OutputFormat::Json => print_json(&json!({
            "notice": notice,
            "record": record,
        })),
        OutputFormat::Text => {
            if !ctx.quiet {
                println!("{}", notice);
            }
            if let Some(record) = record {
                render::print_table(&[record], card.references());
                render::print_details(record);
            }
            Ok(())
        }
    }
}

/// Interactive confirmation: only a literal `yes` on stdin confirms.
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        eprintln!("{}", prompt);
        eprint!("Type 'yes' to confirm: ");
        let _ = std::io::stderr().flush();
        let mut input = String::new();
        std::io::stdin().read_line(&mut input).is_ok() && input.trim() == "yes"
    }
}
