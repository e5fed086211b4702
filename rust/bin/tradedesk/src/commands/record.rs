//! Master record commands.
//!
//! `tradedesk new unit --set unit=Box`, `tradedesk list parties --search alpha`.
//! `new` drives a [`FormCollector`]; `list`, `edit` and `delete` drive a
//! [`RecordBrowser`]. Both run over a [`ResourceClient`] bound to the
//! current context's session.

use std::io::{BufRead, Write};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use tradedesk_client::ResourceClient;
use tradedesk_records::{Collection, Entity, FieldKind, FormCollector, Notice, RecordBrowser, Rule};

use crate::commands::connect;
use crate::config::Context;

/// Master collection named on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Agent,
    Party,
    Unit,
    Hsn,
    Item,
    Transport,
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "agent" | "agents" => Ok(EntityKind::Agent),
            "party" | "parties" => Ok(EntityKind::Party),
            "unit" | "units" => Ok(EntityKind::Unit),
            "hsn" | "hsns" => Ok(EntityKind::Hsn),
            "item" | "items" => Ok(EntityKind::Item),
            "transport" | "transports" => Ok(EntityKind::Transport),
            _ => Err(format!(
                "unknown entity '{}' (expected agent, party, unit, hsn, item or transport)",
                s
            )),
        }
    }
}

/// Parse a `field=value` assignment.
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field name in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

fn collection<E: Entity>(server: &str, session: Arc<tradedesk_client::Session>) -> Arc<dyn Collection<E>> {
    Arc::new(ResourceClient::<E>::new(server, session))
}

fn print_notice(out: &mut impl Write, notice: Option<&Notice>) -> Result<()> {
    if let Some(notice) = notice {
        if notice.is_error() {
            writeln!(out, "Error: {}", notice.message)?;
        } else {
            writeln!(out, "{}", notice.message)?;
        }
    }
    Ok(())
}

fn kind_label(kind: &FieldKind) -> String {
    match kind {
        FieldKind::Text => "text".into(),
        FieldKind::Number => "number".into(),
        FieldKind::Date => "date".into(),
        FieldKind::Tel => "tel".into(),
        FieldKind::Email => "email".into(),
        FieldKind::List => "list".into(),
        FieldKind::Select(options) => format!("one of {}", options.len()),
    }
}

/// Print the field table of an entity.
pub fn fields<E: Entity>(out: &mut impl Write) -> Result<()> {
    writeln!(out, "{} ({})", E::LABEL, E::PATH)?;
    writeln!(out, "{:18} {:28} {:12} {:9} {}", "FIELD", "LABEL", "TYPE", "REQUIRED", "RULE")?;
    for def in E::FIELDS {
        let rule = match def.rule {
            Rule::None => "-",
            Rule::Phone { .. } => "10 digits",
            Rule::Mobile { .. } => "mobile (6-9, 10 digits)",
        };
        let required = if def.required { "yes" } else { "" };
        writeln!(out, "{:18} {:28} {:12} {:9} {}", def.name, def.label, kind_label(&def.kind), required, rule)?;
    }
    Ok(())
}

/// Ask for every field on the terminal. Empty input leaves the field blank.
fn prompt_fields<E: Entity>(form: &mut FormCollector<E>) -> Result<()> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    for def in E::FIELDS {
        let mut prompt = def.label.to_string();
        if def.required {
            prompt.push('*');
        }
        match def.kind {
            FieldKind::Select(options) if options.len() <= 8 => {
                prompt.push_str(&format!(" [{}]", options.join("/")));
            }
            FieldKind::Date => prompt.push_str(" (YYYY-MM-DD)"),
            FieldKind::List => prompt.push_str(" (comma separated)"),
            _ => {}
        }
        eprint!("{}: ", prompt);
        std::io::stderr().flush()?;
        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        form.set_field(def.name, line.trim_end().to_string())?;
    }
    Ok(())
}

/// Fill a form from assignments and submit it.
pub async fn submit_new<E: Entity>(
    form: &mut FormCollector<E>,
    assignments: &[(String, String)],
    out: &mut impl Write,
) -> Result<Option<E>> {
    for (field, value) in assignments {
        form.set_field(field, value.as_str())?;
    }

    match form.submit().await {
        Ok(created) => {
            print_notice(out, form.notice())?;
            writeln!(out, "id: {}", created.id())?;
            Ok(Some(created))
        }
        Err(err) => {
            match err.field_error() {
                Some((field, message)) => writeln!(out, "{}: {}", field, message)?,
                None => print_notice(out, form.notice())?,
            }
            Ok(None)
        }
    }
}

/// List records, optionally filtered by the browser's search.
pub async fn show_list<E: Entity>(
    collection: Arc<dyn Collection<E>>,
    search: Option<&str>,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let mut browser = RecordBrowser::new(collection);
    if let Err(err) = browser.load().await {
        print_notice(out, browser.notice())?;
        return Err(err.into());
    }
    if let Some(query) = search {
        browser.search_for(query);
    }

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(browser.displayed())?)?;
        return Ok(());
    }

    if browser.displayed().is_empty() {
        writeln!(out, "No {} found.", E::PATH)?;
        return Ok(());
    }
    writeln!(out, "{:34} {}", "ID", E::DISPLAY_FIELD.to_uppercase())?;
    for record in browser.displayed() {
        writeln!(out, "{:34} {}", record.id(), record.display_name())?;
    }
    writeln!(out, "\n{} of {} {}", browser.displayed().len(), browser.records().len(), E::PATH)?;
    Ok(())
}

/// Expand one record, apply assignments, and save.
pub async fn apply_edit<E: Entity>(
    collection: Arc<dyn Collection<E>>,
    id: &str,
    assignments: &[(String, String)],
    out: &mut impl Write,
) -> Result<Option<E>> {
    if assignments.is_empty() {
        anyhow::bail!("Nothing to change. Pass one or more --set FIELD=VALUE.");
    }

    let mut browser = RecordBrowser::new(collection);
    browser.load().await?;
    browser.toggle_expand(id)?;
    for (field, value) in assignments {
        browser.edit_field(field, value.as_str())?;
    }

    match browser.save().await {
        Ok(saved) => {
            print_notice(out, browser.notice())?;
            Ok(Some(saved))
        }
        Err(_) => {
            match browser.field_error() {
                Some((field, message)) => writeln!(out, "{}: {}", field, message)?,
                None => print_notice(out, browser.notice())?,
            }
            Ok(None)
        }
    }
}

/// Delete one record through the browser.
pub async fn apply_delete<E: Entity>(
    collection: Arc<dyn Collection<E>>,
    id: &str,
    out: &mut impl Write,
) -> Result<bool> {
    let mut browser = RecordBrowser::new(collection);
    let deleted = browser.remove(id).await.is_ok();
    print_notice(out, browser.notice())?;
    Ok(deleted)
}

pub async fn create<E: Entity>(ctx: &Context, assignments: &[(String, String)]) -> Result<()> {
    let session = connect(ctx).await?;
    let mut form = FormCollector::new(collection::<E>(&ctx.server, session));
    if assignments.is_empty() {
        prompt_fields(&mut form)?;
    }
    let mut out = std::io::stdout();
    if submit_new(&mut form, assignments, &mut out).await?.is_none() {
        anyhow::bail!("{} was not saved.", E::LABEL);
    }
    Ok(())
}

pub async fn list<E: Entity>(ctx: &Context, search: Option<&str>, json: bool) -> Result<()> {
    let session = connect(ctx).await?;
    show_list(collection::<E>(&ctx.server, session), search, json, &mut std::io::stdout()).await
}

pub async fn edit<E: Entity>(ctx: &Context, id: &str, assignments: &[(String, String)]) -> Result<()> {
    let session = connect(ctx).await?;
    let saved = apply_edit(collection::<E>(&ctx.server, session), id, assignments, &mut std::io::stdout()).await?;
    if saved.is_none() {
        anyhow::bail!("{} was not updated.", E::LABEL);
    }
    Ok(())
}

pub async fn delete<E: Entity>(ctx: &Context, id: &str) -> Result<()> {
    let session = connect(ctx).await?;
    if !apply_delete(collection::<E>(&ctx.server, session), id, &mut std::io::stdout()).await? {
        anyhow::bail!("{} was not deleted.", E::LABEL);
    }
    Ok(())
}
