//! Shared list/detail/form command handling

use std::future::Future;
use std::io::Write;

use tokio::sync::watch;
use tracing::debug;

use crate::handlers::forms;
use crate::models::Resource;
use crate::state::{ListController, LoadStatus, ViewMode};
use crate::utils::errors::{PgAdminError, Result};
use crate::utils::helpers::create_pagination_info;
use super::ResourceAction;

/// How a resource is printed in the shell
pub trait ResourceView: Resource {
    /// Plural page title, e.g. "Guests"
    const TITLE: &'static str;

    /// One list line
    fn row(&self) -> String;

    /// Full detail view
    fn detail(&self) -> String;

    /// Aggregates over the loaded records
    fn summary(items: &[Self]) -> String;
}

/// Run one action against a resource controller
pub async fn handle_resource<R: ResourceView>(
    controller: &mut ListController<R>,
    action: ResourceAction,
    out: &mut dyn Write,
) -> Result<()> {
    if action.needs_items() && !controller.has_loaded() {
        // A failed first load leaves a banner and an empty list
        reload(controller, out).await?;
    }

    match action {
        ResourceAction::List => render_list(controller, out)?,
        ResourceAction::Refresh => {
            reload(controller, out).await?;
            render_list(controller, out)?;
        }
        ResourceAction::Search { term } => {
            controller.set_search(&term.join(" "));
            render_list(controller, out)?;
        }
        ResourceAction::Page { number } => {
            if !controller.go_to_page(number) {
                writeln!(out, "No page {}.", number)?;
            }
            render_list(controller, out)?;
        }
        ResourceAction::Next => {
            controller.next_page();
            render_list(controller, out)?;
        }
        ResourceAction::Prev => {
            controller.previous_page();
            render_list(controller, out)?;
        }
        ResourceAction::View { id } => {
            controller.view(&id).await?;
            if let ViewMode::Viewing(item) = controller.mode() {
                writeln!(out, "{}", item.detail())?;
            }
        }
        ResourceAction::Back => {
            controller.back()?;
            render_list(controller, out)?;
        }
        ResourceAction::Add => {
            controller.begin_create()?;
            render_form(controller, out)?;
        }
        ResourceAction::Edit { id } => {
            controller.begin_edit(&id)?;
            render_form(controller, out)?;
        }
        ResourceAction::Set { field, value } => {
            let draft = current_draft(controller)?;
            let updated = forms::apply_field(&draft, &field, &value.join(" "))?;
            controller.set_draft(updated)?;
            writeln!(out, "{} updated.", field)?;
        }
        ResourceAction::Fill { file } => {
            let draft = current_draft(controller)?;
            let updated = forms::fill_from_file(&draft, &file).await?;
            controller.set_draft(updated)?;
            render_form(controller, out)?;
        }
        ResourceAction::Form => render_form(controller, out)?,
        ResourceAction::Submit => {
            let status = controller.subscribe_status();
            with_loading_notice::<R, _>(status, out, controller.submit()).await??;
            writeln!(out, "{} saved.", capitalize(R::KIND))?;
            render_list(controller, out)?;
        }
        ResourceAction::Cancel => {
            controller.cancel()?;
            render_list(controller, out)?;
        }
        ResourceAction::Delete { id } => {
            controller.delete(&id).await?;
            writeln!(out, "Deleted {} {}.", R::KIND, id)?;
        }
        ResourceAction::Summary => writeln!(out, "{}", R::summary(controller.items()))?,
    }
    Ok(())
}

async fn reload<R: ResourceView>(controller: &mut ListController<R>, out: &mut dyn Write) -> Result<()> {
    let status = controller.subscribe_status();
    if let Err(e) = with_loading_notice::<R, _>(status, out, controller.load()).await? {
        debug!(kind = R::KIND, error = %e, "Collection load failed, showing banner");
    }
    Ok(())
}

/// Drive `operation`, printing a notice whenever the collection starts loading
async fn with_loading_notice<R, F>(
    mut status: watch::Receiver<LoadStatus>,
    out: &mut dyn Write,
    operation: F,
) -> Result<F::Output>
where
    R: ResourceView,
    F: Future,
{
    tokio::pin!(operation);
    loop {
        tokio::select! {
            changed = status.changed() => {
                if changed.is_err() {
                    return Ok(operation.await);
                }
                if *status.borrow_and_update() == LoadStatus::Loading {
                    writeln!(out, "Loading {}...", R::TITLE.to_lowercase())?;
                    out.flush()?;
                }
            }
            output = &mut operation => return Ok(output),
        }
    }
}

fn current_draft<R: Resource>(controller: &ListController<R>) -> Result<R::Draft> {
    controller
        .form()
        .map(|form| form.draft.clone())
        .ok_or_else(|| {
            PgAdminError::InvalidInput(format!("No {} form is open. Use 'add' or 'edit <id>' first.", R::KIND))
        })
}

fn render_list<R: ResourceView>(controller: &ListController<R>, out: &mut dyn Write) -> Result<()> {
    if let Some(banner) = controller.banner() {
        writeln!(out, "! {}", banner)?;
    }

    let filtered = controller.filtered().len();
    writeln!(
        out,
        "{} ({})",
        R::TITLE,
        create_pagination_info(controller.page(), controller.total_pages(), filtered)
    )?;
    if !controller.search().is_empty() {
        writeln!(out, "Search: \"{}\"", controller.search())?;
    }

    let items = controller.page_items();
    if items.is_empty() {
        writeln!(out, "No {} found.", R::TITLE.to_lowercase())?;
    }
    for item in items {
        writeln!(out, "  {}", item.row())?;
    }
    Ok(())
}

fn render_form<R: Resource>(controller: &ListController<R>, out: &mut dyn Write) -> Result<()> {
    let Some(form) = controller.form() else {
        return Ok(());
    };

    let title = match &form.target {
        Some(target) => format!("Edit {} {}", R::KIND, target.id()),
        None => format!("New {}", R::KIND),
    };
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&form.draft)?)?;

    for (field, message) in form.field_errors.iter() {
        writeln!(out, "  {}: {}", field, message)?;
    }
    if let Some(error) = &form.submit_error {
        writeln!(out, "! {}", error)?;
    }
    Ok(())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
