//! Interactive session: one command per input line against a chart context.

use std::io::BufRead;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::{debug, instrument};

use crate::cli::args::{
    EditField, OptionalField, PanAction, ReplCommand, ReplLine, Switch, ZoomStep,
};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::domain::ChartContext;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Whether the session continues after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
///
/// The value of `set` is the rest of the line after the field name, inner
/// whitespace kept as typed.
pub fn parse_line(line: &str) -> CliResult<Option<ReplCommand>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    match ReplLine::try_parse_from(line.split_whitespace()) {
        Ok(ReplLine {
            command: ReplCommand::Set { field, .. },
        }) => Ok(Some(ReplCommand::Set {
            field,
            value: vec![raw_tail(line, 2).to_string()],
        })),
        Ok(parsed) => Ok(Some(parsed.command)),
        Err(e) if e.kind() == ErrorKind::DisplayHelp => {
            output::info(&e.render());
            Ok(None)
        }
        Err(e) => Err(CliError::Usage(e.render().to_string())),
    }
}

/// `line` without its first `skip` words.
fn raw_tail(line: &str, skip: usize) -> &str {
    let mut rest = line.trim_start();
    for _ in 0..skip {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        rest = rest[end..].trim_start();
    }
    rest
}

pub fn execute_line(
    line: &str,
    ctx: &mut ChartContext,
    services: &ServiceContainer,
) -> CliResult<Flow> {
    match parse_line(line)? {
        Some(command) => execute(command, ctx, services),
        None => Ok(Flow::Continue),
    }
}

/// Run one command. Unknown ids and deleting the root leave the chart as it
/// was without any report beyond the debug log. Edits without a selection
/// are flagged as a warning.
#[instrument(level = "debug", skip(ctx, services))]
pub fn execute(
    command: ReplCommand,
    ctx: &mut ChartContext,
    services: &ServiceContainer,
) -> CliResult<Flow> {
    match command {
        ReplCommand::Show => _show(ctx, services),
        ReplCommand::Add { parent } => match ctx.add_child(&parent) {
            Some(id) => output::action("added", &id),
            None => debug!("add: nothing added under '{}'", parent),
        },
        ReplCommand::Select { id } => {
            if ctx.select(&id) {
                output::action("selected", &id);
            } else {
                debug!("select: no node with id '{}'", id);
            }
        }
        ReplCommand::Set { field, value } => _set(ctx, field, value.concat()),
        ReplCommand::Image { path } => {
            if services.chart.attach_image(ctx, &path)? {
                output::action("image", &path.display());
            } else {
                output::warning("no node selected");
            }
        }
        ReplCommand::Clear { field } => _clear(ctx, field),
        ReplCommand::Commit => match ctx.session.selected_id().cloned() {
            Some(id) => {
                ctx.commit();
                output::action("committed", &id);
            }
            None => output::warning("no node selected"),
        },
        ReplCommand::Cancel => ctx.cancel(),
        ReplCommand::Delete { id } => match ctx.delete(&id) {
            Ok(()) => output::action("deleted", &id),
            Err(e) => debug!("delete: {}", e),
        },
        ReplCommand::Toggle { id } => ctx.toggle_expanded(&id),
        ReplCommand::ExpandAll => ctx.set_all_expanded(true),
        ReplCommand::CollapseAll => ctx.set_all_expanded(false),
        ReplCommand::Zoom { step } => {
            match step {
                ZoomStep::In => ctx.view.zoom_in(),
                ZoomStep::Out => ctx.view.zoom_out(),
                ZoomStep::Reset => ctx.view.reset(),
            }
            output::status(&format!("zoom {}%", ctx.view.zoom_percent()));
        }
        ReplCommand::Pan { action } => _pan(ctx, action),
        ReplCommand::Images { state } => ctx.view.show_images = state == Switch::On,
        ReplCommand::Export { kind, path } => {
            let written = services.chart.export_file(kind, ctx, path.as_deref())?;
            output::action("exported", &written.display());
        }
        ReplCommand::Import { path } => {
            services.chart.import_file(ctx, &path)?;
            output::action("imported", &path.display());
        }
        ReplCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// Read commands from `input` until EOF or `quit`.
///
/// Failing commands are reported and the session goes on; only a read error
/// on `input` ends it with an error.
pub fn run_session(
    input: impl BufRead,
    ctx: &mut ChartContext,
    services: &ServiceContainer,
    interactive: bool,
) -> CliResult<()> {
    if interactive {
        output::prompt("orgchart>");
    }
    for line in input.lines() {
        let line = line.map_err(|e| CliError::from(InfraError::io("read command", e)))?;
        match execute_line(&line, ctx, services) {
            Ok(Flow::Quit) => {
                debug!("run_session: quit");
                return Ok(());
            }
            Ok(Flow::Continue) => {}
            Err(e) => output::error(&e),
        }
        if interactive {
            output::prompt("orgchart>");
        }
    }
    Ok(())
}

fn _show(ctx: &ChartContext, services: &ServiceContainer) {
    output::info(&services.text.render_text(ctx.snapshot(), &ctx.view));
    let pan = ctx.view.pan();
    let selected = ctx
        .session
        .selected_id()
        .map(|id| format!(", {:?} {}", ctx.session.phase(), id))
        .unwrap_or_default();
    output::status(&format!(
        "zoom {}%, pan ({}, {}){}",
        ctx.view.zoom_percent(),
        pan.x,
        pan.y,
        selected
    ));
}

fn _set(ctx: &mut ChartContext, field: EditField, value: String) {
    let edited = ctx.session.edit(|buffer| match field {
        EditField::Title => buffer.set_title(value),
        EditField::Description => buffer.set_description(Some(value)),
        EditField::Image => buffer.set_image_url(Some(value)),
        EditField::Stats => buffer.set_stats(Some(value)),
    });
    if !edited {
        output::warning("no node selected");
    }
}

fn _clear(ctx: &mut ChartContext, field: OptionalField) {
    let edited = ctx.session.edit(|buffer| match field {
        OptionalField::Description => buffer.set_description(None),
        OptionalField::Image => buffer.set_image_url(None),
        OptionalField::Stats => buffer.set_stats(None),
    });
    if !edited {
        output::warning("no node selected");
    }
}

fn _pan(ctx: &mut ChartContext, action: PanAction) {
    match action {
        PanAction::Down { x, y, button } => ctx.view.pointer_down(button.into(), x, y),
        PanAction::Move { x, y } => ctx.view.pointer_move(x, y),
        PanAction::Up => ctx.view.pointer_up(),
        PanAction::Leave => ctx.view.pointer_leave(),
    }
    let pan = ctx.view.pan();
    debug!("pan: ({}, {}) panning={}", pan.x, pan.y, ctx.view.is_panning());
}
