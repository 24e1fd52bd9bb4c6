use std::io::IsTerminal;
use std::time::Duration;

use anstyle::{AnsiColor, Effects, Style};
use indicatif::{ProgressBar, ProgressStyle};

use crate::*;

const BANNER_LABEL_WIDTH: usize = 30;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct TerminalRenderer {
    style: OutputStyle,
}

pub(crate) struct TerminalSpinner {
    progress_bar: Option<ProgressBar>,
}

impl TerminalRenderer {
    pub(crate) fn from_style(style: OutputStyle) -> Self {
        Self { style }
    }

    pub(crate) fn current() -> Self {
        Self::from_style(current_output_style())
    }

    pub(crate) fn style(self) -> OutputStyle {
        self.style
    }

    pub(crate) fn print_status(self, status: &str, message: &str) {
        println!("{}", paint_status_line(self.style, status, message));
    }

    pub(crate) fn print_lines(self, lines: &[String]) {
        for line in lines {
            println!("{line}");
        }
    }

    pub(crate) fn print_success_banner(self, action: &str) {
        for line in render_banner(self.style, action, true) {
            println!("{line}");
        }
    }

    pub(crate) fn print_failure_banner(self, action: &str, error: &anyhow::Error) {
        for line in render_banner(self.style, action, false) {
            eprintln!("{line}");
        }
        eprintln!("{}", render_error_line(self.style, error));
    }

    pub(crate) fn start_spinner(self, label: &str) -> TerminalSpinner {
        if self.style == OutputStyle::Plain {
            return TerminalSpinner { progress_bar: None };
        }

        let progress_bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan.bold} {msg} {elapsed}") {
            progress_bar.set_style(style.tick_chars(spinner_tick_chars(label)));
        }
        progress_bar.set_message(label.to_string());
        progress_bar.enable_steady_tick(Duration::from_millis(80));
        TerminalSpinner {
            progress_bar: Some(progress_bar),
        }
    }
}

impl TerminalSpinner {
    pub(crate) fn finish(mut self) {
        if let Some(progress_bar) = self.progress_bar.take() {
            progress_bar.finish_and_clear();
        }
    }
}

pub(crate) fn current_output_style() -> OutputStyle {
    if std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty()) {
        return OutputStyle::Plain;
    }
    resolve_output_style(std::io::stdout().is_terminal())
}

pub(crate) fn resolve_output_style(stdout_is_tty: bool) -> OutputStyle {
    if stdout_is_tty {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => format!("{} {message}", status_badge(status)),
    }
}

fn paint_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => render_status_line(style, status, message),
        OutputStyle::Rich => format!(
            "{} {message}",
            colorize(status_style(status), &status_badge(status))
        ),
    }
}

fn status_badge(status: &str) -> String {
    match status {
        "ok" => "[OK]".to_string(),
        "warn" => "[WARN]".to_string(),
        "err" => "[ERR]".to_string(),
        "step" => "[..]".to_string(),
        other => format!("[{}]", other.to_ascii_uppercase()),
    }
}

/// Two padded lines closing every mutating command.
pub(crate) fn render_banner(style: OutputStyle, action: &str, succeeded: bool) -> Vec<String> {
    let (step, result) = if succeeded {
        ("done", "success")
    } else {
        ("aborted", "failure")
    };
    let result_style = status_style(if succeeded { "ok" } else { "err" });
    let paint = |text: &str| match style {
        OutputStyle::Plain => text.to_string(),
        OutputStyle::Rich => colorize(result_style, text),
    };

    vec![
        format!(
            "{:<width$}{}",
            format!("Running {action}..."),
            paint(step),
            width = BANNER_LABEL_WIDTH
        ),
        format!(
            "{:<width$}{}",
            "Procedure result:",
            paint(result),
            width = BANNER_LABEL_WIDTH
        ),
    ]
}

pub(crate) fn render_error_line(style: OutputStyle, error: &anyhow::Error) -> String {
    let message = format!("{error:#}");
    match style {
        OutputStyle::Plain => format!("error: {message}"),
        OutputStyle::Rich => format!(
            "{} {}",
            colorize(status_style("err"), "error:"),
            colorize(status_style("warn"), &message)
        ),
    }
}

pub(crate) fn format_gather_lines(report: &GatherReport, style: OutputStyle) -> Vec<String> {
    if report.components.is_empty() {
        return vec![render_status_line(
            style,
            "warn",
            "no component matched; nothing was published",
        )];
    }

    let catalog = report.catalog.as_deref().unwrap_or_default();
    let mut lines: Vec<String> = report
        .components
        .iter()
        .map(|component| {
            render_status_line(
                style,
                "ok",
                &format!("published {component}@{} to '{catalog}'", report.version),
            )
        })
        .collect();
    lines.push(format!("uploaded {} artifact(s)", report.uploaded.len()));
    if report.pinned {
        lines.push(format!("pinned version {}", report.version));
    }
    lines
}

pub(crate) fn format_plan_lines(plan: &GatherPlan) -> Vec<String> {
    let mut lines = Vec::with_capacity(plan.units.len() + 1);
    for unit in &plan.units {
        let target = unit
            .registry_path()
            .map(|path| path.to_string())
            .unwrap_or_else(|_| unit.relative_path.clone());
        lines.push(format!("would upload {target} ({} bytes)", unit.content.len()));
    }
    if lines.is_empty() {
        lines.push("nothing to publish".to_string());
    }
    lines
}

pub(crate) fn format_scatter_lines(report: &ScatterReport, style: OutputStyle) -> Vec<String> {
    if report.outcomes.is_empty() {
        return vec![render_status_line(
            style,
            "warn",
            "no pinned components to install",
        )];
    }

    report
        .outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(files) => render_status_line(
                style,
                "ok",
                &format!(
                    "installed {}@{} ({} files)",
                    outcome.component,
                    outcome.version,
                    files.len()
                ),
            ),
            Err(err) => render_status_line(
                style,
                "err",
                &format!(
                    "failed {}@{}: {err}",
                    outcome.component, outcome.version
                ),
            ),
        })
        .collect()
}

pub(crate) fn format_remove_lines(report: &RemoveReport, style: OutputStyle) -> Vec<String> {
    let mut lines = vec![render_status_line(
        style,
        "ok",
        &format!(
            "deleted {} file(s) of version {} from '{}'",
            report.deleted.len(),
            report.version,
            report.catalog
        ),
    )];
    if report.purged_cache {
        lines.push(render_status_line(style, "ok", "removed local install"));
    }
    if report.removed_pin {
        lines.push(render_status_line(style, "ok", "removed pin"));
    }
    lines
}

fn spinner_tick_chars(label: &str) -> &'static str {
    match label {
        "publish" => ".oO@* ",
        "install" => "<^>v ",
        "remove" => "\\|/- ",
        _ => "|/-\\ ",
    }
}

fn status_style(status: &str) -> Style {
    let color = match status {
        "ok" => AnsiColor::Green,
        "warn" => AnsiColor::Yellow,
        "err" => AnsiColor::Red,
        _ => AnsiColor::BrightBlue,
    };
    Style::new().fg_color(Some(color.into())).effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}
