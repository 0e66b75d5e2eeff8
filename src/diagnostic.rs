//! Human readable rendering of [`CompileError`]s. Rendering never prints; the
//! binary decides where the text goes.

use colored::Colorize;

use crate::{error::CompileError, frontend::SourceFile};

pub fn render(error: &CompileError, source: Option<&SourceFile>) -> String {
    let mut output = String::new();

    #[cfg(feature = "error-backtrace")]
    if let Some(raised_at) = error.raised_at() {
        output.push_str(&format!(
            "{}: {} {}\n",
            "backtrace".blue(),
            raised_at.module,
            format!("(at {}:{})", raised_at.file, raised_at.line).white()
        ));
    }

    match (error.span(), source) {
        (Some(span), Some(source)) => {
            output.push_str(&format!(
                "{}: {} {}\n",
                "error".red(),
                error,
                format!("(at {})", source.format_span_position(span)).white()
            ));
            output.push_str(&highlight_span(source, span.start, span.end));
        }
        _ => {
            output.push_str(&format!("{}: {}\n", "error".red(), error));
        }
    }

    output
}

/// Reprints the offending source line with the span underlined
fn highlight_span(source: &SourceFile, start: usize, end: usize) -> String {
    let row = source.row_for_position(start);
    let column = source.column_for_position(start);
    let line = source.line_containing(start);

    let gutter = row.to_string();
    let padding = " ".repeat(gutter.len());
    let width = end
        .saturating_sub(start)
        .clamp(1, line.len().saturating_sub(column - 1).max(1));

    format!(
        "{} {} {}\n{} {} {}{}\n",
        gutter.blue(),
        "|".blue(),
        line,
        padding,
        "|".blue(),
        " ".repeat(column - 1),
        "^".repeat(width).red()
    )
}
