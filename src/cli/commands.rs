use crate::convert::{output_filename, Converter};
use crate::error::ConvertResult;
use crate::excel::{column_widths, DocumentReader, SheetEncoder};
use crate::loader::TableLoader;
use crate::types::Table;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Rows shown by `preview` and `inspect` when not specified
pub const DEFAULT_PREVIEW_ROWS: usize = 20;

/// Widest a preview column gets before its contents are truncated
const PREVIEW_COLUMN_LIMIT: usize = 30;

/// Execute the convert command
pub fn convert(
    input: PathBuf,
    output: Option<PathBuf>,
    sheet_name: String,
    verbose: bool,
) -> ConvertResult<()> {
    println!("{}", "📊 csvsheet - CSV to Excel".bold().green());
    println!("   Input:  {}", input.display());

    if verbose {
        println!("{}", "📖 Reading CSV file...".cyan());
    }
    let bytes = fs::read(&input)?;

    let filename = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let converter = Converter::new(
        TableLoader::default(),
        SheetEncoder::new().with_sheet_name(sheet_name),
    );
    let conversion = converter.convert(&bytes, &filename)?;

    let output = output.unwrap_or_else(|| default_output_path(&input));
    println!("   Output: {}\n", output.display());

    if verbose {
        println!(
            "   Separator: {}, {} columns, {} rows\n",
            conversion.delimiter,
            conversion.table.column_count(),
            conversion.table.row_count()
        );
        let widths = column_widths(&conversion.table);
        for (column, width) in conversion.table.columns.iter().zip(widths) {
            println!(
                "      {} ({}, width {})",
                column.name.cyan(),
                column.kind,
                width
            );
        }
        println!();
        println!("{}", "💾 Writing Excel file...".cyan());
    }

    fs::write(&output, &conversion.document.bytes)?;

    println!("{}", "✅ Conversion Complete!".bold().green());
    println!(
        "   {} rows × {} columns ({} separated)",
        conversion.table.row_count(),
        conversion.table.column_count(),
        conversion.delimiter.name()
    );
    println!("   Excel file: {}\n", output.display());

    Ok(())
}

/// Execute the preview command - show the parsed CSV without converting
pub fn preview(input: PathBuf, rows: usize) -> ConvertResult<()> {
    println!("{}", "🔍 csvsheet - Preview".bold().green());
    println!("   File: {}", input.display());

    let bytes = fs::read(&input)?;
    let (delimiter, table) = TableLoader::default().detect(&bytes)?;

    println!("   Separator: {}\n", delimiter);
    print!("{}", render_table(&table, rows));
    print_row_summary(&table, rows);

    Ok(())
}

/// Execute the inspect command - read a workbook back and show it
pub fn inspect(input: PathBuf, rows: usize) -> ConvertResult<()> {
    println!("{}", "🔍 csvsheet - Inspect Workbook".bold().green());
    println!("   File: {}\n", input.display());

    let bytes = fs::read(&input)?;
    let table = DocumentReader::new(bytes).read()?;

    print!("{}", render_table(&table, rows));
    print_row_summary(&table, rows);

    Ok(())
}

/// Next to the input, named by [`output_filename`]
pub fn default_output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(output_filename(&name))
}

fn print_row_summary(table: &Table, shown: usize) {
    println!();
    if table.row_count() > shown {
        println!(
            "   Showing {} of {} rows, {} columns",
            shown,
            table.row_count(),
            table.column_count()
        );
    } else {
        println!(
            "   {} rows, {} columns",
            table.row_count(),
            table.column_count()
        );
    }
}

/// Render the header, column types and the first `max_rows` rows as an
/// aligned plain-text grid
pub fn render_table(table: &Table, max_rows: usize) -> String {
    let shown = &table.rows[..table.rows.len().min(max_rows)];

    let header: Vec<String> = table.columns.iter().map(|c| clip(&c.name)).collect();
    let kinds: Vec<String> = table
        .columns
        .iter()
        .map(|c| format!("<{}>", c.kind))
        .collect();
    let body: Vec<Vec<String>> = shown
        .iter()
        .map(|row| row.iter().map(|v| clip(&v.to_string())).collect())
        .collect();

    let widths: Vec<usize> = (0..table.column_count())
        .map(|idx| {
            std::iter::once(&header[idx])
                .chain(std::iter::once(&kinds[idx]))
                .chain(body.iter().map(|row| &row[idx]))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, &header, &widths);
    push_line(&mut out, &kinds, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &body {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}

fn clip(text: &str) -> String {
    let text = text.replace(['\n', '\r'], " ");
    if text.chars().count() <= PREVIEW_COLUMN_LIMIT {
        return text;
    }
    let mut clipped: String = text.chars().take(PREVIEW_COLUMN_LIMIT - 1).collect();
    clipped.push('…');
    clipped
}
