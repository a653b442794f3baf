//! Console and HTML renderers for glyph grids.
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use ascii_art::GlyphGrid;
use serde::Deserialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    #[default]
    Console,
    Html,
}

/// Where finished art goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArtOutput {
    Console,
    Html { path: PathBuf, font: String },
}

impl ArtOutput {
    /// Console output goes to `console`, HTML output replaces the target file.
    pub fn write<W: Write>(&self, grid: &GlyphGrid, console: &mut W) -> io::Result<()> {
        match self {
            ArtOutput::Console => write_console(grid, console),
            ArtOutput::Html { path, font } => {
                fs::write(path, html_document(grid, font))?;
                tracing::info!("wrote {}x{} art to {}", grid.width, grid.height, path.display());
                Ok(())
            },
        }
    }
}

pub fn write_console<W: Write>(grid: &GlyphGrid, out: &mut W) -> io::Result<()> {
    for row in grid.rows() {
        writeln!(out, "{row}")?;
    }
    Ok(())
}

/// Standalone HTML page showing `grid` in a monospace block.
pub fn html_document(grid: &GlyphGrid, font: &str) -> String {
    let mut body = String::with_capacity(grid.cells.len() * 2);
    for row in grid.rows() {
        for symbol in row.chars() {
            push_escaped(&mut body, symbol);
        }
        body.push('\n');
    }

    let mut font_family = String::new();
    font.chars().for_each(|symbol| push_escaped(&mut font_family, symbol));

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>ASCII Art</title>\n\
         </head>\n<body style=\"margin: 0; background: #fff; color: #000;\">\n\
         <pre style=\"font-family: '{font_family}', monospace; font-size: 4px; line-height: 1;\">\n\
         {body}</pre>\n</body>\n</html>\n"
    )
}

fn push_escaped(out: &mut String, symbol: char) {
    match symbol {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(symbol),
    }
}
