//! Cell fill colors of the active worksheet.
//!
//! The values reader does not expose cell styles, so the workbook parts are
//! read directly: `workbook.xml` names the active sheet, its relationships
//! give the sheet part, `styles.xml` maps a cell's style index to a fill, and
//! the sheet part carries each cell's style index.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, warn};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::domain::entities::highlight::ColorTag;
use crate::error::ExtractError;

/// Fill tags of one sheet, keyed by zero-based `(row, col)`.
#[derive(Debug, Clone, Default)]
pub struct SheetFills {
    pub sheet_name: String,
    cells: HashMap<(u32, u32), ColorTag>,
}

impl SheetFills {
    pub fn get(&self, row: u32, col: u32) -> Option<&ColorTag> {
        self.cells.get(&(row, col))
    }

    /// Zero-based `(last row, last col)` of any filled cell.
    pub fn extent(&self) -> Option<(u32, u32)> {
        let last_row = self.cells.keys().map(|(r, _)| *r).max()?;
        let last_col = self.cells.keys().map(|(_, c)| *c).max()?;
        Some((last_row, last_col))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

pub fn read_active_sheet_fills(path: &Path) -> Result<SheetFills, ExtractError> {
    let bad = |reason: String| ExtractError::resource(path, reason);

    let file = File::open(path).map_err(|e| bad(e.to_string()))?;
    let mut archive = ZipArchive::new(file).map_err(|e| bad(format!("not a workbook: {e}")))?;

    let workbook_xml = read_part(&mut archive, "xl/workbook.xml")
        .map_err(|e| bad(e.to_string()))?
        .ok_or_else(|| bad("missing xl/workbook.xml".to_string()))?;
    let book = parse_workbook(&workbook_xml).map_err(|e| bad(e.to_string()))?;
    let sheet = book
        .sheets
        .get(book.active_tab)
        .or_else(|| book.sheets.first())
        .ok_or_else(|| bad("workbook has no sheets".to_string()))?;

    let rels_xml = read_part(&mut archive, "xl/_rels/workbook.xml.rels")
        .map_err(|e| bad(e.to_string()))?
        .ok_or_else(|| bad("missing xl/_rels/workbook.xml.rels".to_string()))?;
    let targets = parse_relationships(&rels_xml).map_err(|e| bad(e.to_string()))?;
    let target = targets
        .get(&sheet.rel_id)
        .ok_or_else(|| bad(format!("no part for sheet {}", sheet.name)))?;
    let part = resolve_target(target);

    let styles = match read_part(&mut archive, "xl/styles.xml") {
        Ok(Some(xml)) => parse_styles(&xml).unwrap_or_else(|err| {
            warn!(error = %err, "unreadable styles part, treating cells as unfilled");
            StyleFills::default()
        }),
        Ok(None) => StyleFills::default(),
        Err(err) => return Err(bad(err.to_string())),
    };

    let sheet_xml = read_part(&mut archive, &part)
        .map_err(|e| bad(e.to_string()))?
        .ok_or_else(|| bad(format!("missing sheet part {part}")))?;
    let cells = parse_sheet_fills(&sheet_xml, &styles).map_err(|e| bad(e.to_string()))?;

    debug!(sheet = %sheet.name, part = %part, filled = cells.len(), "read sheet fills");
    Ok(SheetFills {
        sheet_name: sheet.name.clone(),
        cells,
    })
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, ZipError> {
    match archive.by_name(name) {
        Ok(mut part) => {
            let mut xml = String::new();
            part.read_to_string(&mut xml)?;
            Ok(Some(xml))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(err) => Err(err),
    }
}

fn attr_value<R>(reader: &Reader<R>, element: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == name)
        .and_then(|attr| {
            attr.decode_and_unescape_value(reader)
                .ok()
                .map(|v| v.into_owned())
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SheetEntry {
    name: String,
    rel_id: String,
}

#[derive(Debug, Default)]
struct BookEntries {
    sheets: Vec<SheetEntry>,
    active_tab: usize,
}

fn parse_workbook(xml: &str) -> Result<BookEntries, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut book = BookEntries::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"workbookView" => {
                    if let Some(tab) = attr_value(&reader, &e, b"activeTab").and_then(|v| v.parse().ok()) {
                        book.active_tab = tab;
                    }
                }
                b"sheet" => {
                    if let (Some(name), Some(rel_id)) = (attr_value(&reader, &e, b"name"), attr_value(&reader, &e, b"id")) {
                        book.sheets.push(SheetEntry { name, rel_id });
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(book)
}

fn parse_relationships(xml: &str) -> Result<HashMap<String, String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut targets = HashMap::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) = (attr_value(&reader, &e, b"Id"), attr_value(&reader, &e, b"Target")) {
                    targets.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(targets)
}

/// Relationship targets are relative to `xl/` unless absolute.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{target}"),
    }
}

/// Fill tag per `cellXfs` entry.
#[derive(Debug, Clone, Default, PartialEq)]
struct StyleFills {
    fills: Vec<Option<ColorTag>>,
    xf_fill_ids: Vec<usize>,
}

impl StyleFills {
    fn tag_for_style(&self, style: usize) -> Option<&ColorTag> {
        let fill_id = *self.xf_fill_ids.get(style)?;
        self.fills.get(fill_id)?.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StyleSection {
    Other,
    Fills,
    CellXfs,
}

fn parse_styles(xml: &str) -> Result<StyleFills, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut styles = StyleFills::default();
    let mut section = StyleSection::Other;
    let mut current_fill: Option<Option<ColorTag>> = None;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match (section, e.local_name().as_ref()) {
                (_, b"fills") => section = StyleSection::Fills,
                (_, b"cellXfs") => section = StyleSection::CellXfs,
                (StyleSection::Fills, b"fill") => current_fill = Some(None),
                (StyleSection::Fills, b"fgColor") => set_foreground(&reader, &mut current_fill, &e),
                (StyleSection::CellXfs, b"xf") => styles.xf_fill_ids.push(fill_id(&reader, &e)),
                _ => {}
            },
            Event::Empty(e) => match (section, e.local_name().as_ref()) {
                (StyleSection::Fills, b"fill") => styles.fills.push(None),
                (StyleSection::Fills, b"fgColor") => set_foreground(&reader, &mut current_fill, &e),
                (StyleSection::CellXfs, b"xf") => styles.xf_fill_ids.push(fill_id(&reader, &e)),
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"fill" => {
                    if let Some(fill) = current_fill.take() {
                        styles.fills.push(fill);
                    }
                }
                b"fills" | b"cellXfs" => section = StyleSection::Other,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(styles)
}

fn set_foreground<R>(
    reader: &Reader<R>,
    current_fill: &mut Option<Option<ColorTag>>,
    fg_color: &BytesStart<'_>,
) {
    if let Some(fill) = current_fill.as_mut() {
        *fill = attr_value(reader, fg_color, b"rgb").map(ColorTag::new);
    }
}

fn fill_id<R>(reader: &Reader<R>, xf: &BytesStart<'_>) -> usize {
    attr_value(reader, xf, b"fillId")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

fn parse_sheet_fills(
    xml: &str,
    styles: &StyleFills,
) -> Result<HashMap<(u32, u32), ColorTag>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut cells = HashMap::new();
    let mut last_row: Option<u32> = None;
    let mut row: u32 = 0;
    let mut next_col: u32 = 0;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"row" => {
                    row = attr_value(&reader, &e, b"r")
                        .and_then(|v| v.parse::<u32>().ok())
                        .map(|r| r.saturating_sub(1))
                        .unwrap_or_else(|| last_row.map_or(0, |r| r + 1));
                    last_row = Some(row);
                    next_col = 0;
                }
                b"c" => {
                    let (cell_row, cell_col) = attr_value(&reader, &e, b"r")
                        .and_then(|r| parse_cell_ref(&r))
                        .unwrap_or((row, next_col));
                    next_col = cell_col + 1;
                    let style = attr_value(&reader, &e, b"s")
                        .and_then(|v| v.parse::<usize>().ok())
                        .unwrap_or(0);
                    if let Some(tag) = styles.tag_for_style(style) {
                        cells.insert((cell_row, cell_col), tag.clone());
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(cells)
}

/// `"D12"` → zero-based `(11, 3)`.
pub fn parse_cell_ref(reference: &str) -> Option<(u32, u32)> {
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let col = letters
        .chars()
        .try_fold(0u32, |acc, c| {
            acc.checked_mul(26)?
                .checked_add(c.to_ascii_uppercase() as u32 - 'A' as u32 + 1)
        })?;
    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row - 1, col - 1))
}
