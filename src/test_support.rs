//! Small xlsx writer for tests: enough package parts for both the values
//! reader and the fill reader, with one fill per distinct ARGB tag.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Debug, Clone, PartialEq)]
pub enum FixtureValue {
    Text(String),
    Number(f64),
}

#[derive(Debug, Clone, Default)]
struct FixtureCell {
    value: Option<FixtureValue>,
    fill: Option<String>,
}

/// One worksheet, addressed with zero-based `(row, col)`.
#[derive(Debug, Clone, Default)]
pub struct FixtureSheet {
    name: String,
    cells: BTreeMap<(u32, u32), FixtureCell>,
}

impl FixtureSheet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cells: BTreeMap::new(),
        }
    }

    pub fn text(mut self, row: u32, col: u32, value: &str) -> Self {
        self.cells.entry((row, col)).or_default().value = Some(FixtureValue::Text(value.into()));
        self
    }

    pub fn number(mut self, row: u32, col: u32, value: f64) -> Self {
        self.cells.entry((row, col)).or_default().value = Some(FixtureValue::Number(value));
        self
    }

    pub fn fill(mut self, row: u32, col: u32, argb: &str) -> Self {
        self.cells.entry((row, col)).or_default().fill = Some(argb.to_string());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorkbookFixture {
    sheets: Vec<FixtureSheet>,
    active_tab: usize,
}

impl WorkbookFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(mut self, sheet: FixtureSheet) -> Self {
        self.sheets.push(sheet);
        self
    }

    pub fn active_tab(mut self, tab: usize) -> Self {
        self.active_tab = tab;
        self
    }

    pub fn write(&self, path: &Path) {
        let file = File::create(path).expect("should create fixture workbook");
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let fills = self.distinct_fills();
        let strings = self.shared_strings();

        let mut parts = vec![
            ("[Content_Types].xml".to_string(), self.content_types()),
            ("_rels/.rels".to_string(), ROOT_RELS.to_string()),
            ("xl/workbook.xml".to_string(), self.workbook_xml()),
            ("xl/_rels/workbook.xml.rels".to_string(), self.workbook_rels()),
            ("xl/styles.xml".to_string(), styles_xml(&fills)),
            ("xl/sharedStrings.xml".to_string(), shared_strings_xml(&strings)),
        ];
        for (idx, sheet) in self.sheets.iter().enumerate() {
            parts.push((
                format!("xl/worksheets/sheet{}.xml", idx + 1),
                sheet_xml(sheet, &fills, &strings),
            ));
        }

        for (name, body) in parts {
            zip.start_file(name, options).expect("should start zip entry");
            zip.write_all(body.as_bytes()).expect("should write zip entry");
        }
        zip.finish().expect("should finish fixture workbook");
    }

    fn distinct_fills(&self) -> Vec<String> {
        let mut fills: Vec<String> = Vec::new();
        for cell in self.sheets.iter().flat_map(|s| s.cells.values()) {
            if let Some(fill) = &cell.fill {
                if !fills.contains(fill) {
                    fills.push(fill.clone());
                }
            }
        }
        fills
    }

    fn shared_strings(&self) -> Vec<String> {
        let mut strings: Vec<String> = Vec::new();
        for cell in self.sheets.iter().flat_map(|s| s.cells.values()) {
            if let Some(FixtureValue::Text(text)) = &cell.value {
                if !strings.contains(text) {
                    strings.push(text.clone());
                }
            }
        }
        strings
    }

    fn content_types(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>
"#,
        );
        for idx in 1..=self.sheets.len() {
            xml.push_str(&format!(
                r#"<Override PartName="/xl/worksheets/sheet{idx}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
"#
            ));
        }
        xml.push_str("</Types>");
        xml
    }

    fn workbook_xml(&self) -> String {
        let mut xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<bookViews><workbookView activeTab="{}"/></bookViews>
<sheets>
"#,
            self.active_tab
        );
        for (idx, sheet) in self.sheets.iter().enumerate() {
            xml.push_str(&format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>
"#,
                escape(&sheet.name),
                idx + 1,
                idx + 1
            ));
        }
        xml.push_str("</sheets>\n</workbook>");
        xml
    }

    fn workbook_rels(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
"#,
        );
        let count = self.sheets.len();
        for idx in 1..=count {
            xml.push_str(&format!(
                r#"<Relationship Id="rId{idx}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{idx}.xml"/>
"#
            ));
        }
        xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>
</Relationships>"#,
            count + 1,
            count + 2
        ));
        xml
    }
}

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

/// Fill 0 and 1 are the reserved `none` and `gray125` entries; fixture fill
/// `i` becomes fill `i + 2` and cell style `i + 1`.
fn styles_xml(fills: &[String]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
"#,
    );
    xml.push_str(&format!(
        r#"<fills count="{}">
<fill><patternFill patternType="none"/></fill>
<fill><patternFill patternType="gray125"/></fill>
"#,
        fills.len() + 2
    ));
    for argb in fills {
        xml.push_str(&format!(
            r#"<fill><patternFill patternType="solid"><fgColor rgb="{argb}"/><bgColor indexed="64"/></patternFill></fill>
"#
        ));
    }
    xml.push_str(
        r#"</fills>
<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>
<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
"#,
    );
    xml.push_str(&format!(
        r#"<cellXfs count="{}">
<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
"#,
        fills.len() + 1
    ));
    for idx in 0..fills.len() {
        xml.push_str(&format!(
            r#"<xf numFmtId="0" fontId="0" fillId="{}" borderId="0" xfId="0" applyFill="1"/>
"#,
            idx + 2
        ));
    }
    xml.push_str("</cellXfs>\n</styleSheet>");
    xml
}

fn shared_strings_xml(strings: &[String]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">
"#,
        strings.len()
    );
    for text in strings {
        xml.push_str(&format!("<si><t>{}</t></si>\n", escape(text)));
    }
    xml.push_str("</sst>");
    xml
}

fn sheet_xml(sheet: &FixtureSheet, fills: &[String], strings: &[String]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheetData>
"#,
    );
    let mut current_row: Option<u32> = None;
    for (&(row, col), cell) in &sheet.cells {
        if current_row != Some(row) {
            if current_row.is_some() {
                xml.push_str("</row>\n");
            }
            xml.push_str(&format!(r#"<row r="{}">"#, row + 1));
            current_row = Some(row);
        }

        let reference = format!("{}{}", column_letters(col), row + 1);
        let style = cell
            .fill
            .as_ref()
            .and_then(|fill| fills.iter().position(|f| f == fill))
            .map(|idx| format!(r#" s="{}""#, idx + 1))
            .unwrap_or_default();
        match &cell.value {
            Some(FixtureValue::Text(text)) => {
                let idx = strings.iter().position(|s| s == text).unwrap_or(0);
                xml.push_str(&format!(r#"<c r="{reference}"{style} t="s"><v>{idx}</v></c>"#));
            }
            Some(FixtureValue::Number(value)) => {
                xml.push_str(&format!(r#"<c r="{reference}"{style}><v>{value}</v></c>"#));
            }
            None => xml.push_str(&format!(r#"<c r="{reference}"{style}/>"#)),
        }
    }
    if current_row.is_some() {
        xml.push_str("</row>\n");
    }
    xml.push_str("</sheetData>\n</worksheet>");
    xml
}

fn column_letters(col: u32) -> String {
    let mut n = col + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Header labels of the 14-column fulfillment report.
pub const REPORT_HEADERS: [&str; 14] = [
    "Status",
    "Customer",
    "Customer PO ID",
    "Sales Order",
    "Line Status",
    "Ship Date",
    "Item ID",
    "Description",
    "Warehouse",
    "Unit",
    "Price",
    "On Hand",
    "Allocated",
    "Required Qty",
];

pub const GREEN: &str = "FF92D050";
pub const RED: &str = "FFFFC7CE";
pub const BLUE: &str = "FF00B0F0";
pub const WHITE: &str = "FFFFFFFF";

/// One data row of a fulfillment report and its marker fills.
#[derive(Debug, Clone)]
pub struct ReportLine {
    pub order: FixtureValue,
    pub item: String,
    pub qty: f64,
    pub select: Option<&'static str>,
    pub skip: Option<&'static str>,
    pub stop: Option<&'static str>,
}

impl ReportLine {
    pub fn new(order: &str, item: &str, qty: f64) -> Self {
        Self {
            order: FixtureValue::Text(order.to_string()),
            item: item.to_string(),
            qty,
            select: None,
            skip: None,
            stop: None,
        }
    }

    /// A line whose sales order is stored as a number cell.
    pub fn numbered(order: f64, item: &str, qty: f64) -> Self {
        Self {
            order: FixtureValue::Number(order),
            ..Self::new("", item, qty)
        }
    }

    pub fn select(mut self, argb: &'static str) -> Self {
        self.select = Some(argb);
        self
    }

    pub fn skip(mut self, argb: &'static str) -> Self {
        self.skip = Some(argb);
        self
    }

    pub fn stop(mut self, argb: &'static str) -> Self {
        self.stop = Some(argb);
        self
    }
}

/// Header on row 1, one data row per line from row 2.
pub fn report_sheet(name: &str, lines: &[ReportLine]) -> FixtureSheet {
    let mut sheet = FixtureSheet::new(name);
    for (col, label) in REPORT_HEADERS.iter().enumerate() {
        sheet = sheet.text(0, col as u32, label);
    }
    for (idx, line) in lines.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet = sheet
            .text(row, 0, "Open")
            .text(row, 1, "ACME")
            .text(row, 4, "Released")
            .text(row, 6, &line.item)
            .number(row, 13, line.qty);
        sheet = match &line.order {
            FixtureValue::Text(order) => sheet.text(row, 3, order),
            FixtureValue::Number(order) => sheet.number(row, 3, *order),
        };
        if let Some(argb) = line.select {
            sheet = sheet.fill(row, 3, argb);
        }
        if let Some(argb) = line.skip {
            sheet = sheet.fill(row, 4, argb);
        }
        if let Some(argb) = line.stop {
            sheet = sheet.fill(row, 0, argb);
        }
    }
    sheet
}

pub fn write_report(dir: &Path, file_name: &str, lines: &[ReportLine]) -> PathBuf {
    let path = dir.join(file_name);
    WorkbookFixture::new()
        .sheet(report_sheet("Report", lines))
        .write(&path);
    path
}

#[test]
fn column_letters_cover_double_letters() {
    assert_eq!(column_letters(0), "A");
    assert_eq!(column_letters(13), "N");
    assert_eq!(column_letters(26), "AA");
}
