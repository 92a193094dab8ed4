//! Minimal `.xlsx` writer for spreadsheet fixtures.
//!
//! Produces the smallest package calamine accepts: a workbook part, its relationships and
//! one worksheet per sheet. Text is stored inline so no shared-string table is needed.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use zip::CompressionMethod;
use zip::write::{FileOptions, ZipWriter};

const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const RELATIONSHIP_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PACKAGE_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Value written to a worksheet cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum XlsxCell<'a> {
    /// Inline string.
    Text(&'a str),
    /// Numeric cell; spreadsheet readers report these as floats.
    Number(f64),
}

/// One worksheet: its tab name and the cells to fill, addressed like `B3`.
#[derive(Debug, Clone, Copy)]
pub struct XlsxSheet<'a> {
    /// Tab name shown in the workbook.
    pub name: &'a str,
    /// Cells keyed by A1-style reference.
    pub cells: &'a [(&'a str, XlsxCell<'a>)],
}

/// Write an `.xlsx` workbook containing `sheets` in order.
///
/// # Errors
///
/// Returns an error if a cell reference has no row number or the file cannot be written.
pub fn write_xlsx(path: &Path, sheets: &[XlsxSheet<'_>]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Stored);

    let mut parts = vec![
        ("[Content_Types].xml".to_string(), content_types(sheets.len())),
        ("_rels/.rels".to_string(), root_relationships()),
        ("xl/workbook.xml".to_string(), workbook(sheets)),
        (
            "xl/_rels/workbook.xml.rels".to_string(),
            workbook_relationships(sheets.len()),
        ),
    ];
    for (index, sheet) in sheets.iter().enumerate() {
        parts.push((
            format!("xl/worksheets/sheet{}.xml", index + 1),
            worksheet(sheet.cells)?,
        ));
    }

    for (name, body) in parts {
        zip.start_file(name, options)?;
        zip.write_all(body.as_bytes())?;
    }
    zip.finish()?;
    Ok(())
}

fn content_types(sheet_count: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
    );
    for number in 1..=sheet_count {
        let _ = write!(
            xml,
            r#"<Override PartName="/xl/worksheets/sheet{number}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        );
    }
    xml.push_str("</Types>");
    xml
}

fn root_relationships() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{PACKAGE_REL_NS}"><Relationship Id="rId1" Type="{RELATIONSHIP_NS}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
    )
}

fn workbook(sheets: &[XlsxSheet<'_>]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="{SPREADSHEET_NS}" xmlns:r="{RELATIONSHIP_NS}"><sheets>"#
    );
    for (index, sheet) in sheets.iter().enumerate() {
        let number = index + 1;
        let _ = write!(
            xml,
            r#"<sheet name="{}" sheetId="{number}" r:id="rId{number}"/>"#,
            escape(sheet.name)
        );
    }
    xml.push_str("</sheets></workbook>");
    xml
}

fn workbook_relationships(sheet_count: usize) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{PACKAGE_REL_NS}">"#
    );
    for number in 1..=sheet_count {
        let _ = write!(
            xml,
            r#"<Relationship Id="rId{number}" Type="{RELATIONSHIP_NS}/worksheet" Target="worksheets/sheet{number}.xml"/>"#
        );
    }
    xml.push_str("</Relationships>");
    xml
}

fn worksheet(cells: &[(&str, XlsxCell<'_>)]) -> Result<String> {
    let mut rows: BTreeMap<u32, String> = BTreeMap::new();
    for (reference, value) in cells {
        let row = row_number(reference)?;
        let xml = rows.entry(row).or_default();
        match value {
            XlsxCell::Text(text) => {
                let _ = write!(
                    xml,
                    r#"<c r="{reference}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    escape(text)
                );
            }
            XlsxCell::Number(number) => {
                let _ = write!(xml, r#"<c r="{reference}"><v>{number}</v></c>"#);
            }
        }
    }

    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="{SPREADSHEET_NS}"><sheetData>"#
    );
    for (row, cells) in rows {
        let _ = write!(xml, r#"<row r="{row}">{cells}</row>"#);
    }
    xml.push_str("</sheetData></worksheet>");
    Ok(xml)
}

fn row_number(reference: &str) -> Result<u32> {
    let digits = reference.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    digits
        .parse()
        .map_err(|_| anyhow!("cell reference {reference:?} has no row number"))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
