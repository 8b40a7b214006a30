//! Minimal single-sheet xlsx reader/writer.
//!
//! Writing produces a workbook with one worksheet, inline-string text cells and
//! plain numeric cells. Reading accepts what common spreadsheet tools emit for
//! the first worksheet: shared strings, inline strings, formula string results
//! and numbers, with or without explicit cell references.

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Seek, Write};

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::SheetError;

const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs></styleSheet>"#;

const DEFAULT_SHEET_PATH: &str = "xl/worksheets/sheet1.xml";

/// Columns per worksheet (`A` through `XFD`).
pub const MAX_COLUMNS: usize = 16_384;

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }
}

/// A populated worksheet row, keyed by its 1-based row number.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub number: u32,
    pub cells: Vec<CellValue>,
}

impl SheetRow {
    pub fn cell(&self, index: usize) -> &CellValue {
        self.cells.get(index).unwrap_or(&CellValue::Empty)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(CellValue::is_empty)
    }
}

/// A worksheet to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    /// Column widths in characters, first column first.
    pub widths: Vec<f64>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            widths: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn with_widths(mut self, widths: Vec<f64>) -> Self {
        self.widths = widths;
        self
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }
}

/// Serialize `sheet` as a complete xlsx workbook.
pub fn write_workbook(sheet: &Sheet) -> Result<Vec<u8>, SheetError> {
    let workbook_xml = workbook_xml(&sheet.name)?;
    let sheet_xml = worksheet_xml(sheet)?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, &[u8]); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.as_bytes()),
        ("_rels/.rels", ROOT_RELS_XML.as_bytes()),
        ("xl/workbook.xml", &workbook_xml),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS_XML.as_bytes()),
        ("xl/styles.xml", STYLES_XML.as_bytes()),
        (DEFAULT_SHEET_PATH, &sheet_xml),
    ];

    for (name, data) in parts {
        zip.start_file(name, options).map_err(SheetError::archive)?;
        zip.write_all(data).map_err(SheetError::archive)?;
    }

    let cursor = zip.finish().map_err(SheetError::archive)?;
    Ok(cursor.into_inner())
}

/// Read every populated row of the first worksheet, in row order.
pub fn read_first_sheet(bytes: &[u8]) -> Result<Vec<SheetRow>, SheetError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(SheetError::archive)?;

    let sheet_path = first_sheet_path(&mut archive)?;
    let shared = match read_entry(&mut archive, "xl/sharedStrings.xml")? {
        Some(xml) => parse_shared_strings(&xml)?,
        None => Vec::new(),
    };

    let sheet_xml = read_entry(&mut archive, &sheet_path)?.ok_or_else(|| SheetError::Format {
        message: format!("workbook has no worksheet at {sheet_path}"),
    })?;

    parse_worksheet(&sheet_xml, &shared)
}

fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, SheetError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(err) => return Err(SheetError::archive(err)),
    };
    let mut xml = String::new();
    file.read_to_string(&mut xml).map_err(SheetError::archive)?;
    Ok(Some(xml))
}

/// Resolve the first `<sheet>` of the workbook to its part path.
///
/// Falls back to `xl/worksheets/sheet1.xml` when the workbook or its
/// relationships do not say otherwise.
fn first_sheet_path<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<String, SheetError> {
    let Some(workbook) = read_entry(archive, "xl/workbook.xml")? else {
        return Ok(DEFAULT_SHEET_PATH.to_string());
    };
    let Some(rel_id) = first_sheet_rel_id(&workbook)? else {
        return Ok(DEFAULT_SHEET_PATH.to_string());
    };
    let Some(rels) = read_entry(archive, "xl/_rels/workbook.xml.rels")? else {
        return Ok(DEFAULT_SHEET_PATH.to_string());
    };

    Ok(relationship_target(&rels, &rel_id)?
        .map(|target| match target.strip_prefix('/') {
            Some(absolute) => absolute.to_string(),
            None => format!("xl/{target}"),
        })
        .unwrap_or_else(|| DEFAULT_SHEET_PATH.to_string()))
}

fn first_sheet_rel_id(workbook_xml: &str) -> Result<Option<String>, SheetError> {
    let mut reader = Reader::from_str(workbook_xml);
    loop {
        match reader.read_event().map_err(SheetError::xml)? {
            Event::Start(ref e) | Event::Empty(ref e) if e.local_name().as_ref() == b"sheet" => {
                return attribute(e, b"id");
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

fn relationship_target(rels_xml: &str, rel_id: &str) -> Result<Option<String>, SheetError> {
    let mut reader = Reader::from_str(rels_xml);
    loop {
        match reader.read_event().map_err(SheetError::xml)? {
            Event::Start(ref e) | Event::Empty(ref e)
                if e.local_name().as_ref() == b"Relationship" =>
            {
                if attribute(e, b"Id")?.as_deref() == Some(rel_id) {
                    return attribute(e, b"Target");
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Value of the attribute whose local name is `name`, unescaped.
fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, SheetError> {
    for attr in e.attributes() {
        let attr = attr.map_err(SheetError::xml)?;
        if attr.key.local_name().as_ref() == name {
            let value = attr.unescape_value().map_err(SheetError::xml)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Shared string table, one entry per `<si>`. Rich-text runs are concatenated;
/// phonetic hints (`<rPh>`) are skipped.
fn parse_shared_strings(xml: &str) -> Result<Vec<String>, SheetError> {
    let mut reader = Reader::from_str(xml);
    let mut strings = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;
    let mut in_phonetic = false;

    loop {
        match reader.read_event().map_err(SheetError::xml)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"si" => current = Some(String::new()),
                b"rPh" => in_phonetic = true,
                b"t" => in_text = !in_phonetic,
                _ => {}
            },
            Event::Empty(ref e) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
            Event::Text(ref t) if in_text => {
                if let Some(s) = current.as_mut() {
                    s.push_str(&t.unescape().map_err(SheetError::xml)?);
                }
            }
            Event::CData(ref t) if in_text => {
                if let Some(s) = current.as_mut() {
                    s.push_str(&String::from_utf8_lossy(t));
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"si" => strings.push(current.take().unwrap_or_default()),
                b"rPh" => in_phonetic = false,
                b"t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(strings)
}

/// Cell being assembled between `<c>` and `</c>`.
#[derive(Debug, Default)]
struct PendingCell {
    column: usize,
    kind: Option<String>,
    value: String,
    inline: String,
}

fn parse_worksheet(xml: &str, shared: &[String]) -> Result<Vec<SheetRow>, SheetError> {
    let mut reader = Reader::from_str(xml);
    let mut rows: BTreeMap<u32, Vec<CellValue>> = BTreeMap::new();

    let mut row_number = 0u32;
    let mut next_column = 0usize;
    let mut cell: Option<PendingCell> = None;
    let mut in_value = false;
    let mut in_inline_text = false;

    loop {
        match reader.read_event().map_err(SheetError::xml)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"row" => {
                    row_number = row_ref(e, row_number)?;
                    next_column = 0;
                    rows.entry(row_number).or_default();
                }
                b"c" => {
                    let column = column_ref(e, next_column)?;
                    next_column = column + 1;
                    cell = Some(PendingCell {
                        column,
                        kind: attribute(e, b"t")?,
                        ..PendingCell::default()
                    });
                }
                b"v" => in_value = cell.is_some(),
                b"t" => in_inline_text = cell.is_some(),
                _ => {}
            },
            Event::Empty(ref e) => match e.local_name().as_ref() {
                b"row" => {
                    row_number = row_ref(e, row_number)?;
                    next_column = 0;
                }
                b"c" => next_column = column_ref(e, next_column)? + 1,
                _ => {}
            },
            Event::Text(ref t) if in_value || in_inline_text => {
                let text = t.unescape().map_err(SheetError::xml)?;
                if let Some(pending) = cell.as_mut() {
                    if in_value {
                        pending.value.push_str(&text);
                    } else {
                        pending.inline.push_str(&text);
                    }
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"v" => in_value = false,
                b"t" => in_inline_text = false,
                b"c" => {
                    if let Some(pending) = cell.take() {
                        let column = pending.column;
                        let value = resolve_cell(pending, shared)?;
                        let cells = rows.entry(row_number).or_default();
                        if cells.len() <= column {
                            cells.resize(column + 1, CellValue::Empty);
                        }
                        cells[column] = value;
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(rows
        .into_iter()
        .map(|(number, cells)| SheetRow { number, cells })
        .collect())
}

fn resolve_cell(cell: PendingCell, shared: &[String]) -> Result<CellValue, SheetError> {
    let value = match cell.kind.as_deref() {
        Some("s") => {
            let index: usize = cell.value.trim().parse().map_err(|_| SheetError::Format {
                message: format!("invalid shared string index {:?}", cell.value),
            })?;
            let text = shared.get(index).ok_or_else(|| SheetError::Format {
                message: format!("shared string index {index} out of range"),
            })?;
            CellValue::Text(text.clone())
        }
        Some("inlineStr") => CellValue::Text(cell.inline),
        Some("str") | Some("e") | Some("d") => CellValue::Text(cell.value),
        _ if cell.value.is_empty() => CellValue::Empty,
        // Numbers and booleans. Anything unparseable is kept as text so the
        // caller can report which column was bad.
        _ => match cell.value.trim().parse::<f64>() {
            Ok(n) => CellValue::Number(n),
            Err(_) => CellValue::Text(cell.value),
        },
    };
    Ok(value)
}

fn row_ref(e: &BytesStart<'_>, previous: u32) -> Result<u32, SheetError> {
    match attribute(e, b"r")? {
        Some(r) => r.trim().parse().map_err(|_| SheetError::Format {
            message: format!("invalid row reference {r:?}"),
        }),
        None => Ok(previous + 1),
    }
}

fn column_ref(e: &BytesStart<'_>, fallback: usize) -> Result<usize, SheetError> {
    let (column, reference) = match attribute(e, b"r")? {
        Some(r) => match column_index(&r) {
            Some(column) => (column, r),
            None => {
                return Err(SheetError::Format {
                    message: format!("invalid cell reference {r:?}"),
                });
            }
        },
        None => (fallback, column_letters(fallback)),
    };

    if column >= MAX_COLUMNS {
        return Err(SheetError::Format {
            message: format!("cell reference {reference:?} is beyond column XFD"),
        });
    }
    Ok(column)
}

/// Zero-based column index of an `A1`-style reference (`"C7"` → 2).
pub fn column_index(reference: &str) -> Option<usize> {
    let letters: Vec<u8> = reference
        .bytes()
        .take_while(u8::is_ascii_alphabetic)
        .map(|b| b.to_ascii_uppercase())
        .collect();
    if letters.is_empty() {
        return None;
    }
    let number = letters
        .iter()
        .try_fold(0usize, |acc, b| acc.checked_mul(26)?.checked_add(usize::from(b - b'A') + 1))?;
    Some(number - 1)
}

/// Column letters for a zero-based index (`0` → `"A"`, `26` → `"AA"`).
pub fn column_letters(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

fn workbook_xml(sheet_name: &str) -> Result<Vec<u8>, SheetError> {
    let mut writer = Writer::new(Vec::new());
    write_decl(&mut writer)?;

    let mut root = BytesStart::new("workbook");
    root.push_attribute(("xmlns", NS_MAIN));
    root.push_attribute(("xmlns:r", NS_REL));
    write(&mut writer, Event::Start(root))?;
    write(&mut writer, Event::Start(BytesStart::new("sheets")))?;

    let mut sheet = BytesStart::new("sheet");
    sheet.push_attribute(("name", sheet_name));
    sheet.push_attribute(("sheetId", "1"));
    sheet.push_attribute(("r:id", "rId1"));
    write(&mut writer, Event::Empty(sheet))?;

    write(&mut writer, Event::End(BytesEnd::new("sheets")))?;
    write(&mut writer, Event::End(BytesEnd::new("workbook")))?;
    Ok(writer.into_inner())
}

fn worksheet_xml(sheet: &Sheet) -> Result<Vec<u8>, SheetError> {
    let mut writer = Writer::new(Vec::new());
    write_decl(&mut writer)?;

    let mut root = BytesStart::new("worksheet");
    root.push_attribute(("xmlns", NS_MAIN));
    root.push_attribute(("xmlns:r", NS_REL));
    write(&mut writer, Event::Start(root))?;

    if !sheet.widths.is_empty() {
        write(&mut writer, Event::Start(BytesStart::new("cols")))?;
        for (i, width) in sheet.widths.iter().enumerate() {
            let index = (i + 1).to_string();
            let width = width.to_string();
            let mut col = BytesStart::new("col");
            col.push_attribute(("min", index.as_str()));
            col.push_attribute(("max", index.as_str()));
            col.push_attribute(("width", width.as_str()));
            col.push_attribute(("customWidth", "1"));
            write(&mut writer, Event::Empty(col))?;
        }
        write(&mut writer, Event::End(BytesEnd::new("cols")))?;
    }

    write(&mut writer, Event::Start(BytesStart::new("sheetData")))?;
    for (r, cells) in sheet.rows.iter().enumerate() {
        let row_number = (r + 1).to_string();
        let mut row = BytesStart::new("row");
        row.push_attribute(("r", row_number.as_str()));
        write(&mut writer, Event::Start(row))?;

        for (c, value) in cells.iter().enumerate() {
            let reference = format!("{}{}", column_letters(c), row_number);
            write_cell(&mut writer, &reference, value)?;
        }

        write(&mut writer, Event::End(BytesEnd::new("row")))?;
    }
    write(&mut writer, Event::End(BytesEnd::new("sheetData")))?;
    write(&mut writer, Event::End(BytesEnd::new("worksheet")))?;
    Ok(writer.into_inner())
}

fn write_cell(writer: &mut Writer<Vec<u8>>, reference: &str, value: &CellValue) -> Result<(), SheetError> {
    match value {
        CellValue::Empty => Ok(()),
        CellValue::Text(text) => {
            let mut c = BytesStart::new("c");
            c.push_attribute(("r", reference));
            c.push_attribute(("t", "inlineStr"));
            write(writer, Event::Start(c))?;
            write(writer, Event::Start(BytesStart::new("is")))?;

            let mut t = BytesStart::new("t");
            if text.trim() != text {
                t.push_attribute(("xml:space", "preserve"));
            }
            write(writer, Event::Start(t))?;
            write(writer, Event::Text(BytesText::new(text)))?;
            write(writer, Event::End(BytesEnd::new("t")))?;

            write(writer, Event::End(BytesEnd::new("is")))?;
            write(writer, Event::End(BytesEnd::new("c")))
        }
        CellValue::Number(n) => {
            if !n.is_finite() {
                return Err(SheetError::Format {
                    message: format!("cell {reference}: cannot write non-finite number {n}"),
                });
            }
            let mut c = BytesStart::new("c");
            c.push_attribute(("r", reference));
            write(writer, Event::Start(c))?;
            write(writer, Event::Start(BytesStart::new("v")))?;
            write(writer, Event::Text(BytesText::new(&n.to_string())))?;
            write(writer, Event::End(BytesEnd::new("v")))?;
            write(writer, Event::End(BytesEnd::new("c")))
        }
    }
}

fn write_decl(writer: &mut Writer<Vec<u8>>) -> Result<(), SheetError> {
    write(writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), SheetError> {
    writer.write_event(event).map_err(SheetError::xml)
}
