use anyhow::Context;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tracing::{error, info};

use crate::models::week_grid::GridSnapshot;
use crate::models::work_package::WorkPackageRecord;

// A4 landscape, in points.
const PAGE_WIDTH: i64 = 842;
const PAGE_HEIGHT: i64 = 595;
const MARGIN: i64 = 40;
const FONT_SIZE: i64 = 9;
const TITLE_SIZE: i64 = 12;
const LEADING: i64 = 14;

// Fixed-width columns; Courier keeps them aligned.
const CODE_WIDTH: usize = 16;
const NAME_WIDTH: usize = 24;
const AREA_WIDTH: usize = 6;
const AREA_NAME_WIDTH: usize = 26;
const SUM_WIDTH: usize = 8;
const DAY_WIDTH: usize = 8;

// Baseline of the first row under the title and header lines.
const FIRST_ROW_Y: i64 = PAGE_HEIGHT - MARGIN - TITLE_SIZE - 3 * LEADING;
const ROWS_PER_PAGE: usize = ((FIRST_ROW_Y - MARGIN) / LEADING + 1) as usize;

/// Renders one grid as a printable timesheet. Rows continue onto further
/// pages as needed, each page repeating the title and header row; the totals
/// line follows the last row.
pub fn render_timesheet_pdf(snapshot: &GridSnapshot, title: &str) -> anyhow::Result<Vec<u8>> {
    let mut body: Vec<String> = snapshot
        .rows
        .iter()
        .map(|row| row_line(row, snapshot))
        .collect();
    body.push(totals_line(snapshot));
    let chunks: Vec<&[String]> = body.chunks(ROWS_PER_PAGE).collect();

    info!(
        "Rendering timesheet PDF '{}' with {} rows on {} page(s)",
        title,
        snapshot.rows.len(),
        chunks.len()
    );

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let header = header_line(snapshot);
    let page_count = chunks.len();
    let mut kids: Vec<Object> = Vec::with_capacity(page_count);

    for (page_idx, lines) in chunks.iter().enumerate() {
        let mut heading = format!(
            "{} for the week of : {} - {}",
            title,
            snapshot.week_start.format("%m/%d/%Y"),
            snapshot.week_end.format("%m/%d/%Y")
        );
        if page_count > 1 {
            heading.push_str(&format!("  (page {} of {})", page_idx + 1, page_count));
        }

        let content = Content {
            operations: page_operations(&heading, &header, lines),
        };
        let encoded = content
            .encode()
            .context("Failed to encode timesheet page content")?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut output_buffer: Vec<u8> = Vec::new();
    match doc.save_to(&mut output_buffer) {
        Ok(_) => {
            info!(
                "Successfully rendered timesheet PDF, size: {} bytes",
                output_buffer.len()
            );
            Ok(output_buffer)
        }
        Err(e) => {
            error!("Failed to write timesheet PDF: {}", e);
            Err(anyhow::anyhow!("Failed to write timesheet PDF: {}", e))
        }
    }
}

fn page_operations(heading: &str, header: &str, lines: &[String]) -> Vec<Operation> {
    let mut ops = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), Object::Integer(TITLE_SIZE)]),
        Operation::new("TL", vec![Object::Integer(LEADING)]),
        Operation::new(
            "Td",
            vec![
                Object::Integer(MARGIN),
                Object::Integer(PAGE_HEIGHT - MARGIN - TITLE_SIZE),
            ],
        ),
    ];
    push_line(&mut ops, heading);
    ops.push(Operation::new("T*", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec!["F1".into(), Object::Integer(FONT_SIZE)],
    ));

    push_line(&mut ops, header);
    for line in lines {
        push_line(&mut ops, line);
    }

    ops.push(Operation::new("ET", vec![]));
    ops
}

fn header_line(snapshot: &GridSnapshot) -> String {
    let day_headers: Vec<String> = snapshot
        .columns
        .iter()
        .map(|column| format!("{} {}", column.day, column.label))
        .collect();
    table_line(
        ["Work Package", "Work Package Name", "Tax", "Tax Area Name", "Sum"],
        day_headers.iter().map(String::as_str),
    )
}

fn totals_line(snapshot: &GridSnapshot) -> String {
    let totals: Vec<&str> = snapshot
        .columns
        .iter()
        .map(|column| {
            snapshot
                .column_totals
                .get(&column.key)
                .map(String::as_str)
                .unwrap_or("")
        })
        .collect();
    table_line(["Total", "", "", "", snapshot.grid_total.as_str()], totals)
}

fn row_line(row: &WorkPackageRecord, snapshot: &GridSnapshot) -> String {
    let hours = snapshot
        .columns
        .iter()
        .map(|column| row.hour(column.key).unwrap_or(""));
    table_line(
        [
            row.code(),
            row.name(),
            row.tax_area(),
            row.tax_area_name(),
            row.sum(),
        ],
        hours,
    )
}

fn table_line<'a, I>(fields: [&str; 5], days: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut line = format!(
        "{:<code$} {:<name$} {:<area$} {:<area_name$} {:>sum$}",
        fit(fields[0], CODE_WIDTH),
        fit(fields[1], NAME_WIDTH),
        fit(fields[2], AREA_WIDTH),
        fit(fields[3], AREA_NAME_WIDTH),
        fit(fields[4], SUM_WIDTH),
        code = CODE_WIDTH,
        name = NAME_WIDTH,
        area = AREA_WIDTH,
        area_name = AREA_NAME_WIDTH,
        sum = SUM_WIDTH,
    );
    for day in days {
        line.push_str(&format!(" {:>width$}", fit(day, DAY_WIDTH), width = DAY_WIDTH));
    }
    line
}

fn push_line(ops: &mut Vec<Operation>, text: &str) {
    ops.push(Operation::new(
        "Tj",
        vec![Object::string_literal(pdf_text(text))],
    ));
    ops.push(Operation::new("T*", vec![]));
}

fn fit(value: &str, width: usize) -> String {
    value.chars().take(width).collect()
}

/// Base-14 fonts only cover single-byte text; keep ASCII and fold dashes.
fn pdf_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' => '-',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '?',
        })
        .collect()
}
