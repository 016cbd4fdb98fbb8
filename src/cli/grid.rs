//! Renders a projected table as a bordered, fixed-width text grid.
//!
//! ```text
//! +--------+-------+-----+
//! | _rowId | Name  | Age |
//! +--------+-------+-----+
//! | 1      | Alice | 30  |
//! +--------+-------+-----+
//! ```
//!
//! Widths are terminal columns, so wide characters such as CJK take two.

use unicode_width::UnicodeWidthStr;

use crate::persistence::{Column, ROW_ID_FIELD, Record, Value};

const NULL_TEXT: &str = "NULL";

pub fn render(columns: &[Column], records: &[Record]) -> String {
    let mut headers = vec![ROW_ID_FIELD.to_string()];
    headers.extend(columns.iter().map(|column| column.name.clone()));

    let body: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            headers
                .iter()
                .map(|field| cell_text(record.get(field).unwrap_or(&Value::Null)))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            body.iter()
                .map(|line| line[index].width())
                .chain(std::iter::once(header.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let border = border_line(&widths);
    let mut grid = vec![border.clone(), text_line(&headers, &widths), border.clone()];

    if !body.is_empty() {
        grid.extend(body.iter().map(|line| text_line(line, &widths)));
        grid.push(border);
    }

    grid.join("\n")
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => NULL_TEXT.to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn border_line(widths: &[usize]) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
    format!("+{}+", segments.join("+"))
}

fn text_line(cells: &[String], widths: &[usize]) -> String {
    let segments: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(text, width)| {
            let padding = width.saturating_sub(text.width());
            format!(" {}{} ", text, " ".repeat(padding))
        })
        .collect();
    format!("|{}|", segments.join("|"))
}
