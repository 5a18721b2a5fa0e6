use std::fmt;

use crate::ListingFormat;

pub(crate) struct Row {
    cells: Vec<String>,
}

impl Row {
    fn is_awk_safe(&self) -> bool {
        self.cells
            .iter()
            .all(|cell| !cell.contains(char::is_whitespace))
    }

    fn columns(&self) -> usize {
        self.cells.len()
    }
}

pub(crate) trait IntoRow: Into<Row> + Sized {
    fn into_row(self) -> Row {
        self.into()
    }
}

impl<T> IntoRow for T where T: Into<Row> + Sized {}

impl From<Vec<String>> for Row {
    fn from(value: Vec<String>) -> Self {
        Row { cells: value }
    }
}

impl From<Vec<&str>> for Row {
    fn from(value: Vec<&str>) -> Self {
        Row {
            cells: value.into_iter().map(str::to_owned).collect(),
        }
    }
}

pub(crate) struct Table {
    body: Vec<Row>,
    header: Option<Row>,
    num_columns: Option<usize>,
    print_header: bool,
}

impl Table {
    pub(crate) fn new() -> Table {
        Table {
            body: Vec::new(),
            header: None,
            num_columns: None,
            print_header: true,
        }
    }

    fn expect_num_columns(&mut self, num_columns: usize) {
        match self.num_columns {
            None => self.num_columns = Some(num_columns),
            Some(expected) if expected == num_columns => {}
            Some(expected) => panic!(
                "Table has {} columns but a row with {} columns was inserted",
                expected, num_columns
            ),
        }
    }

    pub(crate) fn print_header(&mut self, print_header: bool) {
        self.print_header = print_header;
    }

    pub(crate) fn add_row<S: IntoRow>(&mut self, row: S) {
        let row = row.into_row();

        self.expect_num_columns(row.columns());

        self.body.push(row);
    }

    pub(crate) fn set_header<S: IntoRow>(&mut self, header: S) {
        let header = header.into_row();

        self.expect_num_columns(header.columns());

        if !header.is_awk_safe() {
            panic!("table header cells must not contain whitespace")
        }

        self.header = Some(header);
    }

    fn iter_rows(&self) -> impl Iterator<Item = &Row> {
        self.header.iter().chain(self.body.iter())
    }

    // `{:<width$}` pads by char count, so widths are measured in chars.
    // Double-width terminal glyphs count as one.
    fn column_widths(&self) -> Vec<usize> {
        let mut widths = vec![0usize; self.num_columns.unwrap_or(0)];

        for row in self.iter_rows() {
            for (i, cell) in row.cells.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        widths
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.column_widths();

        let mut print_row = |row: &Row| -> fmt::Result {
            for (i, cell) in row.cells.iter().enumerate() {
                if i > 0 {
                    write!(f, "  ")?;
                }

                write!(f, "{:<width$}", cell, width = widths[i])?;
            }

            writeln!(f)
        };

        if self.print_header {
            for row in self.iter_rows() {
                print_row(row)?;
            }
        } else {
            for row in &self.body {
                print_row(row)?;
            }
        }

        Ok(())
    }
}

pub(crate) trait IntoTable: Into<Table> + Sized {
    fn into_table(self) -> Table {
        self.into()
    }
}

impl<T> IntoTable for T where T: Into<Table> + Sized {}

pub(crate) fn format_output<O: IntoTable + serde::Serialize>(object: O, format: ListingFormat) {
    match format {
        ListingFormat::Json => {
            let output = serde_json::to_string_pretty(&object).expect("failed to seralize object");

            println!("{}", output);
        }
        ListingFormat::Table => {
            let tab = object.into_table();

            print!("{}", tab);
        }
        ListingFormat::HeaderlessTable => {
            let mut tab = object.into_table();

            tab.print_header(false);

            print!("{}", tab);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align_by_char_count() {
        let mut tab = Table::new();

        tab.set_header(vec!["SERVICE", "FIT"]);
        tab.add_row(vec!["業務効率化", "70"]);
        tab.add_row(vec!["DX", "50"]);

        let rendered = tab.to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0].trim_end(), "SERVICE  FIT");
        assert_eq!(lines[1].trim_end(), "業務効率化    70");
        assert_eq!(lines[2].trim_end(), "DX       50");
    }

    #[test]
    fn headerless_tables_omit_the_header_row() {
        let mut tab = Table::new();

        tab.set_header(vec!["MODEL", "NAME"]);
        tab.add_row(vec!["gemini-2.0-flash", "unknown"]);
        tab.print_header(false);

        let rendered = tab.to_string();

        assert!(!rendered.contains("MODEL"));
        assert!(rendered.starts_with("gemini-2.0-flash"));
    }

    #[test]
    #[should_panic]
    fn whitespace_headers_are_rejected() {
        let mut tab = Table::new();

        tab.set_header(vec!["FIT SCORE"]);
    }
}
