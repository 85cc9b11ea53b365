//! Grid table rendering for terminal output.

use std::fmt;

/// A header row plus body rows, rendered with `+---+` borders and a `+===+`
/// rule under the header.
#[derive(Debug, Clone, Default)]
pub struct GridTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl GridTable {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_rows(mut self, rows: Vec<Vec<String>>) -> Self {
        self.rows.extend(rows);
        self
    }

    fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths = vec![0; self.column_count()];
        for row in std::iter::once(&self.headers).chain(&self.rows) {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
        widths
    }
}

fn write_rule(f: &mut fmt::Formatter<'_>, widths: &[usize], fill: char) -> fmt::Result {
    write!(f, "+")?;
    for width in widths {
        write!(f, "{}+", fill.to_string().repeat(width + 2))?;
    }
    writeln!(f)
}

fn write_row(f: &mut fmt::Formatter<'_>, widths: &[usize], row: &[String]) -> fmt::Result {
    write!(f, "|")?;
    for (i, width) in widths.iter().enumerate() {
        let cell = row.get(i).map(String::as_str).unwrap_or("");
        let pad = width - cell.chars().count();
        write!(f, " {}{} |", cell, " ".repeat(pad))?;
    }
    writeln!(f)
}

impl fmt::Display for GridTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();

        write_rule(f, &widths, '-')?;
        write_row(f, &widths, &self.headers)?;
        write_rule(f, &widths, '=')?;
        for row in &self.rows {
            write_row(f, &widths, row)?;
            write_rule(f, &widths, '-')?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_layout() {
        let table = GridTable::new(["Index", "Format"]).with_rows(vec![
            vec!["1".to_string(), "22".to_string()],
            vec!["2".to_string(), "bestaudio".to_string()],
        ]);

        let expected = "\
+-------+-----------+
| Index | Format    |
+=======+===========+
| 1     | 22        |
+-------+-----------+
| 2     | bestaudio |
+-------+-----------+
";
        assert_eq!(table.to_string(), expected);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = GridTable::new(["a", "b"]).with_rows(vec![vec!["x".to_string()]]);

        let rendered = table.to_string();
        assert!(rendered.contains("| x |   |"));
    }

    #[test]
    fn test_header_only() {
        let table = GridTable::new(["Source"]);
        assert_eq!(table.to_string(), "+--------+\n| Source |\n+========+\n");
    }
}
