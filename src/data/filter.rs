use super::model::{parse_date, Column, Key, MergedTable};

// ---------------------------------------------------------------------------
// Mask – one boolean per row
// ---------------------------------------------------------------------------

/// Boolean row mask over a [`MergedTable`].  Masks built from predicates on
/// the same table can be combined with [`Mask::and`], [`Mask::or`] and
/// [`Mask::not`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask(Vec<bool>);

impl Mask {
    /// Every row selected.
    pub fn all(len: usize) -> Self {
        Mask(vec![true; len])
    }

    pub fn from_fn(len: usize, f: impl FnMut(usize) -> bool) -> Self {
        Mask((0..len).map(f).collect())
    }

    pub fn and(&self, other: &Mask) -> Mask {
        debug_assert_eq!(self.len(), other.len(), "masks over different tables");
        Mask(self.0.iter().zip(&other.0).map(|(a, b)| *a && *b).collect())
    }

    pub fn or(&self, other: &Mask) -> Mask {
        debug_assert_eq!(self.len(), other.len(), "masks over different tables");
        Mask(self.0.iter().zip(&other.0).map(|(a, b)| *a || *b).collect())
    }

    pub fn not(&self) -> Mask {
        Mask(self.0.iter().map(|v| !v).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of selected rows.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|v| **v).count()
    }

    /// Indices of selected rows, ascending.
    pub fn indices(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, v)| **v)
            .map(|(i, _)| i)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Predicates.  A column absent from the table selects nothing.
// ---------------------------------------------------------------------------

/// Rows whose cell equals `value` exactly.
pub fn equals(table: &MergedTable, column: &str, value: &str) -> Mask {
    cell_mask(table, column, |cell| cell == value)
}

/// Rows whose cell contains any of `needles`, ignoring case.  Missing cells
/// never match.
pub fn contains_any(table: &MergedTable, column: &str, needles: &[&str]) -> Mask {
    let needles: Vec<String> = needles.iter().map(|n| n.to_lowercase()).collect();
    cell_mask(table, column, |cell| {
        let cell = cell.to_lowercase();
        needles.iter().any(|n| cell.contains(n.as_str()))
    })
}

/// Rows whose cell parses as a date in `year`.
pub fn year_equals(table: &MergedTable, column: &str, year: i32) -> Mask {
    use chrono::Datelike;
    cell_mask(table, column, |cell| {
        parse_date(cell).is_some_and(|d| d.year() == year)
    })
}

/// Rows with a non-empty cell.
pub fn not_null(table: &MergedTable, column: &str) -> Mask {
    cell_mask(table, column, |_| true)
}

fn cell_mask(table: &MergedTable, column: &str, mut pred: impl FnMut(&str) -> bool) -> Mask {
    match table.column(column) {
        Some(col) => Mask::from_fn(table.len(), |row| col.get(row).is_some_and(&mut pred)),
        None => Mask(vec![false; table.len()]),
    }
}

// ---------------------------------------------------------------------------
// TableView – a row/column subset of a merged table
// ---------------------------------------------------------------------------

/// Borrowed subset of a [`MergedTable`]: selected rows, optionally a subset of
/// columns.  Columns are held by position, so same-named columns from
/// different fragments stay distinct.
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    table: &'a MergedTable,
    rows: Vec<usize>,
    columns: Option<Vec<usize>>,
}

impl<'a> TableView<'a> {
    /// All rows and columns.
    pub fn new(table: &'a MergedTable) -> Self {
        TableView {
            table,
            rows: (0..table.len()).collect(),
            columns: None,
        }
    }

    /// Rows selected by `mask`.
    pub fn filtered(table: &'a MergedTable, mask: &Mask) -> Self {
        TableView {
            table,
            rows: mask.indices(),
            columns: None,
        }
    }

    /// Explicit rows, in the given order.  Rows past the end of the table are
    /// dropped.
    pub fn from_rows(table: &'a MergedTable, mut rows: Vec<usize>) -> Self {
        rows.retain(|&r| r < table.len());
        TableView {
            table,
            rows,
            columns: None,
        }
    }

    pub fn table(&self) -> &'a MergedTable {
        self.table
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn keys(&self) -> Vec<&'a Key> {
        let keys = self.table.keys();
        self.rows.iter().filter_map(|&r| keys.get(r)).collect()
    }

    /// Restrict to the named columns, in the given order.  A name resolves to
    /// its first column; names absent from the table are skipped.
    pub fn select(mut self, columns: &[&str]) -> Self {
        let all = self.table.columns();
        self.columns = Some(
            columns
                .iter()
                .filter_map(|name| all.iter().position(|c| c.name == *name))
                .collect(),
        );
        self
    }

    /// Keep the first `n` rows.
    pub fn head(mut self, n: usize) -> Self {
        self.rows.truncate(n);
        self
    }

    /// Visible columns, in display order.
    pub fn columns(&self) -> Vec<&'a Column> {
        let all = self.table.columns();
        match &self.columns {
            Some(positions) => positions.iter().filter_map(|&i| all.get(i)).collect(),
            None => all.iter().collect(),
        }
    }

    /// Visible column names.  Repeats when fragments share a name.
    pub fn column_names(&self) -> Vec<&'a str> {
        self.columns().into_iter().map(|c| c.name.as_str()).collect()
    }

    /// Cells of `column` for the visible rows.
    pub fn values(&self, column: &'a Column) -> Vec<Option<&'a str>> {
        self.rows.iter().map(|&r| column.get(r)).collect()
    }

    /// Cells of the first column called `column` for the visible rows.
    pub fn column_values(&self, column: &str) -> Vec<Option<&'a str>> {
        match self.table.column(column) {
            Some(col) => self.values(col),
            None => vec![None; self.rows.len()],
        }
    }

    /// Non-missing cells of one column, as owned strings.
    pub fn to_list(&self, column: &str) -> Vec<String> {
        self.column_values(column)
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect()
    }
}
