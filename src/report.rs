use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use serde::Serialize;

use crate::data::filter::TableView;
use crate::data::model::file_label;

// ---------------------------------------------------------------------------
// Text rendering of merged tables and index records
// ---------------------------------------------------------------------------

/// Render a view as a text grid, key column first.  Missing cells are blank.
/// A name shared by several visible columns is suffixed with the fragment
/// file it came from.
pub fn render_view(view: &TableView<'_>) -> Result<String> {
    let table = view.table();

    let mut fields = vec![Field::new(table.key_column(), DataType::Utf8, false)];
    let keys: Vec<String> = view.keys().iter().map(|k| k.to_string()).collect();
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(StringArray::from(keys))];

    let columns = view.columns();
    let mut uses: HashMap<&str, usize> = HashMap::new();
    for column in &columns {
        *uses.entry(column.name.as_str()).or_default() += 1;
    }
    for column in columns {
        let label = if uses[column.name.as_str()] > 1 {
            format!("{} ({})", column.name, file_label(&column.fragment))
        } else {
            column.name.clone()
        };
        fields.push(Field::new(label, DataType::Utf8, true));
        arrays.push(Arc::new(StringArray::from(view.values(column))));
    }

    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
        .context("building preview batch")?;
    let rendered = pretty_format_batches(&[batch]).context("formatting preview")?;
    Ok(rendered.to_string())
}

/// Pretty JSON for one index entry.
pub fn render_record<R: Serialize>(key: i64, record: &R) -> Result<String> {
    #[derive(Serialize)]
    struct Entry<'a, R> {
        key: i64,
        record: &'a R,
    }
    serde_json::to_string_pretty(&Entry { key, record }).context("serializing record")
}
