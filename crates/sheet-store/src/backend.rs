//! Row-level access to the booking sheet.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::models::HEADER;

/// Raw row storage behind [`SheetStore`](crate::SheetStore).
///
/// Row and column numbers are 1-based, as in the spreadsheet UI; row 1 is
/// the header.
#[async_trait]
pub trait SheetBackend: Send + Sync {
    /// Read every row, header included.
    async fn read_all(&self) -> Result<Vec<Vec<String>>>;

    /// Overwrite (or create) a whole row.
    async fn write_row(&self, row: usize, values: Vec<String>) -> Result<()>;

    /// Overwrite a single cell.
    async fn update_cell(&self, row: usize, column: usize, value: &str) -> Result<()>;

    /// Delete rows `start..=end`.
    async fn delete_rows(&self, start: usize, end: usize) -> Result<()>;

    /// Human-readable backend name for logs.
    fn name(&self) -> &str;
}

/// In-process sheet, seeded with the header row.
#[derive(Debug)]
pub struct MemorySheet {
    rows: RwLock<Vec<Vec<String>>>,
}

impl Default for MemorySheet {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySheet {
    /// Create a sheet containing only the header.
    pub fn new() -> Self {
        Self::with_rows(vec![HEADER.iter().map(|h| h.to_string()).collect()])
    }

    /// Create a sheet with the given rows (header included).
    pub fn with_rows(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    /// Copy of the current contents.
    pub async fn snapshot(&self) -> Vec<Vec<String>> {
        self.rows.read().await.clone()
    }

    /// Append a raw row, bypassing the store.
    pub async fn push_row(&self, row: Vec<String>) {
        self.rows.write().await.push(row);
    }
}

#[async_trait]
impl SheetBackend for MemorySheet {
    async fn read_all(&self) -> Result<Vec<Vec<String>>> {
        Ok(self.snapshot().await)
    }

    async fn write_row(&self, row: usize, values: Vec<String>) -> Result<()> {
        if row == 0 {
            return Err(StoreError::RowOutOfRange { row });
        }
        let mut rows = self.rows.write().await;
        while rows.len() < row {
            rows.push(Vec::new());
        }
        rows[row - 1] = values;
        Ok(())
    }

    async fn update_cell(&self, row: usize, column: usize, value: &str) -> Result<()> {
        let mut rows = self.rows.write().await;
        if row == 0 || column == 0 || row > rows.len() {
            return Err(StoreError::RowOutOfRange { row });
        }
        let cells = &mut rows[row - 1];
        if cells.len() < column {
            cells.resize(column, String::new());
        }
        cells[column - 1] = value.to_string();
        Ok(())
    }

    async fn delete_rows(&self, start: usize, end: usize) -> Result<()> {
        let mut rows = self.rows.write().await;
        if start == 0 || start > end || start > rows.len() {
            return Err(StoreError::RowOutOfRange { row: start });
        }
        let end = end.min(rows.len());
        rows.drain(start - 1..end);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
