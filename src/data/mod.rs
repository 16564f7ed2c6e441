/// Data layer: core types, loading, and year filtering.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → DataTable (raw text cells)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ DataTable  │  headers + Vec<Row>
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  distinct years, rows of one year
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
