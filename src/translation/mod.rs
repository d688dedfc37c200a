//! Translation tables and the files they are read from.
pub mod loader;
mod table;

pub use loader::{
    LoadedTables,
    TranslationFiles,
    load_table,
    load_tables,
};
pub use table::{
    TranslationTable,
    TranslationValue,
};
