//! Health Journal
//!
//! The entry side of the system:
//!
//! - **types**: `HealthEntry`, `SymptomObservation`, `TimeWindow`
//! - **validate**: Ingestion DTOs and invariant checks
//! - **store**: In-memory entry store with JSON snapshots
//! - **csv_import**: Symptom logs from CSV files
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use health_journal::journal::{validate_entries, HealthEntry};
//!
//! let entry = HealthEntry::new("e1", Utc::now())
//!     .symptom("headache", 6)
//!     .mood(3);
//!
//! assert!(validate_entries(&[entry]).is_ok());
//! ```

pub mod csv_import;
pub mod error;
pub mod store;
pub mod types;
pub mod validate;

pub use csv_import::{import_csv, import_csv_file, CsvColumns, CsvImportResult};
pub use error::{JournalError, JournalResult, ValidationError};
pub use store::{EntryStore, StoreConfig};
pub use types::{
    days_between, normalize_symptom_name, HealthEntry, SymptomObservation, TimeWindow,
    MAX_MOOD, MAX_SEVERITY, MIN_MOOD, MIN_SEVERITY,
};
pub use validate::{
    parse_date, validate_entries, validate_entry, validate_inputs, EntryInput, SymptomInput,
};
