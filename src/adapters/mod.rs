// Adapters layer: concrete implementations of the domain ports.

pub mod csv_store;

pub use csv_store::CsvStore;
