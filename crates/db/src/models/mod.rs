//! Row structs decoded from the database.
//!
//! Each submodule contains a `FromRow` struct matching the table columns
//! and the conversion into the corresponding core domain type.

pub mod release;
