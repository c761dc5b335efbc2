//! Command implementations.

pub mod rename;

pub use rename::{
    check_company_name, execute_rename, rename_files, select_files, RenameSummary,
};
