//! Source file loading.

use std::path::Path;

use crate::core::error::{BefError, BefResult};
use crate::grid::Grid;

/// Read a program file into a grid.
pub fn load_file(path: impl AsRef<Path>) -> BefResult<Grid> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let source = std::fs::read(path).map_err(|e| {
        let err = BefError::SourceUnreadable {
            path: display.clone(),
            message: e.to_string(),
        };
        crate::audit_log!(
            action = "LOAD",
            entity = ("Program", display.as_str()),
            description = err.to_string(),
            category = Load,
            severity = Error,
            outcome = Failure,
        );
        err
    })?;

    match Grid::from_source(&source) {
        Ok(grid) => {
            crate::audit_log!(
                action = "LOAD",
                entity = ("Program", display.as_str()),
                description = format!("Loaded {} bytes", source.len()),
                category = Load,
                outcome = Success,
            );
            Ok(grid)
        }
        Err(err) => {
            crate::audit_log!(
                action = "LOAD",
                entity = ("Program", display.as_str()),
                description = err.to_string(),
                category = Load,
                severity = Error,
                outcome = Failure,
            );
            Err(err)
        }
    }
}
