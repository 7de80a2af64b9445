// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to interface with CASA calibration tables.
//!
//! More info: https://casa.nrao.edu/Memos/229.html (calibration tables share
//! the measurement set's table system).

mod error;

pub(crate) use error::CasaReadError;

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use itertools::Itertools;
use log::{debug, trace, warn};
use marlu::{c32, rubbl_casatables};
use ndarray::prelude::*;
use rubbl_casatables::{Table, TableOpenMode};
use vec1::Vec1;

use super::{AntennaSolutions, CalTableContext, CalTableRead, CalTableReadError, SolutionValues};
use crate::solutions::TableKind;

/// Every calibration table kind needs these columns, as well as its solution
/// column.
const REQUIRED_COLUMNS: [&str; 5] = ["TIME", "ANTENNA1", "FIELD_ID", "PARAMERR", "FLAG"];

/// Open a table read only. If `subtable` is `None`, then open the base table.
fn read_table(table: &Path, subtable: Option<&str>) -> Result<Table, CasaReadError> {
    let t = Table::open(
        format!("{}/{}", table.display(), subtable.unwrap_or("")),
        TableOpenMode::Read,
    )?;
    Ok(t)
}

/// Read antenna names out of the `ANTENNA` subtable of a measurement set or
/// calibration table. The names are indexed by antenna number.
pub(crate) fn read_antenna_names(table: &Path) -> Result<Vec1<String>, CasaReadError> {
    if !table.exists() {
        return Err(CasaReadError::BadFile(table.to_path_buf()));
    }
    let mut antenna_table = read_table(table, Some("ANTENNA"))?;
    let names: Vec<String> = antenna_table.get_col_as_vec("NAME")?;
    trace!("There are {} antenna names in {}", names.len(), table.display());
    Vec1::try_from_vec(names).map_err(|_| CasaReadError::AntennaTableEmpty)
}

pub(crate) struct CasaCalTable {
    /// The path to the table on disk.
    table: PathBuf,

    /// The table's file name, without any leading directories.
    name: String,

    kind: TableKind,

    context: CalTableContext,

    /// The main-table rows of each (antenna, field) pair, in table order.
    rows: HashMap<(usize, usize), Vec<u64>>,
}

impl CasaCalTable {
    /// Verify and populate metadata associated with this calibration table.
    pub(crate) fn new(table: &Path, kind: TableKind) -> Result<CasaCalTable, CasaReadError> {
        debug!("Using calibration table: {}", table.display());
        if !table.exists() {
            return Err(CasaReadError::BadFile(table.to_path_buf()));
        }

        let mut main_table = read_table(table, None)?;
        let num_rows = main_table.n_rows() as usize;
        if num_rows == 0 {
            return Err(CasaReadError::MainTableEmpty);
        }
        let col_names = main_table.column_names()?;
        for column in REQUIRED_COLUMNS
            .into_iter()
            .chain(std::iter::once(kind.param_column()))
        {
            if !col_names.iter().any(|c| c == column) {
                return Err(CasaReadError::MissingColumn { column, kind });
            }
        }
        drop(col_names);

        let antenna1: Vec<i32> = main_table.get_col_as_vec("ANTENNA1")?;
        let field_ids: Vec<i32> = main_table.get_col_as_vec("FIELD_ID")?;
        let antennas = unique_indices(&antenna1, "ANTENNA1")?;
        let fields = unique_indices(&field_ids, "FIELD_ID")?;
        trace!("Antennas in the table: {antennas:?}");
        trace!("Fields in the table: {fields:?}");
        // Neither column has negative values, or we'd have bailed above.
        let rows = antenna1
            .iter()
            .zip(field_ids.iter())
            .enumerate()
            .map(|(i_row, (&ant, &field))| ((ant as usize, field as usize), i_row as u64))
            .into_group_map();

        let first_time: f64 = main_table.get_cell("TIME", 0)?;

        // The cell shapes are assumed not to change between rows; each row
        // read later is checked against this.
        let mut cell_shape = (0, 0);
        main_table.for_each_row_in_range(0..1, |row| {
            let flags: Array2<bool> = row.get_cell("FLAG")?;
            cell_shape = flags.dim();
            Ok(())
        })?;
        let (num_chans, num_corrs) = cell_shape;
        debug!("Solution cells have {num_chans} channel(s) and {num_corrs} correlation(s)");

        // Calibration tables usually carry a copy of their measurement set's
        // antenna table. Not having one is fine; names are only cosmetic.
        let antenna_names = if table.join("ANTENNA").exists() {
            match read_antenna_names(table) {
                Ok(names) => Some(names),
                Err(e) => {
                    warn!("Couldn't read antenna names from the calibration table: {e}");
                    None
                }
            }
        } else {
            None
        };

        let name = table
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_string())
            .unwrap_or_else(|| table.display().to_string());

        Ok(CasaCalTable {
            table: table.to_path_buf(),
            name,
            kind,
            context: CalTableContext {
                antennas,
                fields,
                num_rows,
                num_chans,
                num_corrs,
                first_time,
                antenna_names,
            },
            rows,
        })
    }

    fn read_antenna_inner(
        &self,
        antenna: usize,
        field: usize,
    ) -> Result<AntennaSolutions, CasaReadError> {
        let param_col = self.kind.param_column();
        let is_complex = matches!(self.kind, TableKind::Gain | TableKind::Bandpass);

        let mut times = vec![];
        let mut antenna1 = vec![];
        let mut complex_cells = vec![];
        let mut real_cells = vec![];
        let mut error_cells = vec![];
        let mut flag_cells = vec![];

        let rows = self
            .rows
            .get(&(antenna, field))
            .map(|r| r.as_slice())
            .unwrap_or_default();
        if !rows.is_empty() {
            let mut main_table = read_table(&self.table, None)?;
            for &i_row in rows {
                times.push(main_table.get_cell::<f64>("TIME", i_row)?);
                antenna1.push(main_table.get_cell::<i32>("ANTENNA1", i_row)?);
                if is_complex {
                    let cell: Array2<c32> = main_table.get_cell(param_col, i_row)?;
                    complex_cells.push((i_row, cell));
                } else {
                    let cell: Array2<f32> = main_table.get_cell(param_col, i_row)?;
                    real_cells.push((i_row, cell));
                }
                let errors: Array2<f32> = main_table.get_cell("PARAMERR", i_row)?;
                error_cells.push((i_row, errors));
                let flags: Array2<bool> = main_table.get_cell("FLAG", i_row)?;
                flag_cells.push((i_row, flags));
            }
        }
        trace!(
            "Antenna {antenna} has {} row(s) in field {field}",
            times.len()
        );

        let shape = (self.context.num_chans, self.context.num_corrs);
        let values = if is_complex {
            SolutionValues::Complex(stack_cells(complex_cells, shape, param_col)?)
        } else {
            SolutionValues::Real(stack_cells(real_cells, shape, param_col)?)
        };

        Ok(AntennaSolutions {
            antenna,
            times,
            antenna1,
            values,
            errors: stack_cells(error_cells, shape, "PARAMERR")?,
            flags: stack_cells(flag_cells, shape, "FLAG")?,
        })
    }
}

impl CalTableRead for CasaCalTable {
    fn get_table_name(&self) -> &str {
        &self.name
    }

    fn get_context(&self) -> &CalTableContext {
        &self.context
    }

    fn read_antenna(
        &self,
        antenna: usize,
        field: usize,
    ) -> Result<AntennaSolutions, CalTableReadError> {
        if !self.context.antennas.contains(&antenna) {
            return Err(CalTableReadError::UnknownAntenna { antenna });
        }
        Ok(self.read_antenna_inner(antenna, field)?)
    }
}

/// Get the sorted, unique values of an index column. Indices can't be negative.
fn unique_indices(column: &[i32], column_name: &'static str) -> Result<Vec1<usize>, CasaReadError> {
    let unique = column
        .iter()
        .copied()
        .sorted_unstable()
        .dedup()
        .map(|i| {
            usize::try_from(i).map_err(|_| CasaReadError::NegativeIndex {
                column: column_name,
                value: i,
            })
        })
        .collect::<Result<Vec<usize>, _>>()?;
    Vec1::try_from_vec(unique).map_err(|_| CasaReadError::MainTableEmpty)
}

/// Stack per-row cells into a (row, channel, correlation) array.
fn stack_cells<T: Clone>(
    cells: Vec<(u64, Array2<T>)>,
    shape: (usize, usize),
    array_type: &'static str,
) -> Result<Array3<T>, CasaReadError> {
    let num_rows = cells.len();
    let mut flat = Vec::with_capacity(num_rows * shape.0 * shape.1);
    for (row_index, cell) in cells {
        if cell.dim() != shape {
            return Err(CasaReadError::BadCellShape {
                array_type,
                row_index,
                expected: shape,
                got: cell.dim(),
            });
        }
        flat.extend(cell.iter().cloned());
    }
    let stacked = Array3::from_shape_vec((num_rows, shape.0, shape.1), flat)?;
    Ok(stacked)
}
