// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Print out what's in a calibration table.

use std::borrow::Cow;

use clap::Parser;
use hifitime::Epoch;
use itertools::Itertools;
use log::debug;

use super::common::{classify_table, locate_table, InfoPrinter, TABLE_HELP};
use crate::{
    io::read::{CalTableContext, CalTableRead, CasaCalTable},
    solutions::TableKind,
    CalplotError,
};

#[derive(Parser, Debug, Default)]
pub(super) struct TableInfoArgs {
    #[clap(name = "TABLE", help = TABLE_HELP.as_str())]
    table: String,

    /// Print the name of every antenna, not just the number of antennas.
    #[clap(long)]
    all_antennas: bool,
}

impl TableInfoArgs {
    pub(super) fn run(self) -> Result<(), CalplotError> {
        let kind = classify_table(&self.table)?;
        let path = locate_table(&self.table)?;
        debug!("Reading metadata from {}", path.display());
        let cal_table = CasaCalTable::new(&path, kind)?;

        describe(cal_table.get_table_name(), kind, cal_table.get_context(), self.all_antennas)
            .display();
        Ok(())
    }
}

/// Lay out a table's metadata for printing.
fn describe(
    name: &str,
    kind: TableKind,
    context: &CalTableContext,
    all_antennas: bool,
) -> InfoPrinter {
    let mut printer = InfoPrinter::new(format!("Calibration table {name}").into());

    let kind_desc = match kind {
        TableKind::Gain => "gains",
        TableKind::Bandpass => "bandpass",
        TableKind::Delay => "delays",
    };
    printer.push_line(format!("Kind: {kind} ({kind_desc}, {})", kind.param_column()).into());

    // CASA times are MJD seconds (UTC).
    let first = Epoch::from_mjd_utc(context.first_time / 86400.0);
    printer.push_block(vec![
        format!("Rows: {}", context.num_rows).into(),
        format!("First solution: {first}").into(),
    ]);
    printer.push_block(vec![
        format!("Channels: {}", context.num_chans).into(),
        format!("Correlations: {}", context.num_corrs).into(),
    ]);
    printer.push_line(format!("Fields: {}", context.fields.iter().join(", ")).into());

    let mut block: Vec<Cow<'static, str>> = vec![format!(
        "Antennas ({}): {}",
        context.antennas.len(),
        context.antennas.iter().join(", ")
    )
    .into()];
    match context.antenna_names.as_ref() {
        Some(names) if all_antennas => {
            for &ant in context.antennas.iter() {
                let name = names.get(ant).map(|n| n.as_str()).unwrap_or("<unnamed>");
                block.push(format!("{ant:>4}: {name}").into());
            }
        }
        Some(names) => {
            block.push(format!("{} antenna names are available", names.len()).into())
        }
        None => block.push("No antenna names are available".into()),
    }
    printer.push_block(block);

    printer
}

#[cfg(test)]
mod tests {
    use vec1::vec1;

    use super::*;

    fn context() -> CalTableContext {
        CalTableContext {
            antennas: vec1![0, 1, 3],
            fields: vec1![0, 2],
            num_rows: 120,
            num_chans: 1,
            num_corrs: 2,
            first_time: 4.8e9,
            antenna_names: Some(vec1![
                "Tile011".to_string(),
                "Tile012".to_string(),
                "Tile013".to_string()
            ]),
        }
    }

    #[test]
    fn test_table_info_needs_a_known_kind() {
        let result = TableInfoArgs {
            table: "obs.ms".to_string(),
            all_antennas: false,
        }
        .run();
        assert!(matches!(result, Err(CalplotError::Plot(s)) if s.contains("'obs.ms'")));
    }

    #[test]
    fn test_describe() {
        // Nothing to assert on the log output itself; make sure that a table
        // whose antenna numbers run past its names is handled.
        describe("obs.G0", TableKind::Gain, &context(), true).display();
        describe("obs.G0", TableKind::Gain, &context(), false).display();

        let mut c = context();
        c.antenna_names = None;
        describe("obs.K0", TableKind::Delay, &c, true).display();
    }
}
