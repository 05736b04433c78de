use std::collections::HashMap;
use std::io::Read;

use super::mapping::{field_for_header, RosterField};

/// One roster row with fields resolved through the header mapping. Values
/// are kept raw; validation happens at registration time.
#[derive(Debug, Clone, Default)]
pub(crate) struct RosterRecord {
    pub(crate) line: usize,
    pub(crate) full_name: String,
    pub(crate) phone: String,
    pub(crate) room: String,
    pub(crate) join_date: String,
    pub(crate) fee_amount: f64,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<RosterRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns: HashMap<usize, RosterField> = csv_reader
        .headers()?
        .iter()
        .enumerate()
        .filter_map(|(index, header)| field_for_header(header).map(|field| (index, field)))
        .collect();

    let mut records = Vec::new();
    for (row_index, row) in csv_reader.records().enumerate() {
        let row = row?;
        // Header is line 1; data starts on line 2.
        let mut record = RosterRecord {
            line: row_index + 2,
            ..RosterRecord::default()
        };

        for (index, field) in &columns {
            let value = row.get(*index).unwrap_or("").trim();
            match field {
                RosterField::FullName => record.full_name = value.to_string(),
                RosterField::Phone => record.phone = value.to_string(),
                RosterField::Room => record.room = value.to_string(),
                RosterField::JoinDate => record.join_date = value.to_string(),
                RosterField::FeeAmount => {
                    // Unparseable fees zero-fill rather than abort the row.
                    record.fee_amount = value.replace(',', "").parse().unwrap_or(0.0);
                }
            }
        }

        records.push(record);
    }

    Ok(records)
}
