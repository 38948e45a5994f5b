use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::LineId;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineInfo {
    pub id: LineId,
    pub name: String,
}

impl LineInfo {
    pub fn describe(&self) -> String {
        format!("{} ({})", self.id, self.name)
    }
}

pub fn load<R: std::io::Read>(reader: R) -> Result<BTreeMap<LineId, LineInfo>> {
    let mut lines = BTreeMap::new();
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: Record = rec?;
        if lines.contains_key(&rec.line_id) {
            bail!("Duplicate line {}", rec.line_id);
        }
        lines.insert(
            rec.line_id.clone(),
            LineInfo {
                id: rec.line_id,
                name: rec.name,
            },
        );
    }
    Ok(lines)
}

#[derive(Deserialize)]
struct Record {
    line_id: LineId,
    name: String,
}
