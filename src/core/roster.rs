use crate::domain::model::RosterRow;
use crate::utils::error::{GroupsError, Result};
use std::collections::HashMap;
use std::path::Path;

pub const STUDENT_COLUMN: &str = "student_number";
pub const GROUP_COLUMN: &str = "group_num";

/// Student-to-group assignments in file order.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    rows: Vec<RosterRow>,
}

/// The rows sharing one `group_num`.
#[derive(Debug, Clone)]
pub struct RosterGroup<'a> {
    pub group_num: &'a str,
    pub rows: Vec<&'a RosterRow>,
}

impl Roster {
    pub fn new(rows: Vec<RosterRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[RosterRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct group numbers in order of first appearance, each with its
    /// rows in file order.
    pub fn groups(&self) -> Vec<RosterGroup<'_>> {
        let mut groups: Vec<RosterGroup<'_>> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for row in &self.rows {
            let key = row.group_num.as_str();
            match index.get(key) {
                Some(&i) => groups[i].rows.push(row),
                None => {
                    index.insert(key, groups.len());
                    groups.push(RosterGroup {
                        group_num: key,
                        rows: vec![row],
                    });
                }
            }
        }

        groups
    }
}

/// Reads a roster CSV with `student_number` and `group_num` columns. Other
/// columns are ignored.
pub fn load_roster<P: AsRef<Path>>(path: P) -> Result<Roster> {
    let path = path.as_ref();
    let path_label = path.display().to_string();
    let to_error = |source: csv::Error| GroupsError::RosterError {
        path: path_label.clone(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(to_error)?;

    let rows = reader
        .deserialize::<RosterRow>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(to_error)?;

    tracing::info!("Loaded {} roster rows from {}", rows.len(), path_label);
    Ok(Roster::new(rows))
}
