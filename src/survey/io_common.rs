// Primitives shared by all the table readers.

use area_tally::builder::Builder;
use area_tally::*;
use log::{debug, warn};

use crate::survey::*;

/// The values that are understood as a missing coordinate.
const MISSING_TOKENS: [&str; 6] = ["", "NA", "N/A", "NaN", "nan", "null"];

#[derive(PartialEq, Debug, Clone)]
pub enum RawCell {
    Empty,
    Number(f64),
    Text(String),
}

impl RawCell {
    /// The content of a cell as a label (region name, respondent id).
    fn label(&self) -> Option<String> {
        match self {
            RawCell::Empty => None,
            // Excel stores whole numbers as floats: 12.0 is the id "12".
            RawCell::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                Some(format!("{}", *v as i64))
            }
            RawCell::Number(v) => Some(v.to_string()),
            RawCell::Text(s) if s.trim().is_empty() => None,
            RawCell::Text(s) => Some(s.trim().to_string()),
        }
    }
}

/// A table read from a file: a header and the rows below it.
///
/// Each row carries its line number in the file, for the error messages.
#[derive(PartialEq, Debug, Clone)]
pub struct RawTable {
    pub path: String,
    pub header: Vec<String>,
    pub rows: Vec<(usize, Vec<RawCell>)>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h.trim() == name)
    }

    fn required_column(&self, name: &str) -> TallyResult<usize> {
        self.column_index(name).context(MissingColumnSnafu {
            column: name,
            path: self.path.clone(),
        })
    }

    fn number(&self, lineno: usize, row: &[RawCell], col: usize) -> TallyResult<Option<f64>> {
        match row.get(col).unwrap_or(&RawCell::Empty) {
            RawCell::Empty => Ok(None),
            RawCell::Number(v) if v.is_nan() => Ok(None),
            RawCell::Number(v) => Ok(Some(*v)),
            RawCell::Text(s) => {
                let s = s.trim();
                if MISSING_TOKENS.contains(&s) {
                    return Ok(None);
                }
                match s.parse::<f64>() {
                    Result::Ok(v) if !v.is_nan() => Ok(Some(v)),
                    _ => NotANumberSnafu {
                        path: self.path.clone(),
                        lineno,
                        column: self.header[col].clone(),
                        content: s,
                    }
                    .fail(),
                }
            }
        }
    }
}

/// Reads the boundary points of the regions: one row per point, with the
/// columns `name`, `x` and `y`.
pub fn fill_regions(builder: &mut Builder, table: &RawTable) -> TallyResult<()> {
    let name_idx = table.required_column("name")?;
    let x_idx = table.required_column("x")?;
    let y_idx = table.required_column("y")?;

    for (lineno, row) in table.rows.iter() {
        let lineno = *lineno;
        let name = row
            .get(name_idx)
            .and_then(|c| c.label())
            .context(MissingValueSnafu {
                path: table.path.clone(),
                lineno,
                column: "name",
            })?;
        let x = table.number(lineno, row, x_idx)?;
        let y = table.number(lineno, row, y_idx)?;
        match (x, y) {
            (Some(x), Some(y)) => builder.add_region_point(&name, x, y),
            (None, _) => {
                return MissingValueSnafu {
                    path: table.path.clone(),
                    lineno,
                    column: "x",
                }
                .fail()
            }
            (_, None) => {
                return MissingValueSnafu {
                    path: table.path.clone(),
                    lineno,
                    column: "y",
                }
                .fail()
            }
        }
    }
    Ok(())
}

/// Reads the respondents: one row per respondent, with the coordinate columns
/// `like1_x` ... `dislike2_y` and an optional id column.
pub fn fill_respondents(
    builder: &mut Builder,
    table: &RawTable,
    id_column: &str,
) -> TallyResult<()> {
    let id_idx = table.column_index(id_column);
    if id_idx.is_none() {
        debug!(
            "fill_respondents: no column {:?} in {:?}, using the row positions as ids",
            id_column, table.path
        );
    }

    let coord_idxs: Vec<Option<usize>> = COORDINATE_COLUMNS
        .iter()
        .map(|c| table.column_index(c))
        .collect();
    if coord_idxs.iter().all(|idx| idx.is_none()) {
        return MissingColumnSnafu {
            column: COORDINATE_COLUMNS.join(", "),
            path: table.path.clone(),
        }
        .fail();
    }
    for (cname, idx) in COORDINATE_COLUMNS.iter().zip(coord_idxs.iter()) {
        if idx.is_none() {
            warn!(
                "Column {} not found in {}: treated as missing values",
                cname, table.path
            );
        }
    }

    for (lineno, row) in table.rows.iter() {
        let mut components: [Option<f64>; 8] = [None; 8];
        for (comp, idx) in components.iter_mut().zip(coord_idxs.iter()) {
            if let Some(idx) = idx {
                *comp = table.number(*lineno, row, *idx)?;
            }
        }
        let id = id_idx.and_then(|idx| row.get(idx)).and_then(|c| c.label());
        debug!(
            "fill_respondents: line {:?} id {:?} components {:?}",
            lineno, id, components
        );
        builder
            .add_respondent_row(id, &components)
            .context(TallySnafu {})?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawCell {
        RawCell::Text(s.to_string())
    }

    fn table(header: &[&str], rows: Vec<Vec<RawCell>>) -> RawTable {
        RawTable {
            path: "mem.csv".to_string(),
            header: header.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .into_iter()
                .enumerate()
                .map(|(idx, r)| (idx + 2, r))
                .collect(),
        }
    }

    #[test]
    fn labels() {
        assert_eq!(RawCell::Number(12.0).label(), Some("12".to_string()));
        assert_eq!(RawCell::Number(1.5).label(), Some("1.5".to_string()));
        assert_eq!(text("  r1 ").label(), Some("r1".to_string()));
        assert_eq!(text(" ").label(), None);
        assert_eq!(RawCell::Empty.label(), None);
    }

    #[test]
    fn missing_tokens_are_missing() {
        let t = table(&["x"], vec![]);
        for tok in MISSING_TOKENS {
            assert_eq!(t.number(2, &[text(tok)], 0).unwrap(), None);
        }
        assert_eq!(t.number(2, &[text(" 3.5 ")], 0).unwrap(), Some(3.5));
        assert_eq!(t.number(2, &[RawCell::Number(f64::NAN)], 0).unwrap(), None);
        // Short rows.
        assert_eq!(t.number(2, &[], 0).unwrap(), None);
        assert!(matches!(
            t.number(2, &[text("left")], 0),
            Err(SurveyError::NotANumber { .. })
        ));
    }

    #[test]
    fn respondents_with_partial_columns() {
        let t = table(
            &["like1_x", "like1_y", "dislike1_x", "dislike1_y"],
            vec![
                vec![text("1"), text("2"), text(""), text("")],
                vec![text(""), text(""), text("3"), text("4")],
            ],
        );
        let mut b = Builder::new();
        fill_respondents(&mut b, &t, "Respondent ID").unwrap();
        let (_, respondents) = b.build().unwrap();
        assert_eq!(respondents.len(), 2);
        assert_eq!(respondents[0].id, "0");
        assert_eq!(respondents[0].touches.like[0], Some(Coord::new(1.0, 2.0)));
        assert_eq!(respondents[1].id, "1");
        assert_eq!(respondents[1].touches.dislike[0], Some(Coord::new(3.0, 4.0)));
        assert_eq!(respondents[1].touches.dislike[1], None);
    }

    #[test]
    fn respondents_without_coordinates_fail() {
        let t = table(&["Respondent ID", "age"], vec![]);
        let mut b = Builder::new();
        assert!(matches!(
            fill_respondents(&mut b, &t, "Respondent ID"),
            Err(SurveyError::MissingColumn { .. })
        ));
    }

    #[test]
    fn region_rows() {
        let t = table(
            &["name", "x", "y"],
            vec![
                vec![text("R1"), text("0"), text("0")],
                vec![text("R1"), text("1"), text("0")],
                vec![text("R1"), text("1"), text("1")],
                vec![text("R1"), text("0"), text("1")],
            ],
        );
        let mut b = Builder::new();
        fill_regions(&mut b, &t).unwrap();
        let (index, _) = b.build().unwrap();
        assert_eq!(index.classify(&Coord::new(0.5, 0.5)), Some("R1"));
    }

    #[test]
    fn region_without_coordinate_fails() {
        let t = table(
            &["name", "x", "y"],
            vec![vec![text("R1"), text("0"), RawCell::Empty]],
        );
        let mut b = Builder::new();
        match fill_regions(&mut b, &t) {
            Err(SurveyError::MissingValue { lineno, column, .. }) => {
                assert_eq!(lineno, 2);
                assert_eq!(column, "y");
            }
            x => panic!("unexpected result {:?}", x),
        }
    }
}
