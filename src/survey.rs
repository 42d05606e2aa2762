use log::{debug, info, warn};

use area_tally::builder::Builder;
use area_tally::*;
use snafu::{prelude::*, Snafu};

use image::RgbImage;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::survey::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
mod render;
mod scatter;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SurveyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet found in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Worksheet {name} not found in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error writing table {path}"))]
    CsvWrite { source: csv::Error, path: String },
    #[snafu(display("Column {column} not found in {path}"))]
    MissingColumn { column: String, path: String },
    #[snafu(display("{path}, line {lineno}: no value in column {column}"))]
    MissingValue {
        path: String,
        lineno: usize,
        column: String,
    },
    #[snafu(display("{path}, line {lineno}: column {column} is not a number: {content:?}"))]
    NotANumber {
        path: String,
        lineno: usize,
        column: String,
        content: String,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Configuration file {path} has no parent directory"))]
    MissingParentDir { path: String },
    #[snafu(display("Unknown provider {provider:?} (expected csv or xlsx)"))]
    UnknownProvider { provider: String },
    #[snafu(display("Error opening image {path}"))]
    OpeningImage {
        source: image::ImageError,
        path: String,
    },
    #[snafu(display("Error saving image {path}"))]
    SavingImage {
        source: image::ImageError,
        path: String,
    },
    #[snafu(display("Invalid survey data: {source}"))]
    Tally { source: TallyErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type TallyResult<T> = Result<T, SurveyError>;

const ID_HEADER: &str = "Respondent ID";

fn area_summaries_to_json(summaries: &[AreaSummary]) -> Vec<JSValue> {
    summaries
        .iter()
        .map(|s| {
            json!({
                "area": s.area,
                "like": s.like,
                "dislike": s.dislike,
                "none": s.none,
                "total": s.total,
                "like_ratio": s.like_ratio,
                "dislike_ratio": s.dislike_ratio,
                "none_ratio": s.none_ratio,
            })
        })
        .collect()
}

fn area_diffs_to_json(diffs: &[AreaDiff]) -> Vec<JSValue> {
    diffs
        .iter()
        .map(|d| {
            json!({
                "area": d.area,
                "like_diff": d.like_diff,
                "dislike_diff": d.dislike_diff,
            })
        })
        .collect()
}

fn coordinate_rows_to_json(rows: &[CoordinateRow]) -> Vec<JSValue> {
    rows.iter()
        .map(|row| {
            let mut obj: JSMap<String, JSValue> = JSMap::new();
            obj.insert(ID_HEADER.to_string(), json!(row.respondent_id));
            for (col, coord) in COORDINATE_COLUMNS.chunks(2).zip(row_coords(row)) {
                obj.insert(col[0].to_string(), json!(coord.map(|c| c.x)));
                obj.insert(col[1].to_string(), json!(coord.map(|c| c.y)));
            }
            JSValue::Object(obj)
        })
        .collect()
}

// The coordinates of a row, in the order of COORDINATE_COLUMNS.
fn row_coords(row: &CoordinateRow) -> [Option<Coord>; 4] {
    [row.like[0], row.like[1], row.dislike[0], row.dislike[1]]
}

fn build_summary_js(config: &SurveyConfig, regions: &RegionIndex, res: &SurveyResult) -> JSValue {
    json!({
        "config": {
            "survey": config.output_settings.survey_name,
            "regions": regions.names().collect::<Vec<&str>>(),
            "respondents": res.total,
        },
        "before": area_summaries_to_json(&res.before),
        "after": area_summaries_to_json(&res.after),
        "diff": area_diffs_to_json(&res.diff),
        "filtered": coordinate_rows_to_json(&res.filtered),
        "allTouches": coordinate_rows_to_json(&res.all_touches),
    })
}

fn read_table(path: &str, source: &FileSource) -> TallyResult<io_common::RawTable> {
    info!("Attempting to read table {:?}", path);
    match source.provider()? {
        Provider::Csv => io_csv::read_csv_table(path),
        Provider::Xlsx => io_excel::read_excel_table(path, source.excel_worksheet_name.as_deref()),
    }
}

fn read_regions(builder: &mut Builder, source: &FileSource, root: &Path) -> TallyResult<()> {
    let regions_path = resolve_path(root, &source.file_path);
    let regions = read_table(&regions_path, source)?;
    io_common::fill_regions(builder, &regions)
}

fn read_respondents(builder: &mut Builder, source: &FileSource, root: &Path) -> TallyResult<()> {
    let responses_path = resolve_path(root, &source.file_path);
    let responses = read_table(&responses_path, source)?;
    let id_column = source
        .id_column
        .clone()
        .unwrap_or_else(|| ID_HEADER.to_string());
    io_common::fill_respondents(builder, &responses, &id_column)
}

fn resolve_path(root: &Path, file_path: &str) -> String {
    let p: PathBuf = [root, Path::new(file_path)].iter().collect();
    p.as_path().display().to_string()
}

fn write_summary_tables(dir: &Path, res: &SurveyResult) -> TallyResult<()> {
    let path_of = |name: &str| dir.join(name).display().to_string();

    let summary_header = [
        "area",
        "like",
        "dislike",
        "none",
        "total",
        "like_ratio",
        "dislike_ratio",
        "none_ratio",
    ];
    for (name, summaries) in [("before.csv", &res.before), ("after.csv", &res.after)] {
        let rows: Vec<Vec<String>> = summaries
            .iter()
            .map(|s| {
                vec![
                    s.area.clone(),
                    s.like.to_string(),
                    s.dislike.to_string(),
                    s.none.to_string(),
                    s.total.to_string(),
                    s.like_ratio.to_string(),
                    s.dislike_ratio.to_string(),
                    s.none_ratio.to_string(),
                ]
            })
            .collect();
        io_csv::write_csv_table(&path_of(name), &summary_header, &rows)?;
    }

    let diff_rows: Vec<Vec<String>> = res
        .diff
        .iter()
        .map(|d| {
            vec![
                d.area.clone(),
                d.like_diff.to_string(),
                d.dislike_diff.to_string(),
            ]
        })
        .collect();
    io_csv::write_csv_table(
        &path_of("diff.csv"),
        &["area", "like_diff", "dislike_diff"],
        &diff_rows,
    )?;

    let mut coord_header = vec![ID_HEADER];
    coord_header.extend(COORDINATE_COLUMNS.iter());
    for (name, rows) in [
        ("filtered_coordinates.csv", &res.filtered),
        ("all_coordinates.csv", &res.all_touches),
    ] {
        let rows: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                let mut cells = vec![row.respondent_id.clone()];
                for coord in row_coords(row) {
                    let (x, y) = match coord {
                        Some(c) => (c.x.to_string(), c.y.to_string()),
                        None => (String::new(), String::new()),
                    };
                    cells.push(x);
                    cells.push(y);
                }
                cells
            })
            .collect();
        io_csv::write_csv_table(&path_of(name), &coord_header, &rows)?;
    }
    Ok(())
}

fn write_outputs(config: &SurveyConfig, root: &Path, res: &SurveyResult) -> TallyResult<()> {
    let dir = match config.output_settings.output_directory.as_deref() {
        Some(d) => PathBuf::from(resolve_path(root, d)),
        None => {
            if config.background_image.is_some() {
                warn!("A background image is configured but no output directory: skipping the overlays");
            }
            return Ok(());
        }
    };
    fs::create_dir_all(&dir).context(WritingFileSnafu {
        path: dir.display().to_string(),
    })?;

    if config.output_settings.write_csv_tables.unwrap_or(true) {
        info!("Writing tables to {:?}", dir);
        write_summary_tables(&dir, res)?;
    }

    let scatter_p = dir.join("after_scatter.png").display().to_string();
    info!("Saving scatter plot {:?}", scatter_p);
    scatter::plot_areas(&res.after)
        .save(&scatter_p)
        .context(SavingImageSnafu { path: scatter_p.clone() })?;

    if let Some(image_path) = config.background_image.as_deref() {
        let background = render::load_background(&resolve_path(root, image_path))?;
        for (name, rows) in [
            ("after_overlay.png", &res.filtered),
            ("all_overlay.png", &res.all_touches),
        ] {
            write_overlay(config, &dir, name, &background, rows)?;
        }
    }
    Ok(())
}

fn write_overlay(
    config: &SurveyConfig,
    dir: &Path,
    name: &str,
    background: &RgbImage,
    rows: &[CoordinateRow],
) -> TallyResult<()> {
    let radius = config
        .output_settings
        .marker_radius
        .unwrap_or(render::DEFAULT_RADIUS);
    let mut img = background.clone();
    render::draw_points(&mut img, rows, radius);
    let p = dir.join(name).display().to_string();
    info!("Saving overlay {:?}", p);
    img.save(&p).context(SavingImageSnafu { path: p.clone() })?;
    Ok(())
}

// Aggregation of the touches over the areas.
fn tally_areas(config: &SurveyConfig, region_source: &FileSource, root: &Path) -> TallyResult<JSValue> {
    let mut builder = Builder::new();
    read_regions(&mut builder, region_source, root)?;
    read_respondents(&mut builder, &config.response_source, root)?;
    let (regions, respondents) = builder.build().context(TallySnafu {})?;
    let res = run_survey_stats(&respondents, &regions).context(TallySnafu {})?;
    write_outputs(config, root, &res)?;
    Ok(build_summary_js(config, &regions, &res))
}

// Without areas: every touch is drawn on the background image, nothing is tallied.
fn plot_touches(config: &SurveyConfig, root: &Path) -> TallyResult<JSValue> {
    let (dir, image_path) = match (
        config.output_settings.output_directory.as_deref(),
        config.background_image.as_deref(),
    ) {
        (Some(d), Some(i)) => (PathBuf::from(resolve_path(root, d)), i),
        _ => {
            whatever!("No areas are configured: an output directory and a background image are required to plot the touches")
        }
    };
    info!("No areas configured, plotting all the touches");
    let mut builder = Builder::new();
    read_respondents(&mut builder, &config.response_source, root)?;
    let (_, respondents) = builder.build().context(TallySnafu {})?;
    let rows: Vec<CoordinateRow> = respondents.iter().map(all_touches).collect();

    fs::create_dir_all(&dir).context(WritingFileSnafu {
        path: dir.display().to_string(),
    })?;
    let background = render::load_background(&resolve_path(root, image_path))?;
    write_overlay(config, &dir, "all_overlay.png", &background, &rows)?;

    Ok(json!({
        "config": {
            "survey": config.output_settings.survey_name,
            "regions": [],
            "respondents": respondents.len(),
        },
        "allTouches": coordinate_rows_to_json(&rows),
    }))
}

/// Runs the survey described by the configuration.
///
/// Arguments:
/// * `root` the directory against which the relative paths of the configuration are resolved
/// * `out` where to write the JSON summary: a file path, or `stdout` (default)
/// * `check_summary_path` a reference summary to compare the outcome with
pub fn run_survey(
    config: &SurveyConfig,
    root: &Path,
    out: Option<&str>,
    check_summary_path: Option<&str>,
) -> TallyResult<JSValue> {
    debug!("run_survey: config: {:?} root: {:?}", config, root);
    let result_js = match config.region_source.as_ref() {
        Some(region_source) => tally_areas(config, region_source, root)?,
        None => plot_touches(config, root)?,
    };
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    match out {
        None | Some("stdout") => println!("stats:{}", pretty_js_stats),
        Some(p) => {
            info!("Writing summary to {:?}", p);
            fs::write(p, &pretty_js_stats).context(WritingFileSnafu { path: p })?;
        }
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_summary(summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if summary_ref != result_js {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(result_js)
}

/// Runs the survey described in a JSON configuration file.
pub fn run_survey_file(
    config_path: &str,
    out: Option<&str>,
    check_summary_path: Option<&str>,
) -> TallyResult<JSValue> {
    let config = read_config(config_path)?;
    info!("config: {:?}", config);
    let root = Path::new(config_path)
        .parent()
        .context(MissingParentDirSnafu { path: config_path })?;
    run_survey(&config, root, out, check_summary_path)
}
