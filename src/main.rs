mod args;
mod survey;

use clap::Parser;
use log::{debug, warn};
use snafu::{whatever, ErrorCompat};

use std::path::Path;

use crate::args::Args;
use crate::survey::config_reader::*;
use crate::survey::*;

fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

// Builds the configuration when the survey is described with the command line flags only.
fn config_from_args(args: &Args) -> TallyResult<SurveyConfig> {
    let responses = match args.responses.clone() {
        Some(p) => p,
        None => {
            whatever!("Missing --responses: the answers are required when no --config is given")
        }
    };
    // Without areas, the touches can still be plotted on the image.
    if args.regions.is_none() && (args.image.is_none() || args.output_dir.is_none()) {
        whatever!("Missing --regions: the areas are required unless --image and --output-dir are given")
    }
    let source = |path: &str, id_column: Option<String>| FileSource {
        provider: args
            .input_type
            .clone()
            .unwrap_or_else(|| guess_provider(path)),
        file_path: path.to_string(),
        id_column,
        excel_worksheet_name: args.excel_worksheet_name.clone(),
    };
    Ok(SurveyConfig {
        output_settings: OutputSettings {
            survey_name: simplify_file_name(&responses),
            output_directory: args.output_dir.clone(),
            marker_radius: args.marker_radius,
            write_csv_tables: Some(true),
        },
        region_source: args.regions.as_deref().map(|p| source(p, None)),
        response_source: source(&responses, args.id_column.clone()),
        background_image: args.image.clone(),
    })
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    debug!("args: {:?}", args);

    let res = if let Some(config_path) = args.config.as_deref() {
        run_survey_file(config_path, args.out.as_deref(), args.reference.as_deref())
    } else {
        config_from_args(&args).and_then(|config| {
            run_survey(
                &config,
                Path::new(""),
                args.out.as_deref(),
                args.reference.as_deref(),
            )
        })
    };

    if let Err(e) = res {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured: {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
