use clap::Parser;

/// This is a tabulation program for like/dislike touch surveys on the areas of an image.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON file describing the survey. If provided, the other
    /// input options are ignored. See the manual for the format of this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing the outcome of a survey in JSON format. If provided, touchtally will
    /// check that the tabulated output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the survey will be written in JSON format to the given
    /// location. Otherwise it is printed on the standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) The definition of the areas: one row per boundary point with the columns name, x, y.
    #[clap(long, value_parser)]
    pub regions: Option<String>,

    /// (file path) The answers: one row per respondent with the columns like1_x ... dislike2_y.
    #[clap(long, value_parser)]
    pub responses: Option<String>,

    /// (csv or xlsx, default guessed from the file extension) The type of the input files.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default 'Respondent ID') The name of the column holding the respondent ids.
    #[clap(long, value_parser)]
    pub id_column: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (directory, optional) If specified, the tables are written in CSV format in this directory,
    /// along with the images annotated with the touches.
    #[clap(long, value_parser)]
    pub output_dir: Option<String>,

    /// (file path, optional) The reference image on which the touches are drawn.
    #[clap(long, value_parser)]
    pub image: Option<String>,

    /// (default 10) The radius in pixels of the touches drawn on the image.
    #[clap(long, value_parser)]
    pub marker_radius: Option<u32>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
