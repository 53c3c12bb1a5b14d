use clap::Parser;

/// Normalizes tables of MBTI type shares by country.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A configuration file in JSON format. See the manual for the list of options.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference file containing the expected canonical table in CSV format. If provided,
    /// mbtishare will check that the normalized output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) Where to write the canonical table in CSV format. Setting this option
    /// overrides the path that may be specified with the --config option. Defaults to the standard output, except
    /// with --top-type where only the listing is printed.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) The table to normalize. Setting this option overrides the file that may be
    /// specified with the --config option. If neither is given, countriesMBTI_16types.csv is read from the
    /// current directory when it exists.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (csv or xlsx) The type of the input. By default, it is guessed from the extension of the file.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default: first worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (default ',') The delimiter of a CSV input.
    #[clap(long, value_parser)]
    pub delimiter: Option<char>,

    /// (file path, optional) Where to write a summary of the normalization in JSON format: detected shape,
    /// columns used, dropped rows and countries whose shares do not add up to 100.
    #[clap(long, value_parser)]
    pub summary: Option<String>,

    /// (type code, optional) If specified, prints the countries with the largest share of this type.
    #[clap(long, value_parser)]
    pub top_type: Option<String>,

    /// (default 10) The number of countries printed with --top-type.
    #[clap(long, value_parser)]
    pub top_n: Option<usize>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard error.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
