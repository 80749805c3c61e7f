use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use glob::glob;
use log::{info, warn};
use serde::Serialize;
use xlook_core::formats::binary::error::BinaryError;
use xlook_core::{
    DecodeError, DecodedTable, Endianness, ErrorKind, InputFormat, Layout, TableSummary,
    assemble_rows, decode_bytes, detect_format, read_source, summarize,
};

/// Samples larger than this are taken as a sign of the wrong byte order.
const PLAUSIBLE_MAGNITUDE: f64 = 1e100;

#[derive(Parser, Debug)]
#[command(name = "xlook")]
#[command(version)]
#[command(
    about = "Decode xlook experiment files (binary or text) into tables.",
    long_about = None,
    after_help = "Examples:\n  xlook info p4581.bin\n  xlook info p4581.bin --endianness big --json\n  xlook export p4581.bin -o p4581.csv\n  xlook export p4581.txt --stdout --as json --layout ragged"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the experiment header and channel table of a file.
    #[command(alias = "summary")]
    Info {
        /// Path to an xlook file (binary or text)
        input: PathBuf,

        #[command(flatten)]
        decode: DecodeArgs,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(long, requires = "json")]
        pretty: bool,
    },
    /// Decode a file and write its samples as CSV or JSON.
    #[command(alias = "convert")]
    Export {
        /// Path to an xlook file (binary or text)
        input: PathBuf,

        #[command(flatten)]
        decode: DecodeArgs,

        /// Output path
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        output: Option<PathBuf>,

        /// Write to stdout
        #[arg(long, conflicts_with = "output")]
        stdout: bool,

        /// Output encoding
        #[arg(long = "as", value_enum, default_value_t = OutputKind::Csv)]
        kind: OutputKind,

        /// How columns shorter than the record count are written:
        /// padded (fill with 0), truncated (shortest column) or ragged (blank)
        #[arg(long, default_value = "padded", value_parser = parse_layout)]
        layout: Layout,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Input encoding: auto, binary or ascii
    #[arg(long, default_value = "auto", value_parser = parse_format)]
    format: FormatChoice,

    /// Byte order of binary samples: little, big or auto
    #[arg(long, default_value = "little", value_parser = parse_endianness)]
    endianness: EndiannessChoice,
}

#[derive(Debug, Clone, Copy)]
enum FormatChoice {
    Auto,
    Fixed(InputFormat),
}

#[derive(Debug, Clone, Copy)]
enum EndiannessChoice {
    Auto,
    Fixed(Endianness),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputKind {
    Csv,
    Json,
}

fn parse_format(value: &str) -> Result<FormatChoice, String> {
    if value.trim().eq_ignore_ascii_case("auto") {
        return Ok(FormatChoice::Auto);
    }
    value.parse().map(FormatChoice::Fixed)
}

fn parse_endianness(value: &str) -> Result<EndiannessChoice, String> {
    if value.trim().eq_ignore_ascii_case("auto") {
        return Ok(EndiannessChoice::Auto);
    }
    value
        .parse()
        .map(EndiannessChoice::Fixed)
        .map_err(|err: BinaryError| err.to_string())
}

fn parse_layout(value: &str) -> Result<Layout, String> {
    value.parse()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Info {
            input,
            decode,
            json,
            pretty,
        } => cmd_info(input, decode, json, pretty),
        Commands::Export {
            input,
            decode,
            output,
            stdout,
            kind,
            layout,
            pretty,
            quiet,
        } => cmd_export(input, decode, output, stdout, kind, layout, pretty, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// A failure reported to the user as `error:` plus an optional `hint:` line.
#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hint: None,
        }
    }

    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err))
    }
}

impl From<DecodeError> for CliError {
    fn from(err: DecodeError) -> Self {
        let hint = match err.kind() {
            ErrorKind::SourceUnavailable => Some("check the path and file permissions"),
            ErrorKind::TruncatedInput => Some("the file ends early; it may still be being written"),
            ErrorKind::SchemaMismatch | ErrorKind::MalformedHeader => {
                Some("the file may be damaged, or not in the selected --format")
            }
            ErrorKind::InvalidEndianness => Some("use --endianness little or big"),
            ErrorKind::InvalidNumber => None,
        };
        let cli = CliError::new(err.to_string());
        match hint {
            Some(hint) => cli.with_hint(hint),
            None => cli,
        }
    }
}

/// A decoded file together with what it was decoded as.
struct Decoded {
    path: PathBuf,
    bytes: u64,
    format: InputFormat,
    endianness: Option<Endianness>,
    table: DecodedTable,
}

impl Decoded {
    fn summary(&self) -> TableSummary {
        summarize(
            &self.path.display().to_string(),
            self.bytes,
            self.format,
            self.endianness,
            &self.table,
        )
    }
}

fn decode_input(input: &Path, args: &DecodeArgs) -> Result<Decoded, CliError> {
    let bytes = read_source(input).map_err(DecodeError::from)?;
    let format = match args.format {
        FormatChoice::Auto => None,
        FormatChoice::Fixed(format) => {
            check_declared_format(input, &bytes, format)?;
            Some(format)
        }
    };

    let (format, table, endianness) = match args.endianness {
        EndiannessChoice::Fixed(endianness) => {
            let (format, table) = decode_bytes(&bytes, format, endianness)?;
            (format, table, endianness)
        }
        EndiannessChoice::Auto => {
            let first = Endianness::default();
            let (format, table) = decode_bytes(&bytes, format, first)?;
            if format == InputFormat::Binary && !is_plausible(&table) {
                let (_, retry) = decode_bytes(&bytes, Some(format), first.other())?;
                if is_plausible(&retry) {
                    info!("samples implausible as {first}-endian, using {}", first.other());
                    (format, retry, first.other())
                } else {
                    warn!("samples implausible in either byte order, keeping {first}");
                    (format, table, first)
                }
            } else {
                (format, table, first)
            }
        }
    };

    info!(
        "decoded {} as {format}: {} channels, {} records",
        input.display(),
        table.column_count(),
        table.record_count()
    );
    Ok(Decoded {
        path: input.to_path_buf(),
        bytes: bytes.len() as u64,
        format,
        endianness: (format == InputFormat::Binary).then_some(endianness),
        table,
    })
}

/// A byte-order mix-up shows up as NaNs, infinities, subnormals (round
/// values swapped end to end) or absurd magnitudes.
fn is_plausible(table: &DecodedTable) -> bool {
    table
        .columns()
        .flat_map(|column| column.values().iter())
        .all(|value| *value == 0.0 || (value.is_normal() && value.abs() <= PLAUSIBLE_MAGNITUDE))
}

fn cmd_info(input: PathBuf, args: DecodeArgs, json: bool, pretty: bool) -> Result<(), CliError> {
    let resolved_input = locate_input(&input)?;
    let decoded = decode_input(&resolved_input, &args)?;
    let summary = decoded.summary();

    if json {
        let text = if pretty {
            serde_json::to_string_pretty(&summary)
        } else {
            serde_json::to_string(&summary)
        }
        .context("JSON serialization failed")?;
        println!("{}", text);
        return Ok(());
    }

    print!("{}", render_summary(&summary));
    Ok(())
}

fn render_summary(summary: &TableSummary) -> String {
    let rule = "-".repeat(49);
    let mut out = String::new();
    if let Some(name) = &summary.experiment_name {
        out.push_str(&format!("Name: {}\n", name));
    }
    out.push_str(&format!("Number of records: {}\n", summary.record_count));
    out.push_str(&format!("Number of columns: {}\n", summary.column_count));
    if let (Some(sweep), Some(timestamp)) = (summary.legacy_sweep, summary.legacy_timestamp) {
        out.push_str(&format!("Swp: {}\ndtime: {}\n", sweep, timestamp));
    }
    out.push('\n');
    out.push_str(&format!("{rule}\n"));
    out.push_str(&format!("|{:>15}|{:>15}|{:>15}|\n", "Name", "Unit", "Records"));
    out.push_str(&format!("{rule}\n"));
    for channel in &summary.channels {
        out.push_str(&format!(
            "|{:>15}|{:>15}|{:>15}|\n",
            channel.name, channel.units, channel.sample_count
        ));
    }
    out.push_str(&format!("{rule}\n"));
    out
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    summary: &'a TableSummary,
    layout: Layout,
    columns: Vec<&'a str>,
    rows: Vec<Vec<Option<f64>>>,
}

#[allow(clippy::too_many_arguments)]
fn cmd_export(
    input: PathBuf,
    args: DecodeArgs,
    output: Option<PathBuf>,
    stdout: bool,
    kind: OutputKind,
    layout: Layout,
    pretty: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let resolved_input = locate_input(&input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;
    let output = if stdout {
        None
    } else {
        Some(output.ok_or_else(|| {
            CliError::new("missing output path").with_hint("use -o/--output or --stdout")
        })?)
    };

    if let Some(output_path) = output.as_ref() {
        ensure_distinct_output(output_path, &input_abs)?;
    }
    if pretty && kind != OutputKind::Json {
        return Err(CliError::new("--pretty only applies to JSON output")
            .with_hint("add --as json or drop --pretty"));
    }

    let decoded = decode_input(&resolved_input, &args)?;
    let rendered = match kind {
        OutputKind::Csv => render_csv(&decoded.table, layout)?,
        OutputKind::Json => render_json(&decoded, layout, pretty)?,
    };

    let Some(output) = output else {
        std::io::stdout()
            .write_all(rendered.as_bytes())
            .context("Failed to write to stdout")?;
        return Ok(());
    };

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(&output, rendered)
        .with_context(|| format!("Failed to write output: {}", output.display()))?;

    if !quiet {
        eprintln!("OK: {} rows written -> {}", row_count(&decoded.table, layout), output.display());
    }
    Ok(())
}

fn row_count(table: &DecodedTable, layout: Layout) -> usize {
    match layout {
        Layout::Truncated => table.shortest_column_len(),
        Layout::Padded | Layout::Ragged => table.record_count(),
    }
}

fn render_csv(table: &DecodedTable, layout: Layout) -> Result<String, CliError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(table.channels.iter().map(|c| c.name.as_str()))
        .context("CSV serialization failed")?;
    for row in assemble_rows(table, layout) {
        let cells = row
            .into_iter()
            .map(|cell| cell.map(|value| value.to_string()).unwrap_or_default());
        writer.write_record(cells).context("CSV serialization failed")?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("CSV serialization failed: {}", err))?;
    String::from_utf8(bytes)
        .context("CSV output is not UTF-8")
        .map_err(Into::into)
}

fn render_json(decoded: &Decoded, layout: Layout, pretty: bool) -> Result<String, CliError> {
    let summary = decoded.summary();
    let document = ExportDocument {
        summary: &summary,
        layout,
        columns: decoded
            .table
            .channels
            .iter()
            .map(|c| c.name.as_str())
            .collect(),
        rows: assemble_rows(&decoded.table, layout),
    };
    let mut json = if pretty {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    }
    .context("JSON serialization failed")?;
    json.push('\n');
    Ok(json)
}

fn ensure_distinct_output(output_path: &Path, input_abs: &Path) -> Result<(), CliError> {
    let output_dir = output_path
        .parent()
        .map(|parent| {
            if parent.as_os_str().is_empty() {
                fs::canonicalize(".")
            } else {
                fs::canonicalize(parent)
            }
        })
        .transpose();
    // A parent that does not exist yet cannot contain the input.
    let Ok(Some(output_dir)) = output_dir else {
        return Ok(());
    };
    let file_name = output_path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid output path"))?;
    if output_dir.join(file_name) == input_abs {
        return Err(CliError::new(format!(
            "output path must differ from input: {}",
            output_path.display()
        ))
        .with_hint("export would overwrite the experiment file; choose another path"));
    }
    Ok(())
}

/// Resolve `input` to one existing file. A glob pattern must match exactly
/// one file, since every export writes a single table.
fn locate_input(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    let path = if is_glob_pattern(&pattern) {
        expand_single_match(&pattern)?
    } else {
        input.to_path_buf()
    };

    if path.is_dir() {
        return Err(CliError::new(format!("input is a directory: {}", path.display()))
            .with_hint("pass one experiment file, or a pattern such as 'runs/p4581*' matching one"));
    }
    if !path.is_file() {
        return Err(CliError::new(format!("input file not found: {}", path.display()))
            .with_hint("pass an xlook binary or text file"));
    }
    Ok(path)
}

fn expand_single_match(pattern: &str) -> Result<PathBuf, CliError> {
    let entries = glob(pattern).map_err(|err| {
        CliError::new(format!("invalid input pattern '{}': {}", pattern, err.msg))
            .with_hint("quote the pattern so the shell does not expand it")
    })?;
    let matches: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|path| path.is_file())
        .collect();

    match matches.as_slice() {
        [] => Err(CliError::new(format!("no files match pattern '{}'", pattern))
            .with_hint("check the path or quote the pattern")),
        [single] => Ok(single.clone()),
        many => {
            let mut listed = many
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            if many.len() > 3 {
                listed.push_str(", ...");
            }
            Err(CliError::new(format!(
                "multiple files match pattern '{}' ({} matches): {}",
                pattern,
                many.len(),
                listed
            ))
            .with_hint("narrow the pattern to a single experiment file"))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    glob::Pattern::escape(input) != input
}

/// Refuse an explicit `--format` that contradicts the file's content.
fn check_declared_format(input: &Path, bytes: &[u8], declared: InputFormat) -> Result<(), CliError> {
    if bytes.is_empty() {
        return Err(CliError::new(format!("input file is empty: {}", input.display()))
            .with_hint("the experiment file may not have been written yet"));
    }
    let detected = detect_format(bytes);
    if detected != declared {
        return Err(CliError::new(format!(
            "{} looks like xlook {} data, not {}",
            input.display(),
            detected,
            declared
        ))
        .with_hint(format!("use --format {} or --format auto", detected)));
    }
    Ok(())
}
