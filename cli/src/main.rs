mod error;
mod logger;
mod path_args;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use error::CliError;
use geogen::analyzer::filters::TemplateLibrary;
use geogen::parser::{parse_input, parse_templates, TemplateTheorem};
use geogen::runner::{run_input, ShutdownFlag};
use geogen::RunOptions;
use log::LevelFilter;
use path_args::files_in_directory;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const APP_VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

fn app() -> App<'static, 'static> {
    let subcommand = SubCommand::with_name("run")
        .about("Generates configurations from the input files and reports their theorems")
        .setting(AppSettings::DisableVersion)
        .arg(
            Arg::with_name("inputs")
                .long("inputs")
                .takes_value(true)
                .required(true)
                .help("Directory containing generator input files"),
        )
        .arg(
            Arg::with_name("templates")
                .long("templates")
                .takes_value(true)
                .help("Directory containing template theorem files"),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .takes_value(true)
                .required(true)
                .help("Directory the reports are written to"),
        )
        .arg(
            Arg::with_name("iterations")
                .long("iterations")
                .takes_value(true)
                .default_value("3")
                .help("Number of construction steps the generator may take"),
        )
        .arg(
            Arg::with_name("pictures")
                .long("pictures")
                .takes_value(true)
                .default_value("5")
                .help("Number of randomized pictures per configuration (at least 2)"),
        )
        .arg(
            Arg::with_name("workers")
                .long("workers")
                .takes_value(true)
                .help("Size of the analysis worker pool; defaults to the available cores"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .help("Seed for picture randomness; makes single-worker runs reproducible"),
        )
        .arg(
            Arg::with_name("output-prefix")
                .long("output-prefix")
                .takes_value(true)
                .default_value("output_")
                .help("Prefix of the report file names"),
        )
        .arg(
            Arg::with_name("output-ext")
                .long("output-ext")
                .takes_value(true)
                .default_value("txt")
                .help("Extension of the report file names"),
        );
    App::new("geogen")
        .version(APP_VERSION.unwrap_or("unknown"))
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(subcommand)
}

fn log_level_from_env() -> LevelFilter {
    match std::env::var("GEOGEN_LOG_LEVEL").as_deref() {
        Ok("error") => LevelFilter::Error,
        Ok("warn") | Err(_) => LevelFilter::Warn,
        Ok("info") => LevelFilter::Info,
        Ok("debug") => LevelFilter::Debug,
        Ok(other) => {
            eprintln!("unknown GEOGEN_LOG_LEVEL '{}', using 'warn'", other);
            LevelFilter::Warn
        }
    }
}

fn main() {
    logger::init(log_level_from_env(), true);
    let matches = app().get_matches();
    if let Err(e) = run_app(&matches) {
        log::error!("{}", e);
        std::process::exit(e.exit_code());
    }
}

fn run_app(matches: &ArgMatches) -> Result<(), CliError> {
    if let Some(matches) = matches.subcommand_matches("run") {
        run_subcommand(matches)
    } else {
        unreachable!()
    }
}

fn parse_arg<T: std::str::FromStr>(matches: &ArgMatches, name: &str) -> Result<T, CliError> {
    let value = matches.value_of(name).unwrap();
    value
        .parse()
        .map_err(|_| CliError::InvalidArgument(format!("--{} {}", name, value)))
}

fn run_subcommand(matches: &ArgMatches) -> Result<(), CliError> {
    let mut options = RunOptions {
        iterations: parse_arg(matches, "iterations")?,
        pictures: parse_arg(matches, "pictures")?,
        ..RunOptions::default()
    };
    if matches.is_present("workers") {
        options.workers = parse_arg(matches, "workers")?;
    }
    if matches.is_present("seed") {
        options.seed = Some(parse_arg(matches, "seed")?);
    }

    let templates = match matches.value_of("templates") {
        Some(dir) => load_templates(Path::new(dir))?,
        None => TemplateLibrary::default(),
    };

    let input_dir = PathBuf::from(matches.value_of("inputs").unwrap());
    let output_dir = PathBuf::from(matches.value_of("output").unwrap());
    let prefix = matches.value_of("output-prefix").unwrap();
    let extension = matches.value_of("output-ext").unwrap();

    let input_files = files_in_directory(&input_dir)?;
    if input_files.is_empty() {
        log::warn!("no input files found in {}", input_dir.display());
        return Ok(());
    }
    std::fs::create_dir_all(&output_dir)?;

    let shutdown = ShutdownFlag::new();
    for path in input_files {
        let input = {
            let file = File::open(&path)?;
            parse_input(BufReader::new(file)).map_err(|inner| CliError::Input {
                file: path.clone(),
                inner,
            })?
        };
        let stem = path
            .file_stem()
            .map_or_else(|| "input".to_owned(), |s| s.to_string_lossy().into_owned());
        let output_path = output_dir.join(format!("{}{}.{}", prefix, stem, extension));
        let mut dest = BufWriter::new(File::create(&output_path)?);
        let summary =
            run_input(&input, &templates, &options, &shutdown, &mut dest).map_err(|inner| {
                match inner {
                    geogen::Error::InitialConfiguration(_) => CliError::Startup {
                        file: path.clone(),
                        inner,
                    },
                    other => CliError::Geogen(other),
                }
            })?;
        log::info!(
            "{}: {} configurations analyzed, {} skipped, {} theorems -> {}",
            path.display(),
            summary.analyzed,
            summary.skipped,
            summary.theorems,
            output_path.display()
        );
    }
    Ok(())
}

fn load_templates(dir: &Path) -> Result<TemplateLibrary, CliError> {
    let mut templates: Vec<TemplateTheorem> = Vec::new();
    for path in files_in_directory(dir)? {
        let name = path.file_name().map_or_else(
            || path.display().to_string(),
            |s| s.to_string_lossy().into_owned(),
        );
        let file = File::open(&path)?;
        let parsed = parse_templates(BufReader::new(file), &name).map_err(CliError::Template)?;
        templates.extend(parsed);
    }
    log::info!("loaded {} template theorems", templates.len());
    Ok(TemplateLibrary::new(templates))
}
