// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod render;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tabula_core::validation::{parse_filter_arg, parse_page, parse_sort};
use tabula_core::{Dispute, RecordId, TableCommand, TableState};
use tabula_testkit::DisputeFaker;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "TABULA_LOG";
const DEFAULT_DEMO_SEED: u64 = 7;
const DEFAULT_DEMO_COUNT: usize = 57;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `tabula --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;
    init_logging(config.log_level());

    let records = load_records(&options)?;
    let mut state = build_state(&options, &config, &records)?;
    if options.check_only {
        println!("ok: {} records", records.len());
        return Ok(());
    }

    print!("{}", render_table(&mut state, &records, options.select_page));
    Ok(())
}

/// `TABULA_LOG` wins over `[log] level`.
fn init_logging(config_level: &str) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(config_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .ok();
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    records_path: Option<PathBuf>,
    demo: bool,
    seed: u64,
    count: usize,
    filters: Vec<String>,
    sort: Option<String>,
    page: Option<usize>,
    page_size: Option<usize>,
    select: Vec<i64>,
    select_page: bool,
    prune: bool,
    check_only: bool,
    show_help: bool,
}

impl CliOptions {
    fn new(config_path: PathBuf) -> Self {
        Self {
            config_path,
            print_config_path: false,
            print_example: false,
            records_path: None,
            demo: false,
            seed: DEFAULT_DEMO_SEED,
            count: DEFAULT_DEMO_COUNT,
            filters: Vec::new(),
            sort: None,
            page: None,
            page_size: None,
            select: Vec::new(),
            select_page: false,
            prune: false,
            check_only: false,
            show_help: false,
        }
    }
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions::new(default_config_path);

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let mut value = |what: &str| {
            iter.next()
                .map(|value| value.as_ref().to_owned())
                .ok_or_else(|| anyhow!("{} requires {what}", arg.as_ref()))
        };
        match arg.as_ref() {
            "--config" => {
                options.config_path = PathBuf::from(value("a file path")?);
            }
            "--records" => {
                options.records_path = Some(PathBuf::from(value("a file path")?));
            }
            "--demo" => {
                options.demo = true;
            }
            "--seed" => {
                let raw = value("a number")?;
                options.seed = raw
                    .parse()
                    .with_context(|| format!("invalid --seed {raw:?}"))?;
            }
            "--count" => {
                let raw = value("a number")?;
                options.count = raw
                    .parse()
                    .with_context(|| format!("invalid --count {raw:?}"))?;
            }
            "--filter" => {
                options.filters.push(value("name=value")?);
            }
            "--sort" => {
                options.sort = Some(value("field[:desc]")?);
            }
            "--page" => {
                options.page = Some(parse_page(&value("a page number")?)?);
            }
            "--page-size" => {
                options.page_size = Some(parse_page(&value("a page size")?)?);
            }
            "--select" => {
                let raw = value("a record id")?;
                options.select.push(
                    raw.parse()
                        .with_context(|| format!("invalid --select {raw:?}"))?,
                );
            }
            "--select-page" => {
                options.select_page = true;
            }
            "--prune" => {
                options.prune = true;
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn load_records(options: &CliOptions) -> Result<Vec<Dispute>> {
    let records = match (&options.records_path, options.demo) {
        (Some(_), true) => bail!("--records and --demo cannot be combined"),
        (Some(path), false) => read_records(path)?,
        (None, true) => DisputeFaker::new(options.seed).disputes(options.count),
        (None, false) => bail!("nothing to show; pass --records <file> or --demo"),
    };
    tracing::info!(count = records.len(), demo = options.demo, "records loaded");
    Ok(records)
}

fn read_records(path: &Path) -> Result<Vec<Dispute>> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("read records {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("decode records {}; expected a JSON array", path.display()))
}

/// Command-line flags win over config defaults. Filters go through the
/// same reducer commands an interactive table would send.
fn build_state(options: &CliOptions, config: &Config, records: &[Dispute]) -> Result<TableState> {
    let mut state = TableState::with_page_size(options.page_size.unwrap_or(config.page_size()));
    state.sort = match &options.sort {
        Some(raw) => parse_sort(&Dispute::SCHEMA, raw)?,
        None => config.sort(),
    };

    for raw in &options.filters {
        let (name, value) = parse_filter_arg(&Dispute::SCHEMA, raw)?;
        if Dispute::SCHEMA.resolve_filter(&name).is_none() {
            tracing::warn!(filter = %name, "unknown filter ignored");
        }
        state.dispatch(TableCommand::SetFilter { name, value });
    }

    if let Some(page) = options.page {
        state.dispatch(TableCommand::GoToPage(page));
    }

    for id in options.select.iter().copied().map(RecordId::new) {
        if !state.selection.contains(id) {
            state.dispatch(TableCommand::ToggleSelect(id));
        }
    }
    if options.prune {
        let live = records.iter().map(|record| record.id).collect();
        state.dispatch(TableCommand::PruneSelection(live));
    }
    Ok(state)
}

fn render_table(state: &mut TableState, records: &[Dispute], select_page: bool) -> String {
    if select_page {
        let page_ids = state.view(records, &Dispute::SCHEMA).page_ids();
        state.dispatch(TableCommand::ToggleSelectAllOnPage(page_ids));
    }
    let view = state.view(records, &Dispute::SCHEMA);
    render::render_view(&view, &state.selection)
}

fn print_help() {
    println!("tabula: filter, sort, page and select dispute records");
    println!("  --config <path>          Use a specific config path");
    println!("  --records <file>         Load disputes from a JSON array");
    println!("  --demo                   Use generated demo disputes");
    println!("  --seed <n>               Demo data seed (default {DEFAULT_DEMO_SEED})");
    println!("  --count <n>              Demo record count (default {DEFAULT_DEMO_COUNT})");
    println!("  --filter <name=value>    Add a filter, e.g. status=pending or amountRange=100..500");
    println!("  --sort <field[:desc]>    Sort by a field");
    println!("  --page <n>               Show page n (clamped to the last page)");
    println!("  --page-size <n>          Rows per page");
    println!("  --select <id>            Select a record id (repeatable)");
    println!("  --select-page            Toggle select-all on the shown page");
    println!("  --prune                  Drop selected ids missing from the records");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --check                  Validate config, records and flags, then exit");
    println!("  --help                   Show this help");
    println!("Set {LOG_ENV}=debug to log view recomputation to stderr.");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, build_state, load_records, parse_cli_args, render_table};
    use crate::config::Config;
    use anyhow::Result;
    use std::path::PathBuf;
    use tabula_core::{RecordId, SortDirection, SortState};
    use tabula_testkit::{sample_disputes, temp_json_path, write_disputes_json};

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/tabula-config.toml")
    }

    fn options(args: &[&str]) -> Result<CliOptions> {
        parse_cli_args(args.iter().copied(), default_options_path())
    }

    fn run(args: &[&str]) -> Result<String> {
        let options = options(args)?;
        let records = load_records(&options)?;
        let mut state = build_state(&options, &Config::default(), &records)?;
        Ok(render_table(&mut state, &records, options.select_page))
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(options, CliOptions::new(default_options_path()));
        Ok(())
    }

    #[test]
    fn parse_cli_args_collects_repeated_flags() -> Result<()> {
        let options = options(&[
            "--demo",
            "--seed",
            "3",
            "--filter",
            "status=pending",
            "--filter",
            "amountRange=100..",
            "--select",
            "4",
            "--select",
            "9",
            "--page-size",
            "5",
        ])?;
        assert!(options.demo);
        assert_eq!(options.seed, 3);
        assert_eq!(options.filters, vec!["status=pending", "amountRange=100.."]);
        assert_eq!(options.select, vec![4, 9]);
        assert_eq!(options.page_size, Some(5));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_value() {
        let error = options(&["--config"]).expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));

        let error = options(&["--filter"]).expect_err("missing filter should fail");
        assert!(error.to_string().contains("--filter requires name=value"));
    }

    #[test]
    fn parse_cli_args_rejects_bad_numbers() {
        assert!(options(&["--page", "0"]).is_err());
        assert!(options(&["--page-size", "-2"]).is_err());
        let error = options(&["--select", "abc"]).expect_err("bad id should fail");
        assert!(error.to_string().contains("invalid --select"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = options(&["--wat"]).expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn records_source_is_required_and_exclusive() -> Result<()> {
        let error = load_records(&options(&[])?).expect_err("no source should fail");
        assert!(error.to_string().contains("--records <file> or --demo"));

        let error = load_records(&options(&["--demo", "--records", "x.json"])?)
            .expect_err("two sources should fail");
        assert!(error.to_string().contains("cannot be combined"));
        Ok(())
    }

    #[test]
    fn demo_second_page_summary() -> Result<()> {
        let output = run(&["--demo", "--page", "2"])?;
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 12);
        assert!(lines[0].contains("DSP-0011"), "{}", lines[0]);
        assert_eq!(lines[10], "page 2/6 | showing 11-20 of 57");
        assert_eq!(lines[11], "selected 0");
        Ok(())
    }

    #[test]
    fn records_file_with_filter_sort_and_selection() -> Result<()> {
        let (_dir, path) = temp_json_path()?;
        write_disputes_json(&path, &sample_disputes())?;
        let path = path.display().to_string();

        let output = run(&[
            "--records",
            &path,
            "--filter",
            "amountRange=100..600",
            "--sort",
            "amount:desc",
            "--select",
            "8",
            "--select",
            "2",
        ])?;
        let lines: Vec<&str> = output.lines().collect();
        let references: Vec<&str> = lines[..5].iter().map(|line| &line[4..12]).collect();
        assert_eq!(
            references,
            vec!["DSP-0005", "DSP-0008", "DSP-0001", "DSP-0006", "DSP-0012"]
        );
        assert!(lines[1].starts_with("[x]"));
        assert_eq!(lines[5], "page 1/1 | showing 1-5 of 5");
        assert_eq!(lines[6], "selected 2 (1 hidden by filters)");
        Ok(())
    }

    #[test]
    fn repeated_select_keeps_record_selected() -> Result<()> {
        let options = options(&["--demo", "--count", "12", "--select", "4", "--select", "4"])?;
        let records = load_records(&options)?;
        let state = build_state(&options, &Config::default(), &records)?;
        assert_eq!(state.selected_ids(), vec![RecordId::new(4)]);
        Ok(())
    }

    #[test]
    fn out_of_range_page_is_clamped() -> Result<()> {
        let output = run(&["--demo", "--count", "12", "--page", "9", "--page-size", "5"])?;
        assert!(output.contains("page 3/3 | showing 11-12 of 12"), "{output}");
        Ok(())
    }

    #[test]
    fn select_page_and_prune() -> Result<()> {
        let output = run(&[
            "--demo",
            "--count",
            "8",
            "--page-size",
            "3",
            "--select",
            "99",
            "--prune",
            "--select-page",
        ])?;
        assert!(output.lines().take(3).all(|line| line.starts_with("[x]")), "{output}");
        assert!(output.ends_with("selected 3\n"), "{output}");
        Ok(())
    }

    #[test]
    fn flags_override_config_defaults() -> Result<()> {
        let options = options(&["--demo", "--sort", "opened:desc", "--page-size", "4"])?;
        let records = load_records(&options)?;
        let state = build_state(&options, &Config::default(), &records)?;
        assert_eq!(state.sort, SortState::by("opened", SortDirection::Desc));
        assert_eq!(state.pagination.page_size(), 4);
        assert!(state.selection.is_empty());
        Ok(())
    }

    #[test]
    fn invalid_sort_flag_is_rejected() -> Result<()> {
        let options = options(&["--demo", "--sort", "color"])?;
        let records = load_records(&options)?;
        assert!(build_state(&options, &Config::default(), &records).is_err());
        Ok(())
    }
}
