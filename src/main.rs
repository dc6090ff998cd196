// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pipegraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Pipegraph CLI entrypoint.
//!
//! By default this runs the interactive TUI on the built-in pipeline (or `--diagram <file>`).
//! `--check`, `--print` and `--print-schema` are non-interactive.

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use pipegraph::ingest::IngestService;
use pipegraph::layout::BoardSize;
use pipegraph::model::PipelineDiagram;
use pipegraph::overlay::OverlayCategory;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--diagram <file>] [--frontend <file>] [--mvo <file>] [--ingest-timeout-ms <ms>] [--log-file <file>]\n  {program} [--diagram <file>] --check\n  {program} [--diagram <file>] --print [--size <WxH>]\n  {program} --print-schema\n\nWithout --diagram the built-in pipeline is shown.\n--frontend/--mvo load a JSON summary into the matching overlay panel at startup.\n--log-file enables logging; the filter is read from PIPEGRAPH_LOG (default: info)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    diagram: Option<PathBuf>,
    frontend: Option<PathBuf>,
    mvo: Option<PathBuf>,
    ingest_timeout_ms: Option<u64>,
    log_file: Option<PathBuf>,
    check: bool,
    print: bool,
    size: Option<BoardSize>,
    print_schema: bool,
}

fn set_once<T>(slot: &mut Option<T>, value: T) -> Result<(), ()> {
    if slot.is_some() {
        return Err(());
    }
    *slot = Some(value);
    Ok(())
}

fn set_flag(flag: &mut bool) -> Result<(), ()> {
    if *flag {
        return Err(());
    }
    *flag = true;
    Ok(())
}

fn parse_size(raw: &str) -> Result<BoardSize, ()> {
    let (width, height) = raw.split_once(['x', 'X']).ok_or(())?;
    let width: usize = width.parse().map_err(|_| ())?;
    let height: usize = height.parse().map_err(|_| ())?;
    if width == 0 || height == 0 {
        return Err(());
    }
    Ok(BoardSize::new(width, height))
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--diagram" => set_once(&mut options.diagram, PathBuf::from(args.next().ok_or(())?))?,
            "--frontend" => set_once(&mut options.frontend, PathBuf::from(args.next().ok_or(())?))?,
            "--mvo" => set_once(&mut options.mvo, PathBuf::from(args.next().ok_or(())?))?,
            "--log-file" => set_once(&mut options.log_file, PathBuf::from(args.next().ok_or(())?))?,
            "--ingest-timeout-ms" => {
                let raw = args.next().ok_or(())?;
                let ms: u64 = raw.parse().map_err(|_| ())?;
                set_once(&mut options.ingest_timeout_ms, ms)?;
            }
            "--size" => {
                let raw = args.next().ok_or(())?;
                set_once(&mut options.size, parse_size(&raw)?)?;
            }
            "--check" => set_flag(&mut options.check)?,
            "--print" => set_flag(&mut options.print)?,
            "--print-schema" => set_flag(&mut options.print_schema)?,
            _ => return Err(()),
        }
    }

    let modes = [options.check, options.print, options.print_schema]
        .into_iter()
        .filter(|mode| *mode)
        .count();
    if modes > 1 {
        return Err(());
    }
    if options.size.is_some() && !options.print {
        return Err(());
    }
    if options.print_schema && options.diagram.is_some() {
        return Err(());
    }
    let interactive_only = options.frontend.is_some()
        || options.mvo.is_some()
        || options.ingest_timeout_ms.is_some();
    if modes > 0 && interactive_only {
        return Err(());
    }

    Ok(options)
}

fn load_diagram(options: &CliOptions) -> Result<PipelineDiagram, Box<dyn Error>> {
    match &options.diagram {
        Some(path) => Ok(pipegraph::store::load_diagram(path)?),
        None => Ok(pipegraph::model::builtin_pipeline()?),
    }
}

fn check_summary(diagram: &PipelineDiagram) -> String {
    format!(
        "ok: {} anchors, {} connectors",
        diagram.anchors().len(),
        diagram.connectors().len()
    )
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "pipegraph".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        if let Some(path) = &options.log_file {
            pipegraph::logging::init_file_logging(path).map_err(|err| err.to_string())?;
        }

        if options.print_schema {
            println!("{}", pipegraph::store::diagram_file_schema());
            return Ok(());
        }

        let diagram = load_diagram(&options)?;
        tracing::info!(
            anchors = diagram.anchors().len(),
            connectors = diagram.connectors().len(),
            source = options
                .diagram
                .as_ref()
                .map_or_else(|| "builtin".to_owned(), |path| path.display().to_string()),
            "diagram ready"
        );

        if options.check {
            println!("{}", check_summary(&diagram));
            return Ok(());
        }

        if options.print {
            let board =
                pipegraph::render::render_diagram_text(&diagram, options.size.unwrap_or_default())?;
            println!("{}", board.to_trimmed_string());
            return Ok(());
        }

        let preload = [
            (OverlayCategory::FrontendSummary, options.frontend.clone()),
            (OverlayCategory::OptimizerSummary, options.mvo.clone()),
        ]
        .into_iter()
        .filter_map(|(category, path)| path.map(|path| (category, path)))
        .collect::<Vec<_>>();
        let timeout = options.ingest_timeout_ms.map(Duration::from_millis);

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        let ingest = IngestService::new(runtime.handle().clone()).with_timeout(timeout);

        runtime.block_on(async move {
            let tui_join = tokio::task::spawn_blocking(move || {
                pipegraph::tui::run(diagram, ingest, preload).map_err(|err| err.to_string())
            })
            .await;

            let tui_result = tui_join.map_err(|err| -> Box<dyn Error> { Box::new(err) })?;
            tui_result.map_err(|err| {
                Box::new(std::io::Error::new(std::io::ErrorKind::Other, err)) as Box<dyn Error>
            })?;
            Ok::<(), Box<dyn Error>>(())
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("pipegraph: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pipegraph::layout::BoardSize;

    use super::{check_summary, parse_options, parse_size, CliOptions};

    fn args(values: &[&str]) -> impl Iterator<Item = String> {
        values
            .iter()
            .map(|value| (*value).to_owned())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn parses_empty_args() {
        let options = parse_options(std::iter::empty()).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_tui_options() {
        let options = parse_options(args(&[
            "--diagram",
            "pipe.json",
            "--frontend",
            "runs/frontend.json",
            "--mvo",
            "runs/mvo.json",
            "--ingest-timeout-ms",
            "1500",
            "--log-file",
            "pipegraph.log",
        ]))
        .expect("parse options");

        assert_eq!(options.diagram, Some(PathBuf::from("pipe.json")));
        assert_eq!(options.frontend, Some(PathBuf::from("runs/frontend.json")));
        assert_eq!(options.mvo, Some(PathBuf::from("runs/mvo.json")));
        assert_eq!(options.ingest_timeout_ms, Some(1500));
        assert_eq!(options.log_file, Some(PathBuf::from("pipegraph.log")));
        assert!(!options.check && !options.print && !options.print_schema);
    }

    #[test]
    fn parses_print_with_size() {
        let options =
            parse_options(args(&["--print", "--size", "160x60"])).expect("parse options");
        assert!(options.print);
        assert_eq!(options.size, Some(BoardSize::new(160, 60)));
    }

    #[test]
    fn parses_check_with_diagram_in_any_order() {
        let options =
            parse_options(args(&["--check", "--diagram", "d.json"])).expect("parse options");
        assert!(options.check);
        assert_eq!(options.diagram, Some(PathBuf::from("d.json")));
    }

    #[test]
    fn rejects_invalid_combinations_and_values() {
        for bad in [
            &["--check", "--print"][..],
            &["--print-schema", "--diagram", "d.json"],
            &["--size", "100x40"],
            &["--check", "--frontend", "f.json"],
            &["--frontend"],
            &["--frontend", "a.json", "--frontend", "b.json"],
            &["--ingest-timeout-ms", "soon"],
            &["--print", "--size", "0x10"],
            &["--verbose"],
            &["positional.json"],
        ] {
            assert!(parse_options(args(bad)).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn size_accepts_either_x() {
        assert_eq!(parse_size("140X55"), Ok(BoardSize::new(140, 55)));
        assert!(parse_size("140").is_err());
        assert!(parse_size("x55").is_err());
    }

    #[test]
    fn check_summary_counts_builtin_pipeline() {
        let diagram = pipegraph::model::builtin_pipeline().expect("builtin pipeline");
        let summary = check_summary(&diagram);
        assert!(summary.starts_with("ok: "), "{summary}");
        assert!(summary.contains(&format!("{} anchors", diagram.anchors().len())));
    }
}
