//! nullguard CLI - reports outer-join fields used without null guards

mod args;
mod config;
mod output;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use nullguard_core::{analyze, DiagnosticKind, NodeId, RawDocument, SyntaxTree};

use crate::args::{Args, Command};
use crate::config::Config;
use crate::output::{DocumentResult, OutputFormatter};

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(has_errors) => {
            if has_errors {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(args: Args) -> Result<bool> {
    match args.command {
        Command::Check {
            files,
            config: config_path,
            disable,
            format,
        } => {
            let config = if let Some(path) = config_path {
                Config::from_file(&path)?
            } else {
                Config::find_and_load()?.unwrap_or_default()
            };

            // CLI takes precedence over the config file
            let config = config.merge_with_args(&files, &format, &disable);
            let output_format = config.output_format();

            let mut tree_files = Vec::new();
            for pattern in &config.files {
                if pattern.contains('*') {
                    for path in glob::glob(pattern).into_diagnostic()?.flatten() {
                        tree_files.push(path);
                    }
                } else {
                    tree_files.push(PathBuf::from(pattern));
                }
            }

            if tree_files.is_empty() {
                miette::bail!(
                    "No tree documents specified. Use positional arguments or configure in nullguard.toml"
                );
            }

            let disabled_rules: HashSet<String> = config.disable.iter().cloned().collect();
            let is_enabled = |kind: DiagnosticKind| !disabled_rules.contains(kind.code());

            let mut total_findings = 0;
            let mut total_failures = 0;

            for tree_file in &tree_files {
                let document = load_document(tree_file)?;
                let tree = SyntaxTree::from_raw(&document.roots).into_diagnostic()?;
                tracing::info!(file = %tree_file.display(), nodes = tree.len(), "analyzing");

                let report = analyze(&tree);
                let result = DocumentResult {
                    findings: report
                        .findings
                        .iter()
                        .filter(|finding| is_enabled(finding.kind))
                        .collect(),
                    failures: if is_enabled(DiagnosticKind::AnalysisFailed) {
                        report.failures.iter().collect()
                    } else {
                        Vec::new()
                    },
                    source: document.source.as_deref(),
                };

                if result.count() > 0 {
                    let formatter =
                        OutputFormatter::new(output_format, tree_file.display().to_string());
                    formatter.print_result(&result);
                    total_findings += result.findings.len();
                    total_failures += result.failures.len();
                }
            }

            if !args.quiet {
                if total_findings > 0 || total_failures > 0 {
                    eprintln!();
                    eprintln!(
                        "Found {} finding(s), {} failed join check(s) in {} file(s)",
                        total_findings,
                        total_failures,
                        tree_files.len()
                    );
                } else {
                    eprintln!("All {} file(s) passed validation", tree_files.len());
                }
            }

            Ok(total_findings > 0 || total_failures > 0)
        }

        Command::Tree { file } => {
            let document = load_document(&file)?;
            let tree = SyntaxTree::from_raw(&document.roots).into_diagnostic()?;

            for (i, &root) in tree.roots().iter().enumerate() {
                println!("Tree {}:", i + 1);
                print_node(&tree, root, 1);
                println!();
            }

            Ok(false)
        }
    }
}

fn load_document(path: &Path) -> Result<RawDocument> {
    let content = fs::read_to_string(path).into_diagnostic()?;
    serde_json::from_str(&content).into_diagnostic()
}

fn print_node(tree: &SyntaxTree, node: NodeId, depth: usize) {
    let span = tree.span(node);
    let indent = "  ".repeat(depth);
    match tree.text(node) {
        Some(text) => println!(
            "{}{:?} {:?} @{}..{}",
            indent,
            tree.kind(node),
            text,
            span.offset,
            span.end()
        ),
        None => println!("{}{:?} @{}..{}", indent, tree.kind(node), span.offset, span.end()),
    }
    for &child in tree.children(node) {
        print_node(tree, child, depth + 1);
    }
}
