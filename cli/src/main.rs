mod test_runner;

use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use log::debug;

use dry::{DocumentNode, ParseError};

#[derive(Parser)]
#[command(name = "dry", version, about = "DRY document checker")]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse .dry files and report the first error in each
    Check(CheckArgs),

    /// Run .test.dry case files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct CheckArgs {
    /// DRY source files to parse
    #[arg(required = true)]
    files: Vec<String>,

    /// Dump the parsed tree
    #[arg(long, conflicts_with_all = ["json", "list_sections"])]
    ast: bool,

    /// Dump the parsed tree as JSON
    #[arg(long, conflicts_with = "list_sections")]
    json: bool,

    /// List the section ids of each file
    #[arg(long)]
    list_sections: bool,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.dry file or directory containing them
    path: String,

    /// Run only cases in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Check(args) => {
            let exit_code = do_check(&args, cli.no_color);
            process::exit(exit_code);
        }
        Command::Test(test_args) => {
            let path = Path::new(&test_args.path);
            if test_args.list_categories {
                test_runner::list_categories(path);
                return;
            }
            let exit_code = test_runner::run_tests(path, cli.no_color, &test_args.category);
            process::exit(exit_code);
        }
    }
}

/// Parse every file, printing diagnostics or the requested dump.
/// Returns 1 if any file failed.
fn do_check(args: &CheckArgs, no_color: bool) -> i32 {
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();

    let mut files = SimpleFiles::new();
    let mut failed = 0usize;

    for path in &args.files {
        let source = match dry::read_source(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: {}", e);
                failed += 1;
                continue;
            }
        };

        let file_id = files.add(path.clone(), source.clone());
        debug!("checking {} as file {}", path, file_id);

        let doc = match dry::Parser::new(path.as_str(), source)
            .with_file_id(file_id)
            .parse()
        {
            Ok(doc) => doc,
            Err(error) => {
                emit_parse_error(&writer, &config, &files, &error);
                failed += 1;
                continue;
            }
        };

        if args.ast {
            println!("{:#?}", doc);
        } else if args.json {
            match serde_json::to_string_pretty(&doc) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("error: cannot serialize '{}': {}", path, e);
                    failed += 1;
                }
            }
        } else if args.list_sections {
            print_sections(&doc);
        } else {
            eprintln!("ok: {} parsed successfully", path);
        }
    }

    if failed == 0 { 0 } else { 1 }
}

fn emit_parse_error(
    writer: &StandardStream,
    config: &term::Config,
    files: &SimpleFiles<String, String>,
    error: &ParseError,
) {
    let diagnostic = error.to_diagnostic();
    let _ = term::emit_to_write_style(&mut writer.lock(), config, files, &diagnostic);
}

fn print_sections(doc: &DocumentNode) {
    let describe = |node: &DocumentNode| {
        let options = node.options.as_ref().map_or(0, |o| o.len());
        format!("{} ({} properties, {} options)", node.id, node.properties.len(), options)
    };
    match &doc.doc_type {
        Some(doc_type) => println!("{} [{}]", describe(doc), doc_type),
        None => println!("{}", describe(doc)),
    }
    for section in &doc.sections {
        println!("  @{}", describe(section));
    }
}
