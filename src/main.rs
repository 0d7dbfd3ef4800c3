use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use cfgcheck::check::AssertionDocument;
use cfgcheck::discovery;
use cfgcheck::dump::DumpDocument;
use cfgcheck::matching;

#[derive(Parser)]
#[command(
    name = "cfgcheck",
    about = "Match embedded test assertions against compiler CFG dumps"
)]
struct Cli {
    /// C1visualizer dump produced by the compiler
    dump_file: PathBuf,

    /// Source file, or directory searched recursively for .java files
    source: Option<PathBuf>,

    /// Prefix of assertion directives in source comments
    #[arg(long, default_value = "CHECK", value_name = "PREFIX")]
    check_prefix: String,

    /// Print the names of all pass groups in the dump and exit
    #[arg(long)]
    list_groups: bool,

    /// Print the body of one pass group and exit
    #[arg(long, value_name = "GROUP")]
    dump_group: Option<String>,

    /// Suppress non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn load_dump(path: &Path) -> anyhow::Result<DumpDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dump file: {}", path.display()))?;
    Ok(DumpDocument::parse(&path.display().to_string(), &content)?)
}

fn cmd_list_groups(dump: &DumpDocument) -> i32 {
    for group in &dump.groups {
        println!("{}", group.name);
    }
    0
}

fn cmd_dump_group(dump: &DumpDocument, name: &str) -> i32 {
    match dump.find_group(name) {
        Some(group) => {
            println!("{}", group.body.join("\n"));
            0
        }
        None => {
            eprintln!("[cfgcheck] error: pass group \"{name}\" not found in the dump");
            1
        }
    }
}

fn cmd_check(dump: &DumpDocument, source: &Path, prefix: &str, quiet: bool) -> anyhow::Result<i32> {
    let files = discovery::collect_assertion_files(source);
    if files.is_empty() {
        anyhow::bail!("no assertion files found under {}", source.display());
    }

    for file in &files {
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("failed to read source file: {}", file.display()))?;
        let doc = AssertionDocument::parse(&file.display().to_string(), &content, prefix)?;
        for case in &doc.cases {
            // Announce the case before matching so a failure still shows
            // which case was in flight.
            if !quiet {
                print!("TEST {}... ", case.name);
                std::io::stdout().flush().ok();
            }
            match matching::match_case(&doc, case, dump) {
                Ok(()) => {
                    if !quiet {
                        println!("PASSED");
                    }
                }
                Err(e) => {
                    if !quiet {
                        println!("FAILED!");
                    }
                    return Err(e.into());
                }
            }
        }
    }
    Ok(0)
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    let dump = load_dump(&cli.dump_file)?;

    if cli.list_groups {
        return Ok(cmd_list_groups(&dump));
    }
    if let Some(name) = &cli.dump_group {
        return Ok(cmd_dump_group(&dump, name));
    }

    let Some(source) = &cli.source else {
        anyhow::bail!("missing source file or directory to check");
    };
    cmd_check(&dump, source, &cli.check_prefix, cli.quiet)
}

fn main() {
    let cli = Cli::parse();
    let exit_code = run(&cli).unwrap_or_else(|e| {
        eprintln!("[cfgcheck] error: {e:#}");
        1
    });
    std::process::exit(exit_code);
}
