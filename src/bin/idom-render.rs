use nulltrace_idom::{IdomError, RenderScript};
use std::env;
use std::fs;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: idom-render <script.yaml>...");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  idom-render page.yaml");
        eprintln!("  RUST_LOG=debug idom-render *.yaml");
        process::exit(1);
    }

    let mut exit_code = 0;

    for file_path in &args[1..] {
        match render_file(file_path) {
            Ok(output) => print!("{}", output),
            Err(e) => {
                eprintln!("✗ {} failed to render:", file_path);
                print_error(&e);
                exit_code = 1;
            }
        }
    }

    process::exit(exit_code);
}

fn render_file(path: &str) -> Result<String, IdomError> {
    let content = fs::read_to_string(path)
        .map_err(|e| IdomError::Script(format!("Failed to read file: {}", e)))?;

    let output = RenderScript::from_yaml(&content)?.render()?;

    let mut rendered = format!("{}\n", output.markup);
    for (name, target) in &output.targets {
        rendered.push_str(&format!("[{}] {}\n", name, target.inner_html()));
    }
    Ok(rendered)
}

fn print_error(error: &IdomError) {
    match error {
        IdomError::MismatchedTag { expected, found } => {
            eprintln!("  Mismatched closing tag '{}':", found);
            match expected {
                Some(tag) => eprintln!("    Innermost open element is '{}'", tag),
                None => eprintln!("    No element is open"),
            }
        }
        IdomError::UnclosedElement { tag, depth } => {
            eprintln!("  Element '{}' was never closed", tag);
            eprintln!("    {} element(s) still open at end of render", depth);
        }
        IdomError::InvalidAttributeContext { operation } => {
            eprintln!("  '{}' called outside an open start tag", operation);
            eprintln!("    Use open_start ... open_end around attr calls");
        }
        IdomError::Script(msg) => {
            eprintln!("  Script error:");
            eprintln!("    {}", msg);
        }
        // remaining errors are displayed via their Display impl
        e => {
            eprintln!("  {}", e);
        }
    }
}
