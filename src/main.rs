use befunge_plus::audit::{self, AuditConfig, AuditEntry, AuditFormat, ActionCategory, Severity};
use befunge_plus::{load_file, DivisionByZeroPolicy, ExecutorConfig, ReaderInput, RunSummary, Vm, WriterOutput};
use std::env;
use std::path::PathBuf;
use std::process;

/// Flags that take a value.
const VALUE_FLAGS: [&str; 3] = ["--seed", "--heap", "--max-steps"];

fn print_usage() {
    println!("Usage: befunge-plus <file> [options]");
    println!();
    println!("Options:");
    println!("  --seed <n>        Seed the random direction instruction");
    println!("  --heap <blocks>   Heap capacity in cells (default: 8388608)");
    println!("  --max-steps <n>   Stop after n instructions (default: unlimited)");
    println!("  --strict-div      Treat division by zero as an error");
    println!("  --stats           Print step and heap statistics to stderr");
    println!("  --audit [file]    Enable audit logging (stderr unless a file is given)");
    println!("  --audit-json      Use JSON Lines format for audit output");
}

/// Parse the value following `flag`, falling back to `default`.
fn flag_value<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    let Some(idx) = args.iter().position(|a| a == flag) else {
        return default;
    };
    match args.get(idx + 1).map(|v| v.parse()) {
        Some(Ok(value)) => value,
        _ => {
            eprintln!("Warning: {} expects a number, using the default", flag);
            default
        }
    }
}

/// Split the arguments that are not flags or flag values into the program
/// file(s) and the optional `--audit` log file.
///
/// `--audit` takes the next argument as its log file only when a program
/// file is given as well, so `befunge-plus --audit prog.bf` still runs
/// `prog.bf`.
fn split_positionals(args: &[String]) -> (Vec<&str>, Option<&str>) {
    let mut files = Vec::new();
    let mut audit_candidate = None;
    let mut i = 1;
    while i < args.len() {
        let arg = args[i].as_str();
        if VALUE_FLAGS.contains(&arg) {
            i += 2;
            continue;
        }
        if arg == "--audit" {
            if let Some(next) = args.get(i + 1).filter(|n| !n.starts_with('-')) {
                audit_candidate = Some(files.len());
                files.push(next.as_str());
                i += 2;
                continue;
            }
        } else if !arg.starts_with("--") {
            files.push(arg);
        }
        i += 1;
    }

    match audit_candidate {
        Some(idx) if files.len() == 2 => {
            let log = files.remove(idx);
            (files, Some(log))
        }
        _ => (files, None),
    }
}

fn init_audit(args: &[String], log_path: Option<&str>) {
    if !args.iter().any(|a| a == "--audit") {
        return;
    }
    let format = if args.iter().any(|a| a == "--audit-json") {
        AuditFormat::JsonLines
    } else {
        AuditFormat::Text
    };

    match log_path {
        Some(path) => {
            let config = AuditConfig {
                log_path: Some(PathBuf::from(path)),
                min_severity: Severity::Info,
                echo_stderr: false,
                format,
            };
            if let Err(e) = audit::init_global_logger(config) {
                eprintln!("Warning: Could not initialize audit logger: {}", e);
            }
        }
        None => audit::init_stderr_logger(format),
    }
}

fn print_stats(summary: &RunSummary) {
    eprintln!("steps:        {}", summary.steps);
    eprintln!("stack depth:  {}", summary.stack_depth);
    eprintln!("live cells:   {}", summary.live_cells);
    eprintln!("collections:  {}", summary.gc.collections);
    eprintln!("reclaimed:    {}", summary.gc.total_reclaimed);
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let (files, audit_path) = split_positionals(&args);
    if files.len() != 1 {
        print_usage();
        return;
    }
    let filename = files[0];

    init_audit(&args, audit_path);

    let mut config = ExecutorConfig::default();
    config.heap_capacity = flag_value(&args, "--heap", config.heap_capacity);
    config.max_steps = flag_value(&args, "--max-steps", config.max_steps);
    if args.iter().any(|a| a == "--seed") {
        config.seed = Some(flag_value(&args, "--seed", 0));
    }
    if args.iter().any(|a| a == "--strict-div") {
        config.errors.division_by_zero = DivisionByZeroPolicy::Error;
    }
    let show_stats = args.iter().any(|a| a == "--stats");

    audit::audit(
        AuditEntry::new("STARTUP", "System", "befunge-plus", "CLI session started")
            .with_category(ActionCategory::Config)
            .with_meta("file", filename)
            .with_meta("heap", config.heap_capacity.to_string())
            .with_meta("max_steps", config.max_steps.to_string())
            .with_meta("strict_div", (config.errors.division_by_zero == DivisionByZeroPolicy::Error).to_string()),
    );

    let grid = match load_file(filename) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_status());
        }
    };

    let mut vm = Vm::with_config(grid, ReaderInput::stdin(), WriterOutput::stdout(), config);
    let result = vm.run();

    if show_stats {
        print_stats(&vm.summary());
    }
    if let Some(logger) = audit::global_logger() {
        let _ = logger.flush();
    }

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(e.exit_status());
    }
}
