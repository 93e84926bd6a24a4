use std::fs;
use std::process::ExitCode;

use owo_colors::OwoColorize;

use lynx_checker::validate;
use lynx_interpreter::Interpreter;
use lynx_lexer::tokenize;
use lynx_parser::Parser;
use lynx_syntax::{Diagnostic, Error};
use lynx_vm::Vm;

fn render_diagnostic(source: &str, diag: &Diagnostic) {
    eprintln!("{}: {}", "error".red().bold(), diag.kind.to_string().red());
    eprintln!("  --> line {}, column {}", diag.span.line, diag.span.col);
    if let Some(src_line) = source.lines().nth(diag.span.line.saturating_sub(1)) {
        let line_num_str = format!("{:3} | ", diag.span.line);
        eprintln!("     |");
        eprintln!("{}{}", line_num_str.bright_black(), src_line);

        let mut marker = String::new();
        marker.push_str(&" ".repeat(line_num_str.len()));
        if diag.span.col > 1 {
            marker.push_str(&" ".repeat(diag.span.col - 1));
        }
        marker.push('^');
        eprintln!("{}", marker.red());
        eprintln!("     |");
    }
}

fn render_error(kind: &str, source: &str, err: &Error) {
    eprintln!("{}: {}", kind.red().bold(), err.msg.red());
    if let (Some(line), Some(col)) = (err.line, err.col) {
        eprintln!("  --> line {}, column {}", line, col);
        if let Some(src_line) = source.lines().nth(line - 1) {
            let line_num_str = format!("{:3} | ", line);
            eprintln!("     |");
            eprintln!("{}{}", line_num_str.bright_black(), src_line);

            let mut marker = String::new();
            marker.push_str(&" ".repeat(line_num_str.len()));
            if col > 1 {
                marker.push_str(&" ".repeat(col - 1));
            }
            marker.push('^');
            eprintln!("{}", marker.red());
            eprintln!("     |");
        }
    }
}

fn parse_backend(args: &[String]) -> String {
    // default backend is the tree walker; allow --backend vm or LYNX_BACKEND=vm
    if let Ok(b) = std::env::var("LYNX_BACKEND") {
        return b;
    }
    let mut i = 1usize;
    while i + 1 < args.len() {
        if args[i] == "--backend" || args[i] == "-b" {
            return args[i + 1].clone();
        }
        i += 1;
    }
    "interp".to_string()
}

fn parse_eval(args: &[String]) -> Option<String> {
    let mut i = 1usize;
    while i + 1 < args.len() {
        if args[i] == "--eval" || args[i] == "-e" {
            return Some(args[i + 1].clone());
        }
        i += 1;
    }
    None
}

fn parse_path(args: &[String]) -> Option<&str> {
    let mut i = 1usize;
    while i < args.len() {
        match args[i].as_str() {
            "--backend" | "-b" | "--eval" | "-e" => {
                i += 2;
            }
            s if s.starts_with('-') => {
                i += 1;
            }
            _ => return Some(args[i].as_str()),
        }
    }
    None
}

fn usage() {
    eprintln!("usage: lynx <file.lynx> [--backend interp|vm]");
    eprintln!("       lynx --eval <source> [--backend interp|vm]");
}

fn run_source(source: &str, backend: &str) -> ExitCode {
    let tokens = tokenize(source);
    let mut parser = Parser::new(tokens);
    let mut program = parser.parse_program();

    let diagnostics = validate(&mut program);
    if !diagnostics.is_empty() {
        for diag in &diagnostics {
            render_diagnostic(source, diag);
        }
        return ExitCode::FAILURE;
    }

    if backend == "vm" {
        let class = match lynx_compiler::compile(&program) {
            Ok(c) => c,
            Err(e) => {
                render_error("compile error", source, &e);
                return ExitCode::FAILURE;
            }
        };
        let mut vm = Vm::new();
        match vm.run(&class) {
            Ok(value) => {
                print!("{}", vm.output());
                if let Some(v) = value {
                    println!("{}", v);
                }
            }
            Err(e) => {
                print!("{}", vm.output());
                render_error("runtime error", source, &e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        let mut interp = Interpreter::new();
        match interp.run(&program) {
            Ok(execution) => {
                print!("{}", execution.output);
                if let Some(v) = execution.value {
                    println!("{}", v);
                }
            }
            Err(e) => {
                render_error("runtime error", source, &e);
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        usage();
        return ExitCode::FAILURE;
    }

    let backend = parse_backend(&args);

    if let Some(source) = parse_eval(&args) {
        return run_source(&source, &backend);
    }

    let path = match parse_path(&args) {
        Some(p) => p,
        None => {
            usage();
            return ExitCode::FAILURE;
        }
    };
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!(
                "{}: {}",
                "error".red().bold(),
                format!("failed to read {}: {}", path, e).red()
            );
            return ExitCode::FAILURE;
        }
    };
    run_source(&source, &backend)
}
