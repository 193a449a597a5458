/// Preview: realise element trees from RON files or an interactive shell.
///
/// Usage: preview [--lang en|fr] [--lexicon <path>] [--tokens] [tree.ron ...]
///
/// With no files, starts a shell. Commands:
///   load <file>    realise an element tree file
///   lang <en|fr>   switch language
///   tokens         toggle token dumps
///   help           list commands
///   quit           exit
/// Any other line is parsed as an inline RON element definition.

use std::io::{self, BufRead, Write};
use std::path::Path;
use surface_realiser::core::realiser::{Realiser, RealiseError};
use surface_realiser::schema::element::{NodeId, Tree};
use surface_realiser::schema::feature::Language;

struct Session {
    language: Language,
    lexicon_path: Option<String>,
    show_tokens: bool,
    realiser: Realiser,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let mut language = Language::English;
    let mut lexicon_path = None;
    let mut show_tokens = false;
    let mut files = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--lang" if i + 1 < args.len() => {
                i += 1;
                language = match parse_language(&args[i]) {
                    Some(l) => l,
                    None => {
                        eprintln!("Unknown language: {}", args[i]);
                        std::process::exit(1);
                    }
                };
            }
            "--lexicon" if i + 1 < args.len() => {
                i += 1;
                lexicon_path = Some(args[i].clone());
            }
            "--tokens" => show_tokens = true,
            arg if arg.starts_with("--") => {
                eprintln!("Unknown argument: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            file => files.push(file.to_string()),
        }
        i += 1;
    }

    let realiser = match build_realiser(language, lexicon_path.as_deref()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };
    let mut session = Session {
        language,
        lexicon_path,
        show_tokens,
        realiser,
    };

    if !files.is_empty() {
        let mut failed = false;
        for file in &files {
            match Tree::load_from_ron(Path::new(file)) {
                Ok((tree, root)) => failed |= !show(&session, &tree, root),
                Err(e) => {
                    eprintln!("ERROR: {}: {}", file, e);
                    failed = true;
                }
            }
        }
        if failed {
            std::process::exit(1);
        }
        return;
    }

    println!("Realising {:?} with {} lexicon entries", session.language, session.realiser.lexicon().len());
    println!("Type 'help' for commands.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("preview> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        match cmd {
            "quit" | "exit" | "q" => {
                println!("Goodbye.");
                break;
            }
            "help" | "h" | "?" => print_help(),
            "tokens" => {
                session.show_tokens = !session.show_tokens;
                println!("Token dump {}", if session.show_tokens { "on" } else { "off" });
            }
            "lang" => match parse_language(rest) {
                Some(language) => match build_realiser(language, session.lexicon_path.as_deref()) {
                    Ok(r) => {
                        session.language = language;
                        session.realiser = r;
                        println!("Language set to {:?}", language);
                    }
                    Err(e) => println!("ERROR: {}", e),
                },
                None => println!("Usage: lang <en|fr>"),
            },
            "load" => match Tree::load_from_ron(Path::new(rest)) {
                Ok((tree, root)) => {
                    show(&session, &tree, root);
                }
                Err(e) => println!("ERROR: {}", e),
            },
            _ => match Tree::parse_ron(line) {
                Ok((tree, root)) => {
                    show(&session, &tree, root);
                }
                Err(e) => println!("ERROR: {}", e),
            },
        }
    }
}

fn build_realiser(language: Language, lexicon: Option<&str>) -> Result<Realiser, RealiseError> {
    let mut builder = Realiser::builder().language(language);
    if let Some(path) = lexicon {
        builder = if Path::new(path).is_dir() {
            builder.lexicon_dir(path)
        } else {
            builder.lexicon_file(path)
        };
    }
    builder.build()
}

/// Print one realisation. Returns false on error.
fn show(session: &Session, tree: &Tree, root: NodeId) -> bool {
    if session.show_tokens {
        match session.realiser.realise_tokens(tree, root) {
            Ok(tokens) => {
                for token in &tokens {
                    println!(
                        "  {:<14} {:<12} {:?}",
                        token.base,
                        token.category.name(),
                        token.text()
                    );
                }
            }
            Err(e) => {
                println!("ERROR: {}", e);
                return false;
            }
        }
    }
    match session.realiser.realise_with_diagnostics(tree, root) {
        Ok(out) => {
            println!("{}", out.text);
            for warning in &out.warnings {
                eprintln!("  WARNING: {}", warning);
            }
            true
        }
        Err(e) => {
            println!("ERROR: {}", e);
            false
        }
    }
}

fn parse_language(s: &str) -> Option<Language> {
    match s.to_lowercase().as_str() {
        "en" | "english" => Some(Language::English),
        "fr" | "french" => Some(Language::French),
        _ => None,
    }
}

fn print_usage() {
    println!("Usage: preview [--lang en|fr] [--lexicon <path>] [--tokens] [tree.ron ...]");
}

fn print_help() {
    println!("Commands:");
    println!("  load <file>    realise an element tree file");
    println!("  lang <en|fr>   switch language");
    println!("  tokens         toggle token dumps");
    println!("  help           this message");
    println!("  quit           exit");
    println!("Anything else is read as an inline element definition, e.g.");
    println!("  Clause((subject: Word((base: \"Mary\")), predicate: Word((base: \"sleep\", category: \"verb\"))))");
}
