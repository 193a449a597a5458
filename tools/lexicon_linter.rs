/// Lexicon Linter: checks lexicon files for entries the realiser cannot
/// inflect properly.
///
/// Usage: lexicon_linter <lexicon_file_or_dir> [--merge-default]

use std::path::Path;
use std::process;
use surface_realiser::core::lexicon::Lexicon;
use surface_realiser::core::morphology::french;
use surface_realiser::schema::feature::{Category, Language};
use surface_realiser::schema::word::{Inflection, WordEntry};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: lexicon_linter <lexicon_file_or_dir> [--merge-default]");
        process::exit(0);
    }

    let path = Path::new(&args[1]);
    let merge_default = args.iter().skip(2).any(|a| a == "--merge-default");

    let mut files = Vec::new();
    if path.is_file() {
        files.push(path.to_path_buf());
    } else if path.is_dir() {
        collect_ron_files(path, &mut files);
    } else {
        eprintln!("ERROR: Path '{}' does not exist", path.display());
        process::exit(1);
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut lexicons = Vec::new();

    for file in &files {
        match Lexicon::load_from_ron(file) {
            Ok(lex) => {
                println!("  Loaded: {} ({} entries)", file.display(), lex.len());
                lexicons.push((file.display().to_string(), lex));
            }
            Err(e) => errors.push(format!("{}: {}", file.display(), e)),
        }
    }

    for (name, lex) in &lexicons {
        let (errs, warns) = lint_lexicon(lex);
        errors.extend(errs.into_iter().map(|e| format!("{}: {}", name, e)));
        warnings.extend(warns.into_iter().map(|w| format!("{}: {}", name, w)));
    }

    if merge_default {
        for (name, lex) in lexicons {
            let merged = Lexicon::default_for(lex.language()).and_then(|mut base| {
                base.merge(lex)?;
                Ok(base)
            });
            if let Err(e) = merged {
                errors.push(format!("{}: does not merge over the embedded lexicon: {}", name, e));
            }
        }
    }

    println!("\n=== Lexicon Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if !errors.is_empty() {
        process::exit(1);
    }
}

fn collect_ron_files(dir: &Path, files: &mut Vec<std::path::PathBuf>) {
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                collect_ron_files(&path, files);
            } else if path.extension().and_then(|s| s.to_str()) == Some("ron") {
                files.push(path);
            }
        }
    }
    files.sort();
}

fn lint_lexicon(lex: &Lexicon) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for entry in lex.entries() {
        if entry.base.trim().is_empty() {
            errors.push(format!("entry '{}' has an empty base form", entry.id));
            continue;
        }
        if entry.has_inflection(Inflection::Irregular) && entry.forms.is_empty() {
            errors.push(format!(
                "'{}' is marked irregular but lists no forms",
                entry.id
            ));
        }
        match (lex.language(), entry.category) {
            (_, Category::Noun) => lint_noun(entry, &mut warnings),
            (Language::French, Category::Verb) => lint_french_verb(entry, &mut errors),
            (_, Category::Pronoun) if entry.is_personal_pronoun() && entry.person.is_none() => {
                warnings.push(format!("personal pronoun '{}' has no person", entry.id));
            }
            _ => {}
        }
    }

    (errors, warnings)
}

fn lint_noun(entry: &WordEntry, warnings: &mut Vec<String>) {
    if entry.forms.plural.as_deref() == Some("") {
        warnings.push(format!("noun '{}' has an empty plural", entry.id));
    }
    if entry.has_inflection(Inflection::Uncount) && entry.forms.plural.is_some() {
        warnings.push(format!(
            "noun '{}' is uncountable but lists a plural",
            entry.id
        ));
    }
}

fn lint_french_verb(entry: &WordEntry, errors: &mut Vec<String>) {
    let irregular = entry.forms.present.iter().any(Option::is_some);
    if !irregular && french::conjugation_group(&entry.base).is_none() {
        errors.push(format!(
            "verb '{}' has no conjugation group and no present forms",
            entry.id
        ));
    }
}
