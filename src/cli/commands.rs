//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::path::{Path, PathBuf};

use natparse_core::FileKind;
use serde_json::{Value, json};

use crate::frontend::diagnostics::{Diagnostic, get_line_info};
use crate::frontend::index::DirectoryIndex;
use crate::frontend::{Module, ModuleIdentity, ast, lexer, parse_module};

use super::{CheckOptions, CliError, CliResult, ExitCode, OutputFormat};

/// Maximum source file size (100 MB)
///
/// Files larger than this are rejected to prevent out-of-memory conditions
/// while lexing.
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// Read a source file, rejecting files above [`MAX_SOURCE_SIZE`].
pub fn read_source(file_path: &Path) -> CliResult<String> {
    let shown = file_path.display();
    // Check file size before reading
    let metadata =
        fs::metadata(file_path).map_err(|e| CliError::failure(format!("Cannot access file '{shown}': {e}")))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            shown,
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(file_path).map_err(|e| CliError::failure(format!("Error reading file '{shown}': {e}")))
}

fn identity_of(path: &Path) -> CliResult<ModuleIdentity> {
    ModuleIdentity::from_path(path).map_err(|e| CliError::failure(format!("Error: '{}': {e}", path.display())))
}

/// Index of the directory holding `path`; a missing parent means the current directory.
fn index_for(path: &Path) -> CliResult<DirectoryIndex> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    DirectoryIndex::scan(dir).map_err(|e| CliError::failure(format!("Error: {e}")))
}

// ============================================================================
// Debug commands
// ============================================================================

/// Tokenize a file and print one token per line.
pub fn lex_file(file_path: &Path) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let lexed = lexer::lex(&source);

    for tok in &lexed.tokens {
        println!("{}:{} {} {:?}", tok.line, tok.column, tok.kind.syntax_name(), tok.text);
    }
    report_plain(file_path, &source, &lexed.diagnostics);
    Ok(exit_code_for(&lexed.diagnostics))
}

/// Parse a file and print its tree.
pub fn parse_file(file_path: &Path, options: &CheckOptions) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let identity = identity_of(file_path)?;
    let index = index_for(file_path)?;
    let module = parse_module(&source, identity, Some(&index), &options.config());

    print!("{}", ast::dump(&module.tree, module.root));
    report_plain(file_path, &source, &module.diagnostics);
    Ok(exit_code_for(&module.diagnostics))
}

fn report_plain(file_path: &Path, source: &str, diagnostics: &[Diagnostic]) {
    let name = file_path.display().to_string();
    for diagnostic in diagnostics {
        eprintln!("{}", crate::frontend::diagnostics::format_error(&name, source, diagnostic));
    }
}

fn exit_code_for(diagnostics: &[Diagnostic]) -> ExitCode {
    if diagnostics.iter().any(Diagnostic::is_error) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

// ============================================================================
// Checking
// ============================================================================

/// One checked source file.
struct Checked {
    path: PathBuf,
    source: String,
    module: Module,
}

/// Check a single file.
pub fn check_file(file_path: &Path, options: &CheckOptions) -> CliResult<ExitCode> {
    check_paths(&[file_path.to_path_buf()], options)
}

/// Check every given file, and every Natural source directly inside every given directory.
///
/// Each module is resolved against the index of its own directory. The exit code is a failure when any module has
/// an error-level diagnostic.
pub fn check_paths(paths: &[PathBuf], options: &CheckOptions) -> CliResult<ExitCode> {
    let config = options.config();
    let mut indexes: HashMap<PathBuf, DirectoryIndex> = HashMap::new();
    let mut results = Vec::new();

    for file in collect_sources(paths)? {
        let identity = identity_of(&file)?;
        let source = read_source(&file)?;
        let dir = file.parent().map(Path::to_path_buf).unwrap_or_default();
        let index = match indexes.entry(dir) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(index_for(&file)?),
        };
        let module = parse_module(&source, identity, Some(&*index), &config);
        tracing::debug!(file = %file.display(), diagnostics = module.diagnostics.len(), "checked");
        results.push(Checked {
            path: file,
            source,
            module,
        });
    }

    match options.format {
        OutputFormat::Human => render_human(&results),
        OutputFormat::Json => println!("{}", render_json(&results)),
    }

    if results.iter().any(|r| r.module.has_errors()) {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Expand directories into the Natural sources they contain, sorted by path.
fn collect_sources(paths: &[PathBuf]) -> CliResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        let entries = fs::read_dir(path)
            .map_err(|e| CliError::failure(format!("Cannot read directory '{}': {e}", path.display())))?;
        let mut found: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && is_natural_source(p))
            .collect();
        found.sort();
        files.extend(found);
    }
    Ok(files)
}

fn is_natural_source(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| FileKind::from_extension(e).is_ok())
}

fn render_human(results: &[Checked]) {
    let mut errors = 0;
    let mut warnings = 0;
    for result in results {
        let name = result.path.display().to_string();
        for diagnostic in &result.module.diagnostics {
            if diagnostic.is_error() {
                errors += 1;
            } else {
                warnings += 1;
            }
            eprintln!("{:?}", diagnostic.to_report(&name, &result.source));
        }
    }
    if errors == 0 && warnings == 0 {
        println!("✓ {} module(s) checked, no problems found", results.len());
    } else {
        println!(
            "{} module(s) checked: {} error(s), {} warning(s)",
            results.len(),
            errors,
            warnings
        );
    }
}

fn render_json(results: &[Checked]) -> Value {
    let files: Vec<Value> = results
        .iter()
        .map(|result| {
            let diagnostics: Vec<Value> = result
                .module
                .diagnostics
                .iter()
                .map(|d| diagnostic_json(d, &result.source))
                .collect();
            json!({
                "file": result.path.display().to_string(),
                "module": result.module.identity.name,
                "kind": result.module.identity.kind.as_str(),
                "diagnostics": diagnostics,
            })
        })
        .collect();
    json!({ "files": files })
}

fn diagnostic_json(diagnostic: &Diagnostic, source: &str) -> Value {
    let (line, column, _) = get_line_info(source, diagnostic.span.start);
    json!({
        "severity": diagnostic.severity.to_string(),
        "kind": diagnostic.kind.code(),
        "message": diagnostic.message,
        "line": line,
        "column": column,
        "start": diagnostic.span.start,
        "end": diagnostic.span.end,
        "notes": diagnostic.notes,
        "hints": diagnostic.hints,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::frontend::FrontendConfig;

    fn checked(source: &str) -> Checked {
        let module = parse_module(
            source,
            ModuleIdentity::new("MAIN", FileKind::Program),
            None,
            &FrontendConfig::default(),
        );
        Checked {
            path: PathBuf::from("MAIN.NSP"),
            source: source.to_string(),
            module,
        }
    }

    #[test]
    fn test_read_source_missing_file() {
        let err = read_source(Path::new("/no/such/MAIN.NSP")).unwrap_err();
        assert!(err.message.starts_with("Cannot access file '/no/such/MAIN.NSP'"));
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }

    #[test]
    fn test_unknown_extension_is_a_cli_error() {
        let err = identity_of(Path::new("notes.txt")).unwrap_err();
        assert!(err.message.contains("not a known source file extension"), "{}", err.message);
    }

    #[test]
    fn test_natural_sources_are_recognized_by_extension() {
        assert!(is_natural_source(Path::new("a/MAIN.NSP")));
        assert!(is_natural_source(Path::new("lib.nsl")));
        assert!(!is_natural_source(Path::new("README.md")));
        assert!(!is_natural_source(Path::new("NOEXT")));
    }

    #[test]
    fn test_json_rendering() {
        let result = checked("DEFINE DATA LOCAL\n1 #N (N5)\nEND-DEFINE\n#N := 'abc'\nEND\n");
        let value = render_json(&[result]);
        let file = &value["files"][0];
        assert_eq!(file["module"], "MAIN");
        assert_eq!(file["kind"], "PROGRAM");
        let diagnostic = &file["diagnostics"][0];
        assert_eq!(diagnostic["kind"], "TypeMismatch");
        assert_eq!(diagnostic["severity"], "error");
        assert_eq!(diagnostic["line"], 4);
        assert_eq!(diagnostic["column"], 7);
    }

    #[test]
    fn test_exit_code_follows_errors() {
        assert_eq!(exit_code_for(&[]), ExitCode::SUCCESS);
        let module = checked("#A := 1\nWRITE ;\nEND\n").module;
        assert_eq!(exit_code_for(&module.diagnostics), ExitCode::FAILURE);
    }
}
