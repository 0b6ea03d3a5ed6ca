//! The `mjvm` entry shim: reads a `.class` file given as the sole
//! command-line argument, locates `main([Ljava/lang/String;)V`, and runs
//! it through the core interpreter.
//!
//! Everything here is glue — argument parsing, mapping the file,
//! reporting fatal errors with an exit code — the interpreter itself
//! lives in `mjvm-runtime`.

use std::fs::File;
use std::process::ExitCode;

use mjvm_classfile::ClassFile;
use mjvm_runtime::Heap;

const MAIN_NAME: &str = "main";
const MAIN_DESCRIPTOR: &str = "([Ljava/lang/String;)V";

fn main() -> ExitCode {
    let mut args = std::env::args();
    let program_name = args.next().unwrap_or_else(|| "mjvm".to_string());

    let path = match args.next() {
        Some(path) if args.next().is_none() => path,
        _ => {
            eprintln!("usage: {} <path-to-class-file>", program_name);
            return ExitCode::from(1);
        }
    };

    match run(&path) {
        Ok(()) => ExitCode::from(0),
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::from(1)
        }
    }
}

fn run(path: &str) -> Result<(), AppError> {
    let file = File::open(path).map_err(|source| AppError::Io { path: path.to_string(), source })?;
    // SAFETY: the mapped file is only ever read, and nothing else in this
    // process writes to it concurrently.
    let mapping = unsafe { memmap2::Mmap::map(&file) }
        .map_err(|source| AppError::Io { path: path.to_string(), source })?;

    let class = ClassFile::parse(&mapping)?;
    let main = class
        .find_method(MAIN_NAME, MAIN_DESCRIPTOR)
        .ok_or_else(|| AppError::MissingMain { path: path.to_string() })?;

    let mut heap = Heap::new();
    // The only parameter to `main` is a `String[]`; string objects are a
    // non-goal, so the argument array is modeled as an empty int array —
    // `main` bodies in this subset never read its contents.
    let args_reference = heap.allocate(Vec::new());
    let mut locals = vec![0i32; main.code.max_locals as usize];
    locals[0] = args_reference;

    let mut stdout = std::io::stdout();
    let result = mjvm_runtime::execute(main, locals, &class, &mut heap, &mut stdout)?;

    if result.is_some() {
        return Err(AppError::MainReturnedValue);
    }

    Ok(())
}

#[derive(Debug)]
enum AppError {
    Io { path: String, source: std::io::Error },
    ClassFile(mjvm_classfile::ClassFileError),
    MissingMain { path: String },
    Runtime(mjvm_runtime::RuntimeError),
    MainReturnedValue,
}

impl From<mjvm_classfile::ClassFileError> for AppError {
    fn from(source: mjvm_classfile::ClassFileError) -> Self {
        AppError::ClassFile(source)
    }
}

impl From<mjvm_runtime::RuntimeError> for AppError {
    fn from(source: mjvm_runtime::RuntimeError) -> Self {
        AppError::Runtime(source)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Io { path, source } => write!(f, "mjvm: cannot read '{}': {}", path, source),
            AppError::ClassFile(source) => write!(f, "mjvm: {}", source),
            AppError::MissingMain { path } => {
                write!(f, "mjvm: '{}' has no main([Ljava/lang/String;)V method", path)
            }
            AppError::Runtime(source) => write!(f, "mjvm: fatal bytecode error\n{}", source),
            AppError::MainReturnedValue => {
                write!(f, "mjvm: main([Ljava/lang/String;)V returned a value; it must be void")
            }
        }
    }
}

impl std::error::Error for AppError {}
