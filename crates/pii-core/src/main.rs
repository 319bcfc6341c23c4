//! pii-core - PII redaction and credential hashing CLI
//!
//! The main entry point for pii-core, handling:
//! - Redaction of `field=value;` messages
//! - Emission of data-source rows as redacted log lines
//! - Credential hashing and verification

use clap::{Args, Parser, Subcommand};
use pii_core::driver::{DriverError, JsonlRowSource, LogEmitter};
use pii_core::exit_codes::ExitCode;
use pii_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use pii_credential::{CredentialError, CredentialHash, CredentialHasher};
use pii_redact::{RedactionConfig, RedactionError};
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

/// pii-core - Redact PII from log lines and hash credentials
#[derive(Parser)]
#[command(name = "pii-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Redaction config file (JSON)
    #[arg(long, global = true, env = "PII_CONFIG")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Diagnostic log format
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Redact PII fields from a message, or from each stdin line
    Redact(RedactArgs),

    /// Emit JSONL rows as redacted log lines on stderr
    Emit(EmitArgs),

    /// Hash a plaintext credential read from stdin
    Hash(HashArgs),

    /// Check a plaintext credential read from stdin against a stored hash
    Verify(VerifyArgs),
}

#[derive(Args, Debug)]
struct RedactArgs {
    /// Field names to redact (comma separated)
    #[arg(long, value_delimiter = ',')]
    fields: Option<Vec<String>>,

    /// Replacement literal
    #[arg(long)]
    token: Option<String>,

    /// Segment separator
    #[arg(long)]
    separator: Option<String>,

    /// Message to redact (reads stdin lines when omitted)
    message: Option<String>,
}

#[derive(Args, Debug)]
struct EmitArgs {
    /// JSONL file of rows (reads stdin when omitted)
    #[arg(long)]
    input: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct HashArgs {
    /// bcrypt cost (4-31); defaults to the configured hash_cost
    #[arg(long)]
    cost: Option<u32>,
}

#[derive(Args, Debug)]
struct VerifyArgs {
    /// Stored hash to check against
    #[arg(long)]
    hash: String,
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.global.quiet {
        LogLevel::Error
    } else {
        match cli.global.verbose {
            0 => LogLevel::Info,
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    };
    let cli_level = (cli.global.quiet || cli.global.verbose > 0).then_some(log_level);
    let log_config = LogConfig::from_env(cli_level, cli.global.log_format);

    let config = match load_config(&cli.global) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("pii-core: {}", err);
            std::process::exit(redaction_exit_code(&err).as_i32());
        }
    };
    let log_formatter = match config.formatter() {
        Ok(formatter) => formatter,
        Err(err) => {
            eprintln!("pii-core: {}", err);
            std::process::exit(redaction_exit_code(&err).as_i32());
        }
    };
    init_logging(&log_config, log_formatter);

    let exit_code = match cli.command {
        Commands::Redact(args) => run_redact(&config, &args),
        Commands::Emit(args) => run_emit(&config, &args),
        Commands::Hash(args) => run_hash(&config, &args),
        Commands::Verify(args) => run_verify(&args),
    };

    std::process::exit(exit_code.as_i32());
}

fn load_config(global: &GlobalOpts) -> Result<RedactionConfig, RedactionError> {
    let config = match &global.config {
        Some(path) => RedactionConfig::load(path)?,
        None => RedactionConfig::default(),
    };
    config.apply_env()
}

fn redaction_exit_code(err: &RedactionError) -> ExitCode {
    match err {
        RedactionError::InvalidConfig(_) | RedactionError::JsonError(_) => ExitCode::ArgsError,
        RedactionError::IoError(_) => ExitCode::IoError,
        RedactionError::UpstreamFormat(_) => ExitCode::InternalError,
    }
}

fn credential_exit_code(err: &CredentialError) -> ExitCode {
    match err {
        CredentialError::InvalidCost(_)
        | CredentialError::MalformedHash(_)
        | CredentialError::PlaintextTooLong(_) => ExitCode::ArgsError,
        CredentialError::Encoding(_) => ExitCode::InternalError,
    }
}

fn run_redact(config: &RedactionConfig, args: &RedactArgs) -> ExitCode {
    let mut config = config.clone();
    if let Some(fields) = &args.fields {
        config.pii_fields = fields.clone();
    }
    if let Some(token) = &args.token {
        config.redaction = token.clone();
    }
    if let Some(separator) = &args.separator {
        config.separator = separator.clone();
    }

    let redactor = match config.redactor() {
        Ok(redactor) => redactor,
        Err(err) => {
            eprintln!("pii-core: {}", err);
            return redaction_exit_code(&err);
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Some(message) = &args.message {
        return match writeln!(out, "{}", redactor.redact(message)) {
            Ok(()) => ExitCode::Clean,
            Err(err) => io_failure(err),
        };
    }

    for line in io::stdin().lock().lines() {
        let result = line.and_then(|line| writeln!(out, "{}", redactor.redact(&line)));
        if let Err(err) = result {
            return io_failure(err);
        }
    }
    ExitCode::Clean
}

fn run_emit(config: &RedactionConfig, args: &EmitArgs) -> ExitCode {
    let formatter = match config.formatter() {
        Ok(formatter) => formatter,
        Err(err) => {
            eprintln!("pii-core: {}", err);
            return redaction_exit_code(&err);
        }
    };
    let mut emitter = LogEmitter::new(formatter, io::stderr());

    let result = match &args.input {
        Some(path) => match std::fs::File::open(path) {
            Ok(file) => emitter.run(&mut JsonlRowSource::new(BufReader::new(file))),
            Err(err) => return io_failure(err),
        },
        None => emitter.run(&mut JsonlRowSource::new(io::stdin().lock())),
    };

    match result {
        Ok(count) => {
            println!("{}", count);
            ExitCode::Clean
        }
        Err(err) => {
            eprintln!("pii-core: {}", err);
            match err {
                DriverError::Source { .. } => ExitCode::ArgsError,
                DriverError::Io(_) => ExitCode::IoError,
                DriverError::Redaction(ref inner) => redaction_exit_code(inner),
            }
        }
    }
}

fn run_hash(config: &RedactionConfig, args: &HashArgs) -> ExitCode {
    let hasher = match CredentialHasher::new(args.cost.unwrap_or(config.hash_cost)) {
        Ok(hasher) => hasher,
        Err(err) => {
            eprintln!("pii-core: {}", err);
            return credential_exit_code(&err);
        }
    };
    let plaintext = match read_plaintext() {
        Ok(plaintext) => plaintext,
        Err(err) => return io_failure(err),
    };

    match hasher.hash(&plaintext) {
        Ok(hash) => {
            println!("{}", hash);
            ExitCode::Clean
        }
        Err(err) => {
            eprintln!("pii-core: {}", err);
            credential_exit_code(&err)
        }
    }
}

fn run_verify(args: &VerifyArgs) -> ExitCode {
    let hash: CredentialHash = match args.hash.parse() {
        Ok(hash) => hash,
        Err(err) => {
            eprintln!("pii-core: {}", err);
            return credential_exit_code(&err);
        }
    };
    let plaintext = match read_plaintext() {
        Ok(plaintext) => plaintext,
        Err(err) => return io_failure(err),
    };

    let matched = pii_credential::verify(&hash, &plaintext);
    println!("{}", matched);
    if matched {
        ExitCode::Clean
    } else {
        ExitCode::Mismatch
    }
}

/// First stdin line without its line terminator.
fn read_plaintext() -> io::Result<String> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(line)
}

fn io_failure(err: io::Error) -> ExitCode {
    eprintln!("pii-core: io error: {}", err);
    ExitCode::IoError
}
