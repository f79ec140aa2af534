// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, error};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lector::app_config::{self, Config};
use lector::database::{DatabaseConnection, LearningStatus, Repository, VocabularyFilter};
use lector::document::DocumentProcessor;
use lector::errors::{ErrorKind, VocabularyError};
use lector::providers::google_translate::GoogleTranslate;
use lector::providers::cjk_tokenizer::CjkTokenizer;
use lector::providers::google_vision::GoogleVision;
use lector::translation::{SentenceCache, TranslateRequest, VocabularyService};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// Language pair options shared by the word commands
#[derive(Args, Debug, Clone)]
struct LanguageArgs {
    /// Source language code or locale (e.g. 'en-US', 'ja'); config default if omitted
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g. 'es'); config default if omitted
    #[arg(short, long)]
    target_language: Option<String>,
}

impl LanguageArgs {
    fn resolve(&self, config: &Config) -> (String, String) {
        (
            self.source_language
                .clone()
                .unwrap_or_else(|| config.source_language.clone()),
            self.target_language
                .clone()
                .unwrap_or_else(|| config.target_language.clone()),
        )
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the languages supported by the translation service
    Languages,

    /// Translate a word (and optionally its sentence), saving it to the vocabulary
    Translate {
        /// Word as it appears in the text
        word: String,

        /// Sentence the word appears in
        #[arg(long)]
        sentence: Option<String>,

        #[command(flatten)]
        languages: LanguageArgs,
    },

    /// Set the learning status of a word (e.g. new, learning, known)
    Status {
        /// Word to update
        word: String,

        /// New status label
        status: String,

        #[command(flatten)]
        languages: LanguageArgs,
    },

    /// Show the stored status of several words at once
    Statuses {
        /// Words to look up
        #[arg(required = true)]
        words: Vec<String>,

        #[command(flatten)]
        languages: LanguageArgs,
    },

    /// List the vocabulary
    List {
        /// Only words with this status ('all' for every status)
        #[arg(long)]
        status: Option<String>,

        /// Only words of this language pair, as 'source-target' (e.g. 'ko-es')
        #[arg(long)]
        lang: Option<String>,
    },

    /// Replace the stored translation of a word
    Edit {
        /// Word to edit
        word: String,

        /// New translation
        translation: String,

        #[command(flatten)]
        languages: LanguageArgs,
    },

    /// Remove a word from the vocabulary
    Delete {
        /// Word to remove
        word: String,

        #[command(flatten)]
        languages: LanguageArgs,
    },

    /// OCR a page image or PDF and print its text
    Process {
        /// Image or PDF file to process
        file: PathBuf,

        /// Language of the document (code or locale)
        #[arg(short, long)]
        source_language: Option<String>,
    },

    /// Show vocabulary statistics
    Stats,

    /// Generate shell completions for lector
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Lector - read foreign-language documents and build your vocabulary
#[derive(Parser, Debug)]
#[command(name = "lector")]
#[command(version)]
#[command(about = "OCR, translate and remember the words you read")]
#[command(long_about = "Lector reads page images and PDFs, translates the words you select and keeps track of how well you know them.

EXAMPLES:
    lector process page.png -s ja-JP             # OCR a page
    lector translate 猫 -s ja -t en              # Translate and save a word
    lector status 猫 known -s ja -t en           # Mark it as known
    lector list --status new --lang ja-en        # Review new words
")]
struct CommandLineOptions {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Error body printed when a command fails
#[derive(Serialize)]
struct ErrorReport {
    kind: ErrorKind,
    error: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "lector", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;
    if let Some(level) = cli.log_level.clone() {
        config.log_level = level.into();
    }
    log::set_max_level(config.log_level.into());

    config.validate().context("Configuration validation failed")?;
    if matches!(
        cli.command,
        Commands::Languages | Commands::Translate { .. } | Commands::Process { .. }
    ) {
        config.require_api_key()?;
    }

    match run(cli.command, &config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("{}", e);
            let report = ErrorReport {
                kind: e.kind(),
                error: e.to_string(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            std::process::exit(match e.kind() {
                ErrorKind::InvalidInput | ErrorKind::NotFound => 2,
                ErrorKind::ServiceUnavailable | ErrorKind::Storage => 1,
            });
        }
    }
}

fn open_repository(config: &Config) -> Result<Repository> {
    let db = match &config.database_path {
        Some(path) => DatabaseConnection::new(path)?,
        None => DatabaseConnection::new_default()?,
    };
    debug!("Using vocabulary database {:?}", db.path());
    Ok(Repository::new(db))
}

fn build_service(config: &Config, repository: Repository) -> Result<VocabularyService, VocabularyError> {
    let translator = GoogleTranslate::new(
        config.api_key().unwrap_or_default(),
        config.google.translate_endpoint.clone(),
        config.google.timeout_secs,
    )?;
    Ok(VocabularyService::with_cache(
        repository,
        Arc::new(translator),
        SentenceCache::new(config.sentence_cache_enabled),
    ))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), VocabularyError> {
    let json = serde_json::to_string_pretty(value).map_err(anyhow::Error::from)?;
    println!("{}", json);
    Ok(())
}

#[derive(Serialize)]
struct Success {
    success: bool,
}

async fn run(command: Commands, config: &Config) -> Result<(), VocabularyError> {
    match command {
        Commands::Process { file, source_language } => {
            process_file(&file, source_language, config).await
        }
        other => run_vocabulary(other, config).await,
    }
}

async fn process_file(
    file: &Path,
    source_language: Option<String>,
    config: &Config,
) -> Result<(), VocabularyError> {
    let bytes = std::fs::read(file)
        .map_err(|e| VocabularyError::InvalidInput(format!("{}: {}", file.display(), e)))?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let source = source_language.unwrap_or_else(|| config.source_language.clone());

    let vision = GoogleVision::new(
        config.api_key().unwrap_or_default(),
        config.google.vision_endpoint.clone(),
        config.google.timeout_secs,
    )?;
    let mut processor = DocumentProcessor::new(Arc::new(vision));
    if config.tokenize_cjk {
        processor = processor.with_tokenizer(Arc::new(CjkTokenizer::new()));
    }

    let document = processor.process(&bytes, &file_name, Some(&source)).await?;
    print_json(&document)
}

async fn run_vocabulary(command: Commands, config: &Config) -> Result<(), VocabularyError> {
    let service = build_service(config, open_repository(config)?)?;

    match command {
        Commands::Languages => print_json(&service.supported_languages().await?),
        Commands::Translate { word, sentence, languages } => {
            let (source, target) = languages.resolve(config);
            let mut request = TranslateRequest::new(&word, &source, &target);
            request.sentence = sentence;
            print_json(&service.translate(&request).await?)
        }
        Commands::Status { word, status, languages } => {
            let (source, target) = languages.resolve(config);
            let success = service
                .update_status(&word, &source, &target, &LearningStatus::from(status))
                .await?;
            print_json(&Success { success })
        }
        Commands::Statuses { words, languages } => {
            let (source, target) = languages.resolve(config);
            print_json(&service.bulk_statuses(&words, &source, &target).await?)
        }
        Commands::List { status, lang } => {
            let filter = VocabularyFilter::from_query(status.as_deref(), lang.as_deref())
                .map_err(|e| VocabularyError::InvalidInput(e.to_string()))?;
            print_json(&service.list_vocabulary(&filter).await?)
        }
        Commands::Edit { word, translation, languages } => {
            let (source, target) = languages.resolve(config);
            let success = service
                .edit_translation(&word, &source, &target, &translation)
                .await?;
            print_json(&Success { success })
        }
        Commands::Delete { word, languages } => {
            let (source, target) = languages.resolve(config);
            let success = service.delete_word(&word, &source, &target).await?;
            print_json(&Success { success })
        }
        Commands::Stats => {
            let stats = service.repository().stats().await?;
            println!("{}", stats);
            Ok(())
        }
        // Handled before the vocabulary is opened
        Commands::Process { .. } | Commands::Completions { .. } => Ok(()),
    }
}
