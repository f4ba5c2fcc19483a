use std::path::PathBuf;
use std::sync::Arc;
use anyhow::Context;
use clap::{Parser, Subcommand};
use folio::analysis::ngram::PhraseDictionary;
use folio::analysis::segmenter::{split_sentences, tokenize_sentence};
use folio::core::config::Config;
use folio::corpus::prepare::CorpusPreparer;
use folio::search::service::SearchService;

#[derive(Parser)]
#[command(
    name = "folio",
    about = "Search-as-you-type front end for literary corpora",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prepare the corpus and serve /search/ and /typeahead/
    Serve {
        /// JSON config file; missing keys keep their defaults
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory of packed paragraph files, overrides the config
        #[arg(long)]
        corpus: Option<PathBuf>,

        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the sentences of a text file, one per line
    Sentences {
        file: PathBuf,
    },

    /// Print the distinct n-gram phrases of a text file
    Phrases {
        file: PathBuf,

        #[arg(long, default_value_t = 1)]
        min: usize,

        #[arg(long, default_value_t = 3)]
        max: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, corpus, verbose } => {
            tracing_subscriber::fmt()
                .with_max_level(if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO })
                .init();

            let mut config = match config {
                Some(path) => Config::from_file(&path)
                    .with_context(|| format!("reading config {}", path.display()))?,
                None => Config::default(),
            };
            if let Some(corpus) = corpus {
                config.corpus_dir = corpus;
            }
            let config = config.with_port_override(std::env::var("PORT").ok());

            let preparer = CorpusPreparer::from_config(&config);
            let corpus_dir = config.corpus_dir.clone();
            let prepared = tokio::task::spawn_blocking(move || preparer.prepare(&corpus_dir))
                .await?
                .with_context(|| format!("preparing corpus {}", config.corpus_dir.display()))?;

            let bind_addr = config.bind_addr.clone();
            let service = SearchService::new(
                Arc::new(prepared.paragraphs),
                Arc::new(prepared.phrases),
                config,
            );
            folio::server::serve(Arc::new(service), &bind_addr).await?;
        }
        Commands::Sentences { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            for sentence in split_sentences(&text) {
                println!("{}", sentence);
            }
        }
        Commands::Phrases { file, min, max } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let mut dictionary = PhraseDictionary::new(min, max);
            for sentence in split_sentences(&text) {
                dictionary.insert_sentence(&tokenize_sentence(&sentence));
            }
            for entry in dictionary.iter() {
                println!("{}\t{}", entry.count, entry.text);
            }
        }
    }

    Ok(())
}
