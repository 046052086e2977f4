//! Word-chain tweet generator.
//!
//! Builds a word-level Markov chain from a text corpus and prints randomly
//! walked sentences. The chain itself is domain-agnostic; this binary owns
//! everything word-specific: tokenization, the terminal-word rule, output
//! formatting and the seeded random source.

use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use markov_gen_core::chain::markov_chain::MarkovChain;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod words;
use words::{Word, feed_corpus};

/// Maximum number of words in one generated tweet.
const MAX_TWEET_WORDS: usize = 20;

#[derive(Parser)]
#[command(name = "markov-gen-tweets")]
#[command(about = "Builds a word-level Markov chain from a corpus and prints random tweets")]
struct Cli {
    /// Seed for the random number generator
    seed: u64,

    /// Number of tweets to generate
    count: usize,

    /// Path to the corpus text file
    corpus: PathBuf,

    /// Maximum number of words to read from the corpus (default: all)
    word_limit: Option<usize>,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "markov_gen_tweets=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut chain: MarkovChain<Word> = MarkovChain::new();
    let words_read = feed_corpus(&cli.corpus, cli.word_limit, &mut chain)?;
    tracing::info!(words_read, distinct_states = chain.len(), "corpus loaded");

    let mut rng = StdRng::seed_from_u64(cli.seed);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for i in 0..cli.count {
        write!(out, "Tweet {}: ", i + 1)?;
        chain.generate(&mut rng, None, MAX_TWEET_WORDS - 1, &mut out)?;
        writeln!(out)?;
    }

    Ok(())
}
