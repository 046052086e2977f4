use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use markov_gen_core::chain::markov_chain::MarkovChain;
use markov_gen_core::chain::node::NodeId;
use markov_gen_core::chain::token::Token;
use markov_gen_core::error::Result as ChainResult;
use tracing::debug;

/// One whitespace-delimited word from the corpus.
///
/// A word ending with `'.'` closes a sentence: it is a terminal state and
/// never receives outgoing transitions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Word(String);

impl Word {
    pub fn new(text: &str) -> Self {
        Self(text.to_owned())
    }
}

impl Token for Word {
    fn matches(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn duplicate(&self) -> ChainResult<Self> {
        Ok(self.clone())
    }

    /// Words are separated by a single trailing space; sentence-closing
    /// words are written bare.
    fn emit(&self, out: &mut dyn Write) -> io::Result<()> {
        if self.is_terminal() {
            write!(out, "{}", self.0)
        } else {
            write!(out, "{} ", self.0)
        }
    }

    fn is_terminal(&self) -> bool {
        self.0.ends_with('.')
    }
}

/// Reads the corpus and feeds it into the chain, line by line.
///
/// Each line is one unit: every word is ensured in the store, and each
/// consecutive pair within the line increments a transition. The first word
/// of a line has no predecessor, so lines never link across each other.
///
/// `word_limit` caps how many words are consumed from the file in total;
/// reading stops mid-line once the cap is reached. Returns the number of
/// words actually read.
///
/// # Errors
/// Fails if the corpus cannot be read or if the chain signals an
/// allocation failure; the partially built chain is simply dropped by the
/// caller in that case.
pub fn feed_corpus(
    path: &Path,
    word_limit: Option<usize>,
    chain: &mut MarkovChain<Word>,
) -> Result<usize, Box<dyn Error>> {
    let file = File::open(path)
        .map_err(|err| format!("{}: file unreadable or does not exist ({err})", path.display()))?;
    let reader = BufReader::new(file);

    let mut words_read = 0usize;
    for line in reader.lines() {
        let line = line?;
        let mut prev: Option<NodeId> = None;
        for raw in line.split_whitespace() {
            if word_limit.is_some_and(|limit| words_read >= limit) {
                debug!(words_read, "word limit reached");
                return Ok(words_read);
            }
            words_read += 1;

            let id = chain.ensure(&Word::new(raw))?;
            if let Some(prev_id) = prev {
                chain.link(prev_id, id)?;
            }
            prev = Some(id);
        }
    }

    Ok(words_read)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tempfile::NamedTempFile;

    use super::*;

    fn corpus(text: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn terminal_words_end_with_a_period() {
        assert!(Word::new("done.").is_terminal());
        assert!(!Word::new("middle").is_terminal());
        assert!(!Word::new(".dotted").is_terminal());
    }

    #[test]
    fn emit_separates_words_but_not_terminals() {
        let mut out: Vec<u8> = Vec::new();
        Word::new("hello").emit(&mut out).unwrap();
        Word::new("world.").emit(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "hello world.");
    }

    #[test]
    fn feed_builds_the_expected_graph() {
        let file = corpus("a b a c b .\n");
        let mut chain = MarkovChain::new();
        let words_read = feed_corpus(file.path(), None, &mut chain).unwrap();

        assert_eq!(words_read, 6);
        assert_eq!(chain.len(), 4);

        let a = chain.find(&Word::new("a")).unwrap();
        let b = chain.find(&Word::new("b")).unwrap();
        let c = chain.find(&Word::new("c")).unwrap();
        let period = chain.find(&Word::new(".")).unwrap();

        assert_eq!(chain.node(a).unwrap().frequency_of(b), Some(1));
        assert_eq!(chain.node(a).unwrap().frequency_of(c), Some(1));
        assert_eq!(chain.node(b).unwrap().frequency_of(a), Some(1));
        assert_eq!(chain.node(b).unwrap().frequency_of(period), Some(1));
        assert_eq!(chain.node(c).unwrap().frequency_of(b), Some(1));
        assert_eq!(chain.node(period).unwrap().successor_count(), 0);
    }

    #[test]
    fn lines_do_not_link_across_each_other() {
        let file = corpus("one two\nthree four\n");
        let mut chain = MarkovChain::new();
        feed_corpus(file.path(), None, &mut chain).unwrap();

        let two = chain.find(&Word::new("two")).unwrap();
        assert_eq!(chain.node(two).unwrap().successor_count(), 0);
        assert_eq!(chain.node(two).unwrap().total_count(), 0);
    }

    #[test]
    fn repeated_pairs_accumulate_frequency() {
        let file = corpus("go north\ngo north\ngo south\n");
        let mut chain = MarkovChain::new();
        feed_corpus(file.path(), None, &mut chain).unwrap();

        let go = chain.find(&Word::new("go")).unwrap();
        let north = chain.find(&Word::new("north")).unwrap();
        let south = chain.find(&Word::new("south")).unwrap();

        let node = chain.node(go).unwrap();
        assert_eq!(node.frequency_of(north), Some(2));
        assert_eq!(node.frequency_of(south), Some(1));
        assert_eq!(node.total_count(), 3);
    }

    #[test]
    fn word_limit_stops_mid_line() {
        let file = corpus("a b c d e\n");
        let mut chain = MarkovChain::new();
        let words_read = feed_corpus(file.path(), Some(3), &mut chain).unwrap();

        assert_eq!(words_read, 3);
        assert_eq!(chain.len(), 3);
        assert!(chain.find(&Word::new("d")).is_none());
    }

    #[test]
    fn missing_corpus_is_reported() {
        let mut chain = MarkovChain::new();
        let result = feed_corpus(Path::new("/no/such/corpus.txt"), None, &mut chain);
        let message = result.unwrap_err().to_string();
        assert!(message.contains("file unreadable or does not exist"));
    }

    #[test]
    fn generated_sentences_stay_within_the_word_cap() {
        let file = corpus("the cat sat down.\nthe dog sat up.\nthe cat ran away.\n");
        let mut chain = MarkovChain::new();
        feed_corpus(file.path(), None, &mut chain).unwrap();

        let mut rng = StdRng::seed_from_u64(1234);
        for _ in 0..20 {
            let mut out: Vec<u8> = Vec::new();
            chain.generate(&mut rng, None, 19, &mut out).unwrap();
            let text = String::from_utf8(out).unwrap();
            let count = text.split_whitespace().count();
            assert!(count >= 1 && count <= 20, "got {count} words: {text:?}");
        }
    }
}
