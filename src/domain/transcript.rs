use super::WordTiming;

/// Recognized phrases of one transcription, in the order the service listed them.
///
/// Word timings are present only when the job was submitted with word-level
/// timestamps enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    phrases: Vec<String>,
    words: Option<Vec<WordTiming>>,
}

impl Transcript {
    pub fn new(phrases: Vec<String>) -> Self {
        Self {
            phrases,
            words: None,
        }
    }

    pub fn with_words(mut self, words: Vec<WordTiming>) -> Self {
        self.words = Some(words);
        self
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn words(&self) -> Option<&[WordTiming]> {
        self.words.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.iter().all(|p| p.trim().is_empty())
    }

    /// Phrases joined by a single space. Blank phrases are skipped.
    pub fn text(&self) -> String {
        self.phrases
            .iter()
            .filter(|p| !p.trim().is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl FromIterator<String> for Transcript {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
