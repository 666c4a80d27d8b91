/// One recognized word and where it falls in the audio, in 100 ns ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordTiming {
    pub word: String,
    pub offset_ticks: u64,
    pub duration_ticks: u64,
}

impl WordTiming {
    pub fn new(word: impl Into<String>, offset_ticks: u64, duration_ticks: u64) -> Self {
        Self {
            word: word.into(),
            offset_ticks,
            duration_ticks,
        }
    }

    pub fn end_ticks(&self) -> u64 {
        self.offset_ticks.saturating_add(self.duration_ticks)
    }
}
