// ============================================================
// Layer 3 — Emotion Classes
// ============================================================
// EMO-DB encodes the acted emotion as a German initial in the
// 6th character of every filename, e.g. "03a01Wa.wav" is anger
// (Wut). The classifier predicts one of seven contiguous class
// indices in the order below:
//
//   code  index  emotion
//   ────  ─────  ─────────────────────────
//    W      0    anger      (Wut)
//    L      1    boredom    (Langeweile)
//    E      2    disgust    (Ekel)
//    A      3    fear       (Angst)
//    F      4    happiness  (Freude)
//    T      5    sadness    (Trauer)
//    N      6    neutral
//
// The table is a process-wide constant and never mutated.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emotion {
    Anger,
    Boredom,
    Disgust,
    Fear,
    Happiness,
    Sadness,
    Neutral,
}

impl Emotion {
    /// All emotions in class-index order
    pub const ALL: [Emotion; 7] = [
        Emotion::Anger,
        Emotion::Boredom,
        Emotion::Disgust,
        Emotion::Fear,
        Emotion::Happiness,
        Emotion::Sadness,
        Emotion::Neutral,
    ];

    /// The EMO-DB filename code letter
    pub fn code(self) -> char {
        match self {
            Emotion::Anger     => 'W',
            Emotion::Boredom   => 'L',
            Emotion::Disgust   => 'E',
            Emotion::Fear      => 'A',
            Emotion::Happiness => 'F',
            Emotion::Sadness   => 'T',
            Emotion::Neutral   => 'N',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.code() == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            Emotion::Anger     => "anger",
            Emotion::Boredom   => "boredom",
            Emotion::Disgust   => "disgust",
            Emotion::Fear      => "fear",
            Emotion::Happiness => "happiness",
            Emotion::Sadness   => "sadness",
            Emotion::Neutral   => "neutral",
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed mapping from code letters to class indices 0..N-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmotionLabelMap;

/// The one label map used by the whole pipeline
pub const EMOTION_MAP: EmotionLabelMap = EmotionLabelMap;

impl EmotionLabelMap {
    /// Class index for a code letter, or None if the code is unknown
    pub fn index_of(&self, code: char) -> Option<usize> {
        Emotion::ALL.iter().position(|e| e.code() == code)
    }

    /// Inverse lookup used when decoding predictions
    pub fn emotion_at(&self, index: usize) -> Option<Emotion> {
        Emotion::ALL.get(index).copied()
    }

    pub fn len(&self) -> usize {
        Emotion::ALL.len()
    }

    pub fn codes(&self) -> impl Iterator<Item = char> {
        Emotion::ALL.into_iter().map(Emotion::code)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_indices() {
        assert_eq!(EMOTION_MAP.index_of('W'), Some(0));
        assert_eq!(EMOTION_MAP.index_of('L'), Some(1));
        assert_eq!(EMOTION_MAP.index_of('E'), Some(2));
        assert_eq!(EMOTION_MAP.index_of('A'), Some(3));
        assert_eq!(EMOTION_MAP.index_of('F'), Some(4));
        assert_eq!(EMOTION_MAP.index_of('T'), Some(5));
        assert_eq!(EMOTION_MAP.index_of('N'), Some(6));
    }

    #[test]
    fn test_unknown_code_has_no_index() {
        assert_eq!(EMOTION_MAP.index_of('X'), None);
        // Codes are case sensitive
        assert_eq!(EMOTION_MAP.index_of('w'), None);
    }

    #[test]
    fn test_indices_are_contiguous_and_invertible() {
        for (i, code) in EMOTION_MAP.codes().enumerate() {
            assert_eq!(EMOTION_MAP.index_of(code), Some(i));
            assert_eq!(EMOTION_MAP.emotion_at(i).map(Emotion::code), Some(code));
        }
        assert_eq!(EMOTION_MAP.len(), 7);
        assert_eq!(EMOTION_MAP.emotion_at(7), None);
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Emotion::from_code('T'), Some(Emotion::Sadness));
        assert_eq!(Emotion::from_code('?'), None);
    }
}
