#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreLevel {
    Hard,
    Soft,
}
