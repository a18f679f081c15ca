use thiserror::Error;

/// Validation failures surfaced to the user as a blocking notice.
/// The `Display` text is what the notice shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("レイヤーを選択してください")]
    NoLayerSelected,
    #[error("マイパレットは最大{max}色です。")]
    PaletteFull { max: usize },
    #[error("マイパレットは空です。")]
    PaletteEmpty,
}

/// Durable storage failures. Palette operations swallow these and keep
/// working in memory.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("local storage is not available")]
    Unavailable,
    #[error("storage rejected the write: {0}")]
    Rejected(String),
    #[error("palette payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
