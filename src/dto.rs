#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct TranscriptDto {
    pub transcript: String,
    pub cost: f64,
}
