//! Chunked summarization of long transcripts.

use tracing::{debug, info};

use crate::chunker::{split_into_chunks, DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP};
use crate::cleaner::clean_model_output;
use crate::error::SummarizerResult;
use crate::generator::TextGenerator;
use crate::progress::ProgressSink;

/// Progress band reported while chunks are summarized.
#[derive(Debug, Clone, Copy)]
pub struct ChunkProgress {
    pub base: u32,
    pub span: u32,
}

impl ChunkProgress {
    /// Progress value before summarizing chunk `index` of `total`.
    pub fn at(&self, index: usize, total: usize) -> u32 {
        self.base + (index as u32 * self.span) / total.max(1) as u32
    }
}

/// Summarize a transcript, chunking it when it is too long for one prompt.
///
/// A single chunk is summarized directly. Otherwise every chunk is
/// summarized on its own, the cleaned partial summaries are joined with
/// blank lines, and that text is summarized once more.
pub async fn summarize_transcript<F>(
    generator: &dyn TextGenerator,
    sink: &dyn ProgressSink,
    transcript: &str,
    build_prompt: F,
    progress: ChunkProgress,
) -> SummarizerResult<String>
where
    F: Fn(&str) -> String + Send + Sync,
{
    let chunks = split_into_chunks(transcript, DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP);

    if chunks.len() <= 1 {
        let raw = generator.generate(&build_prompt(transcript)).await?;
        return Ok(clean_model_output(&raw));
    }

    let total = chunks.len();
    info!(chunks = total, transcript_len = transcript.len(), "Summarizing transcript in chunks");

    let mut partials = Vec::with_capacity(total);
    for (i, chunk) in chunks.iter().enumerate() {
        sink.progress(&format!("Processing chunk {} of {}...", i + 1, total), progress.at(i, total))
            .await;

        let raw = generator.generate(&build_prompt(chunk)).await?;
        debug!(chunk = i + 1, len = raw.len(), "Chunk summarized");
        partials.push(clean_model_output(&raw));
    }

    let combined = partials.join("\n\n");
    let raw = generator.generate(&build_prompt(&combined)).await?;
    Ok(clean_model_output(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_progress_band() {
        let youtube = ChunkProgress { base: 60, span: 15 };
        assert_eq!(youtube.at(0, 3), 60);
        assert_eq!(youtube.at(1, 3), 65);
        assert_eq!(youtube.at(2, 3), 70);

        let upload = ChunkProgress { base: 60, span: 20 };
        assert_eq!(upload.at(1, 2), 70);
        assert_eq!(upload.at(2, 7), 65);
    }
}
