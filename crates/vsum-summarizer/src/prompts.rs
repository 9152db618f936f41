//! Prompt templates sent to the language model.

use vsum_models::{ChatMessage, Summary, SummaryLanguage};

/// Localized section headers of a YouTube summary.
struct SectionHeaders {
    title: &'static str,
    overview: &'static str,
    key_points: &'static str,
    in_detail: &'static str,
    takeaways: &'static str,
    context: &'static str,
}

const EN_HEADERS: SectionHeaders = SectionHeaders {
    title: "TITLE",
    overview: "OVERVIEW",
    key_points: "KEY POINTS",
    in_detail: "IN DETAIL",
    takeaways: "MAIN TAKEAWAYS",
    context: "CONTEXT & IMPLICATIONS",
};

const DE_HEADERS: SectionHeaders = SectionHeaders {
    title: "TITEL",
    overview: "ÜBERBLICK",
    key_points: "KERNPUNKTE",
    in_detail: "IM DETAIL",
    takeaways: "HAUPTERKENNTNISSE",
    context: "KONTEXT & AUSWIRKUNGEN",
};

fn headers_for(language: SummaryLanguage) -> &'static SectionHeaders {
    match language {
        SummaryLanguage::En => &EN_HEADERS,
        SummaryLanguage::De => &DE_HEADERS,
    }
}

/// Summary prompt for YouTube transcript text.
///
/// Headers are German for `de` and English for every other code; the
/// requested code itself is always passed through on the last line.
pub fn summary_prompt(text: &str, language: &str) -> String {
    let h = headers_for(SummaryLanguage::from_code(language));

    format!(
        r#"You are an expert content summarizer. Create a comprehensive summary of the following YouTube video content. Do not include any meta-commentary, introductions, or instructions in your response - provide only the summary content.

Content to summarize:
{text}

IMPORTANT: Based on the video transcript, make reasonable inferences about what might be visible in the video. For the "IN DETAIL" section, provide specific visual details that would likely be present based on the content discussed.

Format your response exactly as follows:

🎯 {title}: [Create a descriptive title based on the actual content]

📝 {overview}: [2-3 sentences providing brief context and main purpose]

🔑 {key_points}:
• [Main argument or topic 1 with specific examples]
• [Main argument or topic 2 with specific examples]
• [Main argument or topic 3 with specific examples]
• [Additional key points as needed]

🔍 {in_detail}:
👥 Characters: [Based on transcript, estimate people count and descriptions - e.g., "1 speaker (presenter)", "2 people in conversation", "multiple participants"]
🪑 Objects: [List objects likely visible based on context - e.g., "microphone, camera equipment", "desk, computer", "presentation screen", "books, papers"]
😊 Emotions: [Infer emotions from tone and content - e.g., "enthusiastic, informative", "calm, professional", "excited, engaging"]
🏢 Environment: [Describe likely setting based on content - e.g., "indoor studio", "office environment", "outdoor location", "classroom setting"]
👔 Clothing: [Infer appropriate attire based on context - e.g., "professional attire", "casual wear", "formal presentation clothing"]

💡 {takeaways}:
• [Practical insight 1 and its significance]
• [Practical insight 2 and its significance]
• [Practical insight 3 and its significance]

🔄 {context}: [Broader context discussion and future implications]

Use the language: {language}"#,
        text = text,
        title = h.title,
        overview = h.overview,
        key_points = h.key_points,
        in_detail = h.in_detail,
        takeaways = h.takeaways,
        context = h.context,
        language = language,
    )
}

/// Closing sections shared by the uploaded-file templates.
const FILE_SUMMARY_FORMAT: &str = r#"📝 **OVERVIEW:**
[Provide a concise overview of what the video is about - 2-3 sentences]

🔑 **KEY POINTS:**
• [First main point discussed in the video]
• [Second main point discussed in the video]
• [Third main point discussed in the video]
• [Continue with additional key points as needed]

💡 **MAIN TAKEAWAYS:**
• [First actionable insight or lesson]
• [Second actionable insight or lesson]
• [Third actionable insight or lesson]
• [Continue with additional takeaways as needed]

🔄 **CONTEXT & IMPLICATIONS:**
[Discuss the broader context, significance, and potential implications of the content discussed in the video]

⏱️ **DURATION:** [Estimated video duration if mentioned or observable]

🏷️ **TAGS:** [Relevant tags or categories for the video content]"#;

/// Summary prompt for the transcript of a directly uploaded file.
pub fn video_file_prompt(transcript: &str, file_name: &str) -> String {
    format!(
        r#"You are an expert content summarizer. Create a comprehensive summary of the following video content. Do not include any meta-commentary, introductions, or instructions in your response - provide only the summary content.

**Video File:** {file_name}

**Transcript:**
{transcript}

Format your response exactly as follows:

🎯 **TITLE:** [Create a descriptive title based on the actual content]

{FILE_SUMMARY_FORMAT}
"#
    )
}

/// Transcription prompt for a video hosted on Gemini Files.
pub fn gemini_transcript_prompt() -> &'static str {
    r#"Please provide a complete transcript of all spoken content in this video with timestamps.
Include only the actual words spoken, without any commentary or analysis.
Format it as a clean, readable transcript with timestamps in [MM:SS] or [HH:MM:SS] format at the beginning of each segment.

Example format:
[00:00] Opening words of the video...
[00:15] Next segment of speech...
[01:30] Another segment...

Provide the complete timestamped transcript with proper punctuation and paragraph breaks."#
}

/// Summary prompt for a video hosted on Gemini Files.
pub fn gemini_video_summary_prompt(file_name: &str, mime_type: &str) -> String {
    format!(
        r#"You are an expert content summarizer. Create a comprehensive summary of this video content. Do not include any meta-commentary, introductions, or instructions in your response - provide only the summary content.

Video Information:
- File Name: {file_name}
- MIME Type: {mime_type}

Format your response exactly as follows:

🎯 **TITLE:** [Extract or create a compelling title for the video]

{FILE_SUMMARY_FORMAT}
"#
    )
}

/// Prompt answering a follow-up question about a stored summary.
///
/// `history` holds the messages exchanged before `question`, oldest first.
pub fn chat_prompt(summary: &Summary, history: &[ChatMessage], question: &str) -> String {
    let transcript = summary
        .transcript
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or("No transcript available");

    let mut context = format!(
        "Video Title: {}\nVideo Summary: {}\nVideo Transcript: {}\n\nPrevious conversation:\n",
        summary.display_title(),
        summary.summary,
        transcript
    );
    for message in history {
        context.push_str(&format!("{}: {}\n", message.role.label(), message.content));
    }
    context.push_str(&format!("User: {}\n", question));

    format!(
        r#"You are an AI assistant helping users understand and discuss a video they've watched.
You have access to the video's summary and transcript. Answer the user's question based on this information.
Be helpful, accurate, and conversational. If the question cannot be answered from the provided context,
politely explain that and suggest what information might be needed.

{context}
Please provide a helpful response to the user's latest question."#
    )
}
