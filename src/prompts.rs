//! System instructions for transcript post-processing.

const CONVERSATION_PROMPT: &str = "You are an expert in conversation analysis. Your task is to process a raw, unformatted audio transcript and reformat it into a clear, structured dialogue. \
Follow these rules precisely:\n\
1. Identify distinct speakers in the conversation. Label them sequentially as 'Speaker 1', 'Speaker 2', and so on.\n\
2. Pay close attention to conversational cues, turn-taking, and shifts in topic to accurately attribute dialogue to the correct speaker.\n\
3. Format each turn as 'Speaker X: [dialogue]'.\n\
4. Do not add any extra commentary, summaries, or analysis. Your output should only be the formatted transcript itself.";

const READABILITY_PROMPT: &str = "You are a helpful assistant. The user will provide a raw audio transcript. Your task is to reformat it into clean, readable paragraphs with proper spacing. Do not add any commentary, just provide the formatted text.";

/// The system instruction for the post-processing chat completion.
pub fn system_prompt(conversation_mode: bool) -> &'static str {
    if conversation_mode {
        CONVERSATION_PROMPT
    } else {
        READABILITY_PROMPT
    }
}
