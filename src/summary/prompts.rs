//! Prompt templates for per-chunk summarization and merging.

const TRANSCRIPT_TEMPLATE: &str = r#"You are an experienced therapist reviewing the transcript of a therapy session between a therapist and a client. The transcript may be only one part of a longer session.

Produce a structured session summary:
- title: a short, warm title for the session
- one_line_summary: one sentence capturing the heart of the session
- full_recap: a concise recap of what was discussed, written to the client
- therapist_insights: 1-5 observations the therapist made about the client's patterns
- client_learnings: 1-5 realizations the client expressed or arrived at
- recommendations: 1-5 concrete practices or next steps

For every insight, learning and recommendation give a one-line summary, a short detail explaining why it matters, and a verbatim excerpt from the transcript that supports it. Only report what the transcript states or clearly implies.

Transcript:
---
{text}
---"#;

const VOICE_NOTE_TEMPLATE: &str = r#"You are an experienced therapist reading a note the client recorded for themselves after a therapy session. It is a single speaker recalling the session in their own words.

Produce a structured session summary:
- title: a short, warm title for the session
- one_line_summary: one sentence capturing the heart of the session
- full_recap: a concise recap of what the client described, written to the client
- therapist_insights: 1-5 observations the therapist appears to have shared, as the client recalls them
- client_learnings: 1-5 realizations the client describes
- recommendations: 1-5 concrete practices or next steps

For every insight, learning and recommendation give a one-line summary, a short detail explaining why it matters, and a verbatim excerpt from the note that supports it. Only report what the note states or clearly implies.

Note:
---
{text}
---"#;

/// Opening line of every merge prompt
pub const MERGE_PREAMBLE: &str =
    "The following are partial summaries of consecutive parts of one therapy session.";

const MERGE_INSTRUCTIONS: &str = r#"Combine them into a single session summary with the same structure:
- Write one title, one one_line_summary and one full_recap covering the whole session.
- Remove duplicate or overlapping insights, learnings and recommendations.
- Where there are more than 5 candidates in a list, keep the most therapeutically significant.
- Keep excerpts verbatim from the partial summaries."#;

pub fn summary_prompt(text: &str, is_voice_note: bool) -> String {
    let template = if is_voice_note {
        VOICE_NOTE_TEMPLATE
    } else {
        TRANSCRIPT_TEMPLATE
    };
    template.replace("{text}", text)
}

/// `partials_json` holds one pretty-printed summary per entry, in input order.
pub fn merge_prompt(partials_json: &[String]) -> String {
    let mut prompt = String::from(MERGE_PREAMBLE);
    prompt.push_str("\n\n");
    prompt.push_str(MERGE_INSTRUCTIONS);
    for (i, partial) in partials_json.iter().enumerate() {
        prompt.push_str(&format!("\n\nPart {} of {}:\n{}", i + 1, partials_json.len(), partial));
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_variants_embed_text() {
        let transcript = summary_prompt("Client: hello.", false);
        let note = summary_prompt("Client: hello.", true);
        assert!(transcript.contains("Client: hello."));
        assert!(note.contains("Client: hello."));
        assert!(transcript.contains("Transcript:"));
        assert!(note.contains("Note:"));
        assert_ne!(transcript, note);
    }

    #[test]
    fn test_merge_prompt_numbers_parts() {
        let prompt = merge_prompt(&["{\"a\":1}".to_string(), "{\"b\":2}".to_string()]);
        assert!(prompt.starts_with(MERGE_PREAMBLE));
        assert!(prompt.contains("Part 1 of 2:\n{\"a\":1}"));
        assert!(prompt.contains("Part 2 of 2:\n{\"b\":2}"));
    }
}
