//! Extraction prompt template

/// Build the instruction prompt for a transcript
///
/// The transcript is embedded verbatim between `"""` markers.
pub fn build_prompt(transcript: &str) -> String {
    format!(
        r#"Analyze the following meeting transcript and extract all action items.
Return ONLY a valid JSON array of objects.
Do not include any other conversational text or markdown formatting.
Each object must have exactly these keys:
- "taskDescription" (string, the action item)
- "owner" (string, who is responsible, or null if unknown)
- "dueDate" (string, the deadline, or null if unknown)

Transcript:
"""
{transcript}
"""
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_embedded_between_markers() {
        let transcript = "Alice will send the report by Friday.";
        let prompt = build_prompt(transcript);
        assert!(prompt.contains(&format!("\"\"\"\n{}\n\"\"\"", transcript)));
    }

    #[test]
    fn test_prompt_names_all_keys() {
        let prompt = build_prompt("anything at all");
        for key in ["\"taskDescription\"", "\"owner\"", "\"dueDate\""] {
            assert!(prompt.contains(key), "prompt should mention {key}");
        }
        assert!(prompt.contains("JSON array"));
    }

    #[test]
    fn test_transcript_not_altered() {
        let transcript = "Use ``` fences and \"quotes\" {braces}";
        assert!(build_prompt(transcript).contains(transcript));
    }
}
