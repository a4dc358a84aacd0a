const SENTENCE_DELIMITER: &str = ". ";

/// Trim a generated reply and cap it at `max_sentences` sentences.
///
/// Sentences are split on the literal `". "`, so abbreviations such as
/// "e.g. " count as boundaries. Only a truncated reply gets a terminal
/// period appended; replies within the limit come back trimmed but
/// otherwise untouched.
pub fn normalize(raw: &str, max_sentences: usize) -> String {
    let trimmed = raw.trim();
    let segments: Vec<&str> = trimmed.split(SENTENCE_DELIMITER).collect();

    if segments.len() <= max_sentences {
        return trimmed.to_string();
    }

    let mut reply = segments[..max_sentences].join(SENTENCE_DELIMITER);
    if !reply.ends_with('.') {
        reply.push('.');
    }
    reply
}
