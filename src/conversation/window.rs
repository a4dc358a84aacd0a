use super::message::{Message, SystemDirective, Transcript};

/// Build the exact message list submitted to the engine for one turn.
///
/// The directive is always element 0, followed by at most `history_limit`
/// of the most recent transcript messages in their original order. Older
/// messages are dropped whole.
pub fn build_window(
    system: &SystemDirective,
    transcript: &Transcript,
    history_limit: usize,
) -> Vec<Message> {
    let history = transcript.messages();
    let start = history.len().saturating_sub(history_limit);

    let mut window = Vec::with_capacity(1 + history.len() - start);
    window.push(system.message().clone());
    window.extend_from_slice(&history[start..]);
    window
}
