use crate::ast::{CommandSegment, JoinOperator, PipelineStageList};
use crate::tokenizer::{tokenize, TokenType};

/// Groups a token stream into conditional segments; each segment's text is
/// then split into its pipeline stages with [`split_pipeline`].
///
/// A segment's join operator is the operator token right before it, so the
/// result matches splitting on `&&` first and then on `||`.
pub fn parse(tokens: &[TokenType]) -> Vec<CommandSegment> {
    let mut segments = Vec::new();
    let mut join = JoinOperator::None;
    let mut text = String::new();

    for token in tokens {
        match token {
            TokenType::Text(t) => text.push_str(t),
            TokenType::Pipe => text.push('|'),
            TokenType::LogicalAnd | TokenType::LogicalOr => {
                segments.push(CommandSegment::new(&text, join, split_pipeline(&text)));
                text.clear();
                join = if *token == TokenType::LogicalAnd {
                    JoinOperator::And
                } else {
                    JoinOperator::Or
                };
            }
        }
    }
    segments.push(CommandSegment::new(&text, join, split_pipeline(&text)));

    log::trace!("parsed segments: {:?}", segments);
    segments
}

/// Conditional Splitter: one line into `&&`/`||` segments.
pub fn split_conditionals(line: &str) -> Vec<CommandSegment> {
    parse(&tokenize(line))
}

/// Pipeline Splitter: one segment's text into trimmed `|` stages.
pub fn split_pipeline(text: &str) -> PipelineStageList {
    let mut stages = vec![String::new()];
    for token in tokenize(text) {
        match token {
            TokenType::Pipe => stages.push(String::new()),
            TokenType::Text(t) => {
                if let Some(stage) = stages.last_mut() {
                    stage.push_str(&t);
                }
            }
            // Not expected inside a segment; kept literally.
            TokenType::LogicalAnd => {
                if let Some(stage) = stages.last_mut() {
                    stage.push_str("&&");
                }
            }
            TokenType::LogicalOr => {
                if let Some(stage) = stages.last_mut() {
                    stage.push_str("||");
                }
            }
        }
    }
    stages.iter().map(|s| s.trim().to_string()).collect()
}
