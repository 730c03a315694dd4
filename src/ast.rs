/// Operator that joined a segment to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOperator {
    None, // first segment of a line
    And,  // &&
    Or,   // ||
}

/// Ordered, trimmed stage strings of one segment. Index 0 runs first.
pub type PipelineStageList = Vec<String>;

/// One `&&`/`||`-delimited unit of a line.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSegment {
    pub text: String,
    pub join: JoinOperator,
    /// Always `true`: the join operator is recorded but never suppresses a
    /// segment.
    pub gate: bool,
    pub stages: PipelineStageList,
}

impl CommandSegment {
    pub fn new(text: &str, join: JoinOperator, stages: Vec<String>) -> Self {
        Self {
            text: text.trim().to_string(),
            join,
            gate: true,
            stages: stages.iter().map(|s| s.trim().to_string()).collect(),
        }
    }

    pub fn is_pipeline(&self) -> bool {
        self.stages.len() > 1
    }
}

/// At most one input and one output target for a single stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectSpec {
    pub input: Option<String>,
    pub output: Option<String>,
    pub append: bool,
}

impl RedirectSpec {
    pub fn is_empty(&self) -> bool {
        self.input.is_none() && self.output.is_none()
    }
}

/// A single-stage command after redirect extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    /// Remaining command text; unchanged when a redirect was ambiguous.
    pub command: String,
    pub redirects: RedirectSpec,
}

impl Stage {
    pub fn words(&self) -> Vec<&str> {
        self.command.split_whitespace().collect()
    }

    /// True when a `<` or `>` survived parsing, i.e. the stage held more
    /// than one of the same redirect symbol.
    pub fn has_unparsed_redirect(&self) -> bool {
        self.command.contains('<') || self.command.contains('>')
    }
}
