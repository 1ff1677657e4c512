/// Knobs for a checking run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckOptions {
    /// Upper bound on substitution rounds before giving up on a fixed point.
    pub max_substitution_rounds: usize,
    /// Give records without an explicit constructor a field-wise one.
    pub synthesize_constructors: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            max_substitution_rounds: 64,
            synthesize_constructors: true,
        }
    }
}
