/// Compile-time knobs of the interpreter.
///
/// There is no configuration file or environment lookup; [`Config::default`] is what
/// the binary runs with. Tests shrink the capacities to force buffer growth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Written before every read.
    pub prompt: String,
    /// Initial byte capacity of a line buffer.
    pub line_capacity: usize,
    /// Bytes added each time a full line buffer grows.
    pub line_increment: usize,
    /// Initial number of token slots.
    pub token_capacity: usize,
    /// Slots added each time the token storage is full.
    pub token_increment: usize,
}

pub const PROMPT: &str = "$$ ";
pub const LINE_CAPACITY: usize = 1024;
pub const TOKEN_CAPACITY: usize = 64;

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: PROMPT.to_string(),
            line_capacity: LINE_CAPACITY,
            line_increment: LINE_CAPACITY,
            token_capacity: TOKEN_CAPACITY,
            token_increment: TOKEN_CAPACITY,
        }
    }
}
