//! Test vectors: literals paired with the layout the runtime must produce.

use hashlit_index::{IndexBuilder, IndexLayout};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::literal::{Literal, LiteralError};

/// The expected constant image of a vector, keys and values as JSON.
pub type ExpectedLayout = IndexLayout<Value, Value>;

/// A literal and the layout building it must reproduce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestVector {
    /// Unique name of the vector.
    pub name: String,
    /// The input literal.
    #[serde(flatten)]
    pub literal: Literal,
    /// The layout the runtime table holds after inserting the keys in order.
    pub expected: ExpectedLayout,
}

impl TestVector {
    /// Records the layout `builder` currently produces for `literal`.
    pub fn record(
        name: impl Into<String>,
        literal: Literal,
        builder: &IndexBuilder,
    ) -> Result<Self, LiteralError> {
        let expected = literal.build(builder)?.into_layout();
        Ok(Self {
            name: name.into(),
            literal,
            expected,
        })
    }

    /// Rebuilds the literal and names the layout fields that differ from
    /// the expectation. An empty result means the vector passes.
    pub fn check(&self, builder: &IndexBuilder) -> Result<Vec<&'static str>, LiteralError> {
        let actual = self.literal.build(builder)?.into_layout();
        Ok(self.expected.mismatches(&actual))
    }
}

/// A file of test vectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorFile {
    /// The vectors, in file order.
    pub vectors: Vec<TestVector>,
}
