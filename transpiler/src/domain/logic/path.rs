//! JSONPath-like locations inside an expression tree

use std::fmt;

/// Location of a node, e.g. `$.and[1].>`
///
/// The root is `$`; entering an operator appends `.<name>` and entering an
/// argument list element appends `[<index>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath(String);

impl JsonPath {
    pub fn root() -> Self {
        Self("$".to_string())
    }

    /// Path of the arguments of operator `name` at this location
    pub fn operator(&self, name: &str) -> Self {
        Self(format!("{}.{}", self.0, name))
    }

    /// Path of element `index` at this location
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{}]", self.0, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_building() {
        let path = JsonPath::root().operator("and").index(1).operator(">");
        assert_eq!(path.as_str(), "$.and[1].>");
        assert_eq!(path.to_string(), "$.and[1].>");
    }
}
