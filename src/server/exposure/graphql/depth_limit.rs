//! Query depth validation
//!
//! Every request document is checked before execution. Top-level fields sit
//! at depth 0 and each nested selection set adds one level. Fragment spreads
//! are expanded where they appear, inline fragments add no depth, and
//! introspection fields (`__schema`, `__typename`, ...) are ignored.
//!
//! The check walks the same [`ExecutableDocument`] async-graphql executes,
//! so a request is parsed once. The relative depth of each fragment is
//! computed once per document and reused at every spread.

use async_graphql::parser::parse_query;
use async_graphql::parser::types::{
    DocumentOperations, ExecutableDocument, FragmentDefinition, OperationDefinition, Selection,
    SelectionSet,
};
use async_graphql::{Name, Positioned};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DepthLimitError {
    /// The document could not be parsed
    #[error("Syntax Error: {0}")]
    Syntax(String),

    /// An operation nests deeper than allowed
    #[error("'{operation}' exceeds maximum operation depth of {max_depth}")]
    TooDeep { operation: String, max_depth: usize },
}

impl DepthLimitError {
    pub fn error_code(&self) -> &'static str {
        match self {
            DepthLimitError::Syntax(_) => "GRAPHQL_PARSE_FAILED",
            DepthLimitError::TooDeep { .. } => "GRAPHQL_VALIDATION_FAILED",
        }
    }
}

/// Measured depth of one operation in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDepth {
    pub operation: String,
    pub depth: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct DepthLimit {
    max_depth: usize,
}

impl DepthLimit {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Parse `query` and check every operation it defines
    pub fn check(&self, query: &str) -> Result<Vec<OperationDepth>, DepthLimitError> {
        let document = parse_query(query).map_err(|e| DepthLimitError::Syntax(e.to_string()))?;
        self.check_document(&document)
    }

    pub fn check_document(
        &self,
        document: &ExecutableDocument,
    ) -> Result<Vec<OperationDepth>, DepthLimitError> {
        let operations: Vec<(&str, &Positioned<OperationDefinition>)> = match &document.operations
        {
            DocumentOperations::Single(operation) => vec![("anonymous", operation)],
            DocumentOperations::Multiple(operations) => operations
                .iter()
                .map(|(name, operation)| (name.as_str(), operation))
                .collect(),
        };

        let mut walk = Walk {
            max_depth: self.max_depth,
            operation: "anonymous",
            fragments: &document.fragments,
            fragment_depths: HashMap::new(),
            visiting: Vec::new(),
        };

        let mut depths = Vec::with_capacity(operations.len());
        for (name, operation) in operations {
            walk.operation = name;
            let depth = walk.selection_set(&operation.node.selection_set.node, 0)?;
            depths.push(OperationDepth {
                operation: name.to_string(),
                depth,
            });
        }
        Ok(depths)
    }
}

impl Default for DepthLimit {
    fn default() -> Self {
        Self::new(5)
    }
}

struct Walk<'d> {
    max_depth: usize,
    operation: &'d str,
    fragments: &'d HashMap<Name, Positioned<FragmentDefinition>>,
    /// Deepest level a fragment reaches below the point it is spread at
    fragment_depths: HashMap<&'d str, usize>,
    visiting: Vec<&'d str>,
}

impl<'d> Walk<'d> {
    fn too_deep(&self) -> DepthLimitError {
        DepthLimitError::TooDeep {
            operation: self.operation.to_string(),
            max_depth: self.max_depth,
        }
    }

    fn selection_set(
        &mut self,
        set: &'d SelectionSet,
        depth: usize,
    ) -> Result<usize, DepthLimitError> {
        let mut deepest = 0;
        for selection in &set.items {
            deepest = deepest.max(self.selection(&selection.node, depth)?);
        }
        Ok(deepest)
    }

    fn selection(
        &mut self,
        selection: &'d Selection,
        depth: usize,
    ) -> Result<usize, DepthLimitError> {
        if depth > self.max_depth {
            return Err(self.too_deep());
        }

        match selection {
            Selection::Field(field) => {
                let field = &field.node;
                let children = &field.selection_set.node;
                if field.name.node.starts_with("__") || children.items.is_empty() {
                    return Ok(0);
                }
                Ok(1 + self.selection_set(children, depth + 1)?)
            }
            Selection::InlineFragment(inline) => {
                self.selection_set(&inline.node.selection_set.node, depth)
            }
            Selection::FragmentSpread(spread) => {
                let name = spread.node.fragment_name.node.as_str();
                if let Some(&relative) = self.fragment_depths.get(name) {
                    if depth + relative > self.max_depth {
                        return Err(self.too_deep());
                    }
                    return Ok(relative);
                }
                let fragments = self.fragments;
                let Some(fragment) = fragments.get(name) else {
                    return Ok(0);
                };
                // cyclic spreads are rejected later by schema validation
                if self.visiting.contains(&name) {
                    return Ok(0);
                }
                self.visiting.push(name);
                let relative = self.selection_set(&fragment.node.selection_set.node, depth);
                self.visiting.pop();
                let relative = relative?;
                self.fragment_depths.insert(name, relative);
                Ok(relative)
            }
        }
    }
}
