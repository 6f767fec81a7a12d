//! Tool registry for managing available tools
//!
//! The registry is built once, then shared read-only (behind `Arc`) by every
//! session. Registration order is kept so the prompt lists tools in a stable
//! order.

use crate::Tool;
use agent_core::{Error, Result};
use agent_llm::ToolDefinition;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Immutable registry of tools
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Start building a registry
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&i| Arc::clone(&self.tools[i]))
    }

    /// Check whether a tool with this exact name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// List all registered tools in registration order
    pub fn list_tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    /// Tool names in registration order
    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    /// Descriptors for every tool, in registration order
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

/// Builder for [`ToolRegistry`]
#[derive(Default)]
pub struct ToolRegistryBuilder {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistryBuilder {
    /// Add a tool
    pub fn register(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Add a concrete tool value
    pub fn with_tool<T: Tool + 'static>(self, tool: T) -> Self {
        self.register(Arc::new(tool))
    }

    /// Build the registry
    ///
    /// Fails with a configuration error when two tools share a name.
    pub fn build(self) -> Result<ToolRegistry> {
        let mut index = HashMap::with_capacity(self.tools.len());
        for (i, tool) in self.tools.iter().enumerate() {
            if index.insert(tool.name().to_string(), i).is_some() {
                return Err(Error::Configuration(format!(
                    "duplicate tool name '{}'",
                    tool.name()
                )));
            }
        }

        debug!(tool_count = self.tools.len(), "Tool registry built");
        Ok(ToolRegistry {
            tools: self.tools,
            index,
        })
    }
}
