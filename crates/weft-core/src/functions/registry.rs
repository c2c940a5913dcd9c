//! Function registry for skills and their functions

use super::function_trait::Function;
use super::types::FunctionView;
use crate::error::{OptionExt, WeftResult};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Skill that holds functions registered without a skill name
pub const GLOBAL_SKILL: &str = "_GLOBAL_FUNCTIONS_";

/// Registry of functions grouped by skill.
///
/// Skill and function names are matched case-insensitively; registration
/// order is preserved for listings.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    skills: IndexMap<String, IndexMap<String, Arc<dyn Function>>>,
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function under its own skill name.
    ///
    /// Returns the function previously registered under the same name.
    pub fn register(&mut self, function: Arc<dyn Function>) -> Option<Arc<dyn Function>> {
        let skill = skill_key(Some(function.skill_name()));
        let name = function.name().to_lowercase();
        self.skills.entry(skill).or_default().insert(name, function)
    }

    /// Get a function; `None` or empty skill means the global skill
    pub fn get_function(&self, skill: Option<&str>, name: &str) -> Option<Arc<dyn Function>> {
        self.skills
            .get(&skill_key(skill))
            .and_then(|functions| functions.get(&name.to_lowercase()))
            .cloned()
    }

    /// Get a function or fail with `FunctionNotFound`
    pub fn resolve(&self, skill: Option<&str>, name: &str) -> WeftResult<Arc<dyn Function>> {
        let qualified = match skill {
            Some(skill) if !skill.is_empty() && skill != GLOBAL_SKILL => {
                format!("{}.{}", skill, name)
            }
            _ => name.to_string(),
        };
        self.get_function(skill, name).or_function_not_found(qualified)
    }

    /// Resolve a `skill.function` or bare `function` reference
    pub fn resolve_qualified(&self, reference: &str) -> WeftResult<Arc<dyn Function>> {
        match reference.trim().split_once('.') {
            Some((skill, name)) => self.resolve(Some(skill), name),
            None => self.resolve(None, reference.trim()),
        }
    }

    /// Check if a function is registered
    pub fn has_function(&self, skill: Option<&str>, name: &str) -> bool {
        self.get_function(skill, name).is_some()
    }

    /// Names of all skills in registration order
    pub fn skill_names(&self) -> Vec<String> {
        self.skills
            .values()
            .filter_map(|functions| functions.values().next())
            .map(|function| function.skill_name().to_string())
            .collect()
    }

    /// All functions of a skill
    pub fn functions_in(&self, skill: &str) -> Vec<Arc<dyn Function>> {
        self.skills
            .get(&skill_key(Some(skill)))
            .map(|functions| functions.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Describe every registered function
    pub fn describe_functions(&self) -> Vec<FunctionView> {
        self.skills
            .values()
            .flat_map(|functions| functions.values())
            .map(|function| function.describe())
            .collect()
    }

    /// Remove a function
    pub fn remove(&mut self, skill: Option<&str>, name: &str) -> Option<Arc<dyn Function>> {
        let key = skill_key(skill);
        let functions = self.skills.get_mut(&key)?;
        let removed = functions.shift_remove(&name.to_lowercase());
        if functions.is_empty() {
            self.skills.shift_remove(&key);
        }
        removed
    }

    /// Total number of registered functions
    pub fn len(&self) -> usize {
        self.skills.values().map(IndexMap::len).sum()
    }

    /// Whether no function is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get registry statistics
    pub fn statistics(&self) -> RegistryStatistics {
        RegistryStatistics {
            total_functions: self.len(),
            total_skills: self.skills.len(),
            functions_by_skill: self
                .skills
                .values()
                .filter_map(|functions| {
                    let skill = functions.values().next()?.skill_name().to_string();
                    Some((skill, functions.len()))
                })
                .collect(),
        }
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .skills
            .values()
            .flat_map(|functions| functions.values())
            .map(|function| function.qualified_name())
            .collect();
        f.debug_struct("FunctionRegistry")
            .field("functions", &names)
            .finish()
    }
}

/// Statistics about the function registry
#[derive(Debug, Clone)]
pub struct RegistryStatistics {
    /// Total number of registered functions
    pub total_functions: usize,
    /// Total number of skills
    pub total_skills: usize,
    /// Number of functions in each skill
    pub functions_by_skill: HashMap<String, usize>,
}

fn skill_key(skill: Option<&str>) -> String {
    match skill {
        Some(skill) if !skill.is_empty() => skill.to_lowercase(),
        _ => GLOBAL_SKILL.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WeftError;
    use crate::functions::NativeFunction;

    fn echo(skill: &str, name: &str) -> Arc<dyn Function> {
        Arc::new(NativeFunction::from_fn(skill, name, "Echo the input", |vars| {
            Ok(vars.input().to_string())
        }))
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut registry = FunctionRegistry::new();
        registry.register(echo("Text", "Upper"));

        assert!(registry.has_function(Some("text"), "upper"));
        assert!(registry.has_function(Some("TEXT"), "UPPER"));
        assert!(!registry.has_function(None, "upper"));
    }

    #[test]
    fn test_global_functions() {
        let mut registry = FunctionRegistry::new();
        registry.register(echo("", "echo"));

        assert!(registry.has_function(None, "echo"));
        assert!(registry.has_function(Some(""), "echo"));
        assert!(registry.has_function(Some(GLOBAL_SKILL), "echo"));
        assert_eq!(registry.resolve_qualified("echo").unwrap().name(), "echo");
    }

    #[test]
    fn test_resolve_reports_qualified_name() {
        let registry = FunctionRegistry::new();
        let err = registry.resolve(Some("writer"), "poem").err().unwrap();
        assert!(matches!(err, WeftError::FunctionNotFound { ref name, .. } if name == "writer.poem"));

        let err = registry.resolve_qualified("missing").err().unwrap();
        assert!(matches!(err, WeftError::FunctionNotFound { ref name, .. } if name == "missing"));
    }

    #[test]
    fn test_register_replaces_and_remove() {
        let mut registry = FunctionRegistry::new();
        assert!(registry.register(echo("text", "trim")).is_none());
        assert!(registry.register(echo("text", "TRIM")).is_some());
        registry.register(echo("math", "add"));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.skill_names(), vec!["text", "math"]);

        assert!(registry.remove(Some("text"), "trim").is_some());
        assert_eq!(registry.skill_names(), vec!["math"]);
        assert!(registry.remove(Some("text"), "trim").is_none());
    }

    #[test]
    fn test_statistics_and_descriptions() {
        let mut registry = FunctionRegistry::new();
        registry.register(echo("text", "upper"));
        registry.register(echo("text", "lower"));
        registry.register(echo("", "echo"));

        let stats = registry.statistics();
        assert_eq!(stats.total_functions, 3);
        assert_eq!(stats.total_skills, 2);
        assert_eq!(stats.functions_by_skill.get("text"), Some(&2));

        let names: Vec<String> = registry
            .describe_functions()
            .into_iter()
            .map(|view| view.name)
            .collect();
        assert_eq!(names, vec!["upper", "lower", "echo"]);
        assert_eq!(registry.functions_in("TEXT").len(), 2);
    }
}
