//! Plugin Registry

use crate::EvalContext;
use crate::{CommandMeta, CommandPlugin, FunctionMeta, FunctionPlugin};
use mekako_core::{codes, StatError, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// Central plugin registry
///
/// Immutable once built; share it behind an `Arc`.
pub struct PluginRegistry {
    functions: HashMap<String, Arc<dyn FunctionPlugin>>,
    commands: HashMap<String, Arc<dyn CommandPlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
            commands: HashMap::new(),
        }
    }

    pub fn with_function<F: FunctionPlugin + 'static>(mut self, f: F) -> Self {
        let name = f.meta().name.to_lowercase();
        self.functions.insert(name, Arc::new(f));
        self
    }

    pub fn with_command<C: CommandPlugin + 'static>(mut self, c: C) -> Self {
        let name = c.meta().name.to_lowercase();
        self.commands.insert(name, Arc::new(c));
        self
    }

    pub fn get_function(&self, name: &str) -> Option<&dyn FunctionPlugin> {
        self.functions.get(&name.to_lowercase()).map(|f| f.as_ref())
    }

    pub fn get_command(&self, name: &str) -> Option<&dyn CommandPlugin> {
        self.commands.get(&name.to_lowercase()).map(|c| c.as_ref())
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    pub fn call_function(&self, name: &str, args: &[Value], ctx: &EvalContext) -> Value {
        match self.get_function(name) {
            Some(f) => {
                debug!(function = name, args = args.len(), "calling function");
                let result = f.call(args, ctx);
                if let Value::Error(ref e) = result {
                    debug!(function = name, code = %e.code, "function returned error");
                }
                result
            }
            None => {
                warn!(function = name, "unknown function");
                Value::Error(self.unknown_name(name, self.functions.keys()))
            }
        }
    }

    pub fn execute_command(&self, name: &str, args: &[Value], ctx: &mut EvalContext) -> Value {
        match self.get_command(name) {
            Some(c) => {
                debug!(command = name, args = args.len(), "executing command");
                c.execute(args, ctx)
            }
            None => {
                warn!(command = name, "unknown command");
                Value::Error(self.unknown_name(name, self.commands.keys()))
            }
        }
    }

    fn unknown_name<'a>(&self, name: &str, known: impl Iterator<Item = &'a String>) -> StatError {
        let similar = find_similar(name, known);
        let err = StatError::undefined_func(name);
        if similar.is_empty() {
            return err;
        }
        let suggestions: Vec<&str> = similar.iter().take(5).map(|s| s.as_str()).collect();
        err.with_suggestion(format!(
            "Similar: {}. Use help() for full list.",
            suggestions.join(", ")
        ))
    }

    pub fn help(&self, name: Option<&str>) -> Value {
        match name {
            Some(n) => self.help_for(n),
            None => self.general_help(),
        }
    }

    fn help_for(&self, name: &str) -> Value {
        let name_lower = name.to_lowercase();

        if let Some(f) = self.functions.get(&name_lower) {
            return function_help(f.meta());
        }
        if let Some(c) = self.commands.get(&name_lower) {
            return command_help(c.meta());
        }

        Value::Error(StatError::new(
            codes::NOT_FOUND,
            format!("No function or command named '{}'", name),
        ))
    }

    fn general_help(&self) -> Value {
        let mut funcs_by_cat: HashMap<String, Vec<String>> = HashMap::new();
        for (name, f) in &self.functions {
            funcs_by_cat
                .entry(f.meta().category.to_string())
                .or_default()
                .push(name.clone());
        }
        let functions = funcs_by_cat
            .into_iter()
            .map(|(cat, mut names)| {
                names.sort();
                (cat, Value::List(names.into_iter().map(Value::Text).collect()))
            })
            .collect();

        let mut commands: Vec<String> = self.commands.keys().cloned().collect();
        commands.sort();

        Value::object([
            ("functions", Value::Object(functions)),
            ("commands", Value::List(commands.into_iter().map(Value::Text).collect())),
            ("usage", Value::from("Call help('function_name') for detailed help.")),
        ])
    }

    pub fn list_functions(&self, category: Option<&str>) -> Value {
        let mut metas: Vec<FunctionMeta> = self
            .functions
            .values()
            .map(|f| f.meta())
            .filter(|m| category.map_or(true, |c| m.category == c))
            .collect();
        metas.sort_by_key(|m| m.name);

        Value::List(
            metas
                .into_iter()
                .map(|meta| {
                    Value::object([
                        ("name", Value::from(meta.name)),
                        ("description", Value::from(meta.description)),
                        ("usage", Value::from(meta.usage)),
                        ("category", Value::from(meta.category)),
                    ])
                })
                .collect(),
        )
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn function_help(meta: FunctionMeta) -> Value {
    Value::object([
        ("name", Value::from(meta.name)),
        ("type", Value::from("function")),
        ("description", Value::from(meta.description)),
        ("usage", Value::from(meta.usage)),
        ("returns", Value::from(meta.returns)),
        ("category", Value::from(meta.category)),
        (
            "args",
            Value::List(
                meta.args
                    .iter()
                    .map(|a| {
                        Value::object([
                            ("name", Value::from(a.name)),
                            ("type", Value::from(a.typ)),
                            ("description", Value::from(a.description)),
                            ("optional", Value::Bool(a.optional)),
                            ("default", Value::from(a.default)),
                        ])
                    })
                    .collect(),
            ),
        ),
        (
            "examples",
            Value::List(meta.examples.iter().map(|e| Value::from(*e)).collect()),
        ),
        (
            "related",
            Value::List(meta.related.iter().map(|r| Value::from(*r)).collect()),
        ),
    ])
}

fn command_help(meta: CommandMeta) -> Value {
    Value::object([
        ("name", Value::from(meta.name)),
        ("type", Value::from("command")),
        ("description", Value::from(meta.description)),
        (
            "args",
            Value::List(meta.args.iter().map(|a| Value::from(a.name)).collect()),
        ),
        (
            "examples",
            Value::List(meta.examples.iter().map(|e| Value::from(*e)).collect()),
        ),
    ])
}

/// Registered names resembling `name`, best match first
fn find_similar<'a>(name: &str, known: impl Iterator<Item = &'a String>) -> Vec<String> {
    let query = name.to_lowercase();
    let mut matches: Vec<(String, usize)> = known
        .filter_map(|candidate| {
            let score = similarity_score(&query, candidate);
            (score > 0).then(|| (candidate.clone(), score))
        })
        .collect();

    matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    matches.into_iter().map(|(name, _)| name).collect()
}

fn similarity_score(query: &str, candidate: &str) -> usize {
    let mut score = 0;

    if candidate.starts_with(query) {
        score += 100;
    } else if candidate.contains(query) {
        score += 50;
    } else if query.contains(candidate) {
        score += 30;
    }

    // Shared characters, weak signal on its own
    let query_chars: HashSet<char> = query.chars().collect();
    let candidate_chars: HashSet<char> = candidate.chars().collect();
    score += query_chars.intersection(&candidate_chars).count() * 2;

    let len_diff = query.len().abs_diff(candidate.len());
    if len_diff < 5 && score > 0 {
        score += 5 - len_diff;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArgMeta;

    struct Double;

    static DOUBLE_ARGS: [ArgMeta; 1] = [ArgMeta::required("x", "Number", "Value to double")];

    impl FunctionPlugin for Double {
        fn meta(&self) -> FunctionMeta {
            FunctionMeta {
                name: "double",
                description: "Multiply by two",
                usage: "double(x)",
                args: &DOUBLE_ARGS,
                returns: "Number",
                examples: &["double(2) → 4"],
                category: "test",
                source: None,
                related: &[],
            }
        }

        fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
            match args.first().and_then(Value::as_number) {
                Some(x) => Value::Number(2.0 * x),
                None => Value::Error(StatError::arg_count("double", 1, args.len())),
            }
        }
    }

    struct Counter;

    impl CommandPlugin for Counter {
        fn meta(&self) -> CommandMeta {
            CommandMeta {
                name: "draw",
                description: "Draw a random number",
                args: &[],
                examples: &["draw()"],
            }
        }

        fn execute(&self, _args: &[Value], ctx: &mut EvalContext) -> Value {
            use rand::Rng;
            Value::Number(ctx.rng.gen_range(0.0..1.0))
        }
    }

    fn registry() -> Arc<PluginRegistry> {
        Arc::new(PluginRegistry::new().with_function(Double).with_command(Counter))
    }

    #[test]
    fn test_call_function_case_insensitive() {
        let reg = registry();
        let ctx = EvalContext::new(reg.clone());
        let result = reg.call_function("DOUBLE", &[Value::Number(2.5)], &ctx);
        assert_eq!(result.as_number(), Some(5.0));
    }

    #[test]
    fn test_unknown_function_suggests() {
        let reg = registry();
        let ctx = EvalContext::new(reg.clone());
        let result = reg.call_function("doub", &[], &ctx);
        let err = result.as_error().unwrap();
        assert_eq!(err.code, codes::UNDEFINED_FUNC);
        assert!(err.suggestion.as_ref().unwrap().contains("double"));
    }

    #[test]
    fn test_execute_command_uses_context_rng() {
        let reg = registry();
        let mut a = EvalContext::new(reg.clone()).with_seed(3);
        let mut b = EvalContext::new(reg.clone()).with_seed(3);
        let x = reg.execute_command("draw", &[], &mut a).as_number();
        let y = reg.execute_command("draw", &[], &mut b).as_number();
        assert!(x.is_some());
        assert_eq!(x, y);
    }

    #[test]
    fn test_help_and_listing() {
        let reg = registry();
        let help = reg.help(Some("double"));
        assert_eq!(help.get("usage").as_text(), Some("double(x)"));
        assert_eq!(reg.help(Some("draw")).get("type").as_text(), Some("command"));
        assert_eq!(reg.help(Some("nope")).as_error().unwrap().code, codes::NOT_FOUND);

        let general = reg.help(None);
        assert!(general.get("functions").get("test").as_list().is_some());
        assert_eq!(reg.list_functions(Some("test")).as_list().unwrap().len(), 1);
        assert!(reg.list_functions(Some("other")).as_list().unwrap().is_empty());
    }
}
