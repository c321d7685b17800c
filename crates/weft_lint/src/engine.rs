//! Lint engine that manages rule registration, configuration, and execution.
//!
//! The `LintEngine` accepts a `LintConfig` to control which rules are denied,
//! allowed, or warned, then runs each enabled rule over a module.

use std::collections::HashSet;

use tracing::debug;
use weft_common::Interner;
use weft_config::LintConfig;
use weft_diagnostics::{DiagnosticSink, Severity};
use weft_netlist::Module;

use crate::rules::register_builtin_rules;
use crate::LintRule;

/// The lint engine that orchestrates running lint rules on a module.
///
/// Rules are matched against the config lists by name (`unused-signal`) or
/// code (`W101`). `allow` suppresses a rule, `deny` promotes its findings to
/// errors, and `warn` demotes them to warnings.
pub struct LintEngine {
    rules: Vec<Box<dyn LintRule>>,
    denied: HashSet<String>,
    allowed: HashSet<String>,
    warned: HashSet<String>,
}

impl LintEngine {
    /// Creates a new lint engine with all builtin rules, configured by `config`.
    pub fn new(config: &LintConfig) -> Self {
        let mut engine = Self {
            rules: Vec::new(),
            denied: config.deny.iter().cloned().collect(),
            allowed: config.allow.iter().cloned().collect(),
            warned: config.warn.iter().cloned().collect(),
        };
        register_builtin_rules(&mut engine);
        engine
    }

    /// Creates a new lint engine with default configuration (no overrides).
    pub fn with_defaults() -> Self {
        Self::new(&LintConfig::default())
    }

    /// Registers a lint rule with the engine.
    pub fn register(&mut self, rule: Box<dyn LintRule>) {
        self.rules.push(rule);
    }

    /// Returns the number of registered rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the registered rules.
    pub fn rules(&self) -> impl Iterator<Item = &dyn LintRule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    fn matches(set: &HashSet<String>, rule: &dyn LintRule) -> bool {
        set.contains(rule.name()) || set.contains(&rule.code().to_string())
    }

    /// Returns the rule a config entry refers to, by name or code.
    pub fn find_rule(&self, key: &str) -> Option<&dyn LintRule> {
        self.rules()
            .find(|r| r.name() == key || r.code().to_string() == key)
    }

    /// Returns the names of rules that are both denied and allowed,
    /// whichever spelling each list uses.
    pub fn conflicting_rules(&self) -> Vec<&str> {
        self.rules()
            .filter(|r| Self::matches(&self.denied, *r) && Self::matches(&self.allowed, *r))
            .map(|r| r.name())
            .collect()
    }

    /// Runs all enabled lint rules on `module`.
    pub fn run(&self, module: &Module, interner: &Interner, sink: &DiagnosticSink) {
        for rule in &self.rules {
            let rule = rule.as_ref();
            if Self::matches(&self.allowed, rule) {
                continue;
            }

            let temp_sink = DiagnosticSink::new();
            rule.check_module(module, interner, &temp_sink);

            let override_severity = if Self::matches(&self.warned, rule) {
                Some(Severity::Warning)
            } else if Self::matches(&self.denied, rule) {
                Some(Severity::Error)
            } else {
                None
            };
            let found = temp_sink.take_all();
            if !found.is_empty() {
                debug!(rule = rule.name(), count = found.len(), "lint findings");
            }
            sink.extend(found.into_iter().map(|mut diag| {
                if let Some(severity) = override_severity {
                    diag.severity = severity;
                }
                diag
            }));
        }
    }

    /// Returns the names of all registered rules.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }
}
