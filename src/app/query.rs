//! jq pattern evaluation.
//!
//! Tag extraction and filtering are orchestrated against an injected
//! [`QueryEvaluator`] rather than a concrete engine, so any JSON query
//! dialect with equivalent expressive power can stand in (tests use stub
//! evaluators). The production implementation is [`JaqEvaluator`], backed by
//! the pure-Rust jaq implementation of the jq language.

use anyhow::{anyhow, Context, Result};
use jaq_core::load::{Arena, File, Loader};
use jaq_core::{Compiler, Ctx, FilterT, RcIter};
use jaq_json::Val;
use serde_json::Value;

/// Evaluates a query pattern against a serialized JSON document, yielding
/// zero or more JSON values.
pub trait QueryEvaluator {
    fn eval(&self, doc: &str, pattern: &str) -> Result<Vec<Value>>;
}

/// [`QueryEvaluator`] backed by jaq. Patterns are compiled per call; the
/// per-event pattern lists this tool sees are short enough that caching
/// compiled filters has not been worth the lifetime plumbing.
#[derive(Debug, Default)]
pub struct JaqEvaluator;

impl JaqEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl QueryEvaluator for JaqEvaluator {
    fn eval(&self, doc: &str, pattern: &str) -> Result<Vec<Value>> {
        let input: Value =
            serde_json::from_str(doc).context("query input is not valid JSON")?;

        let program = File {
            code: pattern,
            path: (),
        };
        let loader = Loader::new(jaq_std::defs().chain(jaq_json::defs()));
        let arena = Arena::default();
        let modules = loader
            .load(&arena, program)
            .map_err(|_| anyhow!("failed to parse query pattern: {pattern}"))?;
        let filter = Compiler::default()
            .with_funs(jaq_std::funs().chain(jaq_json::funs()))
            .compile(modules)
            .map_err(|_| anyhow!("failed to compile query pattern: {pattern}"))?;

        let inputs = RcIter::new(core::iter::empty());
        let mut results = Vec::new();
        for output in filter.run((Ctx::new([], &inputs), Val::from(input))) {
            let val = output.map_err(|_| anyhow!("query pattern failed: {pattern}"))?;
            results.push(Value::from(val));
        }

        Ok(results)
    }
}
