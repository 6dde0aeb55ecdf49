//! Clone a parsed document and render the result

use serde::Serialize;
use std::io::Read;
use structural_clone::{DeepClone, JsonCodec, Tier, Value};

use crate::cli::Cli;
use crate::error::{CliError, CliResult};

/// Summary printed with `--report`
#[derive(Debug, Serialize)]
pub struct Report {
    /// Tier that produced the result
    pub tier: Tier,
    /// Result is structurally equal to the input
    pub deep_equal: bool,
    /// Result is the input reference itself
    pub same_reference: bool,
    /// Mutating the result left the input untouched
    pub isolated: bool,
}

/// Key written into the copy to check that the input does not see it
const ISOLATION_KEY: &str = "__deepclone_isolation__";

/// Mutate the root container of `copy`, check `original` did not change,
/// then undo the mutation.
///
/// Primitives are immutable and always count as isolated.
pub fn verify_isolation(original: &Value, copy: &Value) -> bool {
    match copy {
        Value::Object(obj) => {
            if original.has(ISOLATION_KEY) || copy.has(ISOLATION_KEY) {
                return !copy.same_value(original);
            }
            obj.borrow_mut().insert(ISOLATION_KEY, Value::Null);
            let leaked = original.has(ISOLATION_KEY);
            obj.borrow_mut().remove(ISOLATION_KEY);
            !leaked
        }
        Value::Array(arr) => {
            let before = original.array_length();
            arr.borrow_mut().elements.push(Value::Null);
            let leaked = original.array_length() != before;
            arr.borrow_mut().elements.pop();
            !leaked
        }
        _ => !copy.is_container() || !copy.same_value(original),
    }
}

/// Read the document from the input file, or stdin when none was given
pub fn read_input(cli: &Cli) -> CliResult<String> {
    match &cli.input {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Parse `input`, clone it as configured and return the text to print
pub fn run(cli: &Cli, input: &str) -> CliResult<String> {
    let document = JsonCodec::parse(input)?;

    if let Some(key) = &cli.self_reference {
        if !matches!(document, Value::Object(_)) {
            return Err(CliError::UsageError(format!(
                "--self-reference {} requires an object at the root, found {}",
                key,
                document.type_name()
            )));
        }
        document.set(key.clone(), document.clone());
    }

    let cloner = DeepClone::probe(&cli.host());
    let outcome = cloner.clone_traced(&document);
    let isolated = verify_isolation(&document, &outcome.value);
    tracing::info!(
        tier = %outcome.tier,
        kind = document.type_name(),
        isolated,
        "clone finished"
    );

    if cli.report {
        let report = Report {
            tier: outcome.tier,
            deep_equal: outcome.value.deep_equals(&document),
            same_reference: outcome.value.same_value(&document),
            isolated,
        };
        return Ok(serde_json::to_string_pretty(&report)?);
    }

    Ok(outcome.value.to_string())
}
